use crate::domain::model::ServiceReportRow;
use crate::utils::error::{AuditError, Result};
use chrono::NaiveDateTime;

/// Overwritten on every run so downstream jobs can read a fixed path.
pub const LATEST_REPORT_FILE: &str = "cid_ngwaf_results.csv";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const BASE_COLUMNS: [&str; 4] = ["Service Name", "Service ID", "Active Version", "WAF Status"];
const CLIENT_CHALLENGE_COLUMN: &str = "Client Challenge Enabled";

pub fn timestamped_report_name(at: NaiveDateTime) -> String {
    format!("account_report_{}.csv", at.format(TIMESTAMP_FORMAT))
}

pub fn header(include_client_challenge: bool) -> Vec<&'static str> {
    let mut columns = BASE_COLUMNS.to_vec();
    if include_client_challenge {
        columns.push(CLIENT_CHALLENGE_COLUMN);
    }
    columns
}

pub fn render_csv(rows: &[ServiceReportRow], include_client_challenge: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(header(include_client_challenge))?;
    for row in rows {
        writer.write_record(row.to_record(include_client_challenge))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AuditError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| AuditError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
