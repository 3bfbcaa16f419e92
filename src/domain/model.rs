use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNNAMED_SERVICE: &str = "Unnamed Service";

/// A service as returned by the customer service listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: String,
    pub name: Option<String>,
}

/// Active configuration version of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveVersion {
    Number(u32),
    /// The service exists but nothing is activated.
    None,
    /// The details lookup failed.
    Unknown,
}

impl ActiveVersion {
    /// Reads the `active_version` field of a service details payload, which
    /// is either an object carrying `number`, a bare integer, or null.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        let number = match value {
            Some(serde_json::Value::Object(obj)) => obj.get("number").and_then(as_version_number),
            Some(other) => as_version_number(other),
            None => None,
        };
        number.map(ActiveVersion::Number).unwrap_or(ActiveVersion::None)
    }

    pub fn number(&self) -> Option<u32> {
        match self {
            ActiveVersion::Number(n) => Some(*n),
            _ => None,
        }
    }
}

fn as_version_number(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl fmt::Display for ActiveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveVersion::Number(n) => write!(f, "{}", n),
            ActiveVersion::None => f.write_str("None"),
            ActiveVersion::Unknown => f.write_str("Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDetails {
    pub name: Option<String>,
    pub active_version: ActiveVersion,
}

impl ServiceDetails {
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self {
            name: value
                .get("name")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            active_version: ActiveVersion::from_json(value.get("active_version")),
        }
    }

    /// Placeholder used when the details lookup fails.
    pub fn unavailable() -> Self {
        Self {
            name: None,
            active_version: ActiveVersion::Unknown,
        }
    }
}

/// Outcome of looking up the NGWAF snippet on a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetLookup {
    Found,
    NotFound,
    Unexpected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WafStatus {
    Enabled,
    Disabled,
    NoActiveVersion,
    /// The lookup failed; `status` is `None` when no response arrived.
    Error { status: Option<u16> },
}

impl From<SnippetLookup> for WafStatus {
    fn from(lookup: SnippetLookup) -> Self {
        match lookup {
            SnippetLookup::Found => WafStatus::Enabled,
            SnippetLookup::NotFound => WafStatus::Disabled,
            SnippetLookup::Unexpected { status, .. } => WafStatus::Error {
                status: Some(status),
            },
        }
    }
}

impl fmt::Display for WafStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WafStatus::Enabled => f.write_str("✅"),
            WafStatus::Disabled => f.write_str("❌"),
            WafStatus::NoActiveVersion => f.write_str("No active version"),
            WafStatus::Error {
                status: Some(status),
            } => write!(f, "Error: Unknown (Status: {})", status),
            WafStatus::Error { status: None } => f.write_str("Error: Unknown (Status: None)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReportRow {
    pub service_id: String,
    pub service_name: String,
    pub active_version: ActiveVersion,
    pub waf_status: WafStatus,
    /// `None` when the client challenge check was not requested.
    pub client_challenge: Option<bool>,
}

impl ServiceReportRow {
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} ({}) | Active Version: {} | WAF Status: {}",
            self.service_name, self.service_id, self.active_version, self.waf_status
        );
        if let Some(enabled) = self.client_challenge {
            line.push_str(&format!(
                " | Client Challenge Enabled: {}",
                bool_label(enabled)
            ));
        }
        line
    }

    /// CSV fields in column order.
    pub fn to_record(&self, include_client_challenge: bool) -> Vec<String> {
        let mut record = vec![
            self.service_name.clone(),
            self.service_id.clone(),
            self.active_version.to_string(),
            self.waf_status.to_string(),
        ];
        if include_client_challenge {
            record.push(bool_label(self.client_challenge.unwrap_or(false)).to_string());
        }
        record
    }
}

pub(crate) fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[derive(Debug, Clone)]
pub struct AuditResult {
    pub rows: Vec<ServiceReportRow>,
    pub csv_output: String,
}

impl AuditResult {
    pub fn tally(&self) -> AuditTally {
        let mut tally = AuditTally {
            total: self.rows.len(),
            ..AuditTally::default()
        };
        for row in &self.rows {
            match row.waf_status {
                WafStatus::Enabled => tally.enabled += 1,
                WafStatus::Disabled => tally.disabled += 1,
                WafStatus::NoActiveVersion => tally.no_active_version += 1,
                WafStatus::Error { .. } => tally.errors += 1,
            }
        }
        tally
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditTally {
    pub total: usize,
    pub enabled: usize,
    pub disabled: usize,
    pub no_active_version: usize,
    pub errors: usize,
}

impl fmt::Display for AuditTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} services: {} with NGWAF, {} without, {} with no active version, {} errors",
            self.total, self.enabled, self.disabled, self.no_active_version, self.errors
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub timestamped: String,
    pub latest: String,
}

#[derive(Debug, Clone)]
pub struct AuditSummary {
    pub paths: ReportPaths,
    pub tally: AuditTally,
}
