pub mod audit;
pub mod client_challenge;
pub mod engine;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{AuditResult, ReportPaths, ServiceReportRow};
pub use crate::domain::ports::{ConfigProvider, FastlyApi, Pipeline, Storage};
pub use crate::utils::error::Result;
