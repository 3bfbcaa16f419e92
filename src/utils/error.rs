use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected response from {endpoint} (Status: {status}): {body}")]
    UnexpectedStatusError {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No services found for customer {customer_id}")]
    NoServicesError { customer_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AuditError::NoServicesError { .. } => ErrorSeverity::Low,
            AuditError::ApiError(_) | AuditError::UnexpectedStatusError { .. } => {
                ErrorSeverity::Medium
            }
            AuditError::ConfigError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::SerializationError(_)
            | AuditError::CsvError(_) => ErrorSeverity::High,
            AuditError::IoError(_) | AuditError::PatternError(_) => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the binary.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AuditError::ApiError(_) => "Check network connectivity and the --api-url value",
            AuditError::UnexpectedStatusError { status: 401, .. }
            | AuditError::UnexpectedStatusError { status: 403, .. } => {
                "Check that api_token is valid and has read access to the customer's services"
            }
            AuditError::UnexpectedStatusError { .. } => {
                "Check the customer_id and try again later"
            }
            AuditError::SerializationError(_) => {
                "The Fastly API returned a response that could not be parsed; check --api-url"
            }
            AuditError::ConfigError { .. } | AuditError::MissingConfigError { .. } => {
                "Provide a config.json with non-empty \"api_token\" and \"customer_id\" fields"
            }
            AuditError::InvalidConfigValueError { .. } => "Fix the value and run again",
            AuditError::NoServicesError { .. } => {
                "Verify the customer_id owns at least one service"
            }
            AuditError::CsvError(_) | AuditError::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            AuditError::PatternError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AuditError::ApiError(e) => format!("Could not reach the Fastly API: {}", e),
            AuditError::UnexpectedStatusError {
                endpoint, status, ..
            } => format!("Fastly API returned status {} for {}", status, endpoint),
            AuditError::MissingConfigError { field } => {
                format!("API token or Customer ID missing in config ({})", field)
            }
            AuditError::NoServicesError { .. } => {
                "No services found or API request failed.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
