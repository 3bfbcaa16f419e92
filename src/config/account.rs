use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{validate_identifier, validate_required_field};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const TOKEN_ENV: &str = "FASTLY_API_TOKEN";
pub const CUSTOMER_ENV: &str = "FASTLY_CUSTOMER_ID";

/// Contents of the account file, `{ "api_token": ..., "customer_id": ... }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Clone)]
pub struct Credentials {
    pub api_token: String,
    pub customer_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("customer_id", &self.customer_id)
            .finish()
    }
}

impl AccountConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AuditError::ConfigError {
                message: format!("Config file '{}' not found.", path.display()),
            },
            _ => AuditError::IoError(e),
        })?;

        serde_json::from_str(&content).map_err(|e| AuditError::ConfigError {
            message: format!("Invalid JSON in '{}': {}", path.display(), e),
        })
    }

    /// Loads the file at `path` and applies environment overrides. The file
    /// may be absent when both values come from the environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Credentials> {
        let token = std::env::var(TOKEN_ENV).ok();
        let customer = std::env::var(CUSTOMER_ENV).ok();

        let base = if token.is_some() && customer.is_some() && !path.as_ref().exists() {
            tracing::debug!("Using credentials from {} and {}", TOKEN_ENV, CUSTOMER_ENV);
            AccountConfig::default()
        } else {
            AccountConfig::from_file(&path)?
        };

        base.with_overrides(token, customer).into_credentials()
    }

    pub fn with_overrides(mut self, api_token: Option<String>, customer_id: Option<String>) -> Self {
        if let Some(token) = api_token.filter(|t| !t.trim().is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(customer) = customer_id.filter(|c| !c.trim().is_empty()) {
            self.customer_id = Some(customer);
        }
        self
    }

    pub fn into_credentials(self) -> Result<Credentials> {
        let api_token = self.api_token.filter(|t| !t.trim().is_empty());
        let customer_id = self.customer_id.filter(|c| !c.trim().is_empty());

        let api_token = validate_required_field("api_token", &api_token)?.trim().to_string();
        let customer_id = validate_required_field("customer_id", &customer_id)?
            .trim()
            .to_string();
        validate_identifier("customer_id", &customer_id)?;

        Ok(Credentials {
            api_token,
            customer_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_account_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(br#"{"api_token": "tok123", "customer_id": "cust1"}"#)
            .unwrap();

        let credentials = AccountConfig::from_file(temp_file.path())
            .unwrap()
            .into_credentials()
            .unwrap();

        assert_eq!(credentials.api_token, "tok123");
        assert_eq!(credentials.customer_id, "cust1");
        assert!(!format!("{:?}", credentials).contains("tok123"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = AccountConfig::from_file("/nonexistent/ngwaf/config.json").unwrap_err();
        match err {
            AuditError::ConfigError { message } => assert!(message.contains("not found")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ api_token: ").unwrap();

        let err = AccountConfig::from_file(temp_file.path()).unwrap_err();
        match err {
            AuditError::ConfigError { message } => assert!(message.starts_with("Invalid JSON")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        let config: AccountConfig =
            serde_json::from_str(r#"{"api_token": "  ", "customer_id": "cust1"}"#).unwrap();
        match config.into_credentials() {
            Err(AuditError::MissingConfigError { field }) => assert_eq!(field, "api_token"),
            other => panic!("unexpected result: {:?}", other),
        }

        let config: AccountConfig = serde_json::from_str(r#"{"api_token": "tok"}"#).unwrap();
        match config.into_credentials() {
            Err(AuditError::MissingConfigError { field }) => assert_eq!(field, "customer_id"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = AccountConfig {
            api_token: Some("file-token".to_string()),
            customer_id: Some("file-cust".to_string()),
        };

        let credentials = config
            .with_overrides(Some("env-token".to_string()), Some(String::new()))
            .into_credentials()
            .unwrap();

        assert_eq!(credentials.api_token, "env-token");
        assert_eq!(credentials.customer_id, "file-cust");
    }

    #[test]
    fn test_customer_id_must_be_path_safe() {
        let config = AccountConfig {
            api_token: Some("tok".to_string()),
            customer_id: Some("cust/../x".to_string()),
        };
        assert!(matches!(
            config.into_credentials(),
            Err(AuditError::InvalidConfigValueError { .. })
        ));
    }
}
