use crate::config::account::{AccountConfig, Credentials};
use crate::config::CliConfig;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_identifier, validate_path, validate_range, validate_url, Validate,
};
use std::time::Duration;

pub const MAX_PAGE_SIZE: u32 = 1000;

/// Everything one audit run needs: CLI flags merged with the account file.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub credentials: Credentials,
    pub api_url: String,
    pub output_dir: String,
    pub snippet_name: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub timeout: Duration,
    pub check_client_challenge: bool,
}

impl AuditSettings {
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let credentials = AccountConfig::load(&cli.config)?;
        let settings = Self::new(cli, credentials);
        settings.validate()?;
        Ok(settings)
    }

    pub fn new(cli: &CliConfig, credentials: Credentials) -> Self {
        Self {
            credentials,
            api_url: cli.api_url.clone(),
            output_dir: cli.output_dir.clone(),
            snippet_name: cli.snippet_name.clone(),
            page_size: cli.page_size,
            max_pages: cli.max_pages,
            timeout: Duration::from_secs(cli.timeout_secs),
            check_client_challenge: cli.check_client_challenge,
        }
    }
}

impl Validate for AuditSettings {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_identifier("snippet_name", &self.snippet_name)?;
        validate_range("page_size", self.page_size, 1, MAX_PAGE_SIZE)?;
        validate_range("max_pages", self.max_pages, 1, 10_000)?;
        validate_range("timeout_secs", self.timeout.as_secs(), 1, 600)?;
        Ok(())
    }
}

impl ConfigProvider for AuditSettings {
    fn customer_id(&self) -> &str {
        &self.credentials.customer_id
    }

    fn snippet_name(&self) -> &str {
        &self.snippet_name
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn check_client_challenge(&self) -> bool {
        self.check_client_challenge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn credentials() -> Credentials {
        Credentials {
            api_token: "tok".to_string(),
            customer_id: "cust1".to_string(),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let cli = CliConfig::try_parse_from(["ngwaf-audit"]).unwrap();
        let settings = AuditSettings::new(&cli, credentials());

        assert!(settings.validate().is_ok());
        assert_eq!(settings.customer_id(), "cust1");
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_out_of_range_page_size() {
        let cli = CliConfig::try_parse_from(["ngwaf-audit", "--page-size", "0"]).unwrap();
        assert!(AuditSettings::new(&cli, credentials()).validate().is_err());

        let cli = CliConfig::try_parse_from(["ngwaf-audit", "--page-size", "5000"]).unwrap();
        assert!(AuditSettings::new(&cli, credentials()).validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_api_url() {
        let cli =
            CliConfig::try_parse_from(["ngwaf-audit", "--api-url", "ftp://api.fastly.com"]).unwrap();
        assert!(AuditSettings::new(&cli, credentials()).validate().is_err());
    }

    #[test]
    fn test_from_cli_reads_account_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(br#"{"api_token": "tok", "customer_id": "cust9"}"#)
            .unwrap();
        let config_path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from(["ngwaf-audit", "--config", config_path.as_str()]).unwrap();
        let settings = AuditSettings::from_cli(&cli).unwrap();

        assert_eq!(settings.customer_id(), "cust9");
    }
}
