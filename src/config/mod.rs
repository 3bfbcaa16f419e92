pub mod account;
pub mod settings;

use crate::adapters::http::DEFAULT_API_URL;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_SNIPPET_NAME: &str = "ngwaf_config_init";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "ngwaf-audit")]
#[command(about = "Report NGWAF snippet coverage across a Fastly customer's services")]
pub struct CliConfig {
    /// JSON file holding "api_token" and "customer_id"
    #[arg(long, env = "NGWAF_AUDIT_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Directory the CSV reports are written to
    #[arg(long, default_value = ".")]
    pub output_dir: String,

    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// VCL snippet whose presence marks NGWAF as deployed
    #[arg(long, default_value = DEFAULT_SNIPPET_NAME)]
    pub snippet_name: String,

    #[arg(long, default_value_t = 100)]
    pub page_size: u32,

    /// Upper bound on service listing pages fetched
    #[arg(long, default_value_t = 100)]
    pub max_pages: u32,

    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Also scan the active VCL for the client challenge pragma
    #[arg(long)]
    pub check_client_challenge: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_without_flags() {
        let cli = CliConfig::try_parse_from(["ngwaf-audit"]).unwrap();
        assert_eq!(cli.output_dir, ".");
        assert_eq!(cli.api_url, "https://api.fastly.com");
        assert_eq!(cli.snippet_name, "ngwaf_config_init");
        assert_eq!(cli.page_size, 100);
        assert!(!cli.check_client_challenge);
        assert_eq!(cli.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_parses_overrides() {
        let cli = CliConfig::try_parse_from([
            "ngwaf-audit",
            "--config",
            "/etc/ngwaf/account.json",
            "--page-size",
            "25",
            "--check-client-challenge",
            "--log-format",
            "json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/ngwaf/account.json"));
        assert_eq!(cli.page_size, 25);
        assert!(cli.check_client_challenge);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.verbose);
    }
}
