use clap::Parser;
use ngwaf_audit::config::LogFormat;
use ngwaf_audit::utils::logger;
use ngwaf_audit::{
    AuditEngine, AuditError, AuditPipeline, AuditSettings, CliConfig, FastlyClient, LocalStorage,
};

fn report_failure(e: &AuditError) -> ! {
    tracing::error!(
        "❌ Audit failed: {} (Severity: {:?})",
        e,
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("Error: {}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match AuditSettings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => report_failure(&e),
    };
    println!("Checking Customer ID: {}", settings.credentials.customer_id);

    let client = match FastlyClient::new(
        &settings.api_url,
        &settings.credentials.api_token,
        settings.timeout,
    ) {
        Ok(client) => client,
        Err(e) => report_failure(&e),
    };
    let storage = LocalStorage::new(settings.output_dir.clone());
    let pipeline = match AuditPipeline::new(storage, settings, client) {
        Ok(pipeline) => pipeline,
        Err(e) => report_failure(&e),
    };
    let engine = AuditEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            println!();
            println!("Report saved as: {}", summary.paths.timestamped);
            println!("Fixed report saved as: {}", summary.paths.latest);
            println!("Summary: {}", summary.tally);
        }
        Err(e @ AuditError::NoServicesError { .. }) => {
            tracing::warn!("{}", e);
            println!("{}", e.user_friendly_message());
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}
