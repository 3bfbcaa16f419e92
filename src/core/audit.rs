use crate::core::client_challenge::ClientChallengeDetector;
use crate::core::report::{render_csv, timestamped_report_name, LATEST_REPORT_FILE};
use crate::domain::model::{
    AuditResult, ReportPaths, ServiceDetails, ServiceReportRow, ServiceSummary, SnippetLookup,
    WafStatus, UNNAMED_SERVICE,
};
use crate::domain::ports::{ConfigProvider, FastlyApi, Pipeline, Storage};
use crate::utils::error::{AuditError, Result};
use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;

/// Lists a customer's services, checks each active version for the NGWAF
/// snippet and writes the findings to the two CSV reports.
pub struct AuditPipeline<S: Storage, C: ConfigProvider, A: FastlyApi> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) api: A,
    detector: Option<ClientChallengeDetector>,
    report_time: Option<NaiveDateTime>,
}

impl<S: Storage, C: ConfigProvider, A: FastlyApi> AuditPipeline<S, C, A> {
    pub fn new(storage: S, config: C, api: A) -> Result<Self> {
        let detector = if config.check_client_challenge() {
            Some(ClientChallengeDetector::new()?)
        } else {
            None
        };

        Ok(Self {
            storage,
            config,
            api,
            detector,
            report_time: None,
        })
    }

    /// Pins the timestamp used in the report file name instead of the
    /// local clock.
    pub fn with_report_time(mut self, at: NaiveDateTime) -> Self {
        self.report_time = Some(at);
        self
    }

    async fn audit_service(&self, service: &ServiceSummary) -> ServiceReportRow {
        tracing::info!("Processing Service ID: {}", service.id);

        let details = match self.api.service_details(&service.id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(
                    "Failed to retrieve details for Service ID: {}: {}",
                    service.id,
                    e
                );
                ServiceDetails::unavailable()
            }
        };

        let service_name = details
            .name
            .unwrap_or_else(|| UNNAMED_SERVICE.to_string());

        let (waf_status, client_challenge) = match details.active_version.number() {
            Some(version) => {
                let waf_status = match self
                    .api
                    .snippet(&service.id, version, self.config.snippet_name())
                    .await
                {
                    Ok(lookup) => {
                        if let SnippetLookup::Unexpected { status, body } = &lookup {
                            tracing::warn!(
                                "Snippet lookup for Service ID: {} failed (Status: {}): {}",
                                service.id,
                                status,
                                body
                            );
                        }
                        WafStatus::from(lookup)
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Snippet lookup for Service ID: {} failed: {}",
                            service.id,
                            e
                        );
                        WafStatus::Error { status: None }
                    }
                };
                let client_challenge = match &self.detector {
                    Some(detector) => Some(detector.detect(&self.api, &service.id, version).await),
                    None => None,
                };
                (waf_status, client_challenge)
            }
            None => (
                WafStatus::NoActiveVersion,
                self.detector.as_ref().map(|_| false),
            ),
        };

        ServiceReportRow {
            service_id: service.id.clone(),
            service_name,
            active_version: details.active_version,
            waf_status,
            client_challenge,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, A: FastlyApi> Pipeline for AuditPipeline<S, C, A> {
    async fn extract(&self) -> Result<Vec<ServiceSummary>> {
        let customer_id = self.config.customer_id();
        let page_size = self.config.page_size();
        let max_pages = self.config.max_pages();

        let mut services = Vec::new();
        let mut seen = HashSet::new();

        for page in 1..=max_pages {
            let batch = match self.api.list_services(customer_id, page, page_size).await {
                Ok(batch) => batch,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch services page {}: {} (keeping {} services already listed)",
                        page,
                        e,
                        services.len()
                    );
                    break;
                }
            };

            let fetched = batch.len();
            for service in batch {
                if service.id.is_empty() {
                    tracing::warn!("Skipping service with no ID: {:?}", service.name);
                    continue;
                }
                if !seen.insert(service.id.clone()) {
                    tracing::warn!("Skipping duplicate service ID: {}", service.id);
                    continue;
                }
                services.push(service);
            }

            tracing::info!(
                "Fetched {} services from page {} (Total so far: {})",
                fetched,
                page,
                services.len()
            );

            if fetched < page_size as usize {
                break;
            }
            if page == max_pages {
                tracing::warn!(
                    "Stopped listing after {} pages; raise --max-pages to include the rest",
                    max_pages
                );
            }
        }

        tracing::info!("Total services found: {}", services.len());

        if services.is_empty() {
            return Err(AuditError::NoServicesError {
                customer_id: customer_id.to_string(),
            });
        }
        Ok(services)
    }

    async fn transform(&self, services: Vec<ServiceSummary>) -> Result<AuditResult> {
        let mut rows = Vec::with_capacity(services.len());

        for service in &services {
            let row = self.audit_service(service).await;
            println!("{}", row.summary_line());
            rows.push(row);
        }

        let csv_output = render_csv(&rows, self.detector.is_some())?;
        Ok(AuditResult { rows, csv_output })
    }

    async fn load(&self, result: &AuditResult) -> Result<ReportPaths> {
        let at = self
            .report_time
            .unwrap_or_else(|| Local::now().naive_local());
        let timestamped = timestamped_report_name(at);

        for name in [timestamped.as_str(), LATEST_REPORT_FILE] {
            tracing::debug!("Writing {} ({} bytes)", name, result.csv_output.len());
            self.storage
                .write_file(name, result.csv_output.as_bytes())
                .await?;
        }

        Ok(ReportPaths {
            timestamped: self.storage.display_path(&timestamped),
            latest: self.storage.display_path(LATEST_REPORT_FILE),
        })
    }
}
