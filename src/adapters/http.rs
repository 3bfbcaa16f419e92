use crate::domain::model::{ServiceDetails, ServiceSummary, SnippetLookup};
use crate::domain::ports::{FastlyApi, VclFile};
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.fastly.com";

/// Async client for the subset of the Fastly API the audit needs.
/// All calls are plain GETs authenticated with the `Fastly-Key` header.
#[derive(Debug, Clone)]
pub struct FastlyClient {
    client: Client,
    base_url: String,
}

struct ApiResponse {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceListing {
    Bare(Vec<ServiceEntry>),
    Document {
        #[serde(default)]
        data: Vec<ServiceEntry>,
    },
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    attributes: Option<ServiceAttributes>,
}

#[derive(Debug, Deserialize)]
struct ServiceAttributes {
    #[serde(default)]
    name: Option<String>,
}

impl From<ServiceEntry> for ServiceSummary {
    fn from(entry: ServiceEntry) -> Self {
        let name = entry.attributes.and_then(|a| a.name).or(entry.name);
        ServiceSummary {
            id: entry.id.unwrap_or_default(),
            name,
        }
    }
}

impl FastlyClient {
    pub fn new(base_url: &str, api_token: &str, timeout: Duration) -> Result<Self> {
        let mut token = HeaderValue::from_str(api_token).map_err(|e| {
            AuditError::InvalidConfigValueError {
                field: "api_token".to_string(),
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            }
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("fastly-key"), token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("ngwaf-audit/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            tracing::debug!("API call to {} succeeded (Status: {})", url, status.as_u16());
        } else {
            tracing::debug!("API call to {} failed (Status: {}): {}", url, status.as_u16(), body);
        }

        Ok(ApiResponse { status, body })
    }

    async fn get_ok(&self, endpoint: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self.get(endpoint, query).await?;
        if !response.status.is_success() {
            return Err(AuditError::UnexpectedStatusError {
                endpoint: endpoint.to_string(),
                status: response.status.as_u16(),
                body: response.body,
            });
        }
        Ok(response.body)
    }
}

#[async_trait]
impl FastlyApi for FastlyClient {
    async fn list_services(
        &self,
        customer_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ServiceSummary>> {
        let query = [
            ("filter[customer_id]", customer_id.to_string()),
            ("page[number]", page.to_string()),
            ("page[size]", page_size.to_string()),
        ];
        let body = self.get_ok("/services", &query).await?;

        let entries = match serde_json::from_str::<ServiceListing>(&body)? {
            ServiceListing::Bare(entries) => entries,
            ServiceListing::Document { data } => data,
        };
        Ok(entries.into_iter().map(ServiceSummary::from).collect())
    }

    async fn service_details(&self, service_id: &str) -> Result<ServiceDetails> {
        let body = self
            .get_ok(&format!("/service/{}/details", service_id), &[])
            .await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(ServiceDetails::from_json(&value))
    }

    async fn snippet(
        &self,
        service_id: &str,
        version: u32,
        snippet_name: &str,
    ) -> Result<SnippetLookup> {
        let endpoint = format!(
            "/service/{}/version/{}/snippet/{}",
            service_id, version, snippet_name
        );
        let response = self.get(&endpoint, &[]).await?;

        Ok(match response.status {
            StatusCode::OK => SnippetLookup::Found,
            StatusCode::NOT_FOUND => SnippetLookup::NotFound,
            status => SnippetLookup::Unexpected {
                status: status.as_u16(),
                body: response.body,
            },
        })
    }

    async fn vcls(&self, service_id: &str, version: u32) -> Result<Vec<VclFile>> {
        let body = self
            .get_ok(&format!("/service/{}/version/{}/vcl", service_id, version), &[])
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn generated_vcl(&self, service_id: &str, version: u32) -> Result<VclFile> {
        let body = self
            .get_ok(
                &format!("/service/{}/version/{}/generated_vcl", service_id, version),
                &[],
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}
