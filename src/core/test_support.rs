//! In-memory doubles for the domain ports.

use crate::domain::model::{ServiceDetails, ServiceSummary, SnippetLookup};
use crate::domain::ports::{ConfigProvider, FastlyApi, Storage, VclFile};
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockStorage {
    files: Arc<tokio::sync::Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned()
    }

    pub async fn file_names(&self) -> Vec<String> {
        let files = self.files.lock().await;
        let mut names: Vec<String> = files.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Storage for MockStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn display_path(&self, path: &str) -> String {
        format!("mem://{}", path)
    }
}

pub struct MockConfig {
    pub customer_id: String,
    pub snippet_name: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub check_client_challenge: bool,
}

impl MockConfig {
    pub fn new(page_size: u32) -> Self {
        Self {
            customer_id: "cust1".to_string(),
            snippet_name: "ngwaf_config_init".to_string(),
            page_size,
            max_pages: 100,
            check_client_challenge: false,
        }
    }
}

impl ConfigProvider for MockConfig {
    fn customer_id(&self) -> &str {
        &self.customer_id
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

/// Canned Fastly API. Unknown details fail with 404, unknown snippets are
/// reported as absent, unknown VCL lookups fail with 404.
#[derive(Default)]
pub struct MockApi {
    pub pages: Vec<Vec<ServiceSummary>>,
    pub failing_page: Option<u32>,
    pub details: HashMap<String, ServiceDetails>,
    pub snippets: HashMap<(String, u32), SnippetLookup>,
    /// Services whose snippet lookup fails before any response arrives.
    pub unreachable_snippets: HashSet<String>,
    pub vcls: HashMap<(String, u32), Vec<VclFile>>,
    pub generated: HashMap<(String, u32), String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn not_found(endpoint: String) -> AuditError {
        AuditError::UnexpectedStatusError {
            endpoint,
            status: 404,
            body: "{\"msg\":\"Record not found\"}".to_string(),
        }
    }
}

pub fn service(id: &str, name: &str) -> ServiceSummary {
    ServiceSummary {
        id: id.to_string(),
        name: Some(name.to_string()),
    }
}

#[async_trait]
impl FastlyApi for MockApi {
    async fn list_services(
        &self,
        customer_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ServiceSummary>> {
        self.record(format!("list {} {} {}", customer_id, page, page_size));
        if self.failing_page == Some(page) {
            return Err(AuditError::UnexpectedStatusError {
                endpoint: "/services".to_string(),
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }

    async fn service_details(&self, service_id: &str) -> Result<ServiceDetails> {
        self.record(format!("details {}", service_id));
        self.details
            .get(service_id)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("/service/{}/details", service_id)))
    }

    async fn snippet(
        &self,
        service_id: &str,
        version: u32,
        snippet_name: &str,
    ) -> Result<SnippetLookup> {
        self.record(format!("snippet {} {} {}", service_id, version, snippet_name));
        if self.unreachable_snippets.contains(service_id) {
            return Err(AuditError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        Ok(self
            .snippets
            .get(&(service_id.to_string(), version))
            .cloned()
            .unwrap_or(SnippetLookup::NotFound))
    }

    async fn vcls(&self, service_id: &str, version: u32) -> Result<Vec<VclFile>> {
        self.record(format!("vcl {} {}", service_id, version));
        self.vcls
            .get(&(service_id.to_string(), version))
            .cloned()
            .ok_or_else(|| Self::not_found(format!("/service/{}/version/{}/vcl", service_id, version)))
    }

    async fn generated_vcl(&self, service_id: &str, version: u32) -> Result<VclFile> {
        self.record(format!("generated_vcl {} {}", service_id, version));
        self.generated
            .get(&(service_id.to_string(), version))
            .map(|content| VclFile {
                name: None,
                content: content.clone(),
            })
            .ok_or_else(|| {
                Self::not_found(format!(
                    "/service/{}/version/{}/generated_vcl",
                    service_id, version
                ))
            })
    }
}
