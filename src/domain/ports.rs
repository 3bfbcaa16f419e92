use crate::domain::model::{
    AuditResult, ReportPaths, ServiceDetails, ServiceSummary, SnippetLookup,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Location of `path` as shown to the user.
    fn display_path(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn customer_id(&self) -> &str;
    fn snippet_name(&self) -> &str;
    fn page_size(&self) -> u32;
    fn max_pages(&self) -> u32;
    fn check_client_challenge(&self) -> bool;
}

/// VCL source attached to a service version.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct VclFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Read-only view of the Fastly API used by the audit.
#[async_trait]
pub trait FastlyApi: Send + Sync {
    /// One page of the customer's services. Entries without an id are
    /// returned with an empty id so callers can report them.
    async fn list_services(
        &self,
        customer_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ServiceSummary>>;

    async fn service_details(&self, service_id: &str) -> Result<ServiceDetails>;

    async fn snippet(
        &self,
        service_id: &str,
        version: u32,
        snippet_name: &str,
    ) -> Result<SnippetLookup>;

    async fn vcls(&self, service_id: &str, version: u32) -> Result<Vec<VclFile>>;

    async fn generated_vcl(&self, service_id: &str, version: u32) -> Result<VclFile>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ServiceSummary>>;
    async fn transform(&self, services: Vec<ServiceSummary>) -> Result<AuditResult>;
    async fn load(&self, result: &AuditResult) -> Result<ReportPaths>;
}
