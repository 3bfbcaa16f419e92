use crate::domain::model::AuditSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct AuditEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AuditEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<AuditSummary> {
        tracing::info!("Listing services...");
        let services = self.pipeline.extract().await?;

        tracing::info!("Checking {} services...", services.len());
        let result = self.pipeline.transform(services).await?;

        let tally = result.tally();
        tracing::info!("Checked {}", tally);

        let paths = self.pipeline.load(&result).await?;
        tracing::info!("Reports written to {} and {}", paths.timestamped, paths.latest);

        Ok(AuditSummary { paths, tally })
    }
}
