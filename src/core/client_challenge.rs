use crate::domain::ports::FastlyApi;
use crate::utils::error::Result;
use regex::Regex;

pub const CLIENT_CHALLENGE_PRAGMA: &str = "pragma optional_param client_challenge_enabled true;";
const CLIENT_CHALLENGE_PATTERN: &str =
    r"(?i)pragma\s+optional_param\s+client_challenge_enabled\s+true\s*(?:;)?";
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PragmaMatch {
    Exact,
    Pattern,
}

/// Looks for the client challenge pragma in a version's VCL: uploaded files
/// first, then the generated VCL.
#[derive(Debug, Clone)]
pub struct ClientChallengeDetector {
    pattern: Regex,
}

impl ClientChallengeDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(CLIENT_CHALLENGE_PATTERN)?,
        })
    }

    pub fn find(&self, content: &str) -> Option<PragmaMatch> {
        if content.contains(CLIENT_CHALLENGE_PRAGMA) {
            Some(PragmaMatch::Exact)
        } else if self.pattern.is_match(content) {
            Some(PragmaMatch::Pattern)
        } else {
            None
        }
    }

    pub async fn detect<A: FastlyApi + ?Sized>(
        &self,
        api: &A,
        service_id: &str,
        version: u32,
    ) -> bool {
        match api.vcls(service_id, version).await {
            Ok(files) => {
                if files.is_empty() {
                    tracing::warn!(
                        "Empty VCL response for Service ID: {}, Version: {}",
                        service_id,
                        version
                    );
                }
                for file in &files {
                    if let Some(kind) = self.find(&file.content) {
                        tracing::info!(
                            "Client Challenge Enabled found in Service ID: {}, Version: {}, VCL: {} ({:?} match): {}",
                            service_id,
                            version,
                            file.name.as_deref().unwrap_or("<unnamed>"),
                            kind,
                            preview(&file.content)
                        );
                        return true;
                    }
                }
            }
            Err(e) => tracing::warn!(
                "Failed to retrieve VCL for Service ID: {}, Version: {}: {}",
                service_id,
                version,
                e
            ),
        }

        match api.generated_vcl(service_id, version).await {
            Ok(generated) => {
                if let Some(kind) = self.find(&generated.content) {
                    tracing::info!(
                        "Client Challenge Enabled found in Service ID: {}, Version: {}, Generated VCL ({:?} match)",
                        service_id,
                        version,
                        kind
                    );
                    return true;
                }
                tracing::debug!(
                    "Generated VCL inspected for {} v{}: {}",
                    service_id,
                    version,
                    preview(&generated.content)
                );
            }
            Err(e) => tracing::warn!(
                "Failed to retrieve Generated VCL for Service ID: {}, Version: {}: {}",
                service_id,
                version,
                e
            ),
        }

        tracing::info!(
            "Client Challenge Enabled NOT found in Service ID: {}, Version: {}",
            service_id,
            version
        );
        false
    }
}

fn preview(content: &str) -> String {
    let trimmed = content.trim();
    let mut out: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    if trimmed.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
