pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{http::FastlyClient, storage::LocalStorage};
pub use config::{settings::AuditSettings, CliConfig};
pub use core::{audit::AuditPipeline, engine::AuditEngine};
pub use utils::error::{AuditError, Result};
