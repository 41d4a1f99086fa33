//! Cleanup backends and hooks

use async_trait::async_trait;
use fixturekit_common::CleanupStrategy;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::entities::GeneratedEntity;
use crate::error::DataResult;

/// Generated entities keyed by type label, in generation order
pub type Registry = BTreeMap<String, Vec<GeneratedEntity>>;

/// Error type returned by cleanup hooks
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// A registered cleanup callback
pub type CleanupHook = Box<dyn Fn() -> BoxFuture<'static, Result<(), HookError>> + Send + Sync>;

/// Removes generated data from an external system
#[async_trait]
pub trait CleanupBackend: Send + Sync {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Delete whatever the registry describes
    async fn cleanup(&self, registry: &Registry) -> DataResult<()>;
}

/// Backend that only reports what it would delete.
///
/// Stands in for database and API cleanup until a real backend is injected.
#[derive(Debug, Clone)]
pub struct LoggingBackend {
    name: String,
}

impl LoggingBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl CleanupBackend for LoggingBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn cleanup(&self, registry: &Registry) -> DataResult<()> {
        for (kind, entities) in registry {
            info!(backend = %self.name, "Would remove {} {}", entities.len(), kind);
        }
        Ok(())
    }
}

/// What a cleanup cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// Strategy after resolving `auto`
    pub strategy: CleanupStrategy,
    /// Backends invoked, in order
    pub backends: Vec<String>,
    /// Backends that returned an error
    pub backend_failures: Vec<String>,
    pub hook_count: usize,
    pub hook_failures: usize,
    /// Registry entries cleared at the end of the cycle
    pub entities_cleared: usize,
}

impl CleanupReport {
    /// True when no backend or hook failed
    pub fn is_clean(&self) -> bool {
        self.backend_failures.is_empty() && self.hook_failures == 0
    }
}
