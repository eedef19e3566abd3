//! Explicit configuration for each batch entry point.

use std::path::PathBuf;
use std::time::Duration;

/// Input and output of the extraction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Source workbook.
    pub input: PathBuf,
    /// Intermediate JSON document to write.
    pub output: PathBuf,
}

/// Location and credential of the remote store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project URL; tables live under `<url>/rest/v1`.
    pub url: String,
    /// Service key, sent both as `apikey` and as the bearer token.
    pub service_key: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}

/// Fixed pauses after each remote write, keeping the import under the
/// store's rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePacing {
    /// After creating a user, the pod or a meeting.
    pub entity_delay: Duration,
    /// After creating a commitment or attendance row.
    pub row_delay: Duration,
}

impl WritePacing {
    /// No pauses at all.
    pub const NONE: WritePacing = WritePacing {
        entity_delay: Duration::ZERO,
        row_delay: Duration::ZERO,
    };
}

impl Default for WritePacing {
    fn default() -> Self {
        Self {
            entity_delay: Duration::from_millis(100),
            row_delay: Duration::from_millis(50),
        }
    }
}

/// Everything the load stages need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Intermediate JSON document produced by the extraction stage.
    pub input: PathBuf,
    pub store: StoreConfig,
    pub pacing: WritePacing,
}
