use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the dashboard core.
///
/// Loading is the only fallible step: filtering and aggregation run over
/// in-memory data and cannot fail.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The dataset file is missing, unreadable, malformed or lacks a column.
    #[error("dataset unavailable ({}): {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },
}

impl DashboardError {
    /// Wrap a loader failure, keeping its whole context chain.
    pub fn data_unavailable(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
