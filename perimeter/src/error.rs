use projection::{Crs, ProjectionError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PerimeterError {
    #[error("cannot open {}: {reason}", .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("layer {layer:?} not found{}", in_path(.path))]
    LayerNotFound {
        layer: String,
        path: Option<PathBuf>,
    },

    #[error("invalid year range {start}..{end}")]
    InvalidRange { start: i32, end: i32 },

    #[error("invalid year filter {0:?}, expected `Y`, `Y..` or `Y0..Y1`")]
    InvalidPredicate(String),

    #[error("unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("layer is in {expected} but a feature is in {found}")]
    MixedCrs { expected: Crs, found: Crs },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl From<ProjectionError> for PerimeterError {
    fn from(err: ProjectionError) -> Self {
        Self::UnsupportedCrs(err.to_string())
    }
}

impl PerimeterError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

fn in_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}
