use crate::config::ConfigError;
use crate::export::ExportError;
use crate::layout::LayoutError;
use crate::schema::SchemaError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("No schema found (searched {})", display_paths(.searched))]
    NoSchemaFound { searched: Vec<PathBuf> },
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cannot serialize diagram: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
