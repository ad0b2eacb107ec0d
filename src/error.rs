use crate::dataset::Strand;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    /// No usable primer selection yet; the frame is skipped
    #[error("no {strand} primer selected{}", unknown_name(.name))]
    SelectionMissing { strand: Strand, name: Option<String> },

    #[error("invalid record in {origin}: field '{field}' has value '{value}'")]
    InvalidRecord {
        origin: String,
        field: &'static str,
        value: String,
    },

    /// A scale was asked to map a zero-width interval
    #[error("degenerate {axis} domain [{lo}, {hi}]")]
    DegenerateDomain { axis: &'static str, lo: f64, hi: f64 },

    #[error("rendering backend rejected a command: {0}")]
    Backend(String),

    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),
}

fn unknown_name(name: &Option<String>) -> String {
    name.as_ref()
        .map(|name| format!(" (unknown name '{}')", name))
        .unwrap_or_default()
}

impl From<VizError> for String {
    fn from(err: VizError) -> Self {
        err.to_string()
    }
}
