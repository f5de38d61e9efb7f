use thiserror::Error;

/// Errors raised by the data layer and configuration.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("column '{0}' is not present in the data")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("column '{column}' has {found} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
