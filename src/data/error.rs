use thiserror::Error;

/// Typed failures of the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: '{raw}' is not a valid value for column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        raw: String,
    },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedType {
        column: &'static str,
        data_type: String,
    },

    #[error("dataset contains no rows")]
    Empty,
}
