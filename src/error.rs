use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch in {context}: expected {expected}, got {got}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("model parameters are not initialized")]
    NotInitialized,

    #[error("backward pass requested before a forward pass")]
    NoForwardPass,

    #[error("{metric} is undefined: zero denominator")]
    UndefinedMetric { metric: &'static str },

    #[error("label {value} is not a binary class (0 or 1)")]
    InvalidLabel { value: f64 },

    #[error("dataset {0} contains no samples")]
    EmptyDataset(String),

    #[error("{dataset}: record {record} has non-numeric field {field:?}")]
    InvalidField {
        dataset: String,
        record: usize,
        field: String,
    },

    #[error("failed to render plot: {0}")]
    Plot(String),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Fails with [`Error::ShapeMismatch`] unless `got == expected`.
pub(crate) fn ensure_dim(context: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            context,
            expected,
            got,
        })
    }
}
