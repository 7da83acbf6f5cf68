use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unexpected collection shape in {path}: {detail}")]
    UnexpectedShape { path: String, detail: String },
}

impl EngineError {
    pub(crate) fn shape(path: impl Into<String>, detail: impl Into<String>) -> Self {
        EngineError::UnexpectedShape {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
