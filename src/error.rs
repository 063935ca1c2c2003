//! Process-level errors. The projection engine itself never fails.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// A request asked for a horizon the server will not simulate.
    #[error("years must be at most {max}, got {got}")]
    HorizonTooLong { max: f64, got: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::HorizonTooLong { .. } => 400,
            Self::Io(_) | Self::Json(_) => 500,
        }
    }
}
