use thiserror::Error;

/// Failure taxonomy for user-triggered operations. Every variant is terminal
/// for the action that produced it. There are no retries anywhere.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("gateway returned HTTP {status}: {reason}")]
    Gateway { status: u16, reason: String },
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DeskError {
    pub fn is_validation(&self) -> bool {
        return matches!(self, DeskError::Validation(_));
    }
}
