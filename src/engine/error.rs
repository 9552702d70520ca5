use crate::backend::BackendError;
use crate::model::{RuleType, TimerStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Index absent from the current snapshot.
    NotFound(u32),
    /// Timer fields do not describe a buildable rule.
    Untranslatable(RuleType),
    /// A strict backend write failed.
    Backend(BackendError),
    /// Refreshing the snapshot failed.
    Fetch(BackendError),
    /// The operation is refused in the occurrence's current state.
    Refused(&'static str),
    NotImplemented(&'static str),
}

impl EngineError {
    /// Status code reported to the host.
    pub fn status(&self) -> TimerStatus {
        match self {
            EngineError::NotImplemented(_) => TimerStatus::NotImplemented,
            _ => TimerStatus::Failed,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(index) => write!(f, "not found: {index}"),
            EngineError::Untranslatable(t) => write!(f, "rule of type {t:?} cannot be submitted"),
            EngineError::Backend(e) => write!(f, "backend write failed: {e}"),
            EngineError::Fetch(e) => write!(f, "refresh failed: {e}"),
            EngineError::Refused(why) => write!(f, "refused: {why}"),
            EngineError::NotImplemented(what) => write!(f, "not implemented: {what}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<BackendError> for EngineError {
    fn from(e: BackendError) -> Self {
        EngineError::Backend(e)
    }
}

/// Collapse an operation result into a host status code.
pub fn timer_status(result: &Result<(), EngineError>) -> TimerStatus {
    match result {
        Ok(()) => TimerStatus::Success,
        Err(e) => e.status(),
    }
}
