//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections and worker coordination failures so clients can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{BattleError, ErrorSeverity, InputError, SetupError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker stopped without reporting an outcome")]
    OutcomeChannelClosed,

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("party policy failed: {reason}")]
    Policy { reason: String },
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(e) => e.severity(),
            Self::Input(e) => e.severity(),
            Self::Policy { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Fatal,
        }
    }

    /// The engine rejection behind this error, if any.
    pub fn as_input(&self) -> Option<&InputError> {
        match self {
            Self::Input(e) => Some(e),
            _ => None,
        }
    }
}
