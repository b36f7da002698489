//! Command error taxonomy.

use std::time::Duration;

use thiserror::Error;

use storefront_core::DomainError;

/// Result type delivered to command callers.
pub type CommandResult<T> = Result<T, CommandError>;

/// Failure modes of a command invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A deterministic domain rejection (missing session/cart context, form
    /// validation) raised before the operation started.
    #[error("precondition failed: {0}")]
    Precondition(#[from] DomainError),

    /// The wrapped operation failed; the underlying cause is preserved
    /// verbatim.
    #[error("operation failed: {0}")]
    Failed(#[source] anyhow::Error),

    /// The invocation was superseded by a newer one under
    /// [`CancelPrevious`](crate::CommandStrategy::CancelPrevious).
    ///
    /// Surfaced explicitly so the original caller never hangs on an orphaned
    /// request. Work already dispatched to external systems is not rolled
    /// back; only outcome delivery is suppressed.
    #[error("cancelled: superseded by a newer invocation")]
    Cancelled,

    /// The invocation's timeout decorator fired before the operation settled.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

impl CommandError {
    /// Wrap an arbitrary operation failure, preserving the cause.
    pub fn failed(cause: impl Into<anyhow::Error>) -> Self {
        Self::Failed(cause.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
