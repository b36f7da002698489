//! Concurrency strategies for repeated command invocations.

/// How a [`Command`](crate::Command) treats overlapping invocations.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CommandStrategy {
    /// Every invocation runs unconditionally; outcomes are delivered to their
    /// own caller only, uncorrelated with each other.
    Parallel,

    /// A new invocation cancels any in-flight one before starting. Only the
    /// most recently started invocation's outcome is ever deliverable; the
    /// superseded caller observes a cancellation, never a stale result.
    ///
    /// This is the default: the strategy checkout flows exercise for
    /// submit-style operations where only the latest submission matters.
    #[default]
    CancelPrevious,

    /// Invocations wait for the current one to complete, then run in
    /// submission order. No overlap.
    Queue,
}
