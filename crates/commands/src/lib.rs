//! `storefront-commands` — keyed command execution with cancellation.
//!
//! A [`Command`] wraps an asynchronous operation factory and enforces a
//! concurrency discipline across repeated invocations of the same command
//! instance:
//!
//! - [`CommandStrategy::Parallel`] — every invocation runs independently.
//! - [`CommandStrategy::CancelPrevious`] — a new invocation supersedes any
//!   in-flight one; the superseded caller observes [`CommandError::Cancelled`]
//!   and its operation's eventual outcome is discarded.
//! - [`CommandStrategy::Queue`] — invocations run strictly in submission
//!   order with no overlap.
//!
//! Commands are created through [`CommandService::create`] (or
//! [`Command::new`] directly), live for the lifetime of the owning service,
//! and expose a [`busy`](Command::busy) signal so callers can reconcile UI
//! state even when a result was orphaned by cancellation.

pub mod command;
pub mod error;
pub mod service;
pub mod strategy;

pub use command::Command;
pub use error::{CommandError, CommandResult};
pub use service::{CommandOptions, CommandService};
pub use strategy::CommandStrategy;
