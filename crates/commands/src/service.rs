//! Command factory.

use std::time::Duration;

use crate::command::Command;
use crate::error::CommandResult;
use crate::strategy::CommandStrategy;

/// Creation options for a [`Command`].
#[derive(Debug, Copy, Clone, Default)]
pub struct CommandOptions {
    pub strategy: CommandStrategy,
    /// Optional decorator racing the operation against a timer. Orthogonal to
    /// the cancellation contract.
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    pub fn with_strategy(mut self, strategy: CommandStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Factory for [`Command`]s.
///
/// Feature services hold one `CommandService` and create their commands at
/// construction time, one per logical operation. The service itself carries
/// no state; it exists so command creation reads the same everywhere and has
/// one place to grow cross-cutting defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandService;

impl CommandService {
    pub fn new() -> Self {
        Self
    }

    /// Create a command bound to `factory` with the given options.
    pub fn create<I, O, F, Fut>(&self, factory: F, options: CommandOptions) -> Command<I, O>
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult<O>> + Send + 'static,
    {
        Command::new(factory, options)
    }
}
