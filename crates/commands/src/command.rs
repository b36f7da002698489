//! The command primitive: one operation factory, one concurrency discipline.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{CommandError, CommandResult};
use crate::service::CommandOptions;
use crate::strategy::CommandStrategy;

type OperationFactory<I, O> =
    Arc<dyn Fn(I) -> BoxFuture<'static, CommandResult<O>> + Send + Sync>;

/// An asynchronous operation wrapper enforcing a concurrency strategy across
/// repeated invocations.
///
/// A `Command` is created once (typically at service construction), owned by
/// the component that created it, and lives as long as that component. Every
/// call to [`execute`](Command::execute) invokes the wrapped factory subject
/// to the command's [`CommandStrategy`].
///
/// ## Cancellation
///
/// Cancellation is cooperative. Under `CancelPrevious`, replacing the active
/// cancellation token is the sole mutation point; it happens synchronously
/// before the new invocation starts, so at most one invocation's outcome is
/// ever deliverable. The superseded caller resolves with
/// [`CommandError::Cancelled`] rather than hanging on an orphaned request.
/// Side effects the operation already dispatched externally are not undone.
pub struct Command<I, O> {
    factory: OperationFactory<I, O>,
    strategy: CommandStrategy,
    timeout: Option<Duration>,
    /// Token of the in-flight invocation (`CancelPrevious` bookkeeping).
    active: StdMutex<Option<CancellationToken>>,
    /// FIFO turn-taking for the `Queue` strategy (tokio mutexes are fair).
    turn: AsyncMutex<()>,
    in_flight: Arc<InFlight>,
}

impl<I, O> Command<I, O> {
    /// Wrap `factory` with the given options.
    ///
    /// Prefer [`CommandService::create`](crate::CommandService::create) in
    /// application code; this constructor exists for direct/embedded use.
    pub fn new<F, Fut>(factory: F, options: CommandOptions) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult<O>> + Send + 'static,
    {
        let (busy, _) = watch::channel(false);
        Self {
            factory: Arc::new(move |input| Box::pin(factory(input))),
            strategy: options.strategy,
            timeout: options.timeout,
            active: StdMutex::new(None),
            turn: AsyncMutex::new(()),
            in_flight: Arc::new(InFlight {
                count: StdMutex::new(0),
                busy,
            }),
        }
    }

    pub fn strategy(&self) -> CommandStrategy {
        self.strategy
    }

    /// Live busy signal: `true` while at least one invocation is executing.
    ///
    /// Lets callers reconcile UI state (spinners, disabled buttons) even when
    /// their own result was orphaned by cancellation.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.in_flight.busy.subscribe()
    }

    /// Invoke the wrapped operation according to the command's strategy.
    pub async fn execute(&self, input: I) -> CommandResult<O> {
        match self.strategy {
            CommandStrategy::Parallel => self.invoke(input, None).await,
            CommandStrategy::CancelPrevious => {
                let token = CancellationToken::new();
                let superseded = {
                    let mut active = lock(&self.active);
                    active.replace(token.clone())
                };
                if let Some(previous) = superseded {
                    debug!("superseding in-flight invocation");
                    previous.cancel();
                }
                self.invoke(input, Some(token)).await
            }
            CommandStrategy::Queue => {
                let _turn = self.turn.lock().await;
                self.invoke(input, None).await
            }
        }
    }

    async fn invoke(&self, input: I, cancel: Option<CancellationToken>) -> CommandResult<O> {
        let _guard = InFlightGuard::enter(self.in_flight.clone());
        let operation = (self.factory)(input);

        let outcome = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, operation).await {
                    Ok(result) => result,
                    Err(_) => Err(CommandError::TimedOut(limit)),
                },
                None => operation.await,
            }
        };

        match cancel {
            // biased: when supersession and completion race, cancellation wins,
            // so a stale outcome is never delivered.
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(CommandError::Cancelled),
                outcome = outcome => outcome,
            },
            None => outcome.await,
        }
    }
}

impl<I, O> core::fmt::Debug for Command<I, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Command")
            .field("strategy", &self.strategy)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Shared in-flight accounting behind the busy signal.
#[derive(Debug)]
struct InFlight {
    count: StdMutex<usize>,
    busy: watch::Sender<bool>,
}

/// Drop guard so the busy signal stays correct even when a caller drops its
/// `execute` future mid-await.
struct InFlightGuard {
    inner: Arc<InFlight>,
}

impl InFlightGuard {
    fn enter(inner: Arc<InFlight>) -> Self {
        {
            let mut count = lock(&inner.count);
            *count += 1;
            if *count == 1 {
                inner.busy.send_replace(true);
            }
        }
        Self { inner }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut count = lock(&self.inner.count);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.inner.busy.send_replace(false);
        }
    }
}

fn lock<T>(mutex: &StdMutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::service::CommandService;

    fn delayed(
        delay: Duration,
        value: &'static str,
    ) -> impl Future<Output = CommandResult<&'static str>> + Send {
        async move {
            sleep(delay).await;
            Ok(value)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_previous_delivers_only_the_latest_outcome() {
        // The first operation takes longer and would settle with "orderA";
        // the second settles quickly with "orderB". Only "orderB" may be
        // observed; the first caller gets an explicit cancellation.
        let command = Arc::new(CommandService::new().create(
            |(delay, value)| delayed(delay, value),
            CommandOptions::default(),
        ));

        let first = {
            let command = command.clone();
            tokio::spawn(
                async move { command.execute((Duration::from_millis(50), "orderA")).await },
            )
        };
        tokio::task::yield_now().await;

        let second = command
            .execute((Duration::from_millis(10), "orderB"))
            .await;

        assert_eq!(second.unwrap(), "orderB");
        let first = first.await.unwrap();
        assert!(matches!(first, Err(CommandError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_previous_single_invocation_completes_normally() {
        let command: Command<(Duration, &'static str), &'static str> =
            Command::new(|(d, v)| delayed(d, v), CommandOptions::default());

        let result = command
            .execute((Duration::from_millis(5), "order"))
            .await;
        assert_eq!(result.unwrap(), "order");
    }

    #[tokio::test(start_paused = true)]
    async fn parallel_invocations_are_independent() {
        let command = Arc::new(Command::new(
            |(delay, value)| delayed(delay, value),
            CommandOptions::default().with_strategy(CommandStrategy::Parallel),
        ));

        let slow = {
            let command = command.clone();
            tokio::spawn(async move { command.execute((Duration::from_millis(50), "slow")).await })
        };
        let fast = {
            let command = command.clone();
            tokio::spawn(async move { command.execute((Duration::from_millis(10), "fast")).await })
        };

        assert_eq!(fast.await.unwrap().unwrap(), "fast");
        assert_eq!(slow.await.unwrap().unwrap(), "slow");
    }

    #[tokio::test(start_paused = true)]
    async fn queue_runs_in_submission_order_without_overlap() {
        let trace: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let command = {
            let trace = trace.clone();
            Arc::new(Command::new(
                move |name: &'static str| {
                    let trace = trace.clone();
                    async move {
                        trace.lock().unwrap().push(format!("start-{name}"));
                        sleep(Duration::from_millis(10)).await;
                        trace.lock().unwrap().push(format!("end-{name}"));
                        Ok(name)
                    }
                },
                CommandOptions::default().with_strategy(CommandStrategy::Queue),
            ))
        };

        let mut handles = Vec::new();
        for name in ["A", "B", "C"] {
            let command = command.clone();
            handles.push(tokio::spawn(async move { command.execute(name).await }));
            // Pin down submission order before the next spawn.
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let trace = trace.lock().unwrap();
        assert_eq!(
            *trace,
            vec!["start-A", "end-A", "start-B", "end-B", "start-C", "end-C"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn busy_signal_tracks_in_flight_work() {
        let command = Arc::new(Command::new(
            |(d, v)| delayed(d, v),
            CommandOptions::default(),
        ));
        let busy = command.busy();
        assert!(!*busy.borrow());

        let run = {
            let command = command.clone();
            tokio::spawn(async move { command.execute((Duration::from_millis(20), "x")).await })
        };
        tokio::task::yield_now().await;
        assert!(*busy.borrow());

        run.await.unwrap().unwrap();
        assert!(!*busy.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn busy_signal_clears_after_cancellation() {
        let command = Arc::new(Command::new(
            |(d, v)| delayed(d, v),
            CommandOptions::default(),
        ));
        let busy = command.busy();

        let first = {
            let command = command.clone();
            tokio::spawn(async move { command.execute((Duration::from_millis(50), "a")).await })
        };
        tokio::task::yield_now().await;
        assert!(*busy.borrow());

        command
            .execute((Duration::from_millis(5), "b"))
            .await
            .unwrap();
        assert!(first.await.unwrap().is_err());
        assert!(!*busy.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_decorator_fires_before_slow_operations() {
        let command: Command<(Duration, &'static str), &'static str> = Command::new(
            |(d, v)| delayed(d, v),
            CommandOptions::default().with_timeout(Duration::from_millis(10)),
        );

        let result = command.execute((Duration::from_millis(100), "late")).await;
        assert!(matches!(result, Err(CommandError::TimedOut(_))));

        let result = command.execute((Duration::from_millis(5), "fast")).await;
        assert_eq!(result.unwrap(), "fast");
    }

    #[tokio::test]
    async fn operation_failure_preserves_the_cause() {
        let command: Command<(), ()> = Command::new(
            |_| async { Err(CommandError::failed(anyhow::anyhow!("backend rejected"))) },
            CommandOptions::default(),
        );

        let err = command.execute(()).await.unwrap_err();
        match err {
            CommandError::Failed(cause) => {
                assert!(cause.to_string().contains("backend rejected"))
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
