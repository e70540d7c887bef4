//! Lifecycle supervision for the daemon's concurrent actors.
//!
//! A fixed set of actors runs under one shared cancellation domain. The
//! first actor to return triggers draining: the cancellation signal flips
//! exactly once, every other actor observes it and returns, and `run` joins
//! them all before reporting the trigger's result. Nothing is forcibly
//! terminated and no task outlives `run`.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Error returned by a supervised actor.
#[derive(Debug, Error)]
pub enum ActorError {
    /// The actor observed cancellation and unwound without finishing its
    /// work. Normal while draining; suspicious as a drain trigger.
    #[error("cancelled")]
    Cancelled,

    /// The actor failed.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Terminal supervision error.
#[derive(Debug, Error)]
pub enum SupervisionError {
    #[error("actor '{actor}' failed: {source:#}")]
    ActorFailed {
        actor: &'static str,
        source: anyhow::Error,
    },

    /// An actor reported cancellation before any interrupt was propagated.
    /// That cancellation cannot have come from the supervisor, so it is
    /// surfaced instead of being folded into a clean shutdown.
    #[error("actor '{actor}' cancelled outside of shutdown")]
    UnexpectedCancellation { actor: &'static str },

    #[error("actor panicked: {0}")]
    Panicked(#[from] tokio::task::JoinError),
}

/// Handle an actor uses to observe the shared cancellation signal.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Resolves once draining has begun; immediately if it already has.
    ///
    /// A dropped supervisor counts as shutdown, so this never blocks a
    /// drained actor forever.
    pub async fn recv(&mut self) {
        let _ = self.rx.wait_for(|draining| *draining).await;
    }

    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }
}

type ActorFuture = Pin<Box<dyn Future<Output = Result<(), ActorError>> + Send>>;
type ActorFn = Box<dyn FnOnce(Shutdown) -> ActorFuture + Send>;

/// Supervises a fixed set of concurrent actors.
///
/// Register actors with [`Supervisor::add`], then call [`Supervisor::run`].
/// `run` consumes the supervisor, so the actor set is closed before anything
/// starts.
pub struct Supervisor {
    actors: Vec<(&'static str, ActorFn)>,
    shutdown_tx: watch::Sender<bool>,
}

impl Supervisor {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            actors: Vec::new(),
            shutdown_tx,
        }
    }

    /// Registers a named actor.
    ///
    /// The actor receives a [`Shutdown`] handle and must return promptly
    /// once it resolves.
    pub fn add<F, Fut>(&mut self, name: &'static str, actor: F)
    where
        F: FnOnce(Shutdown) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), ActorError>> + Send + 'static,
    {
        self.actors
            .push((name, Box::new(move |shutdown| Box::pin(actor(shutdown)))));
    }

    /// Runs every actor to completion and returns the trigger's result.
    ///
    /// Results of actors that return during draining are discarded apart
    /// from diagnostics; a panic anywhere surfaces as
    /// [`SupervisionError::Panicked`].
    pub async fn run(self) -> Result<(), SupervisionError> {
        let Self {
            actors,
            shutdown_tx,
        } = self;

        let mut set: JoinSet<(&'static str, Result<(), ActorError>)> = JoinSet::new();
        for (name, actor) in actors {
            let shutdown = Shutdown {
                rx: shutdown_tx.subscribe(),
            };
            set.spawn(async move { (name, actor(shutdown).await) });
        }

        let Some(first) = set.join_next().await else {
            return Ok(());
        };

        // Draining starts here, at most once. Concurrent returns serialize
        // through join_next, so only this result is the trigger.
        shutdown_tx.send_replace(true);

        let outcome = match first {
            Ok((name, result)) => {
                debug!(actor = name, "first actor returned, draining the rest");
                match result {
                    Ok(()) => Ok(()),
                    Err(ActorError::Cancelled) => {
                        Err(SupervisionError::UnexpectedCancellation { actor: name })
                    }
                    Err(ActorError::Failed(source)) => {
                        Err(SupervisionError::ActorFailed { actor: name, source })
                    }
                }
            }
            Err(join_err) => Err(SupervisionError::Panicked(join_err)),
        };

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((name, Ok(()))) => debug!(actor = name, "actor stopped"),
                Ok((name, Err(ActorError::Cancelled))) => {
                    debug!(actor = name, "actor cancelled during drain");
                }
                Ok((name, Err(err))) => {
                    warn!(actor = name, error = %err, "actor error discarded during drain");
                }
                Err(join_err) => {
                    warn!(error = %join_err, "actor panicked during drain");
                }
            }
        }

        outcome
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::anyhow;

    #[tokio::test]
    async fn failing_actor_interrupts_the_blocking_actor() {
        let drained = Arc::new(AtomicBool::new(false));
        let drained_probe = drained.clone();

        let mut supervisor = Supervisor::new();
        supervisor.add("failer", |_shutdown| async move {
            Err(ActorError::Failed(anyhow!("boom")))
        });
        supervisor.add("blocker", move |mut shutdown| async move {
            // Blocks forever unless interrupted.
            shutdown.recv().await;
            drained_probe.store(true, Ordering::SeqCst);
            Ok(())
        });

        let err = tokio::time::timeout(Duration::from_secs(5), supervisor.run())
            .await
            .expect("run did not return")
            .unwrap_err();

        assert!(matches!(
            err,
            SupervisionError::ActorFailed { actor: "failer", .. }
        ));
        // run returns only after the blocker observed the interrupt.
        assert!(drained.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn interrupt_with_healthy_actors_is_a_clean_shutdown() {
        let mut supervisor = Supervisor::new();
        // Stands in for the signal watcher: an operator interrupt is not an
        // error.
        supervisor.add("watcher", |_shutdown| async { Ok(()) });
        supervisor.add("runner", |mut shutdown| async move {
            shutdown.recv().await;
            Ok(())
        });

        assert!(supervisor.run().await.is_ok());
    }

    #[tokio::test]
    async fn cancellation_as_the_trigger_is_surfaced() {
        let mut supervisor = Supervisor::new();
        supervisor.add("runner", |_shutdown| async { Err(ActorError::Cancelled) });

        let err = supervisor.run().await.unwrap_err();
        assert!(matches!(
            err,
            SupervisionError::UnexpectedCancellation { actor: "runner" }
        ));
    }

    #[tokio::test]
    async fn cancellation_during_drain_is_discarded() {
        let mut supervisor = Supervisor::new();
        supervisor.add("watcher", |_shutdown| async { Ok(()) });
        supervisor.add("runner", |mut shutdown| async move {
            shutdown.recv().await;
            Err(ActorError::Cancelled)
        });

        assert!(supervisor.run().await.is_ok());
    }

    #[tokio::test]
    async fn empty_actor_set_returns_immediately() {
        assert!(Supervisor::new().run().await.is_ok());
    }

    #[tokio::test]
    async fn panicking_actor_is_reported_and_peers_are_drained() {
        let mut supervisor = Supervisor::new();
        supervisor.add("panicker", |_shutdown| async move { panic!("kaboom") });
        supervisor.add("runner", |mut shutdown| async move {
            shutdown.recv().await;
            Ok(())
        });

        let err = tokio::time::timeout(Duration::from_secs(5), supervisor.run())
            .await
            .expect("run did not return")
            .unwrap_err();
        assert!(matches!(err, SupervisionError::Panicked(_)));
    }
}
