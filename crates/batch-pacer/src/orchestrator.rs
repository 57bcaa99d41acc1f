//! Fan-out of independent pacers with a join-all barrier.

use rand::Rng;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::PacerError;
use crate::pacer::{Pacer, PacerMetrics};
use crate::sink::EventSink;

/// Runs pacers as independent tasks and waits for all of them.
///
/// Pacers share nothing, so a failing pacer neither cancels nor retries its
/// siblings. [`join_all`](Self::join_all) only reports once every task has
/// settled.
#[derive(Default)]
pub struct Orchestrator {
    tasks: JoinSet<Result<PacerMetrics, PacerError>>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pacer on the current runtime.
    pub fn spawn<S, R>(&mut self, pacer: Pacer<S, R>)
    where
        S: EventSink + 'static,
        R: Rng + Send + 'static,
    {
        info!(
            "Starting pacer {} with {} messages",
            pacer.label(),
            pacer.remaining()
        );
        self.tasks.spawn(pacer.run());
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every pacer to finish.
    ///
    /// Returns the metrics of all pacers in completion order, or the first
    /// error raised once the remaining pacers have also finished.
    pub async fn join_all(mut self) -> Result<Vec<PacerMetrics>, PacerError> {
        let mut completed = Vec::with_capacity(self.tasks.len());
        let mut first_error: Option<PacerError> = None;

        while let Some(joined) = self.tasks.join_next().await {
            let outcome = joined.map_err(PacerError::from).and_then(|r| r);
            match outcome {
                Ok(metrics) => completed.push(metrics),
                Err(e) => {
                    error!("Pacer failed: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(completed),
        }
    }
}
