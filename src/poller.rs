//! Completion polling: a bounded-duration loop racing a tick against a deadline
//!
//! One poller run per dispatched task. Each tick asks the result source for
//! the task's current state; the run ends in exactly one of `Answered` or
//! `TimedOut`. A failed or invalid poll never ends the loop, only the
//! deadline does.

use crate::error::MarketResult;
use crate::task::{PollResult, TaskHandle};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Source of task results, polled once per tick.
///
/// [`crate::marketplace::MarketplaceClient`] is the production
/// implementation; tests script their own sequences.
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn get_task_result(&self, task_id: &str) -> MarketResult<PollResult>;
}

/// Terminal outcome of one polling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A worker submitted a non-empty answer before the deadline
    Answered(String),
    /// The deadline expired with no answer; nothing is emitted downstream
    TimedOut,
}

/// Polls one task to completion on a fixed tick interval
pub struct CompletionPoller<S: ResultSource> {
    source: Arc<S>,
    tick: Duration,
}

impl<S: ResultSource> CompletionPoller<S> {
    pub fn new(source: Arc<S>, tick: Duration) -> Self {
        Self { source, tick }
    }

    /// Run the polling loop for one task handle.
    ///
    /// The deadline is armed when polling begins. The `select!` is biased
    /// with the deadline arm first, so at most one of tick/deadline is acted
    /// on per cycle and a tick landing exactly on the deadline resolves to
    /// `TimedOut`.
    ///
    /// An empty answer counts as "not yet answered", the same as a pending
    /// poll. This mirrors the remote service's historical behaviour; it does
    /// conflate "no assignment yet" with "assignment submitted with blank
    /// text".
    pub async fn run(&self, handle: &TaskHandle, deadline: Duration) -> PollOutcome {
        let expired = tokio::time::sleep(deadline);
        tokio::pin!(expired);

        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick completes immediately; the first real poll happens one
        // interval after polling begins.
        ticker.tick().await;

        info!(
            task_id = %handle.task_id,
            deadline_secs = deadline.as_secs(),
            tick_secs = self.tick.as_secs(),
            "polling started"
        );

        loop {
            tokio::select! {
                biased;

                () = &mut expired => {
                    info!(task_id = %handle.task_id, "polling deadline reached, giving up");
                    return PollOutcome::TimedOut;
                }

                _ = ticker.tick() => {
                    match self.source.get_task_result(&handle.task_id).await {
                        Ok(PollResult::Answered(text)) if !text.is_empty() => {
                            info!(task_id = %handle.task_id, "answer received");
                            return PollOutcome::Answered(text);
                        }
                        Ok(PollResult::Answered(_)) | Ok(PollResult::Pending) => {
                            debug!(task_id = %handle.task_id, "no answer yet");
                        }
                        Ok(PollResult::Invalid(reason)) => {
                            warn!(
                                task_id = %handle.task_id,
                                reason = %reason,
                                "poll response invalid, will retry on next tick"
                            );
                        }
                        Err(e) => {
                            warn!(
                                task_id = %handle.task_id,
                                error = %e,
                                "poll failed, will retry on next tick"
                            );
                        }
                    }
                }
            }
        }
    }
}
