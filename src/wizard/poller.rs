//! Background polling of a submitted task
//!
//! The poller runs as its own tokio task and never touches wizard state.
//! It reports what it sees over a channel; the controller decides what to
//! apply. Dropping the returned [`PollerHandle`] stops the timer.

use crate::api::{Credentials, TaskStatus, TaskStatusSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::Instrument;

/// Poll interval used when none is configured
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Notification sent from the poller to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// The task is still running
    Progress { task_id: String, status: TaskStatus },
    /// The task finished; polling has stopped
    Completed { task_id: String, status: TaskStatus },
    /// The backend reported the task as failed; polling has stopped
    Failed {
        task_id: String,
        status: TaskStatus,
        message: String,
    },
}

impl PollEvent {
    pub fn task_id(&self) -> &str {
        match self {
            Self::Progress { task_id, .. }
            | Self::Completed { task_id, .. }
            | Self::Failed { task_id, .. } => task_id,
        }
    }
}

/// Observes one task until it completes
pub struct TaskPoller {
    source: Arc<dyn TaskStatusSource>,
    credentials: Credentials,
    interval: Duration,
}

impl TaskPoller {
    pub fn new(
        source: Arc<dyn TaskStatusSource>,
        credentials: Credentials,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            credentials,
            interval,
        }
    }

    /// Start polling `task_id`, sending events to `events`
    pub fn activate(
        self,
        task_id: String,
        events: mpsc::UnboundedSender<PollEvent>,
    ) -> PollerHandle {
        let span = tracing::info_span!("task_poller", task_id = %task_id);
        let join = tokio::spawn(self.run(task_id.clone(), events).instrument(span));
        PollerHandle { task_id, join }
    }

    async fn run(self, task_id: String, events: mpsc::UnboundedSender<PollEvent>) {
        // First query one interval after activation.
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        // The loop awaits each query before the next tick, so ticks missed
        // during a slow query are dropped instead of queued.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut failures: u32 = 0;
        loop {
            ticker.tick().await;

            let status = match self.source.get_status(&self.credentials, &task_id).await {
                Ok(status) => status,
                Err(err) => {
                    failures += 1;
                    tracing::warn!(failures, "Task status query failed: {err}");
                    continue;
                }
            };
            failures = 0;

            if status.is_completed() {
                tracing::info!("Task completed");
                let _ = events.send(PollEvent::Completed { task_id, status });
                return;
            }

            if status.is_failed() {
                let message = status
                    .result
                    .clone()
                    .unwrap_or_else(|| "Task processing failed".to_string());
                tracing::warn!("Task failed: {message}");
                let _ = events.send(PollEvent::Failed {
                    task_id,
                    status,
                    message,
                });
                return;
            }

            tracing::debug!(status = %status.status, "Task still running");
            let event = PollEvent::Progress {
                task_id: task_id.clone(),
                status,
            };
            if events.send(event).is_err() {
                tracing::debug!("Poll event receiver dropped, stopping");
                return;
            }
        }
    }
}

/// Owner's handle on an active poller; aborts the poller when dropped
#[derive(Debug)]
pub struct PollerHandle {
    task_id: String,
    join: JoinHandle<()>,
}

impl PollerHandle {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Whether the poller has stopped on its own
    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}
