//! Fan-out coordinator
//!
//! Sends each submission to every sink in a background task that is detached
//! from the request. The request handler never waits for sinks; the process
//! waits for them on shutdown through the task tracker.
//!
//! Sink results are logged and dropped here. A failed delivery is not retried.

use futures::future::join_all;
use revp_common::{RecordedAt, Submission};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::sinks::{Delivery, Sink};

/// Detached, tracked delivery of submissions to all sinks
#[derive(Clone)]
pub struct FanOut {
    sinks: Arc<Vec<Arc<dyn Sink>>>,
    tracker: TaskTracker,
}

impl FanOut {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            sinks: Arc::new(sinks),
            tracker: TaskTracker::new(),
        }
    }

    /// Schedule delivery of `submission` to every sink
    ///
    /// Returns immediately. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, submission: Submission) {
        let sinks = Arc::clone(&self.sinks);
        self.tracker.spawn(async move {
            deliver_all(&sinks, &submission).await;
        });
    }

    /// Number of fan-out tasks still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting work and wait up to `grace` for running deliveries
    ///
    /// Returns `true` if every delivery finished in time.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            info!(pending, "Waiting for in-flight sink deliveries");
        }

        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    pending = self.tracker.len(),
                    grace_secs = grace.as_secs(),
                    "Sink deliveries still running at shutdown; abandoning them"
                );
                false
            }
        }
    }
}

/// Deliver one submission to all sinks concurrently
///
/// Every sink receives the same recorded-at instant. Each outcome is logged
/// on its own; one sink failing has no effect on the others.
pub async fn deliver_all(sinks: &[Arc<dyn Sink>], submission: &Submission) {
    let recorded_at = RecordedAt::now();

    let deliveries = sinks.iter().map(|sink| {
        let sink = Arc::clone(sink);
        async move {
            let name = sink.name();
            match sink.deliver(submission, &recorded_at).await {
                Ok(Delivery::Delivered) => {
                    info!(sink = name, submission_id = %submission.id, "Submission delivered");
                }
                Ok(Delivery::Skipped(reason)) => {
                    debug!(sink = name, submission_id = %submission.id, reason, "Sink skipped");
                }
                Err(e) => {
                    warn!(
                        sink = name,
                        submission_id = %submission.id,
                        error = %e,
                        "Sink delivery failed (not retried)"
                    );
                }
            }
        }
    });

    join_all(deliveries).await;
}
