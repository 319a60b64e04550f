//! Background visit capture.
//!
//! Redirect handlers hand [`VisitEvent`]s to a [`VisitDispatcher`]; a single
//! [`VisitWorker`] drains the queue and records each visit through a
//! [`VisitRecorder`]. Capture is best-effort: a full queue drops the visit, a
//! failed write is logged and never retried.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::domain::entities::NewVisit;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;

/// Sink that persists a single visit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRecorder: Send + Sync {
    async fn record(&self, visit: NewVisit) -> Result<(), AppError>;
}

/// Outcome of one processed visit, reported to an optional completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitCompletion {
    pub url_id: i64,
    pub recorded: bool,
}

/// Non-blocking handle used by request handlers to enqueue visits.
#[derive(Debug, Clone)]
pub struct VisitDispatcher {
    sender: mpsc::Sender<VisitEvent>,
}

impl VisitDispatcher {
    pub fn new(sender: mpsc::Sender<VisitEvent>) -> Self {
        Self { sender }
    }

    /// Creates a dispatcher together with the receiving end for the worker.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<VisitEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Enqueues a visit without waiting.
    ///
    /// Returns `false` when the visit was dropped because the queue is full or
    /// the worker has stopped.
    pub fn dispatch(&self, event: VisitEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => {
                metrics::counter!("likr_visits_dispatched_total").increment(1);
                true
            }
            Err(mpsc::error::TrySendError::Full(ev)) => {
                warn!(url_id = ev.url_id, "Visit queue full, dropping visit");
                metrics::counter!("likr_visits_dropped_total").increment(1);
                false
            }
            Err(mpsc::error::TrySendError::Closed(ev)) => {
                warn!(url_id = ev.url_id, "Visit queue closed, dropping visit");
                metrics::counter!("likr_visits_dropped_total").increment(1);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Remaining free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}

/// Drains the visit queue with bounded concurrency.
pub struct VisitWorker<R: VisitRecorder + ?Sized> {
    recorder: Arc<R>,
    concurrency: usize,
    completions: Option<mpsc::UnboundedSender<VisitCompletion>>,
}

impl<R: VisitRecorder + ?Sized + 'static> VisitWorker<R> {
    /// Creates a worker running at most `concurrency` recordings at once.
    pub fn new(recorder: Arc<R>, concurrency: usize) -> Self {
        Self {
            recorder,
            concurrency: concurrency.max(1),
            completions: None,
        }
    }

    /// Reports every processed visit on `signal`.
    ///
    /// Lets tests await analytics deterministically; the production server
    /// never installs a signal.
    pub fn with_completion_signal(mut self, signal: mpsc::UnboundedSender<VisitCompletion>) -> Self {
        self.completions = Some(signal);
        self
    }

    /// Runs until every sender is dropped, then waits for in-flight visits.
    pub async fn run(self, mut rx: mpsc::Receiver<VisitEvent>) {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        while let Some(event) = rx.recv().await {
            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };

            let recorder = self.recorder.clone();
            let completions = self.completions.clone();

            tasks.spawn(async move {
                let url_id = event.url_id;
                let recorded = match recorder.record(event.into()).await {
                    Ok(()) => {
                        debug!(url_id, "Visit recorded");
                        metrics::counter!("likr_visits_recorded_total").increment(1);
                        true
                    }
                    Err(e) => {
                        error!(url_id, error = %e, "Failed to record visit");
                        metrics::counter!("likr_visits_failed_total").increment(1);
                        false
                    }
                };

                if let Some(signal) = completions {
                    let _ = signal.send(VisitCompletion { url_id, recorded });
                }

                drop(permit);
            });

            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = joined {
                    error!(error = %e, "Visit task panicked");
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Visit task panicked");
            }
        }

        info!("Visit worker stopped");
    }
}
