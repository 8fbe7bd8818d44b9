//! Background refresh of populated cache lines.
//!
//! A worker task owns the refresh loop and a ticker task feeds it on a fixed
//! interval. Interactive commands can queue an extra pass through a
//! [`RefreshTrigger`].

use canoebot_src::{BookingCache, TableSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument, warn};

/// At most one pass waits behind the running one.
const QUEUE_DEPTH: usize = 1;

/// Messages for the refresh worker.
#[derive(Debug)]
pub enum RefreshMessage {
    /// Refresh every populated line past the long TTL
    Refresh,
    /// Stop the worker
    Shutdown,
}

/// Handle for requesting an out-of-schedule refresh pass.
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    tx: mpsc::Sender<RefreshMessage>,
}

impl RefreshTrigger {
    /// Queue a refresh pass without waiting.
    ///
    /// Returns false when a pass is already queued or the worker has stopped.
    pub fn trigger(&self) -> bool {
        match self.tx.try_send(RefreshMessage::Refresh) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Refresh already queued");
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Refresh worker stopped, ignoring trigger");
                false
            }
        }
    }
}

/// Worker that runs refresh passes as messages arrive.
pub struct RefreshWorker<S> {
    cache: BookingCache<S>,
    rx: mpsc::Receiver<RefreshMessage>,
    stopping: Arc<AtomicBool>,
}

impl<S: TableSource + 'static> RefreshWorker<S> {
    /// Creates a worker over a cache handle.
    pub fn new(cache: BookingCache<S>, rx: mpsc::Receiver<RefreshMessage>) -> Self {
        Self {
            cache,
            rx,
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a flag that, once set, makes queued passes no-ops.
    pub fn with_stop_flag(mut self, stopping: Arc<AtomicBool>) -> Self {
        self.stopping = stopping;
        self
    }

    /// Runs the worker loop until shutdown or until every sender is gone.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!("Refresh worker started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                RefreshMessage::Refresh if self.stopping.load(Ordering::SeqCst) => {
                    debug!("Shutting down, dropping queued refresh");
                }
                RefreshMessage::Refresh => {
                    let report = self.cache.refresh_all_populated().await;
                    for failure in report.failures() {
                        error!(
                            facility = failure.facility(),
                            way = %failure.way(),
                            anchor = %failure.anchor(),
                            error = %failure.error(),
                            "Scheduled refresh failed"
                        );
                    }
                }
                RefreshMessage::Shutdown => {
                    info!("Refresh worker shutting down");
                    break;
                }
            }
        }
    }
}

/// Running refresh worker plus its interval ticker.
pub struct RefreshService {
    tx: mpsc::Sender<RefreshMessage>,
    stopping: Arc<AtomicBool>,
    worker: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

impl RefreshService {
    /// Spawn the worker and a ticker that queues a pass every `period`.
    ///
    /// The first pass runs one `period` after start; a prefill is expected to
    /// have just populated the cache.
    #[instrument(skip(cache))]
    pub fn start<S: TableSource + 'static>(cache: BookingCache<S>, period: Duration) -> Self {
        info!(period_secs = period.as_secs(), "Starting refresh scheduler");
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);

        let stopping = Arc::new(AtomicBool::new(false));
        let worker = RefreshWorker::new(cache, rx).with_stop_flag(stopping.clone());
        let worker = tokio::spawn(async move {
            worker.run().await;
        });

        let ticker = Self::spawn_ticker(period, tx.clone());

        Self {
            tx,
            stopping,
            worker,
            ticker,
        }
    }

    /// Handle for commands that want an opportunistic refresh.
    pub fn trigger(&self) -> RefreshTrigger {
        RefreshTrigger {
            tx: self.tx.clone(),
        }
    }

    /// Stop ticking, let the current pass finish and wait for the worker.
    ///
    /// A pass still queued behind the running one is dropped.
    pub async fn shutdown(self) {
        self.stopping.store(true, Ordering::SeqCst);
        self.ticker.abort();
        if self.tx.send(RefreshMessage::Shutdown).await.is_err() {
            debug!("Refresh worker already stopped");
        }
        if let Err(e) = self.worker.await {
            error!(error = %e, "Refresh worker task failed");
        }
    }

    fn spawn_ticker(period: Duration, tx: mpsc::Sender<RefreshMessage>) -> JoinHandle<()> {
        tokio::spawn(async move {
            // interval() rejects a zero period
            let mut ticks = interval(period.max(Duration::from_millis(1)));
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            ticks.tick().await;
            loop {
                ticks.tick().await;
                match tx.try_send(RefreshMessage::Refresh) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => debug!("Previous refresh still queued, skipping tick"),
                    Err(TrySendError::Closed(_)) => {
                        error!("Refresh worker channel closed");
                        break;
                    }
                }
            }
        })
    }
}
