//! Single-flight background refresher.
//!
//! One long-lived worker task repopulates the singleton slots. Triggers are
//! non-blocking: the first one flips the `running` guard and enqueues a run,
//! every trigger that arrives while the guard is set is dropped.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use notedesk_client::{ActiveSession, NoteSource, Session, UpstreamError};
use notedesk_core::{FollowerPage, NoteSummary};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::slots::CacheSlot;
use super::store::CacheStore;

/// What a call to [`Refresher::trigger`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A run was handed to the worker.
    Scheduled,
    /// A run is already in progress; nothing to do.
    AlreadyRunning,
    /// The worker has shut down.
    Stopped,
}

/// Summary of one refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub refreshed: Vec<CacheSlot>,
    pub failed: Vec<CacheSlot>,
    pub discarded: Vec<CacheSlot>,
    /// No authenticated session; nothing was fetched.
    pub skipped: bool,
}

impl RefreshReport {
    fn outcome(&self) -> &'static str {
        if self.skipped {
            "skipped"
        } else if self.failed.is_empty() {
            "ok"
        } else if self.refreshed.is_empty() {
            "failed"
        } else {
            "partial"
        }
    }
}

struct Shared {
    store: Arc<CacheStore>,
    session: Arc<Session>,
    running: AtomicBool,
    completed_runs: AtomicU64,
    upstream_timeout: Duration,
}

/// Resets the `running` flag when dropped, including on panic or cancellation.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to the refresh worker.
///
/// Dropping the last handle stops the worker.
pub struct Refresher {
    shared: Arc<Shared>,
    queue: mpsc::Sender<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl Refresher {
    /// Spawns the worker. Must be called inside a tokio runtime.
    pub fn start(store: Arc<CacheStore>, session: Arc<Session>) -> Self {
        let upstream_timeout = store.config().upstream_timeout;
        let shared = Arc::new(Shared {
            store,
            session,
            running: AtomicBool::new(false),
            completed_runs: AtomicU64::new(0),
            upstream_timeout,
        });

        let (queue, queue_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(run_worker(Arc::clone(&shared), queue_rx, shutdown_rx));

        Self {
            shared,
            queue,
            shutdown_tx,
        }
    }

    /// Requests a refresh without waiting for it.
    pub fn trigger(&self) -> TriggerOutcome {
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Refresh already running, trigger dropped");
            return TriggerOutcome::AlreadyRunning;
        }

        match self.queue.try_send(()) {
            Ok(()) => TriggerOutcome::Scheduled,
            // A queued run exists and will reset the guard when it finishes.
            Err(mpsc::error::TrySendError::Full(())) => TriggerOutcome::AlreadyRunning,
            Err(mpsc::error::TrySendError::Closed(())) => {
                self.shared.running.store(false, Ordering::Release);
                warn!("Refresh worker is not running");
                TriggerOutcome::Stopped
            }
        }
    }

    /// Returns true while a run is queued or executing.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Returns the number of runs that have finished, including failed ones.
    pub fn completed_runs(&self) -> u64 {
        self.shared.completed_runs.load(Ordering::Acquire)
    }

    /// Signals the worker to stop after the current run.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_worker(
    shared: Arc<Shared>,
    mut queue: mpsc::Receiver<()>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    debug!("Refresh worker started");

    loop {
        tokio::select! {
            message = queue.recv() => {
                if message.is_none() {
                    break;
                }
                run_guarded(&shared).await;
            }
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Refresh worker shutting down");
}

/// Runs one refresh in its own task so a panic in the body is contained and
/// the guard is still reset.
async fn run_guarded(shared: &Arc<Shared>) {
    let guard = RunningGuard(&shared.running);
    let start = Instant::now();

    let body = Arc::clone(shared);
    let task = tokio::spawn(
        async move { refresh_once(&body).await }.instrument(info_span!("cache_refresh")),
    );

    let outcome = match task.await {
        Ok(report) => {
            debug!(
                refreshed = ?report.refreshed,
                failed = ?report.failed,
                skipped = report.skipped,
                "Refresh finished"
            );
            report.outcome()
        }
        Err(e) if e.is_panic() => {
            error!("Refresh run panicked");
            "panicked"
        }
        Err(_) => "cancelled",
    };

    shared
        .store
        .metrics()
        .record_refresh_run(outcome, start.elapsed());

    drop(guard);
    shared.completed_runs.fetch_add(1, Ordering::AcqRel);
}

async fn refresh_once(shared: &Arc<Shared>) -> RefreshReport {
    // Generation before session: a login or logout after this read discards
    // the writes below.
    let generation = shared.store.generation();
    let Some(active) = shared.session.authenticated() else {
        debug!("No authenticated session, skipping refresh");
        return RefreshReport {
            skipped: true,
            ..RefreshReport::default()
        };
    };

    let mut report = RefreshReport::default();

    for slot in CacheSlot::ALL {
        if !shared.store.needs_refresh(slot) {
            continue;
        }

        let task = tokio::spawn(
            refresh_slot(Arc::clone(shared), Arc::clone(&active), slot, generation)
                .instrument(info_span!("slot_refresh", slot = %slot)),
        );

        match task.await {
            Ok(Ok(true)) => report.refreshed.push(slot),
            Ok(Ok(false)) => report.discarded.push(slot),
            Ok(Err(e)) => {
                warn!(
                    slot = %slot,
                    error = %e,
                    transient = e.is_transient(),
                    "Failed to refresh cache slot"
                );
                shared.store.metrics().record_refresh_failure(slot.as_str());
                report.failed.push(slot);
            }
            Err(e) => {
                error!(slot = %slot, panicked = e.is_panic(), "Cache slot refresh aborted");
                shared.store.metrics().record_refresh_failure(slot.as_str());
                report.failed.push(slot);
            }
        }
    }

    report
}

/// Refreshes one slot. Runs in its own task so a panic only fails that slot.
async fn refresh_slot(
    shared: Arc<Shared>,
    active: Arc<ActiveSession>,
    slot: CacheSlot,
    generation: u64,
) -> Result<bool, UpstreamError> {
    match slot {
        CacheSlot::ContentList => refresh_content_list(&shared, &active, generation).await,
        CacheSlot::FollowerList => refresh_follower_list(&shared, &active, generation).await,
    }
}

async fn refresh_content_list(
    shared: &Shared,
    active: &ActiveSession,
    generation: u64,
) -> Result<bool, UpstreamError> {
    let source = active.source();
    let user_id = match active.user_id() {
        Some(id) => id.to_string(),
        None => resolve_user_id(shared, source).await?,
    };

    let notes: Vec<NoteSummary> = with_timeout(
        shared.upstream_timeout,
        source.fetch_content_list(&user_id),
    )
    .await?;

    debug!(count = notes.len(), "Content list refreshed");
    Ok(shared.store.put_if_current(notes, generation))
}

async fn refresh_follower_list(
    shared: &Shared,
    active: &ActiveSession,
    generation: u64,
) -> Result<bool, UpstreamError> {
    let page: FollowerPage =
        with_timeout(shared.upstream_timeout, active.source().fetch_follower_list()).await?;

    debug!(count = page.len(), "Follower list refreshed");
    Ok(shared.store.put_if_current(page, generation))
}

/// Looks up the account id and remembers it on the session.
async fn resolve_user_id(
    shared: &Shared,
    source: &Arc<dyn NoteSource>,
) -> Result<String, UpstreamError> {
    let info = with_timeout(shared.upstream_timeout, source.self_info()).await?;
    let user_id = info
        .user_id()
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::decode("self info has no user id"))?;

    shared.session.remember_identity(source, &info);
    Ok(user_id)
}

/// Bounds an upstream call; elapsing counts as a failure of that call.
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, UpstreamError>>,
) -> Result<T, UpstreamError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout {
            seconds: limit.as_secs(),
        }),
    }
}
