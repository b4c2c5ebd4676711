//! Dashboard loading.
//!
//! [`load_dashboard`] fetches both collections and aggregates them for one
//! identity. [`DashboardWatcher`] follows a session's identity and keeps a
//! [`DashboardView`] current, restarting the fetch whenever the identity
//! changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use meetpulse_api::DashboardSource;
use meetpulse_core::{DashboardStats, Identity, SessionState, aggregate};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Fetches meetings and feedback concurrently and aggregates them for
/// `identity`.
///
/// A collection that fails to load counts as empty.
pub async fn load_dashboard(source: &dyn DashboardSource, identity: &Identity) -> DashboardStats {
    let (meetings, feedback) = tokio::join!(source.fetch_meetings(), source.fetch_feedback());

    let meetings = meetings.unwrap_or_else(|e| {
        warn!(error = %e, "failed to load meetings, using none");
        Vec::new()
    });
    let feedback = feedback.unwrap_or_else(|e| {
        warn!(error = %e, "failed to load feedback, using none");
        Vec::new()
    });

    let stats = aggregate(&identity.id, &meetings, &feedback);
    debug!(
        user = %identity.id,
        meetings = meetings.len(),
        feedback = feedback.len(),
        total = stats.total_meetings,
        "aggregated dashboard"
    );
    stats
}

/// What the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// A fetch is in flight.
    pub loading: bool,
    pub stats: DashboardStats,
    /// When `stats` were last computed. `None` before the first load.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum WatcherCommand {
    Refresh,
}

/// Keeps a [`DashboardView`] in step with a session's identity.
///
/// Each identity change aborts any fetch still running for the previous
/// identity. Signing out resets the view. Dropping the watcher stops it.
#[derive(Debug)]
pub struct DashboardWatcher {
    view: watch::Receiver<DashboardView>,
    command_tx: mpsc::Sender<WatcherCommand>,
    task: JoinHandle<()>,
}

impl DashboardWatcher {
    /// Spawns the watcher on the current runtime.
    pub fn spawn(source: Arc<dyn DashboardSource>, session: watch::Receiver<SessionState>) -> Self {
        let (view_tx, view) = watch::channel(DashboardView::default());
        let (command_tx, command_rx) = mpsc::channel(8);
        let task = tokio::spawn(run(source, session, view_tx, command_rx));

        Self {
            view,
            command_tx,
            task,
        }
    }

    /// Returns a receiver that observes every view change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view.clone()
    }

    /// Returns the current view.
    pub fn view(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    /// Refetches for the current identity.
    pub async fn refresh(&self) {
        if self.command_tx.send(WatcherCommand::Refresh).await.is_err() {
            debug!("dashboard watcher already stopped");
        }
    }

    /// Returns true once the watcher loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run(
    source: Arc<dyn DashboardSource>,
    mut session: watch::Receiver<SessionState>,
    view_tx: watch::Sender<DashboardView>,
    mut command_rx: mpsc::Receiver<WatcherCommand>,
) {
    let mut loader = Loader::new(source, view_tx);

    // Initial identity
    let identity = session.borrow_and_update().identity.clone();
    loader.apply(identity, false);

    loop {
        tokio::select! {
            changed = session.changed() => {
                if changed.is_err() {
                    debug!("session store dropped, stopping dashboard watcher");
                    break;
                }
                let identity = session.borrow_and_update().identity.clone();
                loader.apply(identity, false);
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(WatcherCommand::Refresh) => {
                        let identity = loader.current.clone();
                        loader.apply(identity, true);
                    }
                    None => {
                        debug!("dashboard watcher stopping");
                        break;
                    }
                }
            }
        }
    }

    loader.cancel();
}

/// Owns the in-flight fetch for the watcher loop.
///
/// Every change of target bumps `generation`. A fetch publishes only while
/// the generation it started under is still current, even if the abort
/// arrived too late to stop it.
struct Loader {
    source: Arc<dyn DashboardSource>,
    view_tx: watch::Sender<DashboardView>,
    current: Option<Identity>,
    fetch: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

impl Loader {
    fn new(source: Arc<dyn DashboardSource>, view_tx: watch::Sender<DashboardView>) -> Self {
        Self {
            source,
            view_tx,
            current: None,
            fetch: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts a fetch for `identity` if it differs from the current one, or
    /// when `force` is set.
    fn apply(&mut self, identity: Option<Identity>, force: bool) {
        if !force && self.current == identity {
            return;
        }

        let generation = self.cancel();
        self.current.clone_from(&identity);

        let Some(identity) = identity else {
            self.view_tx.send_replace(DashboardView::default());
            return;
        };

        info!(user = %identity.id, "loading dashboard");
        self.view_tx.send_modify(|view| view.loading = true);

        let source = Arc::clone(&self.source);
        let view_tx = self.view_tx.clone();
        let latest = Arc::clone(&self.generation);
        self.fetch = Some(tokio::spawn(async move {
            let stats = load_dashboard(source.as_ref(), &identity).await;
            publish(
                &view_tx,
                &latest,
                generation,
                DashboardView {
                    loading: false,
                    stats,
                    updated_at: Some(Utc::now()),
                },
            );
        }));
    }

    /// Aborts the in-flight fetch and returns the new generation.
    fn cancel(&mut self) -> u64 {
        if let Some(handle) = self.fetch.take() {
            debug!("aborting stale dashboard fetch");
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Publishes `view` unless `generation` has been superseded.
fn publish(
    view_tx: &watch::Sender<DashboardView>,
    latest: &AtomicU64,
    generation: u64,
    view: DashboardView,
) -> bool {
    view_tx.send_if_modified(|current| {
        if latest.load(Ordering::SeqCst) != generation {
            debug!(generation, "dropping stale dashboard result");
            return false;
        }
        *current = view;
        true
    })
}
