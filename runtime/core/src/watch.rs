//! Hot reload of the session config. Filesystem events are debounced before
//! the state is rebuilt; a failed reload leaves the previous session active.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::app::{AppState, AppStateError};

const DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub enum ReloadEvent {
    Reloaded,
    Failed(Arc<AppStateError>),
}

pub struct WatchHandle {
    pub join_handle: JoinHandle<()>,
    event_tx: broadcast::Sender<ReloadEvent>,
    /// Keep watcher alive for lifetime of handle.
    _watcher: RecommendedWatcher,
}

impl WatchHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.event_tx.subscribe()
    }
}

pub fn watch_config(path: PathBuf, state: Arc<Mutex<AppState>>) -> notify::Result<WatchHandle> {
    let (event_tx, _event_rx) = broadcast::channel(16);
    let (notify_tx, mut notify_rx) = mpsc::channel(16);

    let mut watcher = notify::recommended_watcher({
        let notify_tx = notify_tx.clone();
        move |res| {
            let _ = notify_tx.blocking_send(res);
        }
    })?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    tracing::debug!(path = %path.display(), "watching session config");

    let event_tx_clone = event_tx.clone();
    let join_handle = tokio::spawn(async move {
        let event_tx = event_tx_clone;
        let mut deadline: Option<tokio::time::Instant> = None;

        loop {
            if let Some(next_deadline) = deadline {
                tokio::select! {
                    Some(event) = notify_rx.recv() => {
                        if let Ok(ev) = event {
                            if is_relevant(&ev.kind) {
                                deadline = Some(tokio::time::Instant::now() + DEBOUNCE);
                            }
                        } else {
                            break;
                        }
                    }
                    _ = tokio::time::sleep_until(next_deadline) => {
                        deadline = None;
                        reload_state(&state, &event_tx).await;
                    }
                }
            } else {
                match notify_rx.recv().await {
                    Some(Ok(event)) => {
                        if is_relevant(&event.kind) {
                            deadline = Some(tokio::time::Instant::now() + DEBOUNCE);
                        }
                    }
                    Some(Err(_)) => {
                        // Watch errors still debounce into a reload attempt.
                        deadline = Some(tokio::time::Instant::now() + DEBOUNCE);
                    }
                    None => break,
                }
            }
        }
    });

    Ok(WatchHandle {
        join_handle,
        event_tx,
        _watcher: watcher,
    })
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Other
    )
}

async fn reload_state(state: &Arc<Mutex<AppState>>, event_tx: &broadcast::Sender<ReloadEvent>) {
    let mut guard = state.lock().await;
    match guard.reload() {
        Ok(_) => {
            tracing::info!("session config reloaded");
            let _ = event_tx.send(ReloadEvent::Reloaded);
        }
        Err(err) => {
            tracing::warn!(error = %err, "session config reload failed");
            let _ = event_tx.send(ReloadEvent::Failed(Arc::new(err)));
        }
    }
}
