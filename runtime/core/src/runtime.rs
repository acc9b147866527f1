use std::path::PathBuf;
use std::sync::Arc;

use notify::Error as NotifyError;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use crate::app::{AppState, AppStateError};
use crate::binding::{BindingController, HostEvent, SharedBinding};
use crate::midi::input::{AdapterHandle, DeviceAdapter, MidirAdapter};
use crate::midi::{AdapterEvent, DeviceRegistry};
use crate::shell::Shell;
use crate::store::PromptStore;
use crate::watch::{watch_config, ReloadEvent, WatchHandle};

#[derive(thiserror::Error, Debug)]
pub enum RuntimeManagerError {
    #[error("app state error: {0}")]
    App(#[from] AppStateError),
    #[error("watch error: {0}")]
    Watch(#[from] NotifyError),
}

/// Wires the adapter, binding controller, shell and config watcher together
/// and runs the event loop. MIDI access failures are reported as
/// `HostEvent::Error` and are non-fatal: slider input keeps working.
pub struct RuntimeManager {
    pub state: Arc<Mutex<AppState>>,
    pub binding: SharedBinding,
    pub shell: Arc<Mutex<Shell>>,
    pub registry: Arc<Mutex<DeviceRegistry>>,
    host_tx: broadcast::Sender<HostEvent>,
    adapter_tx: broadcast::Sender<AdapterEvent>,
    adapter: Box<dyn DeviceAdapter>,
    adapter_handle: Mutex<Option<AdapterHandle>>,
    last_error: Arc<Mutex<Option<String>>>,
    watch: WatchHandle,
    listener: JoinHandle<()>,
}

impl RuntimeManager {
    pub async fn initialize(config_path: PathBuf) -> Result<Self, RuntimeManagerError> {
        Self::initialize_with_adapter(config_path, MidirAdapter::new()).await
    }

    pub async fn initialize_with_adapter<A>(
        config_path: PathBuf,
        adapter: A,
    ) -> Result<Self, RuntimeManagerError>
    where
        A: DeviceAdapter + 'static,
    {
        let app_state = AppState::initialize(config_path.clone())?;
        let bundle = app_state.compiled_session().bundle.clone();

        let (host_tx, _) = broadcast::channel(32);
        let (adapter_tx, _) = broadcast::channel(32);

        let supported = adapter.is_supported();
        let binding = Arc::new(Mutex::new(BindingController::new(
            PromptStore::new(),
            host_tx.clone(),
        )));
        {
            let mut guard = binding.lock().await;
            guard.apply_session(&bundle);
        }
        let shell = Arc::new(Mutex::new(Shell::new(supported)));
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let state = Arc::new(Mutex::new(app_state));

        let last_error = Arc::new(Mutex::new(None));

        let watch = watch_config(config_path, state.clone())?;
        let listener = spawn_listener(
            adapter_tx.subscribe(),
            watch.subscribe(),
            binding.clone(),
            registry.clone(),
            state.clone(),
            host_tx.clone(),
            last_error.clone(),
        );

        let mut adapter_handle = None;
        if supported {
            match adapter.start(bundle.midi.preferred_device.as_deref(), adapter_tx.clone()) {
                Ok(handle) => adapter_handle = Some(handle),
                Err(err) => {
                    // The adapter already emitted `AdapterEvent::Error`, but
                    // the host cannot subscribe until initialize returns and
                    // the forwarded event may already be gone. Record it here
                    // so a startup failure is always observable.
                    tracing::warn!(error = %err, "MIDI adapter failed to start");
                    *last_error.lock().await = Some(err.to_string());
                }
            }
        } else {
            tracing::info!("MIDI input unsupported; surface runs on slider input only");
        }

        Ok(Self {
            state,
            binding,
            shell,
            registry,
            host_tx,
            adapter_tx,
            adapter: Box::new(adapter),
            adapter_handle: Mutex::new(adapter_handle),
            last_error,
            watch,
            listener,
        })
    }

    /// Most recent MIDI access failure, if any. Covers failures raised
    /// before the host had a chance to subscribe.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.lock().await.clone()
    }

    /// Host subscription for `prompts-changed`, `play-pause` and `error`.
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.host_tx.subscribe()
    }

    /// Sender for adapter events, for adapters driven outside the runtime.
    pub fn adapter_sender(&self) -> broadcast::Sender<AdapterEvent> {
        self.adapter_tx.clone()
    }

    /// Feeds a Control Change straight into the binding controller.
    pub async fn trigger_control_change(&self, change: crate::midi::ControlChange) -> bool {
        let mut guard = self.binding.lock().await;
        guard.handle_control_change(change)
    }

    /// Slider input from the host view; unknown ids are ignored.
    pub async fn slider_change(&self, id: &str, weight: f32) -> bool {
        let mut guard = self.binding.lock().await;
        guard.handle_slider_change(id, weight)
    }

    /// Forwards play/pause intent; the host owns the playback machine.
    pub async fn toggle_play_pause(&self) {
        let _ = self.host_tx.send(HostEvent::PlayPause);
    }

    /// Host acknowledgment of the actual playback state.
    pub async fn set_playback(&self, playing: bool) {
        self.shell.lock().await.set_playing(playing);
    }

    pub async fn toggle_cc_numbers(&self) {
        self.shell.lock().await.toggle_cc_numbers();
    }

    pub async fn set_filtered_prompts(&self, texts: Vec<String>) {
        let mut guard = self.binding.lock().await;
        guard.set_filtered(texts);
    }

    /// Selects a device and re-invokes the adapter; this is the retry path
    /// after an access failure. Unknown device names are refused.
    pub async fn select_device(&self, name: &str) -> bool {
        if !self.registry.lock().await.select(name) {
            return false;
        }
        let mut guard = self.adapter_handle.lock().await;
        if let Some(handle) = guard.take() {
            // Close the previous connection before reconnecting; some
            // backends hand out exclusive port access.
            handle.stop();
        }
        match self.adapter.start(Some(name), self.adapter_tx.clone()) {
            Ok(handle) => {
                *guard = Some(handle);
                true
            }
            Err(err) => {
                // No connection exists, so the device must not read as
                // selected.
                self.registry.lock().await.clear_selection();
                *self.last_error.lock().await = Some(err.to_string());
                false
            }
        }
    }

    /// Current shell projection.
    pub async fn render(&self) -> Vec<String> {
        let binding = self.binding.lock().await;
        let registry = self.registry.lock().await;
        let shell = self.shell.lock().await;
        shell.render(binding.store(), &registry)
    }

    pub async fn shutdown(self) {
        self.watch.join_handle.abort();
        self.listener.abort();
        if let Some(handle) = self.adapter_handle.into_inner() {
            handle.stop();
        }
    }
}

fn spawn_listener(
    mut adapter_rx: broadcast::Receiver<AdapterEvent>,
    mut reload_rx: broadcast::Receiver<ReloadEvent>,
    binding: SharedBinding,
    registry: Arc<Mutex<DeviceRegistry>>,
    state: Arc<Mutex<AppState>>,
    host_tx: broadcast::Sender<HostEvent>,
    last_error: Arc<Mutex<Option<String>>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                Ok(event) = adapter_rx.recv() => match event {
                    AdapterEvent::ControlChange(change) => {
                        let mut guard = binding.lock().await;
                        guard.handle_control_change(change);
                    }
                    AdapterEvent::StateChange { devices } => {
                        let mut guard = registry.lock().await;
                        guard.apply_state_change(devices);
                    }
                    AdapterEvent::Error(message) => {
                        tracing::warn!(%message, "MIDI access error");
                        *last_error.lock().await = Some(message.clone());
                        let _ = host_tx.send(HostEvent::Error(message));
                    }
                },
                Ok(event) = reload_rx.recv() => {
                    if let ReloadEvent::Reloaded = event {
                        let bundle = {
                            let guard = state.lock().await;
                            guard.compiled_session().bundle.clone()
                        };
                        let mut guard = binding.lock().await;
                        guard.apply_session(&bundle);
                    }
                    // A failed reload keeps the previous session active.
                }
                else => break,
            }
        }
    })
}
