use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use midir::{Ignore, MidiInput};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::midi::{AdapterEvent, ControlChange};

const CONTROL_CHANGE_STATUS: u8 = 0xB0;

/// Capability boundary over the platform MIDI API, so binding logic can be
/// exercised with a synthetic adapter and no device attached.
pub trait DeviceAdapter: Send + Sync {
    /// True iff the platform exposes MIDI input at all.
    fn is_supported(&self) -> bool;

    /// Begins listening. On success emits `StateChange` with the current
    /// port names; on failure emits `Error` and returns it. No retry logic:
    /// a failure is terminal until `start` is invoked again.
    fn start(
        &self,
        preferred: Option<&str>,
        sender: broadcast::Sender<AdapterEvent>,
    ) -> anyhow::Result<AdapterHandle>;
}

/// Running adapter instance. Must be stopped before the same port can be
/// reopened: some backends hand out exclusive access.
#[derive(Debug)]
pub struct AdapterHandle {
    forward: JoinHandle<()>,
    stop: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl AdapterHandle {
    /// Handle for adapters with no dedicated input thread.
    pub fn from_task(forward: JoinHandle<()>) -> Self {
        Self {
            forward,
            stop: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    fn with_thread(
        forward: JoinHandle<()>,
        stop: Arc<AtomicBool>,
        thread: std::thread::JoinHandle<()>,
    ) -> Self {
        Self {
            forward,
            stop,
            thread: Some(thread),
        }
    }

    /// Stops the forwarding task, closes the input connection and joins the
    /// input thread. The join is bounded: the thread only closes the
    /// connection and returns once woken.
    pub fn stop(mut self) {
        self.forward.abort();
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            let _ = thread.join();
        }
    }
}

/// Production adapter backed by midir. Owns a dedicated input thread bridged
/// into tokio through an mpsc channel.
#[derive(Debug, Default)]
pub struct MidirAdapter;

impl MidirAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceAdapter for MidirAdapter {
    fn is_supported(&self) -> bool {
        MidiInput::new("promptdeck-probe").is_ok()
    }

    fn start(
        &self,
        preferred: Option<&str>,
        sender: broadcast::Sender<AdapterEvent>,
    ) -> anyhow::Result<AdapterHandle> {
        match connect(preferred, sender.clone()) {
            Ok(handle) => Ok(handle),
            Err(err) => {
                let _ = sender.send(AdapterEvent::Error(err.to_string()));
                Err(err)
            }
        }
    }
}

fn connect(
    preferred: Option<&str>,
    sender: broadcast::Sender<AdapterEvent>,
) -> anyhow::Result<AdapterHandle> {
    let mut input = MidiInput::new("promptdeck")?;
    input.ignore(Ignore::None);

    let ports = input.ports();
    if ports.is_empty() {
        anyhow::bail!("No MIDI input ports available");
    }

    let names: Vec<String> = ports
        .iter()
        .map(|port| input.port_name(port).unwrap_or_else(|_| "unknown".into()))
        .collect();

    let port = match preferred {
        Some(wanted) => {
            let idx = names
                .iter()
                .position(|name| name.contains(wanted))
                .ok_or_else(|| anyhow::anyhow!("No MIDI input port matching `{wanted}`"))?;
            ports[idx].clone()
        }
        None => ports[0].clone(),
    };

    let (tx, mut rx) = tokio::sync::mpsc::channel::<ControlChange>(32);

    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = stop.clone();
    let thread_sender = sender.clone();
    let thread = std::thread::spawn(move || {
        let input = input;
        let result = input.connect(
            &port,
            "promptdeck",
            move |_, message, _| {
                // Only Control Change messages drive the surface; everything
                // else is ignored here.
                if message.len() >= 3 && message[0] & 0xF0 == CONTROL_CHANGE_STATUS {
                    let _ = tx.blocking_send(ControlChange {
                        cc: message[1] & 0x7F,
                        value: message[2] & 0x7F,
                    });
                }
            },
            (),
        );
        match result {
            Ok(connection) => {
                // Parked until `AdapterHandle::stop` raises the flag and
                // unparks; closing releases the port for reconnects.
                while !thread_stop.load(Ordering::Acquire) {
                    std::thread::park();
                }
                let _ = connection.close();
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to open MIDI input port");
                let _ = thread_sender.send(AdapterEvent::Error(format!(
                    "Failed to open MIDI input: {err}"
                )));
            }
        }
    });

    tracing::info!(ports = names.len(), "MIDI input started");
    let _ = sender.send(AdapterEvent::StateChange { devices: names });

    let forward = sender;
    let forward_task = tokio::spawn(async move {
        while let Some(change) = rx.recv().await {
            let _ = forward.send(AdapterEvent::ControlChange(change));
        }
    });

    Ok(AdapterHandle::with_thread(forward_task, stop, thread))
}
