//! MIDI input surface: adapter events and the device registry.

/// A Control Change message reduced to the two bytes the surface cares
/// about. Both are already masked to 0-127.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChange {
    pub cc: u8,
    pub value: u8,
}

/// Events pushed by a [`input::DeviceAdapter`] implementation.
#[derive(Debug, Clone)]
pub enum AdapterEvent {
    ControlChange(ControlChange),
    /// Current list of available input port names. Sent on successful start
    /// and whenever the platform reports a device-list change.
    StateChange { devices: Vec<String> },
    /// Human-readable access failure. Terminal until `start` is invoked
    /// again; the rest of the surface keeps working on slider input.
    Error(String),
}

/// Ordered list of available MIDI input ports plus the active selection.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<String>,
    active: Option<String>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Replaces the device list. If the active device is no longer present
    /// the selection reverts to none.
    pub fn apply_state_change(&mut self, devices: Vec<String>) {
        if let Some(active) = &self.active {
            if !devices.contains(active) {
                self.active = None;
            }
        }
        self.devices = devices;
    }

    /// Selects a device by name. Unknown names are refused.
    pub fn select(&mut self, name: &str) -> bool {
        if self.devices.iter().any(|d| d == name) {
            self.active = Some(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.active = None;
    }
}


pub mod input;
