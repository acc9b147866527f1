//! Binding controller: funnels MIDI and slider input into the prompt store
//! and re-emits every successful mutation as a typed host event.

use std::sync::Arc;

use session_format::SessionBundle;
use tokio::sync::broadcast;
use tokio::sync::Mutex;

use crate::midi::ControlChange;
use crate::store::{Prompt, PromptStore};

/// Events emitted across the host boundary.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Complete ordered snapshot of the prompt collection, fired after any
    /// weight mutation. Always the whole set, never a delta, so the backend
    /// receives a consistent parameter snapshot.
    PromptsChanged { prompts: Vec<Prompt> },
    /// User intent to toggle playback; the host owns the playback machine.
    PlayPause,
    /// MIDI access failure, human-readable.
    Error(String),
}

/// Owns the store (passed in explicitly, never ambient) and the host event
/// sender. Both mutation paths go through here so each successful mutation
/// emits exactly one `PromptsChanged`.
#[derive(Debug)]
pub struct BindingController {
    store: PromptStore,
    events: broadcast::Sender<HostEvent>,
}

impl BindingController {
    pub fn new(store: PromptStore, events: broadcast::Sender<HostEvent>) -> Self {
        Self { store, events }
    }

    pub fn store(&self) -> &PromptStore {
        &self.store
    }

    /// Replaces the collection from a compiled session and announces the new
    /// full set to the host.
    pub fn apply_session(&mut self, bundle: &SessionBundle) {
        self.store.apply_session(bundle);
        self.notify();
    }

    /// MIDI path: first prompt bound to the incoming CC wins.
    pub fn handle_control_change(&mut self, change: ControlChange) -> bool {
        let updated = self.store.apply_control_change(change.cc, change.value);
        if updated {
            self.notify();
        }
        updated
    }

    /// Slider path. The weight arrives already normalized; unknown ids are
    /// ignored without an event.
    pub fn handle_slider_change(&mut self, id: &str, weight: f32) -> bool {
        let updated = self.store.set_weight(id, weight);
        if updated {
            self.notify();
        }
        updated
    }

    /// Host surface for the filtered list; presentational, so no event.
    pub fn set_filtered(&mut self, texts: Vec<String>) {
        self.store.set_filtered(texts);
    }

    fn notify(&self) {
        let _ = self.events.send(HostEvent::PromptsChanged {
            prompts: self.store.snapshot(),
        });
    }
}

pub type SharedBinding = Arc<Mutex<BindingController>>;

#[cfg(test)]
mod tests {
    use super::*;
    use session_format::{MidiSettings, PromptEntry, SessionBundle, SessionHeader};
    use tokio::sync::broadcast::error::TryRecvError;

    fn bundle(prompts: Vec<(&str, Option<u8>, f32)>) -> SessionBundle {
        SessionBundle {
            header: SessionHeader {
                version: session_format::SESSION_VERSION,
                source_hash: 0,
                generated_at: 0,
            },
            prompts: prompts
                .into_iter()
                .map(|(id, cc, weight)| PromptEntry {
                    id: id.into(),
                    text: format!("{id} text"),
                    color: "#9900ff".into(),
                    cc,
                    weight,
                })
                .collect(),
            filtered: vec![],
            midi: MidiSettings::default(),
        }
    }

    fn controller(
        prompts: Vec<(&str, Option<u8>, f32)>,
    ) -> (BindingController, broadcast::Receiver<HostEvent>) {
        let (tx, _) = broadcast::channel(32);
        let mut controller = BindingController::new(PromptStore::new(), tx.clone());
        controller.apply_session(&bundle(prompts));
        // Subscribe after setup so the session event is not observed.
        let rx = tx.subscribe();
        (controller, rx)
    }

    fn expect_snapshot(rx: &mut broadcast::Receiver<HostEvent>) -> Vec<Prompt> {
        match rx.try_recv().expect("expected a host event") {
            HostEvent::PromptsChanged { prompts } => prompts,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn control_change_emits_one_full_snapshot() {
        let (mut controller, mut rx) = controller(vec![("a", Some(1), 0.0), ("b", None, 0.3)]);
        assert!(controller.handle_control_change(ControlChange { cc: 1, value: 127 }));

        let prompts = expect_snapshot(&mut rx);
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].weight, 1.0);
        assert_eq!(prompts[1].weight, 0.3);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn duplicate_cc_snapshot_shows_first_match_only() {
        let (mut controller, mut rx) = controller(vec![("a", Some(1), 0.0), ("b", Some(1), 0.0)]);
        assert!(controller.handle_control_change(ControlChange { cc: 1, value: 127 }));

        let prompts = expect_snapshot(&mut rx);
        assert_eq!(prompts[0].weight, 1.0);
        assert_eq!(prompts[1].weight, 0.0);
    }

    #[test]
    fn unbound_cc_emits_nothing() {
        let (mut controller, mut rx) = controller(vec![("a", Some(1), 0.5)]);
        assert!(!controller.handle_control_change(ControlChange { cc: 9, value: 64 }));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn slider_change_emits_one_snapshot_with_new_weight() {
        let (mut controller, mut rx) = controller(vec![("c", None, 0.2)]);
        assert!(controller.handle_slider_change("c", 0.9));

        let prompts = expect_snapshot(&mut rx);
        assert_eq!(prompts[0].weight, 0.9);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn slider_change_on_unknown_id_emits_nothing() {
        let (mut controller, mut rx) = controller(vec![("a", None, 0.5)]);
        let before = controller.store().snapshot();
        assert!(!controller.handle_slider_change("gone", 0.9));
        assert_eq!(controller.store().snapshot(), before);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn set_filtered_emits_nothing() {
        let (mut controller, mut rx) = controller(vec![("a", None, 0.5)]);
        controller.set_filtered(vec!["a text".into()]);
        assert!(controller.store().is_filtered("a text"));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn apply_session_announces_new_set() {
        let (tx, mut rx) = broadcast::channel(32);
        let mut controller = BindingController::new(PromptStore::new(), tx);
        controller.apply_session(&bundle(vec![("a", Some(1), 0.4)]));

        let prompts = expect_snapshot(&mut rx);
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].id, "a");
        assert_eq!(prompts[0].weight, 0.4);
    }
}
