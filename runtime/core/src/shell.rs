//! Headless projection of the control surface. The host renders these lines
//! however it likes; the shell holds only transient presentation flags and
//! never mutates the store.

use crate::midi::DeviceRegistry;
use crate::store::{Prompt, PromptStore};

const BAR_WIDTH: usize = 10;

/// Shown instead of the slider grid when the platform has no MIDI input.
pub const FALLBACK_NOTICE: &str = "MIDI input is not available in this environment.";

#[derive(Debug)]
pub struct Shell {
    midi_supported: bool,
    show_cc_numbers: bool,
    playing: bool,
}

impl Shell {
    pub fn new(midi_supported: bool) -> Self {
        Self {
            midi_supported,
            show_cc_numbers: false,
            playing: false,
        }
    }

    pub fn set_show_cc_numbers(&mut self, show: bool) {
        self.show_cc_numbers = show;
    }

    pub fn toggle_cc_numbers(&mut self) {
        self.show_cc_numbers = !self.show_cc_numbers;
    }

    /// Displayed playback state. Set from the host's acknowledgment; the
    /// host owns the real playback machine.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn render(&self, store: &PromptStore, registry: &DeviceRegistry) -> Vec<String> {
        if !self.midi_supported {
            // A branch, not a degraded mode: no sliders, no retry affordance.
            return vec![
                FALLBACK_NOTICE.to_string(),
                "Prompt weights remain adjustable from the host.".to_string(),
            ];
        }

        let mut lines = Vec::with_capacity(store.prompts().len() + 2);
        lines.push(format!(
            "playback: {}",
            if self.playing { "playing" } else { "paused" }
        ));
        lines.push(match registry.active() {
            Some(device) => format!("device: {device}"),
            None => "device: none".to_string(),
        });
        for prompt in store.prompts() {
            lines.push(self.prompt_row(prompt, store));
        }
        lines
    }

    fn prompt_row(&self, prompt: &Prompt, store: &PromptStore) -> String {
        let mut row = format!(
            "[{}] {:>4.2}  {}",
            weight_bar(prompt.weight),
            prompt.weight,
            prompt.text
        );
        if self.show_cc_numbers {
            if let Some(cc) = prompt.cc {
                row.push_str(&format!("  (cc {cc})"));
            }
        }
        if store.is_filtered(&prompt.text) {
            row.push_str("  [filtered]");
        }
        row
    }
}

fn weight_bar(weight: f32) -> String {
    let filled = (weight * BAR_WIDTH as f32).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let mut bar = String::with_capacity(BAR_WIDTH);
    bar.push_str(&"#".repeat(filled));
    bar.push_str(&"-".repeat(BAR_WIDTH - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_format::{MidiSettings, PromptEntry, SessionBundle, SessionHeader};

    fn store_with(prompts: Vec<PromptEntry>, filtered: Vec<String>) -> PromptStore {
        let mut store = PromptStore::new();
        store.apply_session(&SessionBundle {
            header: SessionHeader {
                version: session_format::SESSION_VERSION,
                source_hash: 0,
                generated_at: 0,
            },
            prompts,
            filtered,
            midi: MidiSettings::default(),
        });
        store
    }

    fn entry(id: &str, text: &str, cc: Option<u8>, weight: f32) -> PromptEntry {
        PromptEntry {
            id: id.into(),
            text: text.into(),
            color: "#9900ff".into(),
            cc,
            weight,
        }
    }

    #[test]
    fn unsupported_platform_renders_fallback_only() {
        let store = store_with(vec![entry("a", "Punchy drums", Some(1), 0.5)], vec![]);
        let registry = DeviceRegistry::new();
        let shell = Shell::new(false);

        let lines = shell.render(&store, &registry);
        assert!(lines.iter().any(|l| l.contains(FALLBACK_NOTICE)));
        assert!(!lines.iter().any(|l| l.contains("Punchy drums")));
        assert!(!lines.iter().any(|l| l.starts_with('[')));
    }

    #[test]
    fn supported_platform_renders_one_row_per_prompt() {
        let store = store_with(
            vec![
                entry("a", "Punchy drums", Some(1), 1.0),
                entry("b", "Warm pads", None, 0.0),
            ],
            vec![],
        );
        let mut registry = DeviceRegistry::new();
        registry.apply_state_change(vec!["Port A".into()]);
        registry.select("Port A");
        let shell = Shell::new(true);

        let lines = shell.render(&store, &registry);
        assert_eq!(lines[0], "playback: paused");
        assert_eq!(lines[1], "device: Port A");
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("Punchy drums"));
        assert!(lines[2].contains("##########"));
        assert!(lines[3].contains("Warm pads"));
        assert!(lines[3].contains("----------"));
    }

    #[test]
    fn cc_overlay_is_a_toggle() {
        let store = store_with(vec![entry("a", "Punchy drums", Some(7), 0.5)], vec![]);
        let registry = DeviceRegistry::new();
        let mut shell = Shell::new(true);

        assert!(!shell
            .render(&store, &registry)
            .iter()
            .any(|l| l.contains("(cc 7)")));
        shell.toggle_cc_numbers();
        assert!(shell
            .render(&store, &registry)
            .iter()
            .any(|l| l.contains("(cc 7)")));
    }

    #[test]
    fn filtered_prompts_carry_disabled_marker() {
        let store = store_with(
            vec![entry("a", "Warm pads", None, 0.5)],
            vec!["Warm pads".into()],
        );
        let registry = DeviceRegistry::new();
        let shell = Shell::new(true);

        let lines = shell.render(&store, &registry);
        assert!(lines.iter().any(|l| l.contains("[filtered]")));
    }

    #[test]
    fn playback_flag_reflects_host_ack() {
        let store = store_with(vec![], vec![]);
        let registry = DeviceRegistry::new();
        let mut shell = Shell::new(true);
        shell.set_playing(true);

        let lines = shell.render(&store, &registry);
        assert_eq!(lines[0], "playback: playing");
    }
}
