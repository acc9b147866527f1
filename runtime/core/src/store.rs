//! Prompt store: the single source of truth for the weighted prompt set.

use std::collections::HashSet;

use session_format::SessionBundle;

/// One generation parameter as held at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub id: String,
    pub text: String,
    /// Display-only attribute; no behavioral effect.
    pub color: String,
    pub cc: Option<u8>,
    /// Normalized intensity, always within [0.0, 1.0].
    pub weight: f32,
}

/// Ordered prompt collection plus the host-flagged filtered texts.
///
/// Order is the config order and defines both the CC-scan order and the
/// render order. Membership is fixed at this layer: no operation here adds
/// or removes prompts; a session reload replaces the whole collection.
#[derive(Debug, Default)]
pub struct PromptStore {
    prompts: Vec<Prompt>,
    filtered: HashSet<String>,
}

impl PromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the collection from a compiled session bundle.
    pub fn apply_session(&mut self, bundle: &SessionBundle) {
        self.prompts = bundle
            .prompts
            .iter()
            .map(|entry| Prompt {
                id: entry.id.clone(),
                text: entry.text.clone(),
                color: entry.color.clone(),
                cc: entry.cc,
                weight: entry.weight.clamp(0.0, 1.0),
            })
            .collect();
        self.filtered = bundle.filtered.iter().cloned().collect();
    }

    /// Applies an incoming Control Change to the first prompt bound to the
    /// given CC number, in collection order. Later prompts sharing the same
    /// assignment are untouched; the first-match tie-break is deliberate.
    /// Returns true iff a prompt was updated.
    pub fn apply_control_change(&mut self, cc: u8, value: u8) -> bool {
        for prompt in &mut self.prompts {
            if prompt.cc == Some(cc) {
                prompt.weight = f32::from(value) / 127.0;
                return true;
            }
        }
        false
    }

    /// Sets a prompt's weight directly (slider path). Unknown ids are stale
    /// view references, not faults: the call is a no-op returning false.
    pub fn set_weight(&mut self, id: &str, weight: f32) -> bool {
        match self.prompts.iter_mut().find(|p| p.id == id) {
            Some(prompt) => {
                prompt.weight = weight.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Full ordered copy of the collection, for `prompts-changed` payloads.
    pub fn snapshot(&self) -> Vec<Prompt> {
        self.prompts.clone()
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn get(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn is_filtered(&self, text: &str) -> bool {
        self.filtered.contains(text)
    }

    /// Replaces the filtered set. Host surface only; emits nothing.
    pub fn set_filtered(&mut self, texts: impl IntoIterator<Item = String>) {
        self.filtered = texts.into_iter().collect();
    }
}
