//! Shared session format describing the binary bundle produced by the builder.

use serde::{Deserialize, Serialize};

/// Current session format version.
pub const SESSION_VERSION: u32 = 1;

/// Header stored at the beginning of every session artifact.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SessionHeader {
    /// Session format version (`SESSION_VERSION`).
    pub version: u32,
    /// Hash of the source configuration (xxhash64).
    pub source_hash: u64,
    /// UNIX timestamp (seconds) when the bundle was generated.
    pub generated_at: u64,
}

/// Root structure serialized into a session file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SessionBundle {
    pub header: SessionHeader,
    /// Prompts in config order. Order is load-bearing: it defines both the
    /// CC-scan order and the render order at runtime.
    pub prompts: Vec<PromptEntry>,
    /// Prompt texts the host has flagged as filtered/excluded.
    pub filtered: Vec<String>,
    pub midi: MidiSettings,
}

/// A compiled prompt ready for runtime control.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PromptEntry {
    pub id: String,
    /// Label sent verbatim to the generation backend.
    pub text: String,
    /// Display-only `#rrggbb` color.
    pub color: String,
    /// Assigned MIDI Control Change number, if any.
    pub cc: Option<u8>,
    /// Initial normalized weight in [0, 1].
    pub weight: f32,
}

/// MIDI input preferences carried alongside the prompt set.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct MidiSettings {
    /// Substring matched against available port names when connecting.
    pub preferred_device: Option<String>,
}
