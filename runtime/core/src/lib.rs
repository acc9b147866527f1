//! promptdeck core: a MIDI control surface for a generative-music backend.
//!
//! Incoming Control Change messages are mapped onto a set of weighted
//! prompts; every mutation is re-emitted to the host as a complete prompt
//! snapshot. The host owns playback and the generation stream.

pub mod app;
pub mod binding;
pub mod config;
pub mod midi;
pub mod runtime;
pub mod shell;
pub mod store;
pub mod watch;

pub use app::{AppState, AppStateError};
pub use binding::{BindingController, HostEvent, SharedBinding};
pub use config::{
    compile_session_from_path, compile_session_from_str, load_from_path, load_from_str,
    CompileError, CompiledSession, Diagnostic, DiagnosticSeverity, LoadError, LoadedConfig,
};
pub use midi::input::{AdapterHandle, DeviceAdapter, MidirAdapter};
pub use midi::{AdapterEvent, ControlChange, DeviceRegistry};
pub use runtime::{RuntimeManager, RuntimeManagerError};
pub use shell::{Shell, FALLBACK_NOTICE};
pub use store::{Prompt, PromptStore};
pub use watch::{watch_config, ReloadEvent, WatchHandle};
