use std::path::PathBuf;

use crate::config::{
    compile_session_from_path, load_from_path, CompileError, CompiledSession, Diagnostic,
    LoadError, LoadedConfig,
};
use thiserror::Error;

/// Loaded + compiled view of the session configuration.
#[derive(Debug)]
pub struct AppState {
    config_path: PathBuf,
    pub loaded: LoadedConfig,
    pub compiled: CompiledSession,
}

#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("Failed to load config: {0}")]
    Load(#[from] LoadError),
    #[error("Failed to compile session: {0}")]
    Compile(#[from] CompileError),
}

impl AppState {
    pub fn initialize(config_path: impl Into<PathBuf>) -> Result<Self, AppStateError> {
        let path = config_path.into();
        let loaded = load_from_path(&path)?;
        let compiled = compile_session_from_path(&path)?;
        Ok(Self {
            config_path: path,
            loaded,
            compiled,
        })
    }

    /// Re-reads the config from disk. On failure the previous state is kept.
    pub fn reload(&mut self) -> Result<(), AppStateError> {
        let loaded = load_from_path(&self.config_path)?;
        let compiled = compile_session_from_path(&self.config_path)?;
        self.loaded = loaded;
        self.compiled = compiled;
        Ok(())
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.compiled.diagnostics
    }

    pub fn compiled_session(&self) -> &CompiledSession {
        &self.compiled
    }
}
