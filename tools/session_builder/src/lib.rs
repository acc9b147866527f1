use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use config_validator::schema::{Config, PromptDef};
use config_validator::{ConfigError, ValidationIssue, parse_config_str, validate_config};
use session_format::{
    MidiSettings, PromptEntry, SESSION_VERSION, SessionBundle, SessionHeader,
};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug)]
pub struct BuildOutput {
    pub bundle: SessionBundle,
    pub diagnostics: Vec<ValidationIssue>,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ConfigError),
    #[error("Validation errors encountered")]
    Validation(Vec<ValidationIssue>),
    #[error("Serialization error: {0}")]
    Serialize(#[from] bincode::Error),
}

pub fn build_from_path(path: impl AsRef<Path>) -> Result<(BuildOutput, Vec<u8>), BuildError> {
    let path_ref = path.as_ref();
    let content = fs::read_to_string(path_ref)?;
    let output = build_from_str(&content)?;
    let bytes = bincode::serialize(&output.bundle)?;
    Ok((output, bytes))
}

pub fn build_from_str(content: &str) -> Result<BuildOutput, BuildError> {
    let config = parse_config_str(content)?;
    build_from_config(&config, content)
}

fn build_from_config(config: &Config, source: &str) -> Result<BuildOutput, BuildError> {
    let diagnostics = validate_config(config, source);
    if diagnostics
        .iter()
        .any(|issue| matches!(issue.severity, config_validator::Severity::Error))
    {
        return Err(BuildError::Validation(diagnostics));
    }

    let bundle = assemble_bundle(config, source);
    Ok(BuildOutput {
        bundle,
        diagnostics,
    })
}

fn assemble_bundle(config: &Config, source: &str) -> SessionBundle {
    let source_hash = xxh3_64(source.as_bytes());
    let generated_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    // Prompt order is preserved from the YAML document.
    let prompts = config.prompts.iter().map(convert_prompt).collect();

    SessionBundle {
        header: SessionHeader {
            version: SESSION_VERSION,
            source_hash,
            generated_at,
        },
        prompts,
        filtered: config.filtered.clone(),
        midi: MidiSettings {
            preferred_device: config
                .midi
                .as_ref()
                .and_then(|m| m.preferred_device.clone()),
        },
    }
}

fn convert_prompt(prompt: &PromptDef) -> PromptEntry {
    PromptEntry {
        id: prompt.id.clone(),
        text: prompt.text.clone(),
        color: prompt.color.clone(),
        cc: prompt.cc,
        weight: prompt.weight.clamp(0.0, 1.0),
    }
}
