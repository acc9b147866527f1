use std::path::Path;
use std::{fs, path::PathBuf};

use config_validator::schema::{Config, PromptDef};
use config_validator::{
    parse_config_str, validate_config, ConfigError, Location, Severity, ValidationIssue,
};
use session_builder::{
    build_from_path as builder_build_from_path, build_from_str as builder_build_from_str,
    BuildError,
};
use session_format::SessionBundle;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

impl From<Severity> for DiagnosticSeverity {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Error => DiagnosticSeverity::Error,
            Severity::Warning => DiagnosticSeverity::Warning,
            Severity::Info => DiagnosticSeverity::Info,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub path: String,
    pub message: String,
    pub location: Option<Location>,
    pub severity: DiagnosticSeverity,
}

#[derive(Debug)]
pub struct LoadedConfig {
    pub path: Option<PathBuf>,
    pub config: Config,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedConfig {
    /// Prompts with a CC assignment, in file order.
    pub fn bound_prompts(&self) -> impl Iterator<Item = &PromptDef> {
        self.config.prompts.iter().filter(|p| p.cc.is_some())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error while reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ConfigError),
    #[error("Validation errors prevented loading")]
    Validation(Vec<Diagnostic>),
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<LoadedConfig, LoadError> {
    let path_ref = path.as_ref();
    let content = fs::read_to_string(path_ref)?;
    let mut loaded = load_from_str(&content)?;
    loaded.path = Some(path_ref.to_path_buf());
    Ok(loaded)
}

pub fn load_from_str(content: &str) -> Result<LoadedConfig, LoadError> {
    let config = parse_config_str(content)?;
    let diagnostics = convert_issues(validate_config(&config, content));

    if diagnostics
        .iter()
        .any(|diag| diag.severity == DiagnosticSeverity::Error)
    {
        return Err(LoadError::Validation(diagnostics));
    }

    Ok(LoadedConfig {
        path: None,
        config,
        diagnostics,
    })
}

#[derive(Debug, Clone)]
pub struct CompiledSession {
    pub bundle: SessionBundle,
    pub diagnostics: Vec<Diagnostic>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Validation errors prevented session build")]
    Validation(Vec<Diagnostic>),
    #[error("Session serialization failed: {0}")]
    Serialize(bincode::Error),
    #[error("Session build failed: {0}")]
    Build(BuildError),
}

pub fn compile_session_from_path(path: impl AsRef<Path>) -> Result<CompiledSession, CompileError> {
    match builder_build_from_path(path) {
        Ok((output, bytes)) => {
            let diagnostics = convert_issues(output.diagnostics);
            Ok(CompiledSession {
                bundle: output.bundle,
                diagnostics,
                bytes,
            })
        }
        Err(BuildError::Validation(diags)) => Err(CompileError::Validation(convert_issues(diags))),
        Err(err) => Err(CompileError::Build(err)),
    }
}

pub fn compile_session_from_str(content: &str) -> Result<CompiledSession, CompileError> {
    match builder_build_from_str(content) {
        Ok(output) => {
            let diagnostics = convert_issues(output.diagnostics);
            let bytes = bincode::serialize(&output.bundle).map_err(CompileError::Serialize)?;
            Ok(CompiledSession {
                bundle: output.bundle,
                diagnostics,
                bytes,
            })
        }
        Err(BuildError::Validation(diags)) => Err(CompileError::Validation(convert_issues(diags))),
        Err(err) => Err(CompileError::Build(err)),
    }
}

fn convert_issues(issues: Vec<ValidationIssue>) -> Vec<Diagnostic> {
    issues.into_iter().map(convert_issue).collect()
}

fn convert_issue(issue: ValidationIssue) -> Diagnostic {
    Diagnostic {
        path: issue.path,
        message: issue.message,
        location: issue.location,
        severity: DiagnosticSeverity::from(issue.severity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_reports_bound_prompts() {
        let yaml = r#"version: 1
prompts:
  - id: drums
    text: "Punchy kick drums"
    cc: 1
  - id: pads
    text: "Warm analog pads"
filtered: []
"#;
        let loaded = load_from_str(yaml).expect("should load");
        let bound: Vec<_> = loaded.bound_prompts().map(|p| p.id.as_str()).collect();
        assert_eq!(bound, vec!["drums"]);
        assert!(loaded.diagnostics.is_empty());
    }

    #[test]
    fn validation_error_prevents_load() {
        let yaml = r#"version: 1
prompts:
  - id: bad
    text: ""
"#;
        let err = load_from_str(yaml).unwrap_err();
        match err {
            LoadError::Validation(diags) => {
                assert!(diags
                    .iter()
                    .any(|d| d.severity == DiagnosticSeverity::Error));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn compile_session_preserves_order_and_warnings() {
        let yaml = r#"version: 1
prompts:
  - id: a
    text: "First"
    cc: 5
  - id: b
    text: "Second"
    cc: 5
"#;
        let compiled = compile_session_from_str(yaml).expect("compile");
        let ids: Vec<_> = compiled.bundle.prompts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(compiled
            .diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Warning));
        assert!(!compiled.bytes.is_empty());
    }

    #[test]
    fn compile_session_fails_on_invalid_config() {
        let yaml = r#"version: 1
prompts:
  - id: bad
    text: "Over range"
    weight: 2.0
"#;
        let err = compile_session_from_str(yaml).unwrap_err();
        match err {
            CompileError::Validation(diags) => {
                assert!(diags
                    .iter()
                    .any(|d| d.severity == DiagnosticSeverity::Error));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
