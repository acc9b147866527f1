use std::collections::{HashMap, HashSet};

use crate::schema::Config;

#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
    pub location: Option<Location>,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl ValidationIssue {
    pub fn new(path: String, message: String, severity: Severity) -> Self {
        Self {
            path,
            message,
            location: None,
            severity,
        }
    }
}

pub fn validate_config(config: &Config, source: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if config.version != 1 {
        issues.push(ValidationIssue::new(
            "version".into(),
            format!("Unsupported schema version {} (expected 1)", config.version),
            Severity::Error,
        ));
    }

    let mut seen_ids = HashSet::new();
    let mut cc_owners: HashMap<u8, String> = HashMap::new();

    for (idx, prompt) in config.prompts.iter().enumerate() {
        let path = if prompt.id.trim().is_empty() {
            format!("prompts[{idx}]")
        } else {
            format!("prompts.{}", prompt.id)
        };

        if prompt.id.trim().is_empty() {
            issues.push(ValidationIssue::new(
                format!("{path}.id"),
                "Prompt id must not be empty".into(),
                Severity::Error,
            ));
        } else if !seen_ids.insert(prompt.id.clone()) {
            issues.push(ValidationIssue::new(
                format!("{path}.id"),
                format!("Duplicate prompt id `{}`", prompt.id),
                Severity::Error,
            ));
        }

        if prompt.text.trim().is_empty() {
            issues.push(ValidationIssue::new(
                format!("{path}.text"),
                "Prompt text must not be empty".into(),
                Severity::Error,
            ));
        }

        if !(0.0..=1.0).contains(&prompt.weight) {
            issues.push(ValidationIssue::new(
                format!("{path}.weight"),
                format!("Weight {} outside [0.0, 1.0]", prompt.weight),
                Severity::Error,
            ));
        }

        if !is_hex_color(&prompt.color) {
            issues.push(ValidationIssue::new(
                format!("{path}.color"),
                format!("Color `{}` is not of the form #rrggbb", prompt.color),
                Severity::Warning,
            ));
        }

        if let Some(cc) = prompt.cc {
            if cc > 127 {
                issues.push(ValidationIssue::new(
                    format!("{path}.cc"),
                    "CC number must be between 0 and 127".into(),
                    Severity::Error,
                ));
            } else if let Some(existing) = cc_owners.insert(cc, prompt.id.clone()) {
                // Runtime resolves this silently in favor of the earlier
                // prompt; surfaced here so the author can see it.
                issues.push(ValidationIssue::new(
                    format!("{path}.cc"),
                    format!(
                        "CC {} already assigned to prompt `{}`; only the earlier prompt will respond",
                        cc, existing
                    ),
                    Severity::Warning,
                ));
            }
        }
    }

    let prompt_texts: HashSet<&str> = config.prompts.iter().map(|p| p.text.as_str()).collect();
    for (idx, text) in config.filtered.iter().enumerate() {
        if !prompt_texts.contains(text.as_str()) {
            issues.push(ValidationIssue::new(
                format!("filtered[{idx}]"),
                format!("Filtered text `{}` matches no prompt", text),
                Severity::Warning,
            ));
        }
    }

    attach_locations(source, issues)
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn attach_locations(source: &str, mut issues: Vec<ValidationIssue>) -> Vec<ValidationIssue> {
    for issue in &mut issues {
        issue.location = find_location(source, &issue.path);
    }
    issues
}

fn find_location(source: &str, path: &str) -> Option<Location> {
    let needle = path.split('.').last()?;
    for (idx, line) in source.lines().enumerate() {
        if line.contains(needle) {
            let column = line.find(needle).map(|c| c + 1).unwrap_or(1);
            return Some(Location {
                line: idx + 1,
                column,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_str;

    #[test]
    fn valid_config_passes() {
        let yaml = r##"version: 1
prompts:
  - id: drums
    text: "Punchy kick drums"
    color: "#ff5500"
    cc: 1
    weight: 0.5
filtered: []
"##;
        let cfg = parse_config_str(yaml).expect("parse");
        let issues = validate_config(&cfg, yaml);
        assert!(issues.is_empty());
    }

    #[test]
    fn duplicate_cc_warns() {
        let yaml = r#"version: 1
prompts:
  - id: a
    text: "First"
    cc: 64
  - id: b
    text: "Second"
    cc: 64
"#;
        let cfg = parse_config_str(yaml).expect("parse");
        let issues = validate_config(&cfg, yaml);
        assert!(issues.iter().any(|i| {
            i.severity == Severity::Warning && i.message.contains("only the earlier prompt")
        }));
        assert!(!issues.iter().any(|i| i.severity == Severity::Error));
    }

    #[test]
    fn duplicate_id_errors() {
        let yaml = r#"version: 1
prompts:
  - id: same
    text: "One"
  - id: same
    text: "Two"
"#;
        let cfg = parse_config_str(yaml).expect("parse");
        let issues = validate_config(&cfg, yaml);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Error && i.message.contains("Duplicate prompt id")));
    }

    #[test]
    fn out_of_range_weight_errors() {
        let yaml = r#"version: 1
prompts:
  - id: loud
    text: "Too loud"
    weight: 1.5
"#;
        let cfg = parse_config_str(yaml).expect("parse");
        let issues = validate_config(&cfg, yaml);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Error && i.path == "prompts.loud.weight"));
    }

    #[test]
    fn malformed_color_warns() {
        let yaml = r#"version: 1
prompts:
  - id: odd
    text: "Odd color"
    color: "red"
"#;
        let cfg = parse_config_str(yaml).expect("parse");
        let issues = validate_config(&cfg, yaml);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.path == "prompts.odd.color"));
    }

    #[test]
    fn unmatched_filtered_text_warns() {
        let yaml = r#"version: 1
prompts:
  - id: a
    text: "Present"
filtered:
  - "Absent"
"#;
        let cfg = parse_config_str(yaml).expect("parse");
        let issues = validate_config(&cfg, yaml);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.path == "filtered[0]"));
    }

    #[test]
    fn wrong_version_errors() {
        let yaml = "version: 2\nprompts: []\n";
        let cfg = parse_config_str(yaml).expect("parse");
        let issues = validate_config(&cfg, yaml);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Error && i.path == "version"));
    }
}
