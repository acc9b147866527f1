use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub midi: Option<MidiSection>,
    /// Prompts in file order. Order matters: it is the CC-scan order and the
    /// render order at runtime.
    #[serde(default)]
    pub prompts: Vec<PromptDef>,
    #[serde(default)]
    pub filtered: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MidiSection {
    #[serde(default)]
    pub preferred_device: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptDef {
    pub id: String,
    pub text: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub cc: Option<u8>,
    #[serde(default)]
    pub weight: f32,
}

fn default_color() -> String {
    "#9900ff".to_string()
}
