use serde::{Deserialize, Serialize};

// ===== AI Response Shapes =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineVersion {
    pub version: u32,
    pub text: String,
}

/// A version as the model writes it. Its own numbering is ignored, and a bare
/// string counts as the text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawRefineVersion {
    Text(String),
    Entry { text: String },
}

impl RawRefineVersion {
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Entry { text } => text,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RefineResponse {
    #[serde(default)]
    pub versions: Vec<RawRefineVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweakResult {
    pub field: String,
    #[serde(default)]
    pub original: String,
    pub tweaked: String,
}

#[derive(Debug, Deserialize)]
pub struct TweakResponse {
    #[serde(default)]
    pub tweaks: Vec<TweakResult>,
}

/// Result of applying a set of tweaks to a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweakOutcome {
    pub applied: usize,
    pub skipped: Vec<String>,
}
