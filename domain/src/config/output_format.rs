//! Output format value object

use serde::{Deserialize, Serialize};

/// How a council outcome is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the final artifact (and confidence line) (default)
    #[default]
    Artifact,
    /// Every round, the triage decision and critiques, then the artifact
    Full,
    /// The outcome as JSON
    Json,
}

impl OutputFormat {
    /// Whether this format needs the run transcript
    pub fn needs_transcript(&self) -> bool {
        !matches!(self, OutputFormat::Artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_artifact() {
        assert_eq!(OutputFormat::default(), OutputFormat::Artifact);
        assert!(!OutputFormat::Artifact.needs_transcript());
        assert!(OutputFormat::Full.needs_transcript());
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Full).unwrap();
        assert_eq!(json, "\"full\"");
    }

    #[test]
    fn test_deserialize_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
