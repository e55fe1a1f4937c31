//! Output and transcript settings from TOML (`[output]`, `[logging]` sections)

use council_domain::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format; `-o` on the command line wins
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Raw `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for JSONL run transcripts; none disables them
    pub transcript_dir: Option<PathBuf>,
}
