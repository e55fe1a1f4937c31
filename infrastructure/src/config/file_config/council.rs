//! Council run settings from TOML (`[council]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [council]
//! timeout_seconds = 90
//! consensus_threshold = 0.8
//! default_mode = "adversarial"
//! default_provider = "claude"
//! ```

use council_domain::{DEFAULT_CONSENSUS_THRESHOLD, Mode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest accepted per-call timeout (one day)
pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;

/// Raw `[council]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Per-call provider timeout in seconds
    pub timeout_seconds: u64,
    /// Mean pairwise keyword similarity of the adversarial drafts at which
    /// triage declares consensus and skips the attack phase
    pub consensus_threshold: f64,
    /// Force a mode instead of keyword selection (a `--mode` flag still wins)
    pub default_mode: Option<Mode>,
    /// Provider for any role or synthesizer seat left unbound
    pub default_provider: Option<String>,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            default_mode: None,
            default_provider: None,
        }
    }
}

impl FileCouncilConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
