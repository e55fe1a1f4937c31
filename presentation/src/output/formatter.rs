//! Output formatter trait

use council_domain::{CouncilOutcome, OutputFormat};

/// Trait for formatting council outcomes
pub trait OutputFormatter {
    /// Every round, the triage decision, critiques and the artifact
    fn format_full(&self, outcome: &CouncilOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &CouncilOutcome) -> String;

    /// Only the final artifact (concise output)
    fn format_artifact(&self, outcome: &CouncilOutcome) -> String;

    /// Render in the requested format
    fn render(&self, outcome: &CouncilOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Artifact => self.format_artifact(outcome),
            OutputFormat::Full => self.format_full(outcome),
            OutputFormat::Json => self.format_json(outcome),
        }
    }
}
