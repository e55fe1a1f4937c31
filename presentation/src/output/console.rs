//! Console output formatter for council outcomes

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_application::RunCouncilError;
use council_domain::{
    ConsensusReason, Critique, CouncilOutcome, ModeSelection, Round, SelectionReason,
    SlotOutcome, Transcript, TriageDecision,
};

/// Formats council outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn colored output off (`[output] color = false`)
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// Format the complete outcome, transcript included when present
    pub fn format(outcome: &CouncilOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Agent Council Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Task:".cyan().bold(),
            outcome.task.content()
        ));

        match &outcome.transcript {
            Some(transcript) => {
                output.push_str(&format!(
                    "{} {}\n",
                    "Mode:".cyan().bold(),
                    Self::describe_selection(&transcript.selection)
                ));
                output.push_str(&Self::format_transcript(transcript));
            }
            None => {
                output.push_str(&format!("{} {}\n", "Mode:".cyan().bold(), outcome.mode));
            }
        }

        output.push_str(&Self::section_header("Final Artifact"));
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            format!("Produced by: {}", outcome.final_artifact.producer)
                .yellow()
                .bold(),
            outcome.rendered_artifact()
        ));

        if !outcome.final_artifact.emergent_ideas.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                "Ideas unique to one participant:".cyan().bold()
            ));
            for idea in &outcome.final_artifact.emergent_ideas {
                output.push_str(&format!("  * ({}) {}\n", idea.source.label(), idea.text));
            }
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &CouncilOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the artifact only (concise output)
    pub fn format_artifact(outcome: &CouncilOutcome) -> String {
        let mut output = outcome.rendered_artifact();
        if !output.ends_with('\n') {
            output.push('\n');
        }
        output
    }

    /// Report for a run that produced no artifact
    pub fn format_failure(error: &RunCouncilError) -> String {
        match error {
            RunCouncilError::RunFailed { phase, failures } => {
                let mut output = format!(
                    "{} every participant failed in the {} phase\n",
                    "Council run failed:".red().bold(),
                    phase.as_str()
                );
                for failure in failures {
                    output.push_str(&format!(
                        "  {} {}: {}\n",
                        "x".red(),
                        failure.role.label(),
                        failure.reason()
                    ));
                }
                output
            }
            RunCouncilError::SynthesisFailed { attempts } => {
                let mut output = format!(
                    "{} the synthesizer produced no artifact\n",
                    "Council run failed:".red().bold()
                );
                if attempts.is_empty() {
                    output.push_str("  no synthesizer providers configured\n");
                }
                for attempt in attempts {
                    output.push_str(&format!(
                        "  {} {}: {}\n",
                        "x".red(),
                        attempt.provider,
                        attempt.error
                    ));
                }
                output
            }
            RunCouncilError::Cancelled => format!("{}\n", "Council run cancelled".yellow()),
            other => format!("{} {}\n", "Council run failed:".red().bold(), other),
        }
    }

    fn format_transcript(transcript: &Transcript) -> String {
        let mut output = String::new();

        for round in &transcript.rounds {
            output.push_str(&Self::format_round(round));
        }

        if let Some(decision) = &transcript.triage {
            output.push_str(&Self::section_header("Triage"));
            output.push_str(&format!("\n{}\n", Self::describe_triage(decision)));
        }

        if !transcript.critiques.is_empty() {
            output.push_str(&Self::section_header("Critique Summary"));
            output.push('\n');
            for critique in &transcript.critiques {
                output.push_str(&Self::describe_critique(critique));
            }
        }

        if let Some(note) = &transcript.incomplete_input {
            output.push_str(&format!("\n{} {}\n", "Note:".yellow().bold(), note));
        }

        output
    }

    fn format_round(round: &Round) -> String {
        let mut output = Self::section_header(&format!("{} Round", round.phase().display_name()));
        for role in round.roles() {
            match round.outcome(role) {
                Some(SlotOutcome::Drafted(draft)) => {
                    output.push_str(&format!(
                        "\n{}\n{}\n",
                        format!("── {} ({}) ──", role.label(), draft.provider)
                            .yellow()
                            .bold(),
                        draft.content
                    ));
                }
                Some(SlotOutcome::Failed(failure)) => {
                    output.push_str(&format!(
                        "\n{}\nError: {}\n",
                        format!("── {} ──", role.label()).red().bold(),
                        failure.reason()
                    ));
                }
                None => {}
            }
        }
        output
    }

    fn describe_selection(selection: &ModeSelection) -> String {
        let reason = match &selection.reason {
            SelectionReason::Explicit => "requested".to_string(),
            SelectionReason::Marker(marker) => format!("marker '{}'", marker),
            SelectionReason::Keyword(keyword) => format!("keyword '{}'", keyword),
            SelectionReason::Default => "default".to_string(),
        };
        format!("{} ({})", selection.mode, reason)
    }

    fn describe_triage(decision: &TriageDecision) -> String {
        match decision {
            TriageDecision::Consensus {
                reason: ConsensusReason::MatchingPositions { position },
            } => format!(
                "{} every draft takes the position '{}'",
                "Consensus:".green().bold(),
                position
            ),
            TriageDecision::Consensus {
                reason: ConsensusReason::HighSimilarity { similarity },
            } => format!(
                "{} drafts agree (similarity {:.2})",
                "Consensus:".green().bold(),
                similarity
            ),
            TriageDecision::Consensus {
                reason: ConsensusReason::SingleDraft { role },
            } => format!(
                "{} only {} produced a draft",
                "Consensus:".green().bold(),
                role.label()
            ),
            TriageDecision::Leading {
                role,
                confidence,
                centrality,
            } => {
                let confidence = confidence
                    .map(|c| format!("{:.0}", c))
                    .unwrap_or_else(|| "n/a".to_string());
                format!(
                    "{} {} (confidence {}, centrality {:.2})",
                    "Leading draft:".cyan().bold(),
                    role.label(),
                    confidence,
                    centrality
                )
            }
        }
    }

    fn describe_critique(critique: &Critique) -> String {
        let recommendation = critique
            .recommendation
            .map(|r| format!("{:?}", r).to_uppercase())
            .unwrap_or_else(|| "NONE".to_string());
        format!(
            "  * {}: {} fatal, {} major, {} minor; recommends {}\n",
            critique.role.label(),
            critique.severities.fatal,
            critique.severities.major,
            critique.severities.minor,
            recommendation
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, outcome: &CouncilOutcome) -> String {
        Self::format(outcome)
    }

    fn format_json(&self, outcome: &CouncilOutcome) -> String {
        Self::format_json(outcome)
    }

    fn format_artifact(&self, outcome: &CouncilOutcome) -> String {
        Self::format_artifact(outcome)
    }
}
