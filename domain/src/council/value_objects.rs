//! Council value objects - the result of a run.
//!
//! - [`FinalArtifact`] - terminal text of the run
//! - [`Transcript`] - every round and decision, exposed in verbose runs
//! - [`CouncilOutcome`] - what the caller gets back

use crate::core::provider::ProviderId;
use crate::core::task::Task;
use crate::council::emergent::EmergentIdea;
use crate::council::entities::{ParticipantFailure, Round};
use crate::council::mode::{Mode, ModeSelection};
use crate::council::triage::TriageDecision;
use crate::council::verdict::{Critique, VerdictAssessment};
use serde::{Deserialize, Serialize};

/// Terminal text of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalArtifact {
    pub content: String,
    /// Provider that produced the synthesis
    pub producer: ProviderId,
    /// Ideas found in only one draft (collaborative mode)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emergent_ideas: Vec<EmergentIdea>,
}

impl FinalArtifact {
    pub fn new(content: impl Into<String>, producer: ProviderId) -> Self {
        Self {
            content: content.into(),
            producer,
            emergent_ideas: Vec::new(),
        }
    }

    pub fn with_emergent_ideas(mut self, ideas: Vec<EmergentIdea>) -> Self {
        self.emergent_ideas = ideas;
        self
    }
}

/// Full record of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub selection: ModeSelection,
    /// Sealed rounds in phase order
    pub rounds: Vec<Round>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triage: Option<TriageDecision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critiques: Vec<Critique>,
    /// Every failed slot across all rounds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ParticipantFailure>,
    /// Set when the artifact was built from fewer participants than planned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_input: Option<String>,
}

impl Transcript {
    pub fn new(selection: ModeSelection) -> Self {
        Self {
            selection,
            rounds: Vec::new(),
            triage: None,
            critiques: Vec::new(),
            failures: Vec::new(),
            incomplete_input: None,
        }
    }

    /// Record a sealed round and any failures in it
    pub fn push_round(&mut self, round: Round) {
        self.failures.extend(round.failures().cloned());
        self.incomplete_input = incomplete_input_note(&self.failures);
        self.rounds.push(round);
    }
}

/// Annotation describing which participants were missing, if any
pub fn incomplete_input_note(failures: &[ParticipantFailure]) -> Option<String> {
    if failures.is_empty() {
        return None;
    }
    let slots: Vec<String> = failures
        .iter()
        .map(|f| format!("{} ({})", f.role, f.phase.as_str()))
        .collect();
    Some(format!(
        "incomplete input: {} participant slot(s) failed: {}",
        failures.len(),
        slots.join(", ")
    ))
}

/// Result of one council run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilOutcome {
    pub task: Task,
    pub mode: Mode,
    pub final_artifact: FinalArtifact,
    /// Adversarial mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<VerdictAssessment>,
    /// Present only for verbose runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Transcript>,
}

impl CouncilOutcome {
    /// Artifact text as shown to the user.
    ///
    /// Adversarial runs end with the one-line confidence assessment.
    pub fn rendered_artifact(&self) -> String {
        match &self.verdict {
            Some(verdict) => format!(
                "{}\n\n{}",
                self.final_artifact.content.trim_end(),
                verdict.confidence_line()
            ),
            None => self.final_artifact.content.clone(),
        }
    }
}
