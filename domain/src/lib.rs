//! Domain layer for agent-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A task is answered by three role-bound participants across strictly
//! ordered phases, producing exactly one final artifact:
//!
//! - **Collaborative**: Draft → Improve → Synthesize
//! - **Adversarial**: Draft → Triage → Attack → Judge, with a verdict
//!
//! Every decision made between phases (mode selection, payload building,
//! triage, verdict derivation) is a pure function of sealed rounds.

pub mod config;
pub mod core;
pub mod council;
pub mod prompt;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::DomainError, provider::ProviderId, task::Task};
pub use council::{
    emergent::{EmergentIdea, ensure_emergent_ideas, find_emergent_ideas},
    entities::{
        Draft, ParticipantFailure, Phase, ProviderAttempt, Round, RoundAccumulator, SlotOutcome,
    },
    mode::{Mode, ModeSelection, SelectionReason, select_mode},
    role::Role,
    round_builder::Payload,
    triage::{ConsensusReason, DEFAULT_CONSENSUS_THRESHOLD, TriageDecision, triage},
    value_objects::{CouncilOutcome, FinalArtifact, Transcript},
    verdict::{
        Confidence, Critique, Recommendation, SeverityCounts, Verdict, VerdictAssessment,
        VerdictSource,
    },
};
pub use prompt::{PromptTemplate, RoleTemplate, role_template};
