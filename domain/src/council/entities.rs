//! Council domain entities: phases, drafts and rounds.
//!
//! A [`RoundAccumulator`] collects outcomes while a phase is in flight; it is
//! written at most once per role. Sealing it yields an immutable [`Round`],
//! which is the only thing later phases may read.

use crate::core::error::DomainError;
use crate::core::provider::ProviderId;
use crate::council::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Phase of a council run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Every participant drafts an independent answer
    Draft,
    /// Collaborative: each participant improves using its peers' drafts
    Improve,
    /// Adversarial: pick a leading draft or declare consensus (no calls)
    Triage,
    /// Adversarial: non-leading participants critique the leading draft
    Attack,
    /// The synthesizer/judge produces the final artifact
    Synthesis,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Draft => "draft",
            Phase::Improve => "improve",
            Phase::Triage => "triage",
            Phase::Attack => "attack",
            Phase::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Draft => "Draft",
            Phase::Improve => "Improve",
            Phase::Triage => "Triage",
            Phase::Attack => "Attack",
            Phase::Synthesis => "Synthesis",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Text produced by one participant in one phase.
///
/// Immutable once produced; later phases hold it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub role: Role,
    pub phase: Phase,
    /// Provider that actually answered (may be a fallback)
    pub provider: ProviderId,
    pub content: String,
}

impl Draft {
    pub fn new(role: Role, phase: Phase, provider: ProviderId, content: impl Into<String>) -> Self {
        Self {
            role,
            phase,
            provider,
            content: content.into(),
        }
    }
}

/// One failed provider attempt within a participant's fallback chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAttempt {
    pub provider: ProviderId,
    pub error: String,
}

/// A participant that ended its phase without a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantFailure {
    pub role: Role,
    pub phase: Phase,
    /// Every provider tried, in order
    pub attempts: Vec<ProviderAttempt>,
    /// Set when the phase deadline cut the participant off
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deadline_exceeded: bool,
}

impl ParticipantFailure {
    pub fn new(role: Role, phase: Phase, attempts: Vec<ProviderAttempt>) -> Self {
        Self {
            role,
            phase,
            attempts,
            deadline_exceeded: false,
        }
    }

    /// Failure recorded when the phase barrier closed on a running call
    pub fn deadline(role: Role, phase: Phase) -> Self {
        Self {
            role,
            phase,
            attempts: Vec::new(),
            deadline_exceeded: true,
        }
    }

    /// One-line summary of why the participant failed
    pub fn reason(&self) -> String {
        if self.deadline_exceeded {
            return "phase deadline exceeded".to_string();
        }
        if self.attempts.is_empty() {
            return "no providers configured".to_string();
        }
        self.attempts
            .iter()
            .map(|a| format!("{}: {}", a.provider, a.error))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Terminal state of a participant's slot in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum SlotOutcome {
    Drafted(Arc<Draft>),
    Failed(ParticipantFailure),
}

impl SlotOutcome {
    pub fn draft(&self) -> Option<&Arc<Draft>> {
        match self {
            SlotOutcome::Drafted(draft) => Some(draft),
            SlotOutcome::Failed(_) => None,
        }
    }

    pub fn is_drafted(&self) -> bool {
        matches!(self, SlotOutcome::Drafted(_))
    }
}

#[derive(Debug, Clone)]
enum SlotState {
    Pending,
    Settled(SlotOutcome),
}

/// Mutable accumulator for a phase in flight.
///
/// Each role is written at most once; a second write for the same role is
/// ignored.
#[derive(Debug, Clone)]
pub struct RoundAccumulator {
    phase: Phase,
    slots: BTreeMap<Role, SlotState>,
}

impl RoundAccumulator {
    pub fn new(phase: Phase, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            phase,
            slots: roles.into_iter().map(|r| (r, SlotState::Pending)).collect(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Record a participant's outcome. Returns `false` if the role was not
    /// dispatched in this phase or already settled.
    pub fn record(&mut self, role: Role, outcome: SlotOutcome) -> bool {
        match self.slots.get_mut(&role) {
            Some(slot) if matches!(slot, SlotState::Pending) => {
                *slot = SlotState::Settled(outcome);
                true
            }
            _ => false,
        }
    }

    /// Roles that have not settled yet
    pub fn pending(&self) -> Vec<Role> {
        self.slots
            .iter()
            .filter(|(_, s)| matches!(s, SlotState::Pending))
            .map(|(r, _)| *r)
            .collect()
    }

    /// Mark every still-pending slot as failed by the phase deadline
    pub fn expire_pending(&mut self) {
        let phase = self.phase;
        for (role, slot) in self.slots.iter_mut() {
            if matches!(slot, SlotState::Pending) {
                *slot = SlotState::Settled(SlotOutcome::Failed(ParticipantFailure::deadline(
                    *role, phase,
                )));
            }
        }
    }

    /// Close the barrier. Fails if any participant is still outstanding.
    pub fn seal(self) -> Result<Round, DomainError> {
        let pending = self.pending();
        if !pending.is_empty() {
            return Err(DomainError::RoundIncomplete {
                phase: self.phase,
                pending,
            });
        }

        let slots = self
            .slots
            .into_iter()
            .filter_map(|(role, state)| match state {
                SlotState::Settled(outcome) => Some((role, outcome)),
                SlotState::Pending => None,
            })
            .collect();

        Ok(Round {
            phase: self.phase,
            slots,
        })
    }
}

/// A complete, read-only set of outcomes for one phase, keyed by role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    phase: Phase,
    slots: BTreeMap<Role, SlotOutcome>,
}

impl Round {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.slots.keys().copied()
    }

    pub fn outcome(&self, role: Role) -> Option<&SlotOutcome> {
        self.slots.get(&role)
    }

    pub fn draft(&self, role: Role) -> Option<&Arc<Draft>> {
        self.slots.get(&role).and_then(SlotOutcome::draft)
    }

    /// Drafts in roster order
    pub fn drafts(&self) -> impl Iterator<Item = &Arc<Draft>> {
        self.slots.values().filter_map(SlotOutcome::draft)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ParticipantFailure> {
        self.slots.values().filter_map(|o| match o {
            SlotOutcome::Failed(f) => Some(f),
            SlotOutcome::Drafted(_) => None,
        })
    }

    pub fn draft_count(&self) -> usize {
        self.drafts().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Every dispatched participant failed
    pub fn is_total_failure(&self) -> bool {
        !self.slots.is_empty() && self.draft_count() == 0
    }
}
