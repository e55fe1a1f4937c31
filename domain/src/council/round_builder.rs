//! Round builder: instruction payloads for each phase.
//!
//! Everything here is pure. Payloads are assembled from the task, sealed
//! rounds and the `(Mode, Phase, Role)` template table, and iterate rounds in
//! roster order, so the same inputs always produce byte-identical prompts.
//! Every draft a participant may see is embedded verbatim.

use crate::core::error::DomainError;
use crate::core::task::Task;
use crate::council::emergent::EmergentIdea;
use crate::council::entities::{Phase, Round, SlotOutcome};
use crate::council::mode::Mode;
use crate::council::role::Role;
use crate::prompt::{PromptTemplate, role_template};
use std::collections::BTreeMap;

/// What one provider call receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub system: String,
    pub prompt: String,
}

impl Payload {
    fn new(system: impl Into<String>, prompt: String) -> Self {
        Self {
            system: system.into(),
            prompt,
        }
    }
}

/// Incremental prompt text: the task first, then labelled sections
struct PromptWriter {
    text: String,
}

impl PromptWriter {
    fn new(task: &Task) -> Self {
        Self {
            text: format!("Task:\n{}\n", task.content()),
        }
    }

    /// Append a labelled section; `body` is copied unchanged
    fn section(&mut self, heading: &str, body: &str) {
        self.text.push_str(&format!("\n--- {} ---\n", heading));
        self.text.push_str(body);
        if !body.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn finish(mut self, instruction: &str) -> String {
        self.text.push_str(&format!("\n{}\n", instruction.trim_end()));
        self.text
    }
}

fn template(
    mode: Mode,
    phase: Phase,
    role: Role,
) -> Result<&'static crate::prompt::RoleTemplate, DomainError> {
    role_template(mode, phase, role).ok_or_else(|| DomainError::MissingTemplate {
        mode: mode.to_string(),
        phase,
        role,
    })
}

/// Phase-1 payloads, one per roster role
pub fn draft_payloads(mode: Mode, task: &Task) -> Result<BTreeMap<Role, Payload>, DomainError> {
    mode.roster()
        .into_iter()
        .map(|role| {
            let t = template(mode, Phase::Draft, role)?;
            let prompt = PromptWriter::new(task).finish(t.instruction);
            Ok((role, Payload::new(t.system, prompt)))
        })
        .collect()
}

/// Collaborative improve payloads.
///
/// Only participants that drafted are re-invoked. Each sees its own draft and
/// every peer draft; failed peers are listed as unavailable.
pub fn improve_payloads(
    mode: Mode,
    task: &Task,
    drafts: &Round,
) -> Result<BTreeMap<Role, Payload>, DomainError> {
    let mut payloads = BTreeMap::new();

    for role in drafts.roles() {
        let Some(own) = drafts.draft(role) else {
            continue;
        };
        let t = template(mode, Phase::Improve, role)?;

        let mut writer = PromptWriter::new(task);
        writer.section(&format!("Your draft ({})", role.label()), &own.content);
        for peer in drafts.roles().filter(|r| *r != role) {
            match drafts.outcome(peer) {
                Some(SlotOutcome::Drafted(draft)) => {
                    writer.section(&format!("Peer draft: {}", peer.label()), &draft.content);
                }
                Some(SlotOutcome::Failed(failure)) => {
                    writer.section(
                        &format!("Peer unavailable: {}", peer.label()),
                        &format!("(no draft: {})", failure.reason()),
                    );
                }
                None => {}
            }
        }

        payloads.insert(role, Payload::new(t.system, writer.finish(t.instruction)));
    }

    Ok(payloads)
}

/// Adversarial attack payloads for every non-leading participant that drafted.
///
/// The leader is never re-invoked.
pub fn attack_payloads(
    mode: Mode,
    task: &Task,
    drafts: &Round,
    leader: Role,
) -> Result<BTreeMap<Role, Payload>, DomainError> {
    let leading = drafts
        .draft(leader)
        .ok_or(DomainError::LeadingDraftMissing(leader))?;

    let mut payloads = BTreeMap::new();
    for role in drafts.roles().filter(|r| *r != leader) {
        let Some(own) = drafts.draft(role) else {
            continue;
        };
        let t = template(mode, Phase::Attack, role)?;

        let mut writer = PromptWriter::new(task);
        writer.section(&format!("Your draft ({})", role.label()), &own.content);
        writer.section(&format!("Leading draft ({})", leader.label()), &leading.content);

        payloads.insert(role, Payload::new(t.system, writer.finish(t.instruction)));
    }

    Ok(payloads)
}

/// Collaborative synthesis payload over the terminal round
pub fn synthesis_payload(task: &Task, terminal: &Round, emergent: &[EmergentIdea]) -> Payload {
    let mut writer = PromptWriter::new(task);
    for draft in terminal.drafts() {
        writer.section(&format!("Draft: {}", draft.role.label()), &draft.content);
    }
    for failure in terminal.failures() {
        writer.section(
            &format!("Unavailable: {}", failure.role.label()),
            &format!("(no draft: {})", failure.reason()),
        );
    }
    Payload::new(
        PromptTemplate::synthesis_system(),
        writer.finish(&PromptTemplate::synthesis_instruction(emergent)),
    )
}

/// Adversarial judge payload.
///
/// With a leader, the judge sees the leading draft, the original drafts and
/// every critique. Without one (consensus) it merges the agreeing drafts.
pub fn judge_payload(
    task: &Task,
    drafts: &Round,
    leader: Option<Role>,
    critiques: Option<&Round>,
) -> Result<Payload, DomainError> {
    let mut writer = PromptWriter::new(task);

    let Some(leader) = leader else {
        for draft in drafts.drafts() {
            writer.section(&format!("Draft: {}", draft.role.label()), &draft.content);
        }
        return Ok(Payload::new(
            PromptTemplate::judge_system(),
            writer.finish(PromptTemplate::consensus_instruction()),
        ));
    };

    let leading = drafts
        .draft(leader)
        .ok_or(DomainError::LeadingDraftMissing(leader))?;
    writer.section(&format!("Leading draft ({})", leader.label()), &leading.content);

    for draft in drafts.drafts().filter(|d| d.role != leader) {
        writer.section(&format!("Original draft: {}", draft.role.label()), &draft.content);
    }

    if let Some(critiques) = critiques {
        for role in critiques.roles() {
            match critiques.outcome(role) {
                Some(SlotOutcome::Drafted(critique)) => {
                    writer.section(&format!("Critique: {}", role.label()), &critique.content);
                }
                Some(SlotOutcome::Failed(failure)) => {
                    writer.section(
                        &format!("Critique unavailable: {}", role.label()),
                        &format!("(no critique: {})", failure.reason()),
                    );
                }
                None => {}
            }
        }
    }

    Ok(Payload::new(
        PromptTemplate::judge_system(),
        writer.finish(PromptTemplate::judge_instruction()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::ProviderId;
    use crate::council::entities::{
        Draft, ParticipantFailure, ProviderAttempt, RoundAccumulator,
    };
    use std::sync::Arc;

    fn task() -> Task {
        Task::new("Design a caching layer").unwrap()
    }

    fn round(phase: Phase, entries: &[(Role, Option<&str>)]) -> Round {
        let mut acc = RoundAccumulator::new(phase, entries.iter().map(|(r, _)| *r));
        for (role, text) in entries {
            let outcome = match text {
                Some(text) => SlotOutcome::Drafted(Arc::new(Draft::new(
                    *role,
                    phase,
                    ProviderId::new("mock"),
                    *text,
                ))),
                None => SlotOutcome::Failed(ParticipantFailure::new(
                    *role,
                    phase,
                    vec![ProviderAttempt {
                        provider: ProviderId::new("mock"),
                        error: "connection refused".to_string(),
                    }],
                )),
            };
            acc.record(*role, outcome);
        }
        acc.seal().unwrap()
    }

    #[test]
    fn test_draft_payloads_cover_roster() {
        let payloads = draft_payloads(Mode::Adversarial, &task()).unwrap();
        let roles: Vec<Role> = payloads.keys().copied().collect();
        assert_eq!(roles, vec![Role::Advocate, Role::Contrarian, Role::Analyst]);

        let advocate = &payloads[&Role::Advocate];
        assert!(advocate.prompt.starts_with("Task:\nDesign a caching layer\n"));
        assert!(advocate.prompt.contains("POSITION:"));
        assert!(advocate.system.contains("Advocate"));
    }

    #[test]
    fn test_improve_embeds_every_draft_verbatim() {
        let drafts = round(
            Phase::Draft,
            &[
                (Role::Visionary, Some("Use an edge cache.\n- Tiered")),
                (Role::Pragmatist, Some("Redis with TTLs")),
                (Role::Skeptic, Some("Watch for stampedes")),
            ],
        );
        let payloads = improve_payloads(Mode::Collaborative, &task(), &drafts).unwrap();
        assert_eq!(payloads.len(), 3);

        let skeptic = &payloads[&Role::Skeptic].prompt;
        assert!(skeptic.contains("--- Your draft (Skeptic) ---\nWatch for stampedes\n"));
        assert!(skeptic.contains("--- Peer draft: Visionary ---\nUse an edge cache.\n- Tiered\n"));
        assert!(skeptic.contains("--- Peer draft: Pragmatist ---\nRedis with TTLs\n"));
        assert!(skeptic.contains("Incorporate the strongest ideas"));
    }

    #[test]
    fn test_draft_trailing_whitespace_is_kept() {
        let drafts = round(
            Phase::Draft,
            &[
                (Role::Visionary, Some("Indented code:\n    let x = 1;  \n\n")),
                (Role::Pragmatist, Some("Plain")),
            ],
        );
        let payloads = improve_payloads(Mode::Collaborative, &task(), &drafts).unwrap();

        let visionary = &payloads[&Role::Visionary].prompt;
        assert!(visionary.contains(
            "--- Your draft (Visionary) ---\nIndented code:\n    let x = 1;  \n\n\n--- Peer draft: Pragmatist ---\nPlain\n"
        ));
    }

    #[test]
    fn test_improve_skips_failed_and_marks_unavailable() {
        let drafts = round(
            Phase::Draft,
            &[
                (Role::Visionary, Some("A")),
                (Role::Pragmatist, None),
                (Role::Skeptic, Some("C")),
            ],
        );
        let payloads = improve_payloads(Mode::Collaborative, &task(), &drafts).unwrap();

        assert!(!payloads.contains_key(&Role::Pragmatist));
        let visionary = &payloads[&Role::Visionary].prompt;
        assert!(visionary.contains("--- Peer unavailable: Pragmatist ---"));
        assert!(visionary.contains("connection refused"));
    }

    #[test]
    fn test_attack_excludes_leader() {
        let drafts = round(
            Phase::Draft,
            &[
                (Role::Advocate, Some("REST\nPOSITION: REST")),
                (Role::Contrarian, Some("gRPC\nPOSITION: gRPC")),
                (Role::Analyst, Some("GraphQL\nPOSITION: GraphQL")),
            ],
        );
        let payloads =
            attack_payloads(Mode::Adversarial, &task(), &drafts, Role::Contrarian).unwrap();

        let roles: Vec<Role> = payloads.keys().copied().collect();
        assert_eq!(roles, vec![Role::Advocate, Role::Analyst]);
        let analyst = &payloads[&Role::Analyst].prompt;
        assert!(analyst.contains("--- Your draft (Analyst) ---\nGraphQL\nPOSITION: GraphQL\n"));
        assert!(analyst.contains("--- Leading draft (Contrarian) ---\ngRPC\nPOSITION: gRPC\n"));
        assert!(analyst.contains("RECOMMENDATION: STAND | MODIFY | REJECT"));
    }

    #[test]
    fn test_attack_without_leading_draft_errors() {
        let drafts = round(
            Phase::Draft,
            &[(Role::Advocate, Some("REST")), (Role::Contrarian, None)],
        );
        let err = attack_payloads(Mode::Adversarial, &task(), &drafts, Role::Contrarian)
            .unwrap_err();
        assert_eq!(err, DomainError::LeadingDraftMissing(Role::Contrarian));
    }

    #[test]
    fn test_missing_template_is_reported() {
        let drafts = round(Phase::Draft, &[(Role::Advocate, Some("x")), (Role::Analyst, Some("y"))]);
        let err = improve_payloads(Mode::Adversarial, &task(), &drafts).unwrap_err();
        assert!(matches!(err, DomainError::MissingTemplate { phase: Phase::Improve, .. }));
    }

    #[test]
    fn test_payloads_are_deterministic() {
        let build = || {
            let drafts = round(
                Phase::Draft,
                &[
                    (Role::Skeptic, Some("C")),
                    (Role::Visionary, Some("A")),
                    (Role::Pragmatist, Some("B")),
                ],
            );
            improve_payloads(Mode::Collaborative, &task(), &drafts).unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_synthesis_lists_drafts_and_emergent_ideas() {
        let improved = round(
            Phase::Improve,
            &[(Role::Visionary, Some("Plan A")), (Role::Pragmatist, Some("Plan B"))],
        );
        let ideas = vec![EmergentIdea {
            source: Role::Pragmatist,
            text: "Use a bloom filter".to_string(),
        }];
        let payload = synthesis_payload(&task(), &improved, &ideas);

        assert!(payload.prompt.contains("--- Draft: Visionary ---\nPlan A\n"));
        assert!(payload.prompt.contains("--- Draft: Pragmatist ---\nPlan B\n"));
        assert!(payload.prompt.contains("(Pragmatist) Use a bloom filter"));
    }

    #[test]
    fn test_judge_sees_leader_originals_and_critiques() {
        let drafts = round(
            Phase::Draft,
            &[
                (Role::Advocate, Some("REST")),
                (Role::Contrarian, Some("gRPC")),
                (Role::Analyst, Some("GraphQL")),
            ],
        );
        let critiques = round(
            Phase::Attack,
            &[(Role::Advocate, Some("- [MAJOR] tooling\nRECOMMENDATION: MODIFY")), (Role::Analyst, None)],
        );
        let payload =
            judge_payload(&task(), &drafts, Some(Role::Contrarian), Some(&critiques)).unwrap();

        assert!(payload.prompt.contains("--- Leading draft (Contrarian) ---\ngRPC\n"));
        assert!(payload.prompt.contains("--- Original draft: Advocate ---\nREST\n"));
        assert!(payload.prompt.contains("--- Critique: Advocate ---"));
        assert!(payload.prompt.contains("--- Critique unavailable: Analyst ---"));
        assert!(payload.prompt.contains("VERDICT:"));
    }

    #[test]
    fn test_consensus_judge_merges_drafts() {
        let drafts = round(
            Phase::Draft,
            &[(Role::Advocate, Some("REST")), (Role::Analyst, Some("REST too"))],
        );
        let payload = judge_payload(&task(), &drafts, None, None).unwrap();
        assert!(payload.prompt.contains("--- Draft: Analyst ---\nREST too\n"));
        assert!(!payload.prompt.contains("VERDICT:"));
    }
}
