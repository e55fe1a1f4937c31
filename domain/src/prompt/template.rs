//! Prompt templates for the council flow
//!
//! Role templates are configuration data: one row per `(Mode, Phase, Role)`.
//! The round builder looks rows up and never branches on role itself.

use crate::council::emergent::EmergentIdea;
use crate::council::entities::Phase;
use crate::council::mode::Mode;
use crate::council::role::Role;

/// Fixed instructional text for one role in one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleTemplate {
    pub mode: Mode,
    pub phase: Phase,
    pub role: Role,
    /// System prompt for the session
    pub system: &'static str,
    /// Instruction appended after the task and any drafts
    pub instruction: &'static str,
}

const COLLABORATIVE_DRAFT: &str = r#"Draft your own complete answer to the task.
Be concrete: name components, steps and trade-offs. Use bullet points for distinct ideas."#;

const COLLABORATIVE_IMPROVE: &str = r#"Above are your original draft and the drafts of the other council members.
Write an improved version of your answer:
1. Incorporate the strongest ideas, whichever draft they came from
2. Drop weak material, including your own
3. Look for syntheses no single draft contained
Return the full improved answer, not a diff."#;

const ADVERSARIAL_DRAFT: &str = r#"Take a clear position on the task and defend it with reasoning.
End your answer with exactly these two lines:
POSITION: <your recommendation in one line>
CONFIDENCE: <1-10>/10"#;

const ADVERSARIAL_ATTACK: &str = r#"Above are your own draft and the leading draft chosen for stress-testing.
Attack the leading draft:
1. Find flaws, unstated assumptions and failure modes
2. Argue for every point where your draft diverges and yours is stronger
3. Rate each issue on its own line as "- [FATAL] ...", "- [MAJOR] ..." or "- [MINOR] ..."
End with exactly one line:
RECOMMENDATION: STAND | MODIFY | REJECT"#;

/// The template table, keyed by `(Mode, Phase, Role)`
const TEMPLATES: &[RoleTemplate] = &[
    // ==================== Collaborative ====================
    RoleTemplate {
        mode: Mode::Collaborative,
        phase: Phase::Draft,
        role: Role::Visionary,
        system: r#"You are the Visionary on a three-member council.
You favour ambitious, forward-looking approaches and are not afraid of unconventional ideas."#,
        instruction: COLLABORATIVE_DRAFT,
    },
    RoleTemplate {
        mode: Mode::Collaborative,
        phase: Phase::Draft,
        role: Role::Pragmatist,
        system: r#"You are the Pragmatist on a three-member council.
You favour approaches that ship quickly, are simple to operate and hold up in production."#,
        instruction: COLLABORATIVE_DRAFT,
    },
    RoleTemplate {
        mode: Mode::Collaborative,
        phase: Phase::Draft,
        role: Role::Skeptic,
        system: r#"You are the Skeptic on a three-member council.
You look for risks, edge cases, hidden costs and the ways a plan fails."#,
        instruction: COLLABORATIVE_DRAFT,
    },
    RoleTemplate {
        mode: Mode::Collaborative,
        phase: Phase::Improve,
        role: Role::Visionary,
        system: r#"You are the Visionary on a three-member council, now revising your draft.
Keep your ambition, but adopt any peer idea that is simply better."#,
        instruction: COLLABORATIVE_IMPROVE,
    },
    RoleTemplate {
        mode: Mode::Collaborative,
        phase: Phase::Improve,
        role: Role::Pragmatist,
        system: r#"You are the Pragmatist on a three-member council, now revising your draft.
Ground the best peer ideas in something that can actually be built and run."#,
        instruction: COLLABORATIVE_IMPROVE,
    },
    RoleTemplate {
        mode: Mode::Collaborative,
        phase: Phase::Improve,
        role: Role::Skeptic,
        system: r#"You are the Skeptic on a three-member council, now revising your draft.
Fold in peer ideas that survive scrutiny and keep the risks that still matter."#,
        instruction: COLLABORATIVE_IMPROVE,
    },
    // ==================== Adversarial ====================
    RoleTemplate {
        mode: Mode::Adversarial,
        phase: Phase::Draft,
        role: Role::Advocate,
        system: r#"You are the Advocate on a three-member council.
Give the strongest direct answer you can and commit to it."#,
        instruction: ADVERSARIAL_DRAFT,
    },
    RoleTemplate {
        mode: Mode::Adversarial,
        phase: Phase::Draft,
        role: Role::Contrarian,
        system: r#"You are the Contrarian on a three-member council.
Seriously explore the position most people would dismiss, and take it if it holds up."#,
        instruction: ADVERSARIAL_DRAFT,
    },
    RoleTemplate {
        mode: Mode::Adversarial,
        phase: Phase::Draft,
        role: Role::Analyst,
        system: r#"You are the Analyst on a three-member council.
Weigh evidence and trade-offs neutrally before choosing a position."#,
        instruction: ADVERSARIAL_DRAFT,
    },
    RoleTemplate {
        mode: Mode::Adversarial,
        phase: Phase::Attack,
        role: Role::Advocate,
        system: r#"You are the Advocate, now acting as an attacker.
Be rigorous and specific; a vague objection is worth nothing."#,
        instruction: ADVERSARIAL_ATTACK,
    },
    RoleTemplate {
        mode: Mode::Adversarial,
        phase: Phase::Attack,
        role: Role::Contrarian,
        system: r#"You are the Contrarian, now acting as an attacker.
Press hardest where the leading draft ignores the opposing view."#,
        instruction: ADVERSARIAL_ATTACK,
    },
    RoleTemplate {
        mode: Mode::Adversarial,
        phase: Phase::Attack,
        role: Role::Analyst,
        system: r#"You are the Analyst, now acting as an attacker.
Test every claim in the leading draft against the evidence."#,
        instruction: ADVERSARIAL_ATTACK,
    },
];

/// Look up the template row for a role in a phase
pub fn role_template(mode: Mode, phase: Phase, role: Role) -> Option<&'static RoleTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.mode == mode && t.phase == phase && t.role == role)
}

/// Templates for the synthesizer/judge, which is not a council role
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the collaborative synthesizer
    pub fn synthesis_system() -> &'static str {
        r#"You are the moderator of a three-member council synthesizing their improved answers.
Your task is to:
1. Merge the answers into one coherent final answer
2. Resolve conflicts by choosing the better-supported position
3. Keep every idea that appears in only one answer unless it is clearly wrong
Never just concatenate the answers or pick one of them."#
    }

    /// System prompt for the adversarial judge
    pub fn judge_system() -> &'static str {
        r#"You are the judge of an adversarial council.
Check each critique for validity against the leading draft and the original drafts.
Only a valid critique may change the outcome. Be decisive and concise."#
    }

    /// Judge output contract, appended to every judge prompt
    pub fn judge_instruction() -> &'static str {
        r#"Produce the final answer, revised only where valid critiques require it.
Then end with exactly these lines:
VERDICT: SURVIVED | MODIFIED | OVERTURNED
CONFIDENCE: HIGH | MEDIUM | CONTESTED"#
    }

    /// Instruction for the judge when the council agreed
    pub fn consensus_instruction() -> &'static str {
        r#"The council reached consensus. Merge the drafts above into one final answer,
keeping the strongest supporting arguments from each."#
    }

    /// Synthesis instruction, optionally listing ideas found in only one draft
    pub fn synthesis_instruction(emergent: &[EmergentIdea]) -> String {
        let mut instruction = String::from(
            "Write the final answer based on all improved drafts above.\n",
        );

        if !emergent.is_empty() {
            instruction.push_str(
                "\nThese ideas appear in only one draft. Address each one explicitly:\n",
            );
            for idea in emergent {
                instruction.push_str(&format!("- ({}) {}\n", idea.source.label(), idea.text));
            }
        }

        instruction.push_str("\nFormat your response with clear markdown headers.");
        instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_roster_role_has_draft_template() {
        for mode in [Mode::Collaborative, Mode::Adversarial] {
            for role in mode.roster() {
                assert!(role_template(mode, Phase::Draft, role).is_some());
            }
        }
    }

    #[test]
    fn test_improve_and_attack_rows_exist() {
        for role in Mode::Collaborative.roster() {
            assert!(role_template(Mode::Collaborative, Phase::Improve, role).is_some());
        }
        for role in Mode::Adversarial.roster() {
            assert!(role_template(Mode::Adversarial, Phase::Attack, role).is_some());
        }
    }

    #[test]
    fn test_no_cross_mode_rows() {
        assert!(role_template(Mode::Collaborative, Phase::Attack, Role::Visionary).is_none());
        assert!(role_template(Mode::Adversarial, Phase::Improve, Role::Advocate).is_none());
        assert!(role_template(Mode::Adversarial, Phase::Draft, Role::Skeptic).is_none());
    }

    #[test]
    fn test_table_keys_are_unique() {
        for (i, a) in TEMPLATES.iter().enumerate() {
            for b in &TEMPLATES[i + 1..] {
                assert!(
                    !(a.mode == b.mode && a.phase == b.phase && a.role == b.role),
                    "duplicate row for {:?}/{:?}/{:?}",
                    a.mode,
                    a.phase,
                    a.role
                );
            }
        }
    }

    #[test]
    fn test_improve_instruction_wording() {
        let t = role_template(Mode::Collaborative, Phase::Improve, Role::Skeptic).unwrap();
        assert!(t.instruction.contains("Incorporate the strongest ideas"));
        assert!(t.instruction.contains("Drop weak material"));
        assert!(t.instruction.contains("syntheses no single draft contained"));
    }

    #[test]
    fn test_synthesis_instruction_lists_emergent_ideas() {
        let emergent = vec![EmergentIdea {
            source: Role::Pragmatist,
            text: "Use a bloom filter".to_string(),
        }];
        let instruction = PromptTemplate::synthesis_instruction(&emergent);
        assert!(instruction.contains("(Pragmatist) Use a bloom filter"));

        let plain = PromptTemplate::synthesis_instruction(&[]);
        assert!(!plain.contains("only one draft"));
    }
}
