//! Adversarial verdicts and critique parsing.
//!
//! These functions extract structured signals from free-form critique and
//! judge text. They are pure domain logic: no I/O, just pattern matching.
//!
//! | Function | Reads | Keywords |
//! |----------|-------|----------|
//! | [`parse_recommendation`] | attack critique | STAND / MODIFY / REJECT |
//! | [`count_severities`] | attack critique | `[FATAL]` / `[MAJOR]` / `[MINOR]` |
//! | [`parse_judge_verdict`] | judge output | SURVIVED / MODIFIED / OVERTURNED |

use crate::core::provider::ProviderId;
use crate::council::entities::Draft;
use crate::council::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of stress-testing the leading draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The leading draft stands as written
    Survived,
    /// The leading draft stands with changes
    Modified,
    /// The leading draft was refuted
    Overturned,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Survived => write!(f, "Survived"),
            Verdict::Modified => write!(f, "Modified"),
            Verdict::Overturned => write!(f, "Overturned"),
        }
    }
}

/// How contested the verdict was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Contested,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Contested => write!(f, "Contested"),
        }
    }
}

/// An attacker's closing recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Stand,
    Modify,
    Reject,
}

/// Number of issues per severity tag in a critique
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub fatal: usize,
    pub major: usize,
    pub minor: usize,
}

/// A parsed attack-phase critique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    pub role: Role,
    pub provider: ProviderId,
    pub content: String,
    pub severities: SeverityCounts,
    pub recommendation: Option<Recommendation>,
}

impl Critique {
    pub fn from_draft(draft: &Draft) -> Self {
        Self {
            role: draft.role,
            provider: draft.provider.clone(),
            content: draft.content.clone(),
            severities: count_severities(&draft.content),
            recommendation: parse_recommendation(&draft.content),
        }
    }
}

/// Where a verdict came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictSource {
    /// Consensus path: no attack phase ran
    Consensus,
    /// The judge stated it explicitly
    Judge,
    /// Derived from the critiques' severities and recommendations
    Derived,
}

/// Final adversarial classification of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictAssessment {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub source: VerdictSource,
    /// One-line disclosure of how contested the result was
    pub summary: String,
}

impl VerdictAssessment {
    /// Consensus path: survived with high confidence by construction
    pub fn consensus() -> Self {
        Self {
            verdict: Verdict::Survived,
            confidence: Confidence::High,
            source: VerdictSource::Consensus,
            summary: "council reached consensus; no attack phase ran".to_string(),
        }
    }

    /// Assess the attack phase.
    ///
    /// The judge's explicit `VERDICT:` line wins; without one the verdict is
    /// derived from the critiques. `expected_attackers` is the number of
    /// attackers that should have produced a critique.
    pub fn from_attack(
        judge_output: &str,
        critiques: &[Critique],
        expected_attackers: usize,
    ) -> Self {
        let (derived_verdict, derived_confidence) = derive_verdict(critiques, expected_attackers);
        let summary = summarize(critiques, expected_attackers);

        match parse_judge_verdict(judge_output) {
            Some((verdict, confidence)) => Self {
                verdict,
                confidence: confidence.unwrap_or(derived_confidence),
                source: VerdictSource::Judge,
                summary,
            },
            None => Self {
                verdict: derived_verdict,
                confidence: derived_confidence,
                source: VerdictSource::Derived,
                summary,
            },
        }
    }

    /// The one-line `Confidence Assessment` appended to the final artifact
    pub fn confidence_line(&self) -> String {
        format!(
            "Confidence Assessment: {} ({}) - {}",
            self.confidence, self.verdict, self.summary
        )
    }
}

/// Parse the closing `RECOMMENDATION:` of a critique.
///
/// Returns `None` when absent or ambiguous (more than one keyword on the line).
pub fn parse_recommendation(text: &str) -> Option<Recommendation> {
    let line = text
        .lines()
        .rev()
        .map(|l| l.to_uppercase())
        .find(|l| l.contains("RECOMMENDATION"))?;
    let value = line.split_once(':').map(|(_, v)| v).unwrap_or(line.as_str());
    let words = upper_words(value);

    let found: Vec<Recommendation> = [
        ("STAND", Recommendation::Stand),
        ("MODIFY", Recommendation::Modify),
        ("REJECT", Recommendation::Reject),
    ]
    .into_iter()
    .filter(|(kw, _)| words.contains(kw))
    .map(|(_, r)| r)
    .collect();

    match found.as_slice() {
        [single] => Some(*single),
        _ => None,
    }
}

fn upper_words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Count `[FATAL]`, `[MAJOR]` and `[MINOR]` issue tags (case-insensitive)
pub fn count_severities(text: &str) -> SeverityCounts {
    let upper = text.to_uppercase();
    SeverityCounts {
        fatal: upper.matches("[FATAL]").count(),
        major: upper.matches("[MAJOR]").count(),
        minor: upper.matches("[MINOR]").count(),
    }
}

/// Parse the judge's `VERDICT:` and `CONFIDENCE:` lines.
///
/// The verdict is required; the confidence is optional.
pub fn parse_judge_verdict(text: &str) -> Option<(Verdict, Option<Confidence>)> {
    let verdict = single_keyword(
        text,
        "VERDICT",
        &[
            ("SURVIVED", Verdict::Survived),
            ("MODIFIED", Verdict::Modified),
            ("OVERTURNED", Verdict::Overturned),
        ],
    )?;
    let confidence = single_keyword(
        text,
        "CONFIDENCE",
        &[
            ("HIGH", Confidence::High),
            ("MEDIUM", Confidence::Medium),
            ("CONTESTED", Confidence::Contested),
        ],
    );
    Some((verdict, confidence))
}

/// Last `LABEL:` line carrying exactly one of the keywords
fn single_keyword<T: Copy>(text: &str, label: &str, keywords: &[(&str, T)]) -> Option<T> {
    text.lines().rev().find_map(|line| {
        let upper = line.to_uppercase();
        let cleaned = upper.trim().trim_start_matches(['*', '-', '#', ' ']);
        let value = cleaned.strip_prefix(label)?.trim_start_matches('*').trim_start();
        let words = upper_words(value.strip_prefix(':')?);
        let hits: Vec<T> = keywords
            .iter()
            .filter(|(kw, _)| words.contains(kw))
            .map(|(_, v)| *v)
            .collect();
        match hits.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    })
}

/// Derive verdict and confidence from the critiques alone.
///
/// - any `[FATAL]` issue or REJECT -> Overturned
/// - any `[MAJOR]` issue or MODIFY -> Modified
/// - otherwise -> Survived
///
/// Confidence is Contested when REJECT and STAND both appear or an expected
/// attacker is missing, High when every attacker gave the same
/// recommendation, else Medium.
pub fn derive_verdict(critiques: &[Critique], expected_attackers: usize) -> (Verdict, Confidence) {
    let any_rec = |r: Recommendation| critiques.iter().any(|c| c.recommendation == Some(r));

    let verdict = if critiques.iter().any(|c| c.severities.fatal > 0) || any_rec(Recommendation::Reject)
    {
        Verdict::Overturned
    } else if critiques.iter().any(|c| c.severities.major > 0) || any_rec(Recommendation::Modify) {
        Verdict::Modified
    } else {
        Verdict::Survived
    };

    let unanimous = critiques.len() == expected_attackers
        && !critiques.is_empty()
        && critiques
            .iter()
            .all(|c| c.recommendation.is_some() && c.recommendation == critiques[0].recommendation);

    let split = any_rec(Recommendation::Reject) && any_rec(Recommendation::Stand);
    let confidence = if split || critiques.len() < expected_attackers {
        Confidence::Contested
    } else if unanimous {
        Confidence::High
    } else {
        Confidence::Medium
    };

    (verdict, confidence)
}

/// Judge output with its closing `VERDICT:`/`CONFIDENCE:` lines removed
pub fn strip_verdict_lines(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            let head = line
                .trim()
                .trim_start_matches(['*', '-', '#', ' '])
                .to_uppercase();
            !head.starts_with("VERDICT:") && !head.starts_with("CONFIDENCE:")
        })
        .collect();
    kept.join("\n").trim_end().to_string()
}

fn summarize(critiques: &[Critique], expected_attackers: usize) -> String {
    let totals = critiques.iter().fold(SeverityCounts::default(), |acc, c| SeverityCounts {
        fatal: acc.fatal + c.severities.fatal,
        major: acc.major + c.severities.major,
        minor: acc.minor + c.severities.minor,
    });
    let recommendations: Vec<String> = critiques
        .iter()
        .map(|c| {
            let rec = match c.recommendation {
                Some(Recommendation::Stand) => "stand",
                Some(Recommendation::Modify) => "modify",
                Some(Recommendation::Reject) => "reject",
                None => "unclear",
            };
            format!("{} {}", c.role, rec)
        })
        .collect();

    let mut summary = format!(
        "{} of {} critiques received ({} fatal, {} major, {} minor)",
        critiques.len(),
        expected_attackers,
        totals.fatal,
        totals.major,
        totals.minor
    );
    if !recommendations.is_empty() {
        summary.push_str(&format!("; {}", recommendations.join(", ")));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn critique(role: Role, text: &str) -> Critique {
        Critique::from_draft(&Draft::new(
            role,
            crate::council::entities::Phase::Attack,
            ProviderId::new("mock"),
            text,
        ))
    }

    // ==================== parse_recommendation Tests ====================

    #[test]
    fn test_parse_recommendation() {
        assert_eq!(
            parse_recommendation("issues...\nRECOMMENDATION: STAND"),
            Some(Recommendation::Stand)
        );
        assert_eq!(
            parse_recommendation("Recommendation: modify the caching section"),
            Some(Recommendation::Modify)
        );
        assert_eq!(
            parse_recommendation("**RECOMMENDATION:** Reject"),
            Some(Recommendation::Reject)
        );
    }

    #[test]
    fn test_parse_recommendation_ambiguous_or_missing() {
        assert_eq!(parse_recommendation("RECOMMENDATION: STAND | MODIFY | REJECT"), None);
        assert_eq!(parse_recommendation("I think it is fine."), None);
    }

    #[test]
    fn test_count_severities() {
        let text = "- [FATAL] loses data\n- [major] no auth\n- [Minor] naming\n- [MINOR] typo";
        assert_eq!(
            count_severities(text),
            SeverityCounts {
                fatal: 1,
                major: 1,
                minor: 2
            }
        );
    }

    // ==================== parse_judge_verdict Tests ====================

    #[test]
    fn test_parse_judge_verdict() {
        let text = "Final answer...\nVERDICT: MODIFIED\nCONFIDENCE: MEDIUM";
        assert_eq!(
            parse_judge_verdict(text),
            Some((Verdict::Modified, Some(Confidence::Medium)))
        );

        let text = "**Verdict:** Overturned";
        assert_eq!(parse_judge_verdict(text), Some((Verdict::Overturned, None)));
    }

    #[test]
    fn test_parse_judge_verdict_requires_single_keyword() {
        assert_eq!(
            parse_judge_verdict("VERDICT: SURVIVED | MODIFIED | OVERTURNED"),
            None
        );
        assert_eq!(parse_judge_verdict("no verdict line"), None);
    }

    // ==================== derive_verdict Tests ====================

    #[test]
    fn test_derive_survived_high() {
        let critiques = vec![
            critique(Role::Contrarian, "- [MINOR] wording\nRECOMMENDATION: STAND"),
            critique(Role::Analyst, "RECOMMENDATION: STAND"),
        ];
        assert_eq!(
            derive_verdict(&critiques, 2),
            (Verdict::Survived, Confidence::High)
        );
    }

    #[test]
    fn test_derive_modified_on_major() {
        let critiques = vec![
            critique(Role::Contrarian, "- [MAJOR] no retries\nRECOMMENDATION: MODIFY"),
            critique(Role::Analyst, "RECOMMENDATION: STAND"),
        ];
        assert_eq!(
            derive_verdict(&critiques, 2),
            (Verdict::Modified, Confidence::Medium)
        );
    }

    #[test]
    fn test_derive_overturned_contested() {
        let critiques = vec![
            critique(Role::Advocate, "- [FATAL] wrong protocol\nRECOMMENDATION: REJECT"),
            critique(Role::Analyst, "RECOMMENDATION: STAND"),
        ];
        assert_eq!(
            derive_verdict(&critiques, 2),
            (Verdict::Overturned, Confidence::Contested)
        );
    }

    #[test]
    fn test_missing_attacker_is_contested() {
        let critiques = vec![critique(Role::Analyst, "RECOMMENDATION: STAND")];
        assert_eq!(
            derive_verdict(&critiques, 2),
            (Verdict::Survived, Confidence::Contested)
        );
    }

    #[test]
    fn test_strip_verdict_lines() {
        let text = "## Answer\nUse gRPC.\n\nVERDICT: MODIFIED\n**Confidence:** MEDIUM\n";
        assert_eq!(strip_verdict_lines(text), "## Answer\nUse gRPC.");
    }

    // ==================== VerdictAssessment Tests ====================

    #[test]
    fn test_consensus_assessment() {
        let assessment = VerdictAssessment::consensus();
        assert_eq!(assessment.verdict, Verdict::Survived);
        assert_eq!(assessment.confidence, Confidence::High);
        assert!(assessment.confidence_line().starts_with("Confidence Assessment: High"));
    }

    #[test]
    fn test_judge_verdict_wins_over_derived() {
        let critiques = vec![critique(Role::Analyst, "RECOMMENDATION: STAND")];
        let assessment =
            VerdictAssessment::from_attack("VERDICT: MODIFIED\nCONFIDENCE: CONTESTED", &critiques, 1);
        assert_eq!(assessment.verdict, Verdict::Modified);
        assert_eq!(assessment.confidence, Confidence::Contested);
        assert_eq!(assessment.source, VerdictSource::Judge);
    }

    #[test]
    fn test_derived_when_judge_silent() {
        let critiques = vec![critique(Role::Analyst, "- [MAJOR] x\nRECOMMENDATION: MODIFY")];
        let assessment = VerdictAssessment::from_attack("Final answer only.", &critiques, 1);
        assert_eq!(assessment.verdict, Verdict::Modified);
        assert_eq!(assessment.confidence, Confidence::High);
        assert_eq!(assessment.source, VerdictSource::Derived);
        assert!(assessment.summary.contains("1 of 1 critiques"));
        assert!(assessment.summary.contains("analyst modify"));
    }
}
