//! Adversarial triage: choose the leading draft or declare consensus.
//!
//! Triage makes no external call. It reads the phase-1 round only:
//!
//! 1. Fewer than two drafts: consensus (nothing to weigh the lone draft against)
//! 2. All drafts state the same `POSITION:` line: consensus
//! 3. Mean pairwise keyword similarity at or above the threshold: consensus
//! 4. Otherwise the highest self-reported `CONFIDENCE:` leads; ties go to the
//!    most central draft, then to roster order

use crate::core::text::{jaccard, keywords, normalize};
use crate::council::entities::{Draft, Round};
use crate::council::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Mean pairwise similarity at which drafts count as agreeing
pub const DEFAULT_CONSENSUS_THRESHOLD: f64 = 0.8;

/// Confidence assumed when a draft does not report one
const NEUTRAL_CONFIDENCE: f64 = 5.0;

/// Why triage declared consensus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsensusReason {
    /// Every draft stated the same position
    MatchingPositions { position: String },
    /// The drafts were near-identical
    HighSimilarity { similarity: f64 },
    /// Only one participant produced a draft
    SingleDraft { role: Role },
}

/// Outcome of the triage step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum TriageDecision {
    /// No clear winner; the attack phase is skipped
    Consensus { reason: ConsensusReason },
    /// This draft will be stress-tested by the others
    Leading {
        role: Role,
        confidence: Option<f64>,
        centrality: f64,
    },
}

impl TriageDecision {
    pub fn leader(&self) -> Option<Role> {
        match self {
            TriageDecision::Leading { role, .. } => Some(*role),
            TriageDecision::Consensus { .. } => None,
        }
    }

    pub fn is_consensus(&self) -> bool {
        matches!(self, TriageDecision::Consensus { .. })
    }
}

/// Extract the `POSITION:` line of a draft, normalized.
pub fn extract_position(text: &str) -> Option<String> {
    marker_value(text, "POSITION:")
        .map(normalize)
        .filter(|p| !p.is_empty())
}

/// Parse the self-reported `CONFIDENCE:` of a draft.
///
/// Accepts `8/10`, `8`, `8.5/10`. Values are clamped to 1-10.
pub fn parse_confidence(text: &str) -> Option<f64> {
    let value = marker_value(text, "CONFIDENCE:")?;
    let number = value.split('/').next()?.trim();
    number
        .trim_matches(|c: char| !c.is_ascii_digit() && c != '.')
        .parse::<f64>()
        .ok()
        .map(|n| n.clamp(1.0, 10.0))
}

/// Value after the last line starting with `marker` (case-insensitive)
fn marker_value<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.lines().rev().find_map(|line| {
        let trimmed = line.trim().trim_start_matches(['*', '-', '#', ' ']);
        let head = trimmed.get(..marker.len())?;
        if head.eq_ignore_ascii_case(marker) {
            Some(trimmed[marker.len()..].trim().trim_end_matches('*').trim())
        } else {
            None
        }
    })
}

/// Draft body without the trailing marker lines, for similarity
fn body_keywords(text: &str) -> BTreeSet<String> {
    let body: Vec<&str> = text
        .lines()
        .filter(|line| {
            let upper = line.trim().trim_start_matches(['*', '-', '#', ' ']).to_uppercase();
            !upper.starts_with("POSITION:") && !upper.starts_with("CONFIDENCE:")
        })
        .collect();
    keywords(&body.join("\n"))
}

/// Run triage over the phase-1 round.
///
/// Returns `None` when the round holds no drafts at all.
pub fn triage(round: &Round, consensus_threshold: f64) -> Option<TriageDecision> {
    let drafts: Vec<&Arc<Draft>> = round.drafts().collect();

    match drafts.as_slice() {
        [] => return None,
        [draft] => {
            return Some(TriageDecision::Consensus {
                reason: ConsensusReason::SingleDraft { role: draft.role },
            });
        }
        _ => {}
    }

    let positions: Vec<Option<String>> =
        drafts.iter().map(|d| extract_position(&d.content)).collect();
    if let Some(Some(first)) = positions.first()
        && positions.iter().all(|p| p.as_ref() == Some(first))
    {
        return Some(TriageDecision::Consensus {
            reason: ConsensusReason::MatchingPositions {
                position: first.clone(),
            },
        });
    }

    let keyword_sets: Vec<BTreeSet<String>> =
        drafts.iter().map(|d| body_keywords(&d.content)).collect();
    let centrality = centrality_scores(&keyword_sets);
    let mean_similarity = centrality.iter().sum::<f64>() / centrality.len() as f64;

    if mean_similarity >= consensus_threshold {
        return Some(TriageDecision::Consensus {
            reason: ConsensusReason::HighSimilarity {
                similarity: mean_similarity,
            },
        });
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, draft) in drafts.iter().enumerate() {
        let score = parse_confidence(&draft.content).unwrap_or(NEUTRAL_CONFIDENCE);
        let better = match best {
            None => true,
            Some((j, best_score)) => {
                score > best_score || (score == best_score && centrality[i] > centrality[j])
            }
        };
        if better {
            best = Some((i, score));
        }
    }

    best.map(|(i, _)| TriageDecision::Leading {
        role: drafts[i].role,
        confidence: parse_confidence(&drafts[i].content),
        centrality: centrality[i],
    })
}

/// Mean similarity of each draft to every other draft.
///
/// The mean of these scores equals the mean pairwise similarity.
fn centrality_scores(sets: &[BTreeSet<String>]) -> Vec<f64> {
    let n = sets.len();
    (0..n)
        .map(|i| {
            let total: f64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| jaccard(&sets[i], &sets[j]))
                .sum();
            total / (n - 1) as f64
        })
        .collect()
}
