//! Emergent idea extraction for collaborative synthesis.
//!
//! An idea unit is a bullet line or sentence of a draft. It is *emergent*
//! when no other draft in the round covers its keywords. The synthesizer is
//! asked to address every emergent idea, and any the final text still lacks
//! are appended verbatim so a unique idea can never be silently dropped.

use crate::core::text::{containment, keywords, normalize};
use crate::council::entities::Round;
use crate::council::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Upper bound on ideas surfaced per run
pub const MAX_EMERGENT_IDEAS: usize = 20;

/// An idea counts as present in another draft at or above this containment
const SHARED_CONTAINMENT: f64 = 0.5;

/// An idea counts as covered by the final text at or above this containment
const COVERED_CONTAINMENT: f64 = 0.6;

/// Units with fewer keywords are too thin to compare
const MIN_IDEA_KEYWORDS: usize = 2;

/// An idea present in exactly one draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergentIdea {
    pub source: Role,
    pub text: String,
}

/// Split a draft into idea units: bullet items and sentences.
///
/// Headings and blank lines are skipped; duplicates (after normalization)
/// are dropped.
pub fn idea_units(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut units = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("```") {
            continue;
        }

        let (is_bullet, body) = strip_bullet(trimmed);
        let pieces: Vec<&str> = if is_bullet {
            vec![body]
        } else {
            split_sentences(body)
        };

        for piece in pieces {
            let piece = piece.trim();
            if keywords(piece).len() < MIN_IDEA_KEYWORDS {
                continue;
            }
            if seen.insert(normalize(piece)) {
                units.push(piece.to_string());
            }
        }
    }

    units
}

fn strip_bullet(line: &str) -> (bool, &str) {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return (true, rest.trim());
        }
    }
    // "1. item" or "1) item"
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0
        && let Some(rest) = line[digits..]
            .strip_prefix(". ")
            .or_else(|| line[digits..].strip_prefix(") "))
    {
        return (true, rest.trim());
    }
    (false, line)
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        let terminal = matches!(b, b'.' | b'!' | b'?');
        let at_boundary = i + 1 == bytes.len() || bytes[i + 1] == b' ';
        if terminal && at_boundary {
            sentences.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Find ideas that appear in exactly one draft of the round.
///
/// Needs at least two drafts; with a single draft nothing is "unique".
/// Results follow roster order, then the order within each draft.
pub fn find_emergent_ideas(round: &Round) -> Vec<EmergentIdea> {
    let drafts: Vec<_> = round.drafts().collect();
    if drafts.len() < 2 {
        return Vec::new();
    }

    let draft_keywords: Vec<BTreeSet<String>> =
        drafts.iter().map(|d| keywords(&d.content)).collect();

    let mut ideas = Vec::new();
    for (i, draft) in drafts.iter().enumerate() {
        for unit in idea_units(&draft.content) {
            let unit_keywords = keywords(&unit);
            let shared = draft_keywords
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .any(|(_, other)| containment(&unit_keywords, other) >= SHARED_CONTAINMENT);
            if !shared {
                ideas.push(EmergentIdea {
                    source: draft.role,
                    text: unit,
                });
                if ideas.len() == MAX_EMERGENT_IDEAS {
                    return ideas;
                }
            }
        }
    }
    ideas
}

/// Ideas whose substance the text does not cover
pub fn uncovered_ideas<'a>(text: &str, ideas: &'a [EmergentIdea]) -> Vec<&'a EmergentIdea> {
    let text_keywords = keywords(text);
    ideas
        .iter()
        .filter(|idea| containment(&keywords(&idea.text), &text_keywords) < COVERED_CONTAINMENT)
        .collect()
}

/// Append an `Emergent Ideas` section for every idea the text lacks
pub fn ensure_emergent_ideas(text: String, ideas: &[EmergentIdea]) -> String {
    let missing = uncovered_ideas(&text, ideas);
    if missing.is_empty() {
        return text;
    }

    let mut output = text;
    output.push_str("\n\n## Emergent Ideas\n\n");
    for idea in missing {
        output.push_str(&format!("- {} _(from {})_\n", idea.text, idea.source.label()));
    }
    output
}
