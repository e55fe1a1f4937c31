//! Orchestration mode and the mode selector.
//!
//! [`Mode`] is the single strategy axis of a council run:
//! - Collaborative: participants draft, then improve on each other
//! - Adversarial: participants draft, one position is stress-tested by the others
//!
//! [`select_mode`] picks the mode from the task text before any participant
//! is invoked. Precedence (highest first):
//!
//! 1. Explicit override passed by the caller
//! 2. Override marker in the text (`adversarial council:`, `mode: collaborative`,
//!    `[adversarial]`)
//! 3. Any adversarial trigger keyword (`debate`, `vs`, `which is better`, ...)
//! 4. Collaborative

use crate::core::error::DomainError;
use crate::council::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Orchestration strategy of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Participants build on each other's drafts
    #[default]
    Collaborative,
    /// Participants critique a leading position
    Adversarial,
}

impl Mode {
    /// Fixed roster of roles for this mode, in dispatch order
    pub fn roster(&self) -> [Role; 3] {
        match self {
            Mode::Collaborative => [Role::Visionary, Role::Pragmatist, Role::Skeptic],
            Mode::Adversarial => [Role::Advocate, Role::Contrarian, Role::Analyst],
        }
    }

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            Mode::Collaborative => "Collaborative: Draft → Improve → Synthesize",
            Mode::Adversarial => "Adversarial: Draft → Triage → Attack → Judge",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Collaborative => write!(f, "collaborative"),
            Mode::Adversarial => write!(f, "adversarial"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collaborative" | "collab" | "c" => Ok(Mode::Collaborative),
            "adversarial" | "adv" | "a" => Ok(Mode::Adversarial),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

/// Why a mode was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SelectionReason {
    /// Caller passed the mode explicitly
    Explicit,
    /// The task text carried an override marker
    Marker(String),
    /// An adversarial trigger keyword matched
    Keyword(String),
    /// Nothing matched
    Default,
}

/// Result of the mode selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSelection {
    pub mode: Mode,
    pub reason: SelectionReason,
}

/// Single-word adversarial triggers. Inflections are matched too.
const ADVERSARIAL_WORDS: &[&str] = &[
    "debate",
    "adversarial",
    "challenge",
    "argue",
    "attack",
    "defend",
    "versus",
    "vs",
];

/// Multi-word adversarial triggers. Hyphenated spellings tokenize the same way.
const ADVERSARIAL_PHRASES: &[&[&str]] = &[&["stress", "test"], &["which", "is", "better"]];

/// Select the orchestration mode for a task.
///
/// Pure and deterministic: the same text and override always give the same
/// selection.
pub fn select_mode(task: &str, override_mode: Option<Mode>) -> ModeSelection {
    if let Some(mode) = override_mode {
        return ModeSelection {
            mode,
            reason: SelectionReason::Explicit,
        };
    }

    let tokens = tokenize(task);

    if let Some((mode, marker)) = find_marker(&tokens) {
        return ModeSelection {
            mode,
            reason: SelectionReason::Marker(marker),
        };
    }

    let words: Vec<String> = tokens.into_iter().filter(|t| !is_bracket(t)).collect();
    if let Some(keyword) = find_adversarial_keyword(&words) {
        return ModeSelection {
            mode: Mode::Adversarial,
            reason: SelectionReason::Keyword(keyword),
        };
    }

    ModeSelection {
        mode: Mode::Collaborative,
        reason: SelectionReason::Default,
    }
}

/// Lowercased words, with `[` and `]` kept as tokens of their own
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if c == '[' || c == ']' {
            tokens.push(c.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

fn is_bracket(token: &str) -> bool {
    token == "[" || token == "]"
}

fn mode_name(token: &str) -> Option<Mode> {
    match token {
        "collaborative" | "collab" => Some(Mode::Collaborative),
        "adversarial" => Some(Mode::Adversarial),
        _ => None,
    }
}

/// First override marker in reading order: `<mode> council`, `mode <mode>`
/// or `[<mode>]`.
fn find_marker(tokens: &[String]) -> Option<(Mode, String)> {
    (0..tokens.len()).find_map(|i| {
        let first = tokens[i].as_str();
        let second = tokens.get(i + 1).map(String::as_str)?;
        if second == "council"
            && let Some(mode) = mode_name(first)
        {
            return Some((mode, format!("{} council", first)));
        }
        if first == "mode"
            && let Some(mode) = mode_name(second)
        {
            return Some((mode, format!("mode {}", second)));
        }
        if first == "["
            && tokens.get(i + 2).is_some_and(|t| t == "]")
            && let Some(mode) = mode_name(second)
        {
            return Some((mode, format!("[{}]", second)));
        }
        None
    })
}

fn find_adversarial_keyword(tokens: &[String]) -> Option<String> {
    for (i, token) in tokens.iter().enumerate() {
        if let Some(word) = ADVERSARIAL_WORDS
            .iter()
            .find(|word| is_inflection_of(token, word))
        {
            return Some(word.to_string());
        }

        for phrase in ADVERSARIAL_PHRASES {
            if matches_phrase(&tokens[i..], phrase) {
                return Some(phrase.join(" "));
            }
        }
    }
    None
}

fn matches_phrase(tokens: &[String], phrase: &[&str]) -> bool {
    if tokens.len() < phrase.len() {
        return false;
    }
    let last = phrase.len() - 1;
    phrase.iter().enumerate().all(|(i, word)| {
        if i == last {
            is_inflection_of(&tokens[i], word)
        } else {
            tokens[i] == *word
        }
    })
}

/// `debate` matches `debate`, `debates`, `debated`, `debating`.
fn is_inflection_of(token: &str, stem: &str) -> bool {
    if token == stem {
        return true;
    }
    let Some(suffix) = token.strip_prefix(stem) else {
        // "debating" drops the trailing 'e' of the stem
        return stem
            .strip_suffix('e')
            .and_then(|base| token.strip_prefix(base))
            .is_some_and(|rest| rest == "ing");
    };
    matches!(suffix, "s" | "es" | "d" | "ed" | "ing")
}
