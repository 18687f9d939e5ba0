//! Core types for the study engine.

use crate::error::SetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable surrogate identifier for a card.
///
/// Assigned once when the card is built and kept through shuffles and copies,
/// so two cards with the same question text never share mastery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Difficulty label for a set or a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// A single flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default = "CardId::new")]
    pub id: CardId,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            question: question.into(),
            answer: answer.into(),
            custom_hint: None,
            difficulty: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.custom_hint = Some(hint.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Custom hint, if one is set and not blank.
    pub fn hint(&self) -> Option<&str> {
        self.custom_hint
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// Card as typed into the authoring form, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl CardDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            hint: String::new(),
            difficulty: None,
        }
    }
}

impl From<Card> for CardDraft {
    fn from(card: Card) -> Self {
        Self {
            question: card.question,
            answer: card.answer,
            hint: card.custom_hint.unwrap_or_default(),
            difficulty: card.difficulty,
        }
    }
}

/// Named, ordered collection of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub set_name: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub cards: Vec<Card>,
}

impl FlashcardSet {
    pub fn new(set_name: impl Into<String>, difficulty: Difficulty, cards: Vec<Card>) -> Self {
        Self {
            set_name: set_name.into(),
            difficulty,
            cards,
        }
    }

    /// Build a set from form drafts.
    ///
    /// Drafts with a blank question or answer are dropped; everything else is
    /// trimmed. Fails if the name is blank or fewer than `min_cards` remain.
    pub fn validated(
        set_name: &str,
        difficulty: Difficulty,
        drafts: impl IntoIterator<Item = CardDraft>,
        min_cards: usize,
    ) -> Result<Self, SetError> {
        let set_name = set_name.trim();
        if set_name.is_empty() {
            return Err(SetError::MissingName);
        }

        let cards: Vec<Card> = drafts
            .into_iter()
            .filter_map(|draft| {
                let question = draft.question.trim();
                let answer = draft.answer.trim();
                if question.is_empty() || answer.is_empty() {
                    return None;
                }
                let mut card = Card::new(question, answer);
                let hint = draft.hint.trim();
                if !hint.is_empty() {
                    card.custom_hint = Some(hint.to_string());
                }
                card.difficulty = draft.difficulty;
                Some(card)
            })
            .collect();

        if cards.len() < min_cards {
            return Err(SetError::TooFewCards {
                required: min_cards,
                found: cards.len(),
            });
        }

        Ok(Self::new(set_name, difficulty, cards))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// What an incorrect answer does to a card's streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetBehavior {
    /// Streak drops by one, floored at zero.
    Decrement,
    /// A mistake voids the current appearance; streak goes back to zero.
    HardReset,
}

impl ResetBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decrement => "decrement",
            Self::HardReset => "hard_reset",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "decrement" => Some(Self::Decrement),
            "hard_reset" => Some(Self::HardReset),
            _ => None,
        }
    }
}

/// How many correct answers a card needs and what a miss costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryPolicy {
    pub threshold: u32,
    pub reset: ResetBehavior,
}

impl MasteryPolicy {
    pub fn decrement(threshold: u32) -> Self {
        Self {
            threshold,
            reset: ResetBehavior::Decrement,
        }
    }

    pub fn hard_reset(threshold: u32) -> Self {
        Self {
            threshold,
            reset: ResetBehavior::HardReset,
        }
    }

    /// Threshold actually applied; a zero threshold would mark unseen cards learned.
    pub fn effective_threshold(&self) -> u32 {
        self.threshold.max(1)
    }
}

/// Global study configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySettings {
    pub flip_policy: MasteryPolicy,
    pub choice_policy: MasteryPolicy,
    pub distractor_count: usize,
    pub single_word_max_chars: usize,
    pub min_cards: usize,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            flip_policy: MasteryPolicy::decrement(2),
            choice_policy: MasteryPolicy::hard_reset(1),
            distractor_count: 3,
            single_word_max_chars: 20,
            min_cards: 4,
        }
    }
}

impl StudySettings {
    /// Merge global settings with optional per-set overrides.
    pub fn merge(&self, set: Option<&SetSettings>) -> Self {
        match set {
            Some(s) => Self {
                flip_policy: MasteryPolicy {
                    threshold: s.flip_threshold.unwrap_or(self.flip_policy.threshold),
                    reset: s.flip_reset.unwrap_or(self.flip_policy.reset),
                },
                choice_policy: MasteryPolicy {
                    threshold: s.choice_threshold.unwrap_or(self.choice_policy.threshold),
                    reset: self.choice_policy.reset,
                },
                distractor_count: s.distractor_count.unwrap_or(self.distractor_count),
                single_word_max_chars: self.single_word_max_chars,
                min_cards: self.min_cards,
            },
            None => self.clone(),
        }
    }
}

/// Per-set overrides (all fields optional).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSettings {
    pub set_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_reset: Option<ResetBehavior>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distractor_count: Option<usize>,
}

impl SetSettings {
    /// Create new set settings with only the name set.
    pub fn new(set_name: String) -> Self {
        Self {
            set_name,
            flip_threshold: None,
            flip_reset: None,
            choice_threshold: None,
            distractor_count: None,
        }
    }
}
