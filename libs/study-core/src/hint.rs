//! Progressive hint disclosure for a single card.
//!
//! A session starts at level 0 and reveals one more letter (or word) per
//! request until the full answer is shown. Cards with a custom hint show it
//! whole on the first request and are exhausted immediately.

use crate::analyzer::{AnswerAnalyzer, HintStrategy};
use crate::types::Card;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder for one hidden letter.
pub const LETTER_BLANK: &str = "_";
/// Placeholder for one hidden word.
pub const WORD_BLANK: &str = "_____";
/// Shown when a hint cannot be rendered.
pub const ERROR_TEXT: &str = "Error";
/// Shown when there is nothing to reveal.
pub const NO_HINT_TEXT: &str = "No hint available";

/// Rendering failures. Never surfaced to callers; see [`HintSession::reveal`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HintError {
    #[error("letter hint expects a single token, found {0}")]
    TokenCount(usize),
}

/// What the caller should display after a hint request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintDisplay {
    pub text: String,
    pub level: usize,
    pub max_level: usize,
    /// No further reveal is possible; the hint control should be disabled.
    pub exhausted: bool,
}

/// Per-card hint state. Rebuilt whenever a new card is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintSession {
    strategy: HintStrategy,
    tokens: Vec<String>,
    level: usize,
    max_level: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom: Option<String>,
    #[serde(default)]
    exhausted: bool,
}

impl HintSession {
    pub fn new(card: &Card, analyzer: &AnswerAnalyzer) -> Self {
        let plan = analyzer.analyze(&card.answer);
        Self {
            strategy: plan.strategy,
            tokens: plan.tokens,
            level: 0,
            max_level: plan.max_level,
            custom: card.hint().map(str::to_string),
            exhausted: false,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Reveal one more step and return the text to show.
    ///
    /// Once exhausted, further requests leave the state untouched and return
    /// the same full reveal.
    pub fn request(&mut self) -> HintDisplay {
        if self.custom.is_some() {
            self.exhausted = true;
        } else if !self.exhausted {
            self.level = (self.level + 1).min(self.max_level);
            self.exhausted = self.level >= self.max_level;
        }
        self.display()
    }

    /// Current display without advancing.
    pub fn display(&self) -> HintDisplay {
        HintDisplay {
            text: self.reveal(self.level),
            level: self.level,
            max_level: self.max_level,
            exhausted: self.exhausted,
        }
    }

    /// Text for a given level, clamped to `0..=max_level`.
    ///
    /// A custom hint is returned verbatim at every level. Rendering failures
    /// are logged and replaced with [`ERROR_TEXT`].
    pub fn reveal(&self, level: usize) -> String {
        if let Some(custom) = &self.custom {
            return custom.clone();
        }
        let level = level.min(self.max_level);
        match self.render(level) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, level, "failed to render hint");
                ERROR_TEXT.to_string()
            }
        }
    }

    fn render(&self, level: usize) -> Result<String, HintError> {
        if self.tokens.is_empty() {
            return Ok(NO_HINT_TEXT.to_string());
        }
        match self.strategy {
            HintStrategy::LetterByLetter => {
                if self.tokens.len() != 1 {
                    return Err(HintError::TokenCount(self.tokens.len()));
                }
                Ok(letter_hint(&self.tokens[0], level))
            }
            HintStrategy::WordByWord => Ok(word_hint(&self.tokens, level)),
        }
    }
}

fn letter_hint(word: &str, level: usize) -> String {
    let len = word.chars().count();
    if level >= len {
        return word.to_string();
    }
    let revealed: String = word.chars().take(level).collect();
    let blanks = vec![LETTER_BLANK; len - level].join(" ");
    join_parts(&revealed, &blanks)
}

fn word_hint(tokens: &[String], level: usize) -> String {
    if level >= tokens.len() {
        return tokens.join(" ");
    }
    let revealed = tokens[..level].join(" ");
    let blanks = vec![WORD_BLANK; tokens.len() - level].join(" ");
    join_parts(&revealed, &blanks)
}

fn join_parts(revealed: &str, blanks: &str) -> String {
    if revealed.is_empty() {
        blanks.to_string()
    } else {
        format!("{revealed} {blanks}")
    }
}
