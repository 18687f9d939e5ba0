//! Answer classification for progressive hints.

use serde::{Deserialize, Serialize};

/// Answers longer than this (in characters) are revealed word by word even
/// when they are a single token. Tuned for readability of the blank pattern.
pub const SINGLE_WORD_MAX_CHARS: usize = 20;

/// How a hint is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintStrategy {
    LetterByLetter,
    WordByWord,
}

/// Result of analyzing an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPlan {
    pub strategy: HintStrategy,
    pub tokens: Vec<String>,
    pub max_level: usize,
}

/// Classifies answers as single-token or multi-token.
#[derive(Debug, Clone, Copy)]
pub struct AnswerAnalyzer {
    single_word_max_chars: usize,
}

impl Default for AnswerAnalyzer {
    fn default() -> Self {
        Self {
            single_word_max_chars: SINGLE_WORD_MAX_CHARS,
        }
    }
}

impl AnswerAnalyzer {
    pub fn new(single_word_max_chars: usize) -> Self {
        Self {
            single_word_max_chars,
        }
    }

    /// Derive the hint plan for an answer.
    pub fn analyze(&self, answer: &str) -> AnswerPlan {
        let clean = answer.trim();
        if clean.is_empty() {
            return AnswerPlan {
                strategy: HintStrategy::WordByWord,
                tokens: vec![String::new()],
                max_level: 1,
            };
        }

        let words: Vec<String> = clean.split_whitespace().map(str::to_string).collect();
        let chars = clean.chars().count();

        if words.len() == 1 && chars <= self.single_word_max_chars {
            AnswerPlan {
                strategy: HintStrategy::LetterByLetter,
                tokens: words,
                max_level: chars,
            }
        } else {
            let max_level = words.len();
            AnswerPlan {
                strategy: HintStrategy::WordByWord,
                tokens: words,
                max_level,
            }
        }
    }
}

/// Analyze with the default single-word limit.
pub fn analyze(answer: &str) -> AnswerPlan {
    AnswerAnalyzer::default().analyze(answer)
}
