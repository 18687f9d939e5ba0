//! Card scheduling engine for flashcard study sessions.
//!
//! Provides:
//! - Flip-card, multiple-choice and drill schedulers
//! - Progressive hints (letter by letter or word by word)
//! - Distractor sampling for multiple-choice options
//! - Mastery tracking with configurable policies
//! - Set file parser and shared types (Card, FlashcardSet, StudySettings, etc.)

pub mod analyzer;
pub mod distractor;
pub mod error;
pub mod hint;
pub mod mastery;
pub mod parser;
pub mod scheduler;
pub mod types;

pub use analyzer::{analyze, AnswerAnalyzer, AnswerPlan, HintStrategy, SINGLE_WORD_MAX_CHARS};
pub use distractor::DistractorSampler;
pub use error::{ParseError, PersistenceError, Result, SetError, StudyError};
pub use hint::{HintDisplay, HintSession};
pub use mastery::{MasteryEntry, MasteryTracker};
pub use parser::parse_set;
pub use scheduler::choice::{ChoicePhase, ChoiceSession, ChoiceView, CompletionStats, Feedback};
pub use scheduler::drill::{DrillSession, DrillView};
pub use scheduler::flip::{FlipSession, FlipView, MarkOutcome};
pub use scheduler::{AnswerEvent, ProgressSink, StudyMode, StudySession};
pub use types::{
    Card, CardDraft, CardId, Difficulty, FlashcardSet, MasteryPolicy, ResetBehavior, SetSettings,
    StudySettings,
};
