//! Study session schedulers.
//!
//! Each session owns its working copy of a set and decides which card comes
//! next. Callers render the returned views and never hold scheduling state.

pub mod choice;
pub mod drill;
pub mod flip;

use crate::error::PersistenceError;
use crate::types::{Card, CardId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which scheduler to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    /// Flip cards in order, wrap until every card reaches the threshold.
    Flip,
    /// Multiple choice over a shuffled deck, misses go to the back.
    Choice,
    /// Flip cards, correct ones leave the rotation for good.
    Drill,
}

impl Default for StudyMode {
    fn default() -> Self {
        Self::Flip
    }
}

impl StudyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flip => "flip",
            Self::Choice => "choice",
            Self::Drill => "drill",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "flip" => Some(Self::Flip),
            "choice" => Some(Self::Choice),
            "drill" => Some(Self::Drill),
            _ => None,
        }
    }
}

/// Read-only view shared by every scheduler.
pub trait StudySession {
    fn set_name(&self) -> &str;

    /// Number of cards in the session.
    fn total(&self) -> usize;

    /// Whole-number percentage of cards considered done.
    fn progress(&self) -> u8;

    fn is_complete(&self) -> bool;
}

/// Outcome of one answer, handed to the progress sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub set_name: String,
    pub card_id: CardId,
    /// Position of the card in the set as supplied, independent of shuffling.
    pub card_index: usize,
    pub learned: bool,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Receives progress from sessions, typically to persist it.
///
/// Failures are logged by the session and otherwise ignored; scheduling
/// always advances.
pub trait ProgressSink {
    fn on_answer(&mut self, event: &AnswerEvent) -> Result<(), PersistenceError>;

    /// Called when a session wipes its progress.
    fn on_reset(&mut self, _set_name: &str) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Fire-and-forget wrapper around an optional sink.
#[derive(Default)]
pub(crate) struct Reporter {
    sink: Option<Box<dyn ProgressSink>>,
}

impl Reporter {
    pub(crate) fn set(&mut self, sink: Box<dyn ProgressSink>) {
        self.sink = Some(sink);
    }

    pub(crate) fn answer(&mut self, event: AnswerEvent) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(err) = sink.on_answer(&event) {
            tracing::warn!(
                error = %err,
                set = %event.set_name,
                card = %event.card_id,
                "failed to record answer"
            );
        }
    }

    pub(crate) fn reset(&mut self, set_name: &str) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(err) = sink.on_reset(set_name) {
            tracing::warn!(error = %err, set = %set_name, "failed to record reset");
        }
    }
}

/// Card positions in the order the set was supplied.
pub(crate) fn positions(cards: &[Card]) -> HashMap<CardId, usize> {
    cards.iter().enumerate().map(|(i, c)| (c.id, i)).collect()
}

pub(crate) fn answer_event(
    set_name: &str,
    positions: &HashMap<CardId, usize>,
    card: &Card,
    learned: bool,
    correct: bool,
) -> AnswerEvent {
    AnswerEvent {
        set_name: set_name.to_string(),
        card_id: card.id,
        card_index: positions.get(&card.id).copied().unwrap_or_default(),
        learned,
        correct,
        answered_at: Utc::now(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Sink that keeps events in memory and can be told to fail.
    #[derive(Clone, Default)]
    pub struct MemorySink {
        pub events: Rc<RefCell<Vec<AnswerEvent>>>,
        pub resets: Rc<RefCell<Vec<String>>>,
        pub fail: bool,
    }

    impl ProgressSink for MemorySink {
        fn on_answer(&mut self, event: &AnswerEvent) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Other("store offline".into()));
            }
            self.events.borrow_mut().push(event.clone());
            Ok(())
        }

        fn on_reset(&mut self, set_name: &str) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Other("store offline".into()));
            }
            self.resets.borrow_mut().push(set_name.to_string());
            Ok(())
        }
    }
}
