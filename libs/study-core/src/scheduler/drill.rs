//! Elimination drill: a correct card leaves the rotation, a missed card
//! stays and the cursor moves on to the next remaining card.

use super::{answer_event, positions, ProgressSink, Reporter, StudySession};
use crate::analyzer::AnswerAnalyzer;
use crate::error::{Result, StudyError};
use crate::hint::{HintDisplay, HintSession};
use crate::mastery::percent;
use crate::types::{Card, CardId, FlashcardSet, StudySettings};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillView {
    pub set_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub flipped: bool,
    pub remaining: usize,
    pub cleared: usize,
    pub total: usize,
    pub progress: u8,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<HintDisplay>,
}

pub struct DrillSession {
    set_name: String,
    cards: Vec<Card>,
    positions: HashMap<CardId, usize>,
    remaining: Vec<Card>,
    cleared: Vec<Card>,
    index: usize,
    flipped: bool,
    analyzer: AnswerAnalyzer,
    hint: Option<HintSession>,
    reporter: Reporter,
    rng: StdRng,
}

impl DrillSession {
    pub fn new(set: FlashcardSet, settings: &StudySettings) -> Result<Self> {
        Self::with_rng(set, settings, StdRng::from_os_rng())
    }

    pub fn with_rng(set: FlashcardSet, settings: &StudySettings, rng: StdRng) -> Result<Self> {
        if set.is_empty() {
            return Err(StudyError::EmptySet);
        }
        tracing::info!(set = %set.set_name, cards = set.len(), "drill session started");

        let mut session = Self {
            positions: positions(&set.cards),
            remaining: set.cards.clone(),
            set_name: set.set_name,
            cards: set.cards,
            cleared: Vec::new(),
            index: 0,
            flipped: false,
            analyzer: AnswerAnalyzer::new(settings.single_word_max_chars),
            hint: None,
            reporter: Reporter::default(),
            rng,
        };
        session.refresh();
        Ok(session)
    }

    pub fn with_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.reporter.set(Box::new(sink));
        self
    }

    pub fn current(&self) -> Option<&Card> {
        self.remaining.get(self.index)
    }

    pub fn flip(&mut self) -> bool {
        self.flipped = !self.flipped;
        self.flipped
    }

    pub fn request_hint(&mut self) -> Option<HintDisplay> {
        self.hint.as_mut().map(HintSession::request)
    }

    pub fn mark(&mut self, correct: bool) -> Result<()> {
        if self.remaining.is_empty() {
            return Err(StudyError::SessionComplete);
        }

        let event = answer_event(
            &self.set_name,
            &self.positions,
            &self.remaining[self.index],
            correct,
            correct,
        );
        self.reporter.answer(event);

        if correct {
            let card = self.remaining.remove(self.index);
            tracing::debug!(card = %card.id, left = self.remaining.len(), "card cleared");
            self.cleared.push(card);
            if self.remaining.is_empty() {
                self.index = 0;
                tracing::info!(set = %self.set_name, "drill complete");
            } else {
                self.index %= self.remaining.len();
            }
        } else {
            self.index = (self.index + 1) % self.remaining.len();
        }
        self.refresh();
        Ok(())
    }

    /// Reorder the remaining cards and start from the first.
    pub fn shuffle(&mut self) {
        self.remaining.shuffle(&mut self.rng);
        self.index = 0;
        self.refresh();
    }

    /// Put every card back into rotation.
    pub fn reset(&mut self) {
        self.remaining = self.cards.clone();
        self.cleared.clear();
        self.index = 0;
        self.reporter.reset(&self.set_name);
        self.refresh();
    }

    pub fn remaining(&self) -> &[Card] {
        &self.remaining
    }

    pub fn cleared(&self) -> &[Card] {
        &self.cleared
    }

    pub fn view(&self) -> DrillView {
        let card = self.current();
        DrillView {
            set_name: self.set_name.clone(),
            question: card.map(|c| c.question.clone()),
            answer: card.map(|c| c.answer.clone()),
            flipped: self.flipped,
            remaining: self.remaining.len(),
            cleared: self.cleared.len(),
            total: self.cards.len(),
            progress: self.progress(),
            complete: self.is_complete(),
            hint: self.hint.as_ref().map(HintSession::display),
        }
    }

    fn refresh(&mut self) {
        self.flipped = false;
        self.hint = self
            .remaining
            .get(self.index)
            .map(|c| HintSession::new(c, &self.analyzer));
    }
}

impl StudySession for DrillSession {
    fn set_name(&self) -> &str {
        &self.set_name
    }

    fn total(&self) -> usize {
        self.cards.len()
    }

    fn progress(&self) -> u8 {
        percent(self.cleared.len(), self.cards.len())
    }

    fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}
