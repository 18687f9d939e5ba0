//! Flip-card study mode.
//!
//! Cards are shown in order. Each mark updates the card's streak and moves
//! to the next card; after the last card the session wraps to the first
//! unless every card has reached the mastery threshold.

use super::{answer_event, positions, ProgressSink, Reporter, StudySession};
use crate::analyzer::AnswerAnalyzer;
use crate::error::{Result, StudyError};
use crate::hint::{HintDisplay, HintSession};
use crate::mastery::MasteryTracker;
use crate::types::{Card, CardId, Difficulty, FlashcardSet, StudySettings};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a mark moved the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkOutcome {
    Advanced { index: usize },
    /// Past the last card with unlearned cards left; back at index 0.
    Wrapped,
    /// Every card learned; further marks are rejected.
    Completed,
}

/// Snapshot for rendering a flip card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipView {
    pub set_name: String,
    pub question: String,
    pub answer: String,
    pub flipped: bool,
    pub index: usize,
    pub total: usize,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub set_difficulty: Difficulty,
    pub shuffled: bool,
    pub complete: bool,
    pub hint: HintDisplay,
}

pub struct FlipSession {
    set_name: String,
    difficulty: Difficulty,
    cards: Vec<Card>,
    original_order: Option<Vec<Card>>,
    positions: HashMap<CardId, usize>,
    index: usize,
    flipped: bool,
    shuffled: bool,
    complete: bool,
    analyzer: AnswerAnalyzer,
    hint: HintSession,
    tracker: MasteryTracker,
    reporter: Reporter,
    rng: StdRng,
}

impl FlipSession {
    pub fn new(set: FlashcardSet, settings: &StudySettings) -> Result<Self> {
        Self::with_rng(set, settings, StdRng::from_os_rng())
    }

    pub fn with_rng(set: FlashcardSet, settings: &StudySettings, rng: StdRng) -> Result<Self> {
        let first = set.cards.first().ok_or(StudyError::EmptySet)?;
        let analyzer = AnswerAnalyzer::new(settings.single_word_max_chars);
        let hint = HintSession::new(first, &analyzer);

        tracing::info!(
            set = %set.set_name,
            cards = set.cards.len(),
            threshold = settings.flip_policy.effective_threshold(),
            reset = settings.flip_policy.reset.as_str(),
            "flip session started"
        );

        Ok(Self {
            positions: positions(&set.cards),
            tracker: MasteryTracker::new(settings.flip_policy, set.cards.len()),
            set_name: set.set_name,
            difficulty: set.difficulty,
            cards: set.cards,
            original_order: None,
            index: 0,
            flipped: false,
            shuffled: false,
            complete: false,
            analyzer,
            hint,
            reporter: Reporter::default(),
            rng,
        })
    }

    pub fn with_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.reporter.set(Box::new(sink));
        self
    }

    /// Present the card at `index`, resetting flip and hint state.
    pub fn load(&mut self, index: usize) -> Result<FlipView> {
        if index >= self.cards.len() {
            return Err(StudyError::OutOfRange {
                index,
                len: self.cards.len(),
            });
        }
        self.present(index);
        Ok(self.view())
    }

    /// Toggle between question and answer side.
    pub fn flip(&mut self) -> bool {
        self.flipped = !self.flipped;
        self.flipped
    }

    pub fn request_hint(&mut self) -> HintDisplay {
        self.hint.request()
    }

    /// Record an answer for the current card and move on.
    pub fn mark(&mut self, correct: bool) -> Result<MarkOutcome> {
        if self.complete {
            return Err(StudyError::SessionComplete);
        }

        let card = &self.cards[self.index];
        let entry = self.tracker.record(card.id, correct);
        let event = answer_event(&self.set_name, &self.positions, card, entry.learned, correct);
        tracing::debug!(
            card = %card.id,
            correct,
            streak = entry.streak,
            learned = entry.learned,
            "card marked"
        );
        self.reporter.answer(event);

        if self.index + 1 < self.cards.len() {
            self.present(self.index + 1);
            return Ok(MarkOutcome::Advanced { index: self.index });
        }

        if self.all_learned() {
            self.complete = true;
            tracing::info!(set = %self.set_name, cards = self.cards.len(), "set complete");
            Ok(MarkOutcome::Completed)
        } else {
            tracing::debug!(progress = self.tracker.progress(), "wrapping to first card");
            self.present(0);
            Ok(MarkOutcome::Wrapped)
        }
    }

    /// Randomize the working order and return to the first card.
    ///
    /// The order in effect before the first shuffle is kept for
    /// [`restore_order`](Self::restore_order).
    pub fn shuffle(&mut self) {
        if self.original_order.is_none() {
            self.original_order = Some(self.cards.clone());
        }
        self.cards.shuffle(&mut self.rng);
        self.shuffled = true;
        self.complete = false;
        self.present(0);
    }

    /// Put cards back in the order they had before shuffling.
    pub fn restore_order(&mut self) {
        if let Some(original) = &self.original_order {
            self.cards = original.clone();
        }
        self.shuffled = false;
        self.complete = false;
        self.present(0);
    }

    /// Shuffle if in original order, restore otherwise. Returns the new state.
    pub fn toggle_shuffle(&mut self) -> bool {
        if self.shuffled {
            self.restore_order();
        } else {
            self.shuffle();
        }
        self.shuffled
    }

    /// Forget all streaks and start over from the first card.
    pub fn reset_progress(&mut self) {
        self.tracker.reset();
        self.reporter.reset(&self.set_name);
        self.complete = false;
        tracing::info!(set = %self.set_name, "progress reset");
        self.present(0);
    }

    pub fn view(&self) -> FlipView {
        let card = self.current();
        FlipView {
            set_name: self.set_name.clone(),
            question: card.question.clone(),
            answer: card.answer.clone(),
            flipped: self.flipped,
            index: self.index,
            total: self.cards.len(),
            progress: self.tracker.progress(),
            difficulty: card.difficulty,
            set_difficulty: self.difficulty,
            shuffled: self.shuffled,
            complete: self.complete,
            hint: self.hint.display(),
        }
    }

    pub fn current(&self) -> &Card {
        &self.cards[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Cards in their current working order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn tracker(&self) -> &MasteryTracker {
        &self.tracker
    }

    fn present(&mut self, index: usize) {
        self.index = index;
        self.flipped = false;
        let card = &self.cards[index];
        self.tracker.begin_appearance(card.id);
        self.hint = HintSession::new(card, &self.analyzer);
        tracing::debug!(index, total = self.cards.len(), "card loaded");
    }

    fn all_learned(&self) -> bool {
        self.cards.iter().all(|c| self.tracker.is_learned(c.id))
    }
}

impl StudySession for FlipSession {
    fn set_name(&self) -> &str {
        &self.set_name
    }

    fn total(&self) -> usize {
        self.cards.len()
    }

    fn progress(&self) -> u8 {
        self.tracker.progress()
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::MemorySink;
    use crate::types::MasteryPolicy;
    use pretty_assertions::assert_eq;

    fn set(n: usize) -> FlashcardSet {
        let cards = (0..n)
            .map(|i| Card::new(format!("Question {i}"), format!("Answer{i}")))
            .collect();
        FlashcardSet::new("Numbers", Difficulty::Easy, cards)
    }

    fn session(n: usize, threshold: u32) -> FlipSession {
        let settings = StudySettings {
            flip_policy: MasteryPolicy::decrement(threshold),
            ..StudySettings::default()
        };
        FlipSession::with_rng(set(n), &settings, StdRng::seed_from_u64(5)).unwrap()
    }

    #[test]
    fn hard_reset_miss_only_voids_that_appearance() {
        let settings = StudySettings {
            flip_policy: MasteryPolicy::hard_reset(2),
            ..StudySettings::default()
        };
        let mut s = FlipSession::with_rng(set(1), &settings, StdRng::seed_from_u64(5)).unwrap();
        let id = s.current().id;

        assert_eq!(s.mark(false).unwrap(), MarkOutcome::Wrapped);
        assert_eq!(s.tracker().entry(id).streak, 0);
        assert!(!s.tracker().entry(id).had_mistake);

        assert_eq!(s.mark(true).unwrap(), MarkOutcome::Wrapped);
        assert_eq!(s.mark(true).unwrap(), MarkOutcome::Completed);
        assert!(s.is_complete());
    }

    #[test]
    fn empty_set_is_rejected() {
        let empty = FlashcardSet::new("Empty", Difficulty::Easy, vec![]);
        let result = FlipSession::new(empty, &StudySettings::default());
        assert!(matches!(result, Err(StudyError::EmptySet)));
    }

    #[test]
    fn load_out_of_range_fails() {
        let mut s = session(3, 2);
        assert_eq!(
            s.load(3).unwrap_err(),
            StudyError::OutOfRange { index: 3, len: 3 }
        );
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn load_resets_flip_and_hint() {
        let mut s = session(3, 2);
        s.flip();
        s.request_hint();
        let view = s.load(2).unwrap();
        assert!(!view.flipped);
        assert_eq!(view.hint.level, 0);
        assert_eq!(view.index, 2);
        assert_eq!(view.question, "Question 2");
    }

    #[test]
    fn flip_toggles_without_scheduling() {
        let mut s = session(2, 2);
        assert!(s.flip());
        assert!(!s.flip());
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn mark_advances_then_wraps() {
        let mut s = session(3, 2);
        assert_eq!(s.mark(true).unwrap(), MarkOutcome::Advanced { index: 1 });
        assert_eq!(s.mark(false).unwrap(), MarkOutcome::Advanced { index: 2 });
        assert_eq!(s.mark(true).unwrap(), MarkOutcome::Wrapped);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn completes_when_every_card_learned() {
        let mut s = session(2, 2);
        for _ in 0..3 {
            s.mark(true).unwrap();
        }
        assert_eq!(s.mark(true).unwrap(), MarkOutcome::Completed);
        assert!(s.is_complete());
        assert_eq!(s.progress(), 100);
        assert_eq!(s.mark(true).unwrap_err(), StudyError::SessionComplete);
    }

    #[test]
    fn shuffle_keeps_cards_and_restores_order() {
        let mut s = session(8, 2);
        let original: Vec<CardId> = s.cards().iter().map(|c| c.id).collect();

        assert!(s.toggle_shuffle());
        let mut shuffled: Vec<CardId> = s.cards().iter().map(|c| c.id).collect();
        assert_eq!(s.index(), 0);
        shuffled.sort();
        let mut sorted = original.clone();
        sorted.sort();
        assert_eq!(shuffled, sorted);

        // A second shuffle still restores to the order before the first.
        s.shuffle();
        assert!(!s.toggle_shuffle());
        let restored: Vec<CardId> = s.cards().iter().map(|c| c.id).collect();
        assert_eq!(restored, original);
    }

    #[test]
    fn shuffle_preserves_progress() {
        let mut s = session(4, 1);
        s.mark(true).unwrap();
        let before = s.progress();
        s.shuffle();
        assert_eq!(s.progress(), before);
    }

    #[test]
    fn reset_progress_clears_streaks() {
        let sink = MemorySink::default();
        let resets = sink.resets.clone();
        let mut s = session(2, 1).with_sink(sink);
        s.mark(true).unwrap();
        s.mark(true).unwrap();
        assert!(s.is_complete());

        s.reset_progress();
        assert!(!s.is_complete());
        assert_eq!(s.progress(), 0);
        assert_eq!(s.index(), 0);
        assert_eq!(resets.borrow().as_slice(), ["Numbers".to_string()]);
    }

    #[test]
    fn events_carry_position_in_supplied_order() {
        let sink = MemorySink::default();
        let events = sink.events.clone();
        let mut s = session(5, 2).with_sink(sink);
        let supplied: Vec<CardId> = s.cards().iter().map(|c| c.id).collect();
        s.shuffle();
        let id = s.current().id;
        s.mark(true).unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].card_id, id);
        let expected = supplied.iter().position(|c| *c == id).unwrap();
        assert_eq!(events[0].card_index, expected);
        assert!(!events[0].learned);
    }

    #[test]
    fn sink_failure_does_not_block_progress() {
        let sink = MemorySink {
            fail: true,
            ..MemorySink::default()
        };
        let mut s = session(2, 1).with_sink(sink);
        assert_eq!(s.mark(true).unwrap(), MarkOutcome::Advanced { index: 1 });
        assert_eq!(s.mark(true).unwrap(), MarkOutcome::Completed);
    }

    #[test]
    fn view_reports_card_difficulty() {
        let cards = vec![
            Card::new("Q1", "A1").with_difficulty(Difficulty::Hard),
            Card::new("Q2", "A2"),
        ];
        let set = FlashcardSet::new("Mixed", Difficulty::Medium, cards);
        let mut s = FlipSession::new(set, &StudySettings::default()).unwrap();
        let view = s.view();
        assert_eq!(view.question, "Q1");
        assert_eq!(view.difficulty, Some(Difficulty::Hard));
        assert_eq!(view.set_difficulty, Difficulty::Medium);
        assert_eq!(s.load(1).unwrap().difficulty, None);
    }
}
