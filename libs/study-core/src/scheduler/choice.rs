//! Multiple-choice deck mode.
//!
//! The set is copied and shuffled into a deck. The front card is asked until
//! it is answered correctly; `next` then moves it to the mastered pile if the
//! appearance had no mistakes, or to the back of the deck otherwise. The
//! session completes when the deck is empty.

use super::{answer_event, positions, ProgressSink, Reporter, StudySession};
use crate::distractor::DistractorSampler;
use crate::error::{Result, StudyError};
use crate::mastery::{percent, MasteryTracker};
use crate::types::{Card, CardId, FlashcardSet, StudySettings};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoicePhase {
    /// No question loaded yet.
    Loading,
    /// Waiting for an answer to the current question.
    Answering,
    /// Answered correctly; waiting for `next`.
    Answered,
    Completed,
    /// Options could not be built; the caller should end the session.
    Halted,
}

/// Feedback for the last submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    None,
    /// Wrong; the same question stays up for another attempt.
    Wrong,
    /// Right, and the card now counts as learned; `next` retires it.
    Mastered,
    /// Right, but not learned yet; `next` sends the card to the back.
    WillRepeat,
}

/// Snapshot for rendering the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceView {
    pub set_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub options: Vec<String>,
    pub remaining: usize,
    pub mastered: usize,
    pub total: usize,
    pub progress: u8,
    pub phase: ChoicePhase,
    pub feedback: Feedback,
    /// For comparison by the caller; not meant for display.
    #[serde(skip)]
    pub correct_answer: Option<String>,
}

/// Totals shown when the deck is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub total: usize,
    pub correct: u32,
    pub wrong: u32,
    /// Percentage of correct submissions, 0 when nothing was submitted.
    pub accuracy: f64,
}

pub struct ChoiceSession {
    source: FlashcardSet,
    positions: HashMap<CardId, usize>,
    deck: VecDeque<Card>,
    mastered: Vec<Card>,
    options: Vec<String>,
    phase: ChoicePhase,
    feedback: Feedback,
    correct_count: u32,
    wrong_count: u32,
    sampler: DistractorSampler,
    tracker: MasteryTracker,
    reporter: Reporter,
    rng: StdRng,
}

impl ChoiceSession {
    pub fn new(set: FlashcardSet, settings: &StudySettings) -> Result<Self> {
        Self::with_rng(set, settings, StdRng::from_os_rng())
    }

    /// Build the session and shuffle the deck. Call
    /// [`load_question`](Self::load_question) to present the first card.
    pub fn with_rng(set: FlashcardSet, settings: &StudySettings, rng: StdRng) -> Result<Self> {
        if set.is_empty() {
            return Err(StudyError::EmptySet);
        }

        let mut session = Self {
            positions: positions(&set.cards),
            tracker: MasteryTracker::new(settings.choice_policy, set.len()),
            source: set,
            deck: VecDeque::new(),
            mastered: Vec::new(),
            options: Vec::new(),
            phase: ChoicePhase::Loading,
            feedback: Feedback::None,
            correct_count: 0,
            wrong_count: 0,
            sampler: DistractorSampler::new(settings.distractor_count),
            reporter: Reporter::default(),
            rng,
        };
        session.deal();
        Ok(session)
    }

    pub fn with_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.reporter.set(Box::new(sink));
        self
    }

    /// Present the front card of the deck, or complete if the deck is empty.
    pub fn load_question(&mut self) -> Result<ChoiceView> {
        self.options.clear();
        self.feedback = Feedback::None;

        let Some(card) = self.deck.front() else {
            self.phase = ChoicePhase::Completed;
            tracing::info!(
                set = %self.source.set_name,
                correct = self.correct_count,
                wrong = self.wrong_count,
                "all cards mastered"
            );
            return Ok(self.view());
        };

        self.tracker.begin_appearance(card.id);
        let pool = self
            .deck
            .iter()
            .chain(self.mastered.iter())
            .map(|c| c.answer.as_str());

        match self.sampler.sample(&card.answer, pool, &mut self.rng) {
            Ok(options) => {
                self.options = options;
                self.phase = ChoicePhase::Answering;
                tracing::debug!(
                    card = %card.id,
                    remaining = self.deck.len(),
                    mastered = self.mastered.len(),
                    "question loaded"
                );
                Ok(self.view())
            }
            Err(err) => {
                tracing::warn!(error = %err, set = %self.source.set_name, "cannot build options");
                self.phase = ChoicePhase::Halted;
                Err(err)
            }
        }
    }

    /// Check an option against the current question.
    ///
    /// A wrong answer keeps the same question up and flags the appearance.
    pub fn submit(&mut self, selected: &str) -> Result<Feedback> {
        match self.phase {
            ChoicePhase::Answering => {}
            ChoicePhase::Answered => return Err(StudyError::AlreadyAnswered),
            ChoicePhase::Completed => return Err(StudyError::SessionComplete),
            ChoicePhase::Loading | ChoicePhase::Halted => {
                return Err(StudyError::NoActiveQuestion)
            }
        }
        if !self.options.iter().any(|o| o == selected) {
            return Err(StudyError::UnknownOption(selected.to_string()));
        }

        let card = self.deck.front().ok_or(StudyError::NoActiveQuestion)?;
        let correct = selected == card.answer;
        let entry = self.tracker.record(card.id, correct);
        let event = answer_event(
            &self.source.set_name,
            &self.positions,
            card,
            entry.learned,
            correct,
        );

        if correct {
            self.correct_count += 1;
            self.phase = ChoicePhase::Answered;
            self.feedback = if entry.learned {
                Feedback::Mastered
            } else {
                Feedback::WillRepeat
            };
        } else {
            self.wrong_count += 1;
            self.feedback = Feedback::Wrong;
        }
        tracing::debug!(card = %card.id, correct, feedback = ?self.feedback, "answer submitted");
        self.reporter.answer(event);

        Ok(self.feedback)
    }

    /// Retire the current card and load the next question.
    ///
    /// The card goes to the mastered pile only if it counts as learned, which
    /// under the default policy means no mistake in this appearance.
    pub fn next(&mut self) -> Result<ChoiceView> {
        match self.phase {
            ChoicePhase::Answered => {}
            ChoicePhase::Answering => return Err(StudyError::NotAnswered),
            ChoicePhase::Completed => return Err(StudyError::SessionComplete),
            ChoicePhase::Loading | ChoicePhase::Halted => {
                return Err(StudyError::NoActiveQuestion)
            }
        }

        let card = self.deck.pop_front().ok_or(StudyError::NoActiveQuestion)?;
        if self.tracker.is_learned(card.id) {
            tracing::debug!(card = %card.id, "card mastered");
            self.mastered.push(card);
        } else {
            tracing::debug!(card = %card.id, "card requeued");
            self.deck.push_back(card);
        }
        self.load_question()
    }

    /// Start over from the original set with a fresh shuffle.
    pub fn restart(&mut self) -> Result<ChoiceView> {
        self.tracker.reset();
        self.correct_count = 0;
        self.wrong_count = 0;
        self.deal();
        tracing::info!(set = %self.source.set_name, "session restarted");
        self.load_question()
    }

    pub fn view(&self) -> ChoiceView {
        let current = match self.phase {
            ChoicePhase::Answering | ChoicePhase::Answered => self.deck.front(),
            _ => None,
        };
        ChoiceView {
            set_name: self.source.set_name.clone(),
            question: current.map(|c| c.question.clone()),
            options: self.options.clone(),
            remaining: self.deck.len(),
            mastered: self.mastered.len(),
            total: self.source.len(),
            progress: self.progress(),
            phase: self.phase,
            feedback: self.feedback,
            correct_answer: current.map(|c| c.answer.clone()),
        }
    }

    pub fn stats(&self) -> CompletionStats {
        let attempts = self.correct_count + self.wrong_count;
        let accuracy = if attempts > 0 {
            self.correct_count as f64 / attempts as f64 * 100.0
        } else {
            0.0
        };
        CompletionStats {
            total: self.source.len(),
            correct: self.correct_count,
            wrong: self.wrong_count,
            accuracy,
        }
    }

    pub fn phase(&self) -> ChoicePhase {
        self.phase
    }

    pub fn current(&self) -> Option<&Card> {
        match self.phase {
            ChoicePhase::Answering | ChoicePhase::Answered => self.deck.front(),
            _ => None,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Cards not yet mastered, front first.
    pub fn deck(&self) -> &VecDeque<Card> {
        &self.deck
    }

    pub fn mastered(&self) -> &[Card] {
        &self.mastered
    }

    pub fn tracker(&self) -> &MasteryTracker {
        &self.tracker
    }

    fn deal(&mut self) {
        let mut cards = self.source.cards.clone();
        cards.shuffle(&mut self.rng);
        self.deck = cards.into();
        self.mastered.clear();
        self.options.clear();
        self.phase = ChoicePhase::Loading;
        self.feedback = Feedback::None;
    }
}

impl StudySession for ChoiceSession {
    fn set_name(&self) -> &str {
        &self.source.set_name
    }

    fn total(&self) -> usize {
        self.source.len()
    }

    fn progress(&self) -> u8 {
        percent(self.mastered.len(), self.source.len())
    }

    fn is_complete(&self) -> bool {
        self.phase == ChoicePhase::Completed
    }
}
