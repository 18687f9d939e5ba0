//! Per-card mastery counters.

use crate::types::{CardId, MasteryPolicy, ResetBehavior};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mastery state of one card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryEntry {
    pub streak: u32,
    pub times_correct: u32,
    pub times_wrong: u32,
    pub learned: bool,
    /// Set by the first miss of the current appearance (hard-reset policy).
    pub had_mistake: bool,
}

/// Tracks streaks for every card of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryTracker {
    policy: MasteryPolicy,
    total: usize,
    entries: HashMap<CardId, MasteryEntry>,
}

impl MasteryTracker {
    pub fn new(policy: MasteryPolicy, total: usize) -> Self {
        Self {
            policy,
            total,
            entries: HashMap::new(),
        }
    }

    /// Start a new appearance of a card, clearing its mistake flag.
    pub fn begin_appearance(&mut self, id: CardId) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.had_mistake = false;
        }
    }

    /// Record an answer and return the updated entry.
    pub fn record(&mut self, id: CardId, correct: bool) -> MasteryEntry {
        let threshold = self.policy.effective_threshold();
        let reset = self.policy.reset;
        let entry = self.entries.entry(id).or_default();

        if correct {
            entry.times_correct += 1;
            match reset {
                ResetBehavior::Decrement => entry.streak += 1,
                // A correct answer after a miss in the same appearance earns nothing.
                ResetBehavior::HardReset if !entry.had_mistake => entry.streak += 1,
                ResetBehavior::HardReset => {}
            }
        } else {
            entry.times_wrong += 1;
            match reset {
                ResetBehavior::Decrement => entry.streak = entry.streak.saturating_sub(1),
                ResetBehavior::HardReset => {
                    entry.had_mistake = true;
                    entry.streak = 0;
                }
            }
        }
        entry.learned = entry.streak >= threshold;
        *entry
    }

    pub fn entry(&self, id: CardId) -> MasteryEntry {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    pub fn is_learned(&self, id: CardId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.learned)
    }

    pub fn learned_count(&self) -> usize {
        self.entries.values().filter(|e| e.learned).count()
    }

    /// Learned cards as a whole percentage of the session's cards.
    pub fn progress(&self) -> u8 {
        percent(self.learned_count(), self.total)
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

/// `part / total` as a rounded percentage; zero when `total` is zero.
pub fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let value = (part as f64 / total as f64 * 100.0).round();
    value.clamp(0.0, 100.0) as u8
}
