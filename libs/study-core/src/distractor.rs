//! Multiple-choice option generation.

use crate::error::{Result, StudyError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// Default number of wrong options shown next to the correct one.
pub const DEFAULT_DISTRACTORS: usize = 3;

/// Picks `k` distinct wrong answers and mixes in the correct one.
#[derive(Debug, Clone, Copy)]
pub struct DistractorSampler {
    k: usize,
}

impl Default for DistractorSampler {
    fn default() -> Self {
        Self {
            k: DEFAULT_DISTRACTORS,
        }
    }
}

impl DistractorSampler {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Build a shuffled option list of `k + 1` distinct entries.
    ///
    /// The pool may contain duplicates and the correct answer itself; both
    /// are filtered by exact text. Fails without padding when fewer than `k`
    /// alternatives remain.
    pub fn sample<'a, R>(
        &self,
        correct: &str,
        pool: impl IntoIterator<Item = &'a str>,
        rng: &mut R,
    ) -> Result<Vec<String>>
    where
        R: Rng + ?Sized,
    {
        // BTreeSet keeps the pre-shuffle order independent of hashing so a
        // seeded rng reproduces the same options.
        let unique: BTreeSet<&str> = pool.into_iter().filter(|a| *a != correct).collect();
        if unique.len() < self.k {
            return Err(StudyError::InsufficientDistractors {
                needed: self.k,
                available: unique.len(),
            });
        }

        let mut wrong: Vec<&str> = unique.into_iter().collect();
        wrong.shuffle(rng);
        wrong.truncate(self.k);

        let mut options: Vec<String> = Vec::with_capacity(self.k + 1);
        options.push(correct.to_string());
        options.extend(wrong.into_iter().map(str::to_string));
        options.shuffle(rng);
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn returns_k_plus_one_distinct_options() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = ["H", "He", "Li", "Be", "B", "C"];
        let options = DistractorSampler::default()
            .sample("O", pool, &mut rng)
            .unwrap();

        assert_eq!(options.len(), 4);
        let unique: HashSet<_> = options.iter().collect();
        assert_eq!(unique.len(), 4);
        assert_eq!(options.iter().filter(|o| *o == "O").count(), 1);
        assert!(options.iter().all(|o| o == "O" || pool.contains(&o.as_str())));
    }

    #[test]
    fn duplicates_and_correct_answer_are_filtered() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = ["O", "H", "H", "He", "He", "O", "Li"];
        let options = DistractorSampler::default()
            .sample("O", pool, &mut rng)
            .unwrap();
        let mut sorted = options.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["H", "He", "Li", "O"]);
    }

    #[test]
    fn insufficient_pool_fails_without_padding() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = ["O", "H", "H", "He"];
        let result = DistractorSampler::default().sample("O", pool, &mut rng);
        assert_eq!(
            result,
            Err(StudyError::InsufficientDistractors {
                needed: 3,
                available: 2
            })
        );
    }

    #[test]
    fn same_seed_same_options() {
        let pool = ["a", "b", "c", "d", "e", "f", "g"];
        let sampler = DistractorSampler::new(3);
        let first = sampler
            .sample("z", pool, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let second = sampler
            .sample("z", pool, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn correct_answer_position_varies() {
        let pool = ["a", "b", "c", "d", "e"];
        let sampler = DistractorSampler::default();
        let mut rng = StdRng::seed_from_u64(11);
        let positions: HashSet<usize> = (0..200)
            .map(|_| {
                let options = sampler.sample("z", pool, &mut rng).unwrap();
                options.iter().position(|o| o == "z").unwrap()
            })
            .collect();
        assert_eq!(positions.len(), 4);
    }
}
