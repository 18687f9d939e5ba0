//! Multiple-choice deck invariants under randomized answering.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use study_core::{
    Card, CardId, ChoicePhase, ChoiceSession, Difficulty, DistractorSampler, FlashcardSet,
    StudyError, StudySettings,
};

fn capitals() -> FlashcardSet {
    let cards = [
        ("Capital of France?", "Paris"),
        ("Capital of Japan?", "Tokyo"),
        ("Capital of Kenya?", "Nairobi"),
        ("Capital of Peru?", "Lima"),
        ("Capital of Canada?", "Ottawa"),
        ("Capital of Norway?", "Oslo"),
        ("Capital of Egypt?", "Cairo"),
    ]
    .into_iter()
    .map(|(q, a)| Card::new(q, a))
    .collect();
    FlashcardSet::new("Capitals", Difficulty::Medium, cards)
}

fn assert_conserved(session: &ChoiceSession, all: &HashSet<CardId>) {
    let ids: Vec<CardId> = session
        .deck()
        .iter()
        .chain(session.mastered().iter())
        .map(|c| c.id)
        .collect();
    assert_eq!(ids.len(), all.len(), "deck + mastered must equal the set size");
    let unique: HashSet<CardId> = ids.into_iter().collect();
    assert_eq!(&unique, all, "no card may be lost or duplicated");
}

#[test]
fn deck_and_mastered_partition_the_set() {
    for seed in 0..40 {
        let set = capitals();
        let all: HashSet<CardId> = set.cards.iter().map(|c| c.id).collect();
        let mut session =
            ChoiceSession::with_rng(set, &StudySettings::default(), StdRng::seed_from_u64(seed))
                .unwrap();
        let mut player = StdRng::seed_from_u64(seed + 1000);

        assert_conserved(&session, &all);
        session.load_question().unwrap();

        let mut steps = 0;
        while session.phase() != ChoicePhase::Completed {
            steps += 1;
            assert!(steps < 10_000, "session never completed (seed {seed})");

            match session.phase() {
                ChoicePhase::Answering => {
                    let options = session.options().to_vec();
                    let pick = &options[player.random_range(0..options.len())];
                    session.submit(pick).unwrap();
                }
                ChoicePhase::Answered => {
                    session.next().unwrap();
                }
                other => panic!("unexpected phase {other:?}"),
            }
            assert_conserved(&session, &all);
        }
        assert_eq!(session.mastered().len(), all.len());
        assert!(session.deck().is_empty());
    }
}

#[test]
fn misused_calls_do_not_move_cards() {
    let set = capitals();
    let all: HashSet<CardId> = set.cards.iter().map(|c| c.id).collect();
    let mut session =
        ChoiceSession::with_rng(set, &StudySettings::default(), StdRng::seed_from_u64(3)).unwrap();

    assert_eq!(session.next().unwrap_err(), StudyError::NoActiveQuestion);
    session.load_question().unwrap();
    assert_eq!(session.next().unwrap_err(), StudyError::NotAnswered);
    assert!(session.submit("Atlantis").is_err());
    assert_conserved(&session, &all);
    assert_eq!(session.deck().len(), 7);
}

#[test]
fn sampled_options_are_pairwise_distinct() {
    let sampler = DistractorSampler::default();
    let pool: Vec<String> = (0..12).map(|i| format!("answer {}", i % 6)).collect();
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..500 {
        let options = sampler
            .sample("answer 0", pool.iter().map(String::as_str), &mut rng)
            .unwrap();
        assert_eq!(options.len(), 4);
        let unique: HashSet<&String> = options.iter().collect();
        assert_eq!(unique.len(), 4);
        assert_eq!(options.iter().filter(|o| *o == "answer 0").count(), 1);
    }
}

#[test]
fn insufficient_pool_is_signalled() {
    let sampler = DistractorSampler::default();
    let mut rng = StdRng::seed_from_u64(5);
    let pool = ["Paris", "Lima", "Lima", "Paris", "Tokyo"];

    let result = sampler.sample("Tokyo", pool, &mut rng);
    assert_eq!(
        result,
        Err(StudyError::InsufficientDistractors {
            needed: 3,
            available: 2
        })
    );
}
