pub mod config;
pub mod progress;
pub mod terminal;

use std::io;
use std::path::Path;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use study_core::{
    parse_set, CardDraft, ChoiceSession, DrillSession, FlashcardSet, FlipSession, StudyMode,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::progress::JsonlProgressStore;
use crate::terminal::Terminal;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env(std::env::args().nth(1))?;
    let set = load_set(&config.set_path, config.settings.min_cards)?;

    let store = config.progress_file.clone().map(JsonlProgressStore::new);
    if let Some(store) = &store {
        match store.learned_count(&set.set_name) {
            Ok(learned) => tracing::info!(
                set = %set.set_name,
                learned,
                path = %store.path().display(),
                "loaded previous progress"
            ),
            Err(err) => tracing::warn!(error = %err, "could not read progress"),
        }
    }

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut terminal = Terminal::new(io::stdin().lock(), io::stdout().lock());
    match config.mode {
        StudyMode::Flip => {
            let mut session = FlipSession::with_rng(set, &config.settings, rng)?;
            if let Some(store) = store {
                session = session.with_sink(store);
            }
            terminal.run_flip(&mut session)
        }
        StudyMode::Choice => {
            let mut session = ChoiceSession::with_rng(set, &config.settings, rng)?;
            if let Some(store) = store {
                session = session.with_sink(store);
            }
            terminal.run_choice(&mut session, config.advance_delay)
        }
        StudyMode::Drill => {
            let mut session = DrillSession::with_rng(set, &config.settings, rng)?;
            if let Some(store) = store {
                session = session.with_sink(store);
            }
            terminal.run_drill(&mut session)
        }
    }
}

/// Read, parse and validate a set file. A file without a `Set:` line is
/// named after its file stem; blank cards are dropped and at least
/// `min_cards` must remain.
pub fn load_set(path: &Path, min_cards: usize) -> anyhow::Result<FlashcardSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read set file {}", path.display()))?;
    let set =
        parse_set(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    let name = if set.set_name.trim().is_empty() {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".into())
    } else {
        set.set_name
    };
    let drafts = set.cards.into_iter().map(CardDraft::from);
    FlashcardSet::validated(&name, set.difficulty, drafts, min_cards)
        .with_context(|| format!("invalid set {}", path.display()))
}
