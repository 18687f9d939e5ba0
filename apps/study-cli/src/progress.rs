//! Append-only JSON-lines progress store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use study_core::{AnswerEvent, PersistenceError, ProgressSink};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressRecord {
    Answer(AnswerEvent),
    Reset {
        set_name: String,
        at: DateTime<Utc>,
    },
}

impl ProgressRecord {
    fn set_name(&self) -> &str {
        match self {
            Self::Answer(event) => &event.set_name,
            Self::Reset { set_name, .. } => set_name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonlProgressStore {
    path: PathBuf,
}

impl JsonlProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line =
            serde_json::to_string(record).map_err(|e| PersistenceError::Serialize(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// All readable records. A missing file is an empty history; malformed
    /// lines are skipped.
    pub fn records(&self) -> Result<Vec<ProgressRecord>, PersistenceError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(
                    line = idx + 1,
                    error = %err,
                    path = %self.path.display(),
                    "skipping malformed progress record"
                ),
            }
        }
        Ok(records)
    }

    /// Cards of `set_name` whose latest answer left them learned, counted
    /// since the last reset of that set.
    pub fn learned_count(&self, set_name: &str) -> Result<usize, PersistenceError> {
        let mut latest: HashMap<usize, bool> = HashMap::new();
        for record in self.records()? {
            if record.set_name() != set_name {
                continue;
            }
            match record {
                ProgressRecord::Answer(event) => {
                    latest.insert(event.card_index, event.learned);
                }
                ProgressRecord::Reset { .. } => latest.clear(),
            }
        }
        Ok(latest.values().filter(|learned| **learned).count())
    }
}

impl ProgressSink for JsonlProgressStore {
    fn on_answer(&mut self, event: &AnswerEvent) -> Result<(), PersistenceError> {
        self.append(&ProgressRecord::Answer(event.clone()))
    }

    fn on_reset(&mut self, set_name: &str) -> Result<(), PersistenceError> {
        self.append(&ProgressRecord::Reset {
            set_name: set_name.to_string(),
            at: Utc::now(),
        })
    }
}
