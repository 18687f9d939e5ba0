//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;
use study_core::{ResetBehavior, SetSettings, StudyMode, StudySettings};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no set file given (pass a path or set STUDY_SET)")]
    MissingSetPath,

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration for a study run.
#[derive(Debug, Clone)]
pub struct Config {
    pub set_path: PathBuf,
    pub mode: StudyMode,
    pub settings: StudySettings,
    pub progress_file: Option<PathBuf>,
    pub seed: Option<u64>,
    /// Pause after a correct multiple-choice answer before the next question.
    /// Zero waits for Enter instead.
    pub advance_delay: Duration,
}

impl Config {
    /// Load from the process environment. `.env` is read by the caller.
    pub fn from_env(set_arg: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(set_arg, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        set_arg: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let set_path = set_arg
            .or_else(|| lookup("STUDY_SET"))
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingSetPath)?;

        let mode = match lookup("STUDY_MODE") {
            Some(value) => StudyMode::from_str(value.trim()).ok_or(ConfigError::Invalid {
                key: "STUDY_MODE",
                value,
            })?,
            None => StudyMode::default(),
        };

        let mut overrides = SetSettings::new(set_path.display().to_string());
        overrides.flip_threshold = parse_var(&lookup, "STUDY_FLIP_THRESHOLD")?;
        overrides.choice_threshold = parse_var(&lookup, "STUDY_CHOICE_THRESHOLD")?;
        overrides.distractor_count = parse_var(&lookup, "STUDY_DISTRACTORS")?;
        overrides.flip_reset = match lookup("STUDY_FLIP_RESET") {
            Some(value) => Some(ResetBehavior::from_str(value.trim()).ok_or(
                ConfigError::Invalid {
                    key: "STUDY_FLIP_RESET",
                    value,
                },
            )?),
            None => None,
        };
        let settings = StudySettings::default().merge(Some(&overrides));

        let progress_file = lookup("STUDY_PROGRESS_FILE")
            .map(PathBuf::from)
            .or_else(default_progress_file);

        let seed = parse_var(&lookup, "STUDY_SEED")?;
        let delay_ms: u64 = parse_var(&lookup, "STUDY_ADVANCE_DELAY_MS")?.unwrap_or(0);

        Ok(Self {
            set_path,
            mode,
            settings,
            progress_file,
            seed,
            advance_delay: Duration::from_millis(delay_ms),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(None),
    }
}

fn default_progress_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("study-cards").join("progress.jsonl"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use study_core::MasteryPolicy;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_set_argument() {
        let config = Config::from_lookup(
            Some("sets/chem.txt".into()),
            lookup(&[("STUDY_PROGRESS_FILE", "/tmp/p.jsonl")]),
        )
        .unwrap();
        assert_eq!(config.set_path, PathBuf::from("sets/chem.txt"));
        assert_eq!(config.mode, StudyMode::Flip);
        assert_eq!(config.settings, StudySettings::default());
        assert_eq!(config.progress_file, Some(PathBuf::from("/tmp/p.jsonl")));
        assert_eq!(config.seed, None);
        assert_eq!(config.advance_delay, Duration::ZERO);
    }

    #[test]
    fn env_overrides_policy() {
        let config = Config::from_lookup(
            None,
            lookup(&[
                ("STUDY_SET", "chem.txt"),
                ("STUDY_MODE", "choice"),
                ("STUDY_FLIP_THRESHOLD", "3"),
                ("STUDY_FLIP_RESET", "hard_reset"),
                ("STUDY_DISTRACTORS", "2"),
                ("STUDY_SEED", "42"),
                ("STUDY_ADVANCE_DELAY_MS", "800"),
            ]),
        )
        .unwrap();
        assert_eq!(config.mode, StudyMode::Choice);
        assert_eq!(config.settings.flip_policy, MasteryPolicy::hard_reset(3));
        assert_eq!(config.settings.distractor_count, 2);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.advance_delay, Duration::from_millis(800));
    }

    #[test]
    fn missing_set_path_is_an_error() {
        let result = Config::from_lookup(None, lookup(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingSetPath);
    }

    #[test]
    fn bad_values_are_reported() {
        let result = Config::from_lookup(
            Some("a.txt".into()),
            lookup(&[("STUDY_FLIP_THRESHOLD", "many")]),
        );
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                key: "STUDY_FLIP_THRESHOLD",
                value: "many".into()
            }
        );

        let result = Config::from_lookup(Some("a.txt".into()), lookup(&[("STUDY_MODE", "exam")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "STUDY_MODE",
                ..
            })
        ));
    }
}
