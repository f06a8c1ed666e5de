use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::round::QuizMode;
use crate::session::{
    QuizConfig, DEFAULT_MAX_FRET, DEFAULT_TOTAL_QUESTIONS, DEFAULT_WAIT_TIME_SECS,
};

/// Launch preferences remembered between runs. Session results are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: QuizMode,
    pub number_of_questions: usize,
    pub wait_time_secs: u64,
    pub max_fret: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: QuizMode::FindAll,
            number_of_questions: DEFAULT_TOTAL_QUESTIONS,
            wait_time_secs: DEFAULT_WAIT_TIME_SECS,
            max_fret: DEFAULT_MAX_FRET,
        }
    }
}

impl Config {
    pub fn to_quiz_config(&self) -> QuizConfig {
        QuizConfig::new(self.mode, self.number_of_questions, self.max_fret)
            .with_wait_time(self.wait_time_secs)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("fretquiz_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring unreadable config {}: {}", self.path.display(), e),
            },
            Err(e) => log::debug!("no config at {}: {}", self.path.display(), e),
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn test_save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            mode: QuizMode::Guess,
            number_of_questions: 20,
            wait_time_secs: 30,
            max_fret: 12,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn test_missing_or_corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "mode": "guess" }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.mode, QuizMode::Guess);
        assert_eq!(cfg.number_of_questions, DEFAULT_TOTAL_QUESTIONS);
    }

    #[test]
    fn test_converts_to_quiz_config() {
        let cfg = Config {
            mode: QuizMode::FindAll,
            number_of_questions: 5,
            wait_time_secs: 15,
            max_fret: 12,
        };
        let quiz = cfg.to_quiz_config();
        assert_eq!(quiz.total_questions, 5);
        assert_eq!(quiz.wait_time_secs, Some(15));
        assert_eq!(quiz.max_fret, 12);
        assert!(quiz.validate().is_ok());
    }
}
