//! High-score table persisted as TOML.
//!
//! The file holds the best finished matches, highest first:
//!
//! ```toml
//! [[entries]]
//! score = 4500
//! seed = 12345
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Number of entries kept in the table.
pub const MAX_ENTRIES: usize = 10;

/// Errors that can occur when reading or writing the score table.
#[derive(Debug, thiserror::Error)]
pub enum ScoresError {
    #[error("failed to read scores file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write scores file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// One finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    /// Supply seed the match started from
    #[serde(default)]
    pub seed: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Entries, highest score first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    /// Record a finished match.
    ///
    /// Returns true when the score beats the previous best. Zero scores are
    /// not recorded; ties rank below the earlier entry.
    pub fn record(&mut self, score: u32, seed: u32) -> bool {
        if score == 0 {
            return false;
        }
        let new_best = self.best().map_or(true, |best| score > best);
        let at = self.entries.partition_point(|entry| entry.score >= score);
        if at < MAX_ENTRIES {
            self.entries.insert(at, ScoreEntry { score, seed });
            self.entries.truncate(MAX_ENTRIES);
        }
        new_best
    }

    /// Load the table, starting empty when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, ScoresError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no scores file yet");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ScoresError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut scores: HighScores = toml::from_str(&content)?;
        scores.normalize();
        Ok(scores)
    }

    pub fn save(&self, path: &Path) -> Result<(), ScoresError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ScoresError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Hand-edited files may be unsorted or too long.
    fn normalize(&mut self) {
        self.entries.retain(|entry| entry.score > 0);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table_scores(table: &HighScores) -> Vec<u32> {
        table.entries().iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_record_keeps_highest_first() {
        let mut table = HighScores::default();
        assert_eq!(table.best(), None);

        assert!(table.record(900, 1));
        assert!(!table.record(400, 2));
        assert!(table.record(2500, 3));
        assert!(!table.record(2500, 4));

        assert_eq!(table_scores(&table), vec![2500, 2500, 900, 400]);
        assert_eq!(table.entries()[0].seed, 3);
        assert_eq!(table.entries()[1].seed, 4);
        assert_eq!(table.best(), Some(2500));
    }

    #[test]
    fn test_record_ignores_zero_and_truncates() {
        let mut table = HighScores::default();
        assert!(!table.record(0, 1));
        assert!(table.entries().is_empty());

        for score in 1..=12 {
            table.record(score * 100, score);
        }
        assert_eq!(table.entries().len(), MAX_ENTRIES);
        assert_eq!(table.best(), Some(1200));
        assert_eq!(table.entries().last().unwrap().score, 300);

        // Below the last kept entry: dropped.
        assert!(!table.record(100, 99));
        assert_eq!(table.entries().last().unwrap().score, 300);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = HighScores::load(&dir.path().join("scores.toml")).unwrap();
        assert_eq!(table, HighScores::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.toml");

        let mut table = HighScores::default();
        table.record(1600, 7);
        table.record(900, 8);
        table.save(&path).unwrap();

        let loaded = HighScores::load(&path).unwrap();
        assert_eq!(loaded, table);
        assert_eq!(loaded.best(), Some(1600));
    }

    #[test]
    fn test_load_sorts_hand_edited_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[[entries]]
score = 400

[[entries]]
score = 3600
seed = 5

[[entries]]
score = 0
"#,
        )
        .unwrap();

        let table = HighScores::load(file.path()).unwrap();
        assert_eq!(table_scores(&table), vec![3600, 400]);
        assert_eq!(table.entries()[0].seed, 5);
        assert_eq!(table.entries()[1].seed, 0);
    }

    #[test]
    fn test_bad_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"entries = 3").unwrap();

        let err = HighScores::load(file.path()).unwrap_err();
        assert!(matches!(err, ScoresError::TomlParse(_)));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("scores.toml");

        let err = HighScores::default().save(&path).unwrap_err();
        assert!(matches!(err, ScoresError::FileWrite { .. }));
    }
}
