//! High score ledger
//!
//! Persisted as plain text, one `name,score` pair per line, best first.
//! Only the top 10 are ever written back.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Maximum number of high scores kept on disk
pub const MAX_HIGH_SCORES: usize = 10;

/// Name used for the seeded entries
pub const DEFAULT_NAME: &str = "AAA";

/// Characters offered during name entry
pub const NAME_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Letters in an entry's name
pub const NAME_LENGTH: usize = 3;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("score file io: {0}")]
    Io(#[from] io::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Parse a `name,score` line
    pub fn parse(line: &str) -> Option<Self> {
        let (name, score) = line.split_once(',')?;
        let score = score.trim().parse().ok()?;
        Some(Self::new(name.trim(), score))
    }
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.name, self.score)
    }
}

/// One line of the rendered leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub name: String,
    /// Score zero-padded to eight digits
    pub score: String,
}

/// The ten seeded entries: AAA with 1000 down to 100
pub fn default_entries() -> Vec<ScoreEntry> {
    (1..=MAX_HIGH_SCORES as u64)
        .rev()
        .map(|i| ScoreEntry::new(DEFAULT_NAME, i * 100))
        .collect()
}

/// Ranked score list bound to its file
#[derive(Debug, Clone)]
pub struct ScoreLedger {
    entries: Vec<ScoreEntry>,
    path: PathBuf,
}

impl ScoreLedger {
    /// Default entries, not yet read from or written to `path`
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self {
            entries: default_entries(),
            path: path.into(),
        }
    }

    /// Read the ledger from `path`.
    ///
    /// A missing file is a first run: the file is created and seeded with
    /// the default entries. Malformed lines are skipped.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();

        if !path.exists() {
            log::info!("No score file at {}, seeding defaults", path.display());
            fs::write(&path, ScoreEntry::new(DEFAULT_NAME, 0).to_string())?;
            let mut ledger = Self::with_defaults(path);
            ledger.reset()?;
            return Ok(ledger);
        }

        let text = fs::read_to_string(&path)?;
        let mut entries = Vec::new();
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match ScoreEntry::parse(line) {
                Some(entry) => entries.push(entry),
                None => log::warn!(
                    "Skipping malformed score line {} in {}: {:?}",
                    number + 1,
                    path.display(),
                    line
                ),
            }
        }
        log::info!("Loaded {} high scores", entries.len());
        Ok(Self { entries, path })
    }

    /// Rewrite the file with the top entries, then drop the rest from memory
    pub fn save(&mut self) -> Result<(), LedgerError> {
        let text = self
            .entries
            .iter()
            .take(MAX_HIGH_SCORES)
            .map(ScoreEntry::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&self.path, text)?;
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Restore the default entries and save
    pub fn reset(&mut self) -> Result<(), LedgerError> {
        self.entries = default_entries();
        self.save()
    }

    /// Where `score` would be inserted: before the first entry it beats
    pub fn insertion_point(&self, score: u64) -> Option<usize> {
        self.entries.iter().position(|e| score > e.score)
    }

    /// True if `score` beats any entry
    pub fn is_high_score(&self, score: u64) -> bool {
        self.insertion_point(score).is_some()
    }

    /// Insert keeping the list in descending order; ties go after existing
    /// entries. Returns the index used. The list is not truncated.
    pub fn insert(&mut self, name: impl Into<String>, score: u64) -> usize {
        let entry = ScoreEntry::new(name, score);
        match self.insertion_point(score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Top entries as display rows
    pub fn leaderboard_rows(&self) -> Vec<LeaderboardRow> {
        self.entries
            .iter()
            .take(MAX_HIGH_SCORES)
            .map(|e| LeaderboardRow {
                name: e.name.clone(),
                score: format!("{:08}", e.score),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn temp_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("scores.txt")
    }

    #[test]
    fn test_defaults() {
        let ledger = ScoreLedger::with_defaults("unused.txt");
        let scores: Vec<u64> = ledger.entries().iter().map(|e| e.score).collect();
        assert_eq!(
            scores,
            vec![1000, 900, 800, 700, 600, 500, 400, 300, 200, 100]
        );
        assert!(ledger.entries().iter().all(|e| e.name == "AAA"));
        assert!(!ledger.is_high_score(0));
        assert!(!ledger.is_high_score(100));
        assert!(ledger.is_high_score(101));
    }

    #[test]
    fn test_missing_file_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);

        let ledger = ScoreLedger::load(&path).unwrap();

        assert_eq!(ledger.entries(), default_entries().as_slice());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("AAA,1000\nAAA,900"));
        assert!(text.ends_with("AAA,100"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_insert_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        let mut ledger = ScoreLedger::load(&path).unwrap();

        assert!(ledger.is_high_score(150));
        assert_eq!(ledger.insert("BOB", 150), 9);
        assert_eq!(ledger.entries().len(), 11);
        assert_eq!(ledger.entries()[9], ScoreEntry::new("BOB", 150));
        assert_eq!(ledger.entries()[10], ScoreEntry::new("AAA", 100));

        ledger.save().unwrap();
        let reloaded = ScoreLedger::load(&path).unwrap();
        assert_eq!(reloaded.entries().len(), MAX_HIGH_SCORES);
        assert_eq!(reloaded.entries().last(), Some(&ScoreEntry::new("BOB", 150)));
    }

    #[test]
    fn test_saved_ledger_decides_next_high_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        let mut ledger = ScoreLedger::load(&path).unwrap();

        ledger.insert("BOB", 150);
        ledger.save().unwrap();
        assert_eq!(ledger.entries().len(), MAX_HIGH_SCORES);

        // AAA,100 fell off the board with the save; BOB now holds tenth place
        assert!(!ledger.is_high_score(120));
        assert!(ledger.is_high_score(160));
        assert_eq!(ledger.insert("CAT", 160), 9);
        ledger.save().unwrap();

        let reloaded = ScoreLedger::load(&path).unwrap();
        assert_eq!(reloaded.entries().len(), MAX_HIGH_SCORES);
        assert_eq!(reloaded.entries().last(), Some(&ScoreEntry::new("CAT", 160)));
        assert!(reloaded.leaderboard_rows().iter().any(|r| r.name == "CAT"));
        assert!(!ledger.entries().iter().any(|e| e.name == "BOB"));
    }

    #[test]
    fn test_ties_insert_after_existing() {
        let mut ledger = ScoreLedger::with_defaults("unused.txt");
        assert_eq!(ledger.insertion_point(500), Some(6));
        assert_eq!(ledger.insert("ZED", 500), 6);
        assert_eq!(ledger.entries()[5], ScoreEntry::new("AAA", 500));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        fs::write(&path, "ABC,300\nnot a score\nXYZ,abc\n\nDEF,200\n").unwrap();

        let ledger = ScoreLedger::load(&path).unwrap();
        assert_eq!(
            ledger.entries(),
            &[ScoreEntry::new("ABC", 300), ScoreEntry::new("DEF", 200)]
        );
    }

    #[test]
    fn test_reset_restores_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        let mut ledger = ScoreLedger::load(&path).unwrap();
        ledger.insert("BOB", 5000);
        ledger.save().unwrap();

        ledger.reset().unwrap();
        assert_eq!(ledger.top_score(), Some(1000));
        let reloaded = ScoreLedger::load(&path).unwrap();
        assert_eq!(reloaded.entries(), default_entries().as_slice());
    }

    #[test]
    fn test_leaderboard_rows() {
        let mut ledger = ScoreLedger::with_defaults("unused.txt");
        ledger.insert("BOB", 123_456);
        let rows = ledger.leaderboard_rows();
        assert_eq!(rows.len(), MAX_HIGH_SCORES);
        assert_eq!(rows[0].name, "BOB");
        assert_eq!(rows[0].score, "00123456");
        assert_eq!(rows[9].score, "00000200");
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(ScoreEntry::parse("BOB,42"), Some(ScoreEntry::new("BOB", 42)));
        assert_eq!(ScoreEntry::parse("BOB"), None);
        assert_eq!(ScoreEntry::parse("BOB,-1"), None);
    }

    proptest! {
        #[test]
        fn prop_save_load_keeps_top_ten(
            inserts in prop::collection::vec(("[A-Z0-9]{3}", 0u64..5000), 0..20)
        ) {
            let dir = tempfile::tempdir().unwrap();
            let path = temp_path(&dir);
            let mut ledger = ScoreLedger::with_defaults(&path);
            for (name, score) in &inserts {
                ledger.insert(name.clone(), *score);
            }
            ledger.save().unwrap();

            let reloaded = ScoreLedger::load(&path).unwrap();
            let expected: Vec<ScoreEntry> =
                ledger.entries().iter().take(MAX_HIGH_SCORES).cloned().collect();
            prop_assert_eq!(reloaded.entries(), expected.as_slice());
        }

        #[test]
        fn prop_entries_stay_descending(scores in prop::collection::vec(0u64..5000, 0..30)) {
            let mut ledger = ScoreLedger::with_defaults("unused.txt");
            for score in scores {
                ledger.insert("BOB", score);
            }
            let entries = ledger.entries();
            prop_assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
        }

        #[test]
        fn prop_high_score_iff_beats_an_entry(score in 0u64..2000) {
            let ledger = ScoreLedger::with_defaults("unused.txt");
            let beats = ledger.entries().iter().any(|e| score > e.score);
            prop_assert_eq!(ledger.is_high_score(score), beats);
        }
    }
}
