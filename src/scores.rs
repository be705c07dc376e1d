//! Append-only leaderboard persistence.
//!
//! Scores live in a plain text log, one `"<timestamp> | <score>"` record per
//! line, re-read and re-ranked in full whenever they are displayed. All I/O
//! is best-effort: a missing or unreadable file reads back as an empty
//! leaderboard, and failed writes are dropped silently.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "vsnake";
const SCORE_FILENAME: &str = "snake_scores.txt";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub timestamp: String,
    pub score: u32,
}

pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    /// Score file under the platform data directory, e.g.
    /// `~/.local/share/vsnake/snake_scores.txt`, with the current directory
    /// as a last resort.
    pub fn open_default() -> Self {
        let dir = dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: dir.join(SCORE_FILENAME),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one record, stamped with the current local time.
    pub fn append(&self, score: u32) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{} | {}",
            Local::now().format(TIMESTAMP_FORMAT),
            score
        )
    }

    /// All recorded scores, best first. Malformed lines are skipped.
    pub fn load(&self) -> Vec<ScoreEntry> {
        let contents = fs::read_to_string(&self.path).unwrap_or_default();
        let mut entries: Vec<ScoreEntry> = contents.lines().filter_map(parse_entry).collect();
        rank(&mut entries);
        entries
    }
}

fn parse_entry(line: &str) -> Option<ScoreEntry> {
    let (timestamp, score) = line.split_once(" | ")?;
    Some(ScoreEntry {
        timestamp: timestamp.to_string(),
        score: score.trim().parse().ok()?,
    })
}

/// Descending by score; ties broken by descending timestamp string, so the
/// most recent of equal scores ranks first.
fn rank(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
}
