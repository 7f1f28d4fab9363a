use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::LEADERBOARD_MAX_ENTRIES;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "fullName", alias = "full_name")]
    pub full_name: String,
    pub score: i32,
}

/// Snapshot handed to the win screen and the simulation binary.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    pub generated_at_iso: String,
    pub entries: Vec<ScoreEntry>,
}

/// Local top-5 score file. Any read or write problem degrades to an empty or
/// unsaved list with a stderr note; the game never fails over the leaderboard.
pub struct Leaderboard {
    file_path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new(file_path: PathBuf) -> Self {
        let entries = load_entries(&file_path);
        Self { file_path, entries }
    }

    /// Inserts a finished run and persists. Ties keep insertion order, so an
    /// equal new score lands below the ones already present.
    pub fn record_score(&mut self, full_name: &str, score: i32) {
        let name = full_name.trim();
        if name.is_empty() {
            eprintln!("[leaderboard] skipping entry with empty name");
            return;
        }
        self.entries.push(ScoreEntry {
            full_name: name.to_string(),
            score,
        });
        canonicalize(&mut self.entries);
        self.save();
    }

    pub fn high_scores(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn build_view(&self) -> LeaderboardView {
        LeaderboardView {
            generated_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            entries: self.entries.clone(),
        }
    }

    fn save(&self) {
        if let Some(parent) = self.file_path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                eprintln!(
                    "[leaderboard] failed to create parent dir {}: {error}",
                    parent.display()
                );
                return;
            }
        }

        match serde_json::to_string_pretty(&self.entries) {
            Ok(text) => {
                if let Err(error) = fs::write(&self.file_path, text) {
                    eprintln!(
                        "[leaderboard] failed to write {}: {error}",
                        self.file_path.display()
                    );
                }
            }
            Err(error) => {
                eprintln!(
                    "[leaderboard] failed to serialize scores for {}: {error}",
                    self.file_path.display()
                );
            }
        }
    }
}

/// Descending by score, stable for ties, never more than five entries.
fn canonicalize(entries: &mut Vec<ScoreEntry>) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(LEADERBOARD_MAX_ENTRIES);
}

fn load_entries(path: &Path) -> Vec<ScoreEntry> {
    let text = match fs::read_to_string(path) {
        Ok(value) => value,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                eprintln!("[leaderboard] failed to read {}: {error}", path.display());
            }
            return Vec::new();
        }
    };

    let raw: Vec<serde_json::Value> = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(error) => {
            eprintln!("[leaderboard] failed to parse {}: {error}", path.display());
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for value in raw {
        let entry: ScoreEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(error) => {
                eprintln!(
                    "[leaderboard] skipping malformed entry in {}: {error}",
                    path.display()
                );
                continue;
            }
        };
        if entry.full_name.trim().is_empty() {
            continue;
        }
        entries.push(entry);
    }
    canonicalize(&mut entries);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let unique = format!(
            "{}-{}-{}",
            name,
            std::process::id(),
            rand::random::<u32>()
        );
        std::env::temp_dir().join(unique).join("leaderboard.json")
    }

    fn cleanup(path: &Path) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn keeps_top_five_sorted_descending() {
        let path = temp_file("leaderboard-top5");
        let mut board = Leaderboard::new(path.clone());
        for (name, score) in [
            ("Ana", 120),
            ("Ben", 40),
            ("Cleo", 200),
            ("Dai", 90),
            ("Eve", 150),
            ("Finn", 60),
        ] {
            board.record_score(name, score);
        }

        let scores: Vec<i32> = board.high_scores().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![200, 150, 120, 90, 60]);

        cleanup(&path);
    }

    #[test]
    fn score_below_a_full_board_leaves_it_unchanged() {
        let path = temp_file("leaderboard-below-min");
        let mut board = Leaderboard::new(path.clone());
        for (name, score) in [
            ("Ana", 120),
            ("Ben", 110),
            ("Cleo", 100),
            ("Dai", 90),
            ("Eve", 80),
        ] {
            board.record_score(name, score);
        }

        board.record_score("Finn", 10);

        let scores: Vec<i32> = board.high_scores().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![120, 110, 100, 90, 80]);
        assert!(board.high_scores().iter().all(|e| e.full_name != "Finn"));

        cleanup(&path);
    }

    #[test]
    fn equal_scores_keep_arrival_order() {
        let path = temp_file("leaderboard-ties");
        let mut board = Leaderboard::new(path.clone());
        board.record_score("First", 100);
        board.record_score("Second", 100);

        let names: Vec<&str> = board
            .high_scores()
            .iter()
            .map(|e| e.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);

        cleanup(&path);
    }

    #[test]
    fn missing_file_starts_empty() {
        let path = temp_file("leaderboard-missing");
        let board = Leaderboard::new(path.clone());
        assert!(board.high_scores().is_empty());
        cleanup(&path);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let path = temp_file("leaderboard-corrupt");
        let parent = path.parent().expect("parent exists").to_path_buf();
        fs::create_dir_all(&parent).expect("create dir");
        fs::write(&path, "{not json").expect("write file");

        let board = Leaderboard::new(path.clone());
        assert!(board.high_scores().is_empty());

        cleanup(&path);
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let path = temp_file("leaderboard-partial");
        let parent = path.parent().expect("parent exists").to_path_buf();
        fs::create_dir_all(&parent).expect("create dir");
        let raw = r#"[
  { "fullName": "Ana", "score": 120 },
  { "fullName": 7 },
  { "fullName": "Ben", "score": 40 }
]"#;
        fs::write(&path, raw).expect("write file");

        let board = Leaderboard::new(path.clone());
        let names: Vec<&str> = board
            .high_scores()
            .iter()
            .map(|e| e.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana", "Ben"]);

        cleanup(&path);
    }

    #[test]
    fn scores_survive_a_reload() {
        let path = temp_file("leaderboard-reload");
        {
            let mut board = Leaderboard::new(path.clone());
            board.record_score("Ana", 75);
            board.record_score("Ben", -10);
        }

        let board = Leaderboard::new(path.clone());
        assert_eq!(
            board.high_scores(),
            &[
                ScoreEntry {
                    full_name: "Ana".to_string(),
                    score: 75
                },
                ScoreEntry {
                    full_name: "Ben".to_string(),
                    score: -10
                },
            ]
        );

        cleanup(&path);
    }

    #[test]
    fn empty_names_are_rejected() {
        let path = temp_file("leaderboard-empty-name");
        let mut board = Leaderboard::new(path.clone());
        board.record_score("   ", 50);
        assert!(board.high_scores().is_empty());
        cleanup(&path);
    }

    #[test]
    fn view_carries_a_timestamp() {
        let path = temp_file("leaderboard-view");
        let mut board = Leaderboard::new(path.clone());
        board.record_score("Ana", 10);
        let view = board.build_view();
        assert_eq!(view.entries.len(), 1);
        assert!(!view.generated_at_iso.is_empty());
        cleanup(&path);
    }
}
