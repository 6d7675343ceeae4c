//! Run accounting: counts plus a per-document outcome log.

use crate::document::{DocumentRef, PlacementDecision};
use crate::error::MutateError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// What happened to one document.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Moved (or, in a dry run, would be moved) into its category directory.
    Moved {
        category: String,
        #[serde(serialize_with = "serialize_path_lossy")]
        destination: PathBuf,
        renamed: bool,
    },
    /// The move failed; the document stays where it was.
    Failed { category: String, reason: String },
}

/// Writes a path as a string, replacing bytes that are not UTF-8.
pub(crate) fn serialize_path_lossy<P, S>(path: &P, serializer: S) -> Result<S::Ok, S::Error>
where
    P: AsRef<Path>,
    S: Serializer,
{
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

/// A document paired with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRecord {
    pub document: DocumentRef,
    pub outcome: Outcome,
}

/// A failure that is not tied to a document (directory rename or removal).
#[derive(Debug, Clone, Serialize)]
pub struct DirFailure {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    pub reason: String,
}

/// Aggregated result of a reorganization run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub moved_count: usize,
    pub error_count: usize,
    pub renamed_dir_count: usize,
    pub pruned_dir_count: usize,
    pub root_removed: bool,
    /// Entries left under the source root when it could not be removed.
    pub remaining_entries: Option<usize>,
    pub items: Vec<ItemRecord>,
    pub failures: Vec<DirFailure>,
}

/// Immutable counts extracted from a finished report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub moved: usize,
    pub errors: usize,
    pub renamed_dirs: usize,
    pub pruned_dirs: usize,
    pub root_removed: bool,
}

impl RunReport {
    /// Creates an empty report stamped with the current time.
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            moved_count: 0,
            error_count: 0,
            renamed_dir_count: 0,
            pruned_dir_count: 0,
            root_removed: false,
            remaining_entries: None,
            items: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Records the outcome of one placement.
    pub fn record_move(
        &mut self,
        decision: &PlacementDecision,
        result: Result<PathBuf, MutateError>,
    ) {
        let category = decision.category.key.to_string();
        let outcome = match result {
            Ok(destination) => {
                self.moved_count += 1;
                Outcome::Moved {
                    category,
                    destination,
                    renamed: decision.is_renamed(),
                }
            }
            Err(e) => {
                self.error_count += 1;
                Outcome::Failed {
                    category,
                    reason: e.to_string(),
                }
            }
        };
        self.items.push(ItemRecord {
            document: decision.document.clone(),
            outcome,
        });
    }

    /// Records a successful directory rename.
    pub fn record_rename(&mut self) {
        self.renamed_dir_count += 1;
    }

    /// Records a successful removal of an empty directory.
    pub fn record_pruned(&mut self) {
        self.pruned_dir_count += 1;
    }

    /// Records a directory-level failure.
    pub fn record_failure(&mut self, error: &MutateError) {
        self.error_count += 1;
        self.failures.push(DirFailure {
            path: error.path().to_path_buf(),
            reason: error.to_string(),
        });
    }

    /// Marks the run as complete.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn summary(&self) -> Summary {
        Summary {
            moved: self.moved_count,
            errors: self.error_count,
            renamed_dirs: self.renamed_dir_count,
            pruned_dirs: self.pruned_dir_count,
            root_removed: self.root_removed,
        }
    }

    /// Number of planned or moved documents per category key.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for item in &self.items {
            if let Outcome::Moved { category, .. } = &item.outcome {
                match counts.iter_mut().find(|(key, _)| key == category) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((category.clone(), 1)),
                }
            }
        }
        counts
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryRegistry;
    use std::io;

    fn decision(name: &str, target: &str) -> PlacementDecision {
        PlacementDecision {
            document: DocumentRef {
                source_path: PathBuf::from("docs").join(name),
                relative_dir: String::new(),
                file_name: name.to_string(),
            },
            category: CategoryRegistry::builtin().catch_all(),
            target_file_name: target.to_string(),
        }
    }

    #[test]
    fn test_record_success_and_failure() {
        let mut report = RunReport::new(false);
        report.record_move(&decision("a.md", "a.md"), Ok(PathBuf::from("core/a.md")));
        report.record_move(
            &decision("b.md", "b_1.md"),
            Err(MutateError::FileMoveFailure {
                from: PathBuf::from("docs/b.md"),
                to: PathBuf::from("core/b_1.md"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            }),
        );

        assert_eq!(report.moved_count, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.items.len(), 2);
        assert!(matches!(report.items[1].outcome, Outcome::Failed { .. }));
    }

    #[test]
    fn test_dir_failures_count_as_errors() {
        let mut report = RunReport::new(false);
        report.record_failure(&MutateError::RemoveFailed {
            path: PathBuf::from("docs/x"),
            source: io::Error::other("busy"),
        });
        assert_eq!(report.summary().errors, 1);
        assert_eq!(report.failures[0].path, PathBuf::from("docs/x"));
    }

    #[test]
    fn test_category_counts_in_first_seen_order() {
        let mut report = RunReport::new(true);
        report.record_move(&decision("a.md", "a.md"), Ok(PathBuf::from("x/a.md")));
        report.record_move(&decision("b.md", "b.md"), Ok(PathBuf::from("x/b.md")));
        assert_eq!(report.category_counts(), vec![("REFERENCE".to_string(), 2)]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_json_tolerates_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = PathBuf::from("docs").join(OsStr::from_bytes(b"notes_\xff.md"));
        let mut report = RunReport::new(false);
        let placement = PlacementDecision {
            document: DocumentRef {
                source_path: source.clone(),
                relative_dir: String::new(),
                file_name: "notes_\u{fffd}.md".to_string(),
            },
            category: CategoryRegistry::builtin().catch_all(),
            target_file_name: "notes_\u{fffd}.md".to_string(),
        };
        report.record_move(&placement, Err(MutateError::NonUtf8FileName(source)));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["error_count"], 1);
        assert_eq!(json["items"][0]["document"]["source_path"], "docs/notes_\u{fffd}.md");
        assert_eq!(json["items"][0]["outcome"]["status"], "failed");
    }

    #[test]
    fn test_json_contains_counts_and_status() {
        let mut report = RunReport::new(false);
        report.record_move(&decision("a.md", "a_1.md"), Ok(PathBuf::from("x/a_1.md")));
        report.record_rename();
        report.finish();

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["moved_count"], 1);
        assert_eq!(json["renamed_dir_count"], 1);
        assert_eq!(json["items"][0]["outcome"]["status"], "moved");
        assert_eq!(json["items"][0]["outcome"]["renamed"], true);
        assert!(json["finished_at"].is_string());
    }
}
