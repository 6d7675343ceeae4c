//! Collision-free file name selection.

use std::fs;
use std::path::Path;

/// Returns a file name that does not exist in `target_dir`.
///
/// If `desired` is free it is returned unchanged. Otherwise `stem_1.ext`,
/// `stem_2.ext`, ... are probed in order and the first free one is returned.
/// Existence is checked on every probe, so suffixes left by an earlier run
/// are skipped rather than reused. Dangling symlinks count as taken.
///
/// # Examples
///
/// ```no_run
/// use doctidy::resolver::resolve_name;
/// use std::path::Path;
///
/// let name = resolve_name(Path::new("/srv/docs/╚═══ REFERENCE ═══╝"), "report.md");
/// println!("moving to {}", name);
/// ```
pub fn resolve_name(target_dir: &Path, desired: &str) -> String {
    resolve_name_with(desired, |candidate| {
        fs::symlink_metadata(target_dir.join(candidate)).is_ok()
    })
}

/// Same as [`resolve_name`] with an arbitrary "is this name taken" predicate.
pub fn resolve_name_with<F>(desired: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !is_taken(desired) {
        return desired.to_string();
    }

    let (stem, extension) = split_name(desired);
    let mut counter: u64 = 1;
    loop {
        let candidate = match extension {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Splits a file name at its last dot. A leading or trailing dot is part of
/// the stem.
fn split_name(name: &str) -> (&str, Option<&str>) {
    let path = Path::new(name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) {
        (Some(stem), Some(ext)) if !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_free_name_unchanged() {
        let temp = TempDir::new().unwrap();
        assert_eq!(resolve_name(temp.path(), "report.md"), "report.md");
    }

    #[test]
    fn test_collision_suffixes_are_monotonic() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("report.md"), "a").unwrap();

        let first = resolve_name(temp.path(), "report.md");
        assert_eq!(first, "report_1.md");
        fs::write(temp.path().join(&first), "b").unwrap();

        let second = resolve_name(temp.path(), "report.md");
        assert_eq!(second, "report_2.md");
    }

    #[test]
    fn test_gaps_from_previous_runs_are_reused_in_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.md"), "").unwrap();
        fs::write(temp.path().join("notes_2.md"), "").unwrap();

        assert_eq!(resolve_name(temp.path(), "notes.md"), "notes_1.md");
    }

    #[test]
    fn test_existing_suffixes_are_skipped() {
        let temp = TempDir::new().unwrap();
        for name in ["notes.md", "notes_1.md", "notes_2.md"] {
            fs::write(temp.path().join(name), "").unwrap();
        }
        assert_eq!(resolve_name(temp.path(), "notes.md"), "notes_3.md");
    }

    #[test]
    fn test_directory_counts_as_taken() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("guide.md")).unwrap();
        assert_eq!(resolve_name(temp.path(), "guide.md"), "guide_1.md");
    }

    #[test]
    fn test_name_splitting() {
        let taken = |n: &str| n == "archive.tar.gz" || n == "README" || n == ".env";
        assert_eq!(resolve_name_with("archive.tar.gz", taken), "archive.tar_1.gz");
        assert_eq!(resolve_name_with("README", taken), "README_1");
        assert_eq!(resolve_name_with(".env", taken), ".env_1");
    }

    #[test]
    fn test_trailing_dot_stays_in_stem() {
        let taken = |n: &str| n == "report.";
        assert_eq!(resolve_name_with("report.", taken), "report._1");
    }

    #[test]
    fn test_predicate_variant() {
        let taken: HashSet<&str> = ["a.md", "a_1.md"].into_iter().collect();
        assert_eq!(resolve_name_with("a.md", |n| taken.contains(n)), "a_2.md");
        assert_eq!(resolve_name_with("b.md", |n| taken.contains(n)), "b.md");
    }
}
