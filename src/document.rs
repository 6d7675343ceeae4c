//! Document discovery under the source root.

use crate::category::Category;
use crate::config::CompiledFilters;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A document found under the source root at enumeration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    /// Full path of the document before the move.
    #[serde(serialize_with = "crate::report::serialize_path_lossy")]
    pub source_path: PathBuf,
    /// Parent directory relative to the source root; empty for root-level files.
    pub relative_dir: String,
    /// The document's file name.
    pub file_name: String,
}

impl DocumentRef {
    /// Builds a reference from a file path under `source_root`.
    ///
    /// Returns `None` if the path is not under `source_root` or has no
    /// file name.
    pub fn from_path(source_root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(source_root).ok()?;
        let file_name = relative.file_name()?.to_string_lossy().into_owned();
        let relative_dir = relative
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        Some(Self {
            source_path: path.to_path_buf(),
            relative_dir,
            file_name,
        })
    }

    /// Path relative to the source root.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.relative_dir).join(&self.file_name)
    }
}

/// Where a document goes: its category and the collision-free file name.
#[derive(Debug, Clone)]
pub struct PlacementDecision {
    pub document: DocumentRef,
    pub category: Category,
    /// Differs from `document.file_name` only when the name was taken.
    pub target_file_name: String,
}

impl PlacementDecision {
    /// True if the collision resolver had to pick a new name.
    pub fn is_renamed(&self) -> bool {
        self.target_file_name != self.document.file_name
    }
}

/// Enumerates every document under `source_root`, depth-first, with
/// entries sorted by file name so runs are reproducible.
///
/// Hidden directories are skipped unless the filters allow hidden files.
/// Entries that cannot be read are skipped.
///
/// # Errors
///
/// Returns the underlying IO error if `source_root` itself cannot be read.
pub fn discover_documents(
    source_root: &Path,
    filters: &CompiledFilters,
) -> std::io::Result<Vec<DocumentRef>> {
    std::fs::read_dir(source_root)?;

    let allow_hidden = filters.allows_hidden();
    let documents = WalkDir::new(source_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            allow_hidden
                || !entry.file_type().is_dir()
                || !entry.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| DocumentRef::from_path(source_root, entry.path()))
        .filter(|doc| filters.should_include(&doc.relative_path()))
        .collect();

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterRules;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# doc").unwrap();
    }

    #[test]
    fn test_document_ref_from_root_file() {
        let doc = DocumentRef::from_path(Path::new("/w/docs"), Path::new("/w/docs/a.md")).unwrap();
        assert_eq!(doc.relative_dir, "");
        assert_eq!(doc.file_name, "a.md");
        assert_eq!(doc.relative_path(), PathBuf::from("a.md"));
    }

    #[test]
    fn test_document_ref_from_nested_file() {
        let doc =
            DocumentRef::from_path(Path::new("/w/docs"), Path::new("/w/docs/api/v2/b.md")).unwrap();
        assert_eq!(doc.relative_dir, Path::new("api").join("v2").to_string_lossy());
        assert_eq!(doc.file_name, "b.md");
    }

    #[test]
    fn test_document_ref_outside_root() {
        assert!(DocumentRef::from_path(Path::new("/w/docs"), Path::new("/w/other/a.md")).is_none());
    }

    #[test]
    fn test_discover_sorted_and_recursive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "zeta.md");
        touch(temp.path(), "alpha.md");
        touch(temp.path(), "api/endpoints.md");

        let filters = FilterRules::default().compile().unwrap();
        let docs = discover_documents(temp.path(), &filters).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.file_name.as_str()).collect();

        assert_eq!(names, vec!["alpha.md", "endpoints.md", "zeta.md"]);
        assert_eq!(docs[1].relative_dir, "api");
    }

    #[test]
    fn test_discover_skips_hidden() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "guide.md");
        touch(temp.path(), ".DS_Store");
        touch(temp.path(), ".git/config");

        let filters = FilterRules::default().compile().unwrap();
        let docs = discover_documents(temp.path(), &filters).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file_name, "guide.md");
    }

    #[test]
    fn test_discover_hidden_when_enabled() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".hidden/notes.md");

        let filters = FilterRules {
            enable_hidden_files: true,
            ..Default::default()
        }
        .compile()
        .unwrap();
        let docs = discover_documents(temp.path(), &filters).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].relative_dir, ".hidden");
    }

    #[test]
    fn test_discover_missing_root_errors() {
        let temp = TempDir::new().unwrap();
        let filters = FilterRules::default().compile().unwrap();
        assert!(discover_documents(&temp.path().join("missing"), &filters).is_err());
    }
}
