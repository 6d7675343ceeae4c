//! Filesystem effects of a reorganization run.
//!
//! This module renames the container and its category directories, moves
//! documents into their category directories and prunes the directories
//! left empty in the source tree. Every operation is safe to repeat: work
//! that is already done is reported as such rather than failing.

use crate::category::{Category, CategoryRegistry, decorate_container};
use crate::document::PlacementDecision;
use crate::error::{MutateError, MutateResult, ReorgError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of renaming one directory to its decorated name.
#[derive(Debug)]
pub enum RenameStatus {
    /// The legacy directory was renamed.
    Renamed,
    /// Only the decorated directory exists.
    AlreadyDone,
    /// Both exist; the legacy directory was left alone.
    TargetExists,
    /// Neither exists.
    Missing,
    /// The rename was attempted and failed.
    Failed(MutateError),
}

/// The container directory to use for the rest of the run.
#[derive(Debug)]
pub struct ContainerRename {
    pub path: PathBuf,
    pub status: RenameStatus,
}

/// Outcome of removing the source root at the end of a run.
#[derive(Debug)]
pub enum RootStatus {
    Removed,
    /// The root still holds this many entries (counted recursively).
    NotEmpty(usize),
    Missing,
    Failed(MutateError),
}

/// Directories removed and failures encountered while pruning.
#[derive(Debug, Default)]
pub struct PruneOutcome {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<MutateError>,
}

/// Performs the tree mutations for the categories of a registry.
pub struct TreeMutator<'a> {
    registry: &'a CategoryRegistry,
}

impl<'a> TreeMutator<'a> {
    pub fn new(registry: &'a CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Renames `parent/legacy_name` to its decorated form.
    ///
    /// # Errors
    ///
    /// Returns `ReorgError::ContainerMissing` when neither the legacy nor
    /// the decorated directory exists. A failed rename is not an error: the
    /// legacy directory is returned as the container together with the
    /// failure.
    pub fn rename_container(
        &self,
        parent: &Path,
        legacy_name: &str,
    ) -> Result<ContainerRename, ReorgError> {
        let legacy = parent.join(legacy_name);
        let decorated = parent.join(decorate_container(legacy_name));

        match (legacy.is_dir(), decorated.is_dir()) {
            (true, true) => Ok(ContainerRename {
                path: decorated,
                status: RenameStatus::TargetExists,
            }),
            (true, false) => match rename_dir(&legacy, &decorated) {
                Ok(()) => Ok(ContainerRename {
                    path: decorated,
                    status: RenameStatus::Renamed,
                }),
                Err(e) => Ok(ContainerRename {
                    path: legacy,
                    status: RenameStatus::Failed(e),
                }),
            },
            (false, true) => Ok(ContainerRename {
                path: decorated,
                status: RenameStatus::AlreadyDone,
            }),
            (false, false) => Err(ReorgError::ContainerMissing { legacy, decorated }),
        }
    }

    /// Renames every legacy category directory under `container` to its
    /// decorated name, in category order.
    pub fn rename_category_dirs(&self, container: &Path) -> Vec<(Category, RenameStatus)> {
        self.registry
            .all()
            .iter()
            .map(|category| {
                let legacy = container.join(category.legacy_name);
                let decorated = container.join(category.display_name);
                let status = match (legacy.is_dir(), decorated.is_dir()) {
                    (true, true) => RenameStatus::TargetExists,
                    (true, false) => match rename_dir(&legacy, &decorated) {
                        Ok(()) => RenameStatus::Renamed,
                        Err(e) => RenameStatus::Failed(e),
                    },
                    (false, true) => RenameStatus::AlreadyDone,
                    (false, false) => RenameStatus::Missing,
                };
                (*category, status)
            })
            .collect()
    }

    /// Moves a document into its category directory under `container`.
    ///
    /// The category directory is created if needed. An existing file at the
    /// destination is never overwritten. Documents whose name is not valid
    /// UTF-8 are left in place.
    ///
    /// # Returns
    ///
    /// The destination path on success.
    pub fn move_document(
        &self,
        container: &Path,
        decision: &PlacementDecision,
    ) -> MutateResult<PathBuf> {
        let source = &decision.document.source_path;
        check_file_name(source)?;

        let category_path = container.join(decision.category.display_name);
        fs::create_dir_all(&category_path).map_err(|e| MutateError::DirectoryCreationFailed {
            path: category_path.clone(),
            source: e,
        })?;

        let destination = category_path.join(&decision.target_file_name);
        if fs::symlink_metadata(&destination).is_ok() {
            return Err(MutateError::FileMoveFailure {
                from: source.clone(),
                to: destination,
                source: io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
            });
        }

        move_file(source, &destination).map_err(|e| MutateError::FileMoveFailure {
            from: source.clone(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(destination)
    }

    /// Removes every empty directory below `root`, deepest first.
    ///
    /// A directory is removed once all of its subdirectories have been
    /// processed and nothing is left in it. `root` itself is not removed;
    /// see [`TreeMutator::remove_root_if_empty`].
    pub fn prune_empty_dirs(&self, root: &Path) -> PruneOutcome {
        let mut outcome = PruneOutcome::default();
        if root.is_dir() {
            prune_children(root, &mut outcome);
        }
        outcome
    }

    /// Removes `root` if it is empty, otherwise reports how many entries
    /// remain beneath it.
    pub fn remove_root_if_empty(&self, root: &Path) -> RootStatus {
        if !root.is_dir() {
            return RootStatus::Missing;
        }

        let remaining = WalkDir::new(root).min_depth(1).into_iter().count();
        if remaining > 0 {
            return RootStatus::NotEmpty(remaining);
        }

        match fs::remove_dir(root) {
            Ok(()) => RootStatus::Removed,
            Err(e) => RootStatus::Failed(MutateError::RemoveFailed {
                path: root.to_path_buf(),
                source: e,
            }),
        }
    }
}

fn rename_dir(from: &Path, to: &Path) -> MutateResult<()> {
    fs::rename(from, to).map_err(|e| MutateError::RenameFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}

/// Fails unless `source` has a UTF-8 file name.
///
/// Destinations are built from the decoded name, so a name that only
/// survives lossy decoding would be silently changed by the move.
pub fn check_file_name(source: &Path) -> MutateResult<()> {
    match source.file_name() {
        None => Err(MutateError::MissingFileName(source.to_path_buf())),
        Some(name) if name.to_str().is_none() => {
            Err(MutateError::NonUtf8FileName(source.to_path_buf()))
        }
        Some(_) => Ok(()),
    }
}

/// Renames a file, falling back to copy + remove across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            remove_after_copy(from, to)
        }
        Err(e) => Err(e),
    }
}

/// Removes the source of a finished copy. If that fails the copy is removed
/// again; a copy that cannot be removed is named in the returned error.
fn remove_after_copy(from: &Path, to: &Path) -> io::Result<()> {
    let Err(e) = fs::remove_file(from) else {
        return Ok(());
    };
    match fs::remove_file(to) {
        Ok(()) => Err(e),
        Err(cleanup) => Err(io::Error::new(
            e.kind(),
            format!(
                "{}; the copy at {} could not be removed either: {}",
                e,
                to.display(),
                cleanup
            ),
        )),
    }
}

/// Prunes the subdirectories of `dir`. Returns true if `dir` is now empty.
fn prune_children(dir: &Path, outcome: &mut PruneOutcome) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            outcome.failures.push(MutateError::RemoveFailed {
                path: dir.to_path_buf(),
                source: e,
            });
            return false;
        }
    };

    let mut children = Vec::new();
    let mut empty = true;
    for entry in entries {
        match entry {
            Ok(entry) => children.push(entry),
            Err(_) => empty = false,
        }
    }
    children.sort_by_key(|entry| entry.file_name());

    for entry in children {
        let path = entry.path();
        // symlinks are entries, never followed
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir || !prune_children(&path, outcome) {
            empty = false;
            continue;
        }

        match fs::remove_dir(&path) {
            Ok(()) => outcome.removed.push(path),
            Err(e) => {
                outcome
                    .failures
                    .push(MutateError::RemoveFailed { path, source: e });
                empty = false;
            }
        }
    }

    empty
}
