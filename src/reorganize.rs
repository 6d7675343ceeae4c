//! Orchestration of a full reorganization run.
//!
//! A run renames the container, renames the legacy category directories,
//! moves every document under the source root into its category directory,
//! prunes emptied directories and finally removes the source root if nothing
//! is left in it. Structural problems (missing container, unreadable source
//! root, bad configuration) are detected before anything is touched; every
//! other failure is recorded in the [`RunReport`] and the run carries on.

use crate::category::{Category, CategoryRegistry, decorate_container};
use crate::classifier::Classifier;
use crate::config::{CompiledFilters, Config, LayoutConfig};
use crate::document::{DocumentRef, PlacementDecision, discover_documents};
use crate::error::ReorgError;
use crate::output::OutputFormatter;
use crate::report::RunReport;
use crate::resolver::resolve_name_with;
use crate::tree_mutator::{RenameStatus, RootStatus, TreeMutator, check_file_name};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Drives the reorganization of one workspace.
pub struct Reorganizer<'a> {
    workspace_root: PathBuf,
    layout: LayoutConfig,
    registry: &'a CategoryRegistry,
    classifier: Classifier,
    filters: CompiledFilters,
    output: OutputFormatter,
}

impl<'a> Reorganizer<'a> {
    /// Builds a reorganizer for `workspace_root`.
    ///
    /// # Errors
    ///
    /// Returns `ReorgError::Config` if the classifier rules or the document
    /// filters do not compile.
    pub fn new(
        workspace_root: &Path,
        config: &Config,
        registry: &'a CategoryRegistry,
        output: OutputFormatter,
    ) -> Result<Self, ReorgError> {
        Ok(Self {
            workspace_root: workspace_root.to_path_buf(),
            layout: config.layout.clone(),
            registry,
            classifier: Classifier::from_config(registry, &config.classifier)?,
            filters: config.filters.compile()?,
            output,
        })
    }

    /// Directory holding the loose documents.
    pub fn source_root(&self) -> PathBuf {
        self.workspace_root.join(&self.layout.source_dir)
    }

    /// Decorated container path, whether or not it exists yet.
    pub fn decorated_container(&self) -> PathBuf {
        self.workspace_root
            .join(decorate_container(&self.layout.container))
    }

    /// Classifies a document and picks a free name for it.
    fn place<F>(&self, document: DocumentRef, is_taken: F) -> PlacementDecision
    where
        F: Fn(&Category, &str) -> bool,
    {
        let category = self
            .classifier
            .classify(&document.relative_dir, &document.file_name);
        let target_file_name =
            resolve_name_with(&document.file_name, |name| is_taken(&category, name));
        PlacementDecision {
            document,
            category,
            target_file_name,
        }
    }

    /// Enumerates the documents, or `None` if the source root is absent.
    fn discover(&self) -> Result<Option<Vec<DocumentRef>>, ReorgError> {
        let source_root = self.source_root();
        if !source_root.exists() {
            return Ok(None);
        }
        discover_documents(&source_root, &self.filters)
            .map(Some)
            .map_err(|e| ReorgError::SourceUnreadable {
                path: source_root,
                source: e,
            })
    }

    /// Performs the reorganization.
    ///
    /// # Errors
    ///
    /// Only structural failures are returned, and always before the tree
    /// has been modified.
    pub fn run(&self) -> Result<RunReport, ReorgError> {
        let mut report = RunReport::new(false);
        let mutator = TreeMutator::new(self.registry);
        let out = &self.output;

        out.banner("Documentation Consolidation & Directory Renaming");

        let documents = self.discover()?;

        out.header("Step 1: Renaming main container directory...");
        let container = mutator.rename_container(&self.workspace_root, &self.layout.container)?;
        match &container.status {
            RenameStatus::Renamed => {
                report.record_rename();
                out.success("Renamed main directory");
            }
            RenameStatus::AlreadyDone => out.info("Main directory already renamed."),
            RenameStatus::TargetExists => {
                out.warning("Target directory already exists. Using existing directory.")
            }
            RenameStatus::Failed(e) => {
                report.record_failure(e);
                out.error(&format!("Error renaming directory: {}", e));
                out.plain("  Continuing with existing directory name...");
            }
            RenameStatus::Missing => {}
        }
        let container = container.path;

        out.header("Step 2: Renaming category subdirectories...");
        for (category, status) in mutator.rename_category_dirs(&container) {
            match status {
                RenameStatus::Renamed => {
                    report.record_rename();
                    out.success(&format!(
                        "Renamed {} -> {}",
                        category.legacy_name, category.display_name
                    ));
                }
                RenameStatus::TargetExists => out.warning(&format!(
                    "{} already exists. Skipping.",
                    category.display_name
                )),
                RenameStatus::AlreadyDone => {
                    out.info(&format!("{} already exists.", category.display_name))
                }
                RenameStatus::Failed(e) => {
                    report.record_failure(&e);
                    out.error(&format!("Error renaming {}: {}", category.legacy_name, e));
                }
                RenameStatus::Missing => {}
            }
        }

        let source_root = self.source_root();
        out.header(&format!(
            "Step 3: Consolidating files from {}/ directory...",
            self.layout.source_dir
        ));
        let Some(documents) = documents else {
            out.warning(&format!(
                "{}/ directory not found. Skipping consolidation.",
                self.layout.source_dir
            ));
            report.finish();
            return Ok(report);
        };

        let pb = out.create_progress_bar(documents.len() as u64);
        for document in documents {
            let decision = self.place(document, |category, name| {
                fs::symlink_metadata(container.join(category.display_name).join(name)).is_ok()
            });
            let result = mutator.move_document(&container, &decision);

            let line = match &result {
                Ok(_) if decision.is_renamed() => OutputFormatter::success_line(&format!(
                    "Moved: {} -> {} (as {})",
                    decision.document.file_name,
                    decision.category.display_name,
                    decision.target_file_name
                )),
                Ok(_) => OutputFormatter::success_line(&format!(
                    "Moved: {} -> {}",
                    decision.document.file_name, decision.category.display_name
                )),
                Err(e) => OutputFormatter::error_line(&format!(
                    "Error moving {}: {}",
                    decision.document.file_name, e
                )),
            };
            out.progress_line(&pb, &line);
            report.record_move(&decision, result);
            pb.inc(1);
        }
        pb.finish_and_clear();
        out.plain(&format!(
            "\n  Summary: {} moved, {} errors",
            report.moved_count,
            report.items.len() - report.moved_count
        ));

        out.header(&format!(
            "Step 4: Cleaning up empty directories in {}/...",
            self.layout.source_dir
        ));
        let pruned = mutator.prune_empty_dirs(&source_root);
        for path in &pruned.removed {
            report.record_pruned();
            out.success(&format!("Removed empty directory: {}", display_name(path)));
        }
        for failure in &pruned.failures {
            report.record_failure(failure);
            out.error(&failure.to_string());
        }
        out.plain(&format!(
            "  Removed {} empty directories",
            report.pruned_dir_count
        ));

        out.header(&format!(
            "Step 5: Checking if {}/ directory can be removed...",
            self.layout.source_dir
        ));
        match mutator.remove_root_if_empty(&source_root) {
            RootStatus::Removed => {
                report.root_removed = true;
                out.success(&format!(
                    "Removed empty {}/ directory",
                    self.layout.source_dir
                ));
            }
            RootStatus::NotEmpty(count) => {
                report.remaining_entries = Some(count);
                out.info(&format!(
                    "Note: {}/ directory still contains {} items",
                    self.layout.source_dir, count
                ));
                out.info("These items were not moved. Please review manually.");
            }
            RootStatus::Failed(e) => {
                report.record_failure(&e);
                out.error(&e.to_string());
                out.info("Note: Some files may still remain. Please check manually.");
            }
            RootStatus::Missing => {}
        }

        report.finish();
        Ok(report)
    }

    /// Plans the reorganization without touching the filesystem.
    ///
    /// Names are resolved against what already exists in the target
    /// directories plus everything planned earlier in the same pass, so the
    /// printed names match what a real run would pick.
    ///
    /// # Errors
    ///
    /// Same structural failures as [`Reorganizer::run`].
    pub fn dry_run(&self) -> Result<RunReport, ReorgError> {
        let mut report = RunReport::new(true);
        let out = &self.output;

        out.dry_run_notice(&format!(
            "Analyzing contents of: {}",
            self.source_root().display()
        ));

        let documents = self.discover()?;

        let legacy = self.workspace_root.join(&self.layout.container);
        let decorated = self.decorated_container();
        let container = match (legacy.is_dir(), decorated.is_dir()) {
            (_, true) => decorated.clone(),
            (true, false) => {
                report.record_rename();
                out.dry_run_notice(&format!(
                    "Would rename {} -> {}",
                    legacy.display(),
                    decorated.display()
                ));
                legacy
            }
            (false, false) => return Err(ReorgError::ContainerMissing { legacy, decorated }),
        };

        let mut existing_dirs: HashMap<&'static str, PathBuf> = HashMap::new();
        for category in self.registry.all() {
            let legacy_dir = container.join(category.legacy_name);
            let decorated_dir = container.join(category.display_name);
            let dir = if decorated_dir.is_dir() {
                decorated_dir
            } else if legacy_dir.is_dir() {
                report.record_rename();
                out.dry_run_notice(&format!(
                    "Would rename {} -> {}",
                    category.legacy_name, category.display_name
                ));
                legacy_dir
            } else {
                decorated_dir
            };
            existing_dirs.insert(category.key, dir);
        }

        let Some(documents) = documents else {
            out.warning(&format!(
                "{}/ directory not found. Nothing to consolidate.",
                self.layout.source_dir
            ));
            report.finish();
            return Ok(report);
        };

        if documents.is_empty() {
            out.plain("No files found to organize.");
        } else {
            out.plain("\nDRY RUN: Files would be organized as follows:");
        }

        let mut planned: HashMap<&'static str, HashSet<String>> = HashMap::new();
        for document in documents {
            let decision = self.place(document, |category, name| {
                planned
                    .get(category.key)
                    .is_some_and(|names| names.contains(name))
                    || existing_dirs
                        .get(category.key)
                        .is_some_and(|dir| fs::symlink_metadata(dir.join(name)).is_ok())
            });
            out.plain(&format!(" - {}", decision.document.relative_path().display()));
            if let Err(e) = check_file_name(&decision.document.source_path) {
                out.error(&format!("Would not move: {}", e));
                report.record_move(&decision, Err(e));
                continue;
            }
            planned
                .entry(decision.category.key)
                .or_default()
                .insert(decision.target_file_name.clone());

            let destination = decorated
                .join(decision.category.display_name)
                .join(&decision.target_file_name);
            out.plain(&format!("   → Would move to {}", destination.display()));
            report.record_move(&decision, Ok(destination));
        }

        out.summary_table(&report.category_counts(), report.moved_count);
        out.plain("\n✓ Dry run complete. No files were modified.");

        report.finish();
        Ok(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
