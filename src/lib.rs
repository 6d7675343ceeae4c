//! doctidy - consolidate a loose documentation tree into decorated category directories
//!
//! This library renames a container directory and its legacy category
//! subdirectories to their box-drawing decorated names, classifies every
//! document under the source root into one of twelve categories, moves it
//! there without overwriting anything, and prunes what is left behind.
//! Re-running it on an already consolidated tree does nothing.

pub mod category;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod reorganize;
pub mod report;
pub mod resolver;
pub mod tree_mutator;

pub use category::{Category, CategoryRegistry};
pub use classifier::Classifier;
pub use config::Config;
pub use document::{DocumentRef, PlacementDecision};
pub use error::{ConfigError, MutateError, ReorgError};
pub use reorganize::Reorganizer;
pub use report::{RunReport, Summary};
pub use tree_mutator::TreeMutator;

pub use cli::{ReorgCommand, run_cli, run_cli_with_config};
