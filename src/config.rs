//! Layout, document filtering and classification configuration.
//!
//! Configuration is loaded from a TOML file and falls back to built-in
//! defaults that reproduce the conventional `docs/` + `PANDA_CORE` layout.
//! It covers three concerns:
//! - Layout: where the source root and the container directory live
//! - Filters: which files under the source root count as documents
//! - Classifier: the ordered keyword rules and the subdirectory table
//!
//! # Configuration File Format
//!
//! ```toml
//! [layout]
//! source_dir = "docs"
//! container = "PANDA_CORE"
//!
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store"]
//! patterns = ["drafts/**"]
//! extensions = ["bak"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//!
//! [[classifier.rules]]
//! category = "GUIDES_AND_TUTORIALS"
//! keywords = ["guide", "howto"]
//!
//! [classifier.subdirectories]
//! "how-to" = "GUIDES_AND_TUTORIALS"
//! ```

use crate::error::ConfigError;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-workspace configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".doctidyrc.toml";

/// Complete configuration for a reorganization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub filters: FilterRules,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Where the source documents and the container directory live, relative
/// to the workspace root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Directory holding the loose documents.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Undecorated name of the container directory.
    #[serde(default = "default_container")]
    pub container: String,
}

fn default_source_dir() -> String {
    "docs".to_string()
}

fn default_container() -> String {
    "PANDA_CORE".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            container: default_container(),
        }
    }
}

/// Rules deciding which files under the source root are documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to include hidden files and directories (starting with ".").
    #[serde(default)]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for excluding files from the move.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the path relative to the source root.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "bak", "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Classification data: the keyword rules and the subdirectory table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Ordered rules for documents directly under the source root.
    /// When present, replaces the built-in rule list entirely.
    #[serde(default)]
    pub rules: Option<Vec<RuleConfig>>,

    /// Extra subdirectory name to category key mappings, merged over the
    /// built-in table.
    #[serde(default)]
    pub subdirectories: BTreeMap<String, String>,
}

/// One classification rule as written in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Category key the rule assigns, e.g. `SECURITY`.
    pub category: String,

    /// Substrings tested against the lower-cased file name.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Case-insensitive regular expressions tested against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl Config {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.doctidyrc.toml` in the workspace root
    /// 3. Look for `~/.config/doctidy/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is not valid TOML.
    pub fn load(config_path: Option<&Path>, workspace_root: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = workspace_root.join(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("doctidy")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}

impl FilterRules {
    /// Compile the rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self)
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

/// Pre-compiled filter structures for document matching.
#[derive(Debug)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Whether hidden directories should be descended into.
    pub fn allows_hidden(&self) -> bool {
        self.enable_hidden_files
    }

    /// Check if a file is a document to be moved.
    ///
    /// `relative_path` is the file's path relative to the source root.
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, relative_path: &Path) -> bool {
        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = relative_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filters(rules: FilterRules) -> CompiledFilters {
        rules.compile().unwrap()
    }

    #[test]
    fn test_default_layout() {
        let config = Config::default();
        assert_eq!(config.layout.source_dir, "docs");
        assert_eq!(config.layout.container, "PANDA_CORE");
        assert!(config.classifier.rules.is_none());
        assert!(!config.filters.enable_hidden_files);
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [layout]
            source_dir = "notes"
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.source_dir, "notes");
        assert_eq!(config.layout.container, "PANDA_CORE");
    }

    #[test]
    fn test_parse_classifier_section() {
        let config = Config::from_toml(
            r#"
            [[classifier.rules]]
            category = "SECURITY"
            keywords = ["vuln"]

            [[classifier.rules]]
            category = "TESTING"
            regex = ["^qa[-_]"]

            [classifier.subdirectories]
            "how-to" = "GUIDES_AND_TUTORIALS"
            "#,
        )
        .unwrap();

        let rules = config.classifier.rules.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].keywords, vec!["vuln".to_string()]);
        assert!(rules[1].keywords.is_empty());
        assert_eq!(
            config.classifier.subdirectories.get("how-to").map(String::as_str),
            Some("GUIDES_AND_TUTORIALS")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_invalid() {
        let result = Config::from_toml("[layout\nsource_dir = ");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        let result = Config::load(Some(&missing), temp.path());
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_local_config_file_is_discovered() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(LOCAL_CONFIG_FILE),
            "[layout]\ncontainer = \"CORE\"\n",
        )
        .unwrap();

        let config = Config::load(None, temp.path()).unwrap();
        assert_eq!(config.layout.container, "CORE");
    }

    #[test]
    fn test_hidden_file_excluded_by_default() {
        let compiled = filters(FilterRules::default());
        assert!(!compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_include(Path::new("guide.md")));
    }

    #[test]
    fn test_exclude_extension_and_glob() {
        let compiled = filters(FilterRules {
            exclude: ExcludeRules {
                extensions: vec![".BAK".to_string()],
                patterns: vec!["drafts/**".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("notes.bak")));
        assert!(!compiled.should_include(Path::new("drafts/wip.md")));
        assert!(compiled.should_include(Path::new("api/wip.md")));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let compiled = filters(FilterRules {
            exclude: ExcludeRules {
                regex: vec![r"^draft_".to_string()],
                ..Default::default()
            },
            include: IncludeRules {
                patterns: vec!["draft_keep.md".to_string()],
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("draft_other.md")));
        assert!(compiled.should_include(Path::new("draft_keep.md")));
    }

    #[test]
    fn test_invalid_regex_returns_error() {
        let rules = FilterRules {
            exclude: ExcludeRules {
                regex: vec!["[unclosed".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            rules.compile(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}
