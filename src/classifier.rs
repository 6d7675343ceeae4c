//! Document classification by file name and parent directory.
//!
//! Documents directly under the source root are classified by an ordered list
//! of keyword rules evaluated against the lower-cased file name; the first
//! matching rule wins. Documents in a subdirectory are classified by the name
//! of their immediate parent directory. Anything unmatched lands in the
//! registry's catch-all category, so classification is total.
//!
//! # Examples
//!
//! ```
//! use doctidy::category::CategoryRegistry;
//! use doctidy::classifier::Classifier;
//!
//! let registry = CategoryRegistry::builtin();
//! let classifier = Classifier::builtin(&registry);
//! assert_eq!(classifier.classify("", "security-hardening.md").key, "SECURITY");
//! assert_eq!(classifier.classify("api", "endpoints.md").key, "API_REFERENCE");
//! assert_eq!(classifier.classify("", "misc.md").key, "REFERENCE");
//! ```

use crate::category::{Category, CategoryRegistry};
use crate::config::ClassifierConfig;
use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::path::Path;

/// Built-in ordered keyword rules for root-level documents.
const DEFAULT_RULES: &[(&str, &[&str])] = &[
    ("GETTING_STARTED", &["getting_started", "setup", "environment"]),
    ("ARCHITECTURE", &["architecture"]),
    ("DEVELOPMENT", &["development", "build", "storybook", "wiki"]),
    ("DEPLOYMENT", &["deployment"]),
    ("SECURITY", &["security"]),
    ("API_REFERENCE", &["api"]),
    ("SERVICES", &["service"]),
    ("TESTING", &["test"]),
    ("AUDITS_AND_REPORTS", &["audit", "cache", "dead_code"]),
    ("GUIDES_AND_TUTORIALS", &["guide", "resend", "auto_config"]),
    ("MIGRATION_GUIDES", &["migration"]),
    (
        "REFERENCE",
        &[
            "product",
            "reference",
            "scrollbar",
            "analytics",
            "cloudflare",
            "chat",
        ],
    ),
];

/// Built-in subdirectory name to category key table.
const DEFAULT_SUBDIRECTORIES: &[(&str, &str)] = &[
    ("getting-started", "GETTING_STARTED"),
    ("architecture", "ARCHITECTURE"),
    ("development", "DEVELOPMENT"),
    ("deployment", "DEPLOYMENT"),
    ("security", "SECURITY"),
    ("api", "API_REFERENCE"),
    ("services", "SERVICES"),
    ("guides", "GUIDES_AND_TUTORIALS"),
    ("reference", "REFERENCE"),
];

/// A single test applied to a lower-cased file name.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Substring containment.
    Keyword(String),
    /// Case-insensitive regular expression.
    Pattern(Regex),
}

impl Matcher {
    fn matches(&self, lower_name: &str) -> bool {
        match self {
            Matcher::Keyword(keyword) => lower_name.contains(keyword.as_str()),
            Matcher::Pattern(regex) => regex.is_match(lower_name),
        }
    }
}

/// An ordered (predicate, category) pair.
#[derive(Debug, Clone)]
pub struct Rule {
    matchers: Vec<Matcher>,
    category: Category,
}

impl Rule {
    /// Creates a keyword-only rule.
    pub fn keywords(category: Category, keywords: &[&str]) -> Self {
        Self {
            matchers: keywords
                .iter()
                .map(|k| Matcher::Keyword(k.to_lowercase()))
                .collect(),
            category,
        }
    }

    /// The category this rule assigns.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns true if any matcher accepts the file name (case-insensitive).
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.matchers.iter().any(|m| m.matches(&lower))
    }
}

/// Maps documents to categories.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
    subdirectories: HashMap<String, Category>,
    catch_all: Category,
}

impl Classifier {
    /// Creates a classifier with the built-in rules and subdirectory table.
    pub fn builtin(registry: &CategoryRegistry) -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .filter_map(|(key, keywords)| {
                registry
                    .by_key(key)
                    .map(|category| Rule::keywords(category, keywords))
            })
            .collect();

        let subdirectories = DEFAULT_SUBDIRECTORIES
            .iter()
            .filter_map(|(dir, key)| registry.by_key(key).map(|c| (dir.to_string(), c)))
            .collect();

        Self {
            rules,
            subdirectories,
            catch_all: registry.catch_all(),
        }
    }

    /// Creates a classifier from configuration data.
    ///
    /// Configured rules replace the built-in rule list; configured
    /// subdirectories are merged over the built-in table.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule names an unknown category or carries an
    /// invalid regex.
    pub fn from_config(
        registry: &CategoryRegistry,
        config: &ClassifierConfig,
    ) -> Result<Self, ConfigError> {
        let mut classifier = Self::builtin(registry);

        if let Some(rules) = &config.rules {
            classifier.rules = rules
                .iter()
                .map(|rule| {
                    let category = lookup(registry, &rule.category)?;
                    let mut matchers: Vec<Matcher> = rule
                        .keywords
                        .iter()
                        .map(|k| Matcher::Keyword(k.to_lowercase()))
                        .collect();
                    for pattern in &rule.regex {
                        let regex = RegexBuilder::new(pattern)
                            .case_insensitive(true)
                            .build()
                            .map_err(|e| ConfigError::InvalidRegexPattern {
                                pattern: pattern.clone(),
                                reason: e.to_string(),
                            })?;
                        matchers.push(Matcher::Pattern(regex));
                    }
                    Ok(Rule { matchers, category })
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
        }

        for (dir, key) in &config.subdirectories {
            let category = lookup(registry, key)?;
            classifier.subdirectories.insert(dir.to_lowercase(), category);
        }

        Ok(classifier)
    }

    /// The ordered root-level rules.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classifies a document.
    ///
    /// `relative_dir` is the document's parent directory relative to the
    /// source root (empty for root-level documents). Only its last segment
    /// is considered. Never fails: unmatched input yields the catch-all.
    pub fn classify(&self, relative_dir: &str, file_name: &str) -> Category {
        let parent = Path::new(relative_dir)
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if parent.is_empty() {
            return self
                .rules
                .iter()
                .find(|rule| rule.matches(file_name))
                .map(Rule::category)
                .unwrap_or(self.catch_all);
        }

        self.subdirectories
            .get(&parent)
            .copied()
            .unwrap_or(self.catch_all)
    }
}

fn lookup(registry: &CategoryRegistry, key: &str) -> Result<Category, ConfigError> {
    registry
        .by_key(key)
        .ok_or_else(|| ConfigError::UnknownCategory(key.to_string()))
}
