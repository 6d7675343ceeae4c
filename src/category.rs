//! Category registry for documentation consolidation.
//!
//! This module defines the twelve fixed documentation categories, their legacy
//! (numbered) directory names and their box-drawing decorated display names.
//!
//! # Examples
//!
//! ```
//! use doctidy::category::CategoryRegistry;
//!
//! let registry = CategoryRegistry::builtin();
//! let security = registry.by_key("security").unwrap();
//! assert_eq!(security.legacy_name, "05_SECURITY");
//! assert_eq!(security.display_name, "╠═══ SECURITY ═══╣");
//! assert_eq!(registry.catch_all().key, "REFERENCE");
//! ```

/// A single documentation category.
///
/// Categories are immutable and defined once at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    /// Ordinal used for deterministic ordering (1-based).
    pub id: u8,
    /// Stable identifier, e.g. `ARCHITECTURE`.
    pub key: &'static str,
    /// Plain numbered directory name used before decoration.
    pub legacy_name: &'static str,
    /// Decorated directory name used on disk.
    pub display_name: &'static str,
    /// What kind of documents belong here.
    pub scope: &'static str,
}

/// Key of the category that receives every unmatched document.
pub const CATCH_ALL_KEY: &str = "REFERENCE";

const BUILTIN_CATEGORIES: [Category; 12] = [
    Category {
        id: 1,
        key: "GETTING_STARTED",
        legacy_name: "01_GETTING_STARTED",
        display_name: "╔═══ GETTING_STARTED ═══╗",
        scope: "Setup, environment and first steps",
    },
    Category {
        id: 2,
        key: "ARCHITECTURE",
        legacy_name: "02_ARCHITECTURE",
        display_name: "╠═══ ARCHITECTURE ═══╣",
        scope: "System design and architecture",
    },
    Category {
        id: 3,
        key: "DEVELOPMENT",
        legacy_name: "03_DEVELOPMENT",
        display_name: "╠═══ DEVELOPMENT ═══╣",
        scope: "Development workflow and builds",
    },
    Category {
        id: 4,
        key: "DEPLOYMENT",
        legacy_name: "04_DEPLOYMENT",
        display_name: "╠═══ DEPLOYMENT ═══╣",
        scope: "Deployment and operations",
    },
    Category {
        id: 5,
        key: "SECURITY",
        legacy_name: "05_SECURITY",
        display_name: "╠═══ SECURITY ═══╣",
        scope: "Security policies and hardening",
    },
    Category {
        id: 6,
        key: "API_REFERENCE",
        legacy_name: "06_API_REFERENCE",
        display_name: "╠═══ API_REFERENCE ═══╣",
        scope: "API reference material",
    },
    Category {
        id: 7,
        key: "SERVICES",
        legacy_name: "07_SERVICES",
        display_name: "╠═══ SERVICES ═══╣",
        scope: "Individual service documentation",
    },
    Category {
        id: 8,
        key: "TESTING",
        legacy_name: "08_TESTING",
        display_name: "╠═══ TESTING ═══╣",
        scope: "Test plans and testing docs",
    },
    Category {
        id: 9,
        key: "AUDITS_AND_REPORTS",
        legacy_name: "09_AUDITS_AND_REPORTS",
        display_name: "╠═══ AUDITS_AND_REPORTS ═══╣",
        scope: "Audits and generated reports",
    },
    Category {
        id: 10,
        key: "GUIDES_AND_TUTORIALS",
        legacy_name: "10_GUIDES_AND_TUTORIALS",
        display_name: "╠═══ GUIDES_AND_TUTORIALS ═══╣",
        scope: "Guides and tutorials",
    },
    Category {
        id: 11,
        key: "MIGRATION_GUIDES",
        legacy_name: "11_MIGRATION_GUIDES",
        display_name: "╠═══ MIGRATION_GUIDES ═══╣",
        scope: "Migration guides",
    },
    Category {
        id: 12,
        key: CATCH_ALL_KEY,
        legacy_name: "12_REFERENCE",
        display_name: "╚═══ REFERENCE ═══╝",
        scope: "General reference (catch-all)",
    },
];

/// Returns the decorated form of a container directory name.
///
/// ```
/// assert_eq!(doctidy::category::decorate_container("PANDA_CORE"), "╠═══ PANDA_CORE ═══╣");
/// ```
pub fn decorate_container(name: &str) -> String {
    format!("╠═══ {} ═══╣", name)
}

/// Ordered, immutable set of categories.
///
/// Constructed once at startup and passed by reference to everything that
/// needs to resolve a category.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Creates the registry holding the twelve built-in categories.
    pub fn builtin() -> Self {
        Self {
            categories: BUILTIN_CATEGORIES.to_vec(),
        }
    }

    /// All categories in ordinal order.
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category by key, ignoring case.
    pub fn by_key(&self, key: &str) -> Option<Category> {
        self.categories
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(key))
            .copied()
    }

    /// Looks up a category by its legacy numbered directory name.
    pub fn by_legacy_name(&self, name: &str) -> Option<Category> {
        self.categories
            .iter()
            .find(|c| c.legacy_name == name)
            .copied()
    }

    /// The category assigned when no rule matches.
    pub fn catch_all(&self) -> Category {
        self.by_key(CATCH_ALL_KEY)
            .unwrap_or(BUILTIN_CATEGORIES[BUILTIN_CATEGORIES.len() - 1])
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
