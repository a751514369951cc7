use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_MASTER_DEALERS: &[&str] = &[
    "avenger",
    "smallhd",
    "wooden camera",
    "teradek",
    "paralinx",
    "atomos",
    "oconnor",
    "vinten",
    "sacthler",
    "litepanels",
    "offhollywood",
    "anton bauer",
    "core swx",
    "autocue",
    "autoscript",
    "manfrotto",
];

const DEFAULT_EXCLUDED_BREADCRUMBS: &[&str] = &["Home"];

/// Vendor and breadcrumb rules applied while mapping listings to catalog
/// records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRules {
    /// Vendors whose barcoded products ship through the master dealer.
    pub master_dealers: Vec<String>,
    /// Breadcrumb labels never turned into tags (e.g. `"Home"`).
    #[serde(default)]
    pub excluded_breadcrumbs: Vec<String>,
}

impl Default for CatalogRules {
    fn default() -> Self {
        Self {
            master_dealers: DEFAULT_MASTER_DEALERS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            excluded_breadcrumbs: DEFAULT_EXCLUDED_BREADCRUMBS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

impl CatalogRules {
    /// Case-insensitive membership test against [`Self::master_dealers`].
    #[must_use]
    pub fn is_master_dealer(&self, vendor: &str) -> bool {
        let vendor = vendor.trim();
        self.master_dealers
            .iter()
            .any(|d| d.eq_ignore_ascii_case(vendor))
    }

    #[must_use]
    pub fn is_excluded_breadcrumb(&self, label: &str) -> bool {
        self.excluded_breadcrumbs.iter().any(|b| b == label)
    }
}

/// Load and validate catalog rules from a YAML file, or return the built-in
/// rules when `path` is `None`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog_rules(path: Option<&Path>) -> Result<CatalogRules, ConfigError> {
    let Some(path) = path else {
        return Ok(CatalogRules::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rules: CatalogRules = serde_yaml::from_str(&content)?;

    validate_rules(&rules)?;

    Ok(rules)
}

fn validate_rules(rules: &CatalogRules) -> Result<(), ConfigError> {
    let mut seen_dealers = HashSet::new();

    for dealer in &rules.master_dealers {
        if dealer.trim().is_empty() {
            return Err(ConfigError::Validation(
                "master dealer name must be non-empty".to_string(),
            ));
        }

        if !seen_dealers.insert(dealer.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate master dealer: '{dealer}'"
            )));
        }
    }

    if rules.excluded_breadcrumbs.iter().any(|b| b.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "excluded breadcrumb must be non-empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_rules_include_known_dealers() {
        let rules = CatalogRules::default();
        assert!(rules.is_master_dealer("SmallHD"));
        assert!(rules.is_master_dealer("Anton Bauer"));
        assert!(!rules.is_master_dealer("Canon"));
    }

    #[test]
    fn default_rules_exclude_home_breadcrumb() {
        let rules = CatalogRules::default();
        assert!(rules.is_excluded_breadcrumb("Home"));
        assert!(!rules.is_excluded_breadcrumb("Monitors"));
    }

    #[test]
    fn load_without_path_returns_defaults() {
        let rules = load_catalog_rules(None).unwrap();
        assert_eq!(rules.master_dealers.len(), DEFAULT_MASTER_DEALERS.len());
    }

    #[test]
    fn load_reads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "master_dealers:\n  - teradek\n  - atomos\nexcluded_breadcrumbs:\n  - Home\n  - Shop"
        )
        .unwrap();

        let rules = load_catalog_rules(Some(file.path())).unwrap();
        assert_eq!(rules.master_dealers, vec!["teradek", "atomos"]);
        assert!(rules.is_excluded_breadcrumb("Shop"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_catalog_rules(Some(Path::new("/nonexistent/rules.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::RulesFileIo { .. }));
    }

    #[test]
    fn load_malformed_yaml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "master_dealers: {{ not: [a list").unwrap();
        let err = load_catalog_rules(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::RulesFileParse(_)));
    }

    #[test]
    fn validate_rejects_empty_dealer() {
        let rules = CatalogRules {
            master_dealers: vec!["  ".to_string()],
            excluded_breadcrumbs: vec![],
        };
        let err = validate_rules(&rules).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_case_insensitive_duplicates() {
        let rules = CatalogRules {
            master_dealers: vec!["Teradek".to_string(), "teradek".to_string()],
            excluded_breadcrumbs: vec![],
        };
        let err = validate_rules(&rules).unwrap_err();
        assert!(err.to_string().contains("duplicate master dealer"));
    }

    #[test]
    fn validate_rejects_blank_breadcrumb() {
        let rules = CatalogRules {
            master_dealers: vec![],
            excluded_breadcrumbs: vec![String::new()],
        };
        assert!(validate_rules(&rules).is_err());
    }
}
