//! quizdex configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::SortKey;
use crate::search::DEFAULT_SUGGESTION_LIMIT;

/// Top-level quizdex configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizdexConfig {
    /// Catalog file or directory used when no `--catalog` is given.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Sort order when no `--sort` is given.
    #[serde(default = "default_sort")]
    pub default_sort: SortKey,
    /// Maximum number of search suggestions.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    /// Suggestion candidates. Catalog titles are used when empty.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

fn default_sort() -> SortKey {
    SortKey::Popularity
}
fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

impl Default for QuizdexConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            default_sort: default_sort(),
            suggestion_limit: default_suggestion_limit(),
            suggestions: Vec::new(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim, so a value that itself contains
/// `${...}` is not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `quizdex.toml` in the current directory
/// 2. `~/.config/quizdex/config.toml`
///
/// Environment variable override: `QUIZDEX_CATALOG`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdexConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdex.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizdexConfig::default(),
    };

    if let Ok(catalog) = std::env::var("QUIZDEX_CATALOG") {
        config.catalog = Some(PathBuf::from(catalog));
    }

    config.catalog = config
        .catalog
        .map(|p| PathBuf::from(resolve_env_vars(&p.to_string_lossy())));

    Ok(config)
}

/// Parse config TOML without touching the environment.
pub fn parse_config(content: &str) -> Result<QuizdexConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdex"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZDEX_TEST_VAR", "catalogs");
        assert_eq!(resolve_env_vars("${_QUIZDEX_TEST_VAR}"), "catalogs");
        assert_eq!(
            resolve_env_vars("/srv/${_QUIZDEX_TEST_VAR}/main.toml"),
            "/srv/catalogs/main.toml"
        );
        std::env::remove_var("_QUIZDEX_TEST_VAR");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        std::env::set_var("_QUIZDEX_SELF_REF", "${_QUIZDEX_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_QUIZDEX_SELF_REF}/x"),
            "${_QUIZDEX_SELF_REF}/x"
        );
        std::env::remove_var("_QUIZDEX_SELF_REF");
    }

    #[test]
    fn missing_variables_resolve_to_empty() {
        assert_eq!(resolve_env_vars("a${_QUIZDEX_NOT_SET_ANYWHERE}b"), "ab");
    }

    #[test]
    fn unterminated_reference_is_left_alone() {
        assert_eq!(resolve_env_vars("${OOPS"), "${OOPS");
    }

    #[test]
    fn default_config() {
        let config = QuizdexConfig::default();
        assert_eq!(config.default_sort, SortKey::Popularity);
        assert_eq!(config.suggestion_limit, 5);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
catalog = "catalogs/school.toml"
default_sort = "newest"
suggestion_limit = 3
suggestions = ["Spanish grammar", "French vocabulary"]
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.catalog, Some(PathBuf::from("catalogs/school.toml")));
        assert_eq!(config.default_sort, SortKey::Newest);
        assert_eq!(config.suggestion_limit, 3);
        assert_eq!(config.suggestions.len(), 2);
    }

    #[test]
    fn unknown_sort_in_config_means_unsorted() {
        let config = parse_config("default_sort = \"random\"").unwrap();
        assert_eq!(config.default_sort, SortKey::Unsorted);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn self_referencing_catalog_override_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizdex.toml");
        std::fs::write(&path, "").unwrap();

        std::env::set_var("QUIZDEX_CATALOG", "${QUIZDEX_CATALOG}");
        let config = load_config_from(Some(&path));
        std::env::remove_var("QUIZDEX_CATALOG");

        assert_eq!(
            config.unwrap().catalog,
            Some(PathBuf::from("${QUIZDEX_CATALOG}"))
        );
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizdex.toml");
        std::fs::write(&path, "default_sort = \"rating\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_sort, SortKey::Rating);
    }
}
