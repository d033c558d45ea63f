//! Settings resolution: CLI flag, then environment, then TOML file, then default.
//!
//! ```toml
//! dataset = "assets/rtfMRI_methods_review_included_studies_procsteps.txt"
//!
//! [view]
//! max_rows = 20
//! primary = "vendor"
//! secondary = "magnet"
//!
//! [browse]
//! limit = 50
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rtfmri_core::DEFAULT_MAX_ROWS;
use rtfmri_ingest::DEFAULT_DATASET_PATH;

pub const DATASET_ENV_VAR: &str = "RTFMRI_DATASET";
pub const CONFIG_ENV_VAR: &str = "RTFMRI_CONFIG";
/// Read from the working directory when present and no other file is named.
pub const DEFAULT_CONFIG_FILE: &str = "rtfmri.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub dataset: Option<PathBuf>,
    pub view: ViewConfig,
    pub browse: BrowseConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub max_rows: Option<usize>,
    /// Initial primary field.
    pub primary: Option<String>,
    /// Initial secondary field.
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowseConfig {
    pub limit: Option<usize>,
}

impl DashboardConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }
}

/// Environment variables that override the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub dataset: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            dataset: var(DATASET_ENV_VAR),
            config: var(CONFIG_ENV_VAR),
        }
    }
}

/// Picks the config file to read, if any.
///
/// An explicit path (flag or env) is always returned so a missing file is
/// reported; the default file is only used when it exists.
pub fn config_path(cli: Option<&Path>, env: &EnvOverrides) -> Option<PathBuf> {
    cli.map(Path::to_path_buf)
        .or_else(|| env.config.clone())
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        })
}

/// Effective settings after applying the precedence rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub dataset: PathBuf,
    pub max_rows: usize,
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub browse_limit: Option<usize>,
    pub config_file: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(
        cli_dataset: Option<&Path>,
        env: &EnvOverrides,
        file: &DashboardConfig,
        config_file: Option<PathBuf>,
    ) -> Self {
        let dataset = cli_dataset
            .map(Path::to_path_buf)
            .or_else(|| env.dataset.clone())
            .or_else(|| file.dataset.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));
        Self {
            dataset,
            max_rows: file.view.max_rows.unwrap_or(DEFAULT_MAX_ROWS),
            primary: file.view.primary.clone(),
            secondary: file.view.secondary.clone(),
            browse_limit: file.browse.limit,
            config_file,
        }
    }

    /// Reads the environment and the selected config file.
    pub fn load(cli_dataset: Option<&Path>, cli_config: Option<&Path>) -> Result<Self, ConfigError> {
        let env = EnvOverrides::from_env();
        let path = config_path(cli_config, &env);
        let file = match &path {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        Ok(Self::resolve(cli_dataset, &env, &file, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_any_source() {
        let settings = Settings::resolve(None, &EnvOverrides::default(), &DashboardConfig::default(), None);
        assert_eq!(settings.dataset, PathBuf::from(DEFAULT_DATASET_PATH));
        assert_eq!(settings.max_rows, DEFAULT_MAX_ROWS);
        assert_eq!(settings.browse_limit, None);
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = DashboardConfig {
            dataset: Some("file.tsv".into()),
            ..DashboardConfig::default()
        };
        let env = EnvOverrides {
            dataset: Some("env.tsv".into()),
            config: None,
        };
        let flag = Path::new("flag.tsv");

        assert_eq!(Settings::resolve(Some(flag), &env, &file, None).dataset, flag);
        assert_eq!(
            Settings::resolve(None, &env, &file, None).dataset,
            PathBuf::from("env.tsv")
        );
        assert_eq!(
            Settings::resolve(None, &EnvOverrides::default(), &file, None).dataset,
            PathBuf::from("file.tsv")
        );
    }

    #[test]
    fn explicit_config_path_wins() {
        let env = EnvOverrides {
            dataset: None,
            config: Some("env.toml".into()),
        };
        assert_eq!(
            config_path(Some(Path::new("flag.toml")), &env),
            Some(PathBuf::from("flag.toml"))
        );
        assert_eq!(config_path(None, &env), Some(PathBuf::from("env.toml")));
    }

    #[test]
    fn parses_sections() {
        let config = DashboardConfig::from_toml(
            "[view]\nmax_rows = 5\nprimary = \"software\"\n\n[browse]\nlimit = 10\n",
            Path::new("rtfmri.toml"),
        )
        .unwrap();
        assert_eq!(config.view.max_rows, Some(5));
        assert_eq!(config.view.primary.as_deref(), Some("software"));
        assert_eq!(config.browse.limit, Some(10));
        assert_eq!(config.dataset, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DashboardConfig::from_toml("[view]\nrows = 5\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid config bad.toml"));
    }
}
