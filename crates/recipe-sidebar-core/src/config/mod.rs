use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SidebarError};
use crate::manifest::DEFAULT_MANIFEST_CANDIDATES;

mod env;

pub const ENV_MANIFEST_CANDIDATES: &str = "RECIPE_SIDEBAR_MANIFEST_CANDIDATES";
pub const ENV_FETCH_TIMEOUT_MS: &str = "RECIPE_SIDEBAR_FETCH_TIMEOUT_MS";
pub const ENV_COLLAPSED: &str = "RECIPE_SIDEBAR_COLLAPSED";

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarConfig {
    pub manifest_candidates: Vec<String>,
    pub fetch_timeout_ms: u64,
    /// Forces the collapse flag; `None` defers to the page's body attribute.
    pub collapse_by_default: Option<bool>,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            manifest_candidates: DEFAULT_MANIFEST_CANDIDATES
                .iter()
                .map(ToString::to_string)
                .collect(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            collapse_by_default: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SidebarConfigFile {
    manifest_candidates: Option<Vec<String>>,
    fetch_timeout_ms: Option<u64>,
    collapse_by_default: Option<bool>,
}

/// Values read from `RECIPE_SIDEBAR_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub manifest_candidates: Option<Vec<String>>,
    pub fetch_timeout_ms: Option<u64>,
    pub collapse_by_default: Option<bool>,
}

impl EnvOverrides {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            manifest_candidates: env::read_non_empty_env(ENV_MANIFEST_CANDIDATES)
                .map(|raw| env::split_candidate_list(&raw)),
            fetch_timeout_ms: env::read_env_u64(ENV_FETCH_TIMEOUT_MS, 1),
            collapse_by_default: env::parse_env_bool(
                std::env::var(ENV_COLLAPSED).ok().as_deref(),
            ),
        }
    }
}

impl SidebarConfig {
    /// Defaults, then the optional TOML file, then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let base = match file {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        base.with_overrides(EnvOverrides::from_env())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file = toml::from_str::<SidebarConfigFile>(raw)?;
        let mut config = Self::default();
        if let Some(candidates) = file.manifest_candidates {
            config.manifest_candidates = candidates
                .into_iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect();
        }
        if let Some(timeout) = file.fetch_timeout_ms {
            config.fetch_timeout_ms = timeout;
        }
        config.collapse_by_default = file.collapse_by_default;
        config.validate()
    }

    pub fn with_overrides(mut self, overrides: EnvOverrides) -> Result<Self> {
        if let Some(candidates) = overrides.manifest_candidates {
            self.manifest_candidates = candidates;
        }
        if let Some(timeout) = overrides.fetch_timeout_ms {
            self.fetch_timeout_ms = timeout;
        }
        if overrides.collapse_by_default.is_some() {
            self.collapse_by_default = overrides.collapse_by_default;
        }
        self.validate()
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    fn validate(self) -> Result<Self> {
        if self.manifest_candidates.is_empty() {
            return Err(SidebarError::Validation(
                "manifest_candidates must list at least one location".to_string(),
            ));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(SidebarError::Validation(
                "fetch_timeout_ms must be >= 1".to_string(),
            ));
        }
        Ok(self)
    }
}
