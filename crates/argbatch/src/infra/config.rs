//! Configuration management utilities.

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::Strategy;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".argbatch/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub partition: Partition,
    #[serde(default)]
    pub sources: Sources,
    #[serde(default)]
    pub resolver: Resolver,
}

/// Partitioning settings. Unset fields fall through to lower layers, then to built-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Partition {
    #[serde(default)]
    strategy: Option<Strategy>,
    #[serde(default)]
    max_command_bytes: Option<usize>,
}

impl Partition {
    /// Conservative budget that fits every mainstream platform's argument limit.
    pub const DEFAULT_MAX_COMMAND_BYTES: usize = 32_000;

    pub fn strategy(&self) -> Strategy {
        self.strategy.unwrap_or_default()
    }

    pub fn max_command_bytes(&self) -> usize {
        self.max_command_bytes.unwrap_or(Self::DEFAULT_MAX_COMMAND_BYTES)
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = Some(strategy);
    }

    pub fn set_max_command_bytes(&mut self, bytes: usize) {
        self.max_command_bytes = Some(bytes);
    }
}

/// File-name globs deciding which directory entries count as source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Sources {
    #[serde(default)]
    include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Sources {
    fn default_include() -> Vec<String> {
        vec!["*.go".into()]
    }

    pub fn include(&self) -> Vec<String> {
        self.include.clone().unwrap_or_else(Self::default_include)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Resolver {
    /// Workspace roots, highest priority first. Empty means "read `search_path_env`".
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
    #[serde(default)]
    search_path_env: Option<String>,
}

impl Resolver {
    fn default_search_path_env() -> String {
        "GOPATH".into()
    }

    /// Variable holding the search-path list when no roots are configured.
    pub fn search_path_env(&self) -> String {
        self.search_path_env.clone().unwrap_or_else(Self::default_search_path_env)
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    strategy: Option<String>,
    max_command_bytes: Option<String>,
    search_path: Option<OsString>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            strategy: env::var("ARGBATCH_STRATEGY").ok(),
            max_command_bytes: env::var("ARGBATCH_MAX_COMMAND_BYTES").ok(),
            search_path: env::var_os("ARGBATCH_SEARCH_PATH"),
        }
    }

    #[cfg(test)]
    fn for_tests(strategy: &str, max_command_bytes: &str, search_path: &str) -> Self {
        Self {
            strategy: Some(strategy.to_owned()),
            max_command_bytes: Some(max_command_bytes.to_owned()),
            search_path: Some(search_path.into()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            partition: merge_partition(self.partition, other.partition),
            sources: merge_sources(self.sources, other.sources),
            resolver: merge_resolver(self.resolver, other.resolver),
        }
    }
}

fn merge_partition(mut base: Partition, overlay: Partition) -> Partition {
    if let Some(value) = overlay.strategy {
        base.strategy = Some(value);
    }
    if let Some(value) = overlay.max_command_bytes {
        base.max_command_bytes = Some(value);
    }
    base
}

fn merge_sources(base: Sources, overlay: Sources) -> Sources {
    let include = overlay.include.or(base.include);

    let mut exclude: BTreeSet<String> = base.exclude.into_iter().collect();
    exclude.extend(overlay.exclude);

    Sources {
        include,
        exclude: exclude.into_iter().collect(),
    }
}

fn merge_resolver(base: Resolver, overlay: Resolver) -> Resolver {
    Resolver {
        search_paths: if overlay.search_paths.is_empty() {
            base.search_paths
        } else {
            overlay.search_paths
        },
        search_path_env: overlay.search_path_env.or(base.search_path_env),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("argbatch/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(strategy) = env.strategy {
        let strategy = strategy
            .parse::<Strategy>()
            .map_err(anyhow::Error::msg)
            .context("invalid ARGBATCH_STRATEGY")?;
        config.partition.set_strategy(strategy);
    }
    if let Some(bytes) = env.max_command_bytes {
        let bytes = bytes
            .trim()
            .parse::<usize>()
            .with_context(|| format!("invalid ARGBATCH_MAX_COMMAND_BYTES: {bytes}"))?;
        config.partition.set_max_command_bytes(bytes);
    }
    if let Some(search_path) = env.search_path {
        config.resolver.search_paths = env::split_paths(&search_path)
            .filter(|root| !root.as_os_str().is_empty())
            .collect();
    }
    Ok(config)
}
