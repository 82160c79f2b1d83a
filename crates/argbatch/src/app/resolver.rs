//! Mapping filesystem paths to package identifiers.

use std::env::{self, VarError};
use std::path::{Component, Path, PathBuf};

use crate::domain::errors::ResolutionError;
use crate::infra::config::Config;
use crate::infra::fs::{FileSystem, clean, to_slash};

/// Ordered workspace roots. Packages live under `<root>/src/<package>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPaths(Vec<PathBuf>);

impl SearchPaths {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(
            roots
                .into_iter()
                .map(Into::into)
                .filter(|root: &PathBuf| !root.as_os_str().is_empty())
                .collect(),
        )
    }

    /// Parse a platform path list such as `root1:root2:root3`.
    pub fn parse(list: &str) -> Self {
        Self::new(env::split_paths(list))
    }

    /// Configured roots, or the value of the configured environment variable when none are set.
    pub fn from_config(config: &Config) -> Result<Self, ResolutionError> {
        if !config.resolver.search_paths.is_empty() {
            return Ok(Self::new(config.resolver.search_paths.iter().cloned()));
        }
        let name = config.resolver.search_path_env();
        Self::from_env_value(&name, env::var(&name))
    }

    fn from_env_value(
        name: &str,
        value: Result<String, VarError>,
    ) -> Result<Self, ResolutionError> {
        match value {
            Ok(list) => Ok(Self::parse(&list)),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(source) => Err(ResolutionError::Environment {
                name: name.to_owned(),
                source,
            }),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.0
    }
}

/// Resolves paths to package identifiers against explicit search paths and working directory.
#[derive(Debug, Clone)]
pub struct PackageResolver {
    search_paths: SearchPaths,
    working_dir: PathBuf,
}

impl PackageResolver {
    pub fn new(search_paths: SearchPaths, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            search_paths,
            working_dir: working_dir.into(),
        }
    }

    /// Resolver anchored at the process working directory.
    pub fn with_current_dir(search_paths: SearchPaths) -> Result<Self, ResolutionError> {
        let cwd = env::current_dir().map_err(ResolutionError::WorkingDir)?;
        Ok(Self::new(search_paths, cwd))
    }

    /// Package identifier for a single path.
    ///
    /// Explicit relative references are returned untouched: `./x`, and also `../x`, which
    /// names a sibling of the working directory the same way. Anything else is matched against
    /// `<root>/src/` for each root in order, and finally expressed relative to the working
    /// directory.
    pub fn resolve<F: FileSystem + ?Sized>(
        &self,
        fs: &F,
        path: &str,
    ) -> Result<String, ResolutionError> {
        if path.is_empty() {
            return Err(ResolutionError::EmptyPath);
        }
        if is_explicit_relative(Path::new(path)) {
            return Ok(path.to_owned());
        }

        let absolute = clean(&self.working_dir.join(path));
        for root in self.search_paths.roots() {
            let src = clean(&self.working_dir.join(root).join("src"));
            if let Ok(rest) = absolute.strip_prefix(&src)
                && !rest.as_os_str().is_empty()
            {
                tracing::trace!(path, root = %root.display(), "resolved under search path");
                return Ok(to_slash(rest));
            }
        }

        let relative = fs
            .relative_path(&self.working_dir, &absolute)
            .map_err(|source| ResolutionError::Relative {
                base: self.working_dir.clone(),
                target: absolute.clone(),
                source,
            })?;
        Ok(to_slash(&relative))
    }

    /// Resolve every path, failing on the first that cannot be resolved.
    pub fn resolve_all<F, S>(&self, fs: &F, paths: &[S]) -> Result<Vec<String>, ResolutionError>
    where
        F: FileSystem + ?Sized,
        S: AsRef<str>,
    {
        paths
            .iter()
            .map(|path| self.resolve(fs, path.as_ref()))
            .collect()
    }
}

fn is_explicit_relative(path: &Path) -> bool {
    matches!(
        path.components().next(),
        Some(Component::CurDir | Component::ParentDir)
    )
}
