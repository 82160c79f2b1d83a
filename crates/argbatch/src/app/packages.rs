//! Expanding package directories into their source files.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::domain::errors::ResolutionError;
use crate::domain::model::{ArgVector, CommandPrefix};
use crate::infra::config::Sources;
use crate::infra::fs::FileSystem;

/// Decides which directory entries are source files, by file name.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl SourceFilter {
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Ok(Self {
            include: build_globs(include).context("invalid source include glob")?,
            exclude: build_globs(exclude).context("invalid source exclude glob")?,
        })
    }

    pub fn from_config(sources: &Sources) -> Result<Self> {
        Self::new(sources.include(), &sources.exclude)
    }

    pub fn matches(&self, file_name: &Path) -> bool {
        self.include.is_match(file_name) && !self.exclude.is_match(file_name)
    }
}

impl Default for SourceFilter {
    /// Go sources, tests included.
    fn default() -> Self {
        let include = GlobSetBuilder::new()
            .add(Glob::new("*.go").expect("static glob"))
            .build()
            .expect("static glob set");
        Self {
            include,
            exclude: GlobSet::empty(),
        }
    }
}

fn build_globs<I>(patterns: I) -> Result<GlobSet>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        builder.add(Glob::new(pattern).with_context(|| format!("bad glob: {pattern}"))?);
    }
    Ok(builder.build()?)
}

/// Matching source files directly inside `dir`, sorted by file name.
///
/// A missing path, or one that is not a directory, has no source files. Any other listing
/// failure is an error.
pub fn source_files<F: FileSystem + ?Sized>(
    fs: &F,
    filter: &SourceFilter,
    dir: &str,
) -> Result<Vec<String>, ResolutionError> {
    let dir_path = Path::new(dir);
    let entries = match fs.list_directory(dir_path) {
        Ok(entries) => entries,
        Err(err) if is_absent(&err) => {
            tracing::debug!(dir, error = %err, "no package directory");
            return Ok(Vec::new());
        }
        Err(err) => return Err(ResolutionError::io(dir_path, err)),
    };

    let mut names: Vec<_> = entries
        .into_iter()
        .filter(|entry| entry.is_file && filter.matches(Path::new(&entry.name)))
        .map(|entry| entry.name)
        .collect();
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let path = dir_path.join(&name);
            path.into_os_string()
                .into_string()
                .map_err(|raw| ResolutionError::NonUtf8 { path: raw.into() })
        })
        .collect()
}

fn is_absent(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
}

/// One invocation per package directory holding all of its source files.
///
/// Directories without matching files contribute nothing.
pub fn partition_by_package<F, S>(
    fs: &F,
    filter: &SourceFilter,
    prefix: &CommandPrefix,
    dirs: &[S],
) -> Result<Vec<ArgVector>, ResolutionError>
where
    F: FileSystem + ?Sized,
    S: AsRef<str>,
{
    let mut parts = Vec::new();
    for dir in dirs {
        let files = source_files(fs, filter, dir.as_ref())?;
        if files.is_empty() {
            tracing::debug!(dir = dir.as_ref(), "skipping package without sources");
            continue;
        }
        parts.push(prefix.with_args(files));
    }
    Ok(parts)
}

/// Replace each directory with its source files; explicit files pass through, missing paths
/// are dropped.
pub fn expand_files<F, S>(
    fs: &F,
    filter: &SourceFilter,
    paths: &[S],
) -> Result<Vec<String>, ResolutionError>
where
    F: FileSystem + ?Sized,
    S: AsRef<str>,
{
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if fs.is_directory(Path::new(path)) {
            files.extend(source_files(fs, filter, path)?);
        } else if fs.is_file(Path::new(path)) {
            files.push(path.to_owned());
        } else {
            tracing::debug!(path, "skipping missing path");
        }
    }
    Ok(files)
}
