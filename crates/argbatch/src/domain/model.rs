//! Domain models for command prefixes, argument vectors, and strategies.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Executable and fixed flags prepended to every emitted invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CommandPrefix(Vec<String>);

impl CommandPrefix {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    pub fn args(&self) -> &[String] {
        &self.0
    }

    /// Bytes the prefix occupies on a command line, one separator per argument.
    pub fn byte_len(&self) -> usize {
        self.0.iter().map(|arg| arg_cost(arg)).sum()
    }

    /// Build a complete invocation from this prefix and the given batch.
    pub fn with_args<I, S>(&self, batch: I) -> ArgVector
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = self.0.clone();
        args.extend(batch.into_iter().map(Into::into));
        ArgVector {
            args,
            prefix_len: self.0.len(),
        }
    }
}

/// Bytes a single argument costs: its length plus one separator.
pub fn arg_cost(arg: &str) -> usize {
    arg.len() + 1
}

/// One downstream invocation: the command prefix followed by its batch of paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgVector {
    args: Vec<String>,
    #[serde(skip)]
    prefix_len: usize,
}

impl ArgVector {
    /// Every argument, prefix included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Only the batch-specific arguments.
    pub fn paths(&self) -> &[String] {
        &self.args[self.prefix_len..]
    }

    pub fn byte_len(&self) -> usize {
        self.args.iter().map(|arg| arg_cost(arg)).sum()
    }
}

impl PartialEq<Vec<String>> for ArgVector {
    fn eq(&self, other: &Vec<String>) -> bool {
        &self.args == other
    }
}

impl PartialEq<Vec<&str>> for ArgVector {
    fn eq(&self, other: &Vec<&str>) -> bool {
        self.args.len() == other.len() && self.args.iter().zip(other).all(|(a, b)| a == b)
    }
}

/// How input paths are turned into invocations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Pack the paths as given under the byte budget.
    #[default]
    Directories,
    /// Expand directories into their source files, then pack under the byte budget.
    Files,
    /// Resolve paths to package identifiers, then pack under the byte budget.
    Packages,
    /// One invocation per directory containing its source files.
    FilesByPackage,
    /// One invocation per path.
    SingleDirectory,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directories => "directories",
            Self::Files => "files",
            Self::Packages => "packages",
            Self::FilesByPackage => "files-by-package",
            Self::SingleDirectory => "single-directory",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(value.trim(), true)
            .map_err(|_| format!("unknown partition strategy: {value}"))
    }
}
