//! Strategy dispatch over the partitioning primitives.

use anyhow::Result;

use crate::app::directory::partition_by_directory;
use crate::app::packages::{SourceFilter, expand_files, partition_by_package};
use crate::app::resolver::{PackageResolver, SearchPaths};
use crate::app::size::partition_to_max_size;
use crate::domain::errors::ResolutionError;
use crate::domain::model::{ArgVector, CommandPrefix, Strategy};
use crate::infra::config::Config;
use crate::infra::fs::{FileSystem, OsFileSystem};

/// Inputs shared by every strategy.
#[derive(Debug, Clone)]
pub struct PartitionOptions {
    pub strategy: Strategy,
    pub max_command_bytes: usize,
    pub filter: SourceFilter,
    pub search_paths: SearchPaths,
}

impl PartitionOptions {
    /// Search paths are only read for the `packages` strategy, the one that resolves packages.
    pub fn from_config(config: &Config) -> Result<Self> {
        let strategy = config.partition.strategy();
        let search_paths = match strategy {
            Strategy::Packages => SearchPaths::from_config(config)?,
            _ => SearchPaths::default(),
        };
        Ok(Self {
            strategy,
            max_command_bytes: config.partition.max_command_bytes(),
            filter: SourceFilter::from_config(&config.sources)?,
            search_paths,
        })
    }
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_command_bytes: crate::infra::config::Partition::DEFAULT_MAX_COMMAND_BYTES,
            filter: SourceFilter::default(),
            search_paths: SearchPaths::default(),
        }
    }
}

/// Turns path lists into invocations according to the configured strategy.
#[derive(Debug)]
pub struct Partitioner<F = OsFileSystem> {
    fs: F,
    strategy: Strategy,
    max_command_bytes: usize,
    filter: SourceFilter,
    resolver: PackageResolver,
}

impl Partitioner<OsFileSystem> {
    /// Partitioner over the real filesystem, resolving packages from the current directory.
    pub fn new(options: PartitionOptions) -> Result<Self, ResolutionError> {
        let resolver = PackageResolver::with_current_dir(options.search_paths.clone())?;
        Ok(Self::with_filesystem(OsFileSystem, options, resolver))
    }
}

impl<F: FileSystem> Partitioner<F> {
    pub fn with_filesystem(fs: F, options: PartitionOptions, resolver: PackageResolver) -> Self {
        Self {
            fs,
            strategy: options.strategy,
            max_command_bytes: options.max_command_bytes,
            filter: options.filter,
            resolver,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Partition with the configured strategy.
    pub fn partition<S: AsRef<str>>(
        &self,
        prefix: &CommandPrefix,
        paths: &[S],
    ) -> Result<Vec<ArgVector>, ResolutionError> {
        self.partition_with(self.strategy, prefix, paths)
    }

    pub fn partition_with<S: AsRef<str>>(
        &self,
        strategy: Strategy,
        prefix: &CommandPrefix,
        paths: &[S],
    ) -> Result<Vec<ArgVector>, ResolutionError> {
        let parts = match strategy {
            Strategy::Directories => partition_to_max_size(prefix, paths, self.max_command_bytes),
            Strategy::Files => {
                let files = expand_files(&self.fs, &self.filter, paths)?;
                partition_to_max_size(prefix, &files, self.max_command_bytes)
            }
            Strategy::Packages => {
                let packages = self.resolver.resolve_all(&self.fs, paths)?;
                partition_to_max_size(prefix, &packages, self.max_command_bytes)
            }
            Strategy::FilesByPackage => {
                partition_by_package(&self.fs, &self.filter, prefix, paths)?
            }
            Strategy::SingleDirectory => partition_by_directory(prefix, paths)?,
        };

        tracing::debug!(
            strategy = %strategy,
            inputs = paths.len(),
            invocations = parts.len(),
            "partitioned paths"
        );
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::fs::fake::FakeFileSystem;

    fn partitioner(strategy: Strategy, max: usize) -> Partitioner<FakeFileSystem> {
        let fs = FakeFileSystem::default()
            .with_dir("/go/src/a", &["a.go", "a_test.go"])
            .with_dir("/go/src/b", &["b.go"])
            .with_dir("/go/src/empty", &["README"]);
        let options = PartitionOptions {
            strategy,
            max_command_bytes: max,
            ..PartitionOptions::default()
        };
        let resolver = PackageResolver::new(SearchPaths::new(["/go"]), "/go/src");
        Partitioner::with_filesystem(fs, options, resolver)
    }

    fn prefix() -> CommandPrefix {
        CommandPrefix::new(["vet"])
    }

    #[test]
    fn empty_input_is_empty_for_every_strategy() {
        for strategy in [
            Strategy::Directories,
            Strategy::Files,
            Strategy::Packages,
            Strategy::FilesByPackage,
            Strategy::SingleDirectory,
        ] {
            let parts = partitioner(strategy, 100)
                .partition::<&str>(&prefix(), &[])
                .unwrap();
            assert!(parts.is_empty(), "{strategy} emitted {parts:?}");
        }
    }

    #[test]
    fn files_strategy_expands_then_packs() {
        let parts = partitioner(Strategy::Files, 40)
            .partition(&prefix(), &["/go/src/a", "/go/src/empty", "/go/src/b"])
            .unwrap();
        assert_eq!(
            parts,
            vec![
                prefix().with_args(["/go/src/a/a.go", "/go/src/a/a_test.go"]),
                prefix().with_args(["/go/src/b/b.go"]),
            ]
        );
    }

    #[test]
    fn packages_strategy_resolves_then_packs() {
        let parts = partitioner(Strategy::Packages, 1000)
            .partition(&prefix(), &["/go/src/a", "./local", "b"])
            .unwrap();
        assert_eq!(parts, vec![prefix().with_args(["a", "./local", "b"])]);
    }

    #[test]
    fn configured_strategy_can_be_overridden() {
        let partitioner = partitioner(Strategy::Directories, 1000);
        let parts = partitioner
            .partition_with(
                Strategy::FilesByPackage,
                &prefix(),
                &["/go/src/a", "/go/src/empty"],
            )
            .unwrap();
        assert_eq!(
            parts,
            vec![prefix().with_args(["/go/src/a/a.go", "/go/src/a/a_test.go"])]
        );
    }

    #[test]
    fn single_directory_keeps_one_path_per_invocation() {
        let parts = partitioner(Strategy::SingleDirectory, 1)
            .partition(&prefix(), &["x", "y"])
            .unwrap();
        assert_eq!(parts, vec![prefix().with_args(["x"]), prefix().with_args(["y"])]);
    }

    #[test]
    fn options_follow_config() -> Result<()> {
        let mut config = Config::default();
        config.partition.set_strategy(Strategy::Packages);
        config.partition.set_max_command_bytes(512);
        config.resolver.search_paths = vec!["/go".into()];
        let options = PartitionOptions::from_config(&config)?;
        assert_eq!(options.strategy, Strategy::Packages);
        assert_eq!(options.max_command_bytes, 512);
        assert_eq!(options.search_paths, SearchPaths::new(["/go"]));
        Ok(())
    }

    #[test]
    fn search_path_variable_is_ignored_by_other_strategies() -> Result<()> {
        let mut config = Config::default();
        config.partition.set_strategy(Strategy::FilesByPackage);
        config.resolver.search_paths = vec!["/go".into()];
        let options = PartitionOptions::from_config(&config)?;
        assert_eq!(options.search_paths, SearchPaths::default());
        Ok(())
    }
}
