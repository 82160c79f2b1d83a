//! Read-only filesystem queries used by the partitioners.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub is_file: bool,
}

/// Filesystem collaborator for partitioning and package resolution.
pub trait FileSystem {
    /// List the immediate children of `path`.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Express `target` relative to `base`.
    fn relative_path(&self, base: &Path, target: &Path) -> io::Result<PathBuf>;

    fn is_directory(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // Follow symlinks so a linked source file still counts as a file.
            let is_file = fs::metadata(entry.path())
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            entries.push(DirEntryInfo {
                name: entry.file_name(),
                is_file,
            });
        }
        Ok(entries)
    }

    fn relative_path(&self, base: &Path, target: &Path) -> io::Result<PathBuf> {
        lexical_relative(base, target)
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into its parent.
///
/// Leading `..` segments of a relative path are kept; `..` directly under the root is dropped.
/// An empty result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Compute `target` relative to `base` without touching the filesystem.
///
/// Both paths must be absolute or both relative, and must share the same volume prefix.
/// Fails when the answer would depend on the working directory, i.e. when `base` climbs out
/// through `..` segments that `target` does not share.
pub fn lexical_relative(base: &Path, target: &Path) -> io::Result<PathBuf> {
    let base = clean(base);
    let target = clean(target);

    if base.has_root() != target.has_root() || prefix_of(&base) != prefix_of(&target) {
        return Err(cannot_relativize(&base, &target));
    }

    let base_parts: Vec<Component<'_>> = base.components().filter(is_segment).collect();
    let target_parts: Vec<Component<'_>> = target.components().filter(is_segment).collect();

    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    if base_parts[common..]
        .iter()
        .any(|part| matches!(part, Component::ParentDir))
    {
        return Err(cannot_relativize(&base, &target));
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Ok(relative)
}

/// Join the segments of a relative path with `/` regardless of platform.
pub fn to_slash(path: &Path) -> String {
    let joined = path
        .components()
        .filter(is_segment)
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() { ".".to_owned() } else { joined }
}

fn is_segment(component: &Component<'_>) -> bool {
    matches!(component, Component::Normal(_) | Component::ParentDir)
}

fn prefix_of(path: &Path) -> Option<Component<'_>> {
    path.components()
        .next()
        .filter(|part| matches!(part, Component::Prefix(_)))
}

fn cannot_relativize(base: &Path, target: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!(
            "cannot make {} relative to {}",
            target.display(),
            base.display()
        ),
    )
}
