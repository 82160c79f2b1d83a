//! One invocation per input path.

use crate::domain::errors::ResolutionError;
use crate::domain::model::{ArgVector, CommandPrefix};

/// Emit `prefix ++ [path]` for every path, in input order.
///
/// Paths sharing a parent directory are not merged; each one is treated as a directory of its
/// own. The filesystem is not consulted, so paths that do not exist yet are passed through.
pub fn partition_by_directory<S: AsRef<str>>(
    prefix: &CommandPrefix,
    paths: &[S],
) -> Result<Vec<ArgVector>, ResolutionError> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            if path.is_empty() {
                return Err(ResolutionError::EmptyPath);
            }
            Ok(prefix.with_args([path]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_invocation_per_path() {
        let prefix = CommandPrefix::new(["/usr/bin/foo", "-c"]);
        let parts = partition_by_directory(&prefix, &["one", "two", "three"]).unwrap();
        assert_eq!(
            parts,
            vec![
                prefix.with_args(["one"]),
                prefix.with_args(["two"]),
                prefix.with_args(["three"]),
            ]
        );
    }

    #[test]
    fn shared_parents_are_not_merged() {
        let prefix = CommandPrefix::new(["lint"]);
        let parts = partition_by_directory(&prefix, &["pkg/a", "pkg/a", "pkg/b"]).unwrap();
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn empty_input_emits_nothing() {
        let parts = partition_by_directory::<&str>(&CommandPrefix::new(["lint"]), &[]).unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn empty_path_fails_fast() {
        let result = partition_by_directory(&CommandPrefix::new(["lint"]), &["ok", "", "late"]);
        assert!(matches!(result, Err(ResolutionError::EmptyPath)));
    }
}
