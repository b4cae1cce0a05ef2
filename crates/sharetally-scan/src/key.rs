//! First-level folder key resolution.

use sharetally_core::{SEPARATOR, ScanRoot};

/// A folder key borrowed from a record path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderKey<'a> {
    /// The truncated path.
    pub key: &'a str,
    /// The record path is the key itself (the folder's own entry).
    pub exact: bool,
}

/// Maps scanner-relative paths to the folder they roll up into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyResolver {
    target_depth: usize,
}

impl KeyResolver {
    /// Resolver keeping `target_depth` separators in each key.
    pub fn new(target_depth: usize) -> Self {
        Self { target_depth }
    }

    /// Resolver for folders `level` steps below the given scan root.
    pub fn for_root(root: &ScanRoot, level: usize) -> Self {
        Self::new(root.base_depth() + level)
    }

    pub fn target_depth(&self) -> usize {
        self.target_depth
    }

    /// Resolve a path to its folder key.
    ///
    /// Returns `None` for entries at or above the scan root itself.
    pub fn resolve<'a>(&self, path: &'a str) -> Option<FolderKey<'a>> {
        let mut seen = 0;
        for (idx, ch) in path.char_indices() {
            if ch != SEPARATOR {
                continue;
            }
            if seen == self.target_depth {
                return Some(FolderKey {
                    key: &path[..idx],
                    exact: false,
                });
            }
            seen += 1;
        }

        (seen == self.target_depth).then_some(FolderKey { key: path, exact: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_depth_returns_path() {
        let resolver = KeyResolver::new(1);
        assert_eq!(
            resolver.resolve(r"path\sub1"),
            Some(FolderKey {
                key: r"path\sub1",
                exact: true
            })
        );
    }

    #[test]
    fn test_deeper_paths_truncate() {
        let resolver = KeyResolver::new(1);
        assert_eq!(
            resolver.resolve(r"path\sub1\a\b\file.txt"),
            Some(FolderKey {
                key: r"path\sub1",
                exact: false
            })
        );
    }

    #[test]
    fn test_shallow_paths_have_no_key() {
        let resolver = KeyResolver::new(1);
        assert_eq!(resolver.resolve("path"), None);
        assert_eq!(resolver.resolve(""), None);

        let resolver = KeyResolver::new(2);
        assert_eq!(resolver.resolve(r"path\sub1"), None);
        assert_eq!(resolver.resolve(r"path\sub1\x").map(|k| k.key), Some(r"path\sub1\x"));
        assert_eq!(resolver.resolve(r"path\sub1\x\y").map(|k| k.key), Some(r"path\sub1\x"));
    }

    #[test]
    fn test_for_root_uses_level() {
        let root = ScanRoot::parse(r"\\fs01\projects\path").unwrap();
        assert_eq!(KeyResolver::for_root(&root, 1).target_depth(), 1);
        assert_eq!(KeyResolver::for_root(&root, 3).target_depth(), 3);
    }

    #[test]
    fn test_forward_slash_is_not_a_separator() {
        let resolver = KeyResolver::new(1);
        assert_eq!(resolver.resolve("path/sub/file"), None);
    }
}
