//! UNC scan root parsing.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::RollupError;

/// Path component separator used by the scanner and in UNC paths.
pub const SEPARATOR: char = '\\';

/// A parsed `\\server\share[\sub\path]` root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRoot {
    server: CompactString,
    share: CompactString,
    sub_path: Vec<CompactString>,
}

impl ScanRoot {
    /// Parse a UNC path. A single trailing separator is tolerated.
    pub fn parse(input: &str) -> Result<Self, RollupError> {
        let trimmed = input.trim();
        let Some(rest) = trimmed.strip_prefix(r"\\") else {
            return Err(RollupError::invalid_root(input, r"expected a path of the form \\server\share"));
        };
        if rest.contains('/') {
            return Err(RollupError::invalid_root(input, "forward slashes are not allowed"));
        }
        let rest = rest.strip_suffix(SEPARATOR).unwrap_or(rest);

        let mut parts = rest.split(SEPARATOR);
        let server = parts.next().unwrap_or_default();
        let share = parts.next().unwrap_or_default();
        if server.is_empty() {
            return Err(RollupError::invalid_root(input, "missing server name"));
        }
        if share.is_empty() {
            return Err(RollupError::invalid_root(input, "missing share name"));
        }

        let sub_path = parts
            .map(|segment| {
                if segment.is_empty() {
                    Err(RollupError::invalid_root(input, "empty path segment"))
                } else {
                    Ok(CompactString::from(segment))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            server: server.into(),
            share: share.into(),
            sub_path,
        })
    }

    /// Server name.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Share name.
    pub fn share(&self) -> &str {
        &self.share
    }

    /// Segments below the share (may be empty).
    pub fn sub_path(&self) -> &[CompactString] {
        &self.sub_path
    }

    /// The prefix the scanner puts in front of every relative path it emits.
    ///
    /// This is the scanned folder's own name: the last sub-path segment, or
    /// the share name when scanning a share root.
    pub fn relative_base(&self) -> &str {
        self.sub_path.last().unwrap_or(&self.share)
    }

    /// Separator count within [`relative_base`](Self::relative_base).
    pub fn base_depth(&self) -> usize {
        self.relative_base().matches(SEPARATOR).count()
    }

    /// UNC path of the folder containing the scan root.
    ///
    /// Joining this with a folder key yields the folder's full path.
    pub fn parent(&self) -> String {
        let mut out = format!(r"\\{}", self.server);
        let keep = self.sub_path.len().saturating_sub(1);
        if !self.sub_path.is_empty() {
            out.push(SEPARATOR);
            out.push_str(&self.share);
        }
        for segment in &self.sub_path[..keep] {
            out.push(SEPARATOR);
            out.push_str(segment);
        }
        out
    }

    /// Full UNC path of an entry given its scanner-relative path.
    pub fn join(&self, relative: &str) -> String {
        format!("{}{SEPARATOR}{relative}", self.parent())
    }
}

impl fmt::Display for ScanRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r"\\{}\{}", self.server, self.share)?;
        for segment in &self.sub_path {
            write!(f, r"\{segment}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ScanRoot {
    type Err = RollupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_sub_path() {
        let root = ScanRoot::parse(r"\\fs01\projects\path").unwrap();
        assert_eq!(root.server(), "fs01");
        assert_eq!(root.share(), "projects");
        assert_eq!(root.sub_path().len(), 1);
        assert_eq!(root.relative_base(), "path");
        assert_eq!(root.base_depth(), 0);
        assert_eq!(root.parent(), r"\\fs01\projects");
        assert_eq!(root.join(r"path\sub1"), r"\\fs01\projects\path\sub1");
    }

    #[test]
    fn test_parse_share_root() {
        let root = ScanRoot::parse(r"\\fs01\projects\").unwrap();
        assert!(root.sub_path().is_empty());
        assert_eq!(root.relative_base(), "projects");
        assert_eq!(root.parent(), r"\\fs01");
        assert_eq!(root.join(r"projects\team"), r"\\fs01\projects\team");
        assert_eq!(root.to_string(), r"\\fs01\projects");
    }

    #[test]
    fn test_parse_deep_root() {
        let root = ScanRoot::parse(r"\\fs01\projects\a\b\c").unwrap();
        assert_eq!(root.relative_base(), "c");
        assert_eq!(root.parent(), r"\\fs01\projects\a\b");
        assert_eq!(root.to_string(), r"\\fs01\projects\a\b\c");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ScanRoot::parse(r"C:\data").is_err());
        assert!(ScanRoot::parse(r"\\server").is_err());
        assert!(ScanRoot::parse(r"\\server\").is_err());
        assert!(ScanRoot::parse(r"\\\share").is_err());
        assert!(ScanRoot::parse(r"\\server\share\\x").is_err());
        assert!(ScanRoot::parse("//server/share").is_err());
    }
}
