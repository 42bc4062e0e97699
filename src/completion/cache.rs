// SPDX-License-Identifier: MIT
// Package-level completion cache.
//
// An external indexing tool maintains a directory of JSON dumps, one per
// package, in the same wire shape gocode emits. The adapter only ever reads
// them — a hit skips the gocode round-trip entirely.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::model::{parse_wire, RawCandidate};

/// Trailing `pkg.` run: a word-character run plus the qualifying dot.
/// Only inputs ending in a dot qualify — a bare word is an identifier still
/// being typed, not a package reference.
static QUALIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w*\.$").expect("regex: qualifier"));

/// Extract the package qualifier before the cursor: `"fmt."` for input
/// `fmt.`, `None` for `fmt.Pr` or a bare identifier.
pub fn package_qualifier(input: &str) -> Option<String> {
    QUALIFIER.find(input).map(|m| m.as_str().to_string())
}

/// Path of the dump file for a qualifier.
///
/// The indexer names its dumps by concatenating the qualifier — trailing dot
/// included — directly with `json`: qualifier `fmt.` maps to `fmt.json`.
/// There is no separator in between; inserting one would break compatibility
/// with every existing cache directory.
pub fn cache_path(cache_dir: &Path, qualifier: &str) -> PathBuf {
    cache_dir.join(format!("{qualifier}json"))
}

/// Try to satisfy a request from the package cache.
///
/// Eligible only when the qualifier contains a dot (looks like a qualified
/// reference, not a bare import), the package is NOT currently imported, and
/// the dump file exists. Any read or parse failure logs at debug and falls
/// through to the subprocess path.
pub fn lookup(
    cache_dir: &Path,
    qualifier: &str,
    imported: &[String],
) -> Option<Vec<RawCandidate>> {
    if !qualifier.contains('.') {
        return None;
    }
    let package = qualifier.trim_end_matches('.');
    if imported.iter().any(|p| p == package || p == qualifier) {
        return None;
    }

    let path = cache_path(cache_dir, qualifier);
    if !path.is_file() {
        return None;
    }

    match std::fs::read(&path) {
        Ok(bytes) => match parse_wire(&bytes) {
            Ok(entries) => {
                debug!(path = %path.display(), entries = entries.len(), "package cache hit");
                Some(entries)
            }
            Err(e) => {
                debug!(path = %path.display(), err = %e, "cache dump unparsable — falling back to gocode");
                None
            }
        },
        Err(e) => {
            debug!(path = %path.display(), err = %e, "cache dump unreadable — falling back to gocode");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifier_requires_trailing_dot() {
        assert_eq!(package_qualifier("fmt.").as_deref(), Some("fmt."));
        assert_eq!(package_qualifier("x := strconv.").as_deref(), Some("strconv."));
        assert_eq!(package_qualifier("fmt.Pr"), None);
        assert_eq!(package_qualifier("fmt"), None);
    }

    #[test]
    fn dump_path_has_no_separator() {
        let path = cache_path(Path::new("/var/cache"), "fmt.");
        assert_eq!(path, PathBuf::from("/var/cache/fmt.json"));
    }

    #[test]
    fn imported_package_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            cache_path(dir.path(), "fmt."),
            br#"[1, [{"name": "Println", "type": "func()", "class": "func"}]]"#,
        )
        .unwrap();

        assert!(lookup(dir.path(), "fmt.", &["fmt".to_string()]).is_none());
        assert!(lookup(dir.path(), "fmt.", &["os".to_string()]).is_some());
    }

    #[test]
    fn missing_dump_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        assert!(lookup(dir.path(), "fmt.", &[]).is_none());
    }

    #[test]
    fn corrupt_dump_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(cache_path(dir.path(), "fmt."), b"not json at all").unwrap();
        assert!(lookup(dir.path(), "fmt.", &[]).is_none());
    }
}
