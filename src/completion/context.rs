// SPDX-License-Identifier: MIT
// Import-block extraction — which packages does the buffer already import?
//
// Used by the cache decision: a package that is already imported gets fresher
// results from gocode itself, so its cache dump is skipped.

use once_cell::sync::Lazy;
use regex::Regex;

/// `import <word>` or `import (` at line start, leading whitespace allowed.
static IMPORT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*import ").expect("regex: import open"));

/// Collect the package names/paths imported by the buffer.
///
/// Scans line by line: an `import` line (single or parenthesised block form)
/// marks the start; every following line is collected — with tab and
/// double-quote characters stripped — until the first line beginning with a
/// close paren. A block that never closes collects to end of buffer.
pub fn imported_packages(lines: &[String]) -> Vec<String> {
    let mut pkgs = Vec::new();
    let mut in_block = false;

    for line in lines {
        if IMPORT_OPEN.is_match(line) {
            in_block = true;
        } else if line.starts_with(')') {
            if in_block {
                break;
            }
        } else if in_block {
            pkgs.push(line.replace(['\t', '"'], ""));
        }
    }
    pkgs
}
