// SPDX-License-Identifier: MIT
// Completion position resolver.
//
// Given the text typed so far on the current line, find the zero-based start
// offset of the token being completed, or None when the line offers nothing
// to complete (the host then suppresses the request).

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing run of word characters — an identifier or the member part of
/// `pkg.Sym`.
static WORD_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+$").expect("regex: word tail"));

/// Trailing run of path-like characters inside a double-quoted string:
/// letters, digits, `.`, `/`, `-`, `_` immediately after the last `"`.
static QUOTED_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([\w./-]*)$"#).expect("regex: quoted tail"));

/// Resolve the start offset of the token under completion.
///
/// Two token shapes are recognised; when both match, the leftmost start wins
/// (a quoted import path may contain `.` and `/`, so it starts earlier than
/// the bare word run at its end):
///
/// - `fmt.Pr`              → start of `Pr`
/// - `fmt.`                → the cursor position (empty member token —
///   completing right after the dot is the canonical trigger)
/// - `import "github.com/u` → start of `github.com/u`
/// - `s := "`              → the cursor position (empty import path is a
///   valid base — every package completes)
///
/// A line ending in neither shape (e.g. `foo(`) resolves to `None`.
pub fn complete_position(input: &str) -> Option<usize> {
    let word = WORD_TAIL
        .find(input)
        .map(|m| m.start())
        .or_else(|| input.ends_with('.').then_some(input.len()));
    let quoted = QUOTED_TAIL
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.start());

    match (word, quoted) {
        (Some(w), Some(q)) => Some(w.min(q)),
        (Some(w), None) => Some(w),
        (None, Some(q)) => Some(q),
        (None, None) => None,
    }
}
