// SPDX-License-Identifier: MIT
// Completion data model — host request, gocode wire shape, candidate records.

use serde::{Deserialize, Serialize};

/// Source marker shown next to every candidate in the host's menu.
pub const SOURCE_MARK: &str = "[Go]";

/// Class marker gocode puts in its first result entry when its analysis
/// crashed instead of completing.
pub const PANIC_CLASS: &str = "PANIC";

/// One completion request, created by the host per keystroke trigger.
///
/// The adapter only reads it; the host owns buffer and cursor state.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionRequest {
    /// Text on the current line up to the cursor.
    pub input: String,
    /// Character column of the completion position (host-computed).
    #[serde(rename = "completePosition", default)]
    pub complete_position: usize,
    /// Full buffer content, one entry per line.
    #[serde(rename = "bufferLines")]
    pub buffer_lines: Vec<String>,
    /// File name of the buffer — gocode uses it for build context.
    #[serde(rename = "bufferName")]
    pub buffer_name: String,
    /// 1-based line number of the cursor.
    #[serde(rename = "cursorLine")]
    pub cursor_line: usize,
}

/// A raw entry as emitted by gocode (and stored verbatim in cache dumps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCandidate {
    pub name: String,
    /// Full type description, e.g. `func(x int) string`.
    #[serde(rename = "type")]
    pub type_desc: String,
    /// Candidate class: "func", "var", "package", "import", "type", "const".
    pub class: String,
}

/// Host-facing candidate record.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    /// Text inserted when the candidate is accepted.
    pub word: String,
    /// Display abbreviation: `name type`, with the redundant leading
    /// `func` keyword cut from the type.
    pub abbr: String,
    /// Class string shown as the candidate kind.
    pub kind: String,
    /// Unmodified type description.
    pub info: String,
    /// Source marker, always [`SOURCE_MARK`].
    pub menu: String,
    /// Allow duplicates across requests — the host must not dedupe.
    pub dup: bool,
}

/// Parse the gocode wire shape `[count, [entry, ...]]`.
///
/// The leading count is ignored; only the entry array matters. Cache dump
/// files use the identical shape.
pub fn parse_wire(bytes: &[u8]) -> Result<Vec<RawCandidate>, serde_json::Error> {
    let (_count, entries): (i64, Vec<RawCandidate>) = serde_json::from_slice(bytes)?;
    Ok(entries)
}
