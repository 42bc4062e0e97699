// SPDX-License-Identifier: MIT
// Completion engine — cache-or-gocode decision, candidate normalization,
// class-priority ordering.

use std::sync::Arc;

use tracing::debug;

use crate::config::AdapterConfig;

use super::model::{parse_wire, Candidate, CompletionRequest, RawCandidate, PANIC_CLASS, SOURCE_MARK};
use super::{binary, cache, context, AdapterError};

/// Host-provided error channel.
///
/// "binary not found" and "gocode panicked" must reach the user; every other
/// failure stays in the logs (fail-silent by policy, not by accident).
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Default notifier for headless use — errors go to the tracing pipeline.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// The five classes that participate in class-priority ordering, in their
/// bucket order. Entries of any other class do not survive priority
/// ordering (long-standing behavior — see `normalize`).
const SORT_BUCKETS: [&str; 5] = ["package", "func", "type", "var", "const"];

/// The completion adapter: one instance per host, constructed once with
/// read-only configuration, then called per keystroke.
pub struct Adapter {
    config: Arc<AdapterConfig>,
    notifier: Arc<dyn Notifier>,
}

impl Adapter {
    pub fn new(config: Arc<AdapterConfig>, notifier: Arc<dyn Notifier>) -> Self {
        Self { config, notifier }
    }

    /// Gather candidates for one keystroke.
    ///
    /// Strictly sequential: cache decision, then (on miss) a blocking gocode
    /// round-trip, then normalization. Every failure degrades to an empty
    /// list — never a fatal condition for the host.
    pub async fn gather_candidates(&self, req: &CompletionRequest) -> Vec<Candidate> {
        let raw = match self.fetch(req).await {
            Ok(entries) => entries,
            Err(AdapterError::BinaryNotFound) => {
                self.notifier.error("gocode binary not found");
                return Vec::new();
            }
        };

        // gocode signals an internal crash through its first result entry.
        if raw.first().is_some_and(|e| e.class == PANIC_CLASS) {
            self.notifier.error("gocode panicked");
            return Vec::new();
        }

        normalize(&raw, self.config.package_dot, &self.config.sort_class)
    }

    /// Produce raw entries, from the package cache when eligible, otherwise
    /// from a gocode subprocess round-trip.
    async fn fetch(&self, req: &CompletionRequest) -> Result<Vec<RawCandidate>, AdapterError> {
        if self.config.use_cache {
            if let Some(qualifier) = cache::package_qualifier(&req.input) {
                let imported = context::imported_packages(&req.buffer_lines);
                if let Some(entries) =
                    cache::lookup(&self.config.cache_dir, &qualifier, &imported)
                {
                    return Ok(entries);
                }
            }
        }

        let gocode = binary::resolve_binary(self.config.gocode_binary.as_deref())?;
        let offset = binary::cursor_byte_offset(
            &req.buffer_lines,
            req.cursor_line,
            &req.input,
            req.complete_position,
        );
        let source = req.buffer_lines.join("\n");

        match binary::invoke(&gocode, &req.buffer_name, offset, &source).await {
            Ok(stdout) => match parse_wire(&stdout) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    debug!(err = %e, "gocode output unparsable — no candidates");
                    Ok(Vec::new())
                }
            },
            Err(e) => {
                debug!(err = %e, "gocode invocation failed — no candidates");
                Ok(Vec::new())
            }
        }
    }
}

/// Turn raw entries into host candidates, optionally grouped by class
/// priority.
///
/// Per entry: the abbreviation is `name type` with the literal `" func"`
/// removed at its first occurrence only (a func type reads `Printf (format
/// string) ...` instead of `Printf func(format string) ...`); `info` keeps
/// the full type string. Package candidates get a trailing dot appended to
/// the inserted word when `package_dot` is set.
///
/// Ordering: with an empty `sort_class`, or for `import` entries, gocode's
/// own order is kept. Otherwise entries are bucketed by class and the
/// buckets emitted in the configured order, each preserving relative order.
/// Entries whose class is outside the five fixed buckets are dropped —
/// inherited behavior the cache format relies on; it is logged, not fixed.
pub fn normalize(
    entries: &[RawCandidate],
    package_dot: bool,
    sort_class: &[String],
) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(entries.len());
    let mut buckets: Vec<Vec<Candidate>> = vec![Vec::new(); SORT_BUCKETS.len()];

    for entry in entries {
        let abbr = format!("{} {}", entry.name, entry.type_desc).replacen(" func", "", 1);

        let mut word = entry.name.clone();
        if entry.class == "package" && package_dot {
            word.push('.');
        }

        let candidate = Candidate {
            word,
            abbr,
            kind: entry.class.clone(),
            info: entry.type_desc.clone(),
            menu: SOURCE_MARK.to_string(),
            dup: true,
        };

        if sort_class.is_empty() || entry.class == "import" {
            out.push(candidate);
        } else if let Some(i) = SORT_BUCKETS.iter().position(|b| *b == entry.class) {
            buckets[i].push(candidate);
        } else {
            debug!(class = %entry.class, name = %entry.name, "dropping entry with unbucketed class");
        }
    }

    for class in sort_class {
        if let Some(i) = SORT_BUCKETS.iter().position(|b| b == class) {
            out.append(&mut buckets[i]);
        }
    }

    out
}
