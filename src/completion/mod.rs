// SPDX-License-Identifier: MIT
// Go completion pipeline — position resolution, cache-or-gocode decision,
// candidate normalization.

pub mod binary;
pub mod cache;
pub mod context;
pub mod engine;
pub mod handlers;
pub mod model;
pub mod position;

/// Failures that surface to the user via the host's error channel.
///
/// Everything else in the pipeline (malformed JSON, unreadable cache files,
/// gocode exiting nonzero) degrades to an empty candidate list with a debug
/// log only — a completion request is never fatal to the host.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// No usable gocode binary at the configured path or on $PATH.
    #[error("gocode binary not found")]
    BinaryNotFound,
}
