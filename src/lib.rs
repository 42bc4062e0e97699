// SPDX-License-Identifier: MIT
//! gocoda — Go completion adapter.
//!
//! Bridges an editor host to the external `gocode` analysis binary: resolves
//! the completion position on the current line, decides between the on-disk
//! package cache and a gocode subprocess round-trip, and normalizes the
//! result into host-facing candidate records.

pub mod completion;
pub mod config;

use std::sync::Arc;

use completion::engine::Notifier;
use config::AdapterConfig;

/// Shared state passed to every completion handler.
///
/// Captured once at construction and read-only afterwards — requests are
/// handled strictly sequentially, so no locking is needed.
#[derive(Clone)]
pub struct AdapterContext {
    pub config: Arc<AdapterConfig>,
    /// Host-provided error channel for user-visible failures.
    pub notifier: Arc<dyn Notifier>,
}
