// SPDX-License-Identifier: MIT
// Completion RPC handlers.
//
// completion.position — resolve the start offset of the token under the cursor.
// completion.candidates — run the full gather pipeline for one keystroke.

use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;

use crate::AdapterContext;

use super::engine::Adapter;
use super::model::CompletionRequest;
use super::position;

/// `completion.position` — where does the token being completed start?
///
/// Params: `{ "input": "<current line text up to the cursor>" }`.
/// Returns `{ "position": <character offset> }`, or `{ "position": -1 }`
/// when the line offers nothing to complete (the host suppresses the
/// request). The offset is a character count, not bytes — the host's column
/// arithmetic is character-based, and `completePosition` is consumed as a
/// character column when computing the gocode byte offset.
pub fn complete_position(params: Value) -> Result<Value> {
    let input = params
        .get("input")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("invalid type: input must be a string"))?;

    let position = position::complete_position(input)
        .map(|p| input[..p].chars().count() as i64)
        .unwrap_or(-1);

    Ok(json!({ "position": position }))
}

/// `completion.candidates` — gather the ordered candidate list.
pub async fn gather_candidates(params: Value, ctx: &AdapterContext) -> Result<Value> {
    let req: CompletionRequest = serde_json::from_value(params)?;

    debug!(
        buffer = %req.buffer_name,
        cursor = ?(req.cursor_line, req.complete_position),
        "completion.candidates requested"
    );

    let adapter = Adapter::new(ctx.config.clone(), ctx.notifier.clone());
    let candidates = adapter.gather_candidates(&req).await;

    debug!(candidates = candidates.len(), "completion returned");

    Ok(json!({ "candidates": candidates }))
}
