// SPDX-License-Identifier: MIT
// End-to-end tests for the completion pipeline: position resolution, import
// extraction, cache decision, gocode invocation, and normalization.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use gocoda::completion::binary::cursor_byte_offset;
use gocoda::completion::cache;
use gocoda::completion::context::imported_packages;
use gocoda::completion::handlers;
use gocoda::completion::engine::{normalize, Adapter, Notifier};
use gocoda::completion::model::{CompletionRequest, RawCandidate};
use gocoda::completion::position::complete_position;
use gocoda::config::AdapterConfig;

// ─── Fixtures ─────────────────────────────────────────────────────────────────

/// Notifier that records every user-visible error message.
#[derive(Default)]
struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

impl RecordingNotifier {
    fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

fn lines(src: &str) -> Vec<String> {
    src.lines().map(str::to_string).collect()
}

fn request(input: &str, buffer: &str, cursor_line: usize) -> CompletionRequest {
    serde_json::from_value(serde_json::json!({
        "input": input,
        "completePosition": input.len(),
        "bufferLines": lines(buffer),
        "bufferName": "/tmp/main.go",
        "cursorLine": cursor_line,
    }))
    .unwrap()
}

fn adapter_with(config: AdapterConfig) -> (Adapter, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let adapter = Adapter::new(Arc::new(config), notifier.clone());
    (adapter, notifier)
}

/// True when a real gocode happens to be installed on this machine — the
/// not-found assertions only hold without one.
fn gocode_on_path() -> bool {
    gocoda::completion::binary::resolve_binary(None).is_ok()
}

// ─── Position resolution ──────────────────────────────────────────────────────

#[test]
fn position_of_bare_identifier_run() {
    assert_eq!(complete_position("    fm"), Some(4));
}

#[test]
fn position_inside_open_quoted_string() {
    assert_eq!(complete_position("import \"github.com/us"), Some(8));
}

#[test]
fn position_none_when_nothing_to_complete() {
    assert_eq!(complete_position("foo("), None);
}

#[test]
fn position_right_after_package_dot() {
    // The cache-eligible trigger: nothing typed after the qualifier yet.
    assert_eq!(complete_position("fmt."), Some(4));
}

#[test]
fn position_round_trips_through_multibyte_text() {
    // The handler hands the host a character column; the byte offset fed to
    // gocode must land on the same spot when the line holds multi-byte text.
    let input = "é.Pr";
    let result = handlers::complete_position(serde_json::json!({ "input": input })).unwrap();
    assert_eq!(result["position"], 2);

    let buf = lines(input);
    // Column 2 covers `é.` — 3 bytes, where the member token starts.
    assert_eq!(cursor_byte_offset(&buf, 1, input, 2), 3);
}

// ─── Import extraction ────────────────────────────────────────────────────────

#[test]
fn import_block_yields_stripped_names() {
    let buf = lines("import (\n\t\"fmt\"\n\t\"os\"\n)");
    assert_eq!(imported_packages(&buf), vec!["fmt", "os"]);
}

// ─── Normalization ────────────────────────────────────────────────────────────

fn entry(name: &str, type_desc: &str, class: &str) -> RawCandidate {
    RawCandidate {
        name: name.to_string(),
        type_desc: type_desc.to_string(),
        class: class.to_string(),
    }
}

#[test]
fn class_priority_orders_buckets() {
    let entries = [
        entry("f", "func()", "func"),
        entry("p", "package", "package"),
        entry("v", "int", "var"),
    ];
    let order: Vec<String> = ["package", "func", "type", "var", "const"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let out = normalize(&entries, false, &order);
    let kinds: Vec<&str> = out.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, vec!["package", "func", "var"]);
}

#[test]
fn func_type_abbreviation() {
    let out = normalize(&[entry("name", "func(x int)", "func")], false, &[]);
    assert_eq!(out[0].abbr, "name(x int)");
    assert_eq!(out[0].info, "func(x int)");
}

// ─── Cache dump naming ────────────────────────────────────────────────────────

#[test]
fn cache_dump_name_is_exact_concatenation() {
    let path = cache::cache_path(std::path::Path::new("/d"), "fmt.");
    // "fmt." + "json" — no separator, no extra dot.
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), "fmt.json");
}

// ─── Gather pipeline ──────────────────────────────────────────────────────────

#[tokio::test]
async fn cache_hit_bypasses_gocode() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("fmt.json"),
        br#"[2, [
            {"name": "Println", "type": "func(a ...interface{}) (n int, err error)", "class": "func"},
            {"name": "Printf", "type": "func(format string, a ...interface{}) (n int, err error)", "class": "func"}
        ]]"#,
    )
    .unwrap();

    // gocode_binary points at a path that cannot exist: if the cache were
    // bypassed, the pipeline would report binary-not-found. A clean result
    // with no errors proves the subprocess was never launched.
    let (adapter, notifier) = adapter_with(AdapterConfig {
        use_cache: true,
        cache_dir: dir.path().to_path_buf(),
        gocode_binary: Some(PathBuf::from("/nonexistent/gocode")),
        ..AdapterConfig::default()
    });

    // "fmt" is NOT imported by the buffer — cache is eligible.
    let req = request("fmt.", "package main\n\nfunc main() {\n\tfmt.\n}", 4);
    let out = adapter.gather_candidates(&req).await;

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].word, "Println");
    assert_eq!(out[1].word, "Printf");
    assert!(notifier.errors().is_empty(), "no error may be reported on a cache hit");
}

#[tokio::test]
async fn imported_package_skips_cache() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("fmt.json"),
        br#"[1, [{"name": "Println", "type": "func()", "class": "func"}]]"#,
    )
    .unwrap();

    if gocode_on_path() {
        return; // cannot observe the fallback path deterministically
    }

    let (adapter, notifier) = adapter_with(AdapterConfig {
        use_cache: true,
        cache_dir: dir.path().to_path_buf(),
        gocode_binary: Some(PathBuf::from("/nonexistent/gocode")),
        ..AdapterConfig::default()
    });

    // "fmt" IS imported — the request must fall through to gocode, which is
    // not available here, so the binary-not-found error surfaces.
    let req = request(
        "fmt.",
        "package main\n\nimport (\n\t\"fmt\"\n)\n\nfunc main() {\n\tfmt.\n}",
        8,
    );
    let out = adapter.gather_candidates(&req).await;
    assert!(out.is_empty());
    assert_eq!(notifier.errors(), vec!["gocode binary not found"]);
}

#[tokio::test]
async fn binary_not_found_reports_error_and_no_candidates() {
    if gocode_on_path() {
        return;
    }

    let (adapter, notifier) = adapter_with(AdapterConfig {
        gocode_binary: Some(PathBuf::from("/nonexistent/gocode")),
        ..AdapterConfig::default()
    });

    let req = request("fmt.Pr", "package main\n\nfmt.Pr", 3);
    let out = adapter.gather_candidates(&req).await;
    assert!(out.is_empty());
    assert_eq!(notifier.errors(), vec!["gocode binary not found"]);
}

#[cfg(unix)]
mod with_fake_gocode {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable shell script that prints `payload` on stdout.
    fn fake_gocode(dir: &std::path::Path, payload: &str) -> PathBuf {
        let bin = dir.join("gocode");
        std::fs::write(&bin, format!("#!/bin/sh\ncat >/dev/null\nprintf '%s' '{payload}'\n"))
            .unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
        bin
    }

    #[tokio::test]
    async fn panic_marker_reports_error_and_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_gocode(
            dir.path(),
            r#"[1, [{"name": "PANIC", "type": "PANIC", "class": "PANIC"}]]"#,
        );

        let (adapter, notifier) = adapter_with(AdapterConfig {
            gocode_binary: Some(bin),
            ..AdapterConfig::default()
        });

        let req = request("fmt.Pr", "package main\n\nfmt.Pr", 3);
        let out = adapter.gather_candidates(&req).await;
        assert!(out.is_empty());
        assert_eq!(notifier.errors(), vec!["gocode panicked"]);
    }

    #[tokio::test]
    async fn gocode_results_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_gocode(
            dir.path(),
            r#"[1, [{"name": "Println", "type": "func(a ...interface{}) (n int, err error)", "class": "func"}]]"#,
        );

        let (adapter, notifier) = adapter_with(AdapterConfig {
            gocode_binary: Some(bin),
            ..AdapterConfig::default()
        });

        let req = request("fmt.Pr", "package main\n\nfmt.Pr", 3);
        let out = adapter.gather_candidates(&req).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].word, "Println");
        assert_eq!(out[0].abbr, "Println(a ...interface{}) (n int, err error)");
        assert_eq!(out[0].menu, "[Go]");
        assert!(out[0].dup);
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn large_buffer_and_chatty_child_do_not_deadlock() {
        let dir = tempfile::tempdir().unwrap();
        // A child that floods stdout past the pipe buffer before reading any
        // of its input: stdin feeding and output draining must overlap.
        let bin = dir.path().join("gocode");
        std::fs::write(
            &bin,
            "#!/bin/sh\ndd if=/dev/zero bs=1024 count=256 2>/dev/null | tr '\\0' 'x'\ncat >/dev/null\n",
        )
        .unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let (adapter, notifier) = adapter_with(AdapterConfig {
            gocode_binary: Some(bin),
            ..AdapterConfig::default()
        });

        // A buffer well past the pipe buffer size in the other direction.
        let big_line = "x".repeat(1024);
        let buffer = vec![big_line; 256].join("\n");
        let req = request("fmt.Pr", &buffer, 1);

        let out = adapter.gather_candidates(&req).await;
        // The flood is not valid JSON, so the request fails silent.
        assert!(out.is_empty());
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn malformed_gocode_output_fails_silent() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_gocode(dir.path(), "not json at all");

        let (adapter, notifier) = adapter_with(AdapterConfig {
            gocode_binary: Some(bin),
            ..AdapterConfig::default()
        });

        let req = request("fmt.Pr", "package main\n\nfmt.Pr", 3);
        let out = adapter.gather_candidates(&req).await;
        assert!(out.is_empty());
        // Fail-silent by policy: nothing is surfaced to the user.
        assert!(notifier.errors().is_empty());
    }
}
