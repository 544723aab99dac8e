//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async production code MUST NOT use blocking I/O.
//! **Required**: `reqwest` async client for classifiers, `tokio::io` for stdin
//! and stdout.
//! **Exceptions**: Non-async functions such as config loading, which runs
//! before the sky starts.

use architectural_enforcement::{
    assert_no_violations, in_async_fn, production_lines, production_roots, rust_files,
};

const ALWAYS_FORBIDDEN: &[&str] = &["reqwest::blocking", "std::net::", "use std::net"];
const FORBIDDEN_IN_ASYNC: &[&str] = &["std::fs::", "std::io::stdin", "std::io::stdout"];

/// Test that production code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_production_code() {
    let mut violations = Vec::new();

    for root in production_roots() {
        for file in rust_files(&root) {
            let lines = production_lines(&file);
            for (idx, line) in lines.iter().enumerate() {
                if ALWAYS_FORBIDDEN.iter().any(|p| line.code.contains(p)) {
                    violations.push(format!("Blocking I/O: {}", line.describe()));
                    continue;
                }
                if in_async_fn(&lines, idx)
                    && FORBIDDEN_IN_ASYNC.iter().any(|p| line.code.contains(p))
                {
                    violations.push(format!("Blocking I/O in async fn: {}", line.describe()));
                }
            }
        }
    }

    assert_no_violations(
        "Blocking I/O calls found in production code!",
        &[
            "❌ FORBIDDEN blocking I/O:",
            "  - reqwest::blocking::*",
            "  - std::net::TcpStream, std::net::TcpListener",
            "  - std::fs / std::io::stdin inside async functions",
            "✅ REQUIRED async I/O:",
            "  - reqwest::Client::post().send().await",
            "  - tokio::io::stdin(), tokio::io::stdout()",
        ],
        &violations,
    );
}
