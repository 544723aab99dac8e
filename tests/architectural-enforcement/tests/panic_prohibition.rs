//! Integration Test: Panic Prohibition
//!
//! **Policy**: Production code propagates errors with `?` or degrades
//! gracefully. It MUST NOT call `.unwrap()` or `.expect()`.
//! **Exceptions**: Unit test modules, and the `unwrap_or*` family.

use architectural_enforcement::{all_production_lines, assert_no_violations};

/// Test that production code does not unwrap
#[test]
fn test_no_unwrap_in_production_code() {
    let violations: Vec<String> = all_production_lines()
        .iter()
        .filter(|line| {
            line.code.contains(".unwrap()")
                || line.code.contains(".expect(")
                || line.code.contains("panic!(")
        })
        .map(|line| line.describe())
        .collect();

    assert_no_violations(
        "unwrap/expect/panic found in production code!",
        &[
            "✅ ACCEPTABLE:",
            "  - ? with thiserror/anyhow errors",
            "  - unwrap_or, unwrap_or_default, unwrap_or_else",
            "  - #[cfg(test)] modules",
        ],
        &violations,
    );
}
