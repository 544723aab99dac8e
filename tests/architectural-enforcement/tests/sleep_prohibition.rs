//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Sky time moves only through the injected clock and
//! `Observatory::tick`. Production code MUST NOT sleep.
//! **Exceptions**: `tokio::time::interval` for the headless tick loop.

use architectural_enforcement::{all_production_lines, assert_no_violations};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations: Vec<String> = all_production_lines()
        .iter()
        .filter(|line| line.code.contains("::sleep(") || line.code.contains(".sleep("))
        .map(|line| line.describe())
        .collect();

    assert_no_violations(
        "Sleep calls found in production code!",
        &[
            "✅ ACCEPTABLE:",
            "  - tokio::time::interval() driving Observatory::tick",
            "  - ManualClock::set/advance in tests",
            "❌ FORBIDDEN:",
            "  - Sleeping until a timer is due (schedule it in the TimerRegistry)",
        ],
        &violations,
    );
}

/// Test that timers never read the wall clock directly
#[test]
fn test_no_instant_now_outside_clock() {
    let violations: Vec<String> = all_production_lines()
        .iter()
        .filter(|line| !line.path.ends_with("timers.rs"))
        .filter(|line| line.code.contains("Instant::now()"))
        .map(|line| line.describe())
        .collect();

    assert_no_violations(
        "Instant::now() used outside the clock!",
        &["Read time through the Clock trait so tests can drive it."],
        &violations,
    );
}
