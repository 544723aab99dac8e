//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles
//! on the Moonlit core:
//! - Time only moves through the clock, never through sleeping
//! - Classifier I/O stays async
//! - Production code propagates errors instead of panicking
//!
//! The helpers here walk the production sources and hand each test the lines it
//! needs to inspect. Unit test modules (everything after `#[cfg(test)]`) are
//! never scanned.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source directories, relative to this package
pub const PRODUCTION_DIRS: &[&str] = &["../../moonlit/core/src"];

/// A single source line
#[derive(Debug, Clone)]
pub struct SourceLine {
    /// File the line came from
    pub path: PathBuf,
    /// 1-based line number
    pub number: usize,
    /// Line text with trailing `//` comments removed
    pub code: String,
    /// Original line text
    pub text: String,
}

impl SourceLine {
    /// `path:line - text`, for violation reports
    pub fn describe(&self) -> String {
        format!("{}:{} - {}", self.path.display(), self.number, self.text.trim())
    }
}

/// Absolute paths of the production directories
pub fn production_roots() -> Vec<PathBuf> {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    PRODUCTION_DIRS
        .iter()
        .map(|dir| manifest_dir.join(dir))
        .collect()
}

/// Every `.rs` file under `root`
pub fn rust_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Lines of a file up to its unit test module
pub fn production_lines(path: &Path) -> Vec<SourceLine> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| SourceLine {
            path: path.to_path_buf(),
            number: idx + 1,
            code: strip_comment(line).to_string(),
            text: line.to_string(),
        })
        .collect()
}

/// All production lines across every production directory
pub fn all_production_lines() -> Vec<SourceLine> {
    production_roots()
        .iter()
        .flat_map(|root| rust_files(root))
        .flat_map(|file| production_lines(&file))
        .collect()
}

/// Code before a `//` comment
///
/// A `//` inside a string literal (URLs) also cuts the line; that only ever
/// hides text, it never invents a match.
pub fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Whether the function enclosing `idx` is `async`
///
/// Scans backwards for the nearest `fn` signature.
pub fn in_async_fn(lines: &[SourceLine], idx: usize) -> bool {
    for line in lines[..=idx].iter().rev() {
        let code = line.code.trim_start();
        let signature = ["pub ", "pub(crate) ", "async ", "const "]
            .iter()
            .fold(code, |acc, prefix| acc.strip_prefix(prefix).unwrap_or(acc));
        if signature.starts_with("fn ") {
            return code.contains("async fn ");
        }
    }
    false
}

/// Print the report and fail if there are violations
pub fn assert_no_violations(title: &str, hint: &[&str], violations: &[String]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ CRITICAL: {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    eprintln!();
    for line in hint {
        eprintln!("  {line}");
    }

    panic!(
        "\nFound {} violation(s) in production code.\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(code: &str) -> SourceLine {
        SourceLine {
            path: PathBuf::from("x.rs"),
            number: 1,
            code: strip_comment(code).to_string(),
            text: code.to_string(),
        }
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("let x = 1; // note"), "let x = 1; ");
        assert_eq!(strip_comment("/// docs"), "");
    }

    #[test]
    fn test_in_async_fn() {
        let lines = vec![
            line("pub async fn tick(&mut self) -> usize {"),
            line("    let now = self.clock.now();"),
            line("}"),
            line("pub fn snapshot(&self) -> Vec<BodySnapshot> {"),
            line("    let now = self.clock.now();"),
        ];
        assert!(in_async_fn(&lines, 1));
        assert!(!in_async_fn(&lines, 4));
    }

    #[test]
    fn test_production_sources_found() {
        let files: Vec<_> = production_roots()
            .iter()
            .flat_map(|root| rust_files(root))
            .collect();
        assert!(
            files.iter().any(|f| f.ends_with("observatory.rs")),
            "production sources should be discoverable from {:?}",
            production_roots()
        );
    }
}
