//! End-to-end assertion suites run by the `test` command.

use serde_json::Value;
use std::fmt::Display;

pub mod consumer;
pub mod primary;

/// Pass/fail counters. Every check prints its own outcome line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
}

impl Tally {
    pub fn check(&mut self, name: impl AsRef<str>, ok: bool) -> bool {
        self.record(name.as_ref(), ok, None::<&str>)
    }

    /// Like [`Tally::check`], printing `details` when the check fails.
    pub fn check_detail(&mut self, name: impl AsRef<str>, ok: bool, details: impl Display) -> bool {
        self.record(name.as_ref(), ok, Some(details))
    }

    fn record(&mut self, name: &str, ok: bool, details: Option<impl Display>) -> bool {
        if ok {
            self.passed += 1;
            println!("  ✅ {}", name);
        } else {
            self.failed += 1;
            match details {
                Some(d) => println!("  ❌ {} - {}", name, d),
                None => println!("  ❌ {}", name),
            }
        }
        ok
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Section header for a suite.
pub(crate) fn section(title: &str) {
    println!("\n{}", title);
    println!("{}", "─".repeat(40));
}

/// Field present on a JSON object (null counts as present).
pub(crate) fn has(v: &Value, field: &str) -> bool {
    v.get(field).is_some()
}

/// Path segment for a JSON id value.
pub(crate) fn segment(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
