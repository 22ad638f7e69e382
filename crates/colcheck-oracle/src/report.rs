//! Comparison outcomes and their human-readable rendering.

use serde::{Deserialize, Serialize};

/// Result of one full comparison run.  Divergences are data, not errors:
/// the caller (test harness, CLI) decides how to fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    /// Every row matched; `rows_compared` may be zero (an empty file against
    /// an empty golden is a pass).
    Match { rows_compared: u64 },
    /// First canonical-text divergence, reported fail-fast.
    ContentMismatch {
        row_index: u64,
        expected: String,
        actual: String,
    },
    /// The reader produced a row at `row_index` but the golden stream had
    /// already ended.
    GoldenExhausted { row_index: u64 },
    /// The reader ended while the golden stream still held `remaining` rows.
    ActualExhausted { remaining: u64 },
}

impl ComparisonOutcome {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

/// Render a divergence report for humans; one line for a match.
#[must_use]
pub fn format_divergence(outcome: &ComparisonOutcome) -> String {
    use std::fmt::Write as _;

    match outcome {
        ComparisonOutcome::Match { rows_compared } => {
            format!("match: {rows_compared} row(s) compared")
        }
        ComparisonOutcome::ContentMismatch {
            row_index,
            expected,
            actual,
        } => {
            let mut out = String::new();
            let _ = writeln!(out, "=== CONTENT MISMATCH at row {row_index} ===");
            let _ = writeln!(out, "expected: {expected}");
            let _ = writeln!(out, "actual:   {actual}");
            out
        }
        ComparisonOutcome::GoldenExhausted { row_index } => format!(
            "golden exhausted: reader produced row {row_index} but the golden stream has no more lines"
        ),
        ComparisonOutcome::ActualExhausted { remaining } => format!(
            "reader exhausted: {remaining} golden line(s) left unread"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_match() {
        assert!(ComparisonOutcome::Match { rows_compared: 0 }.is_match());
        assert!(!ComparisonOutcome::GoldenExhausted { row_index: 3 }.is_match());
    }

    #[test]
    fn divergence_report_names_the_row() {
        let text = format_divergence(&ComparisonOutcome::ContentMismatch {
            row_index: 7,
            expected: "{\"a\":1}".to_owned(),
            actual: "{\"a\":2}".to_owned(),
        });
        assert!(text.contains("row 7"));
        assert!(text.contains("expected"));
        assert!(text.contains("actual"));
    }

    #[test]
    fn outcome_serializes_with_verdict_tag() {
        let json =
            serde_json::to_string(&ComparisonOutcome::ActualExhausted { remaining: 2 }).unwrap();
        assert!(json.contains("\"verdict\":\"actual_exhausted\""), "got {json}");
    }
}
