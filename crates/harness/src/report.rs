use serde_json::json;

use crate::harness::runner::SuiteOutcome;

const RULE_WIDTH: usize = 60;
const NAME_WIDTH: usize = 40;

/// Render the human-readable summary: one line per probe in execution
/// order, then the totals. Pure function of the outcome.
pub fn render_text(outcome: &SuiteOutcome) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str("CONFORMANCE SUMMARY\n");
    out.push_str(&rule);
    out.push('\n');

    for result in &outcome.results {
        let status = if result.passed { "PASSED" } else { "FAILED" };
        out.push_str(&format!(
            "{:.<width$} {}\n",
            result.name,
            status,
            width = NAME_WIDTH
        ));
        if !result.passed {
            if let Some(error) = &result.error {
                out.push_str(&format!("    error: {error}\n"));
            }
            if let Some(detail) = &result.detail {
                out.push_str(&format!("    detail: {detail}\n"));
            }
        }
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "Total: {} passed, {} failed\n",
        outcome.passed_count, outcome.failed_count
    ));
    out
}

/// Machine-readable rendering of the same outcome.
pub fn render_json(outcome: &SuiteOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "results": outcome.results,
        "passed": outcome.passed_count,
        "failed": outcome.failed_count,
        "total": outcome.total(),
    }))
}

/// Process exit status for the run: 0 iff every probe passed.
pub fn exit_code(outcome: &SuiteOutcome) -> i32 {
    if outcome.all_passed() {
        0
    } else {
        1
    }
}
