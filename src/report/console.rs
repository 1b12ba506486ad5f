use crate::report::report_model::{FileRecord, RunReport};
use crate::tally::counters::{RunTier, TierCount};

// ============================================================================
// Console reporter: line-oriented terminal output
// ============================================================================

pub const RULE: &str = "=======================================================";

pub fn status_tag(failed: bool) -> &'static str {
    if failed { "FAILED" } else { "PASSED" }
}

/// `tot | pass | fail` columns shared by every tally line.
pub fn format_counts(counts: TierCount) -> String {
    format!(
        "[tot {:5} | pass {:5} | fail {:5}]",
        counts.total,
        counts.passed(),
        counts.failed
    )
}

/// Line printed when a method scope closes.
pub fn format_method_line(assertions: TierCount) -> String {
    format!(
        "[{}]     - assertions {}",
        status_tag(!assertions.all_passed()),
        format_counts(assertions)
    )
}

/// Summary printed when a file scope closes.
///
/// ```text
/// [FAILED] - Suite A              - suite_a.rs
///               - assertions [tot     3 | pass     2 | fail     1]
///               - methods    [tot     1 | pass     0 | fail     1]
/// ```
pub fn format_file_summary(record: &FileRecord) -> Vec<String> {
    vec![
        format!(
            "[{}] - {:<20} - {}",
            status_tag(!record.passed()),
            record.suite,
            record.file
        ),
        format!("              - assertions {}", format_counts(record.assertions)),
        format!("              - methods    {}", format_counts(record.methods)),
    ]
}

/// The closing summary over the whole run: files, assertions, methods.
pub fn format_final_summary(totals: &RunTier) -> Vec<String> {
    let tiers = [
        ("files     ", totals.files),
        ("assertions", totals.assertions),
        ("methods   ", totals.methods),
    ];

    let mut lines = vec![
        RULE.to_string(),
        "=== Summary of test files".to_string(),
        RULE.to_string(),
    ];
    for (label, counts) in tiers {
        lines.push(format!(
            "[{}]     - {} {}",
            status_tag(!counts.all_passed()),
            label,
            format_counts(counts)
        ));
    }
    lines.push(RULE.to_string());
    lines
}

/// Render a finished run as plain text: each file summary followed by the
/// final summary.
pub fn format_console_report(report: &RunReport) -> String {
    let mut out = String::new();

    for record in &report.files {
        for line in format_file_summary(record) {
            out.push_str(&line);
            out.push('\n');
        }
        for method in record.method_records.iter().filter(|m| m.failed) {
            let reason = method.aborted.as_deref().unwrap_or("assertion failures");
            out.push_str(&format!(
                "    [FAIL] {} ({}): {}\n",
                method.name, method.location, reason
            ));
        }
    }

    for line in format_final_summary(&report.totals) {
        out.push_str(&line);
        out.push('\n');
    }

    out
}
