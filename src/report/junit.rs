use crate::report::report_model::{FileRecord, MethodRecord, RunReport};

// ============================================================================
// JUnit XML reporter: standard CI integration format
// ============================================================================

/// Generate a JUnit XML document for CI systems.
///
/// Each test file becomes a `<testsuite>` and each method a `<testcase>`:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuites tests="2" failures="1">
///   <testsuite name="Suite A" file="suite_a.rs" tests="2" failures="1" assertions="5">
///     <testcase name="test_ok" classname="Suite A" file="suite_a.rs" line="10" assertions="2" />
///     <testcase name="test_bad" classname="Suite A" file="suite_a.rs" line="20" assertions="3">
///       <failure message="1 of 3 assertion(s) failed" type="AssertionFailure" />
///     </testcase>
///   </testsuite>
/// </testsuites>
/// ```
pub fn generate_junit_xml(report: &RunReport) -> String {
    let mut suites = String::new();
    for record in &report.files {
        suites.push_str(&junit_suite(record));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuites tests=\"{tests}\" failures=\"{failures}\">\n{suites}</testsuites>\n",
        tests = report.totals.methods.total,
        failures = report.totals.methods.failed,
        suites = suites,
    )
}

fn junit_suite(record: &FileRecord) -> String {
    let mut cases = String::new();
    for method in &record.method_records {
        cases.push_str(&junit_case(&record.suite, method));
    }

    format!(
        "  <testsuite name=\"{name}\" file=\"{file}\" tests=\"{tests}\" failures=\"{failures}\" assertions=\"{assertions}\">\n{cases}  </testsuite>\n",
        name = escape_xml(&record.suite),
        file = escape_xml(&record.file),
        tests = record.methods.total,
        failures = record.methods.failed,
        assertions = record.assertions.total,
        cases = cases,
    )
}

fn junit_case(suite: &str, method: &MethodRecord) -> String {
    let attrs = format!(
        "name=\"{}\" classname=\"{}\" file=\"{}\" line=\"{}\" assertions=\"{}\"",
        escape_xml(&method.name),
        escape_xml(suite),
        escape_xml(&method.location.file),
        method.location.line,
        method.assertions.total,
    );

    if !method.failed {
        return format!("    <testcase {} />\n", attrs);
    }

    let (message, kind) = match &method.aborted {
        Some(reason) => (reason.clone(), "Aborted"),
        None => (
            format!(
                "{} of {} assertion(s) failed",
                method.assertions.failed, method.assertions.total
            ),
            "AssertionFailure",
        ),
    };

    format!(
        "    <testcase {attrs}>\n      <failure message=\"{message}\" type=\"{kind}\" />\n    </testcase>\n",
        attrs = attrs,
        message = escape_xml(&message),
        kind = kind,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
