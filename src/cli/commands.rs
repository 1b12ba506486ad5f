use crate::error::HarnessError;
use crate::plan::plan_model::TestPlan;
use crate::plan::runner::PlanRunner;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::RunReport;
use crate::tally::host::DetachedHost;
use crate::tally::notifier::StdoutNotifier;
use crate::tally::tally::{Tally, TallyConfig};

// ============================================================================
// run subcommand
// ============================================================================

/// Replay plans and return whether the run was clean.
pub fn cmd_run(
    plan_path: &str,
    config: TallyConfig,
    debug: bool,
    format: &str,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let plans = load_plans(plan_path)?;
    if plans.iter().all(|p| p.suites.is_empty()) {
        return Err(HarnessError::EmptyPlan(plan_path.to_string()).into());
    }

    let mut tally = Tally::with_parts(
        config,
        Box::new(DetachedHost::new(debug)),
        Box::new(StdoutNotifier),
    );

    tally.init_run();
    for plan in &plans {
        PlanRunner::run(plan, &mut tally);
    }

    let report = tally.report();
    let clean = report.all_passed();

    // Console output is already live on stdout; close it with the summary.
    if format == "console" && output.is_none() {
        tally.final_summary();
        return Ok(clean);
    }

    let content = render_report(&report, format)?;
    match output {
        Some(path) => std::fs::write(path, &content).map_err(|source| HarnessError::Io {
            path: path.to_string(),
            source,
        })?,
        None => print!("{}", content),
    }

    Ok(clean)
}

/// Render a run report in the requested format. Unknown formats fall back
/// to console text.
pub fn render_report(report: &RunReport, format: &str) -> Result<String, HarnessError> {
    match format {
        "junit" => Ok(generate_junit_xml(report)),
        "json" => serde_json::to_string_pretty(report).map_err(HarnessError::ReportSerialize),
        _ => Ok(format_console_report(report)),
    }
}

/// Load plans from a single YAML file or a directory of YAML files.
pub fn load_plans(path: &str) -> Result<Vec<TestPlan>, HarnessError> {
    let io_err = |source| HarnessError::Io {
        path: path.to_string(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(io_err)?;
    if !metadata.is_dir() {
        return Ok(vec![load_plan_file(std::path::Path::new(path))?]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_err)? {
        let p = entry.map_err(io_err)?.path();
        if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            files.push(p);
        }
    }
    // Sort by file name for deterministic order
    files.sort();

    files.iter().map(|p| load_plan_file(p)).collect()
}

fn load_plan_file(path: &std::path::Path) -> Result<TestPlan, HarnessError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: display.clone(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| HarnessError::PlanParse {
        path: display,
        source,
    })
}
