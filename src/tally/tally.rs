use serde::{Deserialize, Serialize};

use crate::exec::strategy::{ExecutionMode, MethodOutcome, TestFault};
use crate::report::console::{RULE, format_file_summary, format_final_summary, format_method_line};
use crate::report::report_model::{FileRecord, MethodRecord, RunReport};
use crate::tally::context::{MethodContext, SourceLocation};
use crate::tally::counters::Counters;
use crate::tally::host::{DetachedHost, Fixture, HostFramework};
use crate::tally::notifier::{Notifier, StdoutNotifier};
use crate::tally::verbosity::Verbosity;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind};

/// Settings fixed for the lifetime of a `Tally`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub verbosity: Verbosity,

    #[serde(default)]
    pub mode: ExecutionMode,

    /// JSONL trace file; tracing is off when unset
    #[serde(default)]
    pub trace_path: Option<String>,
}

/// Owns every counter of a test run and the scope controllers acting on
/// them.
///
/// One `Tally` is created by the harness driver and threaded through each
/// file, method, and assertion. It assumes one method executes at a time.
pub struct Tally {
    pub(super) config: TallyConfig,
    pub(super) counters: Counters,
    pub(super) context: Option<MethodContext>,
    pub(super) host: Box<dyn HostFramework>,
    pub(super) notifier: Box<dyn Notifier>,
    pub(super) tracer: Option<TraceLogger>,
    finished_files: Vec<FileRecord>,
    file_methods: Vec<MethodRecord>,
}

impl Tally {
    pub fn new(config: TallyConfig) -> Self {
        Self::with_parts(
            config,
            Box::new(DetachedHost::default()),
            Box::new(StdoutNotifier),
        )
    }

    pub fn with_parts(
        config: TallyConfig,
        host: Box<dyn HostFramework>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let tracer = config.trace_path.as_deref().map(TraceLogger::new);
        Tally {
            config,
            counters: Counters::new(),
            context: None,
            host,
            notifier,
            tracer,
            finished_files: Vec::new(),
            file_methods: Vec::new(),
        }
    }

    pub fn config(&self) -> &TallyConfig {
        &self.config
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn method_context(&self) -> Option<&MethodContext> {
        self.context.as_ref()
    }

    pub fn shows(&self, level: Verbosity) -> bool {
        self.config.verbosity.shows(level)
    }

    pub fn notify(&mut self, line: &str) {
        self.notifier.notify(line);
    }

    pub(super) fn trace(&self, event: TraceEvent) {
        if let Some(tracer) = &self.tracer {
            tracer.log(&event);
        }
    }

    // ========================================================================
    // Run scope
    // ========================================================================

    /// Zero every counter and forget finished files.
    pub fn init_run(&mut self) {
        self.counters.reset_run();
        self.context = None;
        self.finished_files.clear();
        self.file_methods.clear();
        self.trace(TraceEvent::now(TraceKind::RunInit));
    }

    /// Print the files / assertions / methods totals.
    pub fn final_summary(&mut self) {
        for line in format_final_summary(&self.counters.run) {
            self.notify(&line);
        }
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            totals: self.counters.run,
            files: self.finished_files.clone(),
        }
    }

    /// Run one test method under the configured execution strategy.
    pub fn run_test<F>(&mut self, fixture: &mut dyn Fixture, test_name: &str, mut body: F)
    where
        F: FnMut(&mut Tally) -> Result<(), TestFault>,
    {
        let strategy = self.config.mode.strategy();
        strategy.run_test(self, fixture, test_name, &mut body);
    }

    // ========================================================================
    // File scope
    // ========================================================================

    pub fn start_file(&mut self, suite: &str, file: &str) {
        self.counters.reset_file();
        self.counters.count_file_run();
        self.file_methods.clear();

        if self.shows(Verbosity::TestMethods) {
            self.notify("");
            self.notify(RULE);
            self.notify(&format!("--- Running Test Suite: {} ---", suite));
            self.notify(&format!("---         Test File:  {} ---", file));
            self.notify(RULE);
        }

        self.trace(
            TraceEvent::now(TraceKind::FileStart)
                .with_name(suite)
                .with_location(file),
        );
    }

    /// Close the file scope, counting the file as failed when any of its
    /// methods failed.
    pub fn end_file(&mut self, suite: &str, file: &str) -> FileRecord {
        let tier = self.counters.file;
        if tier.methods.failed > 0 {
            self.counters.count_file_failed();
        }

        let record = FileRecord {
            suite: suite.to_string(),
            file: file.to_string(),
            methods: tier.methods,
            assertions: tier.assertions,
            method_records: std::mem::take(&mut self.file_methods),
        };

        if self.shows(Verbosity::TestMethods) {
            self.notify(RULE);
            self.notify(&format!("--- Completed Test Suite: {} ---", suite));
            self.notify(RULE);
        }
        if self.shows(Verbosity::TestFiles) {
            for line in format_file_summary(&record) {
                self.notify(&line);
            }
        }

        self.trace(
            TraceEvent::now(TraceKind::FileEnd)
                .with_name(suite)
                .with_location(file)
                .with_assertions(tier.assertions)
                .with_methods(tier.methods),
        );

        self.finished_files.push(record.clone());
        record
    }

    // ========================================================================
    // Method scope
    // ========================================================================

    pub fn start_method(&mut self, name: &str, file: &str, line: u32) {
        let location = SourceLocation::new(file, line);
        self.counters.reset_method();
        self.counters.count_method_run();

        self.trace(
            TraceEvent::now(TraceKind::MethodStart)
                .with_name(name)
                .with_location(&location),
        );
        self.context = Some(MethodContext::open(name, location));

        if self.shows(Verbosity::TestMethods) {
            self.notify(&format!("===== {}", name));
        }
    }

    /// Close the method scope and roll its assertions into the file tier.
    ///
    /// Calling this twice for one method counts it twice.
    pub fn end_method(&mut self) -> MethodOutcome {
        let assertions = self.counters.method.assertions;
        let failed = assertions.failed > 0;

        if failed {
            self.counters.count_method_failed();
        }
        self.counters.flush_method_into_file();

        if self.shows(Verbosity::TestMethods) {
            self.notify(&format_method_line(assertions));
        }

        let (name, location) = match self.context.as_mut() {
            Some(ctx) => {
                if failed {
                    ctx.mark_failure_recorded();
                }
                ctx.finalize();
                (ctx.name.clone(), ctx.location.clone())
            }
            None => ("<unknown>".to_string(), SourceLocation::unknown()),
        };

        self.trace(
            TraceEvent::now(TraceKind::MethodEnd)
                .with_name(&name)
                .with_location(&location)
                .with_assertions(assertions),
        );
        self.file_methods.push(MethodRecord {
            name,
            location,
            assertions,
            failed,
            aborted: None,
        });

        match self.config.mode {
            ExecutionMode::Unwinding if failed => MethodOutcome::Aborted(format!(
                "{} of {} assertion(s) failed",
                assertions.failed, assertions.total
            )),
            _ => MethodOutcome::Continue,
        }
    }

    // ========================================================================
    // Abort recovery (exception-assisted)
    // ========================================================================

    /// Whether a method was started but has not been finalized yet.
    pub fn method_in_flight(&self) -> bool {
        self.context.as_ref().is_some_and(MethodContext::is_open)
    }

    pub fn clear_method_context(&mut self) {
        self.context = None;
    }

    /// Attribute an abnormal end to the in-flight method.
    ///
    /// The method is counted as failed at most once and its partial
    /// assertions are flushed at most once, however many times this runs.
    pub fn record_aborted_method(&mut self, reason: &str) {
        let Some(ctx) = self.context.as_mut() else {
            // Nothing was started, so only the run-level tally can take it.
            self.counters.count_raw_failure();
            self.report_abort("<unknown>", &SourceLocation::unknown(), reason);
            return;
        };

        let newly_failed = !ctx.failure_recorded;
        let was_open = ctx.is_open();
        ctx.mark_failure_recorded();
        ctx.finalize();
        let name = ctx.name.clone();
        let location = ctx.location.clone();

        if newly_failed {
            self.counters.count_method_failed();
            self.counters.count_raw_failure();
        }

        if was_open {
            self.counters.flush_method_into_file();
            self.file_methods.push(MethodRecord {
                name: name.clone(),
                location: location.clone(),
                assertions: self.counters.method.assertions,
                failed: true,
                aborted: Some(reason.to_string()),
            });
        } else if let Some(last) = self.file_methods.last_mut() {
            last.failed = true;
            last.aborted = Some(reason.to_string());
        }

        self.report_abort(&name, &location, reason);
    }

    fn report_abort(&mut self, name: &str, location: &SourceLocation, reason: &str) {
        if self.shows(Verbosity::TestMethods) {
            self.notify(&format!(
                "[ABORTED]     - {} ({}) : {}",
                name, location, reason
            ));
        }
        self.trace(
            TraceEvent::now(TraceKind::MethodAborted)
                .with_name(name)
                .with_location(location)
                .with_detail(reason)
                .with_assertions(self.counters.method.assertions),
        );
    }

    /// setUp failed: a run-level failure, no method attribution.
    pub fn record_setup_failure(&mut self, test_name: &str, message: &str) {
        self.host.set_current_test_failed(true);
        self.counters.count_raw_failure();
        self.notify(&format!(
            "    [EXCEPTION] setUp for {} failed: {}",
            test_name, message
        ));
        self.trace(
            TraceEvent::now(TraceKind::SetupFailed)
                .with_name(test_name)
                .with_detail(message),
        );
    }

    /// Report a fault without touching any counter.
    pub fn record_exception(&mut self, kind: TraceKind, test_name: &str, line: &str) {
        self.notify(line);
        self.trace(
            TraceEvent::now(kind)
                .with_name(test_name)
                .with_detail(line.trim()),
        );
    }

    /// Report a fault and count it as a run-level failure.
    pub fn record_run_failure(&mut self, kind: TraceKind, test_name: &str, line: &str) {
        self.host.set_current_test_failed(true);
        self.counters.count_raw_failure();
        self.record_exception(kind, test_name, line);
    }

    // ========================================================================
    // Raw failure counter
    // ========================================================================

    /// Every failure recorded since the last reset.
    pub fn failure_count(&self) -> u32 {
        self.counters.run.failures
    }

    pub fn reset_failures(&mut self) {
        self.counters.reset_raw_failures();
    }

    /// Announce recorded failures and let the host framework know about
    /// them.
    pub fn failure_report(&mut self) {
        let failures = self.failure_count();
        if failures > 0 {
            self.notify(&format!(
                "=== TEST SUMMARY: {} failures recorded ===",
                failures
            ));
            self.host.set_current_test_failed(true);
        } else if self.host.debug_mode() {
            self.notify("=== TEST SUMMARY: All assertions passed ===");
        }
    }

    /// Returns `false`, and flags the host, when any failure was recorded.
    pub fn assert_no_failures(&mut self) -> bool {
        let failures = self.failure_count();
        if failures == 0 {
            return true;
        }
        self.notify(&format!(
            "CRITICAL: Test had {} assertion failures!",
            failures
        ));
        self.host.set_current_test_failed(true);
        false
    }

    pub fn progress_report(&mut self) {
        let assertions = self.counters.run.assertions;
        let line = format!(
            "Report: {} total assertions, {} failures",
            assertions.total, assertions.failed
        );
        self.notify(&line);
    }

    pub(super) fn method_label(&self) -> String {
        self.context
            .as_ref()
            .map(|ctx| ctx.name.clone())
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

impl std::fmt::Debug for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tally")
            .field("config", &self.config)
            .field("counters", &self.counters)
            .field("context", &self.context)
            .finish()
    }
}
