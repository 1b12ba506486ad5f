use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::exec::strategy::{ExecutionStrategy, TestBody, TestFault};
use crate::tally::host::Fixture;
use crate::tally::tally::Tally;
use crate::tally::verbosity::Verbosity;
use crate::trace::trace::TraceKind;

pub const REASON_NO_END_METHOD: &str = "test exited without ending the method";
pub const UNKNOWN_EXCEPTION: &str = "unknown exception";

/// Exception-assisted execution.
///
/// Every fixture and body call is contained: returned faults and panics
/// are converted into counter updates and diagnostics, and never escape
/// `run_test`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unwinding;

/// How a contained call ended, when it did not end cleanly.
enum Escape {
    /// The method-abort signal from `end_method`.
    Abort,
    /// An error or panic carrying a description.
    Described(String),
    /// A panic whose payload is not a string.
    Unknown,
}

impl Escape {
    fn description(&self) -> &str {
        match self {
            Escape::Abort => "method abort signal",
            Escape::Described(msg) => msg,
            Escape::Unknown => UNKNOWN_EXCEPTION,
        }
    }
}

fn contain<F>(call: F) -> Result<(), Escape>
where
    F: FnOnce() -> Result<(), TestFault>,
{
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(TestFault::Abort)) => Err(Escape::Abort),
        Ok(Err(TestFault::Error(e))) => Err(Escape::Described(e.to_string())),
        Err(payload) => Err(match panic_message(payload.as_ref()) {
            Some(msg) => Escape::Described(msg),
            None => Escape::Unknown,
        }),
    }
}

/// Extract the message of a `panic!` payload, if it has one.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Some((*s).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

impl ExecutionStrategy for Unwinding {
    fn run_test(
        &self,
        tally: &mut Tally,
        fixture: &mut dyn Fixture,
        test_name: &str,
        body: &mut TestBody<'_>,
    ) {
        tally.clear_method_context();

        if tally.shows(Verbosity::TestMethods) {
            tally.notify(&format!("[RUN] {}", test_name));
        }

        // A failed setUp costs this method only: no body, no tearDown.
        if let Err(escape) = contain(|| fixture.set_up().map_err(TestFault::Error)) {
            tally.record_setup_failure(test_name, escape.description());
            tally.clear_method_context();
            return;
        }

        match contain(|| body(tally)) {
            Ok(()) => {
                if tally.method_in_flight() {
                    tally.record_aborted_method(REASON_NO_END_METHOD);
                }
            }
            Err(Escape::Abort) => {}
            Err(Escape::Described(msg)) => {
                tally.record_aborted_method(&msg);
                tally.record_exception(
                    TraceKind::BodyError,
                    test_name,
                    &format!("    [EXCEPTION] test {} threw error: {}", test_name, msg),
                );
            }
            Err(Escape::Unknown) => {
                tally.record_aborted_method(UNKNOWN_EXCEPTION);
                tally.record_exception(
                    TraceKind::BodyError,
                    test_name,
                    &format!(
                        "    [EXCEPTION] test {} threw {}",
                        test_name, UNKNOWN_EXCEPTION
                    ),
                );
            }
        }

        // The method's outcome is settled; tearDown faults are only reported.
        match contain(|| fixture.tear_down().map_err(TestFault::Error)) {
            Ok(()) => {}
            Err(Escape::Unknown) => tally.record_exception(
                TraceKind::TeardownFailed,
                test_name,
                &format!(
                    "    [EXCEPTION] tearDown for {} threw {}",
                    test_name, UNKNOWN_EXCEPTION
                ),
            ),
            Err(escape) => tally.record_exception(
                TraceKind::TeardownFailed,
                test_name,
                &format!(
                    "    [EXCEPTION] tearDown for {} threw error: {}",
                    test_name,
                    escape.description()
                ),
            ),
        }

        tally.clear_method_context();
    }
}
