use crate::exec::strategy::{ExecutionStrategy, TestBody, TestFault};
use crate::tally::host::Fixture;
use crate::tally::tally::Tally;
use crate::trace::trace::TraceKind;

/// Runs setUp, the body, and tearDown back to back.
///
/// Nothing here interrupts control flow. A body that never calls
/// `end_method` leaves its method unattributed: its assertions stay in the
/// run tier but never reach the file tier or the failed-method counters.
/// Panics are not contained and propagate to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooperative;

impl ExecutionStrategy for Cooperative {
    fn run_test(
        &self,
        tally: &mut Tally,
        fixture: &mut dyn Fixture,
        test_name: &str,
        body: &mut TestBody<'_>,
    ) {
        if let Err(e) = fixture.set_up() {
            tally.record_run_failure(
                TraceKind::SetupFailed,
                test_name,
                &format!("    [ERROR] setUp for {} failed: {}", test_name, e),
            );
        }

        match body(tally) {
            Ok(()) | Err(TestFault::Abort) => {}
            Err(TestFault::Error(e)) => {
                tally.record_run_failure(
                    TraceKind::BodyError,
                    test_name,
                    &format!("    [ERROR] test {} returned error: {}", test_name, e),
                );
            }
        }

        if let Err(e) = fixture.tear_down() {
            tally.record_run_failure(
                TraceKind::TeardownFailed,
                test_name,
                &format!("    [ERROR] tearDown for {} failed: {}", test_name, e),
            );
        }
    }
}
