use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use assert_tally::exec::unwinding::{REASON_NO_END_METHOD, Unwinding, panic_message};
use assert_tally::{
    ExecutionMode, ExecutionStrategy, MethodOutcome, NoFixture, Tally, TestFault, TierCount,
    Verbosity,
};

use crate::common::{
    fixtures::{ScriptedFixture, Step},
    utils::{tally_with, tally_with_host},
};

mod common;

fn unwinding() -> (Tally, assert_tally::CapturedNotifier) {
    let (mut t, out) = tally_with(ExecutionMode::Unwinding, Verbosity::TestMethods);
    t.init_run();
    t.start_file("Suite", "suite.rs");
    (t, out)
}

fn cooperative() -> (Tally, assert_tally::CapturedNotifier) {
    let (mut t, out) = tally_with(ExecutionMode::Cooperative, Verbosity::TestMethods);
    t.init_run();
    t.start_file("Suite", "suite.rs");
    (t, out)
}

// ============================================================================
// 1. MethodOutcome / TestFault
// ============================================================================

#[test]
fn end_method_aborts_failed_method_only_when_unwinding() {
    let (mut t, _out) = unwinding();
    t.start_method("test", "suite.rs", 1);
    t.assert_true(true);
    t.assert_true(false);
    t.assert_true(true);
    assert_eq!(
        t.end_method(),
        MethodOutcome::Aborted("1 of 3 assertion(s) failed".to_string())
    );

    t.start_method("test_ok", "suite.rs", 2);
    t.assert_true(true);
    assert_eq!(t.end_method(), MethodOutcome::Continue);
}

#[test]
fn outcome_converts_into_body_result() {
    assert!(MethodOutcome::Continue.into_result().is_ok());
    let aborted = MethodOutcome::Aborted("x".into());
    assert!(aborted.is_aborted());
    assert!(matches!(aborted.into_result(), Err(TestFault::Abort)));
}

#[test]
fn test_fault_wraps_any_error() {
    let parse = "x".parse::<i32>().unwrap_err();
    let fault: TestFault = parse.into();
    assert!(matches!(fault, TestFault::Error(_)));
    assert_eq!(TestFault::msg("device busy").to_string(), "device busy");
}

fn payload_of(body: fn()) -> Box<dyn Any + Send> {
    panic::catch_unwind(body).unwrap_err()
}

#[test]
fn panic_message_reads_string_payloads() {
    let payload = payload_of(|| panic!("static message"));
    assert_eq!(panic_message(payload.as_ref()).as_deref(), Some("static message"));

    let payload = payload_of(|| panic!("formatted {}", 7));
    assert_eq!(panic_message(payload.as_ref()).as_deref(), Some("formatted 7"));

    let payload = payload_of(|| panic::panic_any(7_u8));
    assert_eq!(panic_message(payload.as_ref()), None);
}

// ============================================================================
// 2. Unwinding: normal and aborted bodies
// ============================================================================

#[test]
fn abort_signal_stops_body_silently() {
    let (mut t, out) = unwinding();
    t.run_test(&mut NoFixture, "test_abort", |t| {
        t.start_method("test_abort", "suite.rs", 5);
        t.assert_eq_int(1, 2);
        t.end_method().into_result()?;
        t.assert_true(false);
        Ok(())
    });

    assert_eq!(t.counters().run.assertions.total, 1);
    assert_eq!(t.counters().file.methods, TierCount { total: 1, failed: 1 });
    assert!(!out.contains("[EXCEPTION]"));
    assert!(!out.contains("[ABORTED]"));
    assert!(t.method_context().is_none());
}

#[test]
fn body_without_end_method_is_attributed() {
    let (mut t, out) = unwinding();
    t.run_test(&mut NoFixture, "test_forgets_end", |t| {
        t.start_method("test_forgets_end", "f.rs", 7);
        t.assert_true(true);
        Ok(())
    });

    assert!(out.contains(&format!(
        "[ABORTED]     - test_forgets_end (f.rs:7) : {}",
        REASON_NO_END_METHOD
    )));
    assert_eq!(t.counters().file.methods, TierCount { total: 1, failed: 1 });
    assert_eq!(t.counters().file.assertions, TierCount { total: 1, failed: 0 });
    assert_eq!(t.failure_count(), 1);

    let record = t.end_file("Suite", "suite.rs");
    assert!(!record.passed());
    assert_eq!(t.counters().run.files.failed, 1);
    assert_eq!(
        record.method_records[0].aborted.as_deref(),
        Some(REASON_NO_END_METHOD)
    );
}

#[test]
fn error_after_end_method_does_not_double_count() {
    let (mut t, out) = unwinding();
    t.run_test(&mut NoFixture, "test_late", |t| {
        t.start_method("test_late", "suite.rs", 9);
        t.assert_true(false);
        let _ = t.end_method();
        Err(TestFault::msg("late failure"))
    });

    assert_eq!(t.counters().file.methods, TierCount { total: 1, failed: 1 });
    assert_eq!(t.counters().file.assertions, TierCount { total: 1, failed: 1 });
    assert_eq!(t.failure_count(), 1);
    assert!(out.contains("[EXCEPTION] test test_late threw error: late failure"));

    let record = t.end_file("Suite", "suite.rs");
    assert_eq!(record.method_records.len(), 1);
    assert!(record.method_records[0].failed);
    assert_eq!(record.method_records[0].aborted.as_deref(), Some("late failure"));
}

#[test]
fn error_after_passing_method_fails_it_once() {
    let (mut t, _out) = unwinding();
    t.run_test(&mut NoFixture, "test_cleanup", |t| {
        t.start_method("test_cleanup", "suite.rs", 3);
        t.assert_true(true);
        t.end_method().into_result()?;
        Err(TestFault::msg("cleanup failed"))
    });

    assert_eq!(t.counters().file.methods, TierCount { total: 1, failed: 1 });
    assert_eq!(t.counters().file.assertions, TierCount { total: 1, failed: 0 });
    assert_eq!(t.failure_count(), 1);
}

#[test]
fn error_before_start_method_counts_raw_failure_only() {
    let (mut t, out) = unwinding();
    t.run_test(&mut NoFixture, "test_early", |_t| Err(TestFault::msg("no device")));

    assert_eq!(t.counters().file.methods, TierCount::default());
    assert_eq!(t.failure_count(), 1);
    assert!(out.contains("[ABORTED]     - <unknown> (<unknown>:0) : no device"));
}

#[test]
fn string_panic_is_contained_and_described() {
    let (mut t, out) = unwinding();
    t.run_test(&mut NoFixture, "test_panics", |t| {
        t.start_method("test_panics", "suite.rs", 11);
        t.assert_true(true);
        panic!("index out of range");
    });

    assert_eq!(t.counters().file.methods, TierCount { total: 1, failed: 1 });
    assert!(out.contains("[ABORTED]     - test_panics (suite.rs:11) : index out of range"));
    assert!(out.contains("[EXCEPTION] test test_panics threw error: index out of range"));
}

#[test]
fn non_string_panic_is_unknown_exception() {
    let (mut t, out) = unwinding();
    t.run_test(&mut NoFixture, "test_odd", |t| {
        t.start_method("test_odd", "suite.rs", 12);
        panic::panic_any(42_i32);
    });

    assert_eq!(t.counters().file.methods.failed, 1);
    assert!(out.contains("[EXCEPTION] test test_odd threw unknown exception"));
}

#[test]
fn next_method_starts_clean_after_abort() {
    let (mut t, _out) = unwinding();
    t.run_test(&mut NoFixture, "test_bad", |t| {
        t.start_method("test_bad", "suite.rs", 1);
        t.assert_true(false);
        panic!("boom");
    });
    t.run_test(&mut NoFixture, "test_good", |t| {
        t.start_method("test_good", "suite.rs", 2);
        t.assert_true(true);
        t.end_method().into_result()
    });

    assert_eq!(t.counters().method.assertions, TierCount { total: 1, failed: 0 });
    assert_eq!(t.counters().file.methods, TierCount { total: 2, failed: 1 });
    let record = t.end_file("Suite", "suite.rs");
    assert!(!record.method_records[1].failed);
}

// ============================================================================
// 3. Unwinding: fixtures
// ============================================================================

#[test]
fn failed_setup_skips_body_and_teardown() {
    let (mut t, out) = unwinding();
    let mut fixture = ScriptedFixture::new(Step::Fail("socket not ready"), Step::Succeed);
    let mut body_ran = false;

    t.run_test(&mut fixture, "test_setup", |t| {
        body_ran = true;
        t.start_method("test_setup", "suite.rs", 1);
        t.end_method().into_result()
    });

    assert!(!body_ran);
    assert_eq!(fixture.tear_down_calls, 0);
    assert_eq!(t.counters().file.methods, TierCount::default());
    assert_eq!(t.failure_count(), 1);
    assert!(out.contains("    [EXCEPTION] setUp for test_setup failed: socket not ready"));
}

#[test]
fn panicking_setup_is_contained() {
    let (mut t, out) = unwinding();
    let mut fixture = ScriptedFixture::new(Step::PanicUnknown, Step::Succeed);
    t.run_test(&mut fixture, "test_setup_panic", |_t| Ok(()));

    assert_eq!(t.failure_count(), 1);
    assert!(out.contains("setUp for test_setup_panic failed: unknown exception"));
}

#[test]
fn setup_failure_is_printed_even_at_minimal_verbosity() {
    let (mut t, out, host) = tally_with_host(ExecutionMode::Unwinding, Verbosity::Minimal, false);
    let mut fixture = ScriptedFixture::new(Step::Fail("no power"), Step::Succeed);
    t.run_test(&mut fixture, "test_quiet", |_t| Ok(()));

    assert!(out.contains("[EXCEPTION] setUp for test_quiet failed: no power"));
    assert!(host.current_test_failed());
}

#[test]
fn teardown_failure_does_not_reattribute_method() {
    let (mut t, out) = unwinding();
    let mut fixture = ScriptedFixture::new(Step::Succeed, Step::Fail("boom"));
    t.run_test(&mut fixture, "test_pass", |t| {
        t.start_method("test_pass", "suite.rs", 1);
        t.assert_true(true);
        t.end_method().into_result()
    });

    assert_eq!(fixture.tear_down_calls, 1);
    assert_eq!(t.counters().file.methods, TierCount { total: 1, failed: 0 });
    assert!(out.contains("    [EXCEPTION] tearDown for test_pass threw error: boom"));
}

#[test]
fn teardown_panic_after_aborted_method() {
    let (mut t, out) = unwinding();
    let mut fixture = ScriptedFixture::new(Step::Succeed, Step::Panic("unmapped"));
    t.run_test(&mut fixture, "test_forgets_end", |t| {
        t.start_method("test_forgets_end", "suite.rs", 7);
        Ok(())
    });

    assert_eq!(t.counters().file.methods.failed, 1);
    assert!(out.contains("tearDown for test_forgets_end threw error: unmapped"));
}

#[test]
fn strategy_can_be_driven_directly() {
    let (mut t, out) = unwinding();
    Unwinding.run_test(&mut t, &mut NoFixture, "test_direct", &mut |t: &mut Tally| {
        t.start_method("test_direct", "suite.rs", 1);
        Ok(())
    });
    assert!(out.contains("[RUN] test_direct"));
    assert_eq!(t.counters().file.methods.failed, 1);

    let strategy = ExecutionMode::Unwinding.strategy();
    strategy.run_test(&mut t, &mut NoFixture, "test_via_mode", &mut |t: &mut Tally| {
        t.start_method("test_via_mode", "suite.rs", 2);
        t.end_method().into_result()
    });
    assert_eq!(t.counters().file.methods, TierCount { total: 2, failed: 1 });
}

// ============================================================================
// 4. Cooperative
// ============================================================================

#[test]
fn cooperative_runs_everything_despite_setup_failure() {
    let (mut t, out) = cooperative();
    let mut fixture = ScriptedFixture::new(Step::Fail("late clock"), Step::Succeed);
    let mut body_ran = false;

    t.run_test(&mut fixture, "test_coop", |t| {
        body_ran = true;
        t.start_method("test_coop", "suite.rs", 1);
        t.assert_true(true);
        t.end_method().into_result()
    });

    assert!(body_ran);
    assert_eq!(fixture.tear_down_calls, 1);
    assert_eq!(t.failure_count(), 1);
    assert!(out.contains("    [ERROR] setUp for test_coop failed: late clock"));
}

#[test]
fn cooperative_failed_method_continues() {
    let (mut t, _out) = cooperative();
    t.run_test(&mut NoFixture, "test_keeps_going", |t| {
        t.start_method("test_keeps_going", "suite.rs", 1);
        t.assert_true(false);
        t.assert_true(false);
        t.end_method().into_result()?;
        t.assert_true(true);
        Ok(())
    });

    assert_eq!(t.counters().run.assertions, TierCount { total: 3, failed: 2 });
    assert_eq!(t.counters().file.methods, TierCount { total: 1, failed: 1 });
}

#[test]
fn cooperative_body_without_end_method_is_unattributed() {
    let (mut t, out) = cooperative();
    t.run_test(&mut NoFixture, "test_forgets_end", |t| {
        t.start_method("test_forgets_end", "suite.rs", 1);
        t.assert_true(false);
        Ok(())
    });

    assert_eq!(t.counters().file.methods, TierCount { total: 1, failed: 0 });
    assert_eq!(t.counters().file.assertions, TierCount::default());
    assert_eq!(t.counters().run.assertions, TierCount { total: 1, failed: 1 });
    assert!(!out.contains("[ABORTED]"));
}

#[test]
fn cooperative_returned_error_is_a_run_failure() {
    let (mut t, out) = cooperative();
    let mut fixture = ScriptedFixture::new(Step::Succeed, Step::Fail("flash locked"));
    t.run_test(&mut fixture, "test_err", |t| {
        t.start_method("test_err", "suite.rs", 1);
        let _ = t.end_method();
        Err(TestFault::msg("bus fault"))
    });

    assert_eq!(t.failure_count(), 2);
    assert_eq!(t.counters().file.methods.failed, 0);
    assert!(out.contains("    [ERROR] test test_err returned error: bus fault"));
    assert!(out.contains("    [ERROR] tearDown for test_err failed: flash locked"));
}

#[test]
fn cooperative_does_not_contain_panics() {
    let (mut t, _out) = cooperative();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        t.run_test(&mut NoFixture, "test_panics", |_t| panic!("unhandled"));
    }));
    assert!(result.is_err());
}
