//! Non-terminating assertions.
//!
//! Every assertion kind is a [`Check`]: operands plus a comparison and a
//! formatter. The tally evaluates it, counts the outcome, and emits a
//! diagnostic. Nothing here returns an error or panics; a failure is
//! visible only through the counters and the emitted lines, so the caller
//! keeps running.

use std::fmt::{Debug, Display};
use std::panic::Location;

use crate::tally::context::SourceLocation;
use crate::tally::tally::Tally;
use crate::tally::verbosity::Verbosity;
use crate::trace::trace::{TraceEvent, TraceKind};

/// One comparison, ready to be evaluated.
pub struct Check<T> {
    pub kind: &'static str,
    pub operands: T,
    pub holds: fn(&T) -> bool,
    pub render: fn(&T) -> String,
}

impl<T> Check<T> {
    pub fn passed(&self) -> bool {
        (self.holds)(&self.operands)
    }

    /// `kind(operands)`, as printed in diagnostics.
    pub fn describe(&self) -> String {
        format!("{}({})", self.kind, (self.render)(&self.operands))
    }
}

fn hex(value: u32) -> String {
    format!("0x{:08x}", value)
}

fn pair<T: Display>((expected, actual): &(T, T)) -> String {
    format!("{}, {}", expected, actual)
}

fn pair_hex((expected, actual): &(u32, u32)) -> String {
    format!("{}, {}", hex(*expected), hex(*actual))
}

fn pointer<P: ?Sized>(value: &Option<&P>) -> String {
    match value {
        Some(v) => format!("{:p}", *v),
        None => "null".to_string(),
    }
}

impl Check<bool> {
    pub fn is_true(condition: bool) -> Self {
        Check {
            kind: "assert_true",
            operands: condition,
            holds: |c| *c,
            render: |c| c.to_string(),
        }
    }

    pub fn is_false(condition: bool) -> Self {
        Check {
            kind: "assert_false",
            operands: condition,
            holds: |c| !*c,
            render: |c| c.to_string(),
        }
    }
}

impl Check<(i32, i32)> {
    pub fn eq_int(expected: i32, actual: i32) -> Self {
        Check {
            kind: "assert_eq_int",
            operands: (expected, actual),
            holds: |(e, a)| a == e,
            render: pair,
        }
    }

    pub fn ne_int(expected: i32, actual: i32) -> Self {
        Check {
            kind: "assert_ne_int",
            operands: (expected, actual),
            holds: |(e, a)| a != e,
            render: pair,
        }
    }

    pub fn gt_int(expected: i32, actual: i32) -> Self {
        Check {
            kind: "assert_gt_int",
            operands: (expected, actual),
            holds: |(e, a)| a > e,
            render: pair,
        }
    }

    pub fn lt_int(expected: i32, actual: i32) -> Self {
        Check {
            kind: "assert_lt_int",
            operands: (expected, actual),
            holds: |(e, a)| a < e,
            render: pair,
        }
    }
}

impl Check<(u32, u32)> {
    pub fn eq_u32(expected: u32, actual: u32) -> Self {
        Check {
            kind: "assert_eq_u32",
            operands: (expected, actual),
            holds: |(e, a)| a == e,
            render: pair_hex,
        }
    }

    pub fn gt_u32(expected: u32, actual: u32) -> Self {
        Check {
            kind: "assert_gt_u32",
            operands: (expected, actual),
            holds: |(e, a)| a > e,
            render: pair_hex,
        }
    }

    pub fn lt_u32(expected: u32, actual: u32) -> Self {
        Check {
            kind: "assert_lt_u32",
            operands: (expected, actual),
            holds: |(e, a)| a < e,
            render: pair_hex,
        }
    }

    pub fn le_u32(expected: u32, actual: u32) -> Self {
        Check {
            kind: "assert_le_u32",
            operands: (expected, actual),
            holds: |(e, a)| a <= e,
            render: pair_hex,
        }
    }

    pub fn ge_u32(expected: u32, actual: u32) -> Self {
        Check {
            kind: "assert_ge_u32",
            operands: (expected, actual),
            holds: |(e, a)| a >= e,
            render: pair_hex,
        }
    }
}

impl Check<(u8, u8)> {
    pub fn eq_u8(expected: u8, actual: u8) -> Self {
        Check {
            kind: "assert_eq_u8",
            operands: (expected, actual),
            holds: |(e, a)| a == e,
            render: pair,
        }
    }
}

impl<'a> Check<(&'a str, &'a str)> {
    pub fn eq_str(expected: &'a str, actual: &'a str) -> Self {
        Check {
            kind: "assert_eq_str",
            operands: (expected, actual),
            holds: |(e, a)| a == e,
            render: |(e, a)| format!("{:?}, {:?}", e, a),
        }
    }
}

impl<'a, P: ?Sized> Check<Option<&'a P>> {
    pub fn null(value: Option<&'a P>) -> Self {
        Check {
            kind: "assert_null",
            operands: value,
            holds: Option::is_none,
            render: pointer,
        }
    }

    pub fn not_null(value: Option<&'a P>) -> Self {
        Check {
            kind: "assert_not_null",
            operands: value,
            holds: Option::is_some,
            render: pointer,
        }
    }
}

impl Check<(f64, f64, f64)> {
    /// Passes when `|actual - expected| <= delta`; the boundary is inclusive,
    /// unlike the strict ordering checks.
    pub fn float_within(delta: f64, expected: f64, actual: f64) -> Self {
        Check {
            kind: "assert_float_within",
            operands: (delta, expected, actual),
            holds: |(delta, expected, actual)| (actual - expected).abs() <= *delta,
            render: |(delta, expected, actual)| {
                format!("{:.6}, {:.6}, {:.6}", delta, expected, actual)
            },
        }
    }
}

impl Check<(u32, u32, u32)> {
    /// Passes when the counter at `index` went strictly up.
    pub fn counter_increased(initial: u32, final_value: u32, index: u32) -> Self {
        Check {
            kind: "assert_counter_increased",
            operands: (initial, final_value, index),
            holds: |(initial, final_value, _)| final_value > initial,
            render: |(initial, final_value, index)| {
                format!("{}, {}, {}", index, hex(*initial), hex(*final_value))
            },
        }
    }
}

impl<'a, V: PartialEq + Debug> Check<(&'a str, V, V)> {
    pub fn validation_result(expected: V, actual: V, operation: &'a str) -> Self {
        Check {
            kind: "assert_validation_result",
            operands: (operation, expected, actual),
            holds: |(_, expected, actual)| expected == actual,
            render: |(operation, expected, actual)| {
                format!("{}, {:?}, {:?}", operation, expected, actual)
            },
        }
    }
}

impl Tally {
    /// Record one assertion outcome at the caller's location.
    #[track_caller]
    pub fn record_assertion(&mut self, passed: bool, describe: impl FnOnce() -> String) {
        let location = SourceLocation::from(Location::caller());
        self.record_assertion_at(passed, &location, describe);
    }

    /// Record one assertion outcome. `describe` runs only when the outcome
    /// is going to be printed or traced.
    pub fn record_assertion_at(
        &mut self,
        passed: bool,
        location: &SourceLocation,
        describe: impl FnOnce() -> String,
    ) {
        self.counters.count_assertion(passed);

        if !passed {
            // Acknowledge the failure without tripping the host's own
            // abort-on-failure.
            self.host.set_current_test_failed(true);
            self.host.set_current_test_failed(false);

            let printed = self.shows(Verbosity::FailingAssertions);
            if !printed && self.tracer.is_none() {
                return;
            }

            let description = describe();
            if printed {
                self.notify(&format!(
                    "    [FAILED] [ASSERTION] {}  {}",
                    location, description
                ));
            }
            self.trace(
                TraceEvent::now(TraceKind::AssertionFailed)
                    .with_name(self.method_label())
                    .with_location(location)
                    .with_detail(description),
            );
        } else if self.shows(Verbosity::AllAssertions) && self.host.debug_mode() {
            let line = format!("    [PASSED] [ASSERTION] {}  {}", location, describe());
            self.notify(&line);
        }
    }

    /// Evaluate `check` at the caller's location.
    #[track_caller]
    pub fn check<T>(&mut self, check: Check<T>) {
        let location = SourceLocation::from(Location::caller());
        self.check_at(&location, check);
    }

    pub fn check_at<T>(&mut self, location: &SourceLocation, check: Check<T>) {
        let passed = check.passed();
        self.record_assertion_at(passed, location, || check.describe());
    }

    #[track_caller]
    pub fn assert_true(&mut self, condition: bool) {
        self.check(Check::is_true(condition));
    }

    #[track_caller]
    pub fn assert_false(&mut self, condition: bool) {
        self.check(Check::is_false(condition));
    }

    #[track_caller]
    pub fn assert_eq_int(&mut self, expected: i32, actual: i32) {
        self.check(Check::eq_int(expected, actual));
    }

    #[track_caller]
    pub fn assert_ne_int(&mut self, expected: i32, actual: i32) {
        self.check(Check::ne_int(expected, actual));
    }

    /// Passes when `actual > expected`.
    #[track_caller]
    pub fn assert_gt_int(&mut self, expected: i32, actual: i32) {
        self.check(Check::gt_int(expected, actual));
    }

    /// Passes when `actual < expected`.
    #[track_caller]
    pub fn assert_lt_int(&mut self, expected: i32, actual: i32) {
        self.check(Check::lt_int(expected, actual));
    }

    #[track_caller]
    pub fn assert_eq_u32(&mut self, expected: u32, actual: u32) {
        self.check(Check::eq_u32(expected, actual));
    }

    #[track_caller]
    pub fn assert_gt_u32(&mut self, expected: u32, actual: u32) {
        self.check(Check::gt_u32(expected, actual));
    }

    #[track_caller]
    pub fn assert_lt_u32(&mut self, expected: u32, actual: u32) {
        self.check(Check::lt_u32(expected, actual));
    }

    #[track_caller]
    pub fn assert_le_u32(&mut self, expected: u32, actual: u32) {
        self.check(Check::le_u32(expected, actual));
    }

    #[track_caller]
    pub fn assert_ge_u32(&mut self, expected: u32, actual: u32) {
        self.check(Check::ge_u32(expected, actual));
    }

    #[track_caller]
    pub fn assert_eq_u8(&mut self, expected: u8, actual: u8) {
        self.check(Check::eq_u8(expected, actual));
    }

    #[track_caller]
    pub fn assert_eq_str(&mut self, expected: &str, actual: &str) {
        self.check(Check::eq_str(expected, actual));
    }

    #[track_caller]
    pub fn assert_null<P: ?Sized>(&mut self, value: Option<&P>) {
        self.check(Check::null(value));
    }

    #[track_caller]
    pub fn assert_not_null<P: ?Sized>(&mut self, value: Option<&P>) {
        self.check(Check::not_null(value));
    }

    #[track_caller]
    pub fn assert_float_within(&mut self, delta: f64, expected: f64, actual: f64) {
        self.check(Check::float_within(delta, expected, actual));
    }

    #[track_caller]
    pub fn assert_counter_increased(&mut self, initial: u32, final_value: u32, index: u32) {
        self.check(Check::counter_increased(initial, final_value, index));
    }

    #[track_caller]
    pub fn assert_validation_result<V>(&mut self, expected: V, actual: V, operation: &str)
    where
        V: PartialEq + Debug,
    {
        self.check(Check::validation_result(expected, actual, operation));
    }
}
