use crate::exec::strategy::TestFault;
use crate::plan::plan_model::{CheckSpec, MethodPlan, SuitePlan, TestPlan};
use crate::report::report_model::FileRecord;
use crate::tally::assertions::Check;
use crate::tally::context::SourceLocation;
use crate::tally::host::{Fixture, FixtureResult};
use crate::tally::tally::Tally;

/// setUp/tearDown stand-in that fails on demand.
#[derive(Debug, Clone, Default)]
pub struct PlannedFixture {
    pub setup_error: Option<String>,
    pub teardown_error: Option<String>,
}

impl PlannedFixture {
    pub fn for_method(method: &MethodPlan) -> Self {
        PlannedFixture {
            setup_error: method.setup_error.clone(),
            teardown_error: method.teardown_error.clone(),
        }
    }
}

impl Fixture for PlannedFixture {
    fn set_up(&mut self) -> FixtureResult {
        match &self.setup_error {
            Some(msg) => Err(msg.clone().into()),
            None => Ok(()),
        }
    }

    fn tear_down(&mut self) -> FixtureResult {
        match &self.teardown_error {
            Some(msg) => Err(msg.clone().into()),
            None => Ok(()),
        }
    }
}

/// Replays a `TestPlan` through a tally, suite by suite.
pub struct PlanRunner;

impl PlanRunner {
    /// Run every suite in order. Counters accumulate in `tally`.
    pub fn run(plan: &TestPlan, tally: &mut Tally) -> Vec<FileRecord> {
        plan.suites
            .iter()
            .map(|suite| Self::run_suite(suite, tally))
            .collect()
    }

    /// Run one suite inside its own file scope.
    pub fn run_suite(suite: &SuitePlan, tally: &mut Tally) -> FileRecord {
        tally.start_file(&suite.name, &suite.file);

        for method in &suite.methods {
            let mut fixture = PlannedFixture::for_method(method);
            tally.run_test(&mut fixture, &method.name, |t| {
                Self::execute_method(method, &suite.file, t)
            });
        }

        tally.end_file(&suite.name, &suite.file)
    }

    /// The replayed method body.
    fn execute_method(method: &MethodPlan, file: &str, tally: &mut Tally) -> Result<(), TestFault> {
        tally.start_method(&method.name, file, method.line);

        let location = SourceLocation::new(file, method.line);
        for spec in &method.checks {
            Self::evaluate(spec, &location, tally);
        }

        if !method.end_method {
            return match &method.body_error {
                Some(msg) => Err(TestFault::msg(msg.clone())),
                None => Ok(()),
            };
        }

        let outcome = tally.end_method();
        match &method.body_error {
            Some(msg) => Err(TestFault::msg(msg.clone())),
            None => outcome.into_result(),
        }
    }

    /// Evaluate a single check at the method's location.
    pub fn evaluate(spec: &CheckSpec, at: &SourceLocation, tally: &mut Tally) {
        match spec {
            CheckSpec::IsTrue { value } => tally.check_at(at, Check::is_true(*value)),
            CheckSpec::IsFalse { value } => tally.check_at(at, Check::is_false(*value)),

            CheckSpec::EqInt { expected, actual } => {
                tally.check_at(at, Check::eq_int(*expected, *actual))
            }
            CheckSpec::NeInt { expected, actual } => {
                tally.check_at(at, Check::ne_int(*expected, *actual))
            }
            CheckSpec::GtInt { expected, actual } => {
                tally.check_at(at, Check::gt_int(*expected, *actual))
            }
            CheckSpec::LtInt { expected, actual } => {
                tally.check_at(at, Check::lt_int(*expected, *actual))
            }

            CheckSpec::EqU32 { expected, actual } => {
                tally.check_at(at, Check::eq_u32(*expected, *actual))
            }
            CheckSpec::GtU32 { expected, actual } => {
                tally.check_at(at, Check::gt_u32(*expected, *actual))
            }
            CheckSpec::LtU32 { expected, actual } => {
                tally.check_at(at, Check::lt_u32(*expected, *actual))
            }
            CheckSpec::LeU32 { expected, actual } => {
                tally.check_at(at, Check::le_u32(*expected, *actual))
            }
            CheckSpec::GeU32 { expected, actual } => {
                tally.check_at(at, Check::ge_u32(*expected, *actual))
            }

            CheckSpec::EqU8 { expected, actual } => {
                tally.check_at(at, Check::eq_u8(*expected, *actual))
            }

            CheckSpec::EqStr { expected, actual } => {
                tally.check_at(at, Check::eq_str(expected.as_str(), actual.as_str()))
            }

            CheckSpec::IsNull { present } => {
                let target = Self::presence(*present);
                tally.check_at(at, Check::null(target.as_ref()))
            }
            CheckSpec::NotNull { present } => {
                let target = Self::presence(*present);
                tally.check_at(at, Check::not_null(target.as_ref()))
            }

            CheckSpec::FloatWithin {
                delta,
                expected,
                actual,
            } => tally.check_at(at, Check::float_within(*delta, *expected, *actual)),

            CheckSpec::CounterIncreased {
                initial,
                final_value,
                index,
            } => tally.check_at(at, Check::counter_increased(*initial, *final_value, *index)),

            CheckSpec::ValidationResult {
                operation,
                expected,
                actual,
            } => tally.check_at(
                at,
                Check::validation_result(*expected, *actual, operation.as_str()),
            ),
        }
    }

    /// Something to point at when a plan says the reference is present.
    fn presence(present: bool) -> Option<u8> {
        present.then_some(0)
    }
}
