use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::exec::cooperative::Cooperative;
use crate::exec::unwinding::Unwinding;
use crate::tally::host::Fixture;
use crate::tally::tally::Tally;

/// Result of closing a test method scope.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodOutcome {
    /// Keep executing the method body.
    Continue,

    /// The method failed and the body should stop here. Only produced when
    /// running exception-assisted.
    Aborted(String),
}

impl MethodOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, MethodOutcome::Aborted(_))
    }

    /// Convert into the body's return type, so a test can end with
    /// `tally.end_method().into_result()?`.
    pub fn into_result(self) -> Result<(), TestFault> {
        match self {
            MethodOutcome::Continue => Ok(()),
            MethodOutcome::Aborted(_) => Err(TestFault::Abort),
        }
    }
}

/// Why a test body stopped early.
#[derive(Debug)]
pub enum TestFault {
    /// Control transfer raised by `end_method` after a failure. Counters are
    /// already correct when this is seen.
    Abort,

    /// Any other error escaping the body.
    Error(Box<dyn Error>),
}

impl TestFault {
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        TestFault::Error(message.into())
    }
}

impl<E: Error + 'static> From<E> for TestFault {
    fn from(err: E) -> Self {
        TestFault::Error(Box::new(err))
    }
}

impl fmt::Display for TestFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestFault::Abort => write!(f, "method aborted after failed assertions"),
            TestFault::Error(e) => write!(f, "{}", e),
        }
    }
}

/// The shape every test method body takes.
pub type TestBody<'a> = dyn FnMut(&mut Tally) -> Result<(), TestFault> + 'a;

/// Runs one test method, with its setUp and tearDown, to completion.
///
/// Implementations must leave the tally ready for the next method no
/// matter how the body ended.
pub trait ExecutionStrategy {
    fn run_test(
        &self,
        tally: &mut Tally,
        fixture: &mut dyn Fixture,
        test_name: &str,
        body: &mut TestBody<'_>,
    );
}

/// Selects the execution strategy at configuration time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Failures never interrupt the method; the body must call
    /// `end_method` itself.
    #[default]
    Cooperative,

    /// `end_method` aborts a failed method and faults are contained.
    Unwinding,
}

impl ExecutionMode {
    pub fn strategy(self) -> &'static dyn ExecutionStrategy {
        match self {
            ExecutionMode::Cooperative => &Cooperative,
            ExecutionMode::Unwinding => &Unwinding,
        }
    }
}
