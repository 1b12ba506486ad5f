//! Non-terminating assertion tallies for a native/embedded unit-test harness.
//!
//! A [`Tally`] counts assertions, methods, files, and the whole run while
//! letting a failed assertion fall through to the next line. Methods run
//! under one of two [`ExecutionStrategy`] implementations: cooperative,
//! where nothing ever interrupts the body, or unwinding, where a failed
//! method is aborted at `end_method` and any fault is contained.
//!
//! ```no_run
//! use assert_tally::{NoFixture, Tally, TallyConfig};
//!
//! let mut tally = Tally::new(TallyConfig::default());
//! tally.init_run();
//! tally.start_file("Math", "math_tests.rs");
//! tally.run_test(&mut NoFixture, "test_add", |t| {
//!     t.start_method("test_add", file!(), line!());
//!     t.assert_eq_int(4, 2 + 2);
//!     t.end_method().into_result()
//! });
//! tally.end_file("Math", "math_tests.rs");
//! tally.final_summary();
//! ```

pub mod cli;
pub mod error;
pub mod exec;
pub mod plan;
pub mod report;
pub mod tally;
pub mod trace;

pub use error::HarnessError;
pub use exec::strategy::{ExecutionMode, ExecutionStrategy, MethodOutcome, TestFault};
pub use report::report_model::{FileRecord, MethodRecord, RunReport};
pub use tally::assertions::Check;
pub use tally::context::{MethodContext, SourceLocation};
pub use tally::counters::{Counters, TierCount};
pub use tally::host::{DetachedHost, Fixture, FixtureResult, HostFramework, NoFixture};
pub use tally::notifier::{CapturedNotifier, Notifier, StdoutNotifier};
pub use tally::tally::{Tally, TallyConfig};
pub use tally::verbosity::Verbosity;
