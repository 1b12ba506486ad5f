use std::error::Error;

/// The wrapped test framework, seen only through the pieces this layer
/// touches.
pub trait HostFramework {
    /// Set or clear the framework's "current test failed" flag.
    fn set_current_test_failed(&mut self, failed: bool);

    /// Whether passing assertions should be printed as well.
    fn debug_mode(&self) -> bool {
        false
    }
}

/// Host used when no framework is attached. Remembers the last flag value
/// and how many times it was raised, which is handy in tests.
#[derive(Debug, Clone, Default)]
pub struct DetachedHost {
    pub current_test_failed: bool,
    pub times_flagged: u32,
    pub debug: bool,
}

impl DetachedHost {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            ..Self::default()
        }
    }
}

impl HostFramework for DetachedHost {
    fn set_current_test_failed(&mut self, failed: bool) {
        if failed {
            self.times_flagged += 1;
        }
        self.current_test_failed = failed;
    }

    fn debug_mode(&self) -> bool {
        self.debug
    }
}

pub type FixtureResult = Result<(), Box<dyn Error>>;

/// Per-method setUp/tearDown hooks.
pub trait Fixture {
    fn set_up(&mut self) -> FixtureResult {
        Ok(())
    }

    fn tear_down(&mut self) -> FixtureResult {
        Ok(())
    }
}

/// A fixture with no setUp or tearDown work.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFixture;

impl Fixture for NoFixture {}
