use assert_tally::{Fixture, FixtureResult};

/// How a scripted setUp or tearDown behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Succeed,
    Fail(&'static str),
    Panic(&'static str),
    PanicUnknown,
}

impl Step {
    fn perform(self) -> FixtureResult {
        match self {
            Step::Succeed => Ok(()),
            Step::Fail(msg) => Err(msg.into()),
            Step::Panic(msg) => panic!("{}", msg),
            Step::PanicUnknown => std::panic::panic_any(404_u16),
        }
    }
}

/// Fixture that follows a script and counts its calls.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFixture {
    pub set_up: Step,
    pub tear_down: Step,
    pub set_up_calls: u32,
    pub tear_down_calls: u32,
}

impl ScriptedFixture {
    pub fn new(set_up: Step, tear_down: Step) -> Self {
        Self {
            set_up,
            tear_down,
            ..Self::default()
        }
    }
}

impl Fixture for ScriptedFixture {
    fn set_up(&mut self) -> FixtureResult {
        self.set_up_calls += 1;
        self.set_up.perform()
    }

    fn tear_down(&mut self) -> FixtureResult {
        self.tear_down_calls += 1;
        self.tear_down.perform()
    }
}
