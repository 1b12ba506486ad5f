use serde::{Deserialize, Serialize};

/// Which diagnostics are emitted while tallying.
///
/// Levels are incremental: a lower level shows everything a higher level
/// shows. A diagnostic tied to level `L` is printed when the configured
/// threshold is `<= L`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Verbosity {
    /// Passing assertions too (debug mode only).
    AllAssertions,

    /// Failing assertions as they happen.
    #[default]
    FailingAssertions,

    /// Per-method start/result lines and abort diagnostics.
    TestMethods,

    /// Per-file summaries.
    TestFiles,

    /// Only the final summary.
    Minimal,
}

impl Verbosity {
    /// Whether a diagnostic tied to `level` should be emitted.
    pub fn shows(self, level: Verbosity) -> bool {
        self <= level
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Verbosity::AllAssertions),
            1 => Some(Verbosity::FailingAssertions),
            2 => Some(Verbosity::TestMethods),
            3 => Some(Verbosity::TestFiles),
            4 => Some(Verbosity::Minimal),
            _ => None,
        }
    }
}
