use serde::{Deserialize, Serialize};

// ============================================================================
// Counter store: nested tallies for method, file, and run tiers
// ============================================================================

/// A run/failed pair.
///
/// `failed` can exceed `total` when a method scope is closed twice, so
/// `passed` clamps at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    pub total: u32,
    pub failed: u32,
}

impl TierCount {
    pub fn passed(&self) -> u32 {
        self.total.saturating_sub(self.failed)
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn add(&mut self, other: TierCount) {
        self.total += other.total;
        self.failed += other.failed;
    }
}

/// Assertions recorded inside the current test method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodTier {
    pub assertions: TierCount,
}

/// Methods and assertions of the current test file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileTier {
    pub methods: TierCount,
    pub assertions: TierCount,
}

/// Cumulative totals for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTier {
    pub files: TierCount,
    pub methods: TierCount,
    pub assertions: TierCount,

    /// Every recorded failure, including fixture and abort failures.
    /// Reset independently of the other tiers.
    pub failures: u32,
}

/// The ground truth every component mutates and reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    pub method: MethodTier,
    pub file: FileTier,
    pub run: RunTier,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_run(&mut self) {
        *self = Self::default();
    }

    pub fn reset_file(&mut self) {
        self.file = FileTier::default();
    }

    pub fn reset_method(&mut self) {
        self.method = MethodTier::default();
    }

    pub fn count_assertion(&mut self, passed: bool) {
        self.method.assertions.total += 1;
        self.run.assertions.total += 1;
        if !passed {
            self.method.assertions.failed += 1;
            self.run.assertions.failed += 1;
            self.run.failures += 1;
        }
    }

    pub fn count_method_run(&mut self) {
        self.file.methods.total += 1;
        self.run.methods.total += 1;
    }

    pub fn count_method_failed(&mut self) {
        self.file.methods.failed += 1;
        self.run.methods.failed += 1;
    }

    /// Roll the current method's assertions into the file tier.
    pub fn flush_method_into_file(&mut self) {
        let assertions = self.method.assertions;
        self.file.assertions.add(assertions);
    }

    pub fn count_file_run(&mut self) {
        self.run.files.total += 1;
    }

    pub fn count_file_failed(&mut self) {
        self.run.files.failed += 1;
    }

    pub fn count_raw_failure(&mut self) {
        self.run.failures += 1;
    }

    pub fn reset_raw_failures(&mut self) {
        self.run.failures = 0;
    }
}
