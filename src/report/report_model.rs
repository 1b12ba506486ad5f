use serde::{Deserialize, Serialize};

use crate::tally::context::SourceLocation;
use crate::tally::counters::{RunTier, TierCount};

// ============================================================================
// Run record: what the reporters consume
// ============================================================================

/// Outcome of one test method, captured when its scope closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub name: String,
    pub location: SourceLocation,

    /// Assertions recorded in the method
    pub assertions: TierCount,

    /// Whether the method counts as failed
    pub failed: bool,

    /// Reason the method was aborted, if it did not end normally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

/// Outcome of one test file, captured by `end_file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub suite: String,
    pub file: String,
    pub methods: TierCount,
    pub assertions: TierCount,
    pub method_records: Vec<MethodRecord>,
}

impl FileRecord {
    pub fn passed(&self) -> bool {
        self.methods.failed == 0
    }
}

/// Snapshot of the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub totals: RunTier,
    pub files: Vec<FileRecord>,
}

impl RunReport {
    /// Whether nothing failed: no assertion, method, file, or fixture.
    pub fn all_passed(&self) -> bool {
        self.totals.failures == 0
            && self.totals.assertions.failed == 0
            && self.totals.methods.failed == 0
            && self.totals.files.failed == 0
    }
}
