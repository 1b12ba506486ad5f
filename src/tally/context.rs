use serde::{Deserialize, Serialize};

/// Where a test method or assertion lives in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn unknown() -> Self {
        Self::new("<unknown>", 0)
    }
}

impl From<&std::panic::Location<'_>> for SourceLocation {
    fn from(loc: &std::panic::Location<'_>) -> Self {
        Self::new(loc.file(), loc.line())
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Tracks the in-flight test method when running exception-assisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodContext {
    /// Method name as given to `start_method`
    pub name: String,

    /// Where the method was declared
    pub location: SourceLocation,

    /// Set once the method's counters have been rolled into the file tier
    pub finalized: bool,

    /// Set once the method has been counted as failed
    pub failure_recorded: bool,
}

impl MethodContext {
    pub fn open(name: &str, location: SourceLocation) -> Self {
        MethodContext {
            name: name.to_string(),
            location,
            finalized: false,
            failure_recorded: false,
        }
    }

    pub fn mark_failure_recorded(&mut self) {
        self.failure_recorded = true;
    }

    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Whether the method started but never reached `end_method`.
    pub fn is_open(&self) -> bool {
        !self.finalized
    }
}
