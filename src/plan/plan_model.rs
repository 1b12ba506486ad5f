use serde::{Deserialize, Serialize};

/// A scripted test run: suites of methods with canned check operands.
/// Deserialized from YAML and replayed through a `Tally`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestPlan {
    pub suites: Vec<SuitePlan>,
}

/// One test file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuitePlan {
    /// Suite name shown in summaries
    pub name: String,

    /// Source file the suite stands for
    pub file: String,

    pub methods: Vec<MethodPlan>,
}

/// One test method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodPlan {
    pub name: String,

    /// Declaration line, used as the location of every check
    #[serde(default)]
    pub line: u32,

    #[serde(default)]
    pub checks: Vec<CheckSpec>,

    /// Close the method scope after the checks. Turning this off replays a
    /// body that returns without ending its method.
    #[serde(default = "default_true")]
    pub end_method: bool,

    /// Error the body returns after its checks (and `end_method`) ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_error: Option<String>,

    /// Make setUp fail with this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_error: Option<String>,

    /// Make tearDown fail with this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown_error: Option<String>,
}

/// A single check with its operands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckSpec {
    IsTrue { value: bool },
    IsFalse { value: bool },

    EqInt { expected: i32, actual: i32 },
    NeInt { expected: i32, actual: i32 },
    GtInt { expected: i32, actual: i32 },
    LtInt { expected: i32, actual: i32 },

    EqU32 { expected: u32, actual: u32 },
    GtU32 { expected: u32, actual: u32 },
    LtU32 { expected: u32, actual: u32 },
    LeU32 { expected: u32, actual: u32 },
    GeU32 { expected: u32, actual: u32 },

    EqU8 { expected: u8, actual: u8 },

    EqStr { expected: String, actual: String },

    /// Whether the checked reference is present
    IsNull { present: bool },
    NotNull { present: bool },

    FloatWithin { delta: f64, expected: f64, actual: f64 },

    CounterIncreased {
        initial: u32,
        #[serde(rename = "final")]
        final_value: u32,
        index: u32,
    },

    ValidationResult {
        operation: String,
        expected: i32,
        actual: i32,
    },
}

fn default_true() -> bool {
    true
}
