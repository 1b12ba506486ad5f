use std::fmt;

#[derive(Debug)]
pub enum HarnessError {
    /// Reading a plan/config file or writing a report failed
    Io { path: String, source: std::io::Error },

    /// Config file is not valid YAML for `AppConfig`
    ConfigParse { path: String, source: serde_yaml::Error },

    /// Plan file is not valid YAML for `TestPlan`
    PlanParse { path: String, source: serde_yaml::Error },

    /// JSON report serialization failed
    ReportSerialize(serde_json::Error),

    /// Plan path held no suites
    EmptyPlan(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Io { path, source } => {
                write!(f, "I/O error on '{}': {}", path, source)
            }
            HarnessError::ConfigParse { path, source } => {
                write!(f, "Invalid config file '{}': {}", path, source)
            }
            HarnessError::PlanParse { path, source } => {
                write!(f, "Invalid plan file '{}': {}", path, source)
            }
            HarnessError::ReportSerialize(source) => {
                write!(f, "JSON serialize error (run report): {}", source)
            }
            HarnessError::EmptyPlan(path) => {
                write!(f, "No test suites found at: {}", path)
            }
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Io { source, .. } => Some(source),
            HarnessError::ConfigParse { source, .. } => Some(source),
            HarnessError::PlanParse { source, .. } => Some(source),
            HarnessError::ReportSerialize(source) => Some(source),
            HarnessError::EmptyPlan(_) => None,
        }
    }
}
