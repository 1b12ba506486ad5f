use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::tally::counters::TierCount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    RunInit,
    FileStart,
    FileEnd,
    MethodStart,
    MethodEnd,
    AssertionFailed,
    MethodAborted,
    SetupFailed,
    BodyError,
    TeardownFailed,
}

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub kind: TraceKind,

    pub name: Option<String>,
    pub location: Option<String>,
    pub detail: Option<String>,

    pub assertions: Option<TierCount>,
    pub methods: Option<TierCount>,
}

impl TraceEvent {
    pub fn now(kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            kind,
            name: None,
            location: None,
            detail: None,
            assertions: None,
            methods: None,
        }
    }

    pub fn with_name(mut self, name: impl ToString) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_location(mut self, location: impl ToString) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_assertions(mut self, counts: TierCount) -> Self {
        self.assertions = Some(counts);
        self
    }

    pub fn with_methods(mut self, counts: TierCount) -> Self {
        self.methods = Some(counts);
        self
    }
}
