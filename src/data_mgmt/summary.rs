use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::constants::transformer;
use crate::helpers::{format_elapsed, now_iso};

/// Counters accumulated over one run
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub files_received: usize,
    pub records_uploaded: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Builds a `RunSummary` while a run is in progress
#[derive(Debug)]
pub struct SummaryBuilder {
    started_at: DateTime<Utc>,
    started: Instant,
    files_received: usize,
    records_uploaded: usize,
}

impl SummaryBuilder {
    pub fn start(files_received: usize) -> Self {
        SummaryBuilder {
            started_at: Utc::now(),
            started: Instant::now(),
            files_received,
            records_uploaded: 0,
        }
    }

    pub fn add_uploaded(&mut self, count: usize) {
        self.records_uploaded += count;
    }

    pub fn finish(self) -> RunSummary {
        RunSummary {
            files_received: self.files_received,
            records_uploaded: self.records_uploaded,
            started_at: self.started_at,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Result of a run as reported to the caller
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Nothing was attempted because the inputs did not qualify
    Precondition { code: i32, message: String },
}

impl RunOutcome {
    pub fn code(&self) -> i32 {
        match self {
            RunOutcome::Completed(_) => 0,
            RunOutcome::Precondition { code, .. } => *code,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            RunOutcome::Completed(summary) => json!({
                "code": 0,
                (transformer::NAME): {
                    "version": transformer::VERSION,
                    "utc_timestamp": now_iso(),
                    "processing_time": format_elapsed(summary.elapsed),
                    "num_files_received": summary.files_received.to_string(),
                    "num_records_added": summary.records_uploaded.to_string(),
                }
            }),
            RunOutcome::Precondition { code, message } => json!({
                "code": code,
                "message": message,
            }),
        }
    }
}
