//! Analytics reporter: aggregates the analysis log for `socialflow stats`
//! and `GET /api/stats`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analytics::logger::{Outcome, RunLogEntry};

/// Summary of logged dashboard cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub total_runs: usize,
    pub successes: usize,
    /// Percentage of runs that completed, 0.0 when there are none.
    pub success_pct: f64,
    /// Mean endpoint latency over successful runs.
    pub avg_latency_ms: Option<u64>,
    /// Run count per outcome, keyed by outcome name.
    pub outcomes: BTreeMap<String, usize>,
    /// Most recent failure message.
    pub last_error: Option<String>,
}

pub fn build_report(entries: &[RunLogEntry]) -> RunReport {
    let total_runs = entries.len();
    let successful: Vec<&RunLogEntry> = entries
        .iter()
        .filter(|e| e.outcome == Outcome::Success)
        .collect();
    let successes = successful.len();

    let success_pct = if total_runs == 0 {
        0.0
    } else {
        (successes as f64 / total_runs as f64) * 100.0
    };

    let avg_latency_ms = if successful.is_empty() {
        None
    } else {
        let total: u64 = successful.iter().map(|e| e.latency_ms).sum();
        Some(total / successful.len() as u64)
    };

    let mut outcomes = BTreeMap::new();
    for entry in entries {
        *outcomes.entry(entry.outcome.to_string()).or_insert(0) += 1;
    }

    let last_error = entries.iter().rev().find_map(|e| e.error.clone());

    RunReport {
        total_runs,
        successes,
        success_pct,
        avg_latency_ms,
        outcomes,
        last_error,
    }
}
