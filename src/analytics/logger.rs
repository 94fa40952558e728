use std::fmt;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{self, schema::LoggingConfig};

// ---------------------------------------------------------------------------
// Run log entry (JSONL analytics)
// ---------------------------------------------------------------------------

/// How a dashboard cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Validation,
    Configuration,
    Transport,
    Contract,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Validation => write!(f, "validation"),
            Self::Configuration => write!(f, "configuration"),
            Self::Transport => write!(f, "transport"),
            Self::Contract => write!(f, "contract"),
        }
    }
}

/// One line of the analysis log.
///
/// Only timing and outcome are kept. Questions and answers are never
/// written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub timestamp: String,
    pub outcome: Outcome,
    pub latency_ms: u64,
    /// Length of the revealed answer (successful runs only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub answer_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Append-only JSONL log of dashboard cycles.
///
/// Writes are best-effort: a log that cannot be written never affects the
/// dashboard.
#[derive(Debug, Clone)]
pub struct AnalysisLog {
    path: PathBuf,
}

impl AnalysisLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log configured in `[logging]`, or `None` when disabled.
    pub fn from_config(config: &LoggingConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        config::expand_home(&config.path).map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_success(&self, latency_ms: u64, answer_chars: usize) {
        self.record(&RunLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            outcome: Outcome::Success,
            latency_ms,
            answer_chars: Some(answer_chars),
            error: None,
        });
    }

    pub fn record_failure(&self, outcome: Outcome, latency_ms: u64, error: &str) {
        self.record(&RunLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            outcome,
            latency_ms,
            answer_chars: None,
            error: Some(error.to_string()),
        });
    }

    pub fn record(&self, entry: &RunLogEntry) {
        let _ = self.append(entry);
    }

    fn append(&self, entry: &RunLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read all entries, skipping malformed lines.
    pub fn read_entries(&self) -> Vec<RunLogEntry> {
        let Ok(file) = fs::File::open(&self.path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect()
    }

    /// Entries from the last `days` days, or all entries for `None`.
    pub fn read_entries_since_days(&self, days: Option<u32>) -> Vec<RunLogEntry> {
        let entries = self.read_entries();
        let Some(days) = days else {
            return entries;
        };

        let cutoff = Utc::now() - Duration::days(i64::from(days));
        entries
            .into_iter()
            .filter(|e| {
                DateTime::parse_from_rfc3339(&e.timestamp)
                    .map(|ts| ts.with_timezone(&Utc) >= cutoff)
                    .unwrap_or(false)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
