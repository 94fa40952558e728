//! Analysis run analytics: the JSONL log and its aggregate report.

pub mod logger;
pub mod reporter;
