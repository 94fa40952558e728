//! Summary metric cards shown above the charts.

use serde::Serialize;

use crate::dataset::{PostRecord, mean_by, sum_by};

/// One labelled number on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    /// Display text, already formatted.
    pub value: String,
}

/// The four headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_posts: usize,
    /// Mean likes, truncated toward zero.
    pub avg_likes: u64,
    /// Mean engagement rate in percent, unrounded.
    pub avg_engagement_rate: f64,
    pub total_reach: u64,
}

impl SummaryMetrics {
    pub fn compute(rows: &[PostRecord]) -> Self {
        Self {
            total_posts: rows.len(),
            avg_likes: mean_by(rows, |r| r.likes as f64).trunc() as u64,
            avg_engagement_rate: mean_by(rows, |r| r.engagement_rate),
            total_reach: sum_by(rows, |r| r.reach),
        }
    }

    /// Cards in display order.
    pub fn cards(&self) -> [MetricCard; 4] {
        [
            MetricCard {
                label: "Total Posts",
                value: self.total_posts.to_string(),
            },
            MetricCard {
                label: "Avg. Likes",
                value: self.avg_likes.to_string(),
            },
            MetricCard {
                label: "Avg. Engagement Rate",
                value: format!("{:.2}%", self.avg_engagement_rate),
            },
            MetricCard {
                label: "Total Reach",
                value: self.total_reach.to_string(),
            },
        ]
    }
}
