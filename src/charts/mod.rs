//! Chart construction over the post dataset.
//!
//! Every chart is a plain, serializable description ([`ChartSpec`]). The web
//! frontend draws them as SVG and the CLI draws them as text bars, so this
//! module never deals with pixels.

pub mod aggregate;

use serde::Serialize;

use crate::dataset::{PostRecord, PostType};
use aggregate::{group_mean, value_counts};

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

/// A renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar(BarChart),
    Scatter(ScatterChart),
    Pie(PieChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            Self::Bar(c) => &c.title,
            Self::Scatter(c) => &c.title,
            Self::Pie(c) => &c.title,
        }
    }
}

/// Bar chart with one or more series sharing the same categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    /// Bars of different series sit side by side rather than stacked.
    pub grouped: bool,
}

/// One metric across all categories; `values[i]` belongs to `categories[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<ScatterGroup>,
}

/// Points sharing one colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterGroup {
    pub name: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Shown on hover.
    pub post_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

impl PieChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// The four dashboard charts, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visualizations {
    pub engagement: ChartSpec,
    pub scatter: ChartSpec,
    pub distribution: ChartSpec,
    pub topics: ChartSpec,
}

impl Visualizations {
    pub fn into_vec(self) -> Vec<ChartSpec> {
        vec![self.engagement, self.scatter, self.distribution, self.topics]
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build all four dashboard charts from the dataset.
pub fn create_visualizations(rows: &[PostRecord]) -> Visualizations {
    Visualizations {
        engagement: engagement_by_type(rows),
        scatter: rate_vs_reach(rows),
        distribution: post_type_distribution(rows),
        topics: rate_by_topic(rows),
    }
}

/// Grouped bar: mean likes / comments / shares per post type.
pub fn engagement_by_type(rows: &[PostRecord]) -> ChartSpec {
    let likes = group_mean(rows, |r| r.post_type, |r| r.likes as f64);
    let comments = group_mean(rows, |r| r.post_type, |r| r.comments as f64);
    let shares = group_mean(rows, |r| r.post_type, |r| r.shares as f64);

    let categories = likes.iter().map(|(t, _)| t.to_string()).collect();
    let series = [("likes", likes), ("comments", comments), ("shares", shares)]
        .into_iter()
        .map(|(name, means)| BarSeries {
            name: name.to_string(),
            values: means.into_iter().map(|(_, v)| v).collect(),
        })
        .collect();

    ChartSpec::Bar(BarChart {
        title: "Average Engagement Metrics by Post Type".to_string(),
        x_label: "post_type".to_string(),
        y_label: "value".to_string(),
        categories,
        series,
        grouped: true,
    })
}

/// Scatter: engagement rate against reach, coloured by post type.
///
/// Colour groups follow the order in which each type first appears.
pub fn rate_vs_reach(rows: &[PostRecord]) -> ChartSpec {
    let mut groups: Vec<(PostType, ScatterGroup)> = Vec::new();

    for row in rows {
        let point = ScatterPoint {
            x: row.reach as f64,
            y: row.engagement_rate,
            post_id: row.post_id,
        };
        match groups.iter_mut().find(|(t, _)| *t == row.post_type) {
            Some((_, group)) => group.points.push(point),
            None => groups.push((
                row.post_type,
                ScatterGroup {
                    name: row.post_type.to_string(),
                    points: vec![point],
                },
            )),
        }
    }

    ChartSpec::Scatter(ScatterChart {
        title: "Engagement Rate vs Reach by Post Type".to_string(),
        x_label: "reach".to_string(),
        y_label: "engagement_rate".to_string(),
        groups: groups.into_iter().map(|(_, g)| g).collect(),
    })
}

/// Pie: number of posts per type, largest first.
pub fn post_type_distribution(rows: &[PostRecord]) -> ChartSpec {
    let slices = value_counts(rows, |r| r.post_type)
        .into_iter()
        .map(|(t, count)| PieSlice {
            label: t.to_string(),
            value: count as f64,
        })
        .collect();

    ChartSpec::Pie(PieChart {
        title: "Distribution of Post Types".to_string(),
        slices,
    })
}

/// Bar: mean engagement rate per topic.
pub fn rate_by_topic(rows: &[PostRecord]) -> ChartSpec {
    let means = group_mean(rows, |r| r.topic, |r| r.engagement_rate);

    ChartSpec::Bar(BarChart {
        title: "Average Engagement Rate by Topic".to_string(),
        x_label: "topic".to_string(),
        y_label: "engagement_rate".to_string(),
        categories: means.iter().map(|(t, _)| t.to_string()).collect(),
        series: vec![BarSeries {
            name: "engagement_rate".to_string(),
            values: means.into_iter().map(|(_, v)| v).collect(),
        }],
        grouped: false,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_data;

    fn bar(spec: &ChartSpec) -> &BarChart {
        match spec {
            ChartSpec::Bar(b) => b,
            other => panic!("expected bar chart, got {other:?}"),
        }
    }

    #[test]
    fn engagement_chart_groups_alphabetically() {
        let chart = engagement_by_type(&load_data());
        let chart = bar(&chart);
        assert!(chart.grouped);
        assert_eq!(
            chart.categories,
            vec!["carousel", "reel", "static_image", "video"]
        );
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["likes", "comments", "shares"]);
    }

    #[test]
    fn engagement_chart_reel_means() {
        let chart = engagement_by_type(&load_data());
        let chart = bar(&chart);
        let reel = chart.categories.iter().position(|c| c == "reel").unwrap();
        assert!((chart.series[0].values[reel] - 45370.0 / 6.0).abs() < 1e-9);
        assert!((chart.series[1].values[reel] - 2470.0).abs() < 1e-9);
        assert!((chart.series[2].values[reel] - 14624.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn scatter_has_one_point_per_row_in_appearance_order() {
        let ChartSpec::Scatter(chart) = rate_vs_reach(&load_data()) else {
            panic!("expected scatter chart");
        };
        let names: Vec<&str> = chart.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["reel", "video", "carousel", "static_image"]);

        let total: usize = chart.groups.iter().map(|g| g.points.len()).sum();
        assert_eq!(total, 20);

        let first = &chart.groups[0].points[0];
        assert_eq!(first.post_id, 101);
        assert_eq!(first.x, 6108.0);
    }

    #[test]
    fn pie_slices_follow_value_counts() {
        let ChartSpec::Pie(chart) = post_type_distribution(&load_data()) else {
            panic!("expected pie chart");
        };
        let slices: Vec<(&str, f64)> = chart
            .slices
            .iter()
            .map(|s| (s.label.as_str(), s.value))
            .collect();
        assert_eq!(
            slices,
            vec![
                ("carousel", 7.0),
                ("reel", 6.0),
                ("video", 5.0),
                ("static_image", 2.0)
            ]
        );
        assert_eq!(chart.total(), 20.0);
    }

    #[test]
    fn topic_chart_means() {
        let chart = rate_by_topic(&load_data());
        let chart = bar(&chart);
        assert!(!chart.grouped);
        assert_eq!(
            chart.categories,
            vec!["dance", "fashion", "memes", "sports", "technology"]
        );
        let sports = chart.series[0].values[3];
        assert!((sports - 3.1892).abs() < 1e-9);
    }

    #[test]
    fn create_visualizations_is_deterministic() {
        let rows = load_data();
        assert_eq!(create_visualizations(&rows), create_visualizations(&rows));
    }

    #[test]
    fn chart_spec_serializes_with_kind_tag() {
        let json = serde_json::to_value(post_type_distribution(&load_data())).unwrap();
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["title"], "Distribution of Post Types");
        assert_eq!(json["slices"][0]["label"], "carousel");
    }
}
