//! Terminal rendition of the dashboard for `socialflow ask`.

use std::io::{self, Write};

use colored::Colorize;

use super::metrics::MetricCard;
use super::reveal::CURSOR;
use super::view::DashboardView;
use crate::charts::{BarChart, ChartSpec, PieChart, ScatterChart};

/// Width of the longest bar in text charts.
const BAR_WIDTH: usize = 40;

/// Draws the cycle on stdout.
///
/// Reveal frames are drawn incrementally: only the characters added since
/// the previous frame are printed, followed by the cursor glyph and a
/// backspace so the next character overwrites it.
#[derive(Debug, Default)]
pub struct TerminalView {
    /// Characters of the answer already printed.
    printed: usize,
    metrics_started: bool,
    charts_started: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush() {
        let _ = io::stdout().flush();
    }
}

impl DashboardView for TerminalView {
    fn validation_error(&mut self, message: &str) {
        eprintln!("{}", message.red());
    }

    fn loading(&mut self, message: Option<&str>) {
        match message {
            Some(text) => {
                print!("{} ", text.dimmed());
                Self::flush();
            }
            None => println!(),
        }
    }

    fn reveal_frame(&mut self, frame: &str) {
        if self.printed == 0 && frame.starts_with(CURSOR) {
            println!("{}", "### AI Analysis".bold().cyan());
        }

        let (text, has_cursor) = match frame.strip_suffix(CURSOR) {
            Some(text) => (text, true),
            None => (frame, false),
        };

        let new: String = text.chars().skip(self.printed).collect();
        self.printed += new.chars().count();

        if has_cursor {
            print!("{new}{CURSOR}\x08");
        } else {
            println!("{new} ");
            println!("{}", "-".repeat(60).dimmed());
        }
        Self::flush();
    }

    fn metric(&mut self, card: &MetricCard) {
        if !self.metrics_started {
            self.metrics_started = true;
            println!("{}", "### Key Metrics".bold().cyan());
        }
        println!("  {:<22} {}", card.label.bold(), card.value.green());
        Self::flush();
    }

    fn chart(&mut self, chart: &ChartSpec) {
        if !self.charts_started {
            self.charts_started = true;
            println!();
            println!("{}", "### Performance Visualizations".bold().cyan());
        }
        println!();
        print!("{}", render_chart(chart));
        Self::flush();
    }

    fn error(&mut self, message: &str) {
        eprintln!("{}", message.red().bold());
    }
}

// ---------------------------------------------------------------------------
// Text charts
// ---------------------------------------------------------------------------

/// Plain-text rendering of a chart (no colour codes).
pub fn render_chart(chart: &ChartSpec) -> String {
    match chart {
        ChartSpec::Bar(bar) => render_bar(bar),
        ChartSpec::Scatter(scatter) => render_scatter(scatter),
        ChartSpec::Pie(pie) => render_pie(pie),
    }
}

fn bar_len(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max) * BAR_WIDTH as f64).round() as usize
}

fn render_bar(chart: &BarChart) -> String {
    let mut out = format!("{}\n", chart.title);
    let max = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);
    let label_width = chart
        .categories
        .iter()
        .map(|c| c.len())
        .chain(chart.series.iter().map(|s| s.name.len()))
        .max()
        .unwrap_or(0);

    for (i, category) in chart.categories.iter().enumerate() {
        if chart.series.len() == 1 {
            let value = chart.series[0].values[i];
            out.push_str(&format!(
                "  {:<w$} {} {:.2}\n",
                category,
                "█".repeat(bar_len(value, max)),
                value,
                w = label_width
            ));
        } else {
            out.push_str(&format!("  {category}\n"));
            for series in &chart.series {
                let value = series.values[i];
                out.push_str(&format!(
                    "    {:<w$} {} {:.1}\n",
                    series.name,
                    "█".repeat(bar_len(value, max)),
                    value,
                    w = label_width
                ));
            }
        }
    }
    out
}

fn render_scatter(chart: &ScatterChart) -> String {
    let mut out = format!("{}\n", chart.title);
    out.push_str(&format!(
        "  {:<14} {:>8} {:>10} {:>16}\n",
        "post_type", "post_id", chart.x_label, chart.y_label
    ));
    for group in &chart.groups {
        for point in &group.points {
            out.push_str(&format!(
                "  {:<14} {:>8} {:>10} {:>16.4}\n",
                group.name, point.post_id, point.x, point.y
            ));
        }
    }
    out
}

fn render_pie(chart: &PieChart) -> String {
    let mut out = format!("{}\n", chart.title);
    let total = chart.total();
    let max = chart.slices.iter().map(|s| s.value).fold(0.0_f64, f64::max);
    for slice in &chart.slices {
        let pct = if total > 0.0 {
            slice.value / total * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "  {:<14} {} {} ({:.1}%)\n",
            slice.label,
            "█".repeat(bar_len(slice.value, max)),
            slice.value,
            pct
        ));
    }
    out
}
