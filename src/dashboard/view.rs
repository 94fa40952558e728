//! Display surface the controller drives.

use crate::charts::ChartSpec;

use super::FlowState;
use super::metrics::MetricCard;

/// Sink for everything a dashboard cycle shows.
///
/// Calls arrive in display order. Implementations must not fail; a view that
/// cannot draw simply drops the update.
pub trait DashboardView {
    /// The cycle moved to `state`.
    fn transition(&mut self, _state: FlowState) {}
    /// Field-level message for a rejected question.
    fn validation_error(&mut self, message: &str);
    /// Loading indicator on (`Some(message)`) or off (`None`).
    fn loading(&mut self, message: Option<&str>);
    /// Replace the answer region with `frame`.
    fn reveal_frame(&mut self, frame: &str);
    fn metric(&mut self, card: &MetricCard);
    fn chart(&mut self, chart: &ChartSpec);
    /// The cycle ended in a fault.
    fn error(&mut self, message: &str);
}

/// A recorded view update.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Transition(FlowState),
    ValidationError(String),
    Loading(Option<String>),
    Frame(String),
    Metric(MetricCard),
    Chart(String),
    Error(String),
}

/// View that keeps every update in memory.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal frames in the order they were drawn.
    pub fn frames(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Frame(f) => Some(f.as_str()),
                _ => None,
            })
            .collect()
    }

    /// States visited, in order.
    pub fn states(&self) -> Vec<FlowState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Transition(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn count<F: Fn(&ViewEvent) -> bool>(&self, pred: F) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl DashboardView for RecordingView {
    fn transition(&mut self, state: FlowState) {
        self.events.push(ViewEvent::Transition(state));
    }

    fn validation_error(&mut self, message: &str) {
        self.events.push(ViewEvent::ValidationError(message.to_string()));
    }

    fn loading(&mut self, message: Option<&str>) {
        self.events
            .push(ViewEvent::Loading(message.map(str::to_string)));
    }

    fn reveal_frame(&mut self, frame: &str) {
        self.events.push(ViewEvent::Frame(frame.to_string()));
    }

    fn metric(&mut self, card: &MetricCard) {
        self.events.push(ViewEvent::Metric(card.clone()));
    }

    fn chart(&mut self, chart: &ChartSpec) {
        self.events.push(ViewEvent::Chart(chart.title().to_string()));
    }

    fn error(&mut self, message: &str) {
        self.events.push(ViewEvent::Error(message.to_string()));
    }
}
