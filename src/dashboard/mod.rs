//! Dashboard controller: one question, one answer, one render.
//!
//! A submit runs a strictly linear cycle:
//!
//! ```text
//! Idle ──empty──▶ Idle (validation message)
//!   │
//!   └─▶ Fetching ─▶ Revealing ─▶ Rendering ─▶ Complete
//!          │
//!          └──fault──▶ Error
//! ```
//!
//! The controller owns no state between submits: the dataset, metrics and
//! charts are rebuilt every time. Timing lives in [`Pacing`] so the same
//! cycle runs paced in a terminal and instantly behind the web API.

pub mod metrics;
pub mod reveal;
pub mod terminal;
pub mod view;

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::analytics::logger::{AnalysisLog, Outcome};
use crate::charts::{ChartSpec, create_visualizations};
use crate::config::PacingConfig;
use crate::dataset::load_data;
use crate::flow::{AnalysisClient, FaultKind, FlowError, extract_answer};

pub use metrics::{MetricCard, SummaryMetrics};
pub use reveal::{CURSOR, reveal_steps};
pub use view::{DashboardView, RecordingView, ViewEvent};

/// Message shown for an empty question.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question";

/// Message shown while the analysis request is in flight.
pub const LOADING_MESSAGE: &str = "Getting AI analysis... Please wait, could take up to 30 seconds";

// ---------------------------------------------------------------------------
// States and errors
// ---------------------------------------------------------------------------

/// Stage of a dashboard cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Fetching,
    Revealing,
    Rendering,
    Complete,
    Error,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Fetching => write!(f, "fetching"),
            Self::Revealing => write!(f, "revealing"),
            Self::Rendering => write!(f, "rendering"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Why a cycle did not complete.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Please enter a question")]
    EmptyQuery,

    #[error(transparent)]
    Analysis(#[from] FlowError),
}

impl DashboardError {
    /// Text for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyQuery => EMPTY_QUERY_MESSAGE.to_string(),
            Self::Analysis(err) => format!("An error occurred: {err}"),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Self::EmptyQuery => Outcome::Validation,
            Self::Analysis(err) => match err.kind() {
                FaultKind::Configuration => Outcome::Configuration,
                FaultKind::Transport => Outcome::Transport,
                FaultKind::ContractViolation => Outcome::Contract,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Delays between visible updates. All zero means no sleeping at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub reveal_delay: Duration,
    pub lead_pause: Duration,
    pub section_pause: Duration,
}

impl Pacing {
    pub fn instant() -> Self {
        Self {
            reveal_delay: Duration::ZERO,
            lead_pause: Duration::ZERO,
            section_pause: Duration::ZERO,
        }
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            reveal_delay: Duration::from_millis(config.reveal_delay_ms),
            lead_pause: Duration::from_millis(config.lead_pause_ms),
            section_pause: Duration::from_millis(config.section_pause_ms),
        }
    }

    /// Pause before item `index` of a section.
    fn before(&self, index: usize) -> Duration {
        if index == 0 {
            self.lead_pause
        } else {
            self.section_pause
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_config(&PacingConfig::default())
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Everything a successful cycle displayed.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDashboard {
    pub answer: String,
    pub metrics: SummaryMetrics,
    pub cards: [MetricCard; 4],
    pub charts: Vec<ChartSpec>,
    /// Time spent waiting on the analysis endpoint.
    pub latency_ms: u64,
}

/// Metrics and charts without an analysis step.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub metrics: SummaryMetrics,
    pub cards: [MetricCard; 4],
    pub charts: Vec<ChartSpec>,
}

impl DashboardData {
    /// Compute from the embedded dataset.
    pub fn build() -> Self {
        let rows = load_data();
        let metrics = SummaryMetrics::compute(&rows);
        Self {
            cards: metrics.cards(),
            metrics,
            charts: create_visualizations(&rows).into_vec(),
        }
    }
}

/// Orchestrates validation, the analysis call, the reveal and the render.
pub struct Dashboard<C> {
    client: C,
    pacing: Pacing,
    log: Option<AnalysisLog>,
}

impl<C: AnalysisClient> Dashboard<C> {
    pub fn new(client: C, pacing: Pacing) -> Self {
        Self {
            client,
            pacing,
            log: None,
        }
    }

    /// Record every submit in `log`.
    pub fn with_log(mut self, log: AnalysisLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Run one cycle for `message`, drawing into `view`.
    ///
    /// An empty question returns [`DashboardError::EmptyQuery`] after showing
    /// the validation message; the client is not called. Any analysis fault
    /// shows one error message and nothing after it.
    pub fn submit<V: DashboardView>(
        &self,
        message: &str,
        view: &mut V,
    ) -> Result<RenderedDashboard, DashboardError> {
        let started = Instant::now();
        let result = self.run_cycle(message, view);

        if let Some(log) = &self.log {
            let latency_ms = match &result {
                Ok(rendered) => rendered.latency_ms,
                Err(_) => started.elapsed().as_millis() as u64,
            };
            match &result {
                Ok(rendered) => log.record_success(latency_ms, rendered.answer.chars().count()),
                Err(err) => log.record_failure(err.outcome(), latency_ms, &err.to_string()),
            }
        }

        result
    }

    fn run_cycle<V: DashboardView>(
        &self,
        message: &str,
        view: &mut V,
    ) -> Result<RenderedDashboard, DashboardError> {
        view.transition(FlowState::Idle);
        if message.trim().is_empty() {
            view.validation_error(EMPTY_QUERY_MESSAGE);
            return Err(DashboardError::EmptyQuery);
        }

        // Fetching
        view.transition(FlowState::Fetching);
        view.loading(Some(LOADING_MESSAGE));
        let fetch_started = Instant::now();
        let fetched = self
            .client
            .run_flow(message)
            .and_then(|response| extract_answer(&response));
        let latency_ms = fetch_started.elapsed().as_millis() as u64;
        view.loading(None);

        let answer = match fetched {
            Ok(answer) => answer,
            Err(err) => {
                let err = DashboardError::from(err);
                view.transition(FlowState::Error);
                view.error(&err.user_message());
                return Err(err);
            }
        };

        // Revealing
        view.transition(FlowState::Revealing);
        let frames = reveal_steps(&answer);
        let last = frames.len() - 1;
        for (i, frame) in frames.iter().enumerate() {
            view.reveal_frame(frame);
            if i < last {
                pause(self.pacing.reveal_delay);
            }
        }

        // Rendering
        view.transition(FlowState::Rendering);
        let data = DashboardData::build();

        for (i, card) in data.cards.iter().enumerate() {
            pause(self.pacing.before(i));
            view.metric(card);
        }
        for (i, chart) in data.charts.iter().enumerate() {
            pause(self.pacing.before(i));
            view.chart(chart);
        }

        view.transition(FlowState::Complete);

        Ok(RenderedDashboard {
            answer,
            metrics: data.metrics,
            cards: data.cards,
            charts: data.charts,
            latency_ms,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use serde_json::{Value, json};

    use super::*;

    struct StubClient {
        reply: Result<Value, fn() -> FlowError>,
        calls: Cell<usize>,
    }

    impl StubClient {
        fn ok(reply: Value) -> Self {
            Self {
                reply: Ok(reply),
                calls: Cell::new(0),
            }
        }

        fn failing(make: fn() -> FlowError) -> Self {
            Self {
                reply: Err(make),
                calls: Cell::new(0),
            }
        }
    }

    impl AnalysisClient for StubClient {
        fn run_flow(&self, _message: &str) -> Result<Value, FlowError> {
            self.calls.set(self.calls.get() + 1);
            match &self.reply {
                Ok(v) => Ok(v.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn answer(text: &str) -> Value {
        json!({ "outputs": [{ "outputs": [{ "results": { "message": { "text": text } } }] }] })
    }

    #[test]
    fn whitespace_question_never_calls_client() {
        let client = StubClient::ok(answer("unused"));
        let dashboard = Dashboard::new(&client, Pacing::instant());
        let mut view = RecordingView::new();

        let err = dashboard.submit("   \n\t", &mut view).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(client.calls.get(), 0);
        assert_eq!(
            view.events,
            vec![
                ViewEvent::Transition(FlowState::Idle),
                ViewEvent::ValidationError(EMPTY_QUERY_MESSAGE.to_string()),
            ]
        );
    }

    #[test]
    fn successful_cycle_visits_states_in_order() {
        let client = StubClient::ok(answer("ok"));
        let dashboard = Dashboard::new(&client, Pacing::instant());
        let mut view = RecordingView::new();

        dashboard.submit("q", &mut view).unwrap();

        assert_eq!(
            view.states(),
            vec![
                FlowState::Idle,
                FlowState::Fetching,
                FlowState::Revealing,
                FlowState::Rendering,
                FlowState::Complete,
            ]
        );
        assert_eq!(client.calls.get(), 1);
    }

    #[test]
    fn loading_indicator_wraps_the_call() {
        let client = StubClient::failing(|| FlowError::Transport("refused".into()));
        let dashboard = Dashboard::new(&client, Pacing::instant());
        let mut view = RecordingView::new();

        let _ = dashboard.submit("q", &mut view);

        let loading: Vec<&ViewEvent> = view
            .events
            .iter()
            .filter(|e| matches!(e, ViewEvent::Loading(_)))
            .collect();
        assert_eq!(
            loading,
            vec![
                &ViewEvent::Loading(Some(LOADING_MESSAGE.to_string())),
                &ViewEvent::Loading(None),
            ]
        );
    }

    #[test]
    fn contract_violation_shows_generic_message() {
        let client = StubClient::ok(json!({ "outputs": [] }));
        let dashboard = Dashboard::new(&client, Pacing::instant());
        let mut view = RecordingView::new();

        let err = dashboard.submit("q", &mut view).unwrap_err();

        assert_eq!(err.outcome(), Outcome::Contract);
        assert_eq!(
            view.events.last(),
            Some(&ViewEvent::Error(
                "An error occurred: analysis response has no 'outputs[0]'".to_string()
            ))
        );
        assert!(view.frames().is_empty());
    }

    #[test]
    fn rendered_result_carries_everything() {
        let client = StubClient::ok(answer("Reels perform best."));
        let dashboard = Dashboard::new(&client, Pacing::instant());

        let rendered = dashboard.submit("q", &mut RecordingView::new()).unwrap();

        assert_eq!(rendered.answer, "Reels perform best.");
        assert_eq!(rendered.metrics.total_posts, 20);
        assert_eq!(rendered.charts.len(), 4);
        assert_eq!(rendered.cards[3].value, "524893");
    }

    #[test]
    fn pacing_from_config_and_lead_pause() {
        let pacing = Pacing::default();
        assert_eq!(pacing.reveal_delay, Duration::from_millis(4));
        assert_eq!(pacing.before(0), Duration::from_millis(500));
        assert_eq!(pacing.before(2), Duration::from_millis(300));
        assert_eq!(Pacing::instant().before(0), Duration::ZERO);
    }

    /// Timestamps every reveal frame and metric.
    #[derive(Default)]
    struct TimedView {
        frames: Vec<Instant>,
        metrics: Vec<Instant>,
    }

    impl DashboardView for TimedView {
        fn validation_error(&mut self, _message: &str) {}
        fn loading(&mut self, _message: Option<&str>) {}
        fn reveal_frame(&mut self, _frame: &str) {
            self.frames.push(Instant::now());
        }
        fn metric(&mut self, _card: &MetricCard) {
            self.metrics.push(Instant::now());
        }
        fn chart(&mut self, _chart: &ChartSpec) {}
        fn error(&mut self, _message: &str) {}
    }

    #[test]
    fn reveal_waits_between_frames_but_not_after_the_last() {
        let delay = Duration::from_millis(20);
        let pacing = Pacing {
            reveal_delay: delay,
            lead_pause: Duration::ZERO,
            section_pause: Duration::ZERO,
        };
        let client = StubClient::ok(answer("abc"));
        let dashboard = Dashboard::new(&client, pacing);
        let mut view = TimedView::default();

        dashboard.submit("q", &mut view).unwrap();

        assert_eq!(view.frames.len(), 5);
        for pair in view.frames.windows(2) {
            assert!(pair[1] - pair[0] >= delay, "frames closer than the delay");
        }

        let last_frame = *view.frames.last().unwrap();
        let first_metric = view.metrics[0];
        assert!(
            first_metric - last_frame < delay,
            "pause after the final frame"
        );
    }

    #[test]
    fn user_messages() {
        assert_eq!(DashboardError::EmptyQuery.user_message(), "Please enter a question");
        let err = DashboardError::from(FlowError::Transport("timed out".into()));
        assert_eq!(
            err.user_message(),
            "An error occurred: request to analysis endpoint failed: timed out"
        );
        assert_eq!(err.outcome(), Outcome::Transport);
    }
}
