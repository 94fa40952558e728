//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::analytics::logger::AnalysisLog;
use crate::analytics::reporter::{self, RunReport};
use crate::config::{PacingConfig, SocialFlowConfig};
use crate::dashboard::{
    Dashboard, DashboardData, DashboardError, MetricCard, Pacing, RecordingView, SummaryMetrics,
};
use crate::charts::ChartSpec;
use crate::dataset::{self, PostRecord};
use crate::flow::{AnalysisClient, ConfiguredClient};

use super::{HttpResponse, content_type_json, error_response};

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

/// `POST /api/analyze` body.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    message: String,
}

/// Successful analysis: the answer plus everything rendered after it.
///
/// The page replays the reveal itself using `pacing`.
#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    answer: String,
    pacing: PacingConfig,
    cards: [MetricCard; 4],
    metrics: SummaryMetrics,
    charts: Vec<ChartSpec>,
    latency_ms: u64,
}

/// Failed analysis.
#[derive(Debug, Serialize)]
struct AnalyzeError {
    error: String,
    kind: String,
}

#[derive(Debug, Serialize)]
struct DataResponse {
    columns: &'static [&'static str],
    rows: Vec<PostRecord>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ready: bool,
    missing: Option<&'static str>,
    endpoint: String,
    timeout_ms: u64,
    token: String,
    logging: bool,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    days: Option<u32>,
    report: RunReport,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_response<T: Serialize>(status: u16, data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

/// Parse the `?days=N` query parameter from a URL.
fn parse_days_param(url: &str) -> Option<u32> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == "days" { v.parse().ok() } else { None }
    })
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/analyze`: run one dashboard cycle for `{"message": "..."}`.
///
/// 400 for an empty question, 502 for any analysis fault.
pub fn post_analyze(config: &SocialFlowConfig, body: &str) -> Result<HttpResponse> {
    let client = ConfiguredClient::from_config(&config.flow);
    analyze_with(config, &client, body)
}

pub(crate) fn analyze_with<C: AnalysisClient>(
    config: &SocialFlowConfig,
    client: C,
    body: &str,
) -> Result<HttpResponse> {
    let request: AnalyzeRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => return Ok(error_response(400, &format!("invalid JSON body: {e}"))),
    };

    // The browser paces the reveal; the server renders at once.
    let mut dashboard = Dashboard::new(client, Pacing::instant());
    if let Some(log) = AnalysisLog::from_config(&config.logging) {
        dashboard = dashboard.with_log(log);
    }

    match dashboard.submit(&request.message, &mut RecordingView::new()) {
        Ok(rendered) => json_response(
            200,
            &AnalyzeResponse {
                answer: rendered.answer,
                pacing: config.pacing.clone(),
                cards: rendered.cards,
                metrics: rendered.metrics,
                charts: rendered.charts,
                latency_ms: rendered.latency_ms,
            },
        ),
        Err(err) => {
            let status = if err.is_validation() { 400 } else { 502 };
            json_response(status, &analyze_error(&err))
        }
    }
}

fn analyze_error(err: &DashboardError) -> AnalyzeError {
    AnalyzeError {
        error: err.user_message(),
        kind: err.outcome().to_string(),
    }
}

/// `GET /api/dashboard`: metrics and charts only.
pub fn get_dashboard() -> Result<HttpResponse> {
    json_response(200, &DashboardData::build())
}

/// `GET /api/data`: the embedded dataset.
pub fn get_data() -> Result<HttpResponse> {
    json_response(
        200,
        &DataResponse {
            columns: &dataset::COLUMNS,
            rows: dataset::load_data(),
        },
    )
}

/// `GET /api/health`: whether analysis can run.
pub fn get_health(config: &SocialFlowConfig) -> Result<HttpResponse> {
    let missing = config.flow.missing_value();
    json_response(
        200,
        &HealthResponse {
            ready: missing.is_none(),
            missing,
            endpoint: config.flow.run_url(),
            timeout_ms: config.flow.timeout_ms,
            token: config.flow.masked_token(),
            logging: config.logging.enabled,
        },
    )
}

/// `GET /api/stats?days=N`: analysis log report.
pub fn get_stats(config: &SocialFlowConfig, url: &str) -> Result<HttpResponse> {
    let days = parse_days_param(url);
    let entries = AnalysisLog::from_config(&config.logging)
        .map(|log| log.read_entries_since_days(days))
        .unwrap_or_default();

    json_response(
        200,
        &StatsResponse {
            days,
            report: reporter::build_report(&entries),
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Read;

    use serde_json::{Value, json};

    use super::*;
    use crate::flow::FlowError;

    struct Fixed(Result<Value, String>);

    impl AnalysisClient for Fixed {
        fn run_flow(&self, _message: &str) -> Result<Value, FlowError> {
            self.0.clone().map_err(FlowError::Transport)
        }
    }

    fn quiet_config() -> SocialFlowConfig {
        let mut cfg = SocialFlowConfig::default();
        cfg.logging.enabled = false;
        cfg
    }

    fn read(resp: HttpResponse) -> (u16, Value) {
        let status = resp.status_code().0;
        let mut body = String::new();
        resp.into_reader().read_to_string(&mut body).unwrap();
        (status, serde_json::from_str(&body).unwrap())
    }

    #[test]
    fn parse_days_param_extracts_value() {
        assert_eq!(parse_days_param("/api/stats?days=7"), Some(7));
        assert_eq!(parse_days_param("/api/stats?foo=bar&days=14"), Some(14));
        assert_eq!(parse_days_param("/api/stats"), None);
        assert_eq!(parse_days_param("/api/stats?days=abc"), None);
    }

    #[test]
    fn analyze_success_returns_render_payload() {
        let client = Fixed(Ok(json!({
            "outputs": [{ "outputs": [{ "results": { "message": { "text": "Reels perform best." } } }] }]
        })));
        let resp = analyze_with(&quiet_config(), &client, r#"{"message":"What performs best?"}"#)
            .unwrap();
        let (status, body) = read(resp);

        assert_eq!(status, 200);
        assert_eq!(body["answer"], "Reels perform best.");
        assert_eq!(body["pacing"]["reveal_delay_ms"], 4);
        assert_eq!(body["cards"].as_array().map(Vec::len), Some(4));
        assert_eq!(body["charts"].as_array().map(Vec::len), Some(4));
        assert_eq!(body["metrics"]["total_reach"], 524_893);
    }

    #[test]
    fn analyze_empty_message_is_400() {
        let client = Fixed(Err("should not be called".into()));
        let (status, body) = read(analyze_with(&quiet_config(), &client, r#"{"message":"  "}"#).unwrap());
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Please enter a question");
        assert_eq!(body["kind"], "validation");
    }

    #[test]
    fn analyze_transport_fault_is_502() {
        let client = Fixed(Err("connection refused".into()));
        let (status, body) = read(analyze_with(&quiet_config(), &client, r#"{"message":"hi"}"#).unwrap());
        assert_eq!(status, 502);
        assert_eq!(
            body["error"],
            "An error occurred: request to analysis endpoint failed: connection refused"
        );
        assert!(body.get("charts").is_none());
    }

    #[test]
    fn analyze_rejects_malformed_body() {
        let client = Fixed(Err("unused".into()));
        let (status, _) = read(analyze_with(&quiet_config(), &client, "not json").unwrap());
        assert_eq!(status, 400);
    }

    #[test]
    fn health_reports_missing_secret() {
        let (status, body) = read(get_health(&quiet_config()).unwrap());
        assert_eq!(status, 200);
        assert_eq!(body["ready"], false);
        assert_eq!(body["missing"], "flow.deployment_id");
    }

    #[test]
    fn data_lists_twenty_rows() {
        let (_, body) = read(get_data().unwrap());
        assert_eq!(body["rows"].as_array().map(Vec::len), Some(20));
        assert_eq!(body["columns"][8], "engagement_rate");
    }

    #[test]
    fn stats_with_logging_disabled_is_empty() {
        let (_, body) = read(get_stats(&quiet_config(), "/api/stats").unwrap());
        assert_eq!(body["report"]["total_runs"], 0);
    }
}
