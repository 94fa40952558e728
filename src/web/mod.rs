//! Embedded web dashboard for socialflow.
//!
//! A sync `tiny_http` server that serves:
//! - the single-page dashboard (question box, streamed answer, metrics,
//!   charts)
//! - JSON API endpoints for analysis, dataset, charts, health and stats
//!
//! Launched via `socialflow serve` (default: `http://127.0.0.1:8501`).
//! Requests are handled one at a time, so at most one analysis cycle is in
//! flight.

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use colored::Colorize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::SocialFlowConfig;

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server and block the current thread.
///
/// A failing request gets a JSON error body; the server keeps running.
pub fn serve(config: &SocialFlowConfig) -> Result<()> {
    let addr = config.server.addr.as_str();
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("{} http://{addr}", "socialflow dashboard running at".bold());
    if let Some(missing) = config.flow.missing_value() {
        println!(
            "{}",
            format!("warning: '{missing}' is not set; analysis requests will fail").yellow()
        );
    }
    println!("Press Ctrl+C to stop.\n");

    if config.server.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Post | Method::Put) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let response = match dispatch(config, &method, &url, body.as_deref()) {
            Ok(resp) => resp,
            Err(e) => error_response(500, &e.to_string()),
        };
        let status = response.status_code().0;
        let _ = request.respond(response);

        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route a request to its handler.
pub(crate) fn dispatch(
    config: &SocialFlowConfig,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<HttpResponse> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        (&Method::Post, "/api/analyze") => api::post_analyze(config, body.unwrap_or("")),
        (&Method::Get, "/api/dashboard") => api::get_dashboard(),
        (&Method::Get, "/api/data") => api::get_data(),
        (&Method::Get, "/api/health") => api::get_health(config),
        (&Method::Get, "/api/stats") => api::get_stats(config, url),

        _ => Ok(error_response(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// JSON `{"error": message}` with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

pub(crate) fn content_type_json() -> Header {
    header("Content-Type", "application/json; charset=utf-8")
}

fn content_type_html() -> Header {
    header("Content-Type", "text/html; charset=utf-8")
}

fn header(name: &str, value: &str) -> Header {
    // Both halves are ASCII literals, which tiny_http always accepts.
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .unwrap_or_else(|_| unreachable!("static header {name} is valid"))
}

/// Open a URL in the system browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
