use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::analysis::GUITAR_STRINGS;
use crate::engine::{CycleStats, TunerHandle};

use super::sse;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct TunerHttpState {
    pub handle: Arc<TunerHandle>,
}

impl TunerHttpState {
    pub fn new(handle: Arc<TunerHandle>) -> Self {
        Self { handle }
    }
}

/// Reading endpoint response payload.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub frequency: f64,
    pub note: String,
    pub string: String,
}

/// Health endpoint response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub stats: CycleStats,
}

/// Informational page, built once with the reference table rendered in.
static INDEX_PAGE: Lazy<String> = Lazy::new(|| {
    let rows: String = GUITAR_STRINGS
        .iter()
        .map(|s| format!("<tr><td>{}</td><td>{:.2} Hz</td></tr>\n", s.name, s.frequency))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Guitar Tuner</title>
  <style>
    body {{ font-family: sans-serif; max-width: 32rem; margin: 2rem auto; }}
    p, td {{ font-size: 1.1rem; }}
    .note {{ font-weight: 700; font-size: 1.6rem; }}
    table {{ border-collapse: collapse; }}
    td {{ padding: 0.2rem 1rem 0.2rem 0; }}
  </style>
</head>
<body>
  <h1>Guitar Tuner</h1>
  <p>Frequency: <span id="frequency">--.--</span> Hz</p>
  <p>Note: <span class="note" id="note">??</span></p>
  <p>Nearest string: <span id="string">none</span></p>
  <h2>Reference strings</h2>
  <table>
{rows}  </table>
  <script>
    async function fetchData() {{
      try {{
        const response = await fetch('/data');
        if (!response.ok) throw new Error('bad response');
        const data = await response.json();
        document.getElementById('frequency').textContent = data.frequency.toFixed(2);
        document.getElementById('note').textContent = data.note;
        document.getElementById('string').textContent = data.string;
      }} catch (e) {{
        console.error('fetch failed:', e);
      }}
    }}
    setInterval(fetchData, 1000);
    fetchData();
  </script>
</body>
</html>
"#
    )
});

/// Build the Axum router with all handlers.
pub fn build_router(state: TunerHttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/data", get(data))
        .route("/health", get(health))
        .route("/stream", get(reading_stream_handler))
        .with_state(state)
}

/// Run the HTTP server loop.
pub async fn run_http_server(state: TunerHttpState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding tuner HTTP listener")?;
    let router = build_router(state);
    axum::serve(listener, router)
        .await
        .context("serving tuner HTTP router")?;
    Ok(())
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE.as_str())
}

pub async fn data(State(state): State<TunerHttpState>) -> Json<DataResponse> {
    let reading = state.handle.snapshot();

    Json(DataResponse {
        frequency: (reading.frequency_hz as f64 * 100.0).round() / 100.0,
        note: reading.note.to_string(),
        string: reading.string_name().to_string(),
    })
}

pub async fn health(State(state): State<TunerHttpState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        stats: state.handle.stats(),
    })
}

pub async fn reading_stream_handler(State(state): State<TunerHttpState>) -> sse::ReadingStream {
    sse::readings(&state.handle)
}
