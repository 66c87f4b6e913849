use crate::engine::{normalize_number, Classifier};
use anyhow::{Context, Result};
use axum::{
    extract::{ConnectInfo, Path, State},
    response::Html,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

struct ApiState {
    classifier: Arc<Classifier>,
}

/// Builds the application router: the directions page and the check endpoint.
pub fn router(classifier: Arc<Classifier>) -> Router {
    let state = Arc::new(ApiState { classifier });

    Router::new()
        .route("/", get(directions))
        .route("/check/{number}", get(check))
        .with_state(state)
}

/// Binds the listener and serves until `cancel` fires.
pub async fn start_http_server(
    classifier: Arc<Classifier>,
    host: &str,
    port: u16,
    cancel: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        router(classifier).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { cancel.cancelled().await })
    .await
    .context("HTTP server failed")
}

/// Compares the provided number with the pattern list and returns the verdict
/// as plain text. Never rejects input: anything that normalizes to an empty
/// string simply matches nothing.
async fn check(
    State(state): State<Arc<ApiState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(number): Path<String>,
) -> &'static str {
    let start = Instant::now();

    let normalized = normalize_number(&number);
    let verdict = state.classifier.classify(&normalized);

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        "{}: Checking '{}' with verdict '{}' in {:.2}ms",
        peer.ip(),
        normalized,
        verdict,
        elapsed_ms
    );

    verdict.as_str()
}

/// Yields the startup page with directions and the current pattern listing.
async fn directions(State(state): State<Arc<ApiState>>) -> Html<String> {
    let patterns = state.classifier.list_patterns().join("\n");

    Html(format!(
        r#"<html>
<head>
 <title>Pattern Blacklist Lookup</title>
</head>
<body>
 <h1>Pattern Blacklist Lookup</h1>
 <p>
     This service tells you if a given number (e.g. a phone number like <code>555-1234</code>) should be
     blocked / treated as spam according to a pattern-based blacklist.
     It is designed for phone numbers but can be used with any numbers.
 </p>
 <p>
     Send the number (with or without `+` but preferably without spaces) as argument to the <code>check</code> endpoint:
     <a href="check/+15551234">check/+15551234</a>
 </p>
 <p>
     It either returns:
     <ul>
         <li><code>HAM</code> if the number is matched by a ham pattern of the blacklist, or else</li>
         <li><code>SPAM</code> if the number is matched by a spam pattern of the blacklist, or else</li>
         <li><code>UNKNOWN</code> if the provided number does not match any pattern.</li>
     </ul>
 </p>
 <h2>Pattern syntax</h2>
 <p>
     The following patterns are supported:
     <ul>
         <li>Numbers verbatim, e.g. <code>15551234</code> matches the number +15551234</li>
         <li>`*`-Wildcard represents zero, one or more numbers, e.g. <code>1555*</code> matches the number +15551234</li>
         <li>`N`-Wildcard represents exactly one number, e.g. <code>155512NN</code> matches the number +15551234</li>
     </ul>
     All other characters in a pattern are ignored.
 </p>
 <h2>Current Pattern List Entries</h2>
 <pre>
{patterns}
 </pre>
</body>
</html>
"#
    ))
}
