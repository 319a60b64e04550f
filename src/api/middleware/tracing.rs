//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Request tracing layer applied to every route.
///
/// Spans are opened at `INFO` with method, URI and version. Responses are
/// logged at `INFO` with latency in milliseconds; 5xx responses are also
/// logged at `ERROR`. Request headers are never recorded, so bearer tokens
/// stay out of the logs.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET uri=/promo version=HTTP/1.1}: finished processing request latency=3 ms status=307
/// ```
///
/// # Integration
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/v1/api", api_routes())
///     .layer(tracing::layer());
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(
            DefaultMakeSpan::new()
                .level(Level::INFO)
                .include_headers(false),
        )
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
