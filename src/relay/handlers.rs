//! HTTP request handlers.
//!
//! Each handler translates an inbound request into a merge client call and
//! relays the PDF, or a JSON error body, back to the caller.

use crate::client::{MergeRequest, PdfDocument, PdfStream};
use crate::error::{DocMergeError, ErrorBody};
use crate::relay::state::{AppState, StatsSnapshot};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Version string for the application.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Query parameters accepted by the relay endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RelayQuery {
    /// `true` pipes the PDF through without buffering it.
    pub stream: Option<String>,
}

impl RelayQuery {
    /// Returns whether streaming mode was requested.
    pub fn is_stream(&self) -> bool {
        self.stream.as_deref() == Some("true")
    }
}

/// Health check response data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthData {
    /// Always "ok" while the relay is serving.
    pub status: String,
    /// Application version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Merge service the relay forwards to.
    pub upstream: String,
    /// Request counters.
    pub stats: StatsSnapshot,
}

/// Health check handler.
///
/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let data = HealthData {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
        upstream: state.client.base_url().to_string(),
        stats: state.stats.snapshot(),
    };

    (StatusCode::OK, Json(data))
}

/// Merge relay handler.
///
/// POST /merge
pub async fn merge(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RelayQuery>,
    Json(request): Json<MergeRequest>,
) -> Response {
    state.increment_requests();

    let request_id = Uuid::new_v4();
    let name = request.name.as_deref();

    info!(
        request_id = %request_id,
        url_count = request.urls.len(),
        stream = query.is_stream(),
        "Relaying merge request"
    );

    if query.is_stream() {
        match state.client.merge_documents_stream(&request.urls, name).await {
            Ok(stream) => stream_response(&state, request_id, stream, name),
            Err(err) => error_response(&state, request_id, &err),
        }
    } else {
        match state.client.merge_documents(&request.urls, name).await {
            Ok(document) => document_response(&state, request_id, document, name),
            Err(err) => error_response(&state, request_id, &err),
        }
    }
}

/// Report relay handler.
///
/// GET /report/:id
pub async fn report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RelayQuery>,
) -> Response {
    state.increment_requests();

    let request_id = Uuid::new_v4();

    info!(
        request_id = %request_id,
        report_id = %id,
        stream = query.is_stream(),
        "Relaying report request"
    );

    if query.is_stream() {
        match state.client.generate_report_stream(&id).await {
            Ok(stream) => stream_response(&state, request_id, stream, None),
            Err(err) => error_response(&state, request_id, &err),
        }
    } else {
        match state.client.generate_report(&id).await {
            Ok(document) => document_response(&state, request_id, document, None),
            Err(err) => error_response(&state, request_id, &err),
        }
    }
}

fn document_response(
    state: &AppState,
    request_id: Uuid,
    document: PdfDocument,
    requested: Option<&str>,
) -> Response {
    let filename = document.suggested_filename(requested);
    let size = document.size() as u64;

    info!(
        request_id = %request_id,
        filename = %filename,
        size_bytes = size,
        "PDF relayed"
    );

    state.increment_success();
    (
        StatusCode::OK,
        pdf_headers(&filename, Some(size)),
        Body::from(document.data),
    )
        .into_response()
}

fn stream_response(
    state: &AppState,
    request_id: Uuid,
    stream: PdfStream,
    requested: Option<&str>,
) -> Response {
    let filename = stream.suggested_filename(requested);
    let headers = pdf_headers(&filename, stream.content_length);

    info!(
        request_id = %request_id,
        filename = %filename,
        content_length = ?stream.content_length,
        "Streaming PDF"
    );

    state.increment_success();
    (
        StatusCode::OK,
        headers,
        Body::from_stream(stream.bytes_stream()),
    )
        .into_response()
}

fn error_response(state: &AppState, request_id: Uuid, err: &DocMergeError) -> Response {
    error!(
        request_id = %request_id,
        error = %err,
        code = %err.code(),
        "Relay request failed"
    );

    state.increment_failed();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::from_error(err)),
    )
        .into_response()
}

/// Builds the PDF delivery headers.
fn pdf_headers(filename: &str, content_length: Option<u64>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));

    let disposition = format!("inline; filename=\"{}\"", header_safe(filename));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, value);
    }

    if let Some(length) = content_length {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    }

    headers
}

/// Replaces characters that cannot appear inside a quoted header value.
fn header_safe(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}
