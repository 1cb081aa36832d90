use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::USER_AGENT, HeaderMap},
};

use authit_core::visit::{record_visit, PageVisit, RequestOrigin, VisitPayload, UNKNOWN};

use crate::{
    error::{AppError, PlainError},
    state::AppState,
};

/// Client IP as seen by the edge proxy.
const CONNECTING_IP: &str = "cf-connecting-ip";
/// Generic proxy chain; the first entry is the client.
const FORWARDED_FOR: &str = "x-forwarded-for";
const COUNTRY: &str = "cf-ipcountry";
const CITY: &str = "cf-ipcity";

/// `POST /api/track` — record one page-leave beacon.
///
/// The reporter sends `{page, duration}` with `navigator.sendBeacon`-style
/// delivery and never reads the answer, so the responses are plain text:
/// `200 Tracked`, `400 Invalid page`, `500 Error`.
///
/// `duration` is client-reported. It is rounded to whole seconds and clamped
/// to `0..=max_visit_seconds`.
///
/// Every call appends a row. There is no dedup.
///
/// Bodies over axum's default 2 MiB limit get a `413` from the extractor.
#[tracing::instrument(skip(state, headers, body))]
pub async fn track(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, PlainError> {
    let visit = PageVisit::from_payload(
        VisitPayload::from_body(&body),
        request_origin(&headers),
        state.config.max_visit_seconds,
    )?;

    record_visit(state.store.as_ref(), &visit).await?;

    Ok("Tracked")
}

pub async fn method_not_allowed() -> PlainError {
    PlainError(AppError::MethodNotAllowed)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Proxy header value as trimmed text. Empty or non-visible-ASCII values
/// count as absent.
fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Client IP: connecting-IP header, then the first `X-Forwarded-For` entry,
/// else `"unknown"`.
fn client_ip(headers: &HeaderMap) -> String {
    header_text(headers, CONNECTING_IP)
        .or_else(|| {
            header_text(headers, FORWARDED_FOR)
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .unwrap_or(UNKNOWN)
        .to_string()
}

pub(crate) fn request_origin(headers: &HeaderMap) -> RequestOrigin {
    RequestOrigin {
        ip_address: client_ip(headers),
        country: header_text(headers, COUNTRY).unwrap_or(UNKNOWN).to_string(),
        city: header_text(headers, CITY).unwrap_or(UNKNOWN).to_string(),
        user_agent: raw_user_agent(headers),
    }
}

/// The user agent exactly as sent, decoded lossily. Only an absent header is
/// `None`.
fn raw_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}
