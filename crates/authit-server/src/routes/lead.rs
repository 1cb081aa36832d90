use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use authit_core::lead::{upsert_lead, Lead, LeadPayload};

use crate::{error::AppError, state::AppState};

/// `POST /api/lead` — capture a contact-form lead.
///
/// The body is read as raw bytes so a missing or malformed body degrades to
/// "no fields" instead of an extractor rejection; it then fails email
/// validation with `400 {"error": "Invalid email"}`. Bodies over axum's
/// default 2 MiB limit are refused by the extractor with a `413` before that
/// point, and nothing is written.
///
/// A valid lead is upserted by email: `name` and `phone` are overwritten
/// with whatever this submission carries, `NULL` included.
///
/// ## Response
/// `200 {"message": "Success"}`, or `500 {"error": "Internal Server Error"}`
/// when the store fails. Nothing is retried.
#[tracing::instrument(skip(state, body))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let lead = Lead::try_from(LeadPayload::from_body(&body))?;

    upsert_lead(state.store.as_ref(), &lead).await?;

    Ok(Json(json!({ "message": "Success" })))
}

/// `OPTIONS /api/lead` — CORS pre-flight. Empty `200`; the CORS headers are
/// added by the route's layers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
