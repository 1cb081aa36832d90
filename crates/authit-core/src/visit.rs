use serde::{Deserialize, Serialize};

use crate::{
    error::{StoreError, ValidationError},
    payload::{number_field, object_fields, text_field},
    store::{Statement, Store},
};

/// Stored in place of any header-derived field the proxy did not supply.
pub const UNKNOWN: &str = "unknown";

pub const INSERT_VISIT_SQL: &str = r#"INSERT INTO page_visits (
    ip_address, country, city, page_path, duration_seconds, user_agent
) VALUES ($1, $2, $3, $4, $5, $6)"#;

/// The body the visit reporter sends when a page is left.
#[derive(Debug, Clone, Default)]
pub struct VisitPayload {
    pub page: Option<String>,
    /// Seconds on page as measured by the client.
    pub duration: Option<f64>,
}

impl VisitPayload {
    /// Parse a raw beacon body. Beacons usually arrive as `text/plain`, so
    /// the content type is ignored; unparsable bodies become empty payloads.
    /// A `duration` of the wrong type only loses the duration.
    pub fn from_body(body: &[u8]) -> Self {
        let fields = object_fields(body);
        Self {
            page: text_field(&fields, "page"),
            duration: number_field(&fields, "duration"),
        }
    }
}

/// Wire form produced by the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitBeacon {
    pub page: String,
    pub duration: u64,
}

/// Request metadata the hosting proxy attaches to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub ip_address: String,
    pub country: String,
    pub city: String,
    pub user_agent: Option<String>,
}

impl Default for RequestOrigin {
    fn default() -> Self {
        Self {
            ip_address: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            user_agent: None,
        }
    }
}

/// One row of `page_visits`. Never updated once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageVisit {
    pub ip_address: String,
    pub country: String,
    pub city: String,
    pub page_path: String,
    pub duration_seconds: i64,
    pub user_agent: Option<String>,
}

impl PageVisit {
    pub fn from_payload(
        payload: VisitPayload,
        origin: RequestOrigin,
        max_duration_seconds: u64,
    ) -> Result<Self, ValidationError> {
        let page_path = payload
            .page
            .filter(|p| !p.trim().is_empty())
            .ok_or(ValidationError::InvalidPage)?;

        Ok(Self {
            ip_address: origin.ip_address,
            country: origin.country,
            city: origin.city,
            page_path,
            duration_seconds: normalize_duration(payload.duration, max_duration_seconds),
            user_agent: origin.user_agent,
        })
    }

    pub fn insert_statement(&self) -> Statement {
        Statement::new(INSERT_VISIT_SQL)
            .bind(self.ip_address.as_str())
            .bind(self.country.as_str())
            .bind(self.city.as_str())
            .bind(self.page_path.as_str())
            .bind(self.duration_seconds)
            .bind(self.user_agent.clone())
    }
}

/// Coerce a client-reported duration into whole seconds in `0..=max`.
///
/// Missing, negative and non-finite values become `0`.
pub fn normalize_duration(raw: Option<f64>, max: u64) -> i64 {
    let max = i64::try_from(max).unwrap_or(i64::MAX);
    match raw {
        Some(secs) if secs.is_finite() && secs > 0.0 => {
            let rounded = secs.round();
            if rounded >= max as f64 {
                max
            } else {
                rounded as i64
            }
        }
        _ => 0,
    }
}

/// Append `visit` with a single insert. Duplicates are expected.
pub async fn record_visit(store: &dyn Store, visit: &PageVisit) -> Result<(), StoreError> {
    store.execute(&visit.insert_statement()).await?;
    Ok(())
}
