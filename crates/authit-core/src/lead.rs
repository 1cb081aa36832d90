use crate::{
    error::{StoreError, ValidationError},
    payload::{object_fields, text_field},
    store::{Statement, Store},
};

/// Insert-or-overwrite keyed by email. `name` and `phone` are replaced
/// unconditionally, so an omitted field clears the stored value.
pub const UPSERT_LEAD_SQL: &str = r#"INSERT INTO leads (email, name, phone)
VALUES ($1, $2, $3)
ON CONFLICT (email) DO UPDATE SET
    name = EXCLUDED.name,
    phone = EXCLUDED.phone,
    updated_at = now()"#;

/// The body the marketing site's contact form posts.
#[derive(Debug, Clone, Default)]
pub struct LeadPayload {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl LeadPayload {
    /// Parse a raw request body. A body that is not a JSON object degrades to
    /// an empty payload. Fields are read one by one, so a mistyped `phone`
    /// never costs the lead its `email`.
    pub fn from_body(body: &[u8]) -> Self {
        let fields = object_fields(body);
        Self {
            email: text_field(&fields, "email"),
            name: text_field(&fields, "name"),
            phone: text_field(&fields, "phone"),
        }
    }
}

/// A validated lead, ready to upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl TryFrom<LeadPayload> for Lead {
    type Error = ValidationError;

    /// Only checks that the email contains `@`. Anything stricter would
    /// reject addresses the form should accept.
    fn try_from(payload: LeadPayload) -> Result<Self, Self::Error> {
        let email = payload
            .email
            .filter(|e| e.contains('@'))
            .ok_or(ValidationError::InvalidEmail)?;

        Ok(Self {
            email,
            name: payload.name,
            phone: payload.phone,
        })
    }
}

impl Lead {
    pub fn upsert_statement(&self) -> Statement {
        Statement::new(UPSERT_LEAD_SQL)
            .bind(self.email.as_str())
            .bind(self.name.clone())
            .bind(self.phone.clone())
    }
}

/// Write `lead` with a single atomic upsert.
pub async fn upsert_lead(store: &dyn Store, lead: &Lead) -> Result<(), StoreError> {
    store.execute(&lead.upsert_statement()).await?;
    Ok(())
}
