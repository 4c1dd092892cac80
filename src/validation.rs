// Validation utilities module
// Turns validator output into the ordered field-error list clients expect

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::{validate_email, Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

/// One entry of an `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl FieldError {
    /// An error that is not tied to a particular field
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
            location: None,
        }
    }

    /// An error for a field of the request body
    pub fn field(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.into()),
            location: Some("body".to_string()),
        }
    }
}

/// Email check that also requires a top-level domain, so `a@x` is rejected
pub fn email_with_tld(value: &str) -> Result<(), ValidationError> {
    let has_tld = value
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(_, tld)| {
            tld.len() >= 2
                && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && !tld.chars().all(|c| c.is_ascii_digit())
        });

    if validate_email(value) && has_tld {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// Request bodies whose errors are reported in a fixed field order
pub trait OrderedValidate: Validate {
    /// Fields in the order their errors are reported
    const FIELD_ORDER: &'static [&'static str];

    fn validate_ordered(&self) -> Result<(), Vec<FieldError>> {
        self.validate()
            .map_err(|errors| ordered_field_errors(&errors, Self::FIELD_ORDER))
    }
}

/// Flatten validator errors, honouring `order` and then field name
pub fn ordered_field_errors(errors: &ValidationErrors, order: &[&str]) -> Vec<FieldError> {
    let by_field = errors.field_errors();

    let mut fields: Vec<&str> = by_field.keys().copied().collect();
    fields.sort_by_key(|field| {
        let rank = order.iter().position(|f| f == field).unwrap_or(order.len());
        (rank, *field)
    });

    fields
        .into_iter()
        .flat_map(|field| {
            by_field[field].iter().map(move |err| {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                FieldError::field(field, msg)
            })
        })
        .collect()
}

/// JSON body extractor that runs ordered validation
///
/// Malformed bodies are reported as a validation failure rather than the
/// framework's default rejection.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + OrderedValidate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            ApiError::ValidationFailed(vec![FieldError {
                msg: "Request body must be valid JSON".to_string(),
                param: None,
                location: Some("body".to_string()),
            }])
        })?;

        value.validate_ordered().map_err(ApiError::ValidationFailed)?;
        Ok(Self(value))
    }
}
