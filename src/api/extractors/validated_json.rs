//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::middleware::TraceId;
use crate::errors::Failure;

/// Validated JSON extractor that automatically validates requests.
///
/// Malformed bodies and failed field validations both reject with a
/// `ValidationError` failure before the handler body runs.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let trace = req.extensions().get::<TraceId>().cloned();
        let attach = |f: Failure| match &trace {
            Some(t) => f.or_trace_id(t.as_str()),
            None => f,
        };

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| attach(Failure::validation(e.body_text())))?;

        value
            .validate()
            .map_err(|e| attach(Failure::validation(format_validation_errors(&e))))?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
