use crate::errors::{ApiError, api_error};
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// JSON body that has passed its `validator` rules.
///
/// Malformed bodies are rejected with `INVALID_REQUEST`, rule violations with
/// `VALIDATION_ERROR` and a message naming every offending field.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!("Rejected request body: {}", rejection.body_text());
            api_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", rejection.body_text())
        })?;

        value.validate().map_err(|errors| {
            let message = describe(&errors);
            debug!("Request body failed validation: {}", message);
            api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Flattens nested validation errors into `path: message` pairs.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    messages.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    messages.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, messages),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), messages);
                }
            }
        }
    }
}
