//! Extractors that deserialize and validate request payloads.
//!
//! Both reject a payload that cannot be decoded with 400 and a payload that
//! decodes but fails its `validator` rules with 422, always in the
//! `{"detail": ...}` envelope.

use anyhow::anyhow;
use axum::{
    Form, Json,
    extract::{
        FromRequest, Request,
        rejection::{FormRejection, JsonRejection},
    },
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use todoapp_core::AppError;

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn validate<T: Validate>(value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))
}

/// Picks the missing field name out of a serde message, if there is one.
fn missing_field(message: &str) -> Option<&str> {
    message
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let message = rejection.body_text();

                if let Some(field) = missing_field(&message) {
                    return AppError::bad_request(anyhow!("{field} is required"));
                }

                if message.contains("invalid type") {
                    return AppError::bad_request(anyhow!("Invalid field type in request"));
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    ));
                }

                AppError::bad_request(anyhow!("Invalid request body"))
            })?;

        validate(&value)?;
        Ok(ValidatedJson(value))
    }
}

/// Same contract as [`ValidatedJson`] for `application/x-www-form-urlencoded`
/// bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let message = rejection.body_text();

                if let Some(field) = missing_field(&message) {
                    return AppError::bad_request(anyhow!("{field} is required"));
                }

                if matches!(rejection, FormRejection::InvalidFormContentType(_)) {
                    return AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/x-www-form-urlencoded' header"
                    ));
                }

                AppError::bad_request(anyhow!("Invalid form body"))
            })?;

        validate(&value)?;
        Ok(ValidatedForm(value))
    }
}
