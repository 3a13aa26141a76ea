//! Extractors that deserialize and then validate request input.
//!
//! Each extractor yields either a fully validated value or an
//! [`AppError::Validation`], so handlers never see partially checked data.
//! Deserialization failures (malformed JSON, missing or non-integer
//! parameters) are reported the same way as constraint violations.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// JSON body that passed `validator` checks
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

/// Query string that passed `validator` checks
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

/// Path parameters that passed `validator` checks
#[derive(Debug, Clone)]
pub struct ValidatedPath<T>(pub T);

fn unparsable(location: &str, reason: String) -> AppError {
    AppError::validation(
        vec![json!({
            "location": location,
            "error": "parse",
            "message": reason,
        })],
        format!("request {} could not be parsed", location),
    )
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| unparsable("body", rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| unparsable("query", rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| unparsable("path", rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
