use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

use crate::middleware::error::AppError;

/// Body accepted either as JSON or as an urlencoded form, validated before the handler runs.
#[derive(Debug)]
pub struct JsonOrFormValidated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrFormValidated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send + Sync + 'static,
{
    type Rejection = Response;

    async fn from_request(req: Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let payload: T = match content_type.as_deref() {
            Some(ct) if ct.starts_with("application/json") => {
                let Json(payload) = Json::<T>::from_request(req, &())
                    .await
                    .map_err(|err| bad_request(err.body_text()))?;
                payload
            }
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(payload) = Form::<T>::from_request(req, &())
                    .await
                    .map_err(|err| bad_request(err.body_text()))?;
                payload
            }
            _ => return Err(AppError::UnsupportedMediaType.into_response()),
        };

        payload
            .validate()
            .map_err(|err| bad_request(err.to_string()))?;
        Ok(Self(payload))
    }
}

fn bad_request(description: String) -> Response {
    AppError::Validation { description }.into_response()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LimitParams {
    pub limit: Option<usize>,
}
