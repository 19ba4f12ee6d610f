/**
 * Body and Query Extraction
 *
 * Wrappers around axum's `Json` and `Query` whose rejections come back in
 * the Conduit error envelope (422) instead of axum's plain-text bodies.
 */

use axum::{
    extract::{
        rejection::QueryRejection, FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;
use crate::shared::InputError;

/// JSON request body
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(InputError::malformed(rejection.body_text()).into()),
        }
    }
}

/// Query string
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let result: Result<Query<T>, QueryRejection> =
            Query::<T>::from_request_parts(parts, state).await;
        match result {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(InputError::malformed(rejection.body_text()).into()),
        }
    }
}
