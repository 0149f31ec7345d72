use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::validation::Schema;

/// JSON body deserialized into `T`, validated, then normalized. Handlers
/// receive `T::Output`.
pub struct ValidatedJson<T: Schema>(pub T::Output);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Schema + DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state).await?;
        Ok(Self(raw.parse()?))
    }
}

/// Query-string counterpart of [`ValidatedJson`]. Every field of a query
/// schema is optional, so an empty query string always parses.
pub struct ValidatedQuery<T: Schema>(pub T::Output);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: Schema + DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(raw.parse()?))
    }
}
