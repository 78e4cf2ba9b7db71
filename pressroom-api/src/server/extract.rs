use crate::server::ServerError;
use axum::{
    Form as AxumForm,
    extract::{FromRequest, FromRequestParts, Query as AxumQuery},
};

/// A url-encoded form body whose rejection is a [`ServerError`].
#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(AxumForm), rejection(ServerError))]
pub struct Form<T>(pub T);

#[derive(FromRequestParts, Debug, Clone, Copy, Default)]
#[from_request(via(AxumQuery), rejection(ServerError))]
pub struct Query<T>(pub T);
