pub mod about;
pub mod comment;
pub mod post;
pub mod session;
pub mod user;

use crate::{
    model::{
        post::{InvalidPostSlugError, InvalidPostStatusError, InvalidPostTitleError},
        session::InvalidAuthTokenHashError,
        user::InvalidUserHandleError,
    },
    util::NonPositiveDurationError,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    UserHandle(#[from] InvalidUserHandleError),
    #[error(transparent)]
    PostTitle(#[from] InvalidPostTitleError),
    #[error(transparent)]
    PostSlug(#[from] InvalidPostSlugError),
    #[error(transparent)]
    PostStatus(#[from] InvalidPostStatusError),
    #[error(transparent)]
    NonPositiveDuration(#[from] NonPositiveDurationError),
    #[error(transparent)]
    TokenHash(#[from] InvalidAuthTokenHashError),
}

/// Row id of a record, tagged with the kind of record it points to.
///
/// Ids are assigned by the store (`BIGSERIAL` columns) and are never taken from user input
/// when creating a record.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(i64, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<i64> for Id<Marker> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for i64 {
    fn from(value: Id<Marker>) -> Self {
        value.get()
    }
}
