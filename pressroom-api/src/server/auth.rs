use crate::server::ServerError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use pressroom_common::model::{Id, session::AuthToken, user::UserMarker};
use pressroom_db::store::BlogStore;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::debug;

type AuthorizationHeader = TypedHeader<Authorization<Bearer>>;

/// The user a request is made on behalf of, established from its bearer token.
///
/// Handlers that take this extractor are closed to anonymous visitors.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct AuthenticatedUser {
    id: Id<UserMarker>,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn user_id(self) -> Id<UserMarker> {
        self.id
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<dyn BlogStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request_token: AuthToken = AuthorizationHeader::from_request_parts(parts, state)
            .await
            .map_err(ServerError::InvalidAuthorizationHeader)?
            .token()
            .parse()?;

        let token_hash = request_token.hash()?;

        let session = Arc::<dyn BlogStore>::from_ref(state)
            .fetch_session(&token_hash)
            .await?
            .ok_or(ServerError::InvalidToken)?;

        if session.user != request_token.user_id {
            debug!(user = %request_token.user_id, "Token presented for a different user");
            return Err(ServerError::InvalidToken);
        }
        if session.is_expired_at(OffsetDateTime::now_utc()) {
            debug!(user = %session.user, "Session expired");
            return Err(ServerError::InvalidToken);
        }

        Ok(Self { id: session.user })
    }
}
