use crate::service::ServiceError;
use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{FormRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use axum_extra::typed_header::TypedHeaderRejection;
use json::Json;
use pressroom_common::model::session::{AuthTokenDecodeError, AuthTokenHashError};
use pressroom_db::store::{BlogStore, DbError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

mod auth;
mod extract;
mod flash;
mod json;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, FromRef)]
pub struct ServerState {
    pub store: Arc<dyn BlogStore>,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Query string rejected: {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("Incoming form rejected: {0}")]
    FormRejection(#[from] FormRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Authorization header was missing or invalid: {0}")]
    InvalidAuthorizationHeader(TypedHeaderRejection),
    #[error("The provided auth token could not be decoded: {0}")]
    InvalidAuthToken(#[from] AuthTokenDecodeError),
    #[error("The auth token could not be hashed: {0}")]
    AuthTokenHash(#[from] AuthTokenHashError),
    #[error("Provided token was invalid")]
    InvalidToken,
    #[error(transparent)]
    Database(#[from] DbError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::Service(
                ServiceError::PostBySlugNotFound(_) | ServiceError::CommentByIdNotFound(_),
            ) => StatusCode::NOT_FOUND,
            ServerError::InvalidAuthorizationHeader(rejection) if rejection.is_missing() => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::InvalidToken => StatusCode::UNAUTHORIZED,
            ServerError::FormRejection(rejection) => rejection.status(),
            ServerError::QueryRejection(_)
            | ServerError::InvalidAuthorizationHeader(_)
            | ServerError::InvalidAuthToken(_) => StatusCode::BAD_REQUEST,
            ServerError::JsonResponse(_)
            | ServerError::Database(_)
            | ServerError::Service(ServiceError::Database(_))
            | ServerError::AuthTokenHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            status: status.as_u16(),
        };
        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        server::{ServerState, routes},
        service::fixture::Fixture,
    };
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use pressroom_common::model::{session::AuthToken, session::Session, user::User};
    use pressroom_db::memory::MemoryStore;
    use std::sync::Arc;
    use time::OffsetDateTime;
    use tower::ServiceExt;

    pub(crate) fn app(store: Arc<MemoryStore>) -> Router {
        routes().with_state(ServerState { store })
    }

    /// Registers a session for `user` and returns the matching `Authorization` header value.
    pub(crate) async fn bearer(store: &MemoryStore, user: &User) -> String {
        let token = AuthToken::generate_random(user.id);
        store
            .create_session(Session {
                user: user.id,
                token_hash: token.hash().unwrap(),
                created_at: OffsetDateTime::now_utc(),
                expires_after: None,
            })
            .await
            .unwrap();

        format!("Bearer {}", token.as_token_str())
    }

    pub(crate) async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let fixture = Fixture::new().await;

        let response = app(fixture.store)
            .oneshot(
                Request::get("/blog-title/nothing/here")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_text(response).await, r#"{"status":404}"#);
    }
}
