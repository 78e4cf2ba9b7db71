use async_trait::async_trait;
use pressroom_common::{
    model::{
        Id, ModelValidationError,
        about::{
            AboutPage, AboutPageMarker, CollaborationRequestMarker, CreateAboutPage,
            CreateCollaborationRequest,
        },
        comment::{Comment, CommentMarker, CreateComment},
        post::{CreatePost, Post, PostMarker, PostSlug, PostSummary},
        session::{AuthTokenHash, Session},
    },
    page::{Page, PageRequest},
};
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("Value violates unique constraint {0}")]
    UniqueViolation(String),
    #[error("Referenced {0} does not exist")]
    MissingReference(&'static str),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error()
            && db_err.is_unique_violation()
        {
            return DbError::UniqueViolation(db_err.constraint().unwrap_or_default().to_owned());
        }
        if let Some(db_err) = err.as_database_error()
            && db_err.is_foreign_key_violation()
        {
            return DbError::MissingReference("record");
        }

        DbError::Sqlx(err)
    }
}

/// Record-level access to everything the blog persists.
///
/// Every method is a single statement against the store; nothing here spans a transaction.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn fetch_session(&self, token_hash: &AuthTokenHash) -> Result<Option<Session>>;

    /// Published posts, newest first, ties broken by author id.
    async fn fetch_published_posts(&self, page: PageRequest) -> Result<Page<PostSummary>>;

    /// Only finds published posts. A draft with this slug yields `None`.
    async fn fetch_published_post(&self, slug: &PostSlug) -> Result<Option<Post>>;

    async fn create_post(&self, post: &CreatePost) -> Result<Id<PostMarker>>;

    /// Every comment on the post, approved or not, newest first.
    async fn list_comments_for_post(&self, post_id: Id<PostMarker>) -> Result<Vec<Comment>>;

    async fn fetch_comment(&self, comment_id: Id<CommentMarker>) -> Result<Option<Comment>>;

    async fn create_comment(&self, comment: &CreateComment) -> Result<Id<CommentMarker>>;

    /// Replaces the body, moves the comment to `post_id` and withdraws its approval.
    ///
    /// Returns whether a comment was updated.
    async fn update_comment(
        &self,
        comment_id: Id<CommentMarker>,
        post_id: Id<PostMarker>,
        body: &str,
    ) -> Result<bool>;

    async fn set_comment_approved(
        &self,
        comment_id: Id<CommentMarker>,
        approved: bool,
    ) -> Result<bool>;

    /// Returns whether a comment was deleted.
    async fn delete_comment(&self, comment_id: Id<CommentMarker>) -> Result<bool>;

    /// The most recently updated about page, if any.
    async fn fetch_latest_about_page(&self) -> Result<Option<AboutPage>>;

    async fn create_about_page(&self, page: &CreateAboutPage) -> Result<Id<AboutPageMarker>>;

    async fn create_collaboration_request(
        &self,
        request: &CreateCollaborationRequest,
    ) -> Result<Id<CollaborationRequestMarker>>;
}
