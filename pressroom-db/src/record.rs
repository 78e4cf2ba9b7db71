use pressroom_common::model::{
    ModelValidationError,
    about::AboutPage,
    comment::Comment,
    post::{Post, PostSlug, PostStatus, PostSummary, PostTitle},
    session::Session,
    user::{User, UserHandle},
};
use sqlx::FromRow;
use time::{Duration, OffsetDateTime};

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct SessionRecord {
    pub user_id: i64,
    pub token_hash: Vec<u8>,
    pub created_at: OffsetDateTime,
    pub expires_after_seconds: Option<i64>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct FullPostRecord {
    pub post_id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub status: i16,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub user_id: i64,
    pub handle: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct PostSummaryRecord {
    pub post_id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub created_at: OffsetDateTime,
    pub user_id: i64,
    pub handle: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct CommentRecord {
    pub comment_id: i64,
    pub post_id: i64,
    pub body: String,
    pub approved: bool,
    pub created_at: OffsetDateTime,
    pub user_id: i64,
    pub handle: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct AboutPageRecord {
    pub about_page_id: i64,
    pub title: String,
    pub content: String,
    pub updated_at: OffsetDateTime,
}

fn user(user_id: i64, handle: String) -> Result<User, ModelValidationError> {
    Ok(User {
        id: user_id.into(),
        handle: UserHandle::new(handle)?,
    })
}

impl TryFrom<SessionRecord> for Session {
    type Error = ModelValidationError;

    fn try_from(value: SessionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user: value.user_id.into(),
            token_hash: value.token_hash.try_into()?,
            created_at: value.created_at,
            expires_after: value
                .expires_after_seconds
                .map(|seconds| Duration::seconds(seconds).try_into())
                .transpose()?,
        })
    }
}

impl TryFrom<FullPostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: FullPostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.post_id.into(),
            title: PostTitle::new(value.title)?,
            slug: PostSlug::new(value.slug)?,
            author: user(value.user_id, value.handle)?,
            content: value.content,
            excerpt: value.excerpt,
            status: PostStatus::try_from(value.status)?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl TryFrom<PostSummaryRecord> for PostSummary {
    type Error = ModelValidationError;

    fn try_from(value: PostSummaryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.post_id.into(),
            title: PostTitle::new(value.title)?,
            slug: PostSlug::new(value.slug)?,
            author: user(value.user_id, value.handle)?,
            excerpt: value.excerpt,
            created_at: value.created_at,
        })
    }
}

impl TryFrom<CommentRecord> for Comment {
    type Error = ModelValidationError;

    fn try_from(value: CommentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.comment_id.into(),
            post: value.post_id.into(),
            author: user(value.user_id, value.handle)?,
            body: value.body,
            approved: value.approved,
            created_at: value.created_at,
        })
    }
}

impl From<AboutPageRecord> for AboutPage {
    fn from(value: AboutPageRecord) -> Self {
        Self {
            id: value.about_page_id.into(),
            title: value.title,
            content: value.content,
            updated_at: value.updated_at,
        }
    }
}
