use crate::model::{
    Id,
    user::{User, UserMarker},
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::Display;
use thiserror::Error;
use time::OffsetDateTime;

pub const POST_TITLE_MAX_LEN: usize = 200;
pub const POST_SLUG_MAX_LEN: usize = 200;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// Visibility of a post. Drafts are hidden from every public read.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Unknown post status code: {0}")]
pub struct InvalidPostStatusError(i16);

impl PostStatus {
    /// The code stored in the `posts.status` column.
    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            PostStatus::Draft => 0,
            PostStatus::Published => 1,
        }
    }
}

impl TryFrom<i16> for PostStatus {
    type Error = InvalidPostStatusError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PostStatus::Draft),
            1 => Ok(PostStatus::Published),
            other => Err(InvalidPostStatusError(other)),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct PostTitle(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The post title is invalid: {0}")]
pub struct InvalidPostTitleError(String);

impl PostTitle {
    pub fn new(title: String) -> Result<Self, InvalidPostTitleError> {
        if !title.trim().is_empty() && title.chars().count() <= POST_TITLE_MAX_LEN {
            Ok(Self(title))
        } else {
            Err(InvalidPostTitleError(title))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

/// URL-safe identifier of a post: ASCII letters, digits, `-` and `_`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct PostSlug(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The post slug is invalid: {0}")]
pub struct InvalidPostSlugError(String);

impl PostSlug {
    pub fn new(slug: String) -> Result<Self, InvalidPostSlugError> {
        let well_formed = !slug.is_empty()
            && slug.len() <= POST_SLUG_MAX_LEN
            && slug
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_');

        if well_formed {
            Ok(Self(slug))
        } else {
            Err(InvalidPostSlugError(slug))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Display for PostSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PostSlug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        PostSlug::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"PostSlug"))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub title: PostTitle,
    pub slug: PostSlug,
    pub author: User,
    pub content: String,
    pub excerpt: String,
    pub status: PostStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// What the listing page shows for each post.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct PostSummary {
    pub id: Id<PostMarker>,
    pub title: PostTitle,
    pub slug: PostSlug,
    pub author: User,
    pub excerpt: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CreatePost {
    pub title: PostTitle,
    pub slug: PostSlug,
    pub author: Id<UserMarker>,
    pub content: String,
    pub excerpt: String,
    pub status: PostStatus,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            author: post.author,
            excerpt: post.excerpt,
            created_at: post.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::post::{POST_SLUG_MAX_LEN, PostSlug, PostStatus, PostTitle};

    #[test]
    fn slug_characters() {
        assert!(PostSlug::new("blog-title".to_owned()).is_ok());
        assert!(PostSlug::new("Blog_Title-2".to_owned()).is_ok());
        assert!(PostSlug::new("x".repeat(POST_SLUG_MAX_LEN)).is_ok());

        assert!(PostSlug::new(String::new()).is_err());
        assert!(PostSlug::new("blog title".to_owned()).is_err());
        assert!(PostSlug::new("blog/title".to_owned()).is_err());
        assert!(PostSlug::new("blög".to_owned()).is_err());
        assert!(PostSlug::new("x".repeat(POST_SLUG_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn title_must_not_be_blank() {
        assert!(PostTitle::new("Blog title".to_owned()).is_ok());
        assert!(PostTitle::new("   ".to_owned()).is_err());
    }

    #[test]
    fn status_codes() {
        for status in [PostStatus::Draft, PostStatus::Published] {
            assert_eq!(PostStatus::try_from(status.code()), Ok(status));
        }
        assert!(PostStatus::try_from(2).is_err());
        assert_eq!(PostStatus::default(), PostStatus::Draft);
    }
}
