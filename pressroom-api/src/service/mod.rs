//! The blog's use cases, independent of HTTP.
//!
//! Each function performs one request's worth of work against a [`BlogStore`] and returns
//! either a context for the presentation layer or a [`Redirect`]. User feedback travels as an
//! explicit [`Notification`] inside those results.

use pressroom_common::{
    model::{Id, comment::CommentMarker, post::PostSlug},
    notification::Notification,
};
use pressroom_db::store::DbError;
use thiserror::Error;

pub mod about;
pub mod comments;
pub mod listing;

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No published post with slug {} exists.", .0.get())]
    PostBySlugNotFound(PostSlug),
    #[error("Comment with id {0} was not found.")]
    CommentByIdNotFound(Id<CommentMarker>),
    #[error(transparent)]
    Database(#[from] DbError),
}

/// Send the user to `location`, showing `notification` there.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Redirect {
    pub location: String,
    pub notification: Option<Notification>,
}

impl Redirect {
    #[must_use]
    pub fn to_post(slug: &PostSlug, notification: Option<Notification>) -> Self {
        Self {
            location: format!("/{}", slug.get()),
            notification,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use pressroom_common::model::{
        Id,
        comment::{CommentMarker, CreateComment},
        post::{CreatePost, Post, PostSlug, PostStatus, PostTitle},
        user::{User, UserHandle},
    };
    use pressroom_db::{memory::MemoryStore, store::BlogStore};
    use std::sync::Arc;

    /// A store holding two users and the published post "Blog title" written by `author`.
    pub(crate) struct Fixture {
        pub store: Arc<MemoryStore>,
        pub author: User,
        pub reader: User,
        pub post: Post,
    }

    impl Fixture {
        pub(crate) async fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let author = store
                .create_user(UserHandle::new("myUsername".to_owned()).unwrap())
                .await
                .unwrap();
            let reader = store
                .create_user(UserHandle::new("reader".to_owned()).unwrap())
                .await
                .unwrap();

            store
                .create_post(&create_post(
                    &author,
                    "Blog title",
                    "blog-title",
                    PostStatus::Published,
                ))
                .await
                .unwrap();
            let post = store
                .fetch_published_post(&slug("blog-title"))
                .await
                .unwrap()
                .unwrap();

            Self {
                store,
                author,
                reader,
                post,
            }
        }

        pub(crate) async fn comment(&self, author: &User, body: &str) -> Id<CommentMarker> {
            self.store
                .create_comment(&CreateComment {
                    post: self.post.id,
                    author: author.id,
                    body: body.to_owned(),
                })
                .await
                .unwrap()
        }
    }

    pub(crate) fn create_post(
        author: &User,
        title: &str,
        slug: &str,
        status: PostStatus,
    ) -> CreatePost {
        CreatePost {
            title: PostTitle::new(title.to_owned()).unwrap(),
            slug: PostSlug::new(slug.to_owned()).unwrap(),
            author: author.id,
            content: "Blog content".to_owned(),
            excerpt: "Blog excerpt".to_owned(),
            status,
        }
    }

    pub(crate) fn slug(slug: &str) -> PostSlug {
        PostSlug::new(slug.to_owned()).unwrap()
    }
}
