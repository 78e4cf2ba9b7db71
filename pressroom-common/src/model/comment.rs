use crate::model::{
    Id,
    post::PostMarker,
    user::{User, UserMarker},
};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CommentMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct Comment {
    pub id: Id<CommentMarker>,
    pub post: Id<PostMarker>,
    pub author: User,
    pub body: String,
    pub approved: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Comment {
    #[must_use]
    pub fn is_authored_by(&self, user: Id<UserMarker>) -> bool {
        self.author.id == user
    }
}

/// A new comment. Always stored unapproved.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CreateComment {
    pub post: Id<PostMarker>,
    pub author: Id<UserMarker>,
    pub body: String,
}

/// Every comment on a post, newest first, with the number that passed moderation.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Serialize)]
pub struct CommentThread {
    pub comments: Vec<Comment>,
    pub approved_count: usize,
}

impl CommentThread {
    #[must_use]
    pub fn new(comments: Vec<Comment>) -> Self {
        let approved_count = comments.iter().filter(|comment| comment.approved).count();

        Self {
            comments,
            approved_count,
        }
    }
}
