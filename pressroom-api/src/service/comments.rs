use crate::service::{Redirect, Result, ServiceError};
use pressroom_common::{
    model::{
        Id,
        comment::{Comment, CommentMarker, CommentThread, CreateComment},
        post::{Post, PostSlug},
        user::UserMarker,
    },
    notification::Notification,
    validation::{CommentForm, FieldErrors},
};
use pressroom_db::store::BlogStore;
use serde::Serialize;
use tracing::{info, warn};

pub const COMMENT_SUBMITTED: &str = "Comment submitted and awaiting approval";
pub const COMMENT_UPDATED: &str = "Comment Updated!";
pub const COMMENT_UPDATE_FAILED: &str = "Error updating comment!";
pub const COMMENT_DELETED: &str = "Comment deleted!";
pub const COMMENT_DELETE_DENIED: &str = "You can only delete your own comments!";

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct PostDetailContext {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub approved_count: usize,
    pub comment_form: CommentForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    pub notification: Option<Notification>,
}

pub async fn get_post(store: &dyn BlogStore, slug: &PostSlug) -> Result<Post> {
    store
        .fetch_published_post(slug)
        .await?
        .ok_or_else(|| ServiceError::PostBySlugNotFound(slug.clone()))
}

pub async fn list_comments(store: &dyn BlogStore, post: &Post) -> Result<CommentThread> {
    let comments = store.list_comments_for_post(post.id).await?;

    Ok(CommentThread::new(comments))
}

async fn fetch_comment(store: &dyn BlogStore, comment_id: Id<CommentMarker>) -> Result<Comment> {
    store
        .fetch_comment(comment_id)
        .await?
        .ok_or(ServiceError::CommentByIdNotFound(comment_id))
}

async fn detail_context(
    store: &dyn BlogStore,
    post: Post,
    comment_form: CommentForm,
    errors: Option<FieldErrors>,
    notification: Option<Notification>,
) -> Result<PostDetailContext> {
    let thread = list_comments(store, &post).await?;

    Ok(PostDetailContext {
        post,
        comments: thread.comments,
        approved_count: thread.approved_count,
        comment_form,
        errors,
        notification,
    })
}

/// The post page with its full comment thread and an empty comment form.
pub async fn post_detail(
    store: &dyn BlogStore,
    slug: &PostSlug,
    notification: Option<Notification>,
) -> Result<PostDetailContext> {
    let post = get_post(store, slug).await?;

    detail_context(store, post, CommentForm::default(), None, notification).await
}

/// Stores a new, unapproved comment. Invalid input re-renders the page with the submitted
/// form and its errors.
pub async fn submit_comment(
    store: &dyn BlogStore,
    slug: &PostSlug,
    author: Id<UserMarker>,
    form: CommentForm,
) -> Result<PostDetailContext> {
    let post = get_post(store, slug).await?;

    match form.validate() {
        Ok(valid) => {
            let comment_id = store
                .create_comment(&CreateComment {
                    post: post.id,
                    author,
                    body: valid.body,
                })
                .await?;
            info!(%comment_id, post_id = %post.id, %author, "Comment submitted");

            detail_context(
                store,
                post,
                CommentForm::default(),
                None,
                Some(Notification::success(COMMENT_SUBMITTED)),
            )
            .await
        }
        Err(errors) => detail_context(store, post, form, Some(errors), None).await,
    }
}

/// Replaces the body of the requester's own comment and sends it back to moderation.
///
/// Invalid input and foreign comments are both answered with an error notification.
pub async fn edit_comment(
    store: &dyn BlogStore,
    slug: &PostSlug,
    comment_id: Id<CommentMarker>,
    author: Id<UserMarker>,
    form: &CommentForm,
) -> Result<Redirect> {
    let post = get_post(store, slug).await?;
    let comment = fetch_comment(store, comment_id).await?;

    let notification = match form.validate() {
        Ok(valid) if comment.is_authored_by(author) => {
            store.update_comment(comment.id, post.id, &valid.body).await?;
            info!(%comment_id, post_id = %post.id, "Comment updated");

            Notification::success(COMMENT_UPDATED)
        }
        Ok(_) => {
            warn!(%comment_id, %author, "Rejected edit of another user's comment");
            Notification::error(COMMENT_UPDATE_FAILED)
        }
        Err(_) => Notification::error(COMMENT_UPDATE_FAILED),
    };

    Ok(Redirect::to_post(slug, Some(notification)))
}

/// Deletes the requester's own comment. Deleting someone else's comment is refused with a
/// notification, not an error.
pub async fn delete_comment(
    store: &dyn BlogStore,
    slug: &PostSlug,
    comment_id: Id<CommentMarker>,
    author: Id<UserMarker>,
) -> Result<Redirect> {
    get_post(store, slug).await?;
    let comment = fetch_comment(store, comment_id).await?;

    let notification = if comment.is_authored_by(author) {
        store.delete_comment(comment.id).await?;
        info!(%comment_id, "Comment deleted");

        Notification::success(COMMENT_DELETED)
    } else {
        warn!(%comment_id, %author, "Rejected deletion of another user's comment");
        Notification::error(COMMENT_DELETE_DENIED)
    };

    Ok(Redirect::to_post(slug, Some(notification)))
}
