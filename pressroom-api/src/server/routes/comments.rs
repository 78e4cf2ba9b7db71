use crate::{
    server::{Result, ServerError, ServerRouter, auth::AuthenticatedUser, extract::Form, flash},
    service::{self, comments},
};
use axum::{extract::State, response::Redirect};
use axum_extra::{
    extract::cookie::CookieJar,
    routing::{RouterExt, TypedPath},
};
use pressroom_common::{
    model::{Id, comment::CommentMarker, post::PostSlug},
    validation::CommentForm,
};
use pressroom_db::store::BlogStore;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(edit_comment)
        .typed_get(edit_comment_link)
        .typed_post(delete_comment)
        .typed_get(delete_comment)
}

fn redirect(jar: CookieJar, redirect: service::Redirect) -> (CookieJar, Redirect) {
    let jar = match &redirect.notification {
        Some(notification) => flash::put(jar, notification),
        None => jar,
    };

    (jar, Redirect::to(&redirect.location))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/{slug}/edit_comment/{comment_id}", rejection(ServerError))]
struct EditCommentPath {
    slug: PostSlug,
    comment_id: Id<CommentMarker>,
}

async fn edit_comment(
    EditCommentPath { slug, comment_id }: EditCommentPath,
    State(store): State<Arc<dyn BlogStore>>,
    user: AuthenticatedUser,
    jar: CookieJar,
    Form(form): Form<CommentForm>,
) -> Result<(CookieJar, Redirect)> {
    let outcome =
        comments::edit_comment(store.as_ref(), &slug, comment_id, user.user_id(), &form).await?;

    Ok(redirect(jar, outcome))
}

/// Following the edit link without submitting the form just leads back to the post.
async fn edit_comment_link(EditCommentPath { slug, .. }: EditCommentPath) -> Redirect {
    Redirect::to(&service::Redirect::to_post(&slug, None).location)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/{slug}/delete_comment/{comment_id}", rejection(ServerError))]
struct DeleteCommentPath {
    slug: PostSlug,
    comment_id: Id<CommentMarker>,
}

async fn delete_comment(
    DeleteCommentPath { slug, comment_id }: DeleteCommentPath,
    State(store): State<Arc<dyn BlogStore>>,
    user: AuthenticatedUser,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let outcome =
        comments::delete_comment(store.as_ref(), &slug, comment_id, user.user_id()).await?;

    Ok(redirect(jar, outcome))
}
