use crate::{
    server::{Result, ServerError, ServerRouter, extract::Form, json::Json},
    service::about::{self, AboutContext},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use pressroom_common::validation::CollaborationForm;
use pressroom_db::store::BlogStore;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_about)
        .typed_post(submit_collaboration)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/about", rejection(ServerError))]
struct AboutPath();

async fn get_about(
    AboutPath(): AboutPath,
    State(store): State<Arc<dyn BlogStore>>,
) -> Result<Json<AboutContext>> {
    let context = about::about_page(store.as_ref()).await?;

    Ok(Json(context))
}

async fn submit_collaboration(
    AboutPath(): AboutPath,
    State(store): State<Arc<dyn BlogStore>>,
    Form(form): Form<CollaborationForm>,
) -> Result<Json<AboutContext>> {
    let context = about::submit_collaboration_request(store.as_ref(), &form).await?;

    Ok(Json(context))
}
