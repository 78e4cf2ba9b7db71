use crate::service::Result;
use pressroom_common::{
    model::post::PostSummary,
    page::{PageNumber, PageRequest},
};
use pressroom_db::store::BlogStore;
use serde::Serialize;

pub const POSTS_PER_PAGE: u32 = 6;

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct PostListContext {
    pub posts: Vec<PostSummary>,
    pub page: PageNumber,
    pub has_previous: bool,
    pub has_next: bool,
}

/// One page of published posts. Pages past the end are empty rather than an error.
pub async fn list_published_posts(
    store: &dyn BlogStore,
    page: PageNumber,
) -> Result<PostListContext> {
    let page = store
        .fetch_published_posts(PageRequest::new(page, POSTS_PER_PAGE))
        .await?;

    Ok(PostListContext {
        posts: page.items,
        page: page.page,
        has_previous: page.has_previous,
        has_next: page.has_next,
    })
}
