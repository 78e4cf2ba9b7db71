use crate::{
    server::{
        Result, ServerError, ServerRouter,
        auth::AuthenticatedUser,
        extract::{Form, Query},
        flash,
        json::Json,
    },
    service::{
        comments::{self, PostDetailContext},
        listing::{self, PostListContext},
    },
};
use axum::extract::State;
use axum_extra::{
    extract::cookie::CookieJar,
    routing::{RouterExt, TypedPath},
};
use pressroom_common::{model::post::PostSlug, page::PageNumber, validation::CommentForm};
use pressroom_db::store::BlogStore;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_get(get_post)
        .typed_post(submit_comment)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/", rejection(ServerError))]
struct PostListPath();

#[derive(Deserialize)]
struct PostListQuery {
    #[serde(default)]
    page: PageNumber,
}

async fn list_posts(
    PostListPath(): PostListPath,
    State(store): State<Arc<dyn BlogStore>>,
    Query(PostListQuery { page }): Query<PostListQuery>,
) -> Result<Json<PostListContext>> {
    let context = listing::list_published_posts(store.as_ref(), page).await?;

    Ok(Json(context))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/{slug}", rejection(ServerError))]
struct PostPath {
    slug: PostSlug,
}

async fn get_post(
    PostPath { slug }: PostPath,
    State(store): State<Arc<dyn BlogStore>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<PostDetailContext>)> {
    let (jar, notification) = flash::take(jar);
    let context = comments::post_detail(store.as_ref(), &slug, notification).await?;

    Ok((jar, Json(context)))
}

async fn submit_comment(
    PostPath { slug }: PostPath,
    State(store): State<Arc<dyn BlogStore>>,
    user: AuthenticatedUser,
    Form(form): Form<CommentForm>,
) -> Result<Json<PostDetailContext>> {
    let context = comments::submit_comment(store.as_ref(), &slug, user.user_id(), form).await?;

    Ok(Json(context))
}

#[cfg(test)]
mod tests {
    use crate::{
        server::{
            flash,
            tests::{app, bearer, body_text},
        },
        service::{
            comments::COMMENT_SUBMITTED,
            fixture::{Fixture, create_post},
        },
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use pressroom_common::{model::post::PostStatus, notification::Notification};
    use pressroom_db::store::BlogStore;
    use serde_json::Value;
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, authorization: Option<&str>, form: &str) -> Request<Body> {
        let mut request = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(authorization) = authorization {
            request = request.header(header::AUTHORIZATION, authorization);
        }

        request.body(Body::from(form.to_owned())).unwrap()
    }

    #[tokio::test]
    async fn index_lists_published_posts() {
        let fixture = Fixture::new().await;

        let response = app(fixture.store).oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let context: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(context["posts"][0]["title"], "Blog title");
        assert_eq!(context["posts"][0]["excerpt"], "Blog excerpt");
        assert_eq!(context["page"], 1);
        assert_eq!(context["has_next"], false);
    }

    #[tokio::test]
    async fn index_past_the_end_is_empty() {
        let fixture = Fixture::new().await;

        let response = app(fixture.store)
            .oneshot(get("/?page=9"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let context: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(context["posts"], Value::Array(Vec::new()));
        assert_eq!(context["page"], 9);
    }

    #[tokio::test]
    async fn index_rejects_malformed_page() {
        let fixture = Fixture::new().await;

        let response = app(fixture.store)
            .oneshot(get("/?page=last"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn render_post_detail_page_with_comment_form() {
        let fixture = Fixture::new().await;

        let response = app(fixture.store)
            .oneshot(get("/blog-title"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Blog title"));
        assert!(body.contains("Blog content"));

        let context: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(context["comment_form"]["body"], "");
        assert_eq!(context["approved_count"], 0);
        assert_eq!(context["notification"], Value::Null);
    }

    #[tokio::test]
    async fn draft_post_is_not_found() {
        let fixture = Fixture::new().await;
        fixture
            .store
            .create_post(&create_post(
                &fixture.author,
                "Hidden",
                "hidden",
                PostStatus::Draft,
            ))
            .await
            .unwrap();

        let response = app(fixture.store).oneshot(get("/hidden")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_slug_is_not_found() {
        let fixture = Fixture::new().await;

        let response = app(fixture.store)
            .oneshot(get("/not%20a%20slug"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn detail_consumes_flash_notification() {
        let fixture = Fixture::new().await;
        let notification = Notification::success("Comment deleted!");
        let cookie = format!("flash={}", flash::encode(&notification).unwrap());

        let response = app(fixture.store)
            .oneshot(
                Request::get("/blog-title")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("flash="));
        assert!(set_cookie.contains("Max-Age=0"));

        let context: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(context["notification"]["text"], "Comment deleted!");
        assert_eq!(context["notification"]["level"], "success");
    }

    #[tokio::test]
    async fn successful_comment_submission() {
        let fixture = Fixture::new().await;
        let authorization = bearer(&fixture.store, &fixture.author).await;
        let store = fixture.store.clone();

        let response = app(fixture.store)
            .oneshot(post_form(
                "/blog-title",
                Some(&authorization),
                "body=This+is+a+test+comment.",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(COMMENT_SUBMITTED));

        let comments = store.list_comments_for_post(fixture.post.id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body, "This is a test comment.");
        assert!(!comments[0].approved);
    }

    #[tokio::test]
    async fn anonymous_comment_is_unauthorized() {
        let fixture = Fixture::new().await;
        let store = fixture.store.clone();

        let response = app(fixture.store)
            .oneshot(post_form("/blog-title", None, "body=hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.comment_count().await, 0);
    }

    #[tokio::test]
    async fn empty_comment_rerenders_with_errors() {
        let fixture = Fixture::new().await;
        let authorization = bearer(&fixture.store, &fixture.reader).await;
        let store = fixture.store.clone();

        let response = app(fixture.store)
            .oneshot(post_form("/blog-title", Some(&authorization), "body=++"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let context: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(context["errors"]["body"][0], "This field is required.");
        assert_eq!(context["comment_form"]["body"], "  ");
        assert_eq!(store.comment_count().await, 0);
    }
}
