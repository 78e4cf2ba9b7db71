use crate::{
    record::{AboutPageRecord, CommentRecord, FullPostRecord, PostSummaryRecord, SessionRecord},
    store::{BlogStore, Result},
};
use async_trait::async_trait;
use pressroom_common::{
    model::{
        Id,
        about::{
            AboutPage, AboutPageMarker, CollaborationRequestMarker, CreateAboutPage,
            CreateCollaborationRequest,
        },
        comment::{Comment, CommentMarker, CreateComment},
        post::{CreatePost, Post, PostMarker, PostSlug, PostStatus, PostSummary},
        session::{AuthTokenHash, Session},
    },
    page::{Page, PageRequest},
};
use sqlx::{PgPool, migrate::Migrator, postgres::PgPoolOptions, query, query_as, query_scalar};
use tracing::{debug, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone, Debug)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("Database migrations applied");

        Ok(())
    }
}

#[async_trait]
impl BlogStore for DbClient {
    async fn fetch_session(&self, token_hash: &AuthTokenHash) -> Result<Option<Session>> {
        let record = query_as::<_, SessionRecord>(
            "
            SELECT
                sessions.user_id,
                sessions.token_hash,
                sessions.created_at,
                sessions.expires_after_seconds
            FROM
                users.sessions
            WHERE
                sessions.token_hash = $1
            ",
        )
        .bind(&token_hash.0[..])
        .fetch_optional(&self.pool)
        .await?;

        let session = record.map(Session::try_from).transpose()?;
        Ok(session)
    }

    async fn fetch_published_posts(&self, page: PageRequest) -> Result<Page<PostSummary>> {
        let Some(offset) = page.offset() else {
            return Ok(Page::empty(page));
        };
        debug!(?page, offset, "Fetching published posts");

        let records = query_as::<_, PostSummaryRecord>(
            "
            SELECT
                posts.post_id,
                posts.title,
                posts.slug,
                posts.excerpt,
                posts.created_at,
                users.user_id,
                users.handle
            FROM
                blog.posts JOIN users.users ON posts.author_id = users.user_id
            WHERE
                posts.status = $1
            ORDER BY
                posts.created_at DESC,
                posts.author_id ASC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(PostStatus::Published.code())
        .bind(i64::try_from(page.probe_limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(PostSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::from_probe(page, posts))
    }

    async fn fetch_published_post(&self, slug: &PostSlug) -> Result<Option<Post>> {
        let record = query_as::<_, FullPostRecord>(
            "
            SELECT
                posts.post_id,
                posts.title,
                posts.slug,
                posts.content,
                posts.excerpt,
                posts.status,
                posts.created_at,
                posts.updated_at,
                users.user_id,
                users.handle
            FROM
                blog.posts JOIN users.users ON posts.author_id = users.user_id
            WHERE
                posts.slug = $1 AND posts.status = $2
            ",
        )
        .bind(slug.get())
        .bind(PostStatus::Published.code())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    async fn create_post(&self, post: &CreatePost) -> Result<Id<PostMarker>> {
        let post_id = query_scalar::<_, i64>(
            "
            INSERT INTO blog.posts (title, slug, author_id, content, excerpt, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING posts.post_id
            ",
        )
        .bind(post.title.get())
        .bind(post.slug.get())
        .bind(post.author.get())
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(post.status.code())
        .fetch_one(&self.pool)
        .await?;

        Ok(post_id.into())
    }

    async fn list_comments_for_post(&self, post_id: Id<PostMarker>) -> Result<Vec<Comment>> {
        let records = query_as::<_, CommentRecord>(
            "
            SELECT
                comments.comment_id,
                comments.post_id,
                comments.body,
                comments.approved,
                comments.created_at,
                users.user_id,
                users.handle
            FROM
                blog.comments JOIN users.users ON comments.author_id = users.user_id
            WHERE
                comments.post_id = $1
            ORDER BY
                comments.created_at DESC,
                comments.comment_id DESC
            ",
        )
        .bind(post_id.get())
        .fetch_all(&self.pool)
        .await?;

        let comments = records
            .into_iter()
            .map(Comment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    async fn fetch_comment(&self, comment_id: Id<CommentMarker>) -> Result<Option<Comment>> {
        let record = query_as::<_, CommentRecord>(
            "
            SELECT
                comments.comment_id,
                comments.post_id,
                comments.body,
                comments.approved,
                comments.created_at,
                users.user_id,
                users.handle
            FROM
                blog.comments JOIN users.users ON comments.author_id = users.user_id
            WHERE
                comments.comment_id = $1
            ",
        )
        .bind(comment_id.get())
        .fetch_optional(&self.pool)
        .await?;

        let comment = record.map(Comment::try_from).transpose()?;
        Ok(comment)
    }

    async fn create_comment(&self, comment: &CreateComment) -> Result<Id<CommentMarker>> {
        let comment_id = query_scalar::<_, i64>(
            "
            INSERT INTO blog.comments (post_id, author_id, body, approved)
            VALUES ($1, $2, $3, FALSE)
            RETURNING comments.comment_id
            ",
        )
        .bind(comment.post.get())
        .bind(comment.author.get())
        .bind(&comment.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment_id.into())
    }

    async fn update_comment(
        &self,
        comment_id: Id<CommentMarker>,
        post_id: Id<PostMarker>,
        body: &str,
    ) -> Result<bool> {
        let result = query(
            "
            UPDATE blog.comments
            SET body = $2, post_id = $3, approved = FALSE
            WHERE comments.comment_id = $1
            ",
        )
        .bind(comment_id.get())
        .bind(body)
        .bind(post_id.get())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_comment_approved(
        &self,
        comment_id: Id<CommentMarker>,
        approved: bool,
    ) -> Result<bool> {
        let result = query(
            "
            UPDATE blog.comments
            SET approved = $2
            WHERE comments.comment_id = $1
            ",
        )
        .bind(comment_id.get())
        .bind(approved)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_comment(&self, comment_id: Id<CommentMarker>) -> Result<bool> {
        let result = query("DELETE FROM blog.comments WHERE comments.comment_id = $1")
            .bind(comment_id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_latest_about_page(&self) -> Result<Option<AboutPage>> {
        let record = query_as::<_, AboutPageRecord>(
            "
            SELECT
                about_pages.about_page_id,
                about_pages.title,
                about_pages.content,
                about_pages.updated_at
            FROM
                about.about_pages
            ORDER BY
                about_pages.updated_at DESC,
                about_pages.about_page_id DESC
            LIMIT 1
            ",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(AboutPage::from))
    }

    async fn create_about_page(&self, page: &CreateAboutPage) -> Result<Id<AboutPageMarker>> {
        let about_page_id = query_scalar::<_, i64>(
            "
            INSERT INTO about.about_pages (title, content)
            VALUES ($1, $2)
            RETURNING about_pages.about_page_id
            ",
        )
        .bind(&page.title)
        .bind(&page.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(about_page_id.into())
    }

    async fn create_collaboration_request(
        &self,
        request: &CreateCollaborationRequest,
    ) -> Result<Id<CollaborationRequestMarker>> {
        let collaboration_request_id = query_scalar::<_, i64>(
            "
            INSERT INTO about.collaboration_requests (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING collaboration_requests.collaboration_request_id
            ",
        )
        .bind(&request.name)
        .bind(request.email.get())
        .bind(&request.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(collaboration_request_id.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::MIGRATOR;

    #[test]
    fn updates_refresh_updated_at() {
        let sql: String = MIGRATOR
            .iter()
            .map(|migration| migration.sql.as_ref())
            .collect();

        assert!(sql.contains("BEFORE UPDATE ON blog.posts"));
        assert!(sql.contains("BEFORE UPDATE ON about.about_pages"));
        assert!(sql.contains("NEW.updated_at = now()"));
    }

    #[test]
    fn migrations_are_ordered() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|migration| migration.version).collect();

        assert!(versions.is_sorted());
        assert_eq!(versions.first(), Some(&20_250_601_000_000));
    }
}
