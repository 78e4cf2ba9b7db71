//! A [`BlogStore`] kept entirely in process memory.
//!
//! Behaves like the PostgreSQL store for everything the services rely on (ordering, unique
//! titles and slugs, cascading comment deletion, draft filtering) and additionally exposes
//! seeding and inspection helpers for tests.

use crate::store::{BlogStore, DbError, Result};
use async_trait::async_trait;
use pressroom_common::{
    model::{
        Id,
        about::{
            AboutPage, AboutPageMarker, CollaborationRequest, CollaborationRequestMarker,
            CreateAboutPage, CreateCollaborationRequest,
        },
        comment::{Comment, CommentMarker, CreateComment},
        post::{CreatePost, Post, PostMarker, PostSlug, PostStatus, PostSummary},
        session::{AuthTokenHash, Session},
        user::{User, UserHandle},
    },
    page::{Page, PageRequest},
};
use std::{
    cmp::Reverse,
    collections::BTreeMap,
    sync::atomic::{AtomicI64, Ordering},
};
use time::OffsetDateTime;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    sessions: Vec<Session>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    about_pages: Vec<AboutPage>,
    collaboration_requests: Vec<CollaborationRequest>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    last_id: AtomicI64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id<Marker>(&self) -> Id<Marker> {
        Id::new(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub async fn create_user(&self, handle: UserHandle) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|user| user.handle == handle) {
            return Err(DbError::UniqueViolation("users_handle_key".to_owned()));
        }

        let user = User {
            id: self.next_id(),
            handle,
        };
        tables.users.insert(user.id.get(), user.clone());

        Ok(user)
    }

    pub async fn create_session(&self, session: Session) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&session.user.get()) {
            return Err(DbError::MissingReference("user"));
        }
        if tables
            .sessions
            .iter()
            .any(|stored| stored.token_hash == session.token_hash)
        {
            return Err(DbError::UniqueViolation("sessions_pkey".to_owned()));
        }

        tables.sessions.push(session);
        Ok(())
    }

    /// Like [`BlogStore::create_post`], with an explicit creation time.
    pub async fn create_post_at(
        &self,
        post: &CreatePost,
        created_at: OffsetDateTime,
    ) -> Result<Id<PostMarker>> {
        let mut tables = self.tables.write().await;
        let author = tables
            .users
            .get(&post.author.get())
            .cloned()
            .ok_or(DbError::MissingReference("user"))?;
        if tables.posts.values().any(|stored| stored.title == post.title) {
            return Err(DbError::UniqueViolation("posts_title_key".to_owned()));
        }
        if tables.posts.values().any(|stored| stored.slug == post.slug) {
            return Err(DbError::UniqueViolation("posts_slug_key".to_owned()));
        }

        let id = self.next_id();
        tables.posts.insert(
            id.get(),
            Post {
                id,
                title: post.title.clone(),
                slug: post.slug.clone(),
                author,
                content: post.content.clone(),
                excerpt: post.excerpt.clone(),
                status: post.status,
                created_at,
                updated_at: created_at,
            },
        );

        Ok(id)
    }

    /// Removes a post together with its comments.
    pub async fn delete_post(&self, post_id: Id<PostMarker>) -> bool {
        let mut tables = self.tables.write().await;
        let removed = tables.posts.remove(&post_id.get()).is_some();
        tables.comments.retain(|_, comment| comment.post != post_id);

        removed
    }

    pub async fn collaboration_requests(&self) -> Vec<CollaborationRequest> {
        self.tables.read().await.collaboration_requests.clone()
    }

    pub async fn comment_count(&self) -> usize {
        self.tables.read().await.comments.len()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn fetch_session(&self, token_hash: &AuthTokenHash) -> Result<Option<Session>> {
        let tables = self.tables.read().await;
        let session = tables
            .sessions
            .iter()
            .find(|session| &session.token_hash == token_hash)
            .cloned();

        Ok(session)
    }

    async fn fetch_published_posts(&self, page: PageRequest) -> Result<Page<PostSummary>> {
        let Some(offset) = page.offset() else {
            return Ok(Page::empty(page));
        };

        let tables = self.tables.read().await;
        let mut published: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| post.status == PostStatus::Published)
            .collect();
        published.sort_by_key(|post| (Reverse(post.created_at), post.author.id));

        let rows = published
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page.probe_limit()).unwrap_or(usize::MAX))
            .cloned()
            .map(PostSummary::from)
            .collect();

        Ok(Page::from_probe(page, rows))
    }

    async fn fetch_published_post(&self, slug: &PostSlug) -> Result<Option<Post>> {
        let tables = self.tables.read().await;
        let post = tables
            .posts
            .values()
            .find(|post| &post.slug == slug && post.status == PostStatus::Published)
            .cloned();

        Ok(post)
    }

    async fn create_post(&self, post: &CreatePost) -> Result<Id<PostMarker>> {
        self.create_post_at(post, OffsetDateTime::now_utc()).await
    }

    async fn list_comments_for_post(&self, post_id: Id<PostMarker>) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.post == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| Reverse((comment.created_at, comment.id)));

        Ok(comments)
    }

    async fn fetch_comment(&self, comment_id: Id<CommentMarker>) -> Result<Option<Comment>> {
        Ok(self
            .tables
            .read()
            .await
            .comments
            .get(&comment_id.get())
            .cloned())
    }

    async fn create_comment(&self, comment: &CreateComment) -> Result<Id<CommentMarker>> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post.get()) {
            return Err(DbError::MissingReference("post"));
        }
        let author = tables
            .users
            .get(&comment.author.get())
            .cloned()
            .ok_or(DbError::MissingReference("user"))?;

        let id = self.next_id();
        tables.comments.insert(
            id.get(),
            Comment {
                id,
                post: comment.post,
                author,
                body: comment.body.clone(),
                approved: false,
                created_at: OffsetDateTime::now_utc(),
            },
        );

        Ok(id)
    }

    async fn update_comment(
        &self,
        comment_id: Id<CommentMarker>,
        post_id: Id<PostMarker>,
        body: &str,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id.get()) {
            return Err(DbError::MissingReference("post"));
        }

        let Some(comment) = tables.comments.get_mut(&comment_id.get()) else {
            return Ok(false);
        };
        body.clone_into(&mut comment.body);
        comment.post = post_id;
        comment.approved = false;

        Ok(true)
    }

    async fn set_comment_approved(
        &self,
        comment_id: Id<CommentMarker>,
        approved: bool,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables.comments.get_mut(&comment_id.get()) else {
            return Ok(false);
        };
        comment.approved = approved;

        Ok(true)
    }

    async fn delete_comment(&self, comment_id: Id<CommentMarker>) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.remove(&comment_id.get()).is_some())
    }

    async fn fetch_latest_about_page(&self) -> Result<Option<AboutPage>> {
        let tables = self.tables.read().await;
        let latest = tables
            .about_pages
            .iter()
            .max_by_key(|page| (page.updated_at, page.id))
            .cloned();

        Ok(latest)
    }

    async fn create_about_page(&self, page: &CreateAboutPage) -> Result<Id<AboutPageMarker>> {
        let id = self.next_id();
        self.tables.write().await.about_pages.push(AboutPage {
            id,
            title: page.title.clone(),
            content: page.content.clone(),
            updated_at: OffsetDateTime::now_utc(),
        });

        Ok(id)
    }

    async fn create_collaboration_request(
        &self,
        request: &CreateCollaborationRequest,
    ) -> Result<Id<CollaborationRequestMarker>> {
        let id = self.next_id();
        self.tables
            .write()
            .await
            .collaboration_requests
            .push(CollaborationRequest {
                id,
                name: request.name.clone(),
                email: request.email.clone(),
                message: request.message.clone(),
                created_at: OffsetDateTime::now_utc(),
            });

        Ok(id)
    }
}
