use crate::server::ServerRouter;

mod about;
mod comments;
mod posts;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .merge(posts::routes())
        .merge(comments::routes())
        .merge(about::routes())
}
