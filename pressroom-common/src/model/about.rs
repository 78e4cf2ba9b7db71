use crate::{model::Id, validation::EmailAddress};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct AboutPageMarker;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CollaborationRequestMarker;

/// Content of the about page. `content` is rich text and passed through as stored.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct AboutPage {
    pub id: Id<AboutPageMarker>,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CreateAboutPage {
    pub title: String,
    pub content: String,
}

/// An inquiry left through the collaborate form.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CollaborationRequest {
    pub id: Id<CollaborationRequestMarker>,
    pub name: String,
    pub email: EmailAddress,
    pub message: String,
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CreateCollaborationRequest {
    pub name: String,
    pub email: EmailAddress,
    pub message: String,
}
