use crate::service::Result;
use pressroom_common::{
    model::about::{AboutPage, CreateCollaborationRequest},
    notification::Notification,
    validation::{CollaborationForm, FieldErrors},
};
use pressroom_db::store::BlogStore;
use serde::Serialize;
use tracing::info;

pub const COLLABORATION_RECEIVED: &str =
    "Collaboration request received! I endeavour to respond within 2 working days.";

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct AboutContext {
    pub about: Option<AboutPage>,
    pub collaboration_form: CollaborationForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    pub notification: Option<Notification>,
}

/// The most recently updated about page. An empty table is not an error.
pub async fn get_about_page(store: &dyn BlogStore) -> Result<Option<AboutPage>> {
    Ok(store.fetch_latest_about_page().await?)
}

pub async fn about_page(store: &dyn BlogStore) -> Result<AboutContext> {
    Ok(AboutContext {
        about: get_about_page(store).await?,
        collaboration_form: CollaborationForm::default(),
        errors: None,
        notification: None,
    })
}

/// Records an inquiry from the collaborate form.
///
/// The form comes back empty either way; rejected input is reported through `errors` only.
pub async fn submit_collaboration_request(
    store: &dyn BlogStore,
    form: &CollaborationForm,
) -> Result<AboutContext> {
    let (errors, notification) = match form.validate() {
        Ok(valid) => {
            let request_id = store
                .create_collaboration_request(&CreateCollaborationRequest {
                    name: valid.name,
                    email: valid.email,
                    message: valid.message,
                })
                .await?;
            info!(%request_id, "Collaboration request received");

            (None, Some(Notification::success(COLLABORATION_RECEIVED)))
        }
        Err(errors) => (Some(errors), None),
    };

    Ok(AboutContext {
        about: get_about_page(store).await?,
        collaboration_form: CollaborationForm::default(),
        errors,
        notification,
    })
}
