use crate::{
    app_state::AppState,
    domain::NewCampaign,
    repository::campaigns,
    session::extract::SessionUserId,
    utils::HttpError,
};
use axum::{extract::State, response::Redirect, Form};
use axum_messages::Messages;
use serde::Deserialize;

#[tracing::instrument(name = "Create campaign", skip(app_state, messages, form))]
pub(super) async fn create_campaign(
    State(app_state): State<AppState>,
    SessionUserId(user_id): SessionUserId,
    messages: Messages,
    Form(form): Form<FormData>,
) -> Result<Redirect, HttpError<anyhow::Error>> {
    let campaign = match NewCampaign::parse(form.name, form.subject, form.content_html, form.content_text) {
        Ok(campaign) => campaign,
        Err(e) => {
            messages.error(e);
            return Ok(Redirect::to("/campaigns"));
        }
    };

    match campaigns::insert(&app_state.db_pool, user_id, &campaign).await {
        Ok(_) => {
            messages.info("Your email campaign has been created.");
        }
        Err(e) => {
            tracing::error!("{e:?}");
            messages.error("Failed to create campaign. Please try again.");
        }
    }

    Ok(Redirect::to("/campaigns"))
}

#[derive(Deserialize)]
pub(super) struct FormData {
    name: String,
    subject: String,
    content_html: String,
    #[serde(default)]
    content_text: String,
}
