use crate::{
    app_state::AppState,
    domain::EmailCampaign,
    navigation::{self, MenuEntry, Page},
    repository::{campaigns, subscribers, RepositoryError},
    session::extract::SessionUserId,
    utils::{e500, HttpError},
};
use askama_axum::Template;
use axum::extract::State;
use axum_messages::Messages;

#[tracing::instrument(name = "List campaigns", skip(app_state, messages))]
pub(super) async fn list_campaigns(
    State(app_state): State<AppState>,
    SessionUserId(user_id): SessionUserId,
    messages: Messages,
) -> Result<CampaignsPage<'static>, HttpError<RepositoryError>> {
    let campaigns = campaigns::list_for_user(&app_state.db_pool, user_id)
        .await
        .map_err(e500)?;
    let subscriber_count = subscribers::count_active_for_user(&app_state.db_pool, user_id)
        .await
        .map_err(e500)?;

    Ok(CampaignsPage {
        page_title: "Email Campaigns",
        subscriber_count,
        rows: campaigns.iter().map(CampaignRow::from).collect(),
        menu: navigation::menu(Page::Campaigns, true),
        flashes: messages.map(|m| m.message).collect(),
    })
}

pub(super) struct CampaignRow {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub status: String,
    pub is_draft: bool,
    pub recipients: i32,
    pub opened: i32,
}

impl From<&EmailCampaign> for CampaignRow {
    fn from(campaign: &EmailCampaign) -> Self {
        Self {
            id: campaign.id.to_string(),
            name: campaign.name.clone(),
            subject: campaign.subject.clone(),
            status: campaign.status.as_ref().to_string(),
            is_draft: campaign.status == crate::domain::CampaignStatus::Draft,
            recipients: campaign.recipient_count,
            opened: campaign.opened_count,
        }
    }
}

#[derive(Template)]
#[template(path = "web/campaigns.html")]
pub(super) struct CampaignsPage<'a> {
    page_title: &'a str,
    subscriber_count: i64,
    rows: Vec<CampaignRow>,
    menu: Vec<MenuEntry>,
    flashes: Vec<String>,
}
