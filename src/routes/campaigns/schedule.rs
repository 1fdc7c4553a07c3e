use crate::{
    app_state::AppState,
    domain::CampaignStatus,
    repository::{campaigns, RepositoryError},
    session::extract::SessionUserId,
    utils::{e500, HttpError},
};
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use axum_messages::Messages;
use uuid::Uuid;

/// Statuses only move forward, so anything past draft cannot be scheduled
/// again.
#[tracing::instrument(name = "Schedule campaign", skip(app_state, messages))]
pub(super) async fn schedule_campaign(
    State(app_state): State<AppState>,
    SessionUserId(user_id): SessionUserId,
    Path(campaign_id): Path<Uuid>,
    messages: Messages,
) -> Result<Redirect, HttpError<RepositoryError>> {
    let Some(campaign) = campaigns::find_for_user(&app_state.db_pool, campaign_id, user_id)
        .await
        .map_err(e500)?
    else {
        messages.error("Campaign not found.");
        return Ok(Redirect::to("/campaigns"));
    };

    if !campaign.status.can_advance_to(CampaignStatus::Scheduled) {
        messages.error("Only draft campaigns can be scheduled.");
        return Ok(Redirect::to("/campaigns"));
    }

    let updated = campaigns::update_status(
        &app_state.db_pool,
        campaign_id,
        user_id,
        campaign.status,
        CampaignStatus::Scheduled,
    )
    .await
    .map_err(e500)?;

    if updated {
        messages.info("Campaign scheduled.");
    } else {
        messages.error("Campaign changed in the meantime. Please try again.");
    }

    Ok(Redirect::to("/campaigns"))
}
