use crate::app_state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use get::list_campaigns;
use post::create_campaign;
use schedule::schedule_campaign;

mod get;
mod post;
mod schedule;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaigns))
        .route("/campaigns", post(create_campaign))
        .route("/campaigns/:campaign_id/schedule", post(schedule_campaign))
}
