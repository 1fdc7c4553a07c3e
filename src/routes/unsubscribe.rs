use crate::{
    app_state::AppState,
    repository::{subscribers, RepositoryError},
    utils::{e500, HttpError},
};
use askama_axum::Template;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use uuid::Uuid;

// One-click link from campaign footers, so a plain GET does the work.
pub fn router() -> Router<AppState> {
    Router::new().route("/unsubscribe/:subscriber_id", get(unsubscribe))
}

#[tracing::instrument(name = "Unsubscribe", skip(app_state))]
async fn unsubscribe(
    State(app_state): State<AppState>,
    Path(subscriber_id): Path<Uuid>,
) -> Result<Unsubscribed<'static>, HttpError<RepositoryError>> {
    let deactivated = subscribers::unsubscribe(&app_state.db_pool, subscriber_id)
        .await
        .map_err(e500)?;

    let message = if deactivated {
        "You have been unsubscribed. You will not receive further emails."
    } else {
        "This unsubscribe link is no longer valid."
    };

    Ok(Unsubscribed {
        page_title: "Unsubscribe",
        message,
    })
}

#[derive(Template)]
#[template(path = "web/unsubscribed.html")]
struct Unsubscribed<'a> {
    page_title: &'a str,
    message: &'a str,
}
