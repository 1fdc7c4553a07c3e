use crate::{
    app_state::AppState,
    domain::EmailSubscriber,
    navigation::{self, MenuEntry, Page},
    repository::{subscribers, RepositoryError},
    session::extract::SessionUserId,
    utils::{e500, HttpError},
};
use askama_axum::Template;
use axum::{extract::State, routing::get, Router};
use axum_messages::Messages;

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribers", get(list_subscribers))
}

#[tracing::instrument(name = "List subscribers", skip(app_state, messages))]
async fn list_subscribers(
    State(app_state): State<AppState>,
    SessionUserId(user_id): SessionUserId,
    messages: Messages,
) -> Result<SubscribersPage<'static>, HttpError<RepositoryError>> {
    let subscribers = subscribers::list_active_for_user(&app_state.db_pool, user_id)
        .await
        .map_err(e500)?;

    Ok(SubscribersPage {
        page_title: "Subscribers",
        rows: subscribers.iter().map(SubscriberRow::from).collect(),
        menu: navigation::menu(Page::Subscribers, true),
        flashes: messages.map(|m| m.message).collect(),
    })
}

struct SubscriberRow {
    email: String,
    name: String,
    source: String,
    subscribed_at: String,
}

impl From<&EmailSubscriber> for SubscriberRow {
    fn from(subscriber: &EmailSubscriber) -> Self {
        Self {
            email: subscriber.email.as_ref().to_string(),
            name: subscriber.name.clone().unwrap_or_default(),
            source: subscriber.source.clone().unwrap_or_else(|| "manual".into()),
            subscribed_at: subscriber.subscribed_at.date().to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "web/subscribers.html")]
struct SubscribersPage<'a> {
    page_title: &'a str,
    rows: Vec<SubscriberRow>,
    menu: Vec<MenuEntry>,
    flashes: Vec<String>,
}
