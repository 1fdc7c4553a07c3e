use crate::{
    app_state::AppState,
    domain::UserProfile,
    navigation::{self, MenuEntry, Page},
    repository::{books, downloads, subscribers, user_profiles, RepositoryError},
    session::extract::SessionUserId,
    utils::{e500, HttpError},
};
use askama_axum::Template;
use axum::{extract::State, routing::get, Router};
use axum_messages::Messages;

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[tracing::instrument(name = "Get dashboard", skip(app_state, messages))]
async fn dashboard(
    State(app_state): State<AppState>,
    SessionUserId(user_id): SessionUserId,
    messages: Messages,
) -> Result<Dashboard<'static>, HttpError<RepositoryError>> {
    // First load after signup creates the profile.
    let profile = user_profiles::get_or_create(&app_state.db_pool, user_id)
        .await
        .map_err(e500)?;

    let total_books = books::count_active_for_user(&app_state.db_pool, user_id)
        .await
        .map_err(e500)?;
    let total_subscribers = subscribers::count_active_for_user(&app_state.db_pool, user_id)
        .await
        .map_err(e500)?;
    let total_downloads = downloads::count_for_user(&app_state.db_pool, user_id)
        .await
        .map_err(e500)?;

    Ok(Dashboard {
        page_title: "Dashboard",
        display_name: display_name(&profile),
        plan: profile.subscription_plan.as_ref().to_string(),
        total_books,
        total_subscribers,
        total_downloads,
        menu: navigation::menu(Page::Dashboard, true),
        flashes: messages.map(|m| m.message).collect(),
    })
}

fn display_name(profile: &UserProfile) -> String {
    profile
        .display_name
        .clone()
        .unwrap_or_else(|| profile.email.clone())
}

#[derive(Template)]
#[template(path = "web/dashboard.html")]
struct Dashboard<'a> {
    page_title: &'a str,
    display_name: String,
    plan: String,
    total_books: i64,
    total_subscribers: i64,
    total_downloads: i64,
    menu: Vec<MenuEntry>,
    flashes: Vec<String>,
}
