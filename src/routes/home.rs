use crate::{
    app_state::AppState,
    navigation::{AuthEvent, AuthFlow},
    session::state::TypedSession,
    utils::{e500, redirect_to, HttpError},
};
use askama_axum::Template;
use axum::{response::IntoResponse, response::Response, routing::get, Router};
use axum_messages::Messages;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

#[tracing::instrument(name = "Render landing page", skip(session, messages))]
async fn home(
    session: TypedSession,
    messages: Messages,
) -> Result<Response, HttpError<anyhow::Error>> {
    // A visitor with a live session skips the landing page entirely.
    if session.get_user_id().await.map_err(e500)?.is_some() {
        let flow = AuthFlow::Loading.apply(AuthEvent::SessionEstablished);
        return Ok(redirect_to(flow.redirect_target()));
    }

    Ok(HomeTemplate {
        title: "IndieUnit",
        tagline: "Upload your books, grow your readers, own your audience.",
        flashes: messages.map(|m| m.message).collect(),
    }
    .into_response())
}

#[derive(Template)]
#[template(path = "web/home.html")]
struct HomeTemplate<'a> {
    title: &'a str,
    tagline: &'a str,
    flashes: Vec<String>,
}
