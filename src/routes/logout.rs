use crate::{
    app_state::AppState,
    navigation::{AuthEvent, AuthFlow, Page},
    session::state::TypedSession,
    utils::{e500, HttpError},
};
use axum::{response::Redirect, routing::post, Router};
use axum_messages::Messages;

pub fn router() -> Router<AppState> {
    Router::new().route("/logout", post(log_out))
}

#[tracing::instrument(skip(session, messages))]
async fn log_out(
    session: TypedSession,
    messages: Messages,
) -> Result<Redirect, HttpError<anyhow::Error>> {
    if session.get_user_id().await.map_err(e500)?.is_some() {
        session.flush().await.map_err(e500)?;
        messages.info("You have successfully logged out.");
    }

    let flow = AuthFlow::Authenticated(Page::Dashboard).apply(AuthEvent::SessionCleared);
    Ok(Redirect::to(flow.redirect_target()))
}
