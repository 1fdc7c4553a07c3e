use crate::{
    app_state::AppState,
    authentication::register_user,
    domain::EmailAddress,
    navigation::{AuthEvent, AuthFlow},
    session::state::TypedSession,
    utils::{e500, HttpError},
};
use axum::{extract::State, response::Redirect, Form};
use axum_messages::Messages;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

const MIN_PASSWORD_LENGTH: usize = 8;

#[tracing::instrument(
    skip(app_state, session, messages, form),
    fields(email = tracing::field::Empty)
)]
pub(super) async fn signup(
    State(app_state): State<AppState>,
    session: TypedSession,
    messages: Messages,
    Form(form): Form<FormData>,
) -> Result<Redirect, HttpError<anyhow::Error>> {
    tracing::Span::current().record("email", &tracing::field::display(&form.email));

    let email = match EmailAddress::parse(form.email) {
        Ok(email) => email,
        Err(e) => {
            messages.error(e);
            return Ok(Redirect::to("/signup"));
        }
    };

    if form.password.expose_secret().len() < MIN_PASSWORD_LENGTH {
        messages.error("Password must be at least 8 characters long");
        return Ok(Redirect::to("/signup"));
    }

    let user_id = match register_user(&app_state.db_pool, &email, form.password).await {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!("Failed to register `{email}`: {e:?}");
            messages.error("Failed to create your account. Please try again.");
            return Ok(Redirect::to("/signup"));
        }
    };

    session.cycle_id().await.map_err(e500)?;
    session.insert_user_id(user_id).await.map_err(e500)?;

    let flow = AuthFlow::Loading.apply(AuthEvent::SessionEstablished);
    Ok(Redirect::to(flow.redirect_target()))
}

#[derive(Deserialize)]
pub(super) struct FormData {
    email: String,
    password: Secret<String>,
}
