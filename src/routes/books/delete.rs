use crate::{
    app_state::AppState,
    repository::{books, RepositoryError},
    session::extract::SessionUserId,
    utils::{e500, HttpError},
};
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use axum_messages::Messages;
use uuid::Uuid;

#[tracing::instrument(name = "Delete book", skip(app_state, messages))]
pub(super) async fn delete_book(
    State(app_state): State<AppState>,
    SessionUserId(user_id): SessionUserId,
    Path(book_id): Path<Uuid>,
    messages: Messages,
) -> Result<Redirect, HttpError<RepositoryError>> {
    let deleted = books::soft_delete(&app_state.db_pool, book_id, user_id)
        .await
        .map_err(e500)?;

    if deleted {
        messages.info("Book deleted.");
    } else {
        messages.error("Book not found.");
    }

    Ok(Redirect::to("/books"))
}
