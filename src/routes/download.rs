use crate::{
    app_state::AppState,
    domain::{Book, EmailAddress, NewSubscriber},
    repository::{books, downloads, subscribers, RepositoryError},
    utils::{e500, redirect_to, HttpError},
};
use askama_axum::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

// Reader-facing; outside the authorized-session prefixes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/download/:book_id", get(download_gate))
        .route("/download/:book_id", post(download))
}

#[tracing::instrument(name = "Get download gate", skip(app_state))]
async fn download_gate(
    State(app_state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> Result<Response, HttpError<RepositoryError>> {
    let book = match find_available(&app_state, book_id).await? {
        Ok(book) => book,
        Err(unavailable) => return Ok(unavailable),
    };

    Ok(DownloadGate {
        page_title: book.title.as_ref().to_string(),
        cover_image_url: book.cover_image_url.clone(),
        collect_emails: book.collect_emails,
        action: format!("/download/{}", book.id),
    }
    .into_response())
}

#[tracing::instrument(name = "Download book", skip(app_state, form))]
async fn download(
    State(app_state): State<AppState>,
    Path(book_id): Path<Uuid>,
    Form(form): Form<FormData>,
) -> Result<Response, HttpError<RepositoryError>> {
    let book = match find_available(&app_state, book_id).await? {
        Ok(book) => book,
        Err(unavailable) => return Ok(unavailable),
    };

    let reader_email = if book.collect_emails {
        let raw = form
            .reader_email
            .unwrap_or_default()
            .trim()
            .to_string();
        let email = match EmailAddress::parse(raw) {
            Ok(email) => email,
            Err(e) => {
                tracing::info!("Rejected opt-in: {e}");
                return Ok((
                    StatusCode::BAD_REQUEST,
                    "A valid email address is required to download this book",
                )
                    .into_response());
            }
        };

        let subscriber = NewSubscriber {
            email: email.clone(),
            name: form.reader_name.filter(|n| !n.trim().is_empty()),
            source: Some("download".into()),
            book_id: Some(book.id),
        };
        subscribers::insert(&app_state.db_pool, book.user_id, &subscriber)
            .await
            .map_err(e500)?;

        Some(email)
    } else {
        None
    };

    downloads::record(
        &app_state.db_pool,
        book.id,
        book.user_id,
        reader_email.as_ref().map(AsRef::as_ref),
    )
    .await
    .map_err(e500)?;

    Ok(redirect_to(&book.file_url))
}

/// Soft-deleted books 404, expired ARC and beta copies 410.
async fn find_available(
    app_state: &AppState,
    book_id: Uuid,
) -> Result<Result<Book, Response>, HttpError<RepositoryError>> {
    let Some(book) = books::find_active(&app_state.db_pool, book_id)
        .await
        .map_err(e500)?
    else {
        return Ok(Err((
            StatusCode::NOT_FOUND,
            "This book is no longer available",
        )
            .into_response()));
    };

    if book.is_expired(OffsetDateTime::now_utc().date()) {
        return Ok(Err(
            (StatusCode::GONE, "This copy has expired").into_response()
        ));
    }

    Ok(Ok(book))
}

#[derive(Deserialize)]
struct FormData {
    reader_email: Option<String>,
    reader_name: Option<String>,
}

#[derive(Template)]
#[template(path = "web/download_gate.html")]
struct DownloadGate {
    page_title: String,
    cover_image_url: Option<String>,
    collect_emails: bool,
    action: String,
}
