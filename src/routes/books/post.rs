use crate::{
    app_state::AppState,
    domain::{BookDraft, NewBook},
    repository::books,
    session::extract::SessionUserId,
    storage_client::StorageClient,
    utils::HttpError,
};
use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    response::Redirect,
};
use axum_messages::Messages;
use time::{macros::format_description, Date};

const GENERIC_UPLOAD_ERROR: &str = "Failed to upload your book. Please try again.";

#[tracing::instrument(name = "Upload book", skip(app_state, messages, multipart))]
pub(super) async fn create_book(
    State(app_state): State<AppState>,
    SessionUserId(user_id): SessionUserId,
    messages: Messages,
    mut multipart: Multipart,
) -> Result<Redirect, HttpError<anyhow::Error>> {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Failed to read upload form: {e:?}");
            messages.error(GENERIC_UPLOAD_ERROR);
            return Ok(Redirect::to("/books"));
        }
    };

    let Some(file) = form.file else {
        messages.error("A book file is required");
        return Ok(Redirect::to("/books"));
    };

    let new_book = match NewBook::parse(form.draft) {
        Ok(new_book) => new_book,
        Err(e) => {
            messages.error(e);
            return Ok(Redirect::to("/books"));
        }
    };

    // Upload file, then cover, then insert the row. The steps are not
    // transactional: a later failure leaves already-uploaded objects behind,
    // so their keys are logged for manual cleanup.
    let mut uploaded_keys = Vec::new();

    let book_key = StorageClient::object_key("books", user_id, &file.name);
    let file_url = match app_state.storage.upload(&book_key, file.bytes).await {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("{e:?}");
            messages.error(GENERIC_UPLOAD_ERROR);
            return Ok(Redirect::to("/books"));
        }
    };
    uploaded_keys.push(book_key);

    let cover_image_url = match form.cover {
        Some(cover) => {
            let cover_key = StorageClient::object_key("covers", user_id, &cover.name);
            match app_state.storage.upload(&cover_key, cover.bytes).await {
                Ok(url) => {
                    uploaded_keys.push(cover_key);
                    Some(url)
                }
                Err(e) => {
                    tracing::error!(orphaned_keys = ?uploaded_keys, "{e:?}");
                    messages.error(GENERIC_UPLOAD_ERROR);
                    return Ok(Redirect::to("/books"));
                }
            }
        }
        None => None,
    };

    match books::insert(
        &app_state.db_pool,
        user_id,
        &new_book,
        &file_url,
        file.content_type.as_deref(),
        cover_image_url.as_deref(),
    )
    .await
    {
        Ok(book) => {
            tracing::info!("Book `{}` created", book.id);
            messages.info("Your book has been uploaded.");
        }
        Err(e) => {
            tracing::error!(orphaned_keys = ?uploaded_keys, "{e:?}");
            messages.error(GENERIC_UPLOAD_ERROR);
        }
    }

    Ok(Redirect::to("/books"))
}

struct UploadedFile {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

struct UploadForm {
    draft: BookDraft,
    file: Option<UploadedFile>,
    cover: Option<UploadedFile>,
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, anyhow::Error> {
    let mut title = String::new();
    let mut description = None;
    let mut book_type = String::new();
    let mut price = None;
    let mut expiration_date = None;
    let mut collect_emails = false;
    let mut file = None;
    let mut cover = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .context("Failed to read multipart field")?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = field.text().await?,
            "description" => description = Some(field.text().await?),
            "book_type" => book_type = field.text().await?,
            "price" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    price = Some(
                        text.trim()
                            .parse::<f64>()
                            .with_context(|| format!("`{text}` is not a valid price"))?,
                    );
                }
            }
            "expiration_date" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    let format = format_description!("[year]-[month]-[day]");
                    expiration_date = Some(
                        Date::parse(text.trim(), &format)
                            .with_context(|| format!("`{text}` is not a valid date"))?,
                    );
                }
            }
            "collect_emails" => collect_emails = true,
            "file" => {
                let original_name = field.file_name().unwrap_or("book").to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await?.to_vec();
                if !bytes.is_empty() {
                    file = Some(UploadedFile {
                        name: original_name,
                        content_type,
                        bytes,
                    });
                }
            }
            "cover" => {
                let original_name = field.file_name().unwrap_or("cover").to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await?.to_vec();
                if !bytes.is_empty() {
                    cover = Some(UploadedFile {
                        name: original_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(UploadForm {
        draft: BookDraft {
            title,
            description,
            book_type,
            price,
            expiration_date,
            collect_emails,
        },
        file,
        cover,
    })
}
