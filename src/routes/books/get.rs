use crate::{
    app_state::AppState,
    domain::Book,
    navigation::{self, MenuEntry, Page},
    repository::{books, RepositoryError},
    session::extract::SessionUserId,
    utils::{e500, HttpError},
};
use askama_axum::Template;
use axum::{extract::State, http::Uri};
use axum_messages::Messages;

#[tracing::instrument(name = "List books", skip(app_state, messages))]
pub(super) async fn list_books(
    State(app_state): State<AppState>,
    SessionUserId(user_id): SessionUserId,
    messages: Messages,
) -> Result<BooksPage<'static>, HttpError<RepositoryError>> {
    let books = books::list_for_user(&app_state.db_pool, user_id)
        .await
        .map_err(e500)?;

    Ok(BooksPage {
        page_title: "Book Management",
        rows: books
            .iter()
            .map(|book| BookRow::new(book, &app_state.base_url))
            .collect(),
        menu: navigation::menu(Page::Books, true),
        flashes: messages.map(|m| m.message).collect(),
    })
}

pub(super) struct BookRow {
    pub id: String,
    pub title: String,
    pub type_label: &'static str,
    pub price: String,
    pub downloads: i32,
    pub expires: String,
    pub download_href: String,
}

impl BookRow {
    /// Share links are absolute so authors can hand them straight to readers.
    fn new(book: &Book, base_url: &Uri) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.as_ref().to_string(),
            type_label: match book.book_type {
                crate::domain::BookType::Arc => "ARC Copy",
                crate::domain::BookType::Beta => "Beta Read",
                crate::domain::BookType::Sale => "For Sale",
            },
            price: book
                .price
                .map(|p| format!("${p:.2}"))
                .unwrap_or_else(|| "-".into()),
            downloads: book.download_count,
            expires: book
                .expiration_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".into()),
            download_href: format!(
                "{}/download/{}",
                base_url.to_string().trim_end_matches('/'),
                book.id
            ),
        }
    }
}

#[derive(Template)]
#[template(path = "web/books.html")]
pub(super) struct BooksPage<'a> {
    page_title: &'a str,
    rows: Vec<BookRow>,
    menu: Vec<MenuEntry>,
    flashes: Vec<String>,
}
