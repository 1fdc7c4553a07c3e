use crate::app_state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use delete::delete_book;
use get::list_books;
use post::create_book;

mod delete;
mod get;
mod post;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books", post(create_book))
        .route("/books/:book_id/delete", post(delete_book))
}
