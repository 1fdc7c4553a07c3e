use crate::app_state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use get::signup_form;
use post::signup;

mod get;
mod post;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup_form))
        .route("/signup", post(signup))
}
