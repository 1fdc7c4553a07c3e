use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::fmt::Debug;

pub fn redirect_to(uri: &str) -> Response {
    Redirect::to(uri).into_response()
}

/// Wraps a route-level failure that should surface as a bare 500: the full
/// error chain goes to the log, the user gets nothing actionable.
pub fn e500<T>(error: T) -> HttpError<T>
where
    T: Debug,
{
    HttpError(error)
}

pub struct HttpError<T>(T)
where
    T: Debug;

impl<T> IntoResponse for HttpError<T>
where
    T: Debug,
{
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self.0);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
