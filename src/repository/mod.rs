//! One function per (entity, operation). Each issues a single logical query,
//! lists newest-first, and surfaces the database error verbatim inside the
//! flat [`RepositoryError`] taxonomy; nothing here retries or translates.

pub mod books;
pub mod campaigns;
pub mod downloads;
pub mod subscribers;
pub mod user_profiles;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Failed to fetch rows from `{0}`")]
    FetchFailed(&'static str, #[source] sqlx::Error),
    #[error("Failed to apply changes to `{0}`")]
    MutationFailed(&'static str, #[source] sqlx::Error),
}
