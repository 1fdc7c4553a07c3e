use crate::storage_client::StorageClient;
use axum::http::Uri;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub storage: StorageClient,
    pub base_url: Uri,
}
