use crate::{
    app_state::AppState,
    configuration::{DatabaseSettings, Settings},
    request_id::RequestUuid,
    routes::{
        books, campaigns, dashboard, download, health_check, home, login, logout, signup,
        subscribers, unsubscribe,
    },
    session::middleware::AuthorizedSessionLayer,
    storage_client::StorageClient,
    telemetry,
};
use anyhow::Context;
use axum::{http::Uri, Router};
use axum_messages::MessagesManagerLayer;
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tower_sessions::{cookie::Key, SessionManagerLayer};
use tower_sessions_redis_store::{fred::prelude::*, RedisStore};

static PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/books",
    "/campaigns",
    "/subscribers",
    "/logout",
];

pub struct Application {
    local_addr: SocketAddr,
    listener: TcpListener,
    app: Router,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Application, anyhow::Error> {
        let db_pool = get_connection_pool(&configuration.database);

        let storage = StorageClient::new(
            configuration.object_storage.base_url.clone(),
            configuration.object_storage.bucket.clone(),
            configuration.object_storage.api_key.clone(),
            configuration.object_storage.timeout(),
        );

        let base_url = configuration
            .application
            .base_url
            .parse::<Uri>()
            .context("Failed to parse base url")?;

        let app_state = AppState {
            db_pool,
            storage,
            base_url,
        };

        let redis_config = RedisConfig::from_url(configuration.redis_uri.expose_secret())
            .context("Failed to parse redis uri")?;
        let redis_pool = RedisPool::new(redis_config, None, None, None, 1)
            .context("Failed to create redis pool")?;
        redis_pool.connect();
        redis_pool
            .wait_for_connect()
            .await
            .context("Failed to connect to redis")?;

        let key = Key::from(
            configuration
                .application
                .hmac_secret
                .expose_secret()
                .as_bytes(),
        );
        let session_layer = SessionManagerLayer::new(RedisStore::new(redis_pool))
            .with_secure(false)
            .with_private(key);

        let app = Router::new()
            .merge(health_check::router())
            .merge(home::router())
            .merge(login::router())
            .merge(signup::router())
            .merge(logout::router())
            .merge(dashboard::router())
            .merge(books::router())
            .merge(campaigns::router())
            .merge(subscribers::router())
            .merge(download::router())
            .merge(unsubscribe::router())
            .layer(MessagesManagerLayer)
            .layer(AuthorizedSessionLayer::new(PROTECTED_PREFIXES))
            .layer(session_layer)
            .layer(TraceLayer::new_for_http().make_span_with(telemetry::request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(RequestUuid))
            .with_state(app_state);

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)
            .await
            .context("Failed to bind address")?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read local address")?;

        Ok(Self {
            local_addr,
            listener,
            app,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on {}", self.local_addr);
        axum::serve(self.listener, self.app).await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.with_db())
}
