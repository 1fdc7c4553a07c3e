use fake::{faker::internet::en::SafeEmail, Fake};
use indieunit::{
    authentication::compute_password_hash,
    configuration::{get_configuration, DatabaseSettings},
    startup::{get_connection_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use reqwest::{redirect::Policy, Client, Response};
use secrecy::{ExposeSecret, Secret};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::SocketAddr;
use time::{Date, OffsetDateTime};
use uuid::Uuid;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

static FAILED_TO_EXECUTE_REQUEST: &str = "Failed to execute request";

pub struct TestApp {
    pub address: SocketAddr,
    pub db_pool: PgPool,
    pub storage_server: MockServer,
    pub test_user: TestUser,
    client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Failed to read configuration");
        config.database.database_name = Uuid::new_v4().to_string();
        config.application.port = 0;

        let db_pool = configure_database(&config.database).await;
        let storage_server = MockServer::start().await;
        config.object_storage.base_url = storage_server.uri();

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = app.local_addr();

        tokio::spawn(app.run_until_stopped());

        let test_user = TestUser::generate();
        test_user.store(&db_pool).await;

        Self {
            address,
            db_pool,
            storage_server,
            test_user,
            client: Client::builder()
                .redirect(Policy::none())
                .cookie_store(true)
                .build()
                .expect("Failed to build http client"),
        }
    }

    pub async fn login_test_user(&self) {
        let response = self
            .post_login(&serde_json::json!({
                "email": &self.test_user.email,
                "password": &self.test_user.password,
            }))
            .await;
        assert_eq!(response.status(), 303);
    }

    pub async fn get_health_check(&self) -> Response {
        self.client
            .get(self.url("/health_check"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_home(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_home_html(&self) -> String {
        self.get_html("/").await
    }

    pub async fn post_login(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url("/login"))
            .form(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_login_html(&self) -> String {
        self.get_html("/login").await
    }

    pub async fn post_signup(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url("/signup"))
            .form(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_signup_html(&self) -> String {
        self.get_html("/signup").await
    }

    pub async fn post_logout(&self) -> Response {
        self.client
            .post(self.url("/logout"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_dashboard(&self) -> Response {
        self.client
            .get(self.url("/dashboard"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_dashboard_html(&self) -> String {
        self.get_html("/dashboard").await
    }

    pub async fn get_books(&self) -> Response {
        self.client
            .get(self.url("/books"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_books_html(&self) -> String {
        self.get_html("/books").await
    }

    pub async fn post_book(&self, form: reqwest::multipart::Form) -> Response {
        self.client
            .post(self.url("/books"))
            .multipart(form)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_delete_book(&self, book_id: Uuid) -> Response {
        self.client
            .post(self.url(&format!("/books/{book_id}/delete")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_campaigns_html(&self) -> String {
        self.get_html("/campaigns").await
    }

    pub async fn post_campaign(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url("/campaigns"))
            .form(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_schedule_campaign(&self, campaign_id: Uuid) -> Response {
        self.client
            .post(self.url(&format!("/campaigns/{campaign_id}/schedule")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_subscribers(&self) -> Response {
        self.client
            .get(self.url("/subscribers"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_subscribers_html(&self) -> String {
        self.get_html("/subscribers").await
    }

    pub async fn get_download_gate(&self, book_id: Uuid) -> Response {
        self.client
            .get(self.url(&format!("/download/{book_id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_download(&self, book_id: Uuid, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url(&format!("/download/{book_id}")))
            .form(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_unsubscribe(&self, subscriber_id: Uuid) -> Response {
        self.client
            .get(self.url(&format!("/unsubscribe/{subscriber_id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    /// Inserts a book for the test user directly, bypassing the upload flow.
    pub async fn seed_book(
        &self,
        book_type: &str,
        expiration_date: Option<Date>,
        collect_emails: bool,
    ) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO books
                (id, user_id, title, book_type, file_url, expiration_date, collect_emails)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(self.test_user.user_id)
        .bind("The Winter Orchard")
        .bind(book_type)
        .bind("http://files.example.com/the-winter-orchard.epub")
        .bind(expiration_date)
        .bind(collect_emails)
        .execute(&self.db_pool)
        .await
        .expect("Failed to seed book");

        id
    }

    /// Like `seed_book`, but with an explicit title and creation time so
    /// ordering can be asserted.
    pub async fn seed_book_created_at(&self, title: &str, created_at: OffsetDateTime) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO books (id, user_id, title, book_type, file_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(self.test_user.user_id)
        .bind(title)
        .bind("beta")
        .bind("http://files.example.com/seeded.epub")
        .bind(created_at)
        .execute(&self.db_pool)
        .await
        .expect("Failed to seed book");

        id
    }

    /// A second account for ownership-scoping assertions.
    pub async fn seed_other_user(&self) -> Uuid {
        let user_id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (user_id, email, password_hash) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(format!("{user_id}@example.com"))
            .bind("irrelevant")
            .execute(&self.db_pool)
            .await
            .expect("Failed to store second user");

        user_id
    }

    async fn get_html(&self, endpoint: &str) -> String {
        self.client
            .get(self.url(endpoint))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
            .text()
            .await
            .expect("Failed to read response body")
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

pub struct TestUser {
    pub user_id: Uuid,
    pub email: String,
    pub password: String,
}

impl TestUser {
    fn generate() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            email: SafeEmail().fake(),
            password: Uuid::new_v4().to_string(),
        }
    }

    async fn store(&self, db_pool: &PgPool) {
        let password_hash = compute_password_hash(Secret::new(self.password.clone()))
            .expect("Failed to hash password");

        sqlx::query("INSERT INTO users (user_id, email, password_hash) VALUES ($1, $2, $3)")
            .bind(self.user_id)
            .bind(&self.email)
            .bind(password_hash.expose_secret())
            .execute(db_pool)
            .await
            .expect("Failed to store test user");
    }
}

async fn configure_database(configuration: &DatabaseSettings) -> PgPool {
    let mut conn = PgConnection::connect_with(&configuration.without_db())
        .await
        .expect("Failed to connect to Postgres");

    conn.execute(format!(r#"CREATE DATABASE "{}";"#, configuration.database_name).as_str())
        .await
        .expect("Failed to create database");

    let pool = get_connection_pool(configuration);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}
