use crate::helpers::TestApp;
use serde_json::json;
use time::{macros::date, Date, OffsetDateTime};

fn yesterday() -> Date {
    (OffsetDateTime::now_utc() - time::Duration::days(1)).date()
}

#[tokio::test]
async fn the_download_gate_shows_the_book() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", None, true).await;

    // when
    let response = app.get_download_gate(book_id).await;

    // then
    assert!(response.status().is_success());
    let html_page = response.text().await.unwrap();
    assert!(html_page.contains("The Winter Orchard"));
    assert!(html_page.contains("reader_email"));
}

#[tokio::test]
async fn an_expired_copy_answers_410() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", Some(yesterday()), true).await;

    // when
    let response = app.get_download_gate(book_id).await;

    // then
    assert_eq!(response.status(), 410);
}

#[tokio::test]
async fn a_copy_expiring_today_is_still_available() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let today = OffsetDateTime::now_utc().date();
    let book_id = app.seed_book("arc", Some(today), true).await;

    // when
    let response = app.get_download_gate(book_id).await;

    // then
    assert!(response.status().is_success());
}

#[tokio::test]
async fn a_download_redirects_to_the_file_and_is_recorded() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", Some(date!(2030 - 01 - 01)), true).await;

    // when
    let response = app
        .post_download(
            book_id,
            &json!({
                "reader_email": "eager.reader@example.com",
                "reader_name": "Eager Reader",
            }),
        )
        .await;

    // then
    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get("Location").unwrap(),
        "http://files.example.com/the-winter-orchard.epub"
    );

    let (download_count,): (i32,) =
        sqlx::query_as("SELECT download_count FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(download_count, 1);

    let (reader_email,): (Option<String>,) =
        sqlx::query_as("SELECT reader_email FROM downloads WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(reader_email.as_deref(), Some("eager.reader@example.com"));
}

#[tokio::test]
async fn a_download_with_email_collection_creates_a_subscriber() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", None, true).await;

    // when
    app.post_download(
        book_id,
        &json!({
            "reader_email": "eager.reader@example.com",
            "reader_name": "Eager Reader",
        }),
    )
    .await;

    // then
    let (name, source, subscribed_book): (Option<String>, Option<String>, Option<uuid::Uuid>) =
        sqlx::query_as(
            "SELECT name, source, book_id FROM email_subscribers WHERE user_id = $1 AND email = $2",
        )
        .bind(app.test_user.user_id)
        .bind("eager.reader@example.com")
        .fetch_one(&app.db_pool)
        .await
        .expect("No subscriber row was created");

    assert_eq!(name.as_deref(), Some("Eager Reader"));
    assert_eq!(source.as_deref(), Some("download"));
    assert_eq!(subscribed_book, Some(book_id));
}

#[tokio::test]
async fn downloading_twice_creates_a_single_subscriber() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", None, true).await;
    let body = json!({ "reader_email": "eager.reader@example.com" });

    // when
    app.post_download(book_id, &body).await;
    app.post_download(book_id, &body).await;

    // then: both downloads counted, one subscriber
    let (download_count,): (i32,) =
        sqlx::query_as("SELECT download_count FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(download_count, 2);

    let (subscribers,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM email_subscribers WHERE user_id = $1")
            .bind(app.test_user.user_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(subscribers, 1);
}

#[tokio::test]
async fn a_gated_download_requires_a_valid_email() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", None, true).await;

    // when
    let response = app
        .post_download(book_id, &json!({ "reader_email": "not-an-email" }))
        .await;

    // then
    assert_eq!(response.status(), 400);

    let (download_count,): (i32,) =
        sqlx::query_as("SELECT download_count FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(download_count, 0);
}

#[tokio::test]
async fn an_ungated_download_skips_email_collection() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("sale", None, false).await;

    // when
    let response = app.post_download(book_id, &json!({})).await;

    // then
    assert_eq!(response.status(), 303);

    let (subscribers,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM email_subscribers WHERE user_id = $1")
            .bind(app.test_user.user_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(subscribers, 0);

    let (reader_email,): (Option<String>,) =
        sqlx::query_as("SELECT reader_email FROM downloads WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(reader_email, None);
}
