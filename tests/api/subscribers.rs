use crate::helpers::TestApp;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

async fn insert_subscriber(app: &TestApp, user_id: Uuid, email: &str, created_at: OffsetDateTime) {
    sqlx::query(
        r#"
        INSERT INTO email_subscribers (id, user_id, email, source, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(email)
    .bind("download")
    .bind(created_at)
    .execute(&app.db_pool)
    .await
    .expect("Failed to seed subscriber");
}

#[tokio::test]
async fn login_is_required_to_see_subscribers() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get_subscribers().await;

    // then
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), "/login");
}

#[tokio::test]
async fn the_subscriber_list_shows_opted_in_readers() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", None, true).await;
    app.post_download(
        book_id,
        &json!({
            "reader_email": "eager.reader@example.com",
            "reader_name": "Eager Reader",
        }),
    )
    .await;

    // when
    let html_page = app.get_subscribers_html().await;

    // then
    assert!(html_page.contains("eager.reader@example.com"));
    assert!(html_page.contains("Eager Reader"));
    assert!(html_page.contains("download"));
}

#[tokio::test]
async fn the_subscriber_list_is_newest_first_and_scoped_to_the_owner() {
    // given: the older subscriber inserted first, plus one owned by someone else
    let app = TestApp::spawn().await;
    app.login_test_user().await;

    let now = OffsetDateTime::now_utc();
    insert_subscriber(
        &app,
        app.test_user.user_id,
        "older.reader@example.com",
        now - Duration::days(2),
    )
    .await;
    insert_subscriber(
        &app,
        app.test_user.user_id,
        "newer.reader@example.com",
        now - Duration::days(1),
    )
    .await;

    let other_user_id = app.seed_other_user().await;
    insert_subscriber(&app, other_user_id, "foreign.reader@example.com", now).await;

    // when
    let html_page = app.get_subscribers_html().await;

    // then
    assert!(!html_page.contains("foreign.reader@example.com"));
    let newer = html_page
        .find("newer.reader@example.com")
        .expect("The newer subscriber is missing from the list");
    let older = html_page
        .find("older.reader@example.com")
        .expect("The older subscriber is missing from the list");
    assert!(newer < older, "Subscribers are not listed newest first");
}

#[tokio::test]
async fn unsubscribing_deactivates_the_subscriber() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", None, true).await;
    app.post_download(book_id, &json!({ "reader_email": "eager.reader@example.com" }))
        .await;
    let (subscriber_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM email_subscribers WHERE user_id = $1")
            .bind(app.test_user.user_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();

    // when
    let response = app.get_unsubscribe(subscriber_id).await;

    // then
    assert!(response.status().is_success());
    let html_page = response.text().await.unwrap();
    assert!(html_page.contains("You have been unsubscribed"));

    let (is_active, unsubscribed_at): (bool, Option<time::OffsetDateTime>) =
        sqlx::query_as("SELECT is_active, unsubscribed_at FROM email_subscribers WHERE id = $1")
            .bind(subscriber_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert!(!is_active);
    assert!(unsubscribed_at.is_some());

    // the reader is gone from the list and the count
    let html_page = app.get_subscribers_html().await;
    assert!(!html_page.contains("eager.reader@example.com"));
}

#[tokio::test]
async fn an_already_used_unsubscribe_link_says_so() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let book_id = app.seed_book("arc", None, true).await;
    app.post_download(book_id, &json!({ "reader_email": "eager.reader@example.com" }))
        .await;
    let (subscriber_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM email_subscribers WHERE user_id = $1")
            .bind(app.test_user.user_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    app.get_unsubscribe(subscriber_id).await;

    // when
    let response = app.get_unsubscribe(subscriber_id).await;

    // then
    let html_page = response.text().await.unwrap();
    assert!(html_page.contains("no longer valid"));
}

#[tokio::test]
async fn an_unknown_unsubscribe_link_is_not_an_error() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get_unsubscribe(Uuid::new_v4()).await;

    // then
    assert!(response.status().is_success());
    let html_page = response.text().await.unwrap();
    assert!(html_page.contains("no longer valid"));
}
