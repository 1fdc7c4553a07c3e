use crate::helpers::TestApp;

#[tokio::test]
async fn login_is_required_to_access_the_dashboard() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get_dashboard().await;

    // then
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), "/login");
}

#[tokio::test]
async fn the_first_visit_creates_the_profile_lazily() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;

    let profiles: Option<(uuid::Uuid,)> =
        sqlx::query_as("SELECT id FROM user_profiles WHERE id = $1")
            .bind(app.test_user.user_id)
            .fetch_optional(&app.db_pool)
            .await
            .expect("Failed to query profiles");
    assert!(profiles.is_none());

    // when
    let html_page = app.get_dashboard_html().await;

    // then
    assert!(html_page.contains("Welcome back"));

    let (plan,): (String,) = sqlx::query_as("SELECT subscription_plan FROM user_profiles WHERE id = $1")
        .bind(app.test_user.user_id)
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch created profile");
    assert_eq!(plan, "free");
}

#[tokio::test]
async fn the_dashboard_shows_the_stat_counters() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    app.seed_book("sale", None, true).await;
    app.seed_book("beta", None, true).await;

    // when
    let html_page = app.get_dashboard_html().await;

    // then
    assert!(html_page.contains("Total Books"));
    assert!(html_page.contains("Email Subscribers"));
    assert!(html_page.contains("Downloads"));
    assert!(html_page.contains("<p>2</p>"));
}

#[tokio::test]
async fn the_display_name_defaults_to_the_email_local_part() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;
    let local_part = app
        .test_user
        .email
        .split('@')
        .next()
        .unwrap()
        .to_string();

    // when
    let html_page = app.get_dashboard_html().await;

    // then
    assert!(html_page.contains(&format!("Welcome back, {local_part}")));
}
