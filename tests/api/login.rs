use crate::helpers::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn successful_login_redirects_to_dashboard() {
    // given
    let app = TestApp::spawn().await;
    let login_body = json!({
        "email": &app.test_user.email,
        "password": &app.test_user.password,
    });

    // when
    let response = app.post_login(&login_body).await;

    // then
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), "/dashboard");
}

#[tokio::test]
async fn login_fails_with_the_wrong_password() {
    // given
    let app = TestApp::spawn().await;
    let login_body = json!({
        "email": &app.test_user.email,
        "password": Uuid::new_v4().to_string(),
    });

    // when
    let response = app.post_login(&login_body).await;

    // then
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), "/login");
}

#[tokio::test]
async fn an_error_flash_message_is_set_on_failure() {
    // given
    let app = TestApp::spawn().await;
    let login_body = json!({
        "email": Uuid::new_v4().to_string(),
        "password": Uuid::new_v4().to_string(),
    });

    // when
    app.post_login(&login_body).await;

    // then
    let html_page = app.get_login_html().await;
    assert!(html_page.contains("<i>Authentication failed</i>"));

    // the flash is gone on the next load
    let html_page = app.get_login_html().await;
    assert!(!html_page.contains("<i>Authentication failed</i>"));
}

#[tokio::test]
async fn logging_out_clears_the_session() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;

    // when
    let response = app.post_logout().await;

    // then
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), "/");

    let html_page = app.get_home_html().await;
    assert!(html_page.contains("<i>You have successfully logged out.</i>"));

    let response = app.get_dashboard().await;
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), "/login");
}

#[tokio::test]
async fn a_logged_in_visitor_skips_the_landing_page() {
    // given
    let app = TestApp::spawn().await;
    app.login_test_user().await;

    // when
    let response = app.get_home().await;

    // then
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), "/dashboard");
}
