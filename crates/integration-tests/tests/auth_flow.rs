//! Login, logout and session expiry through the wired app.

use storekeep_admin::auth::AuthState;
use storekeep_admin::guard::{GuardDecision, Route};
use storekeep_admin::notify::SESSION_EXPIRED;
use storekeep_admin::session::{FileTokenStore, MemoryTokenStore};
use storekeep_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_TOKEN, TestContext};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_valid_login_renders_dashboard() {
    let ctx = TestContext::new().await;
    ctx.mount_login().await;
    ctx.app.auth().resolve().await;
    assert_eq!(
        ctx.app.guard("/admin/dashboard"),
        GuardDecision::Redirect(Route::Login)
    );

    let mut login = ctx.app.login();
    login.email = ADMIN_EMAIL.to_string();
    login.password = ADMIN_PASSWORD.to_string();
    login.submit().await.expect("login succeeds");

    assert!(ctx.app.session().has_token());
    assert!(ctx.app.auth().state().is_authenticated());
    assert_eq!(ctx.history.current(), Some(Route::Dashboard));
    assert_eq!(
        ctx.app.guard("/admin/dashboard"),
        GuardDecision::Render(Route::Dashboard)
    );
}

#[tokio::test]
async fn test_invalid_login_stays_on_login() {
    let ctx = TestContext::new().await;
    ctx.mount_login().await;
    ctx.app.auth().resolve().await;

    let mut login = ctx.app.login();
    login.email = ADMIN_EMAIL.to_string();
    login.password = "wrong".to_string();
    assert!(login.submit().await.is_err());

    assert!(!ctx.app.session().has_token());
    assert_eq!(ctx.app.auth().state(), AuthState::Anonymous);
    assert_eq!(login.error(), Some("Invalid credentials"));
    assert_eq!(ctx.messages(), vec!["Invalid credentials".to_string()]);
    assert!(ctx.history.history().is_empty());
}

#[tokio::test]
async fn test_expired_session_mid_use_redirects_once() {
    let ctx = TestContext::with_tokens(MemoryTokenStore::with_token(ADMIN_TOKEN)).await;
    ctx.mount_login().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&ctx.server)
        .await;

    assert!(ctx.app.auth().resolve().await.is_authenticated());

    let mut orders = ctx.app.list(storekeep_admin::api::Resource::Orders);
    let err = orders.load().await.expect_err("backend rejects the token");

    assert!(err.is_unauthorized());
    assert!(!ctx.app.session().has_token());
    assert_eq!(ctx.app.auth().state(), AuthState::Anonymous);
    assert_eq!(ctx.history.history(), vec![Route::Login]);
    assert_eq!(ctx.messages(), vec![SESSION_EXPIRED.to_string()]);
    assert_eq!(
        ctx.app.guard("/admin/orders"),
        GuardDecision::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_logout_ends_session() {
    let ctx = TestContext::with_tokens(MemoryTokenStore::with_token(ADMIN_TOKEN)).await;
    ctx.mount_login().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.app.auth().resolve().await;
    ctx.app.auth().logout().await;

    assert!(!ctx.app.session().has_token());
    assert_eq!(
        ctx.app.guard("/admin/settings"),
        GuardDecision::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_session_survives_restart_in_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("session.json");

    let first = TestContext::with_tokens(FileTokenStore::new(&file)).await;
    first.mount_login().await;
    let mut login = first.app.login();
    login.email = ADMIN_EMAIL.to_string();
    login.password = ADMIN_PASSWORD.to_string();
    login.submit().await.expect("login succeeds");

    let second = TestContext::with_tokens(FileTokenStore::new(&file)).await;
    second.mount_login().await;
    let state = second.app.auth().resolve().await;
    assert_eq!(state.admin().map(|a| a.email.as_str()), Some(ADMIN_EMAIL));
}
