//! Integration tests for dashboard-api using mockito

use std::sync::{Arc, Mutex};

use dashboard_api::notify::OnClose;
use dashboard_api::settings::RouterKind;
use dashboard_api::{
    AdminApi, MemoryTokenStore, MenuForm, Notifier, PageQuery, Redirector, Settings, TokenStore,
    UserForm, TOKEN_KEY,
};
use dashboard_http::{CancelReason, HttpError};
use mockito::Matcher;
use serde_json::json;

#[derive(Default)]
struct Notices(Mutex<Vec<String>>);

impl Notices {
    fn messages(&self) -> Vec<String> {
        self.0.lock().expect("Notices lock").clone()
    }
}

impl Notifier for Notices {
    fn error(&self, content: &str, _key: Option<&str>) {
        self.0
            .lock()
            .expect("Notices lock")
            .push(content.to_string());
    }

    fn info(&self, content: &str, key: Option<&str>, _on_close: Option<OnClose>) {
        self.error(content, key);
    }
}

#[derive(Default)]
struct Locations(Mutex<Vec<String>>);

impl Locations {
    fn visited(&self) -> Vec<String> {
        self.0.lock().expect("Locations lock").clone()
    }
}

impl Redirector for Locations {
    fn redirect(&self, location: &str) {
        self.0
            .lock()
            .expect("Locations lock")
            .push(location.to_string());
    }
}

struct Harness {
    api: AdminApi,
    tokens: Arc<MemoryTokenStore>,
    notices: Arc<Notices>,
    locations: Arc<Locations>,
}

fn harness(base_url: String, token: Option<&str>) -> Harness {
    let mut settings = Settings::default();
    settings.api.base_url = base_url;
    settings.session.router = RouterKind::Hash;

    let tokens = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let notices = Arc::new(Notices::default());
    let locations = Arc::new(Locations::default());

    let api = AdminApi::new(
        &settings,
        tokens.clone(),
        notices.clone(),
        locations.clone(),
    )
    .expect("Valid settings");

    Harness {
        api,
        tokens,
        notices,
        locations,
    }
}

#[tokio::test]
async fn test_requests_carry_stored_token() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/authority/menu/list")
        .match_header("Authorization", "tok-123")
        .with_status(200)
        .with_body(
            r#"{"code": 200, "data": [{"id": 1, "label": "Home", "path": "/", "children": []}]}"#,
        )
        .create_async()
        .await;

    let h = harness(server.url(), Some("tok-123"));
    let result = h.api.menu_list().await.expect("Menu list should load");

    let menus = result.data.expect("Menus present");
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].label, "Home");
    assert!(h.notices.messages().is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_redirects() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/user/info")
        .match_header("Authorization", "tok-123")
        .with_status(200)
        .with_body(r#"{"code": 401, "message": "token expired"}"#)
        .create_async()
        .await;

    let h = harness(server.url(), Some("tok-123"));
    let result = h
        .api
        .current_user()
        .await
        .expect("401 resolves instead of failing");

    assert_eq!(result.code, 401);
    assert_eq!(h.tokens.get(TOKEN_KEY), None);
    assert!(!h.api.is_logged_in());
    assert_eq!(h.locations.visited(), vec!["#/login".to_string()]);
    assert_eq!(
        h.notices.messages(),
        vec!["Login has expired, please log in again".to_string()]
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_business_error_keeps_token_and_notifies_once() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/authority/user/detail")
        .match_query(Matcher::UrlEncoded("id".into(), "42".into()))
        .with_status(200)
        .with_body(r#"{"code": 404, "message": "User does not exist"}"#)
        .create_async()
        .await;

    let h = harness(server.url(), Some("tok-123"));
    let result = h.api.user_detail(42).await.expect("Business error resolves");

    assert_eq!(result.code, 404);
    assert_eq!(result.data, None);
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("tok-123"));
    assert_eq!(h.notices.messages(), vec!["User does not exist".to_string()]);
    assert!(h.locations.visited().is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_transport_failure_notifies_generic_message() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/authority/menu/list")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let h = harness(server.url(), Some("tok-123"));
    let result = h.api.menu_list().await;

    assert!(matches!(result, Err(HttpError::Status { status: 500, .. })));
    assert_eq!(
        h.notices.messages(),
        vec!["Server error, please try again later".to_string()]
    );
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("tok-123"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_stores_token() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/user/login")
        .match_body(Matcher::Json(json!({"username": "admin", "password": "secret"})))
        .with_status(200)
        .with_body(
            r#"{"code": 200, "data": {"token": "tok-999", "user": {"id": 1, "username": "admin", "permissions": ["*"]}}}"#,
        )
        .create_async()
        .await;

    let h = harness(server.url(), None);
    assert!(!h.api.is_logged_in());

    let result = h.api.login("admin", "secret").await.expect("Login succeeds");

    let login = result.data.expect("Login payload");
    assert_eq!(login.user.permissions, vec!["*".to_string()]);
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("tok-999"));
    assert!(h.api.is_logged_in());

    h.api.logout();
    assert!(!h.api.is_logged_in());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_login_stores_nothing() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/user/login")
        .with_status(200)
        .with_body(r#"{"code": 400, "message": "Wrong password"}"#)
        .create_async()
        .await;

    let h = harness(server.url(), None);
    let result = h.api.login("admin", "nope").await.expect("Resolves");

    assert_eq!(result.code, 400);
    assert_eq!(h.tokens.get(TOKEN_KEY), None);
    assert_eq!(h.notices.messages(), vec!["Wrong password".to_string()]);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_user_page_duplicate_calls() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/authority/user/page")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("pageSize".into(), "20".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"code": 200, "data": {"items": [{"id": 1, "username": "admin"}], "total": 1}}"#,
        )
        .expect_at_least(1)
        .expect_at_most(2)
        .create_async()
        .await;

    let h = harness(server.url(), Some("tok-123"));
    let query = PageQuery::new(1, 20);

    let (first, second) = tokio::join!(h.api.user_page(&query), h.api.user_page(&query));

    assert_eq!(
        first.expect_err("Older call aborted").cancel_reason(),
        Some(CancelReason::Duplicate)
    );
    let page = second
        .expect("Newest call proceeds")
        .data
        .expect("Page present");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].username, "admin");
    assert!(page.items[0].enabled);

    // Cancellations are not reported to the user
    assert!(h.notices.messages().is_empty());
    assert_eq!(h.api.client().in_flight(), 0);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_user_mutations() {
    let mut server = mockito::Server::new_async().await;

    let create = server
        .mock("POST", "/authority/user")
        .match_body(Matcher::Json(json!({
            "username": "ops",
            "password": "pw",
            "roles": ["operator"],
            "enabled": true
        })))
        .with_status(200)
        .with_body(r#"{"code": 200, "data": 7}"#)
        .create_async()
        .await;

    let update = server
        .mock("PUT", "/authority/user")
        .match_body(Matcher::Json(json!({
            "id": 7,
            "username": "ops",
            "nickname": "Operator",
            "roles": ["operator"],
            "enabled": false
        })))
        .with_status(200)
        .with_body(r#"{"code": 200}"#)
        .create_async()
        .await;

    let delete = server
        .mock("DELETE", "/authority/user")
        .match_query(Matcher::UrlEncoded("id".into(), "7".into()))
        .with_status(200)
        .with_body(r#"{"code": 200}"#)
        .create_async()
        .await;

    let h = harness(server.url(), Some("tok-123"));

    let form = UserForm {
        username: "ops".to_string(),
        password: Some("pw".to_string()),
        roles: vec!["operator".to_string()],
        enabled: true,
        ..Default::default()
    };
    let created = h.api.create_user(&form).await.expect("Create succeeds");
    assert_eq!(created.data, Some(7));

    let form = UserForm {
        username: "ops".to_string(),
        nickname: Some("Operator".to_string()),
        roles: vec!["operator".to_string()],
        enabled: false,
        ..Default::default()
    };
    let updated = h.api.update_user(7, &form).await.expect("Update succeeds");
    assert!(updated.is_success());

    let deleted = h.api.delete_user(7).await.expect("Delete succeeds");
    assert!(deleted.is_success());

    create.assert_async().await;
    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_menu_mutations_and_page() {
    let mut server = mockito::Server::new_async().await;

    let page = server
        .mock("GET", "/authority/menu/page")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("pageSize".into(), "10".into()),
            Matcher::UrlEncoded("label".into(), "Sys".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"code": 200, "data": {"items": [], "total": 11}}"#)
        .create_async()
        .await;

    let create = server
        .mock("POST", "/authority/menu")
        .match_body(Matcher::Json(json!({
            "parentId": 1,
            "label": "Menus",
            "path": "/system/menu",
            "sort": 2,
            "enabled": true
        })))
        .with_status(200)
        .with_body(r#"{"code": 200, "data": 5}"#)
        .create_async()
        .await;

    let delete = server
        .mock("DELETE", "/authority/menu")
        .match_query(Matcher::UrlEncoded("id".into(), "5".into()))
        .with_status(200)
        .with_body(r#"{"code": 200}"#)
        .create_async()
        .await;

    let h = harness(server.url(), Some("tok-123"));

    let result = h
        .api
        .menu_page(&PageQuery::new(2, 10).filter("label", "Sys"))
        .await
        .expect("Menu page loads");
    assert_eq!(result.data.map(|p| p.total), Some(11));

    let form = MenuForm {
        parent_id: Some(1),
        label: "Menus".to_string(),
        path: "/system/menu".to_string(),
        sort: 2,
        enabled: true,
        ..Default::default()
    };
    let created = h.api.create_menu(&form).await.expect("Create succeeds");
    assert_eq!(created.data, Some(5));

    let deleted = h.api.delete_menu(5).await.expect("Delete succeeds");
    assert!(deleted.is_success());

    page.assert_async().await;
    create.assert_async().await;
    delete.assert_async().await;
}
