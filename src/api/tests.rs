use super::*;
use crate::error::TransportError;
use crate::request::{MockHttpClient, ReqwestHttpClient};
use crate::route::{AppRoute, RouteDecision, guard};
use crate::session::SessionChange;
use chrono::NaiveDate;
use dinawin_shared::protocol::{AdmissionQuery, Credentials, ProductRequestQuery, ReceptionQuery};
use dinawin_shared::{
    Admission, HttpMethod, ProductRequestStatus, ReportRange, UserProfile, ValidationError,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

// =========================================================
// Shared fixtures
// =========================================================

fn client() -> ApiClient<MockHttpClient> {
    ApiClient::new(
        ClientConfig::default(),
        MockHttpClient::new(),
        SessionController::new(),
    )
}

fn staff() -> UserProfile {
    UserProfile {
        id: 1,
        username: "admin".to_string(),
        full_name: "Shop Admin".to_string(),
        is_dinawin_employee: true,
        roles: vec![],
    }
}

fn customer() -> UserProfile {
    UserProfile {
        id: 2,
        username: "client".to_string(),
        full_name: String::new(),
        is_dinawin_employee: false,
        roles: vec![],
    }
}

fn signed_in(user: UserProfile) -> ApiClient<MockHttpClient> {
    let api = client();
    api.session().login("tok-123".to_string(), user);
    api
}

fn empty_page() -> serde_json::Value {
    json!({ "items": [], "totalCount": 0, "page": 1, "size": 10 })
}

fn admission_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "plateNumber": "12A345-67",
        "vehicleModel": "Samand",
        "customerName": "Ali Rezaei",
        "customerMobile": "09121111111",
        "admittedAt": "2024-03-01T09:30:00",
        "isDischarged": false,
        "description": null
    })
}

fn credentials() -> Credentials {
    Credentials {
        username: "admin".to_string(),
        password: "pa55".to_string(),
    }
}

// =========================================================
// Configuration
// =========================================================

#[test]
fn config_joins_paths_with_one_slash() {
    let config = ClientConfig::new("https://shop.example/proxy/");
    assert_eq!(config.base_url, "https://shop.example/proxy");
    assert_eq!(config.url("/api/x"), "https://shop.example/proxy/api/x");
    assert_eq!(config.url("api/x"), "https://shop.example/proxy/api/x");
}

#[test]
fn config_from_option_falls_back_to_default() {
    assert_eq!(ClientConfig::from_option(None), ClientConfig::default());
    assert_eq!(ClientConfig::from_option(Some("  ")), ClientConfig::default());
    assert_eq!(
        ClientConfig::from_option(Some("https://api.dinawin.ir")).base_url,
        "https://api.dinawin.ir"
    );
}

// =========================================================
// Request building
// =========================================================

#[tokio::test]
async fn list_fetch_serializes_query_and_attaches_bearer() {
    let api = signed_in(staff());
    let url = "/proxy/api/admissions?page=1&size=10";
    api.transport()
        .mock_response(HttpMethod::Get, url, 200, empty_page());

    let page = api.admissions(&AdmissionQuery::default()).await.unwrap();
    assert!(page.items.is_empty());

    let sent = api.transport().last_request().unwrap();
    assert_eq!(sent.url, url);
    assert_eq!(sent.method, HttpMethod::Get);
    assert_eq!(sent.header("Authorization"), Some("Bearer tok-123"));
    assert_eq!(sent.header("Accept"), Some("application/json"));
    assert_eq!(sent.header("Content-Type"), None);
    assert_eq!(sent.body, None);
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let api = client();
    let url = "/proxy/api/admissions?page=1&size=10";
    api.transport()
        .mock_response(HttpMethod::Get, url, 200, empty_page());

    api.admissions(&AdmissionQuery::default()).await.unwrap();

    let sent = api.transport().last_request().unwrap();
    assert_eq!(sent.header("Authorization"), None);
}

#[tokio::test]
async fn customers_are_routed_to_customer_paths() {
    let api = signed_in(customer());
    let url = "/proxy/api/customer/receptions?page=1&size=10&admissionId=5";
    api.transport()
        .mock_response(HttpMethod::Get, url, 200, empty_page());

    let query = ReceptionQuery {
        admission_id: Some(5),
        ..ReceptionQuery::default()
    };
    api.receptions(&query).await.unwrap();
    assert_eq!(api.transport().last_request().unwrap().url, url);

    // Product requests have no customer variant.
    let url = "/proxy/api/product-requests?page=1&size=10";
    api.transport()
        .mock_response(HttpMethod::Get, url, 200, empty_page());
    api.product_requests(&ProductRequestQuery::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_identifies_record_by_query() {
    let api = signed_in(staff());
    let url = "/proxy/api/admissions?id=42";
    api.transport().mock_raw(HttpMethod::Delete, url, 204, "");

    api.delete_admission(42).await.unwrap();

    let sent = api.transport().last_request().unwrap();
    assert_eq!(sent.method, HttpMethod::Delete);
    assert_eq!(sent.body, None);
    assert_eq!(sent.header("Content-Type"), None);
}

#[tokio::test]
async fn full_update_puts_the_whole_record() {
    let api = signed_in(staff());
    let url = "/proxy/api/admissions";
    api.transport()
        .mock_response(HttpMethod::Put, url, 200, admission_json(8));

    let admission: Admission = serde_json::from_value(admission_json(8)).unwrap();
    let updated = api.update_admission(admission).await.unwrap();
    assert_eq!(updated.id, 8);

    let sent = api.transport().last_request().unwrap();
    assert_eq!(sent.header("Content-Type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["plateNumber"], "12A345-67");
    assert_eq!(body["id"], 8);
}

#[tokio::test]
async fn status_change_is_sent_as_json_patch() {
    let api = signed_in(staff());
    let url = "/proxy/api/product-requests?id=3";
    api.transport().mock_response(
        HttpMethod::Patch,
        url,
        200,
        json!({
            "id": 3,
            "receptionId": 1,
            "productName": "oil filter",
            "quantity": 2,
            "status": "Rejected",
            "note": null
        }),
    );

    let result = api
        .set_product_request_status(3, ProductRequestStatus::Rejected, None)
        .await
        .unwrap();
    assert_eq!(result.status, ProductRequestStatus::Rejected);

    let sent = api.transport().last_request().unwrap();
    assert_eq!(
        sent.header("Content-Type"),
        Some("application/json-patch+json")
    );
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!([{ "op": "replace", "path": "/status", "value": "Rejected" }])
    );
}

#[tokio::test]
async fn invalid_payload_never_reaches_the_network() {
    let api = signed_in(staff());

    let err = api
        .reception_report(ReportRange {
            from: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidRequest(ValidationError::InvalidRange)
    ));

    let err = api.delete_reception(0).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));

    assert_eq!(api.transport().request_count(), 0);
}

// =========================================================
// Response handling
// =========================================================

#[tokio::test]
async fn empty_success_body_decodes_as_unit() {
    let api = signed_in(staff());
    api.transport()
        .mock_raw(HttpMethod::Put, "/proxy/api/admissions/discharge?id=4", 204, "");
    api.discharge_admission(4).await.unwrap();
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let api = signed_in(staff());
    api.transport()
        .mock_raw(HttpMethod::Get, "/proxy/api/reports/dashboard", 200, "<html>");

    let err = api.dashboard_summary().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { ref body, .. } if body == "<html>"));
}

#[tokio::test]
async fn server_error_rejects_and_keeps_session() {
    let api = signed_in(staff());
    api.transport().mock_response(
        HttpMethod::Get,
        "/proxy/api/admissions?page=1&size=10",
        500,
        json!({ "message": "database unavailable" }),
    );

    let err = api.admissions(&AdmissionQuery::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.server_message().as_deref(), Some("database unavailable"));
    assert!(api.session().is_authenticated());
    assert_eq!(api.transport().request_count(), 1);
}

#[tokio::test]
async fn transport_failure_propagates() {
    let api = signed_in(staff());
    api.transport().mock_failure(
        HttpMethod::Get,
        "/proxy/api/reports/dashboard",
        TransportError::Network("offline".to_string()),
    );

    let err = api.dashboard_summary().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Network(_))));
    assert!(api.session().is_authenticated());
}

#[tokio::test]
async fn unauthorized_response_expires_session() {
    let api = signed_in(staff());
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    api.session()
        .subscribe(move |change, _| sink.lock().unwrap().push(change));

    api.transport()
        .mock_raw(HttpMethod::Get, "/proxy/api/reports/dashboard", 401, "");

    let err = api.dashboard_summary().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!api.session().is_authenticated());
    assert_eq!(*changes.lock().unwrap(), vec![SessionChange::Expired]);
    assert_eq!(
        guard(AppRoute::Dashboard, api.session().is_authenticated()),
        RouteDecision::Redirect(AppRoute::Login)
    );
}

/// Signs the user out and back in while the request is in flight, then
/// rejects the request that still carried the old token.
struct ReloginDuringFlight {
    session: SessionController,
    seen_tokens: Mutex<Vec<Option<String>>>,
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ReloginDuringFlight {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(req.header("Authorization").map(str::to_string));
        self.session.logout();
        self.session.login("fresh-token".to_string(), staff());
        Ok(HttpResponse {
            status: 401,
            body: String::new(),
        })
    }
}

#[tokio::test]
async fn late_unauthorized_leaves_newer_login_alone() {
    let session = SessionController::new();
    session.login("old-token".to_string(), staff());
    let transport = ReloginDuringFlight {
        session: session.clone(),
        seen_tokens: Mutex::new(Vec::new()),
    };
    let api = ApiClient::new(ClientConfig::default(), transport, session.clone());

    let err = api.dashboard_summary().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(
        *api.transport().seen_tokens.lock().unwrap(),
        vec![Some("Bearer old-token".to_string())]
    );
    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some("fresh-token"));
}

// =========================================================
// Account & session gate
// =========================================================

#[tokio::test]
async fn login_authenticates_and_opens_protected_routes() {
    let api = client();
    api.transport().mock_response(
        HttpMethod::Post,
        "/proxy/api/account/login",
        200,
        json!({
            "token": "fresh",
            "user": { "id": 1, "username": "admin", "isDinawinEmployee": true }
        }),
    );

    assert!(guard(AppRoute::Admissions, api.session().is_authenticated()).is_redirect());

    let user = api.login(&credentials()).await.unwrap();
    assert_eq!(user.username, "admin");
    assert!(api.session().is_authenticated());
    assert_eq!(api.session().token().as_deref(), Some("fresh"));

    let sent = api.transport().last_request().unwrap();
    assert_eq!(sent.header("Authorization"), None);
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "username": "admin", "password": "pa55" }));

    assert_eq!(
        guard(AppRoute::Admissions, api.session().is_authenticated()),
        RouteDecision::Allow(AppRoute::Admissions)
    );
}

#[tokio::test]
async fn rejected_login_leaves_session_alone() {
    let api = client();
    api.transport().mock_response(
        HttpMethod::Post,
        "/proxy/api/account/login",
        401,
        json!({ "message": "wrong password" }),
    );

    let err = api.login(&credentials()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message().as_deref(), Some("wrong password"));
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn blank_credentials_are_rejected_locally() {
    let api = client();
    let err = api
        .login(&Credentials {
            username: "admin".to_string(),
            password: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidRequest(ValidationError::Empty { field: "password" })
    ));
    assert_eq!(api.transport().request_count(), 0);
}

#[tokio::test]
async fn login_without_token_is_refused() {
    let api = client();
    api.transport().mock_response(
        HttpMethod::Post,
        "/proxy/api/account/login",
        200,
        json!({ "token": "", "user": { "id": 1, "username": "admin" } }),
    );

    let err = api.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn refreshed_token_is_used_for_next_request() {
    let api = signed_in(staff());
    api.transport().mock_response(
        HttpMethod::Post,
        "/proxy/api/account/refresh",
        200,
        json!({ "token": "tok-456" }),
    );
    api.transport().mock_response(
        HttpMethod::Get,
        "/proxy/api/reports/dashboard",
        200,
        json!({
            "openAdmissions": 4,
            "dischargedToday": 1,
            "openReceptions": 3,
            "pendingProductRequests": 2
        }),
    );

    api.refresh_token().await.unwrap();
    let summary = api.dashboard_summary().await.unwrap();
    assert_eq!(summary.open_admissions, 4);

    let sent = api.transport().last_request().unwrap();
    assert_eq!(sent.header("Authorization"), Some("Bearer tok-456"));
}

#[tokio::test]
async fn current_user_updates_session_profile() {
    let api = signed_in(staff());
    api.transport().mock_response(
        HttpMethod::Get,
        "/proxy/api/account/me",
        200,
        json!({ "id": 1, "username": "admin", "fullName": "Mina", "isDinawinEmployee": false }),
    );

    let user = api.current_user().await.unwrap();
    assert_eq!(user.display_name(), "Mina");
    assert_eq!(api.session().user(), Some(user));
    assert_eq!(api.session().token().as_deref(), Some("tok-123"));
}

#[test]
fn logout_clears_session() {
    let api = signed_in(staff());
    assert!(api.logout());
    assert!(!api.session().is_authenticated());
    assert_eq!(
        guard(AppRoute::Reports, false),
        RouteDecision::Redirect(AppRoute::Login)
    );
}

// =========================================================
// Wire level
// =========================================================

#[tokio::test]
async fn bearer_header_reaches_the_wire() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        let body = r#"{"openAdmissions":1,"dischargedToday":0,"openReceptions":0,"pendingProductRequests":0}"#;
        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&head).to_lowercase()
    });

    let session = SessionController::new();
    session.login("wire-token".to_string(), staff());
    let api = ApiClient::new(
        ClientConfig::new(format!("http://{}/proxy", addr)),
        ReqwestHttpClient::new(),
        session,
    );

    let summary = api.dashboard_summary().await.unwrap();
    assert_eq!(summary.open_admissions, 1);

    let head = server.await.unwrap();
    assert!(head.starts_with("get /proxy/api/reports/dashboard http/1.1"));
    assert!(head.contains("authorization: bearer wire-token"));
}
