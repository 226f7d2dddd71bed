use axum::Router;
use axum::body::Body;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderValue, StatusCode};
use tower::ServiceExt;

use super::*;
use crate::routes::{edge_routes, with_edge_gate};

fn headers_with_cookie(raw: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static(raw));
    headers
}

// =============================================================================
// records_from_headers
// =============================================================================

#[test]
fn records_read_both_edge_cookies() {
    let headers = headers_with_cookie("theme=dark; auth_token=1; role=renter");
    let records = records_from_headers(&headers, &SessionConfig::default());
    assert_eq!(records.marker.as_deref(), Some("1"));
    assert_eq!(records.role.as_deref(), Some("renter"));
}

#[test]
fn records_span_multiple_cookie_headers() {
    let mut headers = HeaderMap::new();
    headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
    headers.append(COOKIE, HeaderValue::from_static("auth_token=1; role=admin"));
    let records = records_from_headers(&headers, &SessionConfig::default());
    assert_eq!(records.marker.as_deref(), Some("1"));
    assert_eq!(records.role.as_deref(), Some("admin"));
}

#[test]
fn missing_cookies_fail_the_gate() {
    let interceptor = RouteInterceptor::new(SessionConfig::default());
    let records = records_from_headers(&HeaderMap::new(), interceptor.config());
    assert_eq!(
        interceptor.intercept("/dashboard/admin", &records),
        Decision::Redirect("/login?returnTo=%2Fdashboard%2Fadmin".to_owned())
    );
}

#[test]
fn marker_cookie_passes_the_gate() {
    let interceptor = RouteInterceptor::new(SessionConfig::default());
    let records = records_from_headers(&headers_with_cookie("auth_token=1"), interceptor.config());
    assert_eq!(interceptor.intercept("/dashboard/admin", &records), Decision::Allow);
}

// =============================================================================
// gate middleware
// =============================================================================

fn gated_app() -> Router {
    let interceptor = RouteInterceptor::new(SessionConfig::default());
    let pages = Router::new().fallback(|| async { "page" });
    with_edge_gate(edge_routes(interceptor.clone()).merge(pages), interceptor)
}

async fn send(uri: &str, cookie: Option<&'static str>) -> Response {
    let mut builder = axum::http::Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    gated_app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

fn location(response: &Response) -> Option<&str> {
    response.headers().get(LOCATION).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn gate_redirects_protected_page_without_cookies() {
    let response = send("/dashboard/admin", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/login?returnTo=%2Fdashboard%2Fadmin"));
}

#[tokio::test]
async fn gate_passes_static_assets_without_cookies() {
    let response = send("/pkg/x.wasm", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), None);
}

#[tokio::test]
async fn gate_passes_protected_page_with_marker() {
    let response = send("/dashboard/renter", Some("auth_token=1; role=renter")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn gate_leaves_edge_endpoints_open() {
    assert_eq!(send("/healthz", None).await.status(), StatusCode::OK);
    assert_eq!(send("/auth/logout", None).await.status(), StatusCode::SEE_OTHER);
}

// =============================================================================
// logout
// =============================================================================

#[test]
fn expired_cookie_has_zero_max_age_and_root_path() {
    let cookie = expired_cookie("role", &SessionConfig::default().with_secure(true));
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.secure(), Some(true));
}

#[tokio::test]
async fn logout_expires_both_records_and_redirects_to_login() {
    let interceptor = RouteInterceptor::new(SessionConfig::default());
    let response = logout(State(interceptor), CookieJar::new()).await.into_response();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).and_then(|v| v.to_str().ok()), Some("/login"));

    let set_cookies: Vec<String> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_owned))
        .collect();
    assert_eq!(set_cookies.len(), 2);
    assert!(set_cookies.iter().any(|c| c.starts_with("auth_token=;") && c.contains("Max-Age=0")));
    assert!(set_cookies.iter().any(|c| c.starts_with("role=;") && c.contains("Max-Age=0")));
}
