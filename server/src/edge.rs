//! Edge gate and logout endpoint.
//!
//! SYSTEM CONTEXT
//! ==============
//! `gate` runs in front of every route. It reads the two edge cookies the
//! browser wrote (`auth_token` marker, `role` hint) and asks
//! [`RouteInterceptor`] whether the request may reach a protected page.
//! Role is never checked here; the page's render gate does that after
//! hydration.
//!
//! `/auth/logout` is the last hop of a client logout: it expires both edge
//! cookies with the same path and `SameSite` they were written with, then
//! sends the browser to the login page.

#[cfg(test)]
#[path = "edge_test.rs"]
mod edge_test;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use wheelhouse_session::SessionConfig;
use wheelhouse_session::interceptor::{Decision, EdgeRecords, RouteInterceptor};

/// Edge records carried by a request's cookies. Several `Cookie` headers
/// are read as one list.
pub fn records_from_headers(headers: &HeaderMap, config: &SessionConfig) -> EdgeRecords {
    let raw: Vec<&str> = headers.get_all(COOKIE).iter().filter_map(|v| v.to_str().ok()).collect();
    EdgeRecords::from_cookie_header(&raw.join("; "), config)
}

/// Middleware: redirect unauthenticated requests for protected pages.
pub async fn gate(State(interceptor): State<RouteInterceptor>, request: Request, next: Next) -> Response {
    let records = records_from_headers(request.headers(), interceptor.config());
    match interceptor.intercept(request.uri().path(), &records) {
        Decision::Allow => next.run(request).await,
        Decision::Redirect(target) => {
            tracing::info!(path = %request.uri().path(), "no session marker; redirecting to login");
            Redirect::temporary(&target).into_response()
        }
    }
}

/// An already-expired cookie that overwrites `name`.
pub fn expired_cookie(name: &str, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((name.to_owned(), ""))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(config.edge_secure)
        .max_age(Duration::ZERO)
        .build()
}

/// `GET /auth/logout`: expire both edge records, then go to the login page.
pub async fn logout(State(interceptor): State<RouteInterceptor>, jar: CookieJar) -> impl IntoResponse {
    let config = interceptor.config();
    let jar = jar
        .add(expired_cookie(&config.edge_marker_record, config))
        .add(expired_cookie(&config.edge_role_record, config));
    tracing::info!("edge records expired on logout");
    (jar, Redirect::to(&config.login_path))
}
