//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the edge endpoints and Leptos SSR rendering under one Axum router.
//! The edge gate wraps everything, so a protected page is never rendered for
//! a request without a session marker. Static assets are public by path.

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use wheelhouse_session::interceptor::RouteInterceptor;

use crate::config::ServerConfig;
use crate::edge;

/// Edge endpoints that do not render pages.
pub(crate) fn edge_routes(interceptor: RouteInterceptor) -> Router {
    Router::new()
        .route("/auth/logout", get(edge::logout))
        .route("/healthz", get(healthz))
        .with_state(interceptor)
}

/// Edge endpoints + Leptos SSR + `/pkg` assets, behind the edge gate.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section).
pub fn app(config: ServerConfig) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());
    let interceptor = RouteInterceptor::new(config.session);

    let routes = edge_routes(interceptor.clone())
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")));

    Ok(with_edge_gate(routes, interceptor)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

/// Wrap `router` so every request passes the edge gate first.
pub(crate) fn with_edge_gate(router: Router, interceptor: RouteInterceptor) -> Router {
    router.layer(middleware::from_fn_with_state(interceptor, edge::gate))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
