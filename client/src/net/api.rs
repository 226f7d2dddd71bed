//! HTTP implementation of the identity-server contract.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every call fails with `IdentityError::Unavailable`
//! since these endpoints are only meaningful in the browser.
//!
//! ENDPOINTS
//! =========
//! - `POST /api/auth/login`     `{ email, password }`
//! - `POST /api/auth/register`  registration fields
//! - `GET  /api/auth/me`        bearer credential or cookie session
//! - `POST /api/auth/logout`
//!
//! Every request is sent with `credentials: include` so the identity
//! server's own session cookie rides along. Response bodies are normalized
//! with `AuthPayload::from_response` / `normalize_principal`, so callers
//! never see the server's raw shapes.
//!
//! ERROR HANDLING
//! ==============
//! `401`, `403` and `404` on `/api/auth/me` mean "no principal" and return
//! `Ok(None)`. Other non-2xx statuses surface as `IdentityError::Status`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use wheelhouse_session::IdentityError;
use wheelhouse_session::identity::{IdentityService, RegisterFields};
use wheelhouse_session::principal::{AuthPayload, Credential, Principal};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const ME_PATH: &str = "/api/auth/me";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Join the API base and an endpoint path. An empty base means same origin.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

/// `Authorization` header value for a credential.
pub fn bearer(credential: &Credential) -> String {
    format!("Bearer {}", credential.as_str())
}

/// How to treat a `/api/auth/me` response status: `Ok(true)` read the body,
/// `Ok(false)` no principal.
pub fn me_status(status: u16) -> Result<bool, IdentityError> {
    match status {
        200..=299 => Ok(true),
        401 | 403 | 404 => Ok(false),
        _ => Err(IdentityError::Status { status }),
    }
}

/// Identity server reached over HTTP.
#[derive(Clone, Debug, Default)]
pub struct HttpIdentityService {
    base: String,
}

impl HttpIdentityService {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Base URL baked in at build time via `WHEELHOUSE_API_URL`; same origin
    /// when unset.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("WHEELHOUSE_API_URL").unwrap_or_default())
    }

    pub fn url(&self, path: &str) -> String {
        endpoint(&self.base, path)
    }
}

#[cfg(feature = "hydrate")]
mod transport {
    use gloo_net::http::{Request, RequestBuilder, Response};
    use serde_json::Value;
    use web_sys::RequestCredentials;
    use wheelhouse_session::IdentityError;

    pub fn get(url: &str) -> RequestBuilder {
        Request::get(url).credentials(RequestCredentials::Include)
    }

    pub fn post(url: &str) -> RequestBuilder {
        Request::post(url).credentials(RequestCredentials::Include)
    }

    pub fn network(e: &gloo_net::Error) -> IdentityError {
        IdentityError::Network(e.to_string())
    }

    pub async fn json_body(resp: Response) -> Result<Value, IdentityError> {
        resp.json::<Value>().await.map_err(|e| IdentityError::Decode(e.to_string()))
    }

    pub async fn send_json(builder: RequestBuilder, body: &impl serde::Serialize) -> Result<Value, IdentityError> {
        let resp = builder
            .json(body)
            .map_err(|e| network(&e))?
            .send()
            .await
            .map_err(|e| network(&e))?;
        if !resp.ok() {
            return Err(IdentityError::Status { status: resp.status() });
        }
        json_body(resp).await
    }
}

#[async_trait(?Send)]
impl IdentityService for HttpIdentityService {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let body = serde_json::json!({ "email": email, "password": password });
            let value = transport::send_json(transport::post(&self.url(LOGIN_PATH)), &body).await?;
            Ok(AuthPayload::from_response(&value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(unavailable())
        }
    }

    async fn register(&self, fields: &RegisterFields) -> Result<AuthPayload, IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let value = transport::send_json(transport::post(&self.url(REGISTER_PATH)), fields).await?;
            Ok(AuthPayload::from_response(&value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = fields;
            Err(unavailable())
        }
    }

    async fn resolve_from_credential(&self, credential: &Credential) -> Result<Option<Principal>, IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = transport::get(&self.url(ME_PATH))
                .header("Authorization", &bearer(credential))
                .send()
                .await
                .map_err(|e| transport::network(&e))?;
            if !me_status(resp.status())? {
                return Ok(None);
            }
            let value = transport::json_body(resp).await?;
            Ok(wheelhouse_session::principal::normalize_principal(&value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = credential;
            Err(unavailable())
        }
    }

    async fn current_session_from_cookie(&self) -> Result<Option<Principal>, IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = transport::get(&self.url(ME_PATH))
                .send()
                .await
                .map_err(|e| transport::network(&e))?;
            if !me_status(resp.status())? {
                return Ok(None);
            }
            let value = transport::json_body(resp).await?;
            Ok(wheelhouse_session::principal::normalize_principal(&value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(unavailable())
        }
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = transport::post(&self.url(LOGOUT_PATH))
                .send()
                .await
                .map_err(|e| transport::network(&e))?;
            if resp.ok() { Ok(()) } else { Err(IdentityError::Status { status: resp.status() }) }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(unavailable())
        }
    }
}

#[cfg(not(feature = "hydrate"))]
fn unavailable() -> IdentityError {
    IdentityError::Unavailable("identity server is only reachable from the browser".to_owned())
}
