// gate-server/src/middleware/admin_auth.rs
use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap},
    Error,
};
use common::AdminConfig;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::fmt;
use crate::error::GateError;
use crate::utils::token::{generate_secure_token, secrets_match};

// Length of the password generated when none is configured
const GENERATED_PASS_LENGTH: usize = 24;

/// Static admin login/password pair
#[derive(Clone)]
pub struct AdminCredential {
    login: String,
    pass: String,
}

impl AdminCredential {
    pub fn new(login: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            pass: pass.into(),
        }
    }

    /// Build from config. An empty password is replaced by a random one,
    /// logged once so the operator can pick it up.
    pub fn from_config(config: &AdminConfig) -> Self {
        if config.pass.is_empty() {
            let pass = generate_secure_token(GENERATED_PASS_LENGTH);
            tracing::warn!(
                "No admin password configured; generated one for '{}': {}",
                config.login,
                pass
            );
            return Self::new(config.login.clone(), pass);
        }
        Self::new(config.login.clone(), config.pass.clone())
    }

    pub fn matches(&self, login: &str, pass: &str) -> bool {
        // Both halves are always compared
        secrets_match(login, &self.login) & secrets_match(pass, &self.pass)
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("login", &self.login)
            .field("pass", &"***")
            .finish()
    }
}

/// Extract `(login, pass)` from an `Authorization: Basic ...` header
pub fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = base64::decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (login, pass) = decoded.split_once(':')?;
    Some((login.to_string(), pass.to_string()))
}

/// HTTP basic-auth gate for the admin API. Credentials are checked on every
/// request; there is no admin session.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    credential: AdminCredential,
}

impl AdminAuth {
    pub fn new(credential: AdminCredential) -> Self {
        Self { credential }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdminAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service,
            credential: self.credential.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: S,
    credential: AdminCredential,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authorized = parse_basic_auth(req.headers())
            .map(|(login, pass)| self.credential.matches(&login, &pass))
            .unwrap_or(false);

        if authorized {
            let fut = self.service.call(req);
            return Box::pin(async move {
                fut.await.map(|res| res.map_into_left_body())
            });
        }

        let remote = req.connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        tracing::warn!("Admin authentication failed from {}", remote);

        let res = req.error_response(GateError::AdminAuthRequired).map_into_right_body();
        Box::pin(ready(Ok(res)))
    }
}
