// gate-server/src/session.rs
use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::Cookie;
use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use common::models::client::Client;
use futures_util::future::{ready, Ready};
use std::ops::Deref;
use crate::error::GateError;
use subtle::ConstantTimeEq;

// Cookie carrying the client identifier
pub const PID_COOKIE: &str = "abc";
// Cookie carrying the session token
pub const TOKEN_COOKIE: &str = "cba";

/// Sliding lifetime of the session cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    hours: i64,
}

impl SessionWindow {
    pub fn hours(hours: i64) -> Self {
        Self { hours }
    }

    pub fn expires_at(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc() + Duration::hours(self.hours)
    }

    /// Both session cookies, expiring one window from now
    pub fn cookies(&self, pid: &str, token: &str) -> [Cookie<'static>; 2] {
        let expires = self.expires_at();
        [
            session_cookie(PID_COOKIE, pid.to_string(), expires),
            session_cookie(TOKEN_COOKIE, token.to_string(), expires),
        ]
    }
}

fn session_cookie(name: &'static str, value: String, expires: OffsetDateTime) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .expires(expires)
        .finish()
}

/// First candidate whose stored token equals `token`
pub fn find_session<'a>(candidates: &'a [Client], token: &str) -> Option<&'a Client> {
    candidates
        .iter()
        .find(|c| bool::from(c.token.as_bytes().ct_eq(token.as_bytes())))
}

/// The client resolved by `SessionAuth`. Only available behind that middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient(pub Client);

impl AuthenticatedClient {
    pub fn into_inner(self) -> Client {
        self.0
    }
}

impl Deref for AuthenticatedClient {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.0
    }
}

impl FromRequest for AuthenticatedClient {
    type Error = GateError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let client = req.extensions().get::<Client>().cloned();
        ready(client.map(AuthenticatedClient).ok_or(GateError::UnknownUser))
    }
}
