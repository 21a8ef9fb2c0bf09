// gate-server/src/api/auth.rs
use actix::Addr;
use actix_web::{http::header::{self, HeaderValue}, web, HttpRequest, HttpResponse};
use common::models::client::Client;
use serde::Deserialize;
use crate::client_registry::{ClientRegistryActor, GetClientsList, GetProfile, StoreClient};
use crate::error::GateError;
use crate::session::{find_session, SessionWindow};

/// Login fields; any of them may be absent
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub abc: Option<String>,
    pub cba: Option<String>,
    pub destination: Option<String>,
}

impl LoginForm {
    /// Fields from `self` win, missing ones are taken from `fallback`
    pub fn or(self, fallback: LoginForm) -> LoginForm {
        LoginForm {
            abc: self.abc.or(fallback.abc),
            cba: self.cba.or(fallback.cba),
            destination: self.destination.or(fallback.destination),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginSettings {
    /// Provision unknown identifiers on first contact
    pub auto_register: bool,
    pub default_profile: String,
}

/// `GET`/`POST /v2/api/auth`. Fields come from the query string, overridden
/// by an urlencoded body when there is one. Anything unparsable counts as
/// absent and ends in the login 401.
pub async fn login_request(
    req: HttpRequest,
    body: Option<web::Form<LoginForm>>,
    registry: web::Data<Addr<ClientRegistryActor>>,
    window: web::Data<SessionWindow>,
    settings: web::Data<LoginSettings>,
) -> Result<HttpResponse, GateError> {
    let query = web::Query::<LoginForm>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let form = match body {
        Some(body) => body.into_inner().or(query),
        None => query,
    };

    login(form, &registry, **window, &settings).await
}

/// Check `abc`/`cba` against the registry, set both session cookies and
/// redirect to `destination`.
async fn login(
    form: LoginForm,
    registry: &Addr<ClientRegistryActor>,
    window: SessionWindow,
    settings: &LoginSettings,
) -> Result<HttpResponse, GateError> {
    let pid = form.abc.unwrap_or_default();
    let token = form.cba.unwrap_or_default();

    tracing::info!("trying to auth app {}", pid);

    if pid.is_empty() || token.is_empty() {
        return Err(GateError::LoginRejected);
    }

    let mut candidates = registry.send(GetClientsList { pid: pid.clone() }).await?;

    // Provisional first-contact registration
    if candidates.is_empty() && settings.auto_register {
        let profile = registry
            .send(GetProfile { email: settings.default_profile.clone() })
            .await?;
        registry
            .send(StoreClient { client: Client::provisioned(&pid, &token, &profile.email) })
            .await?;
        tracing::info!("Provisioned client {} with profile {}", pid, profile.email);

        candidates = registry.send(GetClientsList { pid: pid.clone() }).await?;
    }

    if find_session(&candidates, &token).is_none() {
        tracing::info!("Login rejected for client: {}", pid);
        return Err(GateError::LoginRejected);
    }

    let location = redirect_target(form.destination.as_deref().unwrap_or_default());
    let [pid_cookie, token_cookie] = window.cookies(&pid, &token);

    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, location))
        .cookie(pid_cookie)
        .cookie(token_cookie)
        .finish())
}

/// `Location` for a login redirect; empty or unencodable destinations go to `/`
fn redirect_target(destination: &str) -> HeaderValue {
    if destination.is_empty() {
        return HeaderValue::from_static("/");
    }
    HeaderValue::from_str(destination).unwrap_or_else(|_| {
        tracing::warn!("Unusable login destination {:?}, redirecting to /", destination);
        HeaderValue::from_static("/")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_fields_override_query() {
        let query = LoginForm {
            abc: Some("alice".into()),
            cba: Some("from-query".into()),
            destination: Some("/q".into()),
        };
        let body = LoginForm {
            cba: Some("from-body".into()),
            ..LoginForm::default()
        };

        let merged = body.or(query);
        assert_eq!(merged.abc.as_deref(), Some("alice"));
        assert_eq!(merged.cba.as_deref(), Some("from-body"));
        assert_eq!(merged.destination.as_deref(), Some("/q"));
    }

    #[test]
    fn test_redirect_target() {
        assert_eq!(redirect_target(""), "/");
        assert_eq!(redirect_target("/profile/my"), "/profile/my");
        assert_eq!(redirect_target("/a\nb"), "/");
    }
}
