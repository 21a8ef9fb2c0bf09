// gate-server/src/middleware/session_auth.rs
use actix::Addr;
use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    Error, HttpMessage,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use crate::client_registry::{ClientRegistryActor, GetClientsList};
use crate::error::GateError;
use crate::session::{find_session, SessionWindow, PID_COOKIE, TOKEN_COOKIE};

/// Cookie session gate.
///
/// Resolves the `abc`/`cba` cookie pair against the registry, stores the
/// matching `Client` in request extensions for `AuthenticatedClient`, and
/// re-issues both cookies with a fresh expiration on every pass. Every
/// failure yields the same `401 unknown user`.
#[derive(Clone)]
pub struct SessionAuth {
    registry: Addr<ClientRegistryActor>,
    window: SessionWindow,
}

impl SessionAuth {
    pub fn new(registry: Addr<ClientRegistryActor>, window: SessionWindow) -> Self {
        Self { registry, window }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SessionAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            registry: self.registry.clone(),
            window: self.window,
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    registry: Addr<ClientRegistryActor>,
    window: SessionWindow,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
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
        let service = Rc::clone(&self.service);
        let registry = self.registry.clone();
        let window = self.window;

        Box::pin(async move {
            let (pid, token) = match (req.cookie(PID_COOKIE), req.cookie(TOKEN_COOKIE)) {
                (Some(pid), Some(token)) => (pid.value().to_string(), token.value().to_string()),
                _ => return Ok(reject(req, GateError::UnknownUser)),
            };

            let candidates = match registry.send(GetClientsList { pid: pid.clone() }).await {
                Ok(list) => list,
                Err(e) => return Ok(reject(req, GateError::Registry(e))),
            };

            let client = match find_session(&candidates, &token) {
                Some(client) => client.clone(),
                None => {
                    tracing::debug!("Session rejected for client: {}", pid);
                    return Ok(reject(req, GateError::UnknownUser));
                }
            };

            req.extensions_mut().insert(client);
            let mut res = service.call(req).await?;

            // Sliding renewal
            for cookie in window.cookies(&pid, &token) {
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    tracing::warn!("Failed to renew session cookie {}: {}", cookie.name(), e);
                }
            }

            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, err: GateError) -> ServiceResponse<EitherBody<B>> {
    req.error_response(err).map_into_right_body()
}
