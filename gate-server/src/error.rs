// gate-server/src/error.rs
use actix::MailboxError;
use actix_web::{http::{header, StatusCode}, HttpResponse, ResponseError};
use thiserror::Error;

/// Failures a gate or endpoint answers a request with
#[derive(Debug, Error)]
pub enum GateError {
    // Same body for a missing cookie, unknown pid or wrong token
    #[error("unknown user")]
    UnknownUser,

    #[error("auth req")]
    AdminAuthRequired,

    #[error("launch from the client application, please")]
    LoginRejected,

    #[error("could not open websocket connection")]
    UpgradeFailed,

    #[error("client registry unavailable: {0}")]
    Registry(#[from] MailboxError),
}

impl ResponseError for GateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GateError::UnknownUser
            | GateError::AdminAuthRequired
            | GateError::LoginRejected => StatusCode::UNAUTHORIZED,
            GateError::UpgradeFailed => StatusCode::BAD_REQUEST,
            GateError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        response.insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"));

        match self {
            GateError::AdminAuthRequired => {
                response
                    .insert_header((header::WWW_AUTHENTICATE, "Basic"))
                    .body(self.to_string())
            },
            GateError::Registry(e) => {
                tracing::error!("Client registry error: {}", e);
                response.body("internal server error")
            },
            _ => response.body(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GateError::UnknownUser.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(GateError::UpgradeFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GateError::Registry(MailboxError::Closed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_admin_challenge_header() {
        let response = GateError::AdminAuthRequired.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic"
        );
    }
}
