// gate-server/src/listener.rs
use actix_web::{App, HttpServer};
use common::HttpsConfig;
use rustls::pki_types::pem::{self, PemObject};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use std::sync::Arc;
use thiserror::Error;
use crate::{api, GateState};

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to read PEM file {path}: {source}")]
    Pem {
        path: String,
        #[source]
        source: pem::Error,
    },

    #[error("no certificates found in {0}")]
    NoCertificates(String),

    #[error("invalid TLS configuration: {0}")]
    Tls(#[from] rustls::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn pem_error(path: &str) -> impl Fn(pem::Error) -> ListenerError + '_ {
    move |source| ListenerError::Pem {
        path: path.to_string(),
        source,
    }
}

/// Build a rustls server config from a PEM certificate chain and key
pub fn load_rustls_config(cert_path: &str, key_path: &str) -> Result<ServerConfig, ListenerError> {
    let certs = CertificateDer::pem_file_iter(cert_path)
        .map_err(pem_error(cert_path))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(pem_error(cert_path))?;
    if certs.is_empty() {
        return Err(ListenerError::NoCertificates(cert_path.to_string()));
    }

    let key = PrivateKeyDer::from_pem_file(key_path).map_err(pem_error(key_path))?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    Ok(config)
}

async fn run(state: GateState, addr: &str, tls: Option<ServerConfig>) -> Result<(), ListenerError> {
    let server = HttpServer::new(move || {
        App::new().configure(|cfg| api::configure(cfg, &state))
    });

    let server = match tls {
        Some(config) => server.bind_rustls_0_23(addr, config)?,
        None => server.bind(addr)?,
    };

    server.run().await?;
    Ok(())
}

/// Plaintext listener. Failures are logged; the listener then stays down.
pub async fn serve_plain(state: GateState, addr: String) {
    tracing::info!("Starting HTTP listener on {}", addr);

    if let Err(e) = run(state, &addr, None).await {
        tracing::error!("HTTP listener could not serve on {}: {}", addr, e);
    }
}

/// TLS listener. Skipped when no certificate is configured; load and bind
/// failures are logged like the plaintext ones.
pub async fn serve_tls(state: GateState, config: HttpsConfig) {
    let (cert_path, key_path) = match (&config.cert_path, &config.key_path) {
        (Some(cert), Some(key)) => (cert, key),
        _ => {
            tracing::warn!("No TLS certificate/key configured; HTTPS listener disabled");
            return;
        }
    };

    let tls = match load_rustls_config(cert_path, key_path) {
        Ok(tls) => tls,
        Err(e) => {
            tracing::error!("HTTPS listener disabled: {}", e);
            return;
        }
    };

    tracing::info!("Starting HTTPS listener on {}", config.addr);

    if let Err(e) = run(state, &config.addr, Some(tls)).await {
        tracing::error!("HTTPS listener could not serve on {}: {}", config.addr, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix::Actor;
    use common::{Config, LogBuffer};
    use crate::chat::EchoChatHandler;
    use crate::client_registry::ClientRegistryActor;

    fn state() -> GateState {
        let mut config = Config::default();
        config.admin.pass = "s3cret".into();
        let registry = ClientRegistryActor::new().start();
        GateState::from_config(&config, registry, Arc::new(EchoChatHandler), LogBuffer::new(10))
    }

    #[actix_web::test]
    async fn test_bind_failure_is_not_fatal() {
        // Returns instead of panicking or aborting
        serve_plain(state(), "not a socket address".to_string()).await;
    }

    #[actix_web::test]
    async fn test_tls_listener_skipped_without_certificate() {
        serve_tls(state(), HttpsConfig::default()).await;

        let broken = HttpsConfig {
            cert_path: Some("/nonexistent/cert.pem".into()),
            key_path: Some("/nonexistent/key.pem".into()),
            ..HttpsConfig::default()
        };
        serve_tls(state(), broken).await;
    }

    #[test]
    fn test_missing_certificate_file() {
        let err = load_rustls_config("/nonexistent/cert.pem", "/nonexistent/key.pem").unwrap_err();
        assert!(matches!(err, ListenerError::Pem { ref path, .. } if path == "/nonexistent/cert.pem"));
    }
}
