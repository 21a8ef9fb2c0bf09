// gate-server/src/main.rs
use actix::Actor;
use common::{setup_tracing, Config, LogBuffer};
use gate_server::chat::EchoChatHandler;
use gate_server::client_registry::ClientRegistryActor;
use gate_server::{listener, GateState};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Logs are buffered from the start; resized once config is known
    let logs = LogBuffer::default();
    setup_tracing(&logs);

    let config = Config::from_env();
    logs.set_capacity(config.log.buffer_lines);

    let registry = ClientRegistryActor::new().start();
    let state = GateState::from_config(&config, registry, Arc::new(EchoChatHandler), logs);

    // Each listener fails on its own without taking the other down
    tokio::join!(
        listener::serve_plain(state.clone(), config.http.addr.clone()),
        listener::serve_tls(state, config.https.clone()),
    );

    tracing::info!("All listeners stopped");
    Ok(())
}
