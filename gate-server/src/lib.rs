// gate-server/src/lib.rs
pub mod api;
pub mod chat;
pub mod client_registry;
pub mod error;
pub mod listener;
pub mod middleware;
pub mod session;
pub mod utils;

use actix::Addr;
use common::{Config, LogBuffer};
use std::sync::Arc;
use api::auth::LoginSettings;
use chat::ChatHandler;
use client_registry::ClientRegistryActor;
use middleware::AdminCredential;
use session::SessionWindow;

/// Everything the API subtree needs, shared by both listeners
#[derive(Clone)]
pub struct GateState {
    pub registry: Addr<ClientRegistryActor>,
    pub admin: AdminCredential,
    pub window: SessionWindow,
    pub login: LoginSettings,
    pub chat: Arc<dyn ChatHandler>,
    pub logs: LogBuffer,
}

impl GateState {
    pub fn from_config(
        config: &Config,
        registry: Addr<ClientRegistryActor>,
        chat: Arc<dyn ChatHandler>,
        logs: LogBuffer,
    ) -> Self {
        Self {
            registry,
            admin: AdminCredential::from_config(&config.admin),
            window: SessionWindow::hours(config.session.timeout_hours),
            login: LoginSettings {
                auto_register: config.auth.auto_register,
                default_profile: config.auth.default_profile.clone(),
            },
            chat,
            logs,
        }
    }
}
