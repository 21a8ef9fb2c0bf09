// gate-server/src/client_registry.rs
use actix::{Actor, Context, Handler, Message, MessageResult};
use common::models::client::Client;
use common::models::profile::Profile;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

/// Actor message: All client records sharing an identifier
#[derive(Message)]
#[rtype(result = "Vec<Client>")]
pub struct GetClientsList {
    pub pid: String,
}

/// Actor message: Insert a client, replacing a record with the same pid and token
#[derive(Message)]
#[rtype(result = "()")]
pub struct StoreClient {
    pub client: Client,
}

/// Actor message: Every known client
#[derive(Message)]
#[rtype(result = "Vec<Client>")]
pub struct ListClients;

/// Actor message: Get a profile by email, creating it on first use
#[derive(Message)]
#[rtype(result = "Profile")]
pub struct GetProfile {
    pub email: String,
}

/// Actor message: Every known profile
#[derive(Message)]
#[rtype(result = "Vec<Profile>")]
pub struct ListProfiles;

/// Actor message: Get registry metrics
#[derive(Message)]
#[rtype(result = "RegistryMetrics")]
pub struct GetRegistryMetrics;

/// Registry metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistryMetrics {
    pub total_clients: usize,
    pub distinct_pids: usize,
    pub total_profiles: usize,
    pub stored_count: usize,
}

/// Registry of known clients and their profiles.
///
/// All access goes through the actor mailbox, so a `StoreClient` is always
/// visible to any lookup processed after it.
pub struct ClientRegistryActor {
    // Map from pid to every record carrying it
    clients: Arc<DashMap<String, Vec<Client>>>,
    // Map from email to profile
    profiles: Arc<DashMap<String, Profile>>,
    stored_count: usize,
}

impl Default for ClientRegistryActor {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRegistryActor {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(DashMap::new()),
            profiles: Arc::new(DashMap::new()),
            stored_count: 0,
        }
    }

    /// Seed the registry with existing records
    pub fn with_clients(self, clients: impl IntoIterator<Item = Client>) -> Self {
        for client in clients {
            self.upsert(client);
        }
        self
    }

    fn upsert(&self, client: Client) -> bool {
        let mut records = self.clients.entry(client.pid.clone()).or_default();
        match records.iter_mut().find(|c| c.token == client.token) {
            Some(existing) => {
                *existing = client;
                false
            },
            None => {
                records.push(client);
                true
            }
        }
    }
}

impl Actor for ClientRegistryActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("ClientRegistryActor started with {} client ids", self.clients.len());
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(
            "ClientRegistryActor stopped. {} stores during lifetime",
            self.stored_count
        );
    }
}

impl Handler<GetClientsList> for ClientRegistryActor {
    type Result = MessageResult<GetClientsList>;

    fn handle(&mut self, msg: GetClientsList, _ctx: &mut Self::Context) -> Self::Result {
        let list = self.clients
            .get(&msg.pid)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        tracing::trace!("Found {} records for client: {}", list.len(), msg.pid);
        MessageResult(list)
    }
}

impl Handler<StoreClient> for ClientRegistryActor {
    type Result = ();

    fn handle(&mut self, msg: StoreClient, _ctx: &mut Self::Context) -> Self::Result {
        let pid = msg.client.pid.clone();
        if self.upsert(msg.client) {
            tracing::info!("Stored new client: {}", pid);
        } else {
            tracing::debug!("Updated client: {}", pid);
        }
        self.stored_count += 1;
    }
}

impl Handler<ListClients> for ClientRegistryActor {
    type Result = MessageResult<ListClients>;

    fn handle(&mut self, _msg: ListClients, _ctx: &mut Self::Context) -> Self::Result {
        let mut clients: Vec<Client> = self.clients
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        clients.sort_by(|a, b| a.pid.cmp(&b.pid).then(a.created_at.cmp(&b.created_at)));
        MessageResult(clients)
    }
}

impl Handler<GetProfile> for ClientRegistryActor {
    type Result = MessageResult<GetProfile>;

    fn handle(&mut self, msg: GetProfile, _ctx: &mut Self::Context) -> Self::Result {
        let profile = self.profiles
            .entry(msg.email.clone())
            .or_insert_with(|| {
                tracing::info!("Created profile: {}", msg.email);
                Profile::new(msg.email.clone())
            })
            .clone();
        MessageResult(profile)
    }
}

impl Handler<ListProfiles> for ClientRegistryActor {
    type Result = MessageResult<ListProfiles>;

    fn handle(&mut self, _msg: ListProfiles, _ctx: &mut Self::Context) -> Self::Result {
        let mut profiles: Vec<Profile> = self.profiles
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        profiles.sort_by(|a, b| a.email.cmp(&b.email));
        MessageResult(profiles)
    }
}

impl Handler<GetRegistryMetrics> for ClientRegistryActor {
    type Result = MessageResult<GetRegistryMetrics>;

    fn handle(&mut self, _msg: GetRegistryMetrics, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(RegistryMetrics {
            total_clients: self.clients.iter().map(|entry| entry.value().len()).sum(),
            distinct_pids: self.clients.len(),
            total_profiles: self.profiles.len(),
            stored_count: self.stored_count,
        })
    }
}
