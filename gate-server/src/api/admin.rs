// gate-server/src/api/admin.rs
use actix::Addr;
use actix_web::{web, HttpResponse, Responder};
use common::models::client::ClientView;
use common::LogBuffer;
use serde_json::json;
use crate::client_registry::{ClientRegistryActor, GetRegistryMetrics, ListClients, ListProfiles};
use crate::error::GateError;

pub async fn list_clients(
    registry: web::Data<Addr<ClientRegistryActor>>,
) -> Result<HttpResponse, GateError> {
    let clients = registry.send(ListClients).await?;
    let views: Vec<ClientView> = clients.iter().map(ClientView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

pub async fn list_profiles(
    registry: web::Data<Addr<ClientRegistryActor>>,
) -> Result<HttpResponse, GateError> {
    let profiles = registry.send(ListProfiles).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

pub async fn statistics(
    registry: web::Data<Addr<ClientRegistryActor>>,
) -> Result<HttpResponse, GateError> {
    let metrics = registry.send(GetRegistryMetrics).await?;
    Ok(HttpResponse::Ok().json(metrics))
}

pub async fn get_log(logs: web::Data<LogBuffer>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "lines": logs.lines()
    }))
}

pub async fn clear_log(logs: web::Data<LogBuffer>) -> impl Responder {
    logs.clear();
    tracing::info!("Log buffer cleared");

    HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Log cleared"
    }))
}
