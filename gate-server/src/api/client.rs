// gate-server/src/api/client.rs
use actix_web::{HttpResponse, Responder};
use common::models::client::ClientView;
use crate::session::AuthenticatedClient;

/// The caller's own client record
pub async fn get_client(client: AuthenticatedClient) -> impl Responder {
    HttpResponse::Ok().json(ClientView::from(&*client))
}
