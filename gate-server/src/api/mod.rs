// gate-server/src/api/mod.rs
pub mod admin;
pub mod auth;
pub mod client;

use actix_web::web;
use crate::chat;
use crate::middleware::{AdminAuth, CorsHeaders, SessionAuth};
use crate::GateState;

/// Mount the `/v2/api` subtree.
///
/// `CorsHeaders` wraps the whole subtree; `/auth` is unguarded, `/client`
/// and `/chat` sit behind the cookie session gate, `/admin/*` behind basic auth.
pub fn configure(cfg: &mut web::ServiceConfig, state: &GateState) {
    let session = SessionAuth::new(state.registry.clone(), state.window);

    cfg.service(
        web::scope("/v2/api")
            .wrap(CorsHeaders)
            .app_data(web::Data::new(state.registry.clone()))
            .app_data(web::Data::new(state.window))
            .app_data(web::Data::new(state.login.clone()))
            .app_data(web::Data::from(state.chat.clone()))
            .app_data(web::Data::new(state.logs.clone()))
            .service(
                web::resource("/auth")
                    .route(web::get().to(auth::login_request))
                    .route(web::post().to(auth::login_request))
            )
            .service(
                web::resource("/client")
                    .wrap(session.clone())
                    .route(web::get().to(client::get_client))
            )
            .service(
                web::resource("/chat")
                    .wrap(session)
                    .route(web::get().to(chat::chat_ws))
            )
            .service(
                web::scope("/admin")
                    .wrap(AdminAuth::new(state.admin.clone()))
                    .route("/clients", web::get().to(admin::list_clients))
                    .route("/profiles", web::get().to(admin::list_profiles))
                    .route("/statistics", web::get().to(admin::statistics))
                    .service(
                        web::resource("/log")
                            .route(web::get().to(admin::get_log))
                            .route(web::delete().to(admin::clear_log))
                    )
            )
    );
}
