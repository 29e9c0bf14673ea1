use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};

use podium::engine::events::EventBus;
use podium::engine::store::DomainStore;
use podium::handlers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // One store per process, torn down at shutdown. All mutation funnels
    // through its command lock; handlers only hold snapshots.
    let bus = Arc::new(EventBus::new());
    let store = web::Data::new(DomainStore::new(bus));

    let bind_addr = match std::env::var("BIND_ADDR") {
        Ok(addr) => addr,
        Err(_) => {
            log::info!("No BIND_ADDR set, defaulting to 127.0.0.1:8080");
            "127.0.0.1:8080".to_string()
        }
    };

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .service(web::scope("/api/v1").configure(handlers::configure))
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({
                    "error": "not_found",
                    "details": "unknown route",
                }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
