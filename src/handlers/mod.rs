//! JSON HTTP surface over the domain engine. Handlers parse input, invoke
//! one store command or read accessor, and serialize the result; no domain
//! logic lives here.

pub mod event_handlers;
pub mod group_handlers;
pub mod performance_handlers;
pub mod presentation_handlers;

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpResponse,
};

/// CSRF protection for REST mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't have Content-Type:
/// application/json. Browsers cannot send cross-origin JSON with cookies
/// via simple form POST, so the check acts as a CSRF guard without tokens.
/// GET requests are exempt (read-only).
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure all `/api/v1` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/groups")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(group_handlers::list))
            .route("", web::post().to(group_handlers::create))
            .route("/{id}", web::get().to(group_handlers::read))
            .route("/{id}", web::put().to(group_handlers::update))
            .route("/{id}", web::delete().to(group_handlers::delete))
            .route("/{id}/members", web::post().to(group_handlers::add_member))
            .route(
                "/{id}/members/{user_id}",
                web::delete().to(group_handlers::remove_member),
            )
            .route("/{id}/report", web::get().to(group_handlers::report))
            .route(
                "/{id}/top-performers",
                web::get().to(performance_handlers::top_performers),
            )
            .route(
                "/{id}/improvement-areas",
                web::get().to(performance_handlers::improvement_areas),
            ),
    );
    cfg.service(
        web::scope("/templates")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(group_handlers::list_templates))
            .route("", web::post().to(group_handlers::create_template))
            .route("/{id}/use", web::post().to(group_handlers::use_template)),
    );
    cfg.service(
        web::scope("/presentations")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(presentation_handlers::list))
            .route("", web::post().to(presentation_handlers::create))
            .route("/{id}", web::get().to(presentation_handlers::read))
            .route("/{id}/start", web::post().to(presentation_handlers::start))
            .route("/{id}/pause", web::post().to(presentation_handlers::pause))
            .route("/{id}/resume", web::post().to(presentation_handlers::resume))
            .route("/{id}/end", web::post().to(presentation_handlers::end))
            .route("/{id}/slide", web::post().to(presentation_handlers::set_slide))
            .route("/{id}/join", web::post().to(presentation_handlers::join))
            .route("/{id}/leave", web::post().to(presentation_handlers::leave))
            .route(
                "/{id}/analytics",
                web::get().to(presentation_handlers::analytics),
            )
            .route("/{id}/polls", web::post().to(presentation_handlers::add_poll))
            .route(
                "/{id}/polls/{poll_id}/activate",
                web::post().to(presentation_handlers::activate_poll),
            )
            .route(
                "/{id}/polls/{poll_id}/deactivate",
                web::post().to(presentation_handlers::deactivate_poll),
            )
            .route(
                "/{id}/polls/{poll_id}/responses",
                web::post().to(presentation_handlers::submit_response),
            )
            .route(
                "/{id}/polls/{poll_id}/results",
                web::get().to(presentation_handlers::poll_results),
            ),
    );
    cfg.service(
        web::scope("/performance")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(performance_handlers::list))
            .route("", web::post().to(performance_handlers::update)),
    );
    cfg.route("/events", web::get().to(event_handlers::recent));
    cfg.route("/ws/events", web::get().to(event_handlers::ws_connect));
}
