//! Live presentation and poll endpoints.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::engine::store::DomainStore;
use crate::engine::types::{NewPoll, NewPresentation, SubmitResponse};
use crate::errors::EngineError;

/// GET /api/v1/presentations
pub async fn list(store: web::Data<DomainStore>) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.presentations()))
}

/// POST /api/v1/presentations
pub async fn create(
    store: web::Data<DomainStore>,
    body: web::Json<NewPresentation>,
) -> Result<HttpResponse, EngineError> {
    let presentation = store.create_presentation(body.into_inner())?;
    Ok(HttpResponse::Created().json(presentation))
}

/// GET /api/v1/presentations/{id}
pub async fn read(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    let presentation = store
        .presentation(&id)
        .ok_or_else(|| EngineError::NotFound(format!("presentation {id}")))?;
    Ok(HttpResponse::Ok().json(presentation))
}

/// POST /api/v1/presentations/{id}/start
pub async fn start(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.start_presentation(&path.into_inner())?))
}

/// POST /api/v1/presentations/{id}/pause
pub async fn pause(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.pause_presentation(&path.into_inner())?))
}

/// POST /api/v1/presentations/{id}/resume
pub async fn resume(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.resume_presentation(&path.into_inner())?))
}

/// POST /api/v1/presentations/{id}/end
pub async fn end(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.end_presentation(&path.into_inner())?))
}

#[derive(Debug, Deserialize)]
pub struct SetSlideRequest {
    pub slide: u32,
}

/// POST /api/v1/presentations/{id}/slide
pub async fn set_slide(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    body: web::Json<SetSlideRequest>,
) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.set_slide(&path.into_inner(), body.slide)?))
}

#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    pub user_id: String,
}

/// POST /api/v1/presentations/{id}/join
pub async fn join(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    body: web::Json<ParticipantRequest>,
) -> Result<HttpResponse, EngineError> {
    store.join_presentation(&path.into_inner(), &body.user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/v1/presentations/{id}/leave
pub async fn leave(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    body: web::Json<ParticipantRequest>,
) -> Result<HttpResponse, EngineError> {
    store.leave_presentation(&path.into_inner(), &body.user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/presentations/{id}/analytics
pub async fn analytics(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.presentation_analytics(&path.into_inner())?))
}

/// POST /api/v1/presentations/{id}/polls
pub async fn add_poll(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    body: web::Json<NewPoll>,
) -> Result<HttpResponse, EngineError> {
    let poll = store.add_poll(&path.into_inner(), body.into_inner())?;
    Ok(HttpResponse::Created().json(poll))
}

/// POST /api/v1/presentations/{id}/polls/{poll_id}/activate
pub async fn activate_poll(
    store: web::Data<DomainStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, EngineError> {
    let (presentation_id, poll_id) = path.into_inner();
    Ok(HttpResponse::Ok().json(store.activate_poll(&presentation_id, &poll_id)?))
}

/// POST /api/v1/presentations/{id}/polls/{poll_id}/deactivate
pub async fn deactivate_poll(
    store: web::Data<DomainStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, EngineError> {
    let (presentation_id, poll_id) = path.into_inner();
    Ok(HttpResponse::Ok().json(store.deactivate_poll(&presentation_id, &poll_id)?))
}

/// POST /api/v1/presentations/{id}/polls/{poll_id}/responses
pub async fn submit_response(
    store: web::Data<DomainStore>,
    path: web::Path<(String, String)>,
    body: web::Json<SubmitResponse>,
) -> Result<HttpResponse, EngineError> {
    let (presentation_id, poll_id) = path.into_inner();
    let response = store.submit_response(&presentation_id, &poll_id, body.into_inner())?;
    Ok(HttpResponse::Created().json(response))
}

/// GET /api/v1/presentations/{id}/polls/{poll_id}/results
pub async fn poll_results(
    store: web::Data<DomainStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, EngineError> {
    let (presentation_id, poll_id) = path.into_inner();
    Ok(HttpResponse::Ok().json(store.poll_results(&presentation_id, &poll_id)?))
}
