//! Group and template endpoints.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::collections::HashMap;

use crate::engine::store::DomainStore;
use crate::engine::types::{GroupUpdate, MemberRole, NewGroup, NewTemplate, ReportPeriod};
use crate::errors::EngineError;

/// GET /api/v1/groups
pub async fn list(store: web::Data<DomainStore>) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.groups()))
}

/// POST /api/v1/groups
pub async fn create(
    store: web::Data<DomainStore>,
    body: web::Json<NewGroup>,
) -> Result<HttpResponse, EngineError> {
    let group = store.create_group(body.into_inner())?;
    Ok(HttpResponse::Created().json(group))
}

/// GET /api/v1/groups/{id}
pub async fn read(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    let group = store
        .group(&id)
        .ok_or_else(|| EngineError::NotFound(format!("group {id}")))?;
    Ok(HttpResponse::Ok().json(group))
}

/// PUT /api/v1/groups/{id}
pub async fn update(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    body: web::Json<GroupUpdate>,
) -> Result<HttpResponse, EngineError> {
    let group = store.update_group(&path.into_inner(), body.into_inner())?;
    Ok(HttpResponse::Ok().json(group))
}

/// DELETE /api/v1/groups/{id}
pub async fn delete(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    store.delete_group(&path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
    #[serde(default)]
    pub role: Option<MemberRole>,
}

/// POST /api/v1/groups/{id}/members
pub async fn add_member(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    body: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, EngineError> {
    let member = store.add_member(&path.into_inner(), &body.user_id, body.role)?;
    Ok(HttpResponse::Created().json(member))
}

/// DELETE /api/v1/groups/{id}/members/{user_id}
pub async fn remove_member(
    store: web::Data<DomainStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, EngineError> {
    let (group_id, user_id) = path.into_inner();
    store.remove_member(&group_id, &user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/groups/{id}/report?period=weekly
pub async fn report(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, EngineError> {
    let period = match query.get("period").map(|s| s.as_str()) {
        None => ReportPeriod::Weekly,
        Some("daily") => ReportPeriod::Daily,
        Some("weekly") => ReportPeriod::Weekly,
        Some("monthly") => ReportPeriod::Monthly,
        Some("quarterly") => ReportPeriod::Quarterly,
        Some(other) => {
            return Err(EngineError::Validation(format!(
                "unknown report period '{other}'"
            )));
        }
    };
    let report = store.group_report(&path.into_inner(), period)?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/v1/templates
pub async fn list_templates(store: web::Data<DomainStore>) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.templates()))
}

/// POST /api/v1/templates
pub async fn create_template(
    store: web::Data<DomainStore>,
    body: web::Json<NewTemplate>,
) -> Result<HttpResponse, EngineError> {
    let template = store.create_template(body.into_inner())?;
    Ok(HttpResponse::Created().json(template))
}

/// POST /api/v1/templates/{id}/use
pub async fn use_template(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    body: web::Json<NewGroup>,
) -> Result<HttpResponse, EngineError> {
    let group = store.use_template(&path.into_inner(), body.into_inner())?;
    Ok(HttpResponse::Created().json(group))
}
