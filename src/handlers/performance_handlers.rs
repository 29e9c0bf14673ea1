//! Performance tracking endpoints.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::collections::HashMap;

use crate::engine::store::DomainStore;
use crate::engine::types::MetricsUpdate;
use crate::errors::EngineError;

/// GET /api/v1/performance?group_id=...
pub async fn list(
    store: web::Data<DomainStore>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, EngineError> {
    let group_id = query.get("group_id").map(|s| s.as_str());
    Ok(HttpResponse::Ok().json(store.performances(group_id)))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePerformanceRequest {
    pub user_id: String,
    pub group_id: String,
    #[serde(flatten)]
    pub metrics: MetricsUpdate,
}

/// POST /api/v1/performance
pub async fn update(
    store: web::Data<DomainStore>,
    body: web::Json<UpdatePerformanceRequest>,
) -> Result<HttpResponse, EngineError> {
    let req = body.into_inner();
    let perf = store.update_performance(&req.user_id, &req.group_id, req.metrics)?;
    Ok(HttpResponse::Ok().json(perf))
}

/// GET /api/v1/groups/{id}/top-performers?limit=5
pub async fn top_performers(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, EngineError> {
    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(5)
        .min(100);
    Ok(HttpResponse::Ok().json(store.top_performers(&path.into_inner(), limit)))
}

/// GET /api/v1/groups/{id}/improvement-areas
pub async fn improvement_areas(
    store: web::Data<DomainStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.improvement_areas(&path.into_inner())))
}
