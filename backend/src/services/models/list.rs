use crate::error::ServiceError;
use crate::state::AppState;
use crate::store::Document;
use actix_web::{web, HttpResponse};

/// Actix handler for `GET /models`.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let models = list_models(&state).await?;
    Ok(HttpResponse::Ok().json(models))
}

/// Every stored record in insertion order. Records carry no `id` key.
pub async fn list_models(state: &AppState) -> Result<Vec<Document>, ServiceError> {
    let records = state.records.clone();
    let models = web::block(move || records.list()).await??;
    Ok(models)
}
