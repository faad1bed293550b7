//! `PUT /models/{id}`: merges the JSON body into the stored record.
//!
//! Any key is accepted except `id` and `date_added`, which are skipped. A
//! body that changes nothing is reported the same way as a missing record.

use crate::error::ServiceError;
use crate::state::AppState;
use crate::store::{Document, ModelId};
use actix_web::{web, HttpResponse};
use common::responses::MessageResponse;
use log::info;

pub async fn process(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<Document>,
) -> Result<HttpResponse, ServiceError> {
    update_model(&state, &id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Model updated")))
}

pub async fn update_model(
    state: &AppState,
    raw_id: &str,
    fields: Document,
) -> Result<(), ServiceError> {
    let id = ModelId::parse(raw_id)?;
    let records = state.records.clone();
    web::block(move || records.update(&id, fields)).await??;
    info!("Model {} updated", id);
    Ok(())
}
