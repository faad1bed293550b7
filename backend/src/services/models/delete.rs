//! `DELETE /models/{id}`: removes the record. The uploaded file is left in
//! the upload directory.

use crate::error::ServiceError;
use crate::state::AppState;
use crate::store::ModelId;
use actix_web::{web, HttpResponse};
use common::responses::MessageResponse;
use log::info;

pub async fn process(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    delete_model(&state, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Model deleted")))
}

pub async fn delete_model(state: &AppState, raw_id: &str) -> Result<(), ServiceError> {
    let id = ModelId::parse(raw_id)?;
    let records = state.records.clone();
    web::block(move || records.delete(&id)).await??;
    info!("Model {} deleted", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::services::models::test_support::{app, create, state};
    use crate::store::ModelId;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn removes_record_but_keeps_file() {
        let (state, _dir) = state();
        let upload_root = state.files.root().to_path_buf();
        let app = app!(state);

        let id = create!(app, &[("name", "gone")], Some(("gone.py", b"bye".as_slice())));

        let req = test::TestRequest::delete()
            .uri(&format!("/models/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Model deleted" }));

        let req = test::TestRequest::get().uri("/models").to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed, json!([]));
        assert!(upload_root.join("gone.py").exists());

        let req = test::TestRequest::delete()
            .uri(&format!("/models/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_record_is_not_found() {
        let (state, _dir) = state();
        let app = app!(state);

        let req = test::TestRequest::delete()
            .uri(&format!("/models/{}", ModelId::generate()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Model not found" }));
    }

    #[actix_web::test]
    async fn malformed_id_is_a_server_error() {
        let (state, _dir) = state();
        let app = app!(state);

        let req = test::TestRequest::delete()
            .uri("/models/12345")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
