//! `GET /models/{id}/file`: streams the file a record points at.
//!
//! A record that is gone or has no `file_path` gets a JSON 404. A path that
//! exists in the record but not on disk is treated as a server error.

use crate::error::{ServiceError, FILE_PATH_NOT_FOUND, MODEL_NOT_FOUND};
use crate::state::AppState;
use crate::store::ModelId;
use actix_files::NamedFile;
use actix_web::web;
use serde_json::Value;
use std::path::PathBuf;

pub async fn process(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<NamedFile, ServiceError> {
    let path = model_file_path(&state, &id).await?;
    Ok(state.files.read(&path).await?)
}

/// Looks up the record and returns the path stored in it.
pub async fn model_file_path(state: &AppState, raw_id: &str) -> Result<PathBuf, ServiceError> {
    let id = ModelId::parse(raw_id)?;
    let records = state.records.clone();
    let document = web::block(move || records.get_by_id(&id))
        .await??
        .ok_or_else(|| ServiceError::not_found(MODEL_NOT_FOUND))?;

    document
        .get("file_path")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| ServiceError::not_found(FILE_PATH_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use crate::services::models::test_support::{app, create, state};
    use crate::store::ModelId;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use serde_json::{json, Map, Value};

    #[actix_web::test]
    async fn serves_uploaded_bytes_as_attachment() {
        let (state, _dir) = state();
        let app = app!(state);

        let content: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
        let id = create!(
            app,
            &[("name", "weights"), ("type", "regressor")],
            Some(("weights.bin", content.as_slice()))
        );

        let req = test::TestRequest::get()
            .uri(&format!("/models/{}/file", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("weights.bin"));
        assert_eq!(test::read_body(resp).await.as_ref(), content.as_slice());
    }

    #[actix_web::test]
    async fn unknown_record_is_not_found() {
        let (state, _dir) = state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri(&format!("/models/{}/file", ModelId::generate()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Model not found" }));
    }

    #[actix_web::test]
    async fn record_without_path_is_not_found() {
        let (state, _dir) = state();
        let records = state.records.clone();
        let app = app!(state);

        let id = create!(app, &[("name", "m")], Some(("m.py", b"m".as_slice())));
        let mut fields = Map::new();
        fields.insert("file_path".to_string(), Value::Null);
        records
            .update(&ModelId::parse(&id).unwrap(), fields)
            .unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/models/{}/file", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "File path not found for the model" }));
    }

    #[actix_web::test]
    async fn file_removed_from_disk_is_a_server_error() {
        let (state, _dir) = state();
        let upload_root = state.files.root().to_path_buf();
        let app = app!(state);

        let id = create!(app, &[("name", "m")], Some(("vanish.py", b"m".as_slice())));
        std::fs::remove_file(upload_root.join("vanish.py")).unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/models/{}/file", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn malformed_id_is_a_server_error() {
        let (state, _dir) = state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/models/zzz/file").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn preflight_allows_model_methods() {
        let (state, _dir) = state();
        let app = app!(state);

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri(&format!("/models/{}/file", ModelId::generate()))
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        let methods = headers
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(methods.contains(method), "{} missing from {}", method, methods);
        }
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "content-type"
        );
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }
}
