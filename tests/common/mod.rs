use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hush::{FeatureWeights, HushService, NoiseInjector, SnapshotStore};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

#[allow(dead_code)]
pub fn create_temp_store() -> (SnapshotStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store =
        SnapshotStore::new_with_path(tmp.path().join("hush.db")).expect("failed to open store");
    (store, tmp)
}

/// A bootstrapped service over a throwaway database
#[allow(dead_code)]
pub fn create_temp_service(noise: Arc<dyn NoiseInjector>) -> (Arc<HushService>, TempDir) {
    let (store, tmp) = create_temp_store();
    let service = HushService::new(store, noise, FeatureWeights::default());
    service.bootstrap().expect("bootstrap failed");
    (Arc::new(service), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Send one request and return the status with the parsed JSON body
#[allow(dead_code)]
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[allow(dead_code)]
pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

#[allow(dead_code)]
pub fn post_json(path: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("failed to build request")
}
