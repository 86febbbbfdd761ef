//! Shared helpers for thematic-client integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thematic_client::{Client, ClientConfig};
use wiremock::{MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";

/// Client pointed at the mock server with a known key and a fast poll.
pub fn client_for(server: &MockServer) -> Client {
    client_with_retries(server, ClientConfig::default().num_retries())
}

/// Same as [`client_for`] with a specific poll retry budget.
pub fn client_with_retries(server: &MockServer, num_retries: u32) -> Client {
    let config = ClientConfig::builder()
        .poll_interval(Duration::from_millis(5))
        .num_retries(num_retries)
        .log_requests(true)
        .build();

    Client::new(server.uri())
        .unwrap()
        .with_api_key(API_KEY)
        .with_config(config)
        .unwrap()
}

/// `{"status":"success","data":…}` with status 200.
pub fn success(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": data }))
}

/// `{"status":"fail","error":{"message":…}}` with status 200.
pub fn rejected(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({ "status": "fail", "error": { "message": message } }))
}

/// Job info response for a state.
pub fn job_state(state: &str) -> ResponseTemplate {
    success(json!({ "state": state, "jobid": "job-1" }))
}

/// Respond with each template in turn, repeating the last one.
pub fn sequence(
    templates: Vec<ResponseTemplate>,
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    let calls = Arc::new(AtomicUsize::new(0));
    move |_req: &Request| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        templates[n.min(templates.len() - 1)].clone()
    }
}

/// The only request the server saw.
pub async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

/// Names of the multipart fields in a request body, in order.
pub fn multipart_fields(request: &Request) -> Vec<String> {
    let body = String::from_utf8_lossy(&request.body).to_lowercase();
    let marker = "form-data; name=\"";
    body.match_indices(marker)
        .filter_map(|(start, _)| {
            let rest = &body[start + marker.len()..];
            rest.find('"').map(|end| rest[..end].to_string())
        })
        .collect()
}

/// Keys of a url-encoded body, in order.
pub fn urlencoded_fields(request: &Request) -> Vec<String> {
    String::from_utf8_lossy(&request.body)
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| pair.split('=').next().map(str::to_string))
        .collect()
}

/// Write a file under `dir` and return its path.
pub fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
