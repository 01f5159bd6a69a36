//! Mock image storage server for testing

use serde_json::json;
use wiremock::{
    matchers::{method, path, path_regex},
    Mock, MockServer, ResponseTemplate,
};

/// Mock storage API backed by wiremock
pub struct StorageMockServer {
    pub server: MockServer,
}

impl StorageMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn api_url(&self) -> String {
        self.server.uri()
    }

    /// Accept every upload and answer with a fixed file record
    pub async fn mock_upload(&self, file_id: &str) {
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fileId": file_id,
                "url": format!("https://cdn.example.com/{}", file_id),
                "fileType": "image/png",
                "size": 4
            })))
            .mount(&self.server)
            .await;
    }

    /// Accept every delete
    pub async fn mock_delete(&self) {
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/files/.+$"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has seen
    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.map(|r| r.len()).unwrap_or(0)
    }
}
