//! Reputation-service HTTP client

use std::time::Duration;

use async_trait::async_trait;
use filegate_core::{ContentHash, Verdict};

use crate::response::{decode_submit_response, decode_verdict_response};
use crate::service::ReputationService;
use crate::ReputationError;

const VERDICT_PATH: &str = "/publicapi/get/verdict";
const SUBMIT_PATH: &str = "/publicapi/submit/file";

/// Client for the reputation service's public API.
///
/// `base_url` is injected (not hardcoded) so tests can point it at a local
/// mock server.
pub struct ReputationClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ReputationClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ReputationError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReputationError::ClientBuild)?;

        Ok(ReputationClient {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ReputationService for ReputationClient {
    /// Query the service for a verdict on a content hash.
    ///
    /// Transport failures and non-success statuses surface as
    /// `ServiceUnavailable`; whatever the service actually says is decoded
    /// into a `Verdict` (including `Unknown` and `AnalysisError`).
    async fn verdict_by_hash(&self, hash: &ContentHash) -> Result<Verdict, ReputationError> {
        let response = self
            .http_client
            .post(self.url(VERDICT_PATH))
            .form(&[("apikey", self.api_key.as_str()), ("hash", hash.as_str())])
            .send()
            .await
            .map_err(|e| ReputationError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReputationError::ServiceUnavailable(format!(
                "verdict query failed: {} - {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ReputationError::ServiceUnavailable(e.to_string()))?;

        let verdict = decode_verdict_response(&body);
        tracing::debug!(hash = %hash, verdict = %verdict, "verdict query completed");
        Ok(verdict)
    }

    /// Submit file content for asynchronous analysis.
    ///
    /// The service keys analysis by the content's own hash; no submission id
    /// comes back, and re-submitting a pending hash is harmless.
    async fn submit(&self, object_name: &str, content: Vec<u8>) -> Result<(), ReputationError> {
        let size = content.len();

        // The service wants a bare filename, not the full object key.
        let file_name = std::path::Path::new(object_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(object_name)
            .to_string();

        let part = reqwest::multipart::Part::bytes(content).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("apikey", self.api_key.clone());

        let response = self
            .http_client
            .post(self.url(SUBMIT_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ReputationError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReputationError::ServiceUnavailable(format!(
                "submission failed: {} - {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ReputationError::ServiceUnavailable(e.to_string()))?;

        decode_submit_response(&body).map_err(ReputationError::Submission)?;

        tracing::info!(
            object_name = %object_name,
            size_bytes = size,
            "sample submitted for analysis"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: String) -> ReputationClient {
        ReputationClient::new(base_url, "test-api-key", Duration::from_secs(5)).unwrap()
    }

    fn hash() -> ContentHash {
        ContentHash::from_hex("d41d8cd98f00b204e9800998ecf8427e")
    }

    #[tokio::test]
    async fn verdict_query_decodes_malware() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/publicapi/get/verdict")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("apikey".into(), "test-api-key".into()),
                mockito::Matcher::UrlEncoded(
                    "hash".into(),
                    "d41d8cd98f00b204e9800998ecf8427e".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(
                "<wildfire><get-verdict-info>\
                   <md5>d41d8cd98f00b204e9800998ecf8427e</md5>\
                   <verdict>1</verdict>\
                 </get-verdict-info></wildfire>",
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let verdict = client.verdict_by_hash(&hash()).await.unwrap();

        assert_eq!(verdict, Verdict::Malware);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn verdict_query_decodes_pending() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/publicapi/get/verdict")
            .with_status(200)
            .with_body(
                "<wildfire><get-verdict-info><verdict>-100</verdict></get-verdict-info></wildfire>",
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        assert_eq!(client.verdict_by_hash(&hash()).await.unwrap(), Verdict::Pending);
    }

    #[tokio::test]
    async fn http_error_status_is_service_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/publicapi/get/verdict")
            .with_status(503)
            .with_body("down for maintenance")
            .create_async()
            .await;

        let client = test_client(server.url());
        let result = client.verdict_by_hash(&hash()).await;
        assert!(matches!(result, Err(ReputationError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn connection_refused_is_service_unavailable() {
        // Port 1 is never listening.
        let client = test_client("http://127.0.0.1:1".to_string());
        let result = client.verdict_by_hash(&hash()).await;
        assert!(matches!(result, Err(ReputationError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn garbage_body_is_unknown_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/publicapi/get/verdict")
            .with_status(200)
            .with_body("<<<definitely not xml>>>")
            .create_async()
            .await;

        let client = test_client(server.url());
        assert_eq!(
            client.verdict_by_hash(&hash()).await.unwrap(),
            Verdict::Unknown(None)
        );
    }

    #[tokio::test]
    async fn submit_accepts_clean_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/publicapi/submit/file")
            .with_status(200)
            .with_body(
                "<wildfire><upload-file-info><md5>abc</md5></upload-file-info></wildfire>",
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let result = client.submit("uploads/sample.bin", b"content".to_vec()).await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn submit_surfaces_service_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/publicapi/submit/file")
            .with_status(200)
            .with_body("<wildfire><error-message>Unsupported file type</error-message></wildfire>")
            .create_async()
            .await;

        let client = test_client(server.url());
        let result = client.submit("sample.bin", b"content".to_vec()).await;

        match result {
            Err(ReputationError::Submission(msg)) => {
                assert_eq!(msg, "Unsupported file type");
            }
            other => panic!("expected submission rejection, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn submit_http_failure_is_service_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/publicapi/submit/file")
            .with_status(500)
            .create_async()
            .await;

        let client = test_client(server.url());
        let result = client.submit("sample.bin", b"content".to_vec()).await;
        assert!(matches!(result, Err(ReputationError::ServiceUnavailable(_))));
    }
}
