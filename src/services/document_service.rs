use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{error, info};

use crate::cv::external::ExternalCvPayload;
use crate::error::{Error, Result};

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Client for the external document-generation API.
#[derive(Clone)]
pub struct DocumentService {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl DocumentService {
    pub fn new(client: Client, url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            url,
            api_key,
        }
    }

    /// Single attempt, no retry. Any non-2xx answer becomes `Upstream` with
    /// the service's own explanation.
    pub async fn render(&self, payload: &ExternalCvPayload) -> Result<RenderedDocument> {
        let mut request = self
            .client
            .post(&self.url)
            .json(payload)
            .timeout(Duration::from_secs(120));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = describe_upstream_error(status, &body);
            error!(%status, %message, "Document generation failed");
            return Err(Error::Upstream(message));
        }

        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DOCX_CONTENT_TYPE)
            .to_string();
        let bytes = res.bytes().await?;
        info!(size = bytes.len(), %content_type, "Document generated");

        Ok(RenderedDocument {
            bytes,
            content_type,
        })
    }
}

/// Builds a readable message from an error response.
///
/// Structured bodies look like `{"detail": [{"loc": [...], "msg": "..."}]}`
/// or `{"detail": "..."}`. Anything else falls back to the raw body, then to
/// the status line.
pub fn describe_upstream_error(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<JsonValue>(body) {
        match json.get("detail") {
            Some(JsonValue::Array(items)) => {
                let parts: Vec<String> = items.iter().filter_map(describe_detail).collect();
                if !parts.is_empty() {
                    return parts.join("; ");
                }
            }
            Some(JsonValue::String(text)) if !text.trim().is_empty() => {
                return text.trim().to_string();
            }
            _ => {}
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    format!("Document service returned {}", status)
}

fn describe_detail(item: &JsonValue) -> Option<String> {
    let msg = item.get("msg").and_then(|m| m.as_str()).unwrap_or_default();
    let loc = item
        .get("loc")
        .and_then(|l| l.as_array())
        .map(|parts| {
            parts
                .iter()
                .map(|p| match p {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .unwrap_or_default();

    match (loc.is_empty(), msg.is_empty()) {
        (true, true) => None,
        (true, false) => Some(msg.to_string()),
        (false, true) => Some(loc),
        (false, false) => Some(format!("{}: {}", loc, msg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_structured_validation_errors() {
        let body = r#"{"detail":[
            {"loc":["body","personal_info","email"],"msg":"value is not a valid email address"},
            {"loc":["body","work_experience",0,"company"],"msg":"ensure this value has at least 1 characters"}
        ]}"#;
        assert_eq!(
            describe_upstream_error(StatusCode::UNPROCESSABLE_ENTITY, body),
            "body.personal_info.email: value is not a valid email address; \
             body.work_experience.0.company: ensure this value has at least 1 characters"
        );
    }

    #[test]
    fn uses_a_plain_detail_string() {
        assert_eq!(
            describe_upstream_error(StatusCode::BAD_REQUEST, r#"{"detail":"Template missing"}"#),
            "Template missing"
        );
    }

    #[test]
    fn falls_back_to_raw_body_then_status_line() {
        assert_eq!(
            describe_upstream_error(StatusCode::BAD_GATEWAY, "upstream timeout"),
            "upstream timeout"
        );
        assert_eq!(
            describe_upstream_error(StatusCode::SERVICE_UNAVAILABLE, "  "),
            "Document service returned 503 Service Unavailable"
        );
    }

    #[test]
    fn unstructured_json_is_reported_verbatim() {
        assert_eq!(
            describe_upstream_error(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#),
            r#"{"error":"boom"}"#
        );
    }
}
