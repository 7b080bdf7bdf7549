use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;
use tracing::{error, info};

use crate::cv::form_session::FormSession;
use crate::cv::lenient::{extraction_schema, normalize_lenient};
use crate::error::{Error, Result};

/// Longest document text sent to the model.
const MAX_PROMPT_CHARS: usize = 60_000;

const SYSTEM_PROMPT: &str = "You extract structured data from CVs. \
Return a single JSON object that follows the schema below. \
Use camelCase keys exactly as given. Dates are YYYY-MM-DD. \
Leave out anything the document does not state; do not guess.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
    Txt,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "doc" => Some(DocumentKind::Doc),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Doc => "doc",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }
}

/// Rejects uploads that cannot be processed before any work is done.
pub fn check_upload(file_name: &str, bytes: &[u8], max_bytes: usize) -> Result<DocumentKind> {
    let kind = DocumentKind::from_file_name(file_name).ok_or_else(|| {
        Error::BadRequest("Unsupported file type; upload a PDF, DOC, DOCX or TXT file".to_string())
    })?;
    if bytes.is_empty() {
        return Err(Error::BadRequest("Uploaded file is empty".to_string()));
    }
    if bytes.len() > max_bytes {
        return Err(Error::BadRequest(format!(
            "File is larger than the {} MB limit",
            max_bytes / (1024 * 1024)
        )));
    }
    if kind == DocumentKind::Pdf && !bytes.starts_with(b"%PDF") {
        return Err(Error::BadRequest("File is not a valid PDF".to_string()));
    }
    Ok(kind)
}

/// CV extraction through the chat-completions API.
///
/// The model's answer is untrusted: it always goes through the lenient
/// normalizer and comes back as a fresh, AI-assisted form session.
#[derive(Clone)]
pub struct ExtractionService {
    client: Client,
    api_key: String,
    model: String,
    max_upload_bytes: usize,
}

impl ExtractionService {
    pub fn new(client: Client, api_key: String, model: String, max_upload_bytes: usize) -> Self {
        Self {
            client,
            api_key,
            model,
            max_upload_bytes,
        }
    }

    pub async fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<FormSession> {
        let kind = check_upload(file_name, bytes, self.max_upload_bytes)?;
        let text = extract_text(kind, bytes).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::BadRequest(
                "No readable text found in the uploaded file".to_string(),
            ));
        }

        info!(file_name, kind = kind.extension(), chars = text.len(), "Extracting CV");
        let raw = self.chat_openai(self.build_request(text)).await?;
        let form = normalize_lenient(&raw);
        Ok(FormSession::from_extracted(form))
    }

    fn build_request(&self, text: &str) -> JsonValue {
        let text: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        let system = format!("{}\n\nSchema:\n{}", SYSTEM_PROMPT, extraction_schema());
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": text}
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0
        })
    }

    async fn chat_openai(&self, payload: JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!(%status, "OpenAI request failed");
            return Err(Error::Upstream(format!("OpenAI API error {}: {}", status, text)));
        }

        let body: JsonValue = res.json().await?;
        parse_completion(&body)
    }
}

/// Pulls the JSON object out of a chat-completions response body.
fn parse_completion(body: &JsonValue) -> Result<JsonValue> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .and_then(|s| serde_json::from_str(s).ok())
        .ok_or_else(|| Error::Upstream("Invalid OpenAI response format".to_string()))
}

async fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String> {
    let (tool, args): (&str, &[&str]) = match kind {
        DocumentKind::Txt => return Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentKind::Pdf => ("pdftotext", &["-layout"][..]),
        DocumentKind::Docx => ("pandoc", &["-t", "plain"][..]),
        DocumentKind::Doc => ("antiword", &[][..]),
    };

    let path = std::env::temp_dir().join(format!(
        "cv_extract_{}.{}",
        uuid::Uuid::new_v4(),
        kind.extension()
    ));
    fs::write(&path, bytes).await?;

    let mut command = Command::new(tool);
    command.args(args).arg(&path);
    if kind == DocumentKind::Pdf {
        // Write to stdout instead of a sibling .txt file.
        command.arg("-");
    }
    let output = command.output().await;
    let _ = fs::remove_file(&path).await;

    match output {
        Ok(out) if out.status.success() => Ok(String::from_utf8_lossy(&out.stdout).into_owned()),
        Ok(out) => {
            error!("{} failed: {}", tool, String::from_utf8_lossy(&out.stderr));
            Err(Error::BadRequest(format!(
                "Could not read the uploaded {} file",
                kind.extension().to_uppercase()
            )))
        }
        Err(e) => {
            error!("Failed to run {}: {}", tool, e);
            Err(Error::Internal(format!("{} is not available", tool)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: usize = 1024 * 1024;

    #[test]
    fn recognises_supported_extensions_case_insensitively() {
        assert_eq!(DocumentKind::from_file_name("cv.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("my.cv.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("cv.doc"), Some(DocumentKind::Doc));
        assert_eq!(DocumentKind::from_file_name("notes.txt"), Some(DocumentKind::Txt));
        assert_eq!(DocumentKind::from_file_name("photo.png"), None);
        assert_eq!(DocumentKind::from_file_name("README"), None);
    }

    #[test]
    fn upload_checks_type_size_and_pdf_signature() {
        assert!(matches!(
            check_upload("cv.exe", b"MZ", 10 * MB),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(check_upload("cv.txt", b"", 10 * MB), Err(Error::BadRequest(_))));
        assert!(matches!(
            check_upload("cv.txt", &vec![b'a'; MB + 1], MB),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            check_upload("cv.pdf", b"not a pdf", 10 * MB),
            Err(Error::BadRequest(_))
        ));
        assert_eq!(
            check_upload("cv.pdf", b"%PDF-1.7 ...", 10 * MB).unwrap(),
            DocumentKind::Pdf
        );
    }

    #[tokio::test]
    async fn plain_text_is_decoded_without_external_tools() {
        let text = extract_text(DocumentKind::Txt, "Jane Doe\nEngineer".as_bytes())
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[test]
    fn completion_content_is_parsed_as_json() {
        let body = json!({
            "choices": [{ "message": { "content": "{\"jobTitle\":\"Chef\"}" } }]
        });
        assert_eq!(parse_completion(&body).unwrap(), json!({ "jobTitle": "Chef" }));
    }

    #[test]
    fn malformed_completions_are_upstream_errors() {
        let body = json!({ "choices": [{ "message": { "content": "not json" } }] });
        assert!(matches!(parse_completion(&body), Err(Error::Upstream(_))));
        assert!(matches!(parse_completion(&json!({})), Err(Error::Upstream(_))));
    }

    #[test]
    fn request_embeds_the_schema_and_asks_for_json() {
        let service = ExtractionService::new(Client::new(), "key".into(), "gpt-4o".into(), MB);
        let request = service.build_request("Jane Doe");
        assert_eq!(request["model"], "gpt-4o");
        assert_eq!(request["response_format"]["type"], "json_object");
        let system = request["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("personalInfo"));
        assert_eq!(request["messages"][1]["content"], "Jane Doe");
    }
}
