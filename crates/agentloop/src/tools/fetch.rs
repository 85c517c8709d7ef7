use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::html::html_to_text;
use super::{required_param, truncate_output, Tool};
use crate::errors::{ToolError, ToolResult};
use crate::models::content::ToolInput;
use crate::models::tool::{InputSchema, PropertySchema, ToolDescriptor};

const MAX_CONTENT_CHARS: usize = 20_000;

/// Downloads a web page and returns it as readable text
pub struct FetchUrlTool {
    descriptor: ToolDescriptor,
    client: Client,
}

impl FetchUrlTool {
    pub fn new(timeout: Duration) -> ToolResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("agentloop/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::Execution(format!("Failed to build HTTP client: {}", e)))?;

        let descriptor = ToolDescriptor::new(
            "fetch_url",
            "Fetch a web page or text resource over HTTP(S). \
            HTML pages are converted to plain text; JSON and other text formats are returned as-is.",
            InputSchema::new().required_property(
                "url",
                PropertySchema::string("The http:// or https:// URL to fetch."),
            ),
        );

        Ok(Self { descriptor, client })
    }
}

fn parse_url(raw: &str) -> ToolResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ToolError::InvalidParameter(format!("Invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ToolError::InvalidParameter(format!(
            "Unsupported URL scheme '{}'",
            scheme
        ))),
    }
}

enum BodyKind {
    Html,
    Text,
}

fn classify(content_type: &str) -> Option<BodyKind> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "text/html" || mime == "application/xhtml+xml" {
        Some(BodyKind::Html)
    } else if mime.is_empty()
        || mime.starts_with("text/")
        || mime == "application/json"
        || mime == "application/xml"
        || mime.ends_with("+json")
        || mime.ends_with("+xml")
    {
        Some(BodyKind::Text)
    } else {
        None
    }
}

#[async_trait]
impl Tool for FetchUrlTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, parameters: &ToolInput) -> ToolResult<String> {
        let url = parse_url(required_param(parameters, "url")?)?;

        tracing::info!(%url, "fetching url");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ToolError::Execution(format!("Request to {} timed out", url))
            } else {
                ToolError::Execution(format!("Request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Execution(format!("HTTP error: {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let kind = classify(&content_type)
            .ok_or_else(|| ToolError::UnsupportedContentType(content_type.clone()))?;

        let body = response
            .text()
            .await
            .map_err(|e| ToolError::Execution(format!("Failed to read response body: {}", e)))?;

        let text = match kind {
            BodyKind::Html => html_to_text(&body),
            BodyKind::Text => body,
        };

        Ok(truncate_output(text, MAX_CONTENT_CHARS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(body: &str, content_type: &str, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body, content_type))
            .mount(&server)
            .await;
        server
    }

    fn url_input(url: String) -> ToolInput {
        ToolInput::from([("url".to_string(), url)])
    }

    fn tool() -> FetchUrlTool {
        FetchUrlTool::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_html_is_converted() {
        let server = serve(
            "<html><body><h2>Docs</h2><p>Read &amp; learn</p></body></html>",
            "text/html; charset=utf-8",
            200,
        )
        .await;

        let result = tool()
            .execute(&url_input(format!("{}/page", server.uri())))
            .await
            .unwrap();
        assert_eq!(result, "## Docs\n\nRead & learn");
    }

    #[tokio::test]
    async fn test_json_is_returned_verbatim() {
        let server = serve(r#"{"ok": true}"#, "application/json", 200).await;
        let result = tool()
            .execute(&url_input(format!("{}/page", server.uri())))
            .await
            .unwrap();
        assert_eq!(result, r#"{"ok": true}"#);
    }

    #[tokio::test]
    async fn test_binary_content_is_rejected() {
        let server = serve("PNG", "image/png", 200).await;
        let err = tool()
            .execute(&url_input(format!("{}/page", server.uri())))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::UnsupportedContentType("image/png".into()));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = serve("gone", "text/plain", 404).await;
        let err = tool()
            .execute(&url_input(format!("{}/page", server.uri())))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::Execution("HTTP error: 404 Not Found".into()));
    }

    #[tokio::test]
    async fn test_invalid_scheme() {
        let err = tool()
            .execute(&url_input("file:///etc/passwd".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameter(_)));
    }
}
