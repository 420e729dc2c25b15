use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::chat::{ChatRequest, ChatResponse};
use crate::config::Endpoints;
use crate::issue::Issue;

/// The two server endpoints the viewer talks to.
#[async_trait]
pub trait IssueApi: Send + Sync {
    async fn list_issues(&self) -> Result<Vec<Issue>>;
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpIssueApi {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpIssueApi {
    pub fn new(endpoints: &Endpoints) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("issuedeck"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = endpoints.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoints: endpoints.clone(),
        })
    }
}

#[async_trait]
impl IssueApi for HttpIssueApi {
    async fn list_issues(&self) -> Result<Vec<Issue>> {
        debug!(url = %self.endpoints.issues_url, "fetching issues");
        let response = self.client.get(&self.endpoints.issues_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "issue list request failed");
            return Err(match serde_json::from_str::<ErrorBody>(&body) {
                Ok(payload) => anyhow!("server returned {}: {}", status, payload.error),
                Err(_) => anyhow!("server returned {}", status),
            });
        }

        let body = response.text().await?;
        let issues = serde_json::from_str::<Vec<Issue>>(&body)
            .context("Failed to parse issue list")?;
        debug!(count = issues.len(), "fetched issues");
        Ok(issues)
    }

    /// Error statuses still carry a JSON body with an `error` field, so the
    /// body is decoded regardless of status.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(url = %self.endpoints.chat_url, issues = request.csv_data.len(), "sending chat");
        let response = self
            .client
            .post(&self.endpoints.chat_url)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let reply = response
            .json::<ChatResponse>()
            .await
            .with_context(|| format!("Failed to decode chat response ({})", status))?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpIssueApi, IssueApi};
    use crate::chat::{ChatReply, ChatRequest};
    use crate::config::Endpoints;
    use crate::issue::FieldValue;
    use anyhow::{Result, anyhow};
    use std::thread;
    use tiny_http::{Header, Response, Server};

    fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
        Response::from_string(body)
            .with_status_code(status)
            .with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            )
    }

    fn endpoints(server: &Server) -> Endpoints {
        let base = format!("http://{}", server.server_addr());
        Endpoints {
            issues_url: format!("{}/get_csv_data", base),
            chat_url: format!("{}/chat", base),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn list_issues_decodes_export() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let api = HttpIssueApi::new(&endpoints(&server))?;

        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            assert_eq!(request.url(), "/get_csv_data");
            let body = r#"[{"key":"AX-1","severity":"CRITICAL","line":42.0,"tags":"a, b"}]"#;
            request
                .respond(json_response(body, 200))
                .expect("response should succeed");
        });

        let issues = api.list_issues().await?;
        handle.join().expect("server thread should join");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key_text().as_deref(), Some("AX-1"));
        assert_eq!(
            issues[0].line.as_ref().and_then(FieldValue::display).as_deref(),
            Some("42")
        );
        Ok(())
    }

    #[tokio::test]
    async fn list_issues_reports_server_error_message() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let api = HttpIssueApi::new(&endpoints(&server))?;

        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            request
                .respond(json_response(r#"{"error":"No CSV file available"}"#, 404))
                .expect("response should succeed");
        });

        let error = api.list_issues().await.expect_err("should fail");
        handle.join().expect("server thread should join");
        let message = error.to_string();
        assert!(message.contains("404"), "{message}");
        assert!(message.contains("No CSV file available"), "{message}");
        Ok(())
    }

    #[tokio::test]
    async fn chat_posts_message_with_issue_context() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let api = HttpIssueApi::new(&endpoints(&server))?;

        let handle = thread::spawn(move || {
            let mut request = server.recv().expect("request expected");
            assert_eq!(request.url(), "/chat");
            let mut body = String::new();
            request
                .as_reader()
                .read_to_string(&mut body)
                .expect("read body");
            let payload: serde_json::Value = serde_json::from_str(&body).expect("json body");
            assert_eq!(payload["message"], "explain");
            assert_eq!(payload["csvData"][0]["key"], "AX-1");
            request
                .respond(json_response(
                    r#"{"response":"<p>Because</p>","original_markdown":"**Because**"}"#,
                    200,
                ))
                .expect("response should succeed");
        });

        let request = ChatRequest {
            message: "explain".to_string(),
            csv_data: vec![crate::issue::Issue {
                key: Some(FieldValue::from("AX-1")),
                ..Default::default()
            }],
        };
        let reply = api.chat(&request).await?.into_reply();
        handle.join().expect("server thread should join");
        assert_eq!(reply, ChatReply::Answer("**Because**".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn chat_error_body_is_decoded_on_failure_status() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let api = HttpIssueApi::new(&endpoints(&server))?;

        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            request
                .respond(json_response(r#"{"error":"model unavailable"}"#, 500))
                .expect("response should succeed");
        });

        let reply = api
            .chat(&ChatRequest {
                message: "hi".to_string(),
                csv_data: Vec::new(),
            })
            .await?
            .into_reply();
        handle.join().expect("server thread should join");
        assert_eq!(reply, ChatReply::Rejected("model unavailable".to_string()));
        Ok(())
    }
}
