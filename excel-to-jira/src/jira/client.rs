//! reqwest-backed [`IssueTracker`]

use async_trait::async_trait;
use std::time::Duration;

use super::models::{CreateIssueRequest, CreatedIssue, JiraErrorBody};
use super::{IssueTracker, TrackerError};
use crate::config::JiraConfig;

const CREATE_ISSUE_PATH: &str = "/rest/api/latest/issue";
const BROWSE_PATH: &str = "/browse/";
/// Cap on response text carried into error messages
const MAX_BODY_IN_ERROR: usize = 500;

pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn create_issue_url(&self) -> String {
        format!("{}{}", self.base_url, CREATE_ISSUE_PATH)
    }

    fn build_request(&self, issue: &CreateIssueRequest) -> Result<reqwest::Request, reqwest::Error> {
        self.http
            .post(self.create_issue_url())
            .basic_auth(&self.username, Some(&self.password))
            .json(issue)
            .build()
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn create_issue(&self, issue: &CreateIssueRequest) -> Result<CreatedIssue, TrackerError> {
        let request = self.build_request(issue)?;
        log::debug!("POST {}", request.url());

        let response = self.http.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_create_response(status, &body)
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}{}{}", self.base_url, BROWSE_PATH, key)
    }
}

/// Turn a create-issue response into the created key or an error
fn parse_create_response(status: u16, body: &str) -> Result<CreatedIssue, TrackerError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<JiraErrorBody>(body)
            .ok()
            .and_then(|b| b.summary())
            .unwrap_or_else(|| truncate(body.trim()));
        return Err(TrackerError::Status { status, message });
    }

    let created: CreatedIssue =
        serde_json::from_str(body).map_err(|e| TrackerError::InvalidResponse {
            status,
            message: format!("{} in body '{}'", e, truncate(body.trim())),
        })?;

    if created.key.trim().is_empty() {
        return Err(TrackerError::InvalidResponse {
            status,
            message: "response has an empty issue key".to_string(),
        });
    }

    Ok(created)
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::{IssueFields, NamedRef, ProjectRef};

    fn test_config(url: &str) -> JiraConfig {
        JiraConfig {
            url: url.to_string(),
            username: "alice".to_string(),
            password: "secret".to_string(),
            timeout_secs: 5,
        }
    }

    fn sample_issue() -> CreateIssueRequest {
        CreateIssueRequest {
            fields: IssueFields {
                summary: "Fix bug".into(),
                description: "desc text".into(),
                labels: vec!["bug".into(), "urgent".into()],
                issuetype: NamedRef::new("Bug"),
                project: ProjectRef::new("PROJ"),
                priority: NamedRef::new("High"),
                assignee: NamedRef::new("alice"),
            },
        }
    }

    #[test]
    fn test_urls_tolerate_trailing_slash() {
        let client = JiraClient::new(&test_config("https://jira.example.com/")).unwrap();
        assert_eq!(
            client.create_issue_url(),
            "https://jira.example.com/rest/api/latest/issue"
        );
        assert_eq!(
            client.browse_url("PROJ-42"),
            "https://jira.example.com/browse/PROJ-42"
        );
    }

    #[test]
    fn test_build_request_sets_auth_and_json_body() {
        let client = JiraClient::new(&test_config("https://jira.example.com")).unwrap();
        let request = client.build_request(&sample_issue()).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://jira.example.com/rest/api/latest/issue"
        );

        let headers = request.headers();
        // base64("alice:secret")
        assert_eq!(
            headers.get(reqwest::header::AUTHORIZATION).unwrap(),
            "Basic YWxpY2U6c2VjcmV0"
        );
        assert_eq!(
            headers.get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(json["fields"]["summary"], "Fix bug");
        assert_eq!(json["fields"]["project"]["key"], "PROJ");
        assert_eq!(json["fields"]["labels"], serde_json::json!(["bug", "urgent"]));
    }

    #[test]
    fn test_parse_success_response() {
        let created = parse_create_response(201, r#"{"id":"1","key":"PROJ-42"}"#).unwrap();
        assert_eq!(created.key, "PROJ-42");
    }

    #[test]
    fn test_parse_error_status_uses_jira_messages() {
        let body = r#"{"errorMessages":[],"errors":{"project":"project is required"}}"#;
        let err = parse_create_response(400, body).unwrap_err();
        match err {
            TrackerError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "project: project is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_status_falls_back_to_raw_body() {
        let err = parse_create_response(502, "Bad Gateway").unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(matches!(err, TrackerError::Status { message, .. } if message == "Bad Gateway"));
    }

    #[test]
    fn test_parse_success_without_key_is_invalid() {
        let err = parse_create_response(201, r#"{"id":"1"}"#).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidResponse { status: 201, .. }));

        let err = parse_create_response(200, "<html>login</html>").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidResponse { .. }));

        let err = parse_create_response(201, r#"{"key":""}"#).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidResponse { .. }));
    }

    #[test]
    fn test_truncate_long_bodies() {
        let long = "x".repeat(MAX_BODY_IN_ERROR + 10);
        let short = truncate(&long);
        assert_eq!(short.len(), MAX_BODY_IN_ERROR + 3);
        assert!(short.ends_with("..."));
        assert_eq!(truncate("short"), "short");
    }

    /// Answer a single HTTP request with `status_line` and a JSON `body`
    ///
    /// Returns the base URL to point the client at and a handle yielding the
    /// raw request that was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    /// Headers and the full `Content-Length` body have arrived
    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn test_create_issue_unreachable_host_is_transport_error() {
        let client = JiraClient::new(&test_config("http://127.0.0.1:1")).unwrap();
        let err = client.create_issue(&sample_issue()).await.unwrap_err();
        assert!(matches!(err, TrackerError::Transport(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_create_issue_reports_jira_error_status() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 400 Bad Request",
            r#"{"errorMessages":[],"errors":{"project":"project is required"}}"#,
        )
        .await;
        let client = JiraClient::new(&test_config(&base_url)).unwrap();

        let err = client.create_issue(&sample_issue()).await.unwrap_err();

        assert!(matches!(
            &err,
            TrackerError::Status { status: 400, message } if message == "project: project is required"
        ));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /rest/api/latest/issue HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_create_issue_returns_created_key() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 201 Created",
            r#"{"id":"10000","key":"PROJ-42","self":"http://jira/rest/api/2/issue/10000"}"#,
        )
        .await;
        let client = JiraClient::new(&test_config(&base_url)).unwrap();

        let created = client.create_issue(&sample_issue()).await.unwrap();

        assert_eq!(created.key, "PROJ-42");
        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.contains("authorization: basic ywxpy2u6c2vjcmv0"));
        assert!(request.contains(r#""summary":"fix bug""#));
    }
}
