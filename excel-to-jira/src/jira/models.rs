//! Request and response bodies of the Jira create-issue endpoint

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /rest/api/latest/issue`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIssueRequest {
    pub fields: IssueFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueFields {
    pub summary: String,
    pub description: String,
    pub labels: Vec<String>,
    pub issuetype: NamedRef,
    pub project: ProjectRef,
    pub priority: NamedRef,
    pub assignee: NamedRef,
}

/// Reference to a Jira entity by name (issue type, priority, user)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Reference to a project by key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRef {
    pub key: String,
}

impl ProjectRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Success response; only `key` matters to us
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    /// e.g. "PROJ-123"
    pub key: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

/// Error body Jira sends with 4xx responses
#[derive(Debug, Default, Deserialize)]
pub struct JiraErrorBody {
    #[serde(rename = "errorMessages", default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, serde_json::Value>,
}

impl JiraErrorBody {
    /// One-line rendering, `None` when the body carried no messages
    pub fn summary(&self) -> Option<String> {
        let mut parts: Vec<String> = self.error_messages.clone();
        for (field, message) in &self.errors {
            match message {
                serde_json::Value::String(s) => parts.push(format!("{}: {}", field, s)),
                other => parts.push(format!("{}: {}", field, other)),
            }
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
