//! Jira REST client for issue creation

pub mod client;
pub mod models;

pub use client::JiraClient;
pub use models::{CreateIssueRequest, CreatedIssue, IssueFields, NamedRef, ProjectRef};

use async_trait::async_trait;
use thiserror::Error;

/// Anything that can create issues and tell where to browse them
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Create one issue and return the tracker's answer
    async fn create_issue(&self, issue: &CreateIssueRequest) -> Result<CreatedIssue, TrackerError>;

    /// Human-facing URL of an issue
    fn browse_url(&self, key: &str) -> String;
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Jira returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response from Jira (HTTP {status}): {message}")]
    InvalidResponse { status: u16, message: String },
}

impl TrackerError {
    /// HTTP status code, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            TrackerError::Transport(e) => e.status().map(|s| s.as_u16()),
            TrackerError::Status { status, .. } | TrackerError::InvalidResponse { status, .. } => {
                Some(*status)
            }
        }
    }
}
