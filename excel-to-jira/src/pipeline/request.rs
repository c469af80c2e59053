//! RowRecord -> CreateIssueRequest

use crate::jira::{CreateIssueRequest, IssueFields, NamedRef, ProjectRef};

use super::RowRecord;

/// What to do with whitespace around comma-separated labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Keep each token exactly as typed, empty ones included
    #[default]
    Preserve,
    /// Trim each token and drop the ones left empty
    Trim,
}

impl LabelPolicy {
    pub fn from_trim_flag(trim: bool) -> Self {
        if trim { LabelPolicy::Trim } else { LabelPolicy::Preserve }
    }
}

pub fn build_issue_request(record: &RowRecord, labels: LabelPolicy) -> CreateIssueRequest {
    CreateIssueRequest {
        fields: IssueFields {
            summary: record.summary.clone(),
            description: record.description.clone(),
            labels: split_labels(&record.labels, labels),
            issuetype: NamedRef::new(&record.issue_type),
            project: ProjectRef::new(&record.project),
            priority: NamedRef::new(&record.priority),
            assignee: NamedRef::new(&record.assignee),
        },
    }
}

/// Split a labels cell on commas
///
/// Trailing empty tokens are dropped in either mode, so `"a,b,"` gives two
/// labels. Interior and leading empties survive unless trimming is on.
pub fn split_labels(cell: &str, policy: LabelPolicy) -> Vec<String> {
    let mut labels: Vec<String> = match policy {
        LabelPolicy::Preserve => cell.split(',').map(str::to_string).collect(),
        LabelPolicy::Trim => cell
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    };
    while labels.last().is_some_and(|label| label.is_empty()) {
        labels.pop();
    }
    labels
}
