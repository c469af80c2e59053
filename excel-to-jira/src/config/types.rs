use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Logical field names understood by the row reader
pub mod fields {
    pub const SUMMARY: &str = "summary";
    pub const DESCRIPTION: &str = "description";
    pub const LABELS: &str = "labels";
    pub const ISSUE_TYPE: &str = "issuetype";
    pub const PROJECT: &str = "project";
    pub const PRIORITY: &str = "priority";
    pub const ASSIGNEE: &str = "assignee";
    /// Column that receives the created issue key
    pub const ID: &str = "id";

    /// Every field a row needs, in extraction order
    pub const ALL: [&str; 8] = [
        SUMMARY,
        DESCRIPTION,
        LABELS,
        ISSUE_TYPE,
        PROJECT,
        PRIORITY,
        ASSIGNEE,
        ID,
    ];
}

/// Root configuration, loaded once at startup
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub excel: ExcelConfig,
    pub jira: JiraConfig,
    pub field_mapping: FieldMapping,
}

/// Spreadsheet location and the row window to process
#[derive(Debug, Clone, Deserialize)]
pub struct ExcelConfig {
    /// Workbook that is read and then overwritten in place
    pub path: PathBuf,
    /// First row to process (zero-based), usually 1 to skip the header
    pub skip_rows: u32,
    /// Exclusive upper bound of the processed rows
    pub limit_rows: u32,
    /// Trim whitespace around each label after splitting on commas
    #[serde(default)]
    pub trim_labels: bool,
}

impl ExcelConfig {
    pub fn rows(&self) -> std::ops::Range<u32> {
        self.skip_rows..self.limit_rows
    }
}

/// Jira instance and credentials
#[derive(Clone, Deserialize)]
pub struct JiraConfig {
    /// Base URL, e.g. "https://jira.example.com"
    pub url: String,
    #[serde(default)]
    pub username: String,
    /// Password or API token
    #[serde(default)]
    pub password: String,
    /// Upper bound for a single create call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Logical field name -> zero-based column index
///
/// Columns are fixed per field; header text is never consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<String, u16>);

impl FieldMapping {
    pub fn column(&self, field: &str) -> Option<u16> {
        self.0.get(field).copied()
    }

    /// Known fields that have no column assigned
    pub fn unmapped(&self) -> Vec<&'static str> {
        fields::ALL
            .iter()
            .copied()
            .filter(|f| !self.0.contains_key(*f))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, u16)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (S, u16)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
