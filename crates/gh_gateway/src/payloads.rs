//! Wire shapes for the GitHub REST API. Deserialization is tolerant of
//! missing optional fields so one odd entry does not poison a whole page.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RepoPayload {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    pub language: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub open_issues_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullPayload {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    pub state: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelPayload {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// The issues endpoint also returns pull requests; `pull_request` is the
/// marker the gateway filters on.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub user: Option<UserRef>,
    #[serde(default)]
    pub labels: Vec<LabelPayload>,
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthorPayload {
    pub name: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetailPayload {
    pub author: Option<CommitAuthorPayload>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitPayload {
    pub sha: String,
    pub commit: CommitDetailPayload,
    /// Linked account, when GitHub could match the commit email.
    pub author: Option<UserRef>,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: i64,
    pub login: String,
    pub public_repos: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributorPayload {
    pub login: String,
    #[serde(default)]
    pub contributions: i64,
    #[serde(default)]
    pub avatar_url: String,
}
