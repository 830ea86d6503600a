//! Domain projections of the GitHub payloads. Every type here is a
//! point-in-time snapshot of remote state; nothing is cached or mutated
//! after shaping, and every aggregate has a zeroed `Default` standing in
//! for failed fetches.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::payloads::{CommitPayload, IssuePayload, PullPayload, RepoPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Open,
    Closed,
    All,
}

impl ItemState {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
            ItemState::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositorySummary {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub stars: i64,
    pub forks: i64,
    pub open_issues: i64,
}

impl RepositorySummary {
    pub fn from_payload(payload: RepoPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            full_name: payload.full_name,
            private: payload.private,
            html_url: payload.html_url,
            description: payload.description,
            language: payload.language,
            updated_at: payload.updated_at,
            stars: payload.stargazers_count,
            forks: payload.forks_count,
            open_issues: payload.open_issues_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequest {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub state: PullRequestState,
    pub created_at: DateTime<Utc>,
    pub author: Option<String>,
    pub html_url: String,
}

impl PullRequest {
    /// The list endpoint reports merged pull requests as `closed`; the
    /// merge timestamp is what distinguishes the two.
    pub fn from_payload(payload: PullPayload) -> Self {
        let state = if payload.merged_at.is_some() {
            PullRequestState::Merged
        } else if payload.state == "open" {
            PullRequestState::Open
        } else {
            PullRequestState::Closed
        };
        Self {
            id: payload.id,
            number: payload.number,
            title: payload.title,
            state,
            created_at: payload.created_at,
            author: payload.user.map(|user| user.login),
            html_url: payload.html_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub author: Option<String>,
    pub labels: Vec<Label>,
    pub html_url: String,
}

impl Issue {
    pub fn from_payload(payload: IssuePayload) -> Self {
        let state = if payload.state == "open" {
            IssueState::Open
        } else {
            IssueState::Closed
        };
        Self {
            id: payload.id,
            number: payload.number,
            title: payload.title,
            state,
            created_at: payload.created_at,
            author: payload.user.map(|user| user.login),
            labels: payload
                .labels
                .into_iter()
                .map(|label| Label {
                    name: label.name,
                    color: label.color,
                })
                .collect(),
            html_url: payload.html_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitRecord {
    pub sha: String,
    /// Linked-account login, falling back to the raw commit author name.
    pub author: String,
    pub committed_at: Option<DateTime<Utc>>,
    /// First line of the commit message.
    pub summary: String,
    pub html_url: String,
}

impl CommitRecord {
    pub fn from_payload(payload: CommitPayload) -> Self {
        let author = payload
            .author
            .map(|user| user.login)
            .or_else(|| {
                payload
                    .commit
                    .author
                    .as_ref()
                    .map(|author| author.name.clone())
            })
            .unwrap_or_default();
        let summary = payload
            .commit
            .message
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            sha: payload.sha,
            author,
            committed_at: payload.commit.author.and_then(|author| author.date),
            summary,
            html_url: payload.html_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: i64,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountStats {
    pub total_repos: usize,
    pub total_stars: i64,
    pub total_forks: i64,
    pub public_repos: usize,
    pub private_repos: usize,
}

impl AccountStats {
    /// Associative, commutative fold; the result does not depend on the
    /// order repositories were fetched in.
    pub fn from_repositories(repos: &[RepositorySummary]) -> Self {
        let mut stats = Self {
            total_repos: repos.len(),
            ..Self::default()
        };
        for repo in repos {
            stats.total_stars += repo.stars;
            stats.total_forks += repo.forks;
            if repo.private {
                stats.private_repos += 1;
            } else {
                stats.public_repos += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PullRequestActivity {
    pub open: usize,
    pub closed: usize,
    pub merged: usize,
    pub recent: Vec<PullRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueActivity {
    pub open: usize,
    pub closed: usize,
    pub recent: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitActivity {
    /// Count of the capped fetch, not the repository's full history.
    pub recent_count: usize,
    pub recent: Vec<CommitRecord>,
    /// Commits per week over the last four weeks; empty when the upstream
    /// series was unavailable.
    pub weekly: Vec<i64>,
}

/// One repository's activity snapshot. `Default` is the documented
/// all-zero fallback used when every fetch fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepositoryActivity {
    pub pull_requests: PullRequestActivity,
    pub issues: IssueActivity,
    pub commits: CommitActivity,
}
