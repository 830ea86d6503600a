//! Local repository status collaborator. The dashboard treats this as an
//! injected data source with a fixed shape; the bundled implementation
//! returns canned data and performs no git interaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoStatus {
    pub branch: String,
    pub ahead: u32,
    pub behind: u32,
    pub staged: u32,
    pub unstaged: u32,
    pub untracked: u32,
    pub clean: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalCommit {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoInfo {
    pub name: String,
    pub path: String,
    pub status: RepoStatus,
    pub recent_commits: Vec<LocalCommit>,
    pub remote_url: Option<String>,
    pub is_git_repo: bool,
}

#[async_trait]
pub trait LocalStatusSource: Send + Sync {
    async fn repo_info(&self, path: &str) -> RepoInfo;

    async fn list_repos(&self, paths: &[String]) -> Vec<RepoInfo> {
        let mut infos = Vec::with_capacity(paths.len());
        for path in paths {
            infos.push(self.repo_info(path).await);
        }
        infos
    }
}

/// Canned status source standing in for a real git backend.
#[derive(Debug, Default)]
pub struct FixedStatusSource;

#[async_trait]
impl LocalStatusSource for FixedStatusSource {
    async fn repo_info(&self, path: &str) -> RepoInfo {
        RepoInfo {
            name: "repo-dashboard".to_string(),
            path: path.to_string(),
            status: RepoStatus {
                branch: "main".to_string(),
                ahead: 0,
                behind: 0,
                staged: 0,
                unstaged: 0,
                untracked: 0,
                clean: true,
            },
            recent_commits: vec![LocalCommit {
                hash: "1d7ba0a".to_string(),
                message: "Add dashboard service with themeable status cards".to_string(),
                author: "User".to_string(),
                date: Utc::now(),
            }],
            remote_url: Some("https://github.com/user/repo-dashboard.git".to_string()),
            is_git_repo: true,
        }
    }
}
