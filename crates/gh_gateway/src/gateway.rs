use std::sync::Arc;

use anyhow::{anyhow, Result};
use http::{header, Request};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::GithubApiError;
use crate::exec::HttpExec;
use crate::models::{
    AccountStats, CommitRecord, Contributor, Issue, ItemState, PullRequest, RepositorySummary,
};
use crate::payloads::{
    CommitPayload, ContributorPayload, IssuePayload, PullPayload, RepoPayload, UserPayload,
};

/// Number of weeks of the commit-activity series the dashboard shows.
pub const WEEKLY_WINDOW: usize = 4;
/// Page size for the repository list backing `user_stats`.
const STATS_PAGE_SIZE: u32 = 100;
const CONTRIBUTORS_PAGE_SIZE: u32 = 10;

/// Authenticated access point to the GitHub REST API.
///
/// Every public method is total: a transport failure, a non-2xx status, or
/// a malformed payload degrades to the method's documented empty value and
/// is reported through a `warn!` event, never to the caller. Partial data
/// beats a cascading failure in a display-only system.
pub struct GithubGateway {
    exec: Arc<dyn HttpExec>,
    base: Url,
    token: Option<String>,
    user_agent: String,
    page_size: u32,
}

impl GithubGateway {
    pub fn new(exec: Arc<dyn HttpExec>, token: Option<String>, user_agent: String) -> Self {
        Self {
            exec,
            base: Url::parse("https://api.github.com/").expect("valid base url"),
            token,
            user_agent,
            page_size: 10,
        }
    }

    pub fn from_config(exec: Arc<dyn HttpExec>, config: &common::config::GithubConfig) -> Self {
        let mut gateway = Self::new(exec, config.token.clone(), config.user_agent.clone());
        gateway.page_size = config.per_page;
        gateway
    }

    /// Repositories of `username`, most recently updated first, at most
    /// `limit` entries. Empty on any failure.
    pub async fn list_user_repositories(
        &self,
        username: &str,
        limit: u32,
    ) -> Vec<RepositorySummary> {
        match self.try_list_user_repositories(username, limit).await {
            Ok(repos) => repos,
            Err(err) => {
                warn!(username, error = ?err, "repository listing failed");
                Vec::new()
            }
        }
    }

    pub async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        state: ItemState,
    ) -> Vec<PullRequest> {
        match self.try_list_pull_requests(owner, repo, state).await {
            Ok(pulls) => pulls,
            Err(err) => {
                warn!(owner, repo, state = state.as_str(), error = ?err, "pull request fetch failed");
                Vec::new()
            }
        }
    }

    /// Issues of `owner/repo`. Entries that are really pull requests are
    /// removed; the REST issues endpoint conflates the two.
    pub async fn list_issues(&self, owner: &str, repo: &str, state: ItemState) -> Vec<Issue> {
        match self.try_list_issues(owner, repo, state).await {
            Ok(issues) => issues,
            Err(err) => {
                warn!(owner, repo, state = state.as_str(), error = ?err, "issue fetch failed");
                Vec::new()
            }
        }
    }

    /// Most recent commits on the default branch, at most `limit`.
    pub async fn list_commits(&self, owner: &str, repo: &str, limit: u32) -> Vec<CommitRecord> {
        match self.try_list_commits(owner, repo, limit).await {
            Ok(commits) => commits,
            Err(err) => {
                warn!(owner, repo, error = ?err, "commit fetch failed");
                Vec::new()
            }
        }
    }

    /// Last four weeks of the 52-week commit-activity series. An absent,
    /// short, or malformed upstream series yields an empty vector; callers
    /// must read fewer-than-four entries as "data unavailable", not as
    /// zero commits.
    pub async fn weekly_commit_activity(&self, owner: &str, repo: &str) -> Vec<i64> {
        match self.try_weekly_commit_activity(owner, repo).await {
            Ok(weeks) => weeks,
            Err(err) => {
                warn!(owner, repo, error = ?err, "weekly activity fetch failed");
                Vec::new()
            }
        }
    }

    /// Aggregate counters over up to 100 of the user's repositories.
    /// All-zero on any failure.
    pub async fn user_stats(&self, username: &str) -> AccountStats {
        match self.try_user_stats(username).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(username, error = ?err, "account stats fetch failed");
                AccountStats::default()
            }
        }
    }

    pub async fn list_contributors(&self, owner: &str, repo: &str) -> Vec<Contributor> {
        match self.try_list_contributors(owner, repo).await {
            Ok(contributors) => contributors,
            Err(err) => {
                warn!(owner, repo, error = ?err, "contributor fetch failed");
                Vec::new()
            }
        }
    }

    async fn try_list_user_repositories(
        &self,
        username: &str,
        limit: u32,
    ) -> Result<Vec<RepositorySummary>> {
        let mut url = self.join(&format!("users/{username}/repos"))?;
        Self::with_query(
            &mut url,
            &[
                ("sort", "updated".to_string()),
                ("per_page", limit.to_string()),
            ],
        );
        let values = self.get_json_array(url).await?;
        let mut repos = Vec::with_capacity(values.len());
        for value in values {
            let payload: RepoPayload = serde_json::from_value(value)?;
            repos.push(RepositorySummary::from_payload(payload));
        }
        Ok(repos)
    }

    async fn try_list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        state: ItemState,
    ) -> Result<Vec<PullRequest>> {
        let mut url = self.join(&format!("repos/{owner}/{repo}/pulls"))?;
        Self::with_query(
            &mut url,
            &[
                ("state", state.as_str().to_string()),
                ("per_page", self.page_size.to_string()),
            ],
        );
        let values = self.get_json_array(url).await?;
        let mut pulls = Vec::with_capacity(values.len());
        for value in values {
            let payload: PullPayload = serde_json::from_value(value)?;
            pulls.push(PullRequest::from_payload(payload));
        }
        Ok(pulls)
    }

    async fn try_list_issues(
        &self,
        owner: &str,
        repo: &str,
        state: ItemState,
    ) -> Result<Vec<Issue>> {
        let mut url = self.join(&format!("repos/{owner}/{repo}/issues"))?;
        Self::with_query(
            &mut url,
            &[
                ("state", state.as_str().to_string()),
                ("per_page", self.page_size.to_string()),
            ],
        );
        let values = self.get_json_array(url).await?;
        let mut issues = Vec::with_capacity(values.len());
        for value in values {
            let payload: IssuePayload = serde_json::from_value(value)?;
            if payload.pull_request.is_some() {
                continue;
            }
            issues.push(Issue::from_payload(payload));
        }
        Ok(issues)
    }

    async fn try_list_commits(
        &self,
        owner: &str,
        repo: &str,
        limit: u32,
    ) -> Result<Vec<CommitRecord>> {
        let mut url = self.join(&format!("repos/{owner}/{repo}/commits"))?;
        Self::with_query(&mut url, &[("per_page", limit.to_string())]);
        let values = self.get_json_array(url).await?;
        let mut commits = Vec::with_capacity(values.len());
        for value in values {
            let payload: CommitPayload = serde_json::from_value(value)?;
            commits.push(CommitRecord::from_payload(payload));
        }
        Ok(commits)
    }

    async fn try_weekly_commit_activity(&self, owner: &str, repo: &str) -> Result<Vec<i64>> {
        let url = self.join(&format!("repos/{owner}/{repo}/stats/commit_activity"))?;
        let value = self.get_json(url).await?;
        // GitHub answers 202 with a non-array body while the series is
        // still being computed; treat anything but a full series as absent.
        let Some(weeks) = value.as_array() else {
            return Ok(Vec::new());
        };
        if weeks.len() < WEEKLY_WINDOW {
            return Ok(Vec::new());
        }
        Ok(weeks[weeks.len() - WEEKLY_WINDOW..]
            .iter()
            .map(|week| week.get("total").and_then(Value::as_i64).unwrap_or(0))
            .collect())
    }

    async fn try_user_stats(&self, username: &str) -> Result<AccountStats> {
        // The profile fetch validates the account; the counters fold over
        // the repository list.
        let profile = self.get_json(self.join(&format!("users/{username}"))?).await?;
        let _profile: UserPayload = serde_json::from_value(profile)?;

        let mut url = self.join(&format!("users/{username}/repos"))?;
        Self::with_query(&mut url, &[("per_page", STATS_PAGE_SIZE.to_string())]);
        let values = self.get_json_array(url).await?;
        let mut repos = Vec::with_capacity(values.len());
        for value in values {
            let payload: RepoPayload = serde_json::from_value(value)?;
            repos.push(RepositorySummary::from_payload(payload));
        }
        Ok(AccountStats::from_repositories(&repos))
    }

    async fn try_list_contributors(&self, owner: &str, repo: &str) -> Result<Vec<Contributor>> {
        let mut url = self.join(&format!("repos/{owner}/{repo}/contributors"))?;
        Self::with_query(&mut url, &[("per_page", CONTRIBUTORS_PAGE_SIZE.to_string())]);
        let values = self.get_json_array(url).await?;
        let mut contributors = Vec::with_capacity(values.len());
        for value in values {
            let payload: ContributorPayload = serde_json::from_value(value)?;
            contributors.push(Contributor {
                login: payload.login,
                contributions: payload.contributions,
                avatar_url: payload.avatar_url,
            });
        }
        Ok(contributors)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, "dispatching github request");
        let response = self.execute(url).await?;
        let status = response.status();
        if status.is_success() {
            let value: Value = serde_json::from_slice(response.body())?;
            Ok(value)
        } else {
            Err(GithubApiError::status(status, endpoint).into())
        }
    }

    async fn get_json_array(&self, url: Url) -> Result<Vec<Value>> {
        let value = self.get_json(url).await?;
        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(anyhow!("expected array response")),
        }
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn execute(&self, url: Url) -> Result<http::Response<Vec<u8>>> {
        let uri: http::Uri = url.as_str().parse()?;
        let mut builder = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::USER_AGENT, self.user_agent.clone())
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.body(Vec::new())?;
        self.exec.execute(request).await
    }

    fn join(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }
}
