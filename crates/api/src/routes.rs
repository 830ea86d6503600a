use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use gh_gateway::models::{
    AccountStats, Contributor, ItemState, PullRequest, RepositoryActivity, RepositorySummary,
};
use gh_gateway::{ActivityAggregator, GithubGateway};
use local_status::{LocalStatusSource, RepoInfo};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

pub struct ApiState {
    pub gateway: Arc<GithubGateway>,
    pub aggregator: ActivityAggregator,
    pub local: Arc<dyn LocalStatusSource>,
    pub local_paths: Vec<String>,
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/github/users/:user/repos", get(list_user_repos))
        .route("/github/users/:user/stats", get(user_stats))
        .route("/github/repos/:owner/:repo/activity", get(repo_activity))
        .route("/github/repos/:owner/:repo/pulls", get(repo_pulls))
        .route(
            "/github/repos/:owner/:repo/contributors",
            get(repo_contributors),
        )
        .route("/local/status", get(local_repo_status))
        .route("/local/repos", get(local_repos))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct RepoListQuery {
    limit: Option<u32>,
}

#[instrument(skip(state))]
async fn list_user_repos(
    State(state): State<Arc<ApiState>>,
    Path(user): Path<String>,
    Query(query): Query<RepoListQuery>,
) -> Json<Vec<RepositorySummary>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    Json(state.gateway.list_user_repositories(&user, limit).await)
}

#[instrument(skip(state))]
async fn user_stats(
    State(state): State<Arc<ApiState>>,
    Path(user): Path<String>,
) -> Json<AccountStats> {
    Json(state.gateway.user_stats(&user).await)
}

#[instrument(skip(state))]
async fn repo_activity(
    State(state): State<Arc<ApiState>>,
    Path((owner, repo)): Path<(String, String)>,
) -> Json<RepositoryActivity> {
    Json(state.aggregator.snapshot(&owner, &repo).await)
}

#[derive(Debug, Deserialize)]
struct PullsQuery {
    state: Option<String>,
}

#[instrument(skip(state))]
async fn repo_pulls(
    State(state): State<Arc<ApiState>>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<PullsQuery>,
) -> Json<Vec<PullRequest>> {
    let filter = match query.state.as_deref() {
        Some("closed") => ItemState::Closed,
        Some("all") => ItemState::All,
        _ => ItemState::Open,
    };
    Json(state.gateway.list_pull_requests(&owner, &repo, filter).await)
}

#[instrument(skip(state))]
async fn repo_contributors(
    State(state): State<Arc<ApiState>>,
    Path((owner, repo)): Path<(String, String)>,
) -> Json<Vec<Contributor>> {
    Json(state.gateway.list_contributors(&owner, &repo).await)
}

#[derive(Debug, Deserialize)]
struct LocalStatusQuery {
    path: Option<String>,
}

#[instrument(skip(state))]
async fn local_repo_status(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LocalStatusQuery>,
) -> Json<RepoInfo> {
    let path = query.path.as_deref().unwrap_or(".");
    Json(state.local.repo_info(path).await)
}

#[instrument(skip(state))]
async fn local_repos(State(state): State<Arc<ApiState>>) -> Json<Vec<RepoInfo>> {
    Json(state.local.list_repos(&state.local_paths).await)
}
