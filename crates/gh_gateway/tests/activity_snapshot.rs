use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use gh_gateway::models::{PullRequestState, RepositoryActivity};
use gh_gateway::{ActivityAggregator, GithubGateway, HttpExec};
use http::{Request, Response, StatusCode};
use serde_json::{json, Value};

/// Serves a canned GitHub API keyed on path and the `state` filter.
struct CannedGithub;

fn pull(id: i64, state: &str, merged: bool) -> Value {
    json!({
        "id": id,
        "number": id,
        "title": format!("pull {id}"),
        "html_url": format!("https://github.com/octo/site/pull/{id}"),
        "state": state,
        "merged_at": if merged { json!("2024-03-01T12:00:00Z") } else { Value::Null },
        "created_at": "2024-02-01T00:00:00Z",
        "user": {"login": "alice"}
    })
}

fn issue(id: i64, state: &str) -> Value {
    json!({
        "id": id,
        "number": id,
        "title": format!("issue {id}"),
        "html_url": format!("https://github.com/octo/site/issues/{id}"),
        "state": state,
        "created_at": "2024-02-02T00:00:00Z",
        "user": {"login": "bob"},
        "labels": []
    })
}

fn commit(n: usize) -> Value {
    json!({
        "sha": format!("{n:040}"),
        "commit": {
            "author": {"name": "Jane Doe", "date": "2024-02-03T00:00:00Z"},
            "message": format!("commit {n}\n\nbody")
        },
        "author": {"login": "janed"},
        "html_url": format!("https://github.com/octo/site/commit/{n:040}")
    })
}

#[async_trait]
impl HttpExec for CannedGithub {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let path = req.uri().path().to_string();
        let query = req.uri().query().unwrap_or("").to_string();
        let open = query.contains("state=open");
        let body = match path.as_str() {
            "/repos/octo/site/pulls" => {
                if open {
                    Value::Array((1..=4).map(|id| pull(id, "open", false)).collect())
                } else {
                    // Three closed on the wire, two of them merged.
                    json!([
                        pull(10, "closed", true),
                        pull(11, "closed", false),
                        pull(12, "closed", true),
                    ])
                }
            }
            "/repos/octo/site/issues" => {
                if open {
                    json!([issue(20, "open"), issue(21, "open"), issue(22, "open"), issue(23, "open")])
                } else {
                    json!([issue(30, "closed"), issue(31, "closed"), issue(32, "closed")])
                }
            }
            "/repos/octo/site/commits" => {
                Value::Array((0..7).map(commit).collect())
            }
            "/repos/octo/site/stats/commit_activity" => {
                Value::Array((0..52).map(|n| json!({"total": n % 10, "week": n})).collect())
            }
            _ => {
                return Ok(Response::builder()
                    .status(StatusCode::NOT_FOUND)
                    .body(json!({"message": "Not Found"}).to_string().into_bytes())
                    .unwrap())
            }
        };
        Ok(Response::builder()
            .status(StatusCode::OK)
            .body(body.to_string().into_bytes())
            .unwrap())
    }
}

struct DeadGithub;

#[async_trait]
impl HttpExec for DeadGithub {
    async fn execute(&self, _req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        Err(anyhow!("network unreachable"))
    }
}

fn aggregator(exec: Arc<dyn HttpExec>) -> ActivityAggregator {
    let gateway = Arc::new(GithubGateway::new(exec, None, "repo-dashboard-tests".into()));
    ActivityAggregator::new(gateway)
}

#[tokio::test]
async fn snapshot_reclassifies_merged_and_keeps_counts_consistent() {
    let snapshot = aggregator(Arc::new(CannedGithub)).snapshot("octo", "site").await;

    assert_eq!(snapshot.pull_requests.open, 4);
    assert_eq!(snapshot.pull_requests.closed, 1);
    assert_eq!(snapshot.pull_requests.merged, 2);
    // closed_raw = closed + merged
    assert_eq!(
        snapshot.pull_requests.closed + snapshot.pull_requests.merged,
        3
    );
}

#[tokio::test]
async fn snapshot_recent_lists_obey_the_three_two_bias() {
    let snapshot = aggregator(Arc::new(CannedGithub)).snapshot("octo", "site").await;

    let recent = &snapshot.pull_requests.recent;
    assert_eq!(recent.len(), 5);
    let open_count = recent
        .iter()
        .filter(|pr| pr.state == PullRequestState::Open)
        .count();
    assert_eq!(open_count, 3);
    assert_eq!(recent.len() - open_count, 2);
    // API-default ordering, not re-sorted
    assert_eq!(recent[0].id, 1);
    assert_eq!(recent[3].id, 10);

    assert_eq!(snapshot.issues.open, 4);
    assert_eq!(snapshot.issues.closed, 3);
    assert_eq!(snapshot.issues.recent.len(), 5);
}

#[tokio::test]
async fn snapshot_commit_sample_and_weekly_window() {
    let snapshot = aggregator(Arc::new(CannedGithub)).snapshot("octo", "site").await;

    assert_eq!(snapshot.commits.recent_count, 7);
    assert_eq!(snapshot.commits.recent.len(), 5);
    assert_eq!(snapshot.commits.recent[0].author, "janed");
    assert_eq!(snapshot.commits.recent[0].summary, "commit 0");
    assert_eq!(snapshot.commits.weekly.len(), 4);
    assert_eq!(snapshot.commits.weekly, vec![8, 9, 0, 1]);
}

#[tokio::test]
async fn total_failure_yields_the_exact_zero_snapshot() {
    let snapshot = aggregator(Arc::new(DeadGithub)).snapshot("octo", "gone").await;
    assert_eq!(snapshot, RepositoryActivity::default());
    assert_eq!(snapshot.pull_requests.open, 0);
    assert!(snapshot.pull_requests.recent.is_empty());
    assert!(snapshot.issues.recent.is_empty());
    assert!(snapshot.commits.weekly.is_empty());
}

#[tokio::test]
async fn unknown_repository_also_yields_the_zero_snapshot() {
    let snapshot = aggregator(Arc::new(CannedGithub)).snapshot("octo", "missing").await;
    assert_eq!(snapshot, RepositoryActivity::default());
}
