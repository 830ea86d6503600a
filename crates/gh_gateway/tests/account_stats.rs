use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use gh_gateway::{GithubGateway, HttpExec};
use http::{Request, Response, StatusCode};
use serde_json::{json, Value};

fn repo(id: i64, stars: i64, forks: i64, private: bool) -> Value {
    json!({
        "id": id,
        "name": format!("repo{id}"),
        "full_name": format!("octo/repo{id}"),
        "private": private,
        "html_url": format!("https://github.com/octo/repo{id}"),
        "description": null,
        "stargazers_count": stars,
        "forks_count": forks,
        "language": "Rust",
        "updated_at": "2024-01-01T00:00:00Z",
        "open_issues_count": 0
    })
}

/// Profile plus a repository list whose order can be flipped per instance.
struct StubAccount {
    repos: Vec<Value>,
}

#[async_trait]
impl HttpExec for StubAccount {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let body = match req.uri().path() {
            "/users/octo" => json!({
                "id": 99,
                "login": "octo",
                "public_repos": self.repos.len()
            }),
            "/users/octo/repos" => Value::Array(self.repos.clone()),
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

/// Profile lookup rejects; the whole stats fetch must default.
struct MissingAccount;

#[async_trait]
impl HttpExec for MissingAccount {
    async fn execute(&self, _req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(json!({"message": "Not Found"}).to_string().into_bytes())
            .unwrap())
    }
}

fn gateway(exec: Arc<dyn HttpExec>) -> GithubGateway {
    GithubGateway::new(exec, None, "repo-dashboard-tests".into())
}

#[tokio::test]
async fn two_repo_scenario_sums_stars_and_splits_visibility() {
    let exec = Arc::new(StubAccount {
        repos: vec![repo(1, 10, 0, false), repo(2, 5, 0, true)],
    });
    let stats = gateway(exec).user_stats("octo").await;

    assert_eq!(stats.total_repos, 2);
    assert_eq!(stats.total_stars, 15);
    assert_eq!(stats.total_forks, 0);
    assert_eq!(stats.public_repos, 1);
    assert_eq!(stats.private_repos, 1);
}

#[tokio::test]
async fn stats_do_not_depend_on_fetch_order() {
    let repos = vec![
        repo(1, 10, 3, false),
        repo(2, 5, 1, true),
        repo(3, 0, 7, false),
    ];
    let mut reversed = repos.clone();
    reversed.reverse();

    let forward = gateway(Arc::new(StubAccount { repos })).user_stats("octo").await;
    let backward = gateway(Arc::new(StubAccount { repos: reversed }))
        .user_stats("octo")
        .await;

    assert_eq!(forward, backward);
    assert_eq!(forward.total_stars, 15);
    assert_eq!(forward.total_forks, 11);
    assert_eq!(forward.public_repos + forward.private_repos, forward.total_repos);
}

#[tokio::test]
async fn unknown_account_defaults_to_zero_stats() {
    let stats = gateway(Arc::new(MissingAccount)).user_stats("octo").await;
    assert_eq!(stats, Default::default());
}
