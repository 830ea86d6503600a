//! Scatter-gather aggregation of one repository's activity: six
//! independent gateway calls joined into a single snapshot, with a pure
//! merge step that can be tested without any networking.

use std::sync::Arc;

use tracing::instrument;

use crate::gateway::GithubGateway;
use crate::models::{
    CommitActivity, CommitRecord, Issue, IssueActivity, ItemState, PullRequest,
    PullRequestActivity, PullRequestState, RepositoryActivity,
};

/// Recent samples keep the first 3 open and first 2 closed entries, in the
/// ordering the API returned them. The bias towards open items is
/// deliberate; this is not a top-5-by-date.
pub const RECENT_OPEN: usize = 3;
pub const RECENT_CLOSED: usize = 2;
pub const RECENT_COMMITS: usize = 5;
/// Cap on the commit fetch. `commits.recent_count` counts this capped
/// list, not the repository's full history.
pub const COMMIT_FETCH_LIMIT: u32 = 20;

pub struct ActivityAggregator {
    gateway: Arc<GithubGateway>,
}

impl ActivityAggregator {
    pub fn new(gateway: Arc<GithubGateway>) -> Self {
        Self { gateway }
    }

    /// One point-in-time snapshot of `owner/repo`.
    ///
    /// All six fetches are issued concurrently and all six complete before
    /// the snapshot is built; there is no short-circuit and no retry. The
    /// function is total: each sub-fetch degrades to its empty default on
    /// failure, so an unreachable repository simply produces the all-zero
    /// `RepositoryActivity::default()`.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, owner: &str, repo: &str) -> RepositoryActivity {
        let (open_prs, closed_prs, open_issues, closed_issues, commits, weekly) = tokio::join!(
            self.gateway.list_pull_requests(owner, repo, ItemState::Open),
            self.gateway.list_pull_requests(owner, repo, ItemState::Closed),
            self.gateway.list_issues(owner, repo, ItemState::Open),
            self.gateway.list_issues(owner, repo, ItemState::Closed),
            self.gateway.list_commits(owner, repo, COMMIT_FETCH_LIMIT),
            self.gateway.weekly_commit_activity(owner, repo),
        );
        merge_snapshot(
            open_prs,
            closed_prs,
            open_issues,
            closed_issues,
            commits,
            weekly,
        )
    }
}

/// The pulls endpoint only filters open/closed; merged is a variant of
/// closed on the wire and is re-derived here.
fn is_merged(pr: &PullRequest) -> bool {
    pr.state == PullRequestState::Merged
}

/// Pure fan-in over the six fetch results.
pub fn merge_snapshot(
    open_prs: Vec<PullRequest>,
    closed_prs: Vec<PullRequest>,
    open_issues: Vec<Issue>,
    closed_issues: Vec<Issue>,
    commits: Vec<CommitRecord>,
    weekly: Vec<i64>,
) -> RepositoryActivity {
    let merged = closed_prs.iter().filter(|pr| is_merged(pr)).count();

    let mut recent_prs = Vec::with_capacity(RECENT_OPEN + RECENT_CLOSED);
    recent_prs.extend(open_prs.iter().take(RECENT_OPEN).cloned());
    recent_prs.extend(closed_prs.iter().take(RECENT_CLOSED).cloned());

    let mut recent_issues = Vec::with_capacity(RECENT_OPEN + RECENT_CLOSED);
    recent_issues.extend(open_issues.iter().take(RECENT_OPEN).cloned());
    recent_issues.extend(closed_issues.iter().take(RECENT_CLOSED).cloned());

    let recent_count = commits.len();
    let recent_commits: Vec<CommitRecord> =
        commits.into_iter().take(RECENT_COMMITS).collect();

    RepositoryActivity {
        pull_requests: PullRequestActivity {
            open: open_prs.len(),
            closed: closed_prs.len() - merged,
            merged,
            recent: recent_prs,
        },
        issues: IssueActivity {
            open: open_issues.len(),
            closed: closed_issues.len(),
            recent: recent_issues,
        },
        commits: CommitActivity {
            recent_count,
            recent: recent_commits,
            weekly,
        },
    }
}
