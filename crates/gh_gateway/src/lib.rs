pub mod activity;
pub mod error;
pub mod exec;
pub mod gateway;
pub mod models;
pub mod payloads;

pub use activity::{merge_snapshot, ActivityAggregator};
pub use error::GithubApiError;
pub use exec::{HttpExec, ReqwestExecutor};
pub use gateway::GithubGateway;
