pub mod fill;
pub mod history;
pub mod init;

use crate::dispatch::HttpDispatcher;
use crate::guard::{GuardPolicy, SubmissionGuard};
use crate::models::RsvpConfig;
use crate::session::RsvpSession;
use crate::state::{JsonFileStore, SystemClock};
use crate::Result;
use std::sync::Arc;

/// Guard backed by the configured on-disk submission log
pub fn build_guard(config: &RsvpConfig) -> Result<SubmissionGuard> {
    let store = Arc::new(JsonFileStore::new(config.store_path()));
    let policy = GuardPolicy::try_from(&config.submission)?;
    Ok(SubmissionGuard::new(store, policy))
}

/// Session wired to the real clock, store and endpoint
pub fn build_session(config: &RsvpConfig, endpoint: Option<&str>) -> Result<RsvpSession> {
    let endpoint = endpoint.unwrap_or(&config.submission.endpoint);
    tracing::debug!(endpoint, store = %config.store_path().display(), "building session");

    Ok(RsvpSession::new(
        build_guard(config)?,
        Arc::new(HttpDispatcher::new(endpoint)),
        Arc::new(SystemClock),
        config.submission.token.clone(),
    ))
}
