//! Common test helper functions shared across test modules.
//!
//! This module provides reusable utilities for creating test fixtures and mock objects,
//! reducing code duplication across different test suites.
use chrono::{DateTime, Utc};
use secrecy::SecretString;

use crate::{
    config::ReleaseConfig,
    forge::{
        config::RemoteConfig,
        manager::{ForgeManager, ForgeOptions},
        request::{Author, ForgeCommit, Issue, MergeRequest, Tag},
        traits::MockForge,
    },
};

pub const TEST_TAG_REGEX: &str = r"^v\d+\.\d+\.\d+$";

/// Parse an RFC 3339 timestamp.
///
/// # Example
/// ```ignore
/// let at = ts("2024-01-10T00:00:00Z");
/// ```
pub fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .unwrap()
        .with_timezone(&Utc)
}

/// Creates a test RemoteConfig with sensible defaults.
pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        api_endpoint: "https://gitlab.example.com/api/v4".to_string(),
        project_id: "group/project".to_string(),
        token: SecretString::from("test-token".to_string()),
        cookie: None,
    }
}

/// Creates a ReleaseConfig matching `vX.Y.Z` tags.
///
/// # Arguments
/// * `target_branch` - Branch tags must be on, if any
/// * `close_latency_seconds` - Window shift in seconds
pub fn create_test_release_config(
    target_branch: Option<&str>,
    close_latency_seconds: i64,
) -> ReleaseConfig {
    ReleaseConfig::builder()
        .tag_regex(TEST_TAG_REGEX)
        .target_branch(target_branch.unwrap_or_default())
        .close_latency_seconds(close_latency_seconds)
        .build()
        .unwrap()
}

/// MockForge with the remote config expectation every manager needs.
pub fn new_mock_forge() -> MockForge {
    let mut mock_forge = MockForge::new();
    mock_forge
        .expect_remote_config()
        .returning(create_test_remote_config);
    mock_forge
}

/// Wraps a mock in a non dry-run ForgeManager.
pub fn create_test_manager(mock_forge: MockForge) -> ForgeManager {
    ForgeManager::new(Box::new(mock_forge), ForgeOptions::default())
}

pub fn tag(name: &str, sha: &str, committed_at: &str) -> Tag {
    Tag {
        name: name.to_string(),
        commit_sha: sha.to_string(),
        committed_at: ts(committed_at),
        release: None,
    }
}

pub fn merge_request(
    iid: u64,
    labels: &[&str],
    merged_at: Option<&str>,
) -> MergeRequest {
    MergeRequest {
        iid,
        title: format!("Merge request {iid}"),
        web_url: format!(
            "https://gitlab.example.com/group/project/-/merge_requests/{iid}"
        ),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        merged_at: merged_at.map(ts),
        author: Author {
            username: "dev".to_string(),
            web_url: "https://gitlab.example.com/dev".to_string(),
        },
        commits: vec![],
    }
}

pub fn issue(iid: u64, labels: &[&str], closed_at: &str) -> Issue {
    Issue {
        iid,
        title: format!("Issue {iid}"),
        web_url: format!(
            "https://gitlab.example.com/group/project/-/issues/{iid}"
        ),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        closed_at: Some(ts(closed_at)),
    }
}

pub fn commit(short_id: &str, title: &str) -> ForgeCommit {
    ForgeCommit {
        id: format!("{short_id}{short_id}"),
        short_id: short_id.to_string(),
        title: title.to_string(),
        author_name: "dev".to_string(),
        created_at: ts("2024-01-02T00:00:00Z"),
    }
}
