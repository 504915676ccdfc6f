//! Normalized request and response types shared by all forge adapters.
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Release already attached to a tag.
pub struct TagRelease {
    pub tag_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents a repository tag
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
    pub committed_at: DateTime<Utc>,
    /// Existing release for this tag, if one has been published
    pub release: Option<TagRelease>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Branch (or tag) reference that contains a commit.
pub struct CommitRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub username: String,
    pub web_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents a normalized commit returned from any forge
pub struct ForgeCommit {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    pub iid: u64,
    pub title: String,
    pub web_url: String,
    pub labels: Vec<String>,
    pub merged_at: Option<DateTime<Utc>>,
    pub author: Author,
    /// Only populated when commit detail is enabled
    pub commits: Vec<ForgeCommit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub iid: u64,
    pub title: String,
    pub web_url: String,
    pub labels: Vec<String>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Repository metadata.
pub struct Project {
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRequestState {
    Merged,
}

impl MergeRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merged => "merged",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to list merge requests updated within a time range.
pub struct ListMergeRequestsRequest {
    pub state: MergeRequestState,
    pub updated_after: DateTime<Utc>,
    pub updated_before: DateTime<Utc>,
    pub target_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to list issues updated within a time range.
pub struct ListIssuesRequest {
    pub state: IssueState,
    pub updated_after: DateTime<Utc>,
    pub updated_before: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One page of a paginated listing along with the server's next page hint.
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// Page with no successor.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }

    pub fn with_next(items: Vec<T>, next_page: u32) -> Self {
        Self {
            items,
            next_page: Some(next_page),
        }
    }
}
