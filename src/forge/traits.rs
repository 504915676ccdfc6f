//! Traits related to remote git forges
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        pager::Pager,
        request::{
            CommitRef, ForgeCommit, Issue, ListIssuesRequest,
            ListMergeRequestsRequest, MergeRequest, Page, Project, Tag,
        },
    },
};

/// Capabilities the release note pipeline needs from a forge.
///
/// Listing methods return a single page; callers drive pagination with
/// [`Pager`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;

    /// Tags in reverse chronological order.
    async fn list_tags(&self, pager: Pager) -> Result<Page<Tag>>;

    async fn list_merge_requests(
        &self,
        req: &ListMergeRequestsRequest,
        pager: Pager,
    ) -> Result<Page<MergeRequest>>;

    async fn list_issues(
        &self,
        req: &ListIssuesRequest,
        pager: Pager,
    ) -> Result<Page<Issue>>;

    /// Branches containing the commit.
    async fn list_commit_refs(&self, sha: &str) -> Result<Vec<CommitRef>>;

    async fn list_merge_request_commits(
        &self,
        iid: u64,
        pager: Pager,
    ) -> Result<Page<ForgeCommit>>;

    async fn get_project(&self) -> Result<Project>;

    async fn create_release(&self, tag_name: &str, notes: &str) -> Result<()>;

    async fn update_release(&self, tag_name: &str, notes: &str) -> Result<()>;
}
