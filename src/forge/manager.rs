//! Manager that wraps forge implementations
use log::*;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        pager::{Pager, collect_all},
        request::{
            CommitRef, ForgeCommit, Issue, ListIssuesRequest,
            ListMergeRequestsRequest, MergeRequest, Page, Project, Tag,
        },
        traits::Forge,
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ForgeOptions {
    pub dry_run: bool,
}

/// Whether publishing created a new release or replaced the notes of an
/// existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Updated,
}

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
    options: ForgeOptions,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>, options: ForgeOptions) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
            options,
        }
    }

    pub async fn list_tags(&self, pager: Pager) -> Result<Page<Tag>> {
        debug!(
            "listing tags for project {}: page {}",
            self.remote_config.project_id,
            pager.page()
        );
        self.forge.list_tags(pager).await
    }

    pub async fn list_commit_refs(&self, sha: &str) -> Result<Vec<CommitRef>> {
        debug!("listing branches containing commit {sha}");
        self.forge.list_commit_refs(sha).await
    }

    pub async fn get_project(&self) -> Result<Project> {
        self.forge.get_project().await
    }

    /// Every merge request matching the request, across all pages.
    pub async fn get_all_merge_requests(
        &self,
        req: &ListMergeRequestsRequest,
        per_page: u32,
    ) -> Result<Vec<MergeRequest>> {
        debug!("listing merge requests: {:?}", req);
        collect_all(Pager::with_per_page(per_page), |pager| {
            self.forge.list_merge_requests(req, pager)
        })
        .await
    }

    /// Every issue matching the request, across all pages.
    pub async fn get_all_issues(
        &self,
        req: &ListIssuesRequest,
        per_page: u32,
    ) -> Result<Vec<Issue>> {
        debug!("listing issues: {:?}", req);
        collect_all(Pager::with_per_page(per_page), |pager| {
            self.forge.list_issues(req, pager)
        })
        .await
    }

    /// Every commit of a merge request, across all pages.
    pub async fn get_all_merge_request_commits(
        &self,
        iid: u64,
        per_page: u32,
    ) -> Result<Vec<ForgeCommit>> {
        debug!("listing commits for merge request !{iid}");
        collect_all(Pager::with_per_page(per_page), |pager| {
            self.forge.list_merge_request_commits(iid, pager)
        })
        .await
    }

    /// Publish notes for a tag, updating its release when one already
    /// exists and creating one otherwise.
    pub async fn publish_release(
        &self,
        tag: &Tag,
        notes: &str,
    ) -> Result<PublishOutcome> {
        let outcome = if tag.release.is_some() {
            PublishOutcome::Updated
        } else {
            PublishOutcome::Created
        };

        if self.options.dry_run {
            warn!(
                "dry_run: would {} release: tag: {}, notes: {notes}",
                match outcome {
                    PublishOutcome::Created => "create",
                    PublishOutcome::Updated => "update",
                },
                tag.name
            );
            return Ok(outcome);
        }

        match outcome {
            PublishOutcome::Created => {
                info!("creating release for tag {}", tag.name);
                self.forge.create_release(&tag.name, notes).await?;
            }
            PublishOutcome::Updated => {
                info!("updating release for tag {}", tag.name);
                self.forge.update_release(&tag.name, notes).await?;
            }
        }

        Ok(outcome)
    }
}
