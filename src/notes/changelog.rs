//! Collects the merge requests and issues completed inside a release window.
use log::*;

use crate::{
    Result,
    config::ReleaseConfig,
    forge::{
        manager::ForgeManager,
        request::{
            Issue, IssueState, ListIssuesRequest, ListMergeRequestsRequest,
            MergeRequest, MergeRequestState,
        },
    },
    notes::tags::ReleaseWindow,
};

/// Merge requests and issues that belong to one release, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    pub merge_requests: Vec<MergeRequest>,
    pub issues: Vec<Issue>,
}

impl Changelog {
    pub fn is_empty(&self) -> bool {
        self.merge_requests.is_empty() && self.issues.is_empty()
    }
}

pub struct ChangelogFetcher<'a> {
    forge: &'a ForgeManager,
    config: &'a ReleaseConfig,
}

impl<'a> ChangelogFetcher<'a> {
    pub fn new(forge: &'a ForgeManager, config: &'a ReleaseConfig) -> Self {
        Self { forge, config }
    }

    /// Fetch everything updated inside the window, then keep only items
    /// merged or closed strictly inside it. The server filters on update
    /// time, which is later than (or equal to) the completion time we care
    /// about.
    pub async fn fetch_changelog(
        &self,
        window: &ReleaseWindow,
    ) -> Result<Changelog> {
        let merge_requests = self.fetch_merge_requests(window).await?;
        let issues = self.fetch_issues(window).await?;

        info!(
            "found {} merge request(s) and {} issue(s) between {} and {}",
            merge_requests.len(),
            issues.len(),
            window.start,
            window.end
        );

        Ok(Changelog {
            merge_requests,
            issues,
        })
    }

    async fn fetch_merge_requests(
        &self,
        window: &ReleaseWindow,
    ) -> Result<Vec<MergeRequest>> {
        let req = ListMergeRequestsRequest {
            state: MergeRequestState::Merged,
            updated_after: window.start,
            updated_before: window.end,
            target_branch: self.config.target_branch.clone(),
        };

        let fetched = self
            .forge
            .get_all_merge_requests(&req, self.config.per_page)
            .await?;

        let mut merge_requests = vec![];

        for mr in fetched {
            match mr.merged_at {
                Some(merged_at) if window.contains(&merged_at) => {
                    merge_requests.push(mr)
                }
                _ => debug!(
                    "skipping merge request !{} merged at {:?}: outside release window",
                    mr.iid, mr.merged_at
                ),
            }
        }

        if self.config.include_commits {
            for mr in merge_requests.iter_mut() {
                mr.commits = self
                    .forge
                    .get_all_merge_request_commits(mr.iid, self.config.per_page)
                    .await?;
            }
        }

        Ok(merge_requests)
    }

    async fn fetch_issues(&self, window: &ReleaseWindow) -> Result<Vec<Issue>> {
        let req = ListIssuesRequest {
            state: IssueState::Closed,
            updated_after: window.start,
            updated_before: window.end,
        };

        let fetched =
            self.forge.get_all_issues(&req, self.config.per_page).await?;

        let mut issues = vec![];

        for issue in fetched {
            match issue.closed_at {
                Some(closed_at) if window.contains(&closed_at) => {
                    issues.push(issue)
                }
                _ => debug!(
                    "skipping issue #{} closed at {:?}: outside release window",
                    issue.iid, issue.closed_at
                ),
            }
        }

        Ok(issues)
    }
}
