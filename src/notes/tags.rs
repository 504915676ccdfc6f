//! Locates the pair of tags that bound a release.
use chrono::{DateTime, Utc};
use log::*;

use crate::{
    ReleaseNoteError, Result,
    config::ReleaseConfig,
    forge::{manager::ForgeManager, pager::Pager, request::Tag},
};

/// Maximum number of tag pages scanned while looking for the previous
/// release tag.
pub const TAG_SEARCH_LIMIT: usize = 100;

/// Time range a release covers. Items count as part of the release when
/// they completed strictly between `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReleaseWindow {
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start < *ts && *ts < self.end
    }
}

/// The tag being released and the release tag before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub latest: Tag,
    /// For a first release this is a synthetic tag with empty name and sha,
    /// stamped with the project's creation time.
    pub previous: Tag,
}

impl TagPair {
    pub fn window(&self) -> ReleaseWindow {
        ReleaseWindow {
            start: self.previous.committed_at,
            end: self.latest.committed_at,
        }
    }
}

pub struct TagResolver<'a> {
    forge: &'a ForgeManager,
    config: &'a ReleaseConfig,
}

impl<'a> TagResolver<'a> {
    pub fn new(forge: &'a ForgeManager, config: &'a ReleaseConfig) -> Self {
        Self { forge, config }
    }

    /// Find the latest release tag and the release tag preceding it.
    ///
    /// Returns `Ok(None)` when the newest tag in the project does not match
    /// the tag pattern, meaning there is nothing to release.
    pub async fn resolve_release_tag_pair(&self) -> Result<Option<TagPair>> {
        let mut pager = Pager::with_per_page(self.config.per_page);
        let page = self.forge.list_tags(pager).await?;
        pager.advance(page.next_page);

        let mut tags = page.items.into_iter();

        let latest = tags.next().ok_or_else(|| {
            ReleaseNoteError::not_found("no tags found for project")
        })?;

        if !self.config.is_release_tag(&latest.name) {
            warn!(
                "latest tag {} does not match {}: nothing to release",
                latest.name, self.config.tag_regex
            );
            return Ok(None);
        }

        if !self.is_on_target_branch(&latest).await? {
            return Err(ReleaseNoteError::branch_mismatch(
                latest.name,
                self.config.target_branch.clone().unwrap_or_default(),
            ));
        }

        info!("latest release tag: {}", latest.name);

        let remaining: Vec<Tag> = tags.collect();

        if remaining.is_empty() && !pager.has_next() {
            let project = self.forge.get_project().await?;
            info!(
                "{} is the first tag: using project creation time {} as release start",
                latest.name, project.created_at
            );
            return Ok(Some(TagPair {
                latest,
                previous: Tag {
                    name: String::new(),
                    commit_sha: String::new(),
                    committed_at: project.created_at,
                    release: None,
                },
            }));
        }

        let previous = self.find_previous_tag(remaining, pager).await?;
        info!("previous release tag: {}", previous.name);

        Ok(Some(self.apply_close_latency(TagPair { latest, previous })))
    }

    /// Scan tags page by page for the first release candidate, giving up
    /// after [`TAG_SEARCH_LIMIT`] pages.
    async fn find_previous_tag(
        &self,
        mut candidates: Vec<Tag>,
        mut pager: Pager,
    ) -> Result<Tag> {
        let mut remaining = TAG_SEARCH_LIMIT;

        loop {
            remaining -= 1;

            for tag in candidates {
                if self.is_release_candidate(&tag).await? {
                    return Ok(tag);
                }
                debug!("skipping tag {}", tag.name);
            }

            if !pager.has_next() || remaining == 0 {
                return Err(ReleaseNoteError::TagPairNotFound {
                    scans: TAG_SEARCH_LIMIT - remaining,
                });
            }

            let page = self.forge.list_tags(pager).await?;
            pager.advance(page.next_page);
            candidates = page.items;
        }
    }

    async fn is_release_candidate(&self, tag: &Tag) -> Result<bool> {
        if !self.config.is_release_tag(&tag.name) {
            return Ok(false);
        }

        self.is_on_target_branch(tag).await
    }

    async fn is_on_target_branch(&self, tag: &Tag) -> Result<bool> {
        let Some(target_branch) = &self.config.target_branch else {
            return Ok(true);
        };

        let refs = self.forge.list_commit_refs(&tag.commit_sha).await?;

        Ok(refs.iter().any(|r| &r.name == target_branch))
    }

    fn apply_close_latency(&self, mut pair: TagPair) -> TagPair {
        if self.config.close_latency.is_zero() {
            return pair;
        }

        debug!(
            "shifting release window forward by {}s",
            self.config.close_latency.num_seconds()
        );
        pair.latest.committed_at += self.config.close_latency;
        pair.previous.committed_at += self.config.close_latency;
        pair
    }
}
