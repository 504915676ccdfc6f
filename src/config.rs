//! Validated settings for resolving, composing and publishing a release note.
use chrono::TimeDelta;
use derive_builder::Builder;
use regex::Regex;

use crate::{ReleaseNoteError, Result, forge::pager::DEFAULT_PER_PAGE};

/// Default time zone used when rendering the note date.
pub const DEFAULT_TIME_ZONE: &str = "UTC";

#[derive(Debug, Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct ReleaseConfigParams {
    /// Branch release tags must be reachable from. Empty disables the check.
    #[builder(default)]
    pub target_branch: String,
    /// Pattern release tag names must match.
    pub tag_regex: String,
    /// Seconds added to both ends of the release window.
    #[builder(default)]
    pub close_latency_seconds: i64,
    /// IANA time zone for the note date.
    #[builder(default = "DEFAULT_TIME_ZONE.to_string()")]
    pub time_zone: String,
    /// Attach each merge request's commits to the note.
    #[builder(default)]
    pub include_commits: bool,
    #[builder(default = "DEFAULT_PER_PAGE")]
    pub per_page: u32,
}

impl ReleaseConfigParamsBuilder {
    pub fn build(&self) -> Result<ReleaseConfig> {
        let params = self._build().map_err(|e| {
            ReleaseNoteError::invalid_config(format!(
                "Failed to build release config: {}",
                e
            ))
        })?;
        ReleaseConfig::new(params)
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub target_branch: Option<String>,
    pub tag_regex: Regex,
    pub close_latency: TimeDelta,
    pub time_zone: String,
    pub include_commits: bool,
    pub per_page: u32,
}

impl ReleaseConfig {
    pub fn builder() -> ReleaseConfigParamsBuilder {
        ReleaseConfigParamsBuilder::default()
    }

    pub fn new(params: ReleaseConfigParams) -> Result<Self> {
        if params.tag_regex.trim().is_empty() {
            return Err(ReleaseNoteError::invalid_config(
                "a tag regex is required",
            ));
        }

        if params.close_latency_seconds < 0 {
            return Err(ReleaseNoteError::invalid_config(format!(
                "close latency must not be negative: {}",
                params.close_latency_seconds
            )));
        }

        let tag_regex = Regex::new(&params.tag_regex)?;

        let target_branch = Some(params.target_branch.trim().to_string())
            .filter(|b| !b.is_empty());

        let time_zone = if params.time_zone.trim().is_empty() {
            DEFAULT_TIME_ZONE.to_string()
        } else {
            params.time_zone.trim().to_string()
        };

        Ok(Self {
            target_branch,
            tag_regex,
            close_latency: TimeDelta::seconds(params.close_latency_seconds),
            time_zone,
            include_commits: params.include_commits,
            per_page: params.per_page,
        })
    }

    /// Whether `name` qualifies as a release tag.
    pub fn is_release_tag(&self, name: &str) -> bool {
        self.tag_regex.is_match(name)
    }
}
