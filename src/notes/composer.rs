//! Renders a changelog into a markdown release note grouped by label.
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

use crate::{
    ReleaseNoteError, Result,
    forge::request::{Issue, MergeRequest},
};

/// Bucket for merge requests without a recognized label.
pub const MERGE_REQUESTS_BUCKET: &str = "mergeRequests";
/// Bucket for issues without a recognized label.
pub const ISSUES_BUCKET: &str = "issues";

/// A label recognized by the note and the section it is listed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub label: String,
    pub title: String,
}

impl Category {
    pub fn new(label: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
        }
    }
}

/// Standard sections, in the order they appear in the note.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("breaking change", "Notable changes"),
        Category::new("enhancement", "Enhancements"),
        Category::new("feature", "New features"),
        Category::new("bug", "Fixed bugs"),
        Category::new(ISSUES_BUCKET, "Closed issues"),
        Category::new(MERGE_REQUESTS_BUCKET, "Merged requests"),
    ]
}

/// Rendered note lines keyed by category label, in processing order.
pub type LabelBuckets = HashMap<String, Vec<String>>;

pub fn render_merge_request(mr: &MergeRequest) -> String {
    let mut message = format!(
        "- {} [#{}]({}) ([{}]({}))",
        mr.title, mr.iid, mr.web_url, mr.author.username, mr.author.web_url
    );

    for commit in mr.commits.iter() {
        message.push_str(&format!("\n  - {} {}", commit.short_id, commit.title));
    }

    message
}

pub fn render_issue(issue: &Issue) -> String {
    format!("- {} [#{}]({})", issue.title, issue.iid, issue.web_url)
}

pub struct NoteComposer {
    categories: Vec<Category>,
    time_zone: Tz,
}

impl NoteComposer {
    pub fn new(categories: Vec<Category>, time_zone: &str) -> Result<Self> {
        let time_zone = time_zone.parse::<Tz>().map_err(|e| {
            ReleaseNoteError::TimeZone(format!("{time_zone}: {e}"))
        })?;

        Ok(Self {
            categories,
            time_zone,
        })
    }

    /// Label of the bucket an item belongs in: the first of its labels that
    /// names a category, otherwise `default`.
    fn bucket_for<'b>(&'b self, labels: &[String], default: &'b str) -> &'b str {
        labels
            .iter()
            .find_map(|label| {
                self.categories
                    .iter()
                    .find(|c| &c.label == label)
                    .map(|c| c.label.as_str())
            })
            .unwrap_or(default)
    }

    /// Group rendered merge requests and issues into buckets. Merge
    /// requests are processed before issues.
    pub fn bucket(
        &self,
        merge_requests: &[MergeRequest],
        issues: &[Issue],
    ) -> LabelBuckets {
        let mut buckets = LabelBuckets::new();

        for mr in merge_requests {
            let bucket = self.bucket_for(&mr.labels, MERGE_REQUESTS_BUCKET);
            buckets
                .entry(bucket.to_string())
                .or_default()
                .push(render_merge_request(mr));
        }

        for issue in issues {
            let bucket = self.bucket_for(&issue.labels, ISSUES_BUCKET);
            buckets
                .entry(bucket.to_string())
                .or_default()
                .push(render_issue(issue));
        }

        buckets
    }

    /// Render the note dated `as_of` in the configured time zone, with one
    /// section per non-empty category.
    pub fn compose(
        &self,
        merge_requests: &[MergeRequest],
        issues: &[Issue],
        as_of: DateTime<Utc>,
    ) -> String {
        let buckets = self.bucket(merge_requests, issues);

        let mut sections = vec![format!(
            "### Release note ({})",
            as_of.with_timezone(&self.time_zone).format("%Y-%m-%d")
        )];

        for category in self.categories.iter() {
            if let Some(lines) = buckets.get(&category.label)
                && !lines.is_empty()
            {
                sections.push(format!(
                    "#### {}\n{}",
                    category.title,
                    lines.join("\n")
                ));
            }
        }

        sections.join("\n\n")
    }
}
