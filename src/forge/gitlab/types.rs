use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ReleaseNoteError, Result,
    forge::request::{
        Author, CommitRef, ForgeCommit, Issue, MergeRequest, Project, Tag,
        TagRelease,
    },
};

/// Parse a GitLab timestamp ("2024-01-10T00:00:00.000+00:00") into UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

fn parse_optional_timestamp(
    raw: Option<String>,
) -> Result<Option<DateTime<Utc>>> {
    raw.as_deref().map(parse_timestamp).transpose()
}

#[derive(Debug, Deserialize)]
pub struct GitlabTagCommit {
    pub id: String,
    pub committed_date: String,
}

#[derive(Debug, Deserialize)]
pub struct GitlabTagRelease {
    pub tag_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GitlabTag {
    pub name: String,
    pub commit: GitlabTagCommit,
    pub release: Option<GitlabTagRelease>,
}

impl TryFrom<GitlabTag> for Tag {
    type Error = ReleaseNoteError;

    fn try_from(tag: GitlabTag) -> Result<Self> {
        Ok(Tag {
            committed_at: parse_timestamp(&tag.commit.committed_date)?,
            name: tag.name,
            commit_sha: tag.commit.id,
            release: tag.release.map(|r| TagRelease {
                tag_name: r.tag_name,
                description: r.description.unwrap_or_default(),
            }),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GitlabAuthor {
    pub username: String,
    pub web_url: String,
}

#[derive(Debug, Deserialize)]
pub struct GitlabMergeRequest {
    pub iid: u64,
    pub title: String,
    pub web_url: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub merged_at: Option<String>,
    #[serde(default)]
    pub author: GitlabAuthor,
}

impl TryFrom<GitlabMergeRequest> for MergeRequest {
    type Error = ReleaseNoteError;

    fn try_from(mr: GitlabMergeRequest) -> Result<Self> {
        Ok(MergeRequest {
            merged_at: parse_optional_timestamp(mr.merged_at)?,
            iid: mr.iid,
            title: mr.title,
            web_url: mr.web_url,
            labels: mr.labels,
            author: Author {
                username: mr.author.username,
                web_url: mr.author.web_url,
            },
            commits: vec![],
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GitlabIssue {
    pub iid: u64,
    pub title: String,
    pub web_url: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub closed_at: Option<String>,
}

impl TryFrom<GitlabIssue> for Issue {
    type Error = ReleaseNoteError;

    fn try_from(issue: GitlabIssue) -> Result<Self> {
        Ok(Issue {
            closed_at: parse_optional_timestamp(issue.closed_at)?,
            iid: issue.iid,
            title: issue.title,
            web_url: issue.web_url,
            labels: issue.labels,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GitlabCommitRef {
    pub name: String,
}

impl From<GitlabCommitRef> for CommitRef {
    fn from(r: GitlabCommitRef) -> Self {
        CommitRef { name: r.name }
    }
}

#[derive(Debug, Deserialize)]
pub struct GitlabCommit {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub author_name: String,
    pub created_at: String,
}

impl TryFrom<GitlabCommit> for ForgeCommit {
    type Error = ReleaseNoteError;

    fn try_from(commit: GitlabCommit) -> Result<Self> {
        Ok(ForgeCommit {
            created_at: parse_timestamp(&commit.created_at)?,
            id: commit.id,
            short_id: commit.short_id,
            title: commit.title,
            author_name: commit.author_name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GitlabProject {
    pub created_at: String,
}

impl TryFrom<GitlabProject> for Project {
    type Error = ReleaseNoteError;

    fn try_from(project: GitlabProject) -> Result<Self> {
        Ok(Project {
            created_at: parse_timestamp(&project.created_at)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateRelease {
    pub tag_name: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRelease {
    pub name: String,
    pub description: String,
}
