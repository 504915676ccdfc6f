//! CLI argument parsing and GitLab connection configuration.
use clap::{Parser, Subcommand};
use secrecy::SecretString;

use crate::{
    ReleaseNoteError, Result,
    config::{DEFAULT_TIME_ZONE, ReleaseConfig},
    forge::{
        config::{DEFAULT_API_ENDPOINT, RemoteConfig},
        manager::ForgeOptions,
        pager::DEFAULT_PER_PAGE,
    },
};

/// Global CLI arguments. Every connection and release option can also be
/// supplied through its environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        long,
        env = "GITLAB_API_ENDPOINT",
        default_value = DEFAULT_API_ENDPOINT,
        global = true
    )]
    /// GitLab REST API base url.
    pub api_endpoint: String,

    #[arg(
        long,
        env = "GITLAB_PERSONAL_TOKEN",
        default_value = "",
        hide_env_values = true,
        global = true
    )]
    /// GitLab personal access token.
    pub token: String,

    #[arg(long, env = "GITLAB_PROJECT_ID", default_value = "", global = true)]
    /// Numeric project id or full project path (group/project).
    pub project_id: String,

    #[arg(
        long,
        env = "GITLAB_COOKIE",
        hide_env_values = true,
        global = true
    )]
    /// Cookie sent with every API request.
    pub cookie: Option<String>,

    #[arg(long, env = "TARGET_BRANCH", default_value = "", global = true)]
    /// Only tags reachable from this branch are considered releases.
    pub target_branch: String,

    #[arg(long, env = "TARGET_TAG_REGEX", default_value = "", global = true)]
    /// Pattern release tag names must match.
    pub tag_regex: String,

    #[arg(
        long,
        env = "TZ",
        default_value = DEFAULT_TIME_ZONE,
        global = true
    )]
    /// IANA time zone used for the release note date.
    pub time_zone: String,

    #[arg(
        long,
        env = "ISSUE_CLOSED_SECONDS",
        default_value_t = 0,
        global = true
    )]
    /// Seconds added to both ends of the release window.
    pub close_latency_seconds: i64,

    #[arg(
        long,
        env = "INCLUDE_COMMITS",
        default_value_t = false,
        global = true
    )]
    /// List each merge request's commits below it.
    pub include_commits: bool,

    #[arg(long, default_value_t = DEFAULT_PER_PAGE, global = true)]
    /// Page size for list requests (at most 100).
    pub per_page: u32,

    #[arg(long, default_value_t = false, global = true)]
    /// Log the release that would be published instead of publishing it.
    pub dry_run: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate the release note for the newest tag and publish it.
    Release,

    /// Generate the release note for the newest tag and print it.
    Show {
        #[arg(long, default_value_t = false)]
        /// Print the tag name and note as JSON.
        json: bool,
    },
}

impl Args {
    /// Connection settings for the GitLab API.
    pub fn remote_config(&self) -> Result<RemoteConfig> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(ReleaseNoteError::InvalidArgs(
                "must set a gitlab token".into(),
            ));
        }

        let project_id = self.project_id.trim();
        if project_id.is_empty() {
            return Err(ReleaseNoteError::InvalidArgs(
                "must set a gitlab project id".into(),
            ));
        }

        let api_endpoint = self.api_endpoint.trim().trim_end_matches('/');
        if api_endpoint.is_empty() {
            return Err(ReleaseNoteError::InvalidArgs(
                "must set a gitlab api endpoint".into(),
            ));
        }

        let cookie = self
            .cookie
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| SecretString::from(c.to_string()));

        Ok(RemoteConfig {
            api_endpoint: api_endpoint.to_string(),
            project_id: project_id.to_string(),
            token: SecretString::from(token.to_string()),
            cookie,
        })
    }

    pub fn release_config(&self) -> Result<ReleaseConfig> {
        ReleaseConfig::builder()
            .target_branch(self.target_branch.as_str())
            .tag_regex(self.tag_regex.as_str())
            .close_latency_seconds(self.close_latency_seconds)
            .time_zone(self.time_zone.as_str())
            .include_commits(self.include_commits)
            .per_page(self.per_page)
            .build()
    }

    pub fn forge_options(&self) -> ForgeOptions {
        ForgeOptions {
            dry_run: self.dry_run,
        }
    }
}
