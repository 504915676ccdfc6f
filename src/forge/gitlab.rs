//! Implements the Forge trait for Gitlab
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::*;
use reqwest::{
    Client, Url,
    header::{COOKIE, HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::{
    ReleaseNoteError, Result,
    forge::{
        config::RemoteConfig,
        gitlab::types::{
            CreateRelease, GitlabCommit, GitlabCommitRef, GitlabIssue,
            GitlabMergeRequest, GitlabProject, GitlabTag, UpdateRelease,
        },
        pager::{MAX_PER_PAGE, Pager, collect_all},
        request::{
            CommitRef, ForgeCommit, Issue, ListIssuesRequest,
            ListMergeRequestsRequest, MergeRequest, Page, Project, Tag,
        },
        traits::Forge,
    },
};

mod types;

const TOKEN_HEADER: &str = "private-token";
const NEXT_PAGE_HEADER: &str = "x-next-page";

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reads the next page hint. GitLab sends an empty value on the last page.
fn next_page(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(NEXT_PAGE_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok())
}

/// GitLab forge implementation using reqwest against the REST v4 API.
pub struct Gitlab {
    config: RemoteConfig,
    project_url: Url,
    base_url: Url,
    client: Client,
}

impl Gitlab {
    /// Create GitLab client with token authentication scoped to the
    /// configured project.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut token_value =
            HeaderValue::from_str(config.token.expose_secret())?;
        token_value.set_sensitive(true);
        headers.append(TOKEN_HEADER, token_value);

        if let Some(cookie) = &config.cookie {
            let mut cookie_value =
                HeaderValue::from_str(cookie.expose_secret())?;
            cookie_value.set_sensitive(true);
            headers.append(COOKIE, cookie_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let project: String =
            url::form_urlencoded::byte_serialize(config.project_id.as_bytes())
                .collect();

        let project_url = Url::parse(&format!(
            "{}/projects/{}",
            config.api_endpoint.trim_end_matches('/'),
            project
        ))?;

        let base_url = Url::parse(&format!("{}/", project_url))?;

        Ok(Self {
            config,
            project_url,
            base_url,
            client,
        })
    }

    fn paged_url(&self, path: &str, pager: Pager) -> Result<Url> {
        let mut url = self.base_url.join(path)?;

        url.query_pairs_mut()
            .append_pair("page", &pager.page().to_string())
            .append_pair("per_page", &pager.per_page().to_string());

        Ok(url)
    }

    async fn get_page<W: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<(Vec<W>, Option<u32>)> {
        debug!("GET {url}");
        let request = self.client.get(url).build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let next_page = next_page(result.headers());
        let items: Vec<W> = result.json().await?;
        Ok((items, next_page))
    }

    /// Fetch a page and convert every wire item into its domain type.
    async fn get_converted_page<W, T>(&self, url: Url) -> Result<Page<T>>
    where
        W: DeserializeOwned,
        T: TryFrom<W, Error = ReleaseNoteError>,
    {
        let (items, next_page) = self.get_page::<W>(url).await?;

        let items = items
            .into_iter()
            .map(T::try_from)
            .collect::<Result<Vec<T>>>()?;

        Ok(Page { items, next_page })
    }

    async fn commit_refs_page(
        &self,
        sha: &str,
        pager: Pager,
    ) -> Result<Page<CommitRef>> {
        let mut url =
            self.paged_url(&format!("repository/commits/{sha}/refs"), pager)?;
        url.query_pairs_mut().append_pair("type", "branch");

        let (refs, next_page) = self.get_page::<GitlabCommitRef>(url).await?;

        Ok(Page {
            items: refs.into_iter().map(CommitRef::from).collect(),
            next_page,
        })
    }

    fn release_url(&self, tag_name: &str) -> Result<Url> {
        let mut url = self.base_url.join("releases")?;

        url.path_segments_mut()
            .map_err(|_| {
                ReleaseNoteError::invalid_config(format!(
                    "api endpoint cannot be used as a base url: {}",
                    self.config.api_endpoint
                ))
            })?
            .push(tag_name);

        Ok(url)
    }
}

#[async_trait]
impl Forge for Gitlab {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn list_tags(&self, pager: Pager) -> Result<Page<Tag>> {
        let url = self.paged_url("repository/tags", pager)?;
        self.get_converted_page::<GitlabTag, Tag>(url).await
    }

    async fn list_merge_requests(
        &self,
        req: &ListMergeRequestsRequest,
        pager: Pager,
    ) -> Result<Page<MergeRequest>> {
        let mut url = self.paged_url("merge_requests", pager)?;

        url.query_pairs_mut()
            .append_pair("scope", "all")
            .append_pair("state", req.state.as_str())
            .append_pair("updated_after", &format_timestamp(&req.updated_after))
            .append_pair(
                "updated_before",
                &format_timestamp(&req.updated_before),
            );

        if let Some(branch) = &req.target_branch {
            url.query_pairs_mut().append_pair("target_branch", branch);
        }

        self.get_converted_page::<GitlabMergeRequest, MergeRequest>(url)
            .await
    }

    async fn list_issues(
        &self,
        req: &ListIssuesRequest,
        pager: Pager,
    ) -> Result<Page<Issue>> {
        let mut url = self.paged_url("issues", pager)?;

        url.query_pairs_mut()
            .append_pair("scope", "all")
            .append_pair("state", req.state.as_str())
            .append_pair("updated_after", &format_timestamp(&req.updated_after))
            .append_pair(
                "updated_before",
                &format_timestamp(&req.updated_before),
            );

        self.get_converted_page::<GitlabIssue, Issue>(url).await
    }

    async fn list_commit_refs(&self, sha: &str) -> Result<Vec<CommitRef>> {
        collect_all(Pager::with_per_page(MAX_PER_PAGE), |pager| {
            self.commit_refs_page(sha, pager)
        })
        .await
    }

    async fn list_merge_request_commits(
        &self,
        iid: u64,
        pager: Pager,
    ) -> Result<Page<ForgeCommit>> {
        let url =
            self.paged_url(&format!("merge_requests/{iid}/commits"), pager)?;
        self.get_converted_page::<GitlabCommit, ForgeCommit>(url)
            .await
    }

    async fn get_project(&self) -> Result<Project> {
        let request = self.client.get(self.project_url.clone()).build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let project: GitlabProject = result.json().await?;
        Project::try_from(project)
    }

    async fn create_release(&self, tag_name: &str, notes: &str) -> Result<()> {
        let data = CreateRelease {
            tag_name: tag_name.to_string(),
            name: tag_name.to_string(),
            description: notes.to_string(),
        };

        let releases_url = self.base_url.join("releases")?;
        let request = self.client.post(releases_url).json(&data).build()?;
        let response = self.client.execute(request).await?;
        response.error_for_status()?;

        Ok(())
    }

    async fn update_release(&self, tag_name: &str, notes: &str) -> Result<()> {
        let data = UpdateRelease {
            name: tag_name.to_string(),
            description: notes.to_string(),
        };

        let release_url = self.release_url(tag_name)?;
        let request = self.client.put(release_url).json(&data).build()?;
        let response = self.client.execute(request).await?;
        response.error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    use super::*;
    use crate::forge::request::{IssueState, MergeRequestState};
    use crate::test_helpers::ts;

    fn test_forge(server: &MockServer, project_id: &str) -> Gitlab {
        Gitlab::new(RemoteConfig {
            api_endpoint: format!("{}/api/v4", server.uri()),
            project_id: project_id.to_string(),
            token: SecretString::from("test-token".to_string()),
            cookie: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn list_tags_reads_next_page_hint_and_sends_token() {
        let server = MockServer::start().await;

        let body = serde_json::json!([
            {
                "name": "v2.0.0",
                "commit": {"id": "sha2", "committed_date": "2024-01-10T00:00:00.000+00:00"},
                "release": {"tag_name": "v2.0.0", "description": "old notes"}
            },
            {
                "name": "v1.9.0",
                "commit": {"id": "sha1", "committed_date": "2024-01-01T00:00:00.000+00:00"},
                "release": null
            }
        ]);

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42/repository/tags"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "20"))
            .and(header("private-token", "test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .insert_header("X-Next-Page", "2"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        let page = forge.list_tags(Pager::default()).await.unwrap();

        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "v2.0.0");
        assert_eq!(page.items[0].commit_sha, "sha2");
        assert_eq!(page.items[0].committed_at, ts("2024-01-10T00:00:00Z"));
        assert_eq!(
            page.items[0].release.as_ref().map(|r| r.description.as_str()),
            Some("old notes")
        );
        assert!(page.items[1].release.is_none());
    }

    #[tokio::test]
    async fn empty_next_page_header_means_last_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42/repository/tags"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .insert_header("X-Next-Page", ""),
            )
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        let page = forge.list_tags(Pager::default()).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.next_page, None);
    }

    #[tokio::test]
    async fn project_path_is_url_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/group%2Fproject"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"created_at": "2023-06-01T12:00:00.000Z"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let forge = test_forge(&server, "group/project");
        let project = forge.get_project().await.unwrap();

        assert_eq!(project.created_at, ts("2023-06-01T12:00:00Z"));
    }

    #[tokio::test]
    async fn list_merge_requests_sends_window_and_branch_filters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42/merge_requests"))
            .and(query_param("state", "merged"))
            .and(query_param("scope", "all"))
            .and(query_param("target_branch", "main"))
            .and(query_param("updated_after", "2024-01-01T00:00:00.000Z"))
            .and(query_param("updated_before", "2024-01-10T00:00:00.000Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!([{
                    "iid": 3,
                    "title": "Fix crash",
                    "web_url": "https://gitlab.example.com/mr/3",
                    "labels": ["bug"],
                    "merged_at": "2024-01-05T00:00:00.000Z",
                    "author": {"username": "dev", "web_url": "https://gitlab.example.com/dev"}
                }]),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        let req = ListMergeRequestsRequest {
            state: MergeRequestState::Merged,
            updated_after: ts("2024-01-01T00:00:00Z"),
            updated_before: ts("2024-01-10T00:00:00Z"),
            target_branch: Some("main".into()),
        };

        let page = forge
            .list_merge_requests(&req, Pager::default())
            .await
            .unwrap();

        assert_eq!(page.next_page, None);
        assert_eq!(page.items[0].iid, 3);
        assert_eq!(page.items[0].merged_at, Some(ts("2024-01-05T00:00:00Z")));
    }

    #[tokio::test]
    async fn list_issues_fails_on_malformed_close_time() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42/issues"))
            .and(query_param("state", "closed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!([{
                    "iid": 9,
                    "title": "Broken",
                    "web_url": "https://gitlab.example.com/issues/9",
                    "labels": [],
                    "closed_at": "not-a-date"
                }]),
            ))
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        let req = ListIssuesRequest {
            state: IssueState::Closed,
            updated_after: ts("2024-01-01T00:00:00Z"),
            updated_before: ts("2024-01-10T00:00:00Z"),
        };

        let result = forge.list_issues(&req, Pager::default()).await;
        assert!(matches!(result, Err(ReleaseNoteError::DateParse(_))));
    }

    #[tokio::test]
    async fn list_commit_refs_follows_every_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42/repository/commits/abc/refs"))
            .and(query_param("type", "branch"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([
                        {"type": "branch", "name": "feature"}
                    ]))
                    .insert_header("X-Next-Page", "2"),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42/repository/commits/abc/refs"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([
                        {"type": "branch", "name": "main"}
                    ]))
                    .insert_header("X-Next-Page", ""),
            )
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        let refs = forge.list_commit_refs("abc").await.unwrap();

        let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["feature", "main"]);
    }

    #[tokio::test]
    async fn unauthorized_response_maps_to_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42/repository/tags"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        let result = forge.list_tags(Pager::default()).await;

        assert!(matches!(
            result,
            Err(ReleaseNoteError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn server_error_maps_to_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        let result = forge.get_project().await;

        assert!(matches!(result, Err(ReleaseNoteError::Transport(_))));
    }

    #[tokio::test]
    async fn create_release_posts_description() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v4/projects/42/releases"))
            .and(body_json(serde_json::json!({
                "tag_name": "v2.0.0",
                "name": "v2.0.0",
                "description": "### Release note (2024-01-10)"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        forge
            .create_release("v2.0.0", "### Release note (2024-01-10)")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_release_puts_to_tag_path() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/v4/projects/42/releases/v2.0.0"))
            .and(body_json(serde_json::json!({
                "name": "v2.0.0",
                "description": "notes"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let forge = test_forge(&server, "42");
        forge.update_release("v2.0.0", "notes").await.unwrap();
    }

    #[tokio::test]
    async fn cookie_is_sent_when_configured() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42"))
            .and(header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"created_at": "2023-06-01T12:00:00.000Z"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let forge = Gitlab::new(RemoteConfig {
            api_endpoint: format!("{}/api/v4", server.uri()),
            project_id: "42".into(),
            token: SecretString::from("test-token".to_string()),
            cookie: Some(SecretString::from("session=abc".to_string())),
        })
        .unwrap();

        forge.get_project().await.unwrap();
    }
}
