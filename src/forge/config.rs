//! Configuration for GitLab connections.
use secrecy::SecretString;

/// Default GitLab REST API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://gitlab.com/api/v4";

/// Remote repository connection configuration for authenticating and
/// interacting with the forge.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base API url (e.g. "https://gitlab.com/api/v4").
    pub api_endpoint: String,
    /// Numeric project id or full project path ("group/project").
    pub project_id: String,
    /// Personal access token for authentication.
    pub token: SecretString,
    /// Optional cookie sent with every request, for instances behind an
    /// authenticating proxy.
    pub cookie: Option<SecretString>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            project_id: "".to_string(),
            token: SecretString::from("".to_string()),
            cookie: None,
        }
    }
}
