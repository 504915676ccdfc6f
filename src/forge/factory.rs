//! Factory for creating the forge implementation from configuration.

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        gitlab::Gitlab,
        manager::{ForgeManager, ForgeOptions},
    },
};

/// Factory for creating forge implementations.
pub struct ForgeFactory;

impl ForgeFactory {
    /// Create a ForgeManager backed by the GitLab REST API.
    pub fn create(
        config: &RemoteConfig,
        options: ForgeOptions,
    ) -> Result<ForgeManager> {
        let forge = Gitlab::new(config.clone())?;
        Ok(ForgeManager::new(Box::new(forge), options))
    }
}
