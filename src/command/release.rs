//! Publishes the release note for the newest release tag.
use log::*;

use crate::{
    Result,
    config::ReleaseConfig,
    forge::manager::{ForgeManager, PublishOutcome},
    notes::build_release_note,
};

/// Build the note for the newest tag and publish it. Returns the outcome,
/// or `None` when there was nothing to release.
pub async fn execute(
    forge_manager: &ForgeManager,
    config: &ReleaseConfig,
) -> Result<Option<PublishOutcome>> {
    let Some(note) = build_release_note(forge_manager, config).await? else {
        warn!("latest tag is not a release tag: nothing to release");
        return Ok(None);
    };

    let outcome = forge_manager.publish_release(&note.tag, &note.body).await?;

    match outcome {
        PublishOutcome::Created => {
            info!("created release for tag {}", note.tag.name)
        }
        PublishOutcome::Updated => {
            info!("updated release notes for tag {}", note.tag.name)
        }
    }

    Ok(Some(outcome))
}
