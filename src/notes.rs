//! Release note generation.
//!
//! A release note is built in three steps:
//!
//! 1. [`tags::TagResolver`] finds the tag being released and the release
//!    tag before it, which bound the [`tags::ReleaseWindow`].
//! 2. [`changelog::ChangelogFetcher`] collects the merge requests merged
//!    and issues closed inside that window.
//! 3. [`composer::NoteComposer`] groups them by label and renders markdown.

pub mod changelog;
pub mod composer;
pub mod tags;

use log::*;

use crate::{
    Result,
    config::ReleaseConfig,
    forge::{manager::ForgeManager, request::Tag},
    notes::{
        changelog::ChangelogFetcher,
        composer::{NoteComposer, default_categories},
        tags::TagResolver,
    },
};

/// Rendered note for a tag, ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNote {
    pub tag: Tag,
    pub body: String,
}

/// Resolve the release window, fetch its changelog and render the note.
///
/// Returns `Ok(None)` when the newest tag is not a release tag.
pub async fn build_release_note(
    forge: &ForgeManager,
    config: &ReleaseConfig,
) -> Result<Option<ReleaseNote>> {
    let composer = NoteComposer::new(default_categories(), &config.time_zone)?;

    let Some(pair) = TagResolver::new(forge, config)
        .resolve_release_tag_pair()
        .await?
    else {
        return Ok(None);
    };

    let window = pair.window();

    let changelog = ChangelogFetcher::new(forge, config)
        .fetch_changelog(&window)
        .await?;

    if changelog.is_empty() {
        warn!("no merge requests or issues found for {}", pair.latest.name);
    }

    let body = composer.compose(
        &changelog.merge_requests,
        &changelog.issues,
        pair.latest.committed_at,
    );

    Ok(Some(ReleaseNote {
        tag: pair.latest,
        body,
    }))
}
