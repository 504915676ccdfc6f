//! Prints the release note for the newest release tag without publishing.
use log::*;
use serde::Serialize;

use crate::{
    Result, config::ReleaseConfig, forge::manager::ForgeManager,
    notes::ReleaseNote, notes::build_release_note,
};

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    tag: &'a str,
    notes: &'a str,
}

/// Build the note for the newest tag and print it to stdout.
pub async fn execute(
    forge_manager: &ForgeManager,
    config: &ReleaseConfig,
    json: bool,
) -> Result<()> {
    let Some(note) = build_release_note(forge_manager, config).await? else {
        warn!("latest tag is not a release tag: nothing to show");
        return Ok(());
    };

    println!("{}", render(&note, json)?);

    Ok(())
}

fn render(note: &ReleaseNote, json: bool) -> Result<String> {
    if !json {
        return Ok(note.body.clone());
    }

    let output = ShowOutput {
        tag: &note.tag.name,
        notes: &note.body,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
