//! Command execution for gitlab-release-note.
//!
//! - **release**: build the note for the newest release tag and publish it
//!   as that tag's release, creating or updating it.
//! - **show**: build the same note and print it without writing anything.
//!
//! Both commands treat a newest tag that is not a release tag as nothing to
//! do and exit successfully.

pub mod release;
pub mod show;
