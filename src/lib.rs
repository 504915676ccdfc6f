pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod notes;

pub use cli::{Args, Command};
pub use error::{ReleaseNoteError, Result};

#[cfg(test)]
pub mod test_helpers;
