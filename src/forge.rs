//! Interface to the GitLab forge.
//!
//! Provides token-based authentication, paginated listings of tags, merge
//! requests and issues, and release publishing through a common trait.

/// Configuration and authentication for the forge.
pub mod config;

/// Factory for constructing the forge manager.
pub mod factory;

/// GitLab API client implementation for GitLab.com and self-hosted instances.
pub mod gitlab;

/// Wrapper adding dry-run and publish semantics on top of a forge.
pub mod manager;

/// Page cursor and exhaustive pagination helper.
pub mod pager;

/// Shared data types for tags, merge requests, issues and pages.
pub mod request;

/// Common traits for forge platform abstraction.
pub mod traits;
