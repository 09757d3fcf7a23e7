//! Story Moderation Library
//!
//! Client for the remote vision-model classification endpoint. One request
//! per upload, no retries; failures map onto the three recognized error
//! kinds in `story-core`.

pub mod client;

pub use client::{ModerationClient, ModerationProvider};
