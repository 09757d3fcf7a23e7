//! Story Widget Library
//!
//! The upload widget state machine: file selection, the async moderation
//! pipeline, pure result rendering, and publish gating. Hosts plug in the
//! preview allocator, still extractor, moderation provider, and modal
//! callbacks.

pub mod state;
pub mod telemetry;
pub mod widget;

pub use state::{publish_enabled, render, CategoryStatus, ViewState};
pub use widget::{AnalysisTicket, ModalHost, StoryUploadWidget};
