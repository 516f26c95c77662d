//! Translate text through OpenAI-compatible chat-completion providers.
//!
//! The crate resolves which provider to call and with which credentials,
//! shapes the request for that provider, and re-frames streamed replies into
//! a normalized event sequence.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod state;

pub use domain::error::TranslateError;
pub use domain::model::{Overrides, ResolvedConfig, StreamEvent, TranslationRequest};
pub use infrastructure::network::sse::EventStream;
