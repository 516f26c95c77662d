use crate::domain::error::TranslateError;
use crate::domain::model::TranslationRequest;
use crate::infrastructure::network::sse::EventStream;
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for translation services
///
/// Callers hold a `dyn TranslationService` so the concrete HTTP adapter can be
/// swapped in tests.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translate the whole text and return the result at once
    async fn translate_text(&self, request: &TranslationRequest) -> Result<String, TranslateError>;

    /// Translate incrementally. Failures arrive as a single `Error` event.
    async fn translate_stream(&self, request: &TranslationRequest) -> EventStream;
}

/// Read-only view of environment variables
pub trait EnvSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}
