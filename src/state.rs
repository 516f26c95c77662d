use crate::domain::error::TranslateError;
use crate::domain::model::Overrides;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::client::ChatTranslator;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::resolver::ConfigResolver;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<ConfigResolver>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, TranslateError> {
        let http_client = create_client(&config.http, config.http_proxy.as_deref())?;
        let resolver = ConfigResolver::new(config.fallback.clone());

        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            http_client,
        })
    }

    /// Resolve the configuration for one call and build its translator
    pub fn translator_for(
        &self,
        platform_id: Option<&str>,
        overrides: &Overrides,
    ) -> Result<ChatTranslator, TranslateError> {
        let resolved = self.resolver.resolve(platform_id, overrides)?;
        Ok(ChatTranslator::new(
            self.http_client.clone(),
            resolved,
            Duration::from_secs(self.config.http.request_timeout_secs),
        ))
    }
}
