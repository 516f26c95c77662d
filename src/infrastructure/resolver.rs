use crate::domain::error::TranslateError;
use crate::domain::model::{Overrides, ResolvedConfig};
use crate::domain::traits::{EnvSource, ProcessEnv};
use crate::infrastructure::config::FallbackDefaults;
use crate::infrastructure::providers::{self, CUSTOM_PLATFORM};
use tracing::info;

/// Turns a platform id plus caller overrides into a complete `ResolvedConfig`.
///
/// Each field takes the first non-empty value of:
/// 1. the caller override
/// 2. the platform's environment variable
/// 3. the platform default (base URL and model only)
/// 4. the global fallback
pub struct ConfigResolver<E = ProcessEnv> {
    fallback: FallbackDefaults,
    env: E,
}

impl ConfigResolver<ProcessEnv> {
    pub fn new(fallback: FallbackDefaults) -> Self {
        Self::with_env(fallback, ProcessEnv)
    }
}

impl<E: EnvSource> ConfigResolver<E> {
    pub fn with_env(fallback: FallbackDefaults, env: E) -> Self {
        Self { fallback, env }
    }

    pub fn fallback(&self) -> &FallbackDefaults {
        &self.fallback
    }

    /// Resolve the call configuration.
    ///
    /// With no `platform_id` the platform is guessed from the resolved base URL.
    pub fn resolve(
        &self,
        platform_id: Option<&str>,
        overrides: &Overrides,
    ) -> Result<ResolvedConfig, TranslateError> {
        let requested = platform_id.map(str::trim).filter(|id| !id.is_empty());
        let profile = requested.and_then(providers::find);

        if let (Some(id), None) = (requested, profile) {
            info!(
                "Platform '{}' is not predefined. Relying on overrides or global fallbacks.",
                id
            );
        }

        let env_value = |name: Option<&str>| {
            name.and_then(|n| self.env.get(n))
                .and_then(non_empty)
        };

        let api_key = pick(
            "api_key",
            &[
                ("override", overrides.api_key.clone().and_then(non_empty)),
                ("env", env_value(profile.map(|p| p.api_key_env))),
                ("fallback", self.fallback.api_key.clone().and_then(non_empty)),
            ],
        );
        let base_url = pick(
            "base_url",
            &[
                ("override", overrides.base_url.clone().and_then(non_empty)),
                ("env", env_value(profile.map(|p| p.base_url_env))),
                (
                    "platform default",
                    profile.and_then(|p| p.default_base_url).map(str::to_string),
                ),
                ("fallback", self.fallback.base_url.clone().and_then(non_empty)),
            ],
        );
        let model = pick(
            "model",
            &[
                ("override", overrides.model.clone().and_then(non_empty)),
                ("env", env_value(profile.map(|p| p.model_env))),
                (
                    "platform default",
                    profile.and_then(|p| p.default_model).map(str::to_string),
                ),
                ("fallback", self.fallback.model.clone().and_then(non_empty)),
            ],
        );

        let platform_id = match requested {
            Some(id) => id.to_string(),
            None => base_url
                .as_deref()
                .map(providers::infer_platform)
                .unwrap_or(CUSTOM_PLATFORM)
                .to_string(),
        };

        let missing = |field: &'static str| TranslateError::Config {
            field,
            platform: platform_id.clone(),
        };
        let api_key = api_key.ok_or_else(|| missing("api_key"))?;
        let base_url = base_url.ok_or_else(|| missing("base_url"))?;
        let model = model.ok_or_else(|| missing("model"))?;

        Ok(ResolvedConfig {
            platform_id,
            api_key,
            base_url,
            model,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn pick(field: &str, layers: &[(&str, Option<String>)]) -> Option<String> {
    let found = layers
        .iter()
        .find_map(|(layer, value)| value.as_ref().map(|v| (*layer, v.clone())));
    if let Some((layer, _)) = &found {
        info!("Resolved {} from {}", field, layer);
    }
    found.map(|(_, value)| value)
}
