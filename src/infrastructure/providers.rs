use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Identifier used for endpoints that match no known provider
pub const CUSTOM_PLATFORM: &str = "custom";

/// How a platform wants its chat-completion request shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTraits {
    /// Always attach `Authorization: Bearer <key>`
    pub needs_auth_header: bool,
    /// Accepts top-level `temperature` / `max_tokens`
    pub supports_sampling_params: bool,
    /// Key values meaning "no key" when auth is optional (case-insensitive)
    pub auth_sentinels: &'static [&'static str],
}

const HOSTED: RequestTraits = RequestTraits {
    needs_auth_header: true,
    supports_sampling_params: true,
    auth_sentinels: &[],
};

const LOCAL_INFERENCE: RequestTraits = RequestTraits {
    needs_auth_header: false,
    supports_sampling_params: false,
    auth_sentinels: &["none", "ollama"],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub id: &'static str,
    pub api_key_env: &'static str,
    pub base_url_env: &'static str,
    pub model_env: &'static str,
    pub default_base_url: Option<&'static str>,
    pub default_model: Option<&'static str>,
    /// Hostname fragment used to recognise this provider from a URL
    pub host_hint: Option<&'static str>,
    pub traits: RequestTraits,
}

pub static PROVIDERS: &[ProviderProfile] = &[
    ProviderProfile {
        id: "siliconflow",
        api_key_env: "SILICONFLOW_API_KEY",
        base_url_env: "SILICONFLOW_BASE_URL",
        model_env: "SILICONFLOW_MODEL",
        default_base_url: Some("https://api.siliconflow.cn/v1"),
        default_model: Some("THUDM/GLM-4-9B-0414"),
        host_hint: Some("api.siliconflow.cn"),
        traits: HOSTED,
    },
    ProviderProfile {
        id: "deepseek",
        api_key_env: "DEEPSEEK_API_KEY",
        base_url_env: "DEEPSEEK_BASE_URL",
        model_env: "DEEPSEEK_MODEL",
        default_base_url: Some("https://api.deepseek.com/v1"),
        default_model: Some("deepseek-chat"),
        host_hint: Some("api.deepseek.com"),
        traits: HOSTED,
    },
    ProviderProfile {
        id: "moonshot",
        api_key_env: "MOONSHOT_API_KEY",
        base_url_env: "MOONSHOT_BASE_URL",
        model_env: "MOONSHOT_MODEL",
        default_base_url: Some("https://api.moonshot.cn/v1"),
        default_model: Some("moonshot-v1-8k"),
        host_hint: Some("api.moonshot.cn"),
        traits: HOSTED,
    },
    ProviderProfile {
        id: "openai",
        api_key_env: "OPENAI_API_KEY",
        base_url_env: "OPENAI_BASE_URL",
        model_env: "OPENAI_MODEL",
        default_base_url: Some("https://api.openai.com/v1"),
        default_model: Some("gpt-3.5-turbo"),
        host_hint: Some("api.openai.com"),
        traits: HOSTED,
    },
    ProviderProfile {
        id: "ollama",
        api_key_env: "OLLAMA_API_KEY",
        base_url_env: "OLLAMA_BASE_URL",
        model_env: "OLLAMA_MODEL",
        default_base_url: Some("http://localhost:11434/v1"),
        default_model: Some("llama3"),
        host_hint: Some("localhost:11434"),
        traits: LOCAL_INFERENCE,
    },
    ProviderProfile {
        id: "modelscope",
        api_key_env: "MODELSCOPE_API_KEY",
        base_url_env: "MODELSCOPE_BASE_URL",
        model_env: "MODELSCOPE_MODEL",
        default_base_url: Some("https://api-inference.modelscope.cn/v1"),
        default_model: Some("Qwen/Qwen2.5-72B-Instruct"),
        host_hint: Some("api-inference.modelscope.cn"),
        traits: HOSTED,
    },
    ProviderProfile {
        id: "openrouter",
        api_key_env: "OPENROUTER_API_KEY",
        base_url_env: "OPENROUTER_BASE_URL",
        model_env: "OPENROUTER_MODEL",
        default_base_url: Some("https://openrouter.ai/api/v1"),
        default_model: Some("google/gemini-2.0-flash-exp:free"),
        host_hint: Some("openrouter.ai"),
        traits: HOSTED,
    },
    ProviderProfile {
        id: CUSTOM_PLATFORM,
        api_key_env: "CUSTOM_API_KEY",
        base_url_env: "CUSTOM_BASE_URL",
        model_env: "CUSTOM_MODEL",
        default_base_url: None,
        default_model: None,
        host_hint: None,
        traits: HOSTED,
    },
];

static BY_ID: Lazy<HashMap<&'static str, &'static ProviderProfile>> =
    Lazy::new(|| PROVIDERS.iter().map(|p| (p.id, p)).collect());

/// Look up a provider profile by identifier
pub fn find(platform_id: &str) -> Option<&'static ProviderProfile> {
    BY_ID.get(platform_id).copied()
}

/// Request traits for a platform, falling back to the `custom` entry
pub fn traits_for(platform_id: &str) -> RequestTraits {
    find(platform_id).map(|p| p.traits).unwrap_or(HOSTED)
}

/// Best-effort guess of the platform behind a base URL.
///
/// Only meant for callers that did not say which platform they use.
pub fn infer_platform(base_url: &str) -> &'static str {
    PROVIDERS
        .iter()
        .find(|p| p.host_hint.is_some_and(|hint| base_url.contains(hint)))
        .map(|p| p.id)
        .unwrap_or(CUSTOM_PLATFORM)
}
