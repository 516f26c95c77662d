use crate::domain::error::TranslateError;
use crate::domain::model::{ResolvedConfig, TranslationRequest};
use crate::domain::traits::TranslationService;
use crate::infrastructure::network::sse::EventStream;
use crate::infrastructure::providers::{self, RequestTraits};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

const SYSTEM_PROMPT: &str =
    "You are a professional and helpful translator. Translate accurately and naturally.";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4000;
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

// Chat-completion request body
#[derive(Serialize, Debug)]
pub struct ChatPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Translator speaking the chat-completion contract
///
/// One instance per resolved configuration; the `Client` is shared.
pub struct ChatTranslator {
    client: Client,
    config: ResolvedConfig,
    traits: RequestTraits,
    request_timeout: Duration,
}

impl ChatTranslator {
    pub fn new(client: Client, config: ResolvedConfig, request_timeout: Duration) -> Self {
        let traits = providers::traits_for(&config.platform_id);
        info!(
            "Translator initialized for platform: {}, Base URL: {}, Model: {}",
            config.platform_id, config.base_url, config.model
        );
        Self {
            client,
            config,
            traits,
            request_timeout,
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    pub fn headers(&self) -> HeaderMap {
        build_headers(&self.traits, &self.config.api_key)
    }

    pub fn payload(&self, request: &TranslationRequest) -> ChatPayload {
        build_payload(&self.traits, &self.config.model, request)
    }

    async fn send(&self, request: &TranslationRequest) -> Result<reqwest::Response, TranslateError> {
        let url = self.endpoint();
        info!(
            "Sending {} request to: {} for platform {} with model {}, API Key {}",
            if request.stream { "STREAM" } else { "NON-STREAM" },
            url,
            self.config.platform_id,
            self.config.model,
            self.config.masked_key()
        );

        let mut builder = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&self.payload(request));
        // Streams are bounded by the client's read timeout instead
        if !request.stream {
            builder = builder.timeout(self.request_timeout);
        }

        Ok(builder.send().await?)
    }

    async fn http_error(&self, response: reqwest::Response) -> TranslateError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let err = TranslateError::Http {
            status: status.as_u16(),
            message: format!(
                "{}\nDetails: {}",
                status_hint(status, &self.config.model),
                error_detail(&body)
            ),
        };
        error!(
            "HTTPError for {}: {}. Raw response: {}",
            self.config.platform_id,
            err,
            truncate(&body, 500)
        );
        err
    }
}

#[async_trait]
impl TranslationService for ChatTranslator {
    async fn translate_text(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        validate(request)?;

        let response = self.send(request).await.inspect_err(|e| {
            error!("Request failed for {}: {}", self.config.platform_id, e);
        })?;
        if !response.status().is_success() {
            return Err(self.http_error(response).await);
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| {
            TranslateError::ResponseFormat(format!(
                "Could not decode API response from {}: {}. Raw: {}",
                self.config.platform_id,
                e,
                truncate(&body, 200)
            ))
        })?;

        match data
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            Some(content) => Ok(content.trim().to_string()),
            None => {
                let err = TranslateError::ResponseFormat(format!(
                    "No translation found in response from {}. Raw: {}",
                    self.config.platform_id,
                    truncate(&data.to_string(), 500)
                ));
                error!("{}", err);
                Err(err)
            }
        }
    }

    async fn translate_stream(&self, request: &TranslationRequest) -> EventStream {
        if let Err(e) = validate(request) {
            return EventStream::failed(e.to_string());
        }

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Request failed for {}: {}", self.config.platform_id, e);
                return EventStream::failed(e.to_string());
            }
        };
        // Reading the body to the end hands the connection back
        if response.status().as_u16() >= 400 {
            return EventStream::failed(self.http_error(response).await.to_string());
        }

        EventStream::from_response(response)
    }
}

fn validate(request: &TranslationRequest) -> Result<(), TranslateError> {
    if request.text.trim().is_empty() {
        warn!("Attempted translation with empty text.");
        return Err(TranslateError::Validation(
            "Text to translate cannot be empty.".to_string(),
        ));
    }
    if request.target_lang.trim().is_empty() {
        warn!("Attempted translation with empty target language.");
        return Err(TranslateError::Validation(
            "Target language cannot be empty.".to_string(),
        ));
    }
    Ok(())
}

pub fn build_headers(traits: &RequestTraits, api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let key = api_key.trim();
    let is_sentinel = traits
        .auth_sentinels
        .iter()
        .any(|s| key.eq_ignore_ascii_case(s));
    let attach = traits.needs_auth_header || (!key.is_empty() && !is_sentinel);

    if attach && !key.is_empty() {
        match HeaderValue::from_str(&format!("Bearer {}", key)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("API key contains characters not allowed in a header; sending without auth"),
        }
    }

    headers
}

pub fn build_payload(traits: &RequestTraits, model: &str, request: &TranslationRequest) -> ChatPayload {
    let instruction = match &request.source_lang {
        Some(source) => format!(
            "Translate the following text from {} to {}:\n\n{}",
            source, request.target_lang, request.text
        ),
        None => format!(
            "Translate the following text to {}:\n\n{}",
            request.target_lang, request.text
        ),
    };

    let (temperature, max_tokens) = if traits.supports_sampling_params {
        (Some(TEMPERATURE), Some(MAX_TOKENS))
    } else {
        (None, None)
    };

    ChatPayload {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: instruction,
            },
        ],
        stream: request.stream,
        temperature,
        max_tokens,
    }
}

/// Human hint for an HTTP failure status
pub fn status_hint(status: StatusCode, model: &str) -> String {
    match status.as_u16() {
        401 => "Unauthorized. API Key is invalid, missing, or expired.".to_string(),
        403 => "Forbidden. API Key may lack permissions for this model/operation.".to_string(),
        404 => format!("Not Found. Model '{}' or API endpoint incorrect.", model),
        429 => "Rate Limit Exceeded. Please wait and try again or check your plan.".to_string(),
        s if s >= 500 => "API Server Error. Please try again later.".to_string(),
        _ => "A client-side or unexpected API error occurred.".to_string(),
    }
}

/// Pull the most useful message out of an error body
pub fn error_detail(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return truncate(body, 500);
    };

    [
        "/error/message",
        "/errors/message",
        "/detail",
        "/error",
        "/message",
    ]
    .iter()
    .filter_map(|path| json.pointer(path).and_then(Value::as_str))
    .find(|s| !s.is_empty())
    .map(str::to_string)
    .unwrap_or_else(|| truncate(body, 500))
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
