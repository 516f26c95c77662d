use serde_json::json;

// 解析完成的调用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub platform_id: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl ResolvedConfig {
    /// Key with only its tail visible, for logs
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() > 8 {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("...{}", tail)
        } else {
            "(short)".to_string()
        }
    }
}

// 调用方提供的覆盖值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl Overrides {
    pub fn new(api_key: Option<String>, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            api_key,
            base_url,
            model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub target_lang: String,
    pub source_lang: Option<String>,
    pub stream: bool,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_lang: target_lang.into(),
            source_lang: None,
            stream: false,
        }
    }

    pub fn with_source_lang(mut self, source_lang: Option<String>) -> Self {
        // 空字符串视为未指定
        self.source_lang = source_lang.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Normalized event emitted by the stream re-framer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    TextChunk(String),
    Error(String),
    Done,
}

impl StreamEvent {
    /// Terminal events end the sequence
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Error(_) | StreamEvent::Done)
    }

    /// Serialize as one SSE frame, blank-line terminated
    pub fn to_sse_frame(&self) -> String {
        let payload = match self {
            StreamEvent::TextChunk(content) => json!({ "text_chunk": content }),
            StreamEvent::Error(message) => json!({ "error": message }),
            StreamEvent::Done => json!({ "done": true }),
        };
        format!("data: {}\n\n", payload)
    }
}
