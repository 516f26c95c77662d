use crate::domain::error::TranslateError;
use crate::domain::model::{StreamEvent, TranslationRequest};
use crate::domain::traits::TranslationService;
use std::io::Write;
use tracing::info;

/// How streamed events are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    /// Text chunks only, as they arrive
    Plain,
    /// One SSE frame per event
    Sse,
}

/// How the CLI delivers a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Whole,
    Stream(StreamFormat),
}

impl OutputMode {
    /// `--no-stream` wins; `--sse` asks for a stream even when the config
    /// turns streaming off.
    pub fn select(no_stream: bool, sse: bool, config_stream: bool) -> Self {
        if no_stream {
            OutputMode::Whole
        } else if sse {
            OutputMode::Stream(StreamFormat::Sse)
        } else if config_stream {
            OutputMode::Stream(StreamFormat::Plain)
        } else {
            OutputMode::Whole
        }
    }
}

/// Outcome of a streamed translation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub text: String,
    pub chunks: usize,
    pub error: Option<String>,
    pub completed: bool,
}

impl StreamSummary {
    /// The stream ended on an upstream error
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

pub async fn translate_text(
    service: &dyn TranslationService,
    request: &TranslationRequest,
) -> Result<String, TranslateError> {
    info!(
        "Processing text translation: '{}...' to {}",
        request.text.chars().take(50).collect::<String>(),
        request.target_lang
    );
    service.translate_text(request).await
}

/// Stream a translation into `out`, flushing after every event.
///
/// Upstream failures end up in the summary (and in `out` for SSE); only
/// failures of `out` itself are returned as errors.
pub async fn stream_translation<W: Write>(
    service: &dyn TranslationService,
    request: &TranslationRequest,
    format: StreamFormat,
    out: &mut W,
) -> Result<StreamSummary, TranslateError> {
    let mut events = service.translate_stream(request).await;
    let mut summary = StreamSummary::default();

    while let Some(event) = events.next_event().await {
        if format == StreamFormat::Sse {
            out.write_all(event.to_sse_frame().as_bytes())?;
        }
        match event {
            StreamEvent::TextChunk(content) => {
                if format == StreamFormat::Plain {
                    out.write_all(content.as_bytes())?;
                }
                summary.text.push_str(&content);
                summary.chunks += 1;
            }
            StreamEvent::Error(message) => summary.error = Some(message),
            StreamEvent::Done => summary.completed = true,
        }
        out.flush()?;
    }

    info!(
        "Translation stream generation ended after {} chunks",
        summary.chunks
    );
    Ok(summary)
}
