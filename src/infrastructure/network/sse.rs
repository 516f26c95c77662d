//! Re-framing of upstream streaming responses.
//!
//! Providers stream either SSE `data:` frames or bare JSON lines. Both are
//! turned into the normalized [`StreamEvent`] sequence.

use crate::domain::error::TranslateError;
use crate::domain::model::StreamEvent;
use futures_util::stream::{self, Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;
use tracing::{debug, error, info, warn};

/// Longest line the re-framer will hold while waiting for its newline
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// Raw upstream body, chunk by chunk
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TranslateError>> + Send>>;

/// Lazy, non-restartable sequence of [`StreamEvent`]s.
///
/// Owns the upstream body. The body is dropped, and with it the connection,
/// as soon as a terminal event is produced, the upstream closes, or the
/// `EventStream` itself is dropped.
pub struct EventStream {
    source: Option<ByteStream>,
    buffer: Vec<u8>,
    queued: Option<StreamEvent>,
    finished: bool,
}

impl EventStream {
    pub fn new(source: ByteStream) -> Self {
        Self {
            source: Some(source),
            buffer: Vec::new(),
            queued: None,
            finished: false,
        }
    }

    pub fn from_response(response: reqwest::Response) -> Self {
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(TranslateError::from));
        Self::new(Box::pin(body))
    }

    /// A sequence holding exactly one `Error` event
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        debug!("Yielding error stream: {}", message);
        Self {
            source: None,
            buffer: Vec::new(),
            queued: Some(StreamEvent::Error(message)),
            finished: false,
        }
    }

    /// Whether the upstream body has been let go
    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }

    /// Pull the next event. Returns `None` once the sequence is exhausted.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        loop {
            if let Some(event) = self.queued.take() {
                return Some(self.emit(event));
            }
            if self.finished {
                return None;
            }

            if let Some(line) = self.take_line() {
                if let Some(event) = parse_line(&line) {
                    return Some(self.emit(event));
                }
                continue;
            }

            let Some(source) = self.source.as_mut() else {
                return self.drain_remaining();
            };
            match source.next().await {
                Some(Ok(chunk)) => {
                    self.buffer.extend_from_slice(&chunk);
                    let pending = self.pending_line_len();
                    if pending > MAX_LINE_BYTES {
                        let err = TranslateError::StreamProtocol(format!(
                            "line exceeds {} bytes without a newline",
                            MAX_LINE_BYTES
                        ));
                        error!("Dropping upstream after {} buffered bytes: {}", pending, err);
                        self.finish();
                        return Some(StreamEvent::Error(err.to_string()));
                    }
                }
                Some(Err(e)) => {
                    error!("Stream interrupted: {}", e);
                    self.finish();
                    return Some(StreamEvent::Error(e.to_string()));
                }
                None => {
                    self.source = None;
                    return self.drain_remaining();
                }
            }
        }
    }

    /// Adapt into a `futures` stream
    pub fn into_stream(self) -> impl Stream<Item = StreamEvent> + Send {
        stream::unfold(self, |mut events| async move {
            events.next_event().await.map(|event| (event, events))
        })
    }

    fn emit(&mut self, event: StreamEvent) -> StreamEvent {
        if event.is_terminal() {
            self.finish();
        }
        event
    }

    // Upstream closed: whatever is left in the buffer is the last line.
    fn drain_remaining(&mut self) -> Option<StreamEvent> {
        let rest = std::mem::take(&mut self.buffer);
        self.finish();
        if rest.is_empty() {
            return None;
        }
        parse_line(&String::from_utf8_lossy(&rest))
    }

    fn take_line(&mut self) -> Option<String> {
        let pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    // Bytes after the last newline, i.e. the line still being assembled
    fn pending_line_len(&self) -> usize {
        match self.buffer.iter().rposition(|&b| b == b'\n') {
            Some(pos) => self.buffer.len() - pos - 1,
            None => self.buffer.len(),
        }
    }

    fn finish(&mut self) {
        if !self.finished {
            info!("Translation stream ended");
        }
        self.source = None;
        self.buffer.clear();
        self.finished = true;
    }
}

/// Interpret one upstream line.
///
/// Returns `None` for lines that carry no event: comments, keep-alives,
/// role-only deltas and malformed JSON.
pub fn parse_line(line: &str) -> Option<StreamEvent> {
    let trimmed = line.trim();
    let payload = if let Some(rest) = trimmed.strip_prefix("data:") {
        rest.trim()
    } else if trimmed.starts_with('{') && trimmed.ends_with('}') {
        debug!("Received non-standard JSON line, processing as data: {}", trimmed);
        trimmed
    } else {
        if !trimmed.is_empty() {
            debug!("Skipping non-data line from stream: {}", trimmed);
        }
        return None;
    };

    if payload == "[DONE]" {
        info!("Stream finished with [DONE] marker");
        return Some(StreamEvent::Done);
    }

    let frame: Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            let err = TranslateError::StreamProtocol(format!("{} in {}", e, payload));
            warn!("{}", err);
            return None;
        }
    };

    if let Some(content) = frame
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
    {
        return Some(StreamEvent::TextChunk(content.to_string()));
    }

    if let Some(message) = frame.get("error").and_then(error_message) {
        error!("Error in stream from API: {}", message);
        return Some(StreamEvent::Error(message));
    }

    if frame.get("done").and_then(Value::as_bool) == Some(true) {
        info!("Stream finished with 'done: true' marker");
        return Some(StreamEvent::Done);
    }

    None
}

fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => Some(
            map.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        ),
        Value::Bool(false) => None,
        other => Some(other.to_string()),
    }
}
