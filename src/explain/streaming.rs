//! Server-Sent Events (SSE) decoding for Claude streaming responses

use std::collections::VecDeque;

use futures_util::stream::{self, Stream, StreamExt};

use super::error::ExplainError;
use super::explainer::ChunkStream;
use super::models::StreamEvent;

/// Incremental SSE line decoder
///
/// Bytes are buffered until a full line is available, so multi-byte UTF-8
/// characters split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event_type: String,
}

impl SseDecoder {
    /// Feed raw bytes and return every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end();

            if let Some(event_type) = line.strip_prefix("event:") {
                self.event_type = event_type.trim().to_string();
            } else if let Some(data) = line.strip_prefix("data:") {
                if let Some(event) = parse_event(&self.event_type, data.trim_start()) {
                    events.push(event);
                }
            }
            // Empty lines and `:` comments carry nothing
        }

        events
    }
}

/// Parse a single SSE event from event type and data
fn parse_event(event_type: &str, data: &str) -> Option<StreamEvent> {
    match event_type {
        "message_start" => {
            let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
            let id = parsed["message"]["id"].as_str()?.to_string();
            Some(StreamEvent::MessageStart { id })
        }

        "content_block_start" => Some(StreamEvent::ContentBlockStart),

        "content_block_delta" => {
            let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
            let text = parsed["delta"]["text"].as_str()?.to_string();
            Some(StreamEvent::ContentBlockDelta { text })
        }

        "content_block_stop" => Some(StreamEvent::ContentBlockStop),

        "message_delta" => {
            let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
            let stop_reason = parsed["delta"]["stop_reason"].as_str().map(|s| s.to_string());
            Some(StreamEvent::MessageDelta { stop_reason })
        }

        "message_stop" => Some(StreamEvent::MessageStop),

        "ping" => Some(StreamEvent::Ping),

        "error" => {
            let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
            let message =
                parsed["error"]["message"].as_str().unwrap_or("Unknown error").to_string();
            Some(StreamEvent::Error { message })
        }

        _ => {
            tracing::debug!("Unknown SSE event type: {}", event_type);
            None
        }
    }
}

/// Reported when the body ends before `message_stop`
pub const TRUNCATED_STREAM: &str = "stream ended before message_stop";

/// State threaded through the text delta stream
struct DeltaState<S> {
    bytes: S,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, ExplainError>>,
    done: bool,
}

impl<S> DeltaState<S> {
    fn enqueue(&mut self, bytes: &[u8]) {
        for event in self.decoder.push(bytes) {
            match event {
                StreamEvent::ContentBlockDelta { text } => {
                    if !text.is_empty() {
                        self.pending.push_back(Ok(text));
                    }
                }
                StreamEvent::Error { message } => {
                    self.pending.push_back(Err(ExplainError::StreamError(message)));
                    self.done = true;
                    return;
                }
                StreamEvent::MessageStop => {
                    self.done = true;
                    return;
                }
                StreamEvent::MessageStart { id } => tracing::debug!("Message {} started", id),
                StreamEvent::MessageDelta { stop_reason: Some(reason) } => {
                    tracing::debug!("Message stopping: {}", reason)
                }
                _ => {}
            }
        }
    }
}

/// Turn a raw SSE byte stream into a stream of text chunks
///
/// Ends after `message_stop` or after the first error. A body that ends
/// without `message_stop` yields a final error.
pub fn text_deltas<S, B>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = DeltaState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.done {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => state.enqueue(chunk.as_ref()),
                Some(Err(e)) => {
                    state.pending.push_back(Err(ExplainError::RequestError(e)));
                    state.done = true;
                }
                None => {
                    state.pending.push_back(Err(ExplainError::StreamError(TRUNCATED_STREAM.into())));
                    state.done = true;
                }
            }
        }
    })
    .boxed()
}
