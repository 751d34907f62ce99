//! Assembly of newline-delimited JSON chat responses.
//!
//! The chat endpoint answers with one JSON object per line, each optionally
//! carrying a `content` fragment. Reads do not respect line or even UTF-8
//! boundaries, so bytes are buffered until a full line is available. Lines are
//! handled strictly in arrival order.

use futures_util::{Stream, StreamExt};
use memchr::memchr;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::postprocess::postprocess;

/// One line of the chat stream.
///
/// Only a string `content` and a numeric `cost` are read; any other JSON
/// value, or a field of another type, contributes nothing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StreamChunk {
    pub content: Option<String>,
    pub cost: Option<f64>,
}

impl StreamChunk {
    pub fn from_value(value: &Value) -> Self {
        Self {
            content: value
                .get("content")
                .and_then(Value::as_str)
                .map(str::to_string),
            cost: value.get("cost").and_then(Value::as_f64),
        }
    }
}

/// What a parsed line contributed, as seen by the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent<'a> {
    Fragment(&'a str),
    Cost(f64),
}

/// Incremental state for a single streamed response.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    pending: Vec<u8>,
    content: String,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated, post-processed content so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Bytes received but not yet terminated by a newline.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn push_chunk<F>(&mut self, chunk: &[u8], sink: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        self.pending.extend_from_slice(chunk);

        // A newline byte never occurs inside a multi-byte UTF-8 sequence, so
        // every complete line decodes on its own and split characters simply
        // wait in `pending` for the next read.
        while let Some(newline_pos) = memchr(b'\n', &self.pending) {
            let line_bytes: Vec<u8> = self.pending.drain(..=newline_pos).collect();
            let line = String::from_utf8_lossy(&line_bytes[..newline_pos]);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(line) {
                Ok(value) => self.apply_chunk(StreamChunk::from_value(&value), sink),
                Err(err) => {
                    warn!(line = %line, error = %err, "Skipping malformed stream line");
                }
            }
        }
    }

    /// Resolve whatever is still buffered and return the full content.
    ///
    /// A trailing line without a newline is parsed like any other; if it is
    /// not valid JSON it is kept verbatim rather than dropped.
    pub fn finish<F>(mut self, sink: &mut F) -> String
    where
        F: FnMut(StreamEvent<'_>),
    {
        let remainder = std::mem::take(&mut self.pending);
        let remainder = String::from_utf8_lossy(&remainder);
        let remainder = remainder.trim();

        if !remainder.is_empty() {
            debug!(bytes = remainder.len(), "Resolving unterminated stream tail");
            match serde_json::from_str::<Value>(remainder) {
                Ok(value) => self.apply_chunk(StreamChunk::from_value(&value), sink),
                Err(err) => {
                    warn!(error = %err, "Stream tail is not JSON, keeping it as text");
                    self.content.push_str(remainder);
                    sink(StreamEvent::Fragment(remainder));
                }
            }
        }

        self.content
    }

    fn apply_chunk<F>(&mut self, chunk: StreamChunk, sink: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        if let Some(cost) = chunk.cost {
            sink(StreamEvent::Cost(cost));
        }

        let Some(raw) = chunk.content.filter(|content| !content.is_empty()) else {
            return;
        };
        let fragment = postprocess(&raw);
        self.content.push_str(&fragment);
        sink(StreamEvent::Fragment(&fragment));
    }
}

/// Drive a byte stream to completion through a [`StreamAssembler`].
///
/// Transport errors abort assembly and are returned as-is, so callers can tell
/// a failed stream apart from one that finished with no content.
pub async fn assemble_stream<S, B, E, F>(mut stream: S, mut sink: F) -> Result<String, E>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    F: FnMut(StreamEvent<'_>),
{
    let mut assembler = StreamAssembler::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        assembler.push_chunk(chunk.as_ref(), &mut sink);
    }
    Ok(assembler.finish(&mut sink))
}
