//! Newline-delimited JSON stream reduction
//!
//! The chat endpoint answers with one JSON object per line, each shaped like
//! `{"message": {"content": "..."}, "done": false}`. The reducer decodes each
//! line on its own, appends the content fragments in arrival order and stops
//! at the first line reporting `done: true`. A line that fails to decode is
//! skipped; the rest of the answer is kept.

use std::pin::pin;

use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{ChatResponse, LlmError, StreamChunk, TokenUsage};

/// One decoded stream line
#[derive(Debug, Clone, Deserialize)]
pub struct ChatLine {
    #[serde(default)]
    pub message: Option<ChatLineMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatLineMessage {
    #[serde(default)]
    pub content: String,
}

impl ChatLine {
    fn content(&self) -> &str {
        self.message.as_ref().map(|m| m.content.as_str()).unwrap_or("")
    }
}

/// Decode one line; `None` for blank lines
pub fn decode_line(raw: &[u8]) -> Option<Result<ChatLine, String>> {
    let text = match std::str::from_utf8(raw) {
        Ok(t) => t.trim(),
        Err(e) => return Some(Err(format!("invalid UTF-8: {}", e))),
    };
    if text.is_empty() {
        return None;
    }
    Some(serde_json::from_str::<ChatLine>(text).map_err(|e| e.to_string()))
}

/// Longest partial line held while waiting for its newline
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// Bytes of an overlong line kept in its `Skipped` chunk
const OVERLONG_PREVIEW: usize = 256;

/// Accumulator state for one streamed completion
#[derive(Debug, Default)]
struct Accumulator {
    response: ChatResponse,
}

impl Accumulator {
    /// Feed one raw line, returning the chunks to publish
    ///
    /// A line carrying an `error` field ends the completion.
    fn feed(&mut self, raw: &[u8]) -> Result<Vec<StreamChunk>, LlmError> {
        let line = match decode_line(raw) {
            None => return Ok(Vec::new()),
            Some(Ok(line)) => line,
            Some(Err(reason)) => {
                self.response.skipped_lines += 1;
                let line = String::from_utf8_lossy(raw).into_owned();
                warn!(%reason, line_len = line.len(), "stream: skipping malformed line");
                return Ok(vec![StreamChunk::Skipped { line }]);
            }
        };

        self.response.chunk_count += 1;
        if let Some(error) = &line.error {
            warn!(%error, "stream: endpoint reported an error line");
            return Err(LlmError::InvalidResponse(format!("endpoint error: {}", error)));
        }

        let mut chunks = Vec::new();
        let content = line.content();
        if !content.is_empty() {
            self.response.content.push_str(content);
            chunks.push(StreamChunk::TextDelta(content.to_string()));
        }

        if line.done {
            self.response.done_seen = true;
            self.response.usage = TokenUsage {
                prompt_tokens: line.prompt_eval_count.unwrap_or(0),
                completion_tokens: line.eval_count.unwrap_or(0),
            };
            chunks.push(StreamChunk::Done {
                usage: self.response.usage,
            });
        }
        Ok(chunks)
    }

    /// Count a line that outgrew `MAX_LINE_BYTES` as skipped
    fn skip_overlong(&mut self, partial: &[u8]) -> StreamChunk {
        self.response.skipped_lines += 1;
        warn!(limit = MAX_LINE_BYTES, "stream: skipping overlong line");
        let preview = &partial[..partial.len().min(OVERLONG_PREVIEW)];
        StreamChunk::Skipped {
            line: String::from_utf8_lossy(preview).into_owned(),
        }
    }
}

/// Reduce a byte stream of NDJSON lines to one accumulated response
///
/// Network chunks need not align with lines; bytes are buffered until a
/// newline arrives. A partial line longer than `MAX_LINE_BYTES` is skipped
/// through its newline. A trailing line without a newline is decoded when the
/// stream ends. Nothing after the `done: true` line is read.
pub async fn reduce_stream<S, B, E>(stream: S, chunk_tx: &mpsc::Sender<StreamChunk>) -> Result<ChatResponse, LlmError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    LlmError: From<E>,
{
    debug!("reduce_stream: called");
    let mut stream = pin!(stream);
    let mut acc = Accumulator::default();
    let mut buffer: Vec<u8> = Vec::new();
    let mut discarding = false;

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(chunk?.as_ref());

        while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            if discarding {
                // tail of an overlong line
                discarding = false;
                continue;
            }
            for out in acc.feed(&line[..pos])? {
                let _ = chunk_tx.send(out).await;
            }
            if acc.response.done_seen {
                debug!(chunks = acc.response.chunk_count, "reduce_stream: done marker seen");
                return Ok(acc.response);
            }
        }

        if buffer.len() > MAX_LINE_BYTES {
            if !discarding {
                let out = acc.skip_overlong(&buffer);
                let _ = chunk_tx.send(out).await;
                discarding = true;
            }
            buffer.clear();
        }
    }

    if !buffer.is_empty() && !discarding {
        debug!(len = buffer.len(), "reduce_stream: decoding unterminated final line");
        for out in acc.feed(&buffer)? {
            let _ = chunk_tx.send(out).await;
        }
    }

    debug!(
        chunks = acc.response.chunk_count,
        skipped = acc.response.skipped_lines,
        done_seen = acc.response.done_seen,
        "reduce_stream: stream ended"
    );
    Ok(acc.response)
}
