//! Incremental Server-Sent Events parsing.
//!
//! The decoder accepts raw transport chunks split at arbitrary byte
//! boundaries and yields complete SSE events. Field handling follows the
//! WHATWG event-stream grammar: `data:`, `event:`, `id:` and `retry:`
//! fields, `:` comment lines, and blank-line event dispatch, with `\n`,
//! `\r` and `\r\n` all accepted as line terminators.

use bytes::Bytes;
use std::collections::VecDeque;

/// A single decoded Server-Sent Event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type (optional)
    pub event: Option<String>,
    /// Event data payload, `data:` lines joined with `\n`
    pub data: Bytes,
    /// Event ID (optional)
    pub id: Option<String>,
    /// Retry timeout in milliseconds (optional)
    pub retry: Option<u64>,
}

/// Incremental SSE decoder that is correct across chunk boundaries.
#[derive(Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    event_name: Option<String>,
    id: Option<String>,
    retry: Option<u64>,
    data_lines: Vec<String>,
    ready: VecDeque<SseEvent>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a transport chunk and drain any events it completed.
    pub fn push(&mut self, chunk: &[u8]) -> impl Iterator<Item = SseEvent> + '_ {
        self.buf.extend_from_slice(chunk);
        self.scan();
        self.ready.drain(..)
    }

    /// True when bytes or field fragments are still pending dispatch.
    pub fn has_buffered_data(&self) -> bool {
        !self.buf.is_empty() || !self.data_lines.is_empty()
    }

    /// Finalize the stream and flush any buffered event.
    ///
    /// Some servers close the connection right after the final `data:` line
    /// without the blank line that normally dispatches it. A synthetic
    /// terminator recovers that trailing event instead of dropping it.
    pub fn finish(&mut self) -> impl Iterator<Item = SseEvent> + '_ {
        if self.has_buffered_data() {
            self.buf.extend_from_slice(b"\n\n");
            self.scan();
        }
        self.ready.drain(..)
    }

    fn scan(&mut self) {
        while let Some((line, consumed)) = take_line(&self.buf) {
            self.handle_line(&line);
            self.buf.drain(..consumed);
        }
    }

    fn handle_line(&mut self, line: &str) {
        if line.is_empty() {
            self.dispatch();
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.find(':') {
            Some(pos) => {
                let value = &line[pos + 1..];
                (&line[..pos], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };
        match field {
            "data" => self.data_lines.push(value.to_string()),
            "event" => self.event_name = Some(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(ms);
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self) {
        // Events that carried no data lines are dropped, per grammar.
        if self.data_lines.is_empty() {
            self.event_name = None;
            self.id = None;
            self.retry = None;
            return;
        }
        let data = std::mem::take(&mut self.data_lines).join("\n");
        self.ready.push_back(SseEvent {
            event: self.event_name.take(),
            data: Bytes::from(data),
            id: self.id.take(),
            retry: self.retry.take(),
        });
    }
}

/// Extract the next complete line from `buf`, returning the line text and
/// the number of bytes to consume (line + terminator). A lone `\r` at the
/// end of the buffer is ambiguous (a `\n` may follow in the next chunk) and
/// leaves the line buffered.
fn take_line(buf: &[u8]) -> Option<(String, usize)> {
    for (idx, byte) in buf.iter().enumerate() {
        match byte {
            b'\n' => {
                let line = String::from_utf8_lossy(&buf[..idx]).into_owned();
                return Some((line, idx + 1));
            }
            b'\r' => {
                if idx + 1 >= buf.len() {
                    return None;
                }
                let terminator = if buf[idx + 1] == b'\n' { 2 } else { 1 };
                let line = String::from_utf8_lossy(&buf[..idx]).into_owned();
                return Some((line, idx + terminator));
            }
            _ => {}
        }
    }
    None
}
