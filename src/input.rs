//! Line framing and routing for the stdin front end.

use crate::commands::is_command_line;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const CONNECTED: &str = "/connected";
pub const DISCONNECTED: &str = "/disconnected";

/// What one input line asks the greeter to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine<'a> {
    /// The local user joined the server
    Connected,
    Disconnected,
    /// A `/welcomer ...` command for the controller
    Command(&'a str),
    /// Anything else, offered to the join parser as-is
    Chat(&'a str),
}

impl<'a> InputLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if line == CONNECTED {
            InputLine::Connected
        } else if line == DISCONNECTED {
            InputLine::Disconnected
        } else if is_command_line(line) {
            InputLine::Command(line)
        } else {
            InputLine::Chat(line)
        }
    }
}

/// Reads newline-terminated lines as raw bytes.
///
/// Only the terminator (`\n` or `\r\n`) is removed. A line that isn't valid
/// UTF-8 is logged and skipped; the next one is read as usual.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    /// Next decodable line, or `None` at end of input
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        loop {
            self.buf.clear();
            if self.inner.read_until(b'\n', &mut self.buf).await? == 0 {
                return Ok(None);
            }

            match std::str::from_utf8(strip_terminator(&self.buf)) {
                Ok(line) => return Ok(Some(line.to_string())),
                Err(e) => tracing::warn!("Dropping input line that is not UTF-8: {}", e),
            }
        }
    }
}

fn strip_terminator(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}
