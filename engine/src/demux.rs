//! Per-fetch byte accumulator that yields complete newline-terminated JSON
//! records as they arrive, tolerating arbitrary chunk boundaries.

/// An append-only buffer that peels off complete `\n`-terminated lines.
///
/// Mirrors the SSE buffer-draining shape in the provider transport this
/// workspace is grounded on, but frames on a single `\n` instead of a blank
/// line, since the wire format here is NDJSON rather than SSE.
#[derive(Debug, Default)]
pub struct LineDemux {
    buf: Vec<u8>,
}

impl LineDemux {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and drain every complete line now available. Partial
    /// trailing bytes stay buffered for the next call.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // trailing \n
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if !line.is_empty() {
                lines.push(String::from_utf8_lossy(&line).into_owned());
            }
        }
        lines
    }

    /// Whatever remains unterminated when the fetch ends. dnsdbq treats a
    /// dangling partial line at EOF as nothing: the server is expected to
    /// always terminate its last record with `\n`.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }
}
