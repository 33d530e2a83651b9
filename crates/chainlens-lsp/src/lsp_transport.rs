//! JSON-RPC/LSP stdio framing.
//!
//! LSP messages are JSON values framed by HTTP-like headers:
//!
//! ```text
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of UTF-8 JSON>
//! ```

use serde_json::Value;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::mpsc;
use std::thread;
use thiserror::Error;

/// Largest frame body accepted by [`read_message`].
pub const MAX_CONTENT_LENGTH: usize = 64 * 1024 * 1024;

/// Errors produced while reading or writing framed messages.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A header block ended without `Content-Length`.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// `Content-Length` was not a byte count up to [`MAX_CONTENT_LENGTH`].
    #[error("invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),

    /// The frame body was not valid JSON. The frame itself was consumed.
    #[error("malformed JSON-RPC payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// Whether the stream can still be read after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

/// Write a single framed message to `writer`.
pub fn write_message<W: Write>(writer: &mut W, value: &Value) -> Result<(), TransportError> {
    let body = serde_json::to_vec(value)?;

    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// Read a single framed message from `reader`.
///
/// Returns `Ok(None)` on clean EOF.
pub fn read_message<R: BufRead>(reader: &mut R) -> Result<Option<Value>, TransportError> {
    let mut content_length: Option<usize> = None;
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            if content_length.is_none() {
                return Err(TransportError::MissingContentLength);
            }
            break;
        }

        // Header names are case-insensitive; `Content-Type` is accepted and ignored.
        if let Some((name, rest)) = trimmed.split_once(':')
            && name.trim().eq_ignore_ascii_case("Content-Length")
        {
            let raw = rest.trim();
            let len = raw
                .parse::<usize>()
                .ok()
                .filter(|len| *len <= MAX_CONTENT_LENGTH)
                .ok_or_else(|| TransportError::InvalidContentLength(raw.to_string()))?;
            content_length = Some(len);
        }
    }

    let len = content_length.ok_or(TransportError::MissingContentLength)?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;

    Ok(Some(serde_json::from_slice(&body)?))
}

/// Decode messages from `input` on a background thread.
///
/// The channel yields every decoded message, plus recoverable errors. It closes after EOF or the
/// first unrecoverable error (which is sent before closing).
pub fn spawn_reader<R>(input: R) -> mpsc::Receiver<Result<Value, TransportError>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut reader = BufReader::new(input);
        loop {
            match read_message(&mut reader) {
                Ok(Some(value)) => {
                    if tx.send(Ok(value)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    let fatal = !err.is_recoverable();
                    if tx.send(Err(err)).is_err() || fatal {
                        break;
                    }
                }
            }
        }
    });
    rx
}
