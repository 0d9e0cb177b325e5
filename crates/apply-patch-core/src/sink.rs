//! Output sink: incremental decoding of subprocess output into a transcript.

use std::cell::RefCell;
use std::io::Write;

/// Append-only text surface for raw subprocess output.
///
/// Appends never fail; a transcript that cannot write drops the text.
pub trait Transcript {
    /// Append text to the end of the transcript.
    fn append(&self, text: &str);
}

/// Incremental UTF-8 decoder.
///
/// A multi-byte character split across chunk boundaries is held back until
/// the rest of it arrives. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a decoder with no buffered bytes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Decode the next chunk, returning all text completed by it.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut text = String::with_capacity(bytes.len());
        let mut pieces = bytes.utf8_chunks().peekable();
        while let Some(piece) = pieces.next() {
            text.push_str(piece.valid());

            let invalid = piece.invalid();
            if invalid.is_empty() {
                continue;
            }
            if pieces.peek().is_none() && is_incomplete(invalid) {
                self.pending = invalid.to_vec();
            } else {
                text.push(char::REPLACEMENT_CHARACTER);
            }
        }
        text
    }

    /// Flush the decoder at end of stream.
    ///
    /// A dangling incomplete sequence becomes a single U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }

    /// Whether bytes are buffered waiting for the rest of a character.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Truncated but otherwise well-formed sequence at the end of input.
fn is_incomplete(bytes: &[u8]) -> bool {
    matches!(std::str::from_utf8(bytes), Err(e) if e.error_len().is_none())
}

/// Byte-stream consumer forwarding decoded text to a [`Transcript`].
///
/// One sink is used per source stream so each keeps its own decoder state.
pub struct OutputSink<'a, T: Transcript + ?Sized> {
    transcript: &'a T,
    decoder: Utf8Decoder,
}

impl<'a, T: Transcript + ?Sized> OutputSink<'a, T> {
    /// Create a sink appending to `transcript`.
    pub const fn new(transcript: &'a T) -> Self {
        Self {
            transcript,
            decoder: Utf8Decoder::new(),
        }
    }

    /// Decode a raw chunk and append whatever text it completes.
    pub fn write_bytes(&mut self, chunk: &[u8]) {
        let text = self.decoder.decode(chunk);
        if !text.is_empty() {
            self.transcript.append(&text);
        }
    }

    /// Append already-decoded text unchanged.
    pub fn write_str(&mut self, text: &str) {
        self.transcript.append(text);
    }

    /// Flush any incomplete trailing sequence.
    pub fn finish(&mut self) {
        let tail = self.decoder.finish();
        if !tail.is_empty() {
            self.transcript.append(&tail);
        }
    }
}

/// Transcript writing to any [`Write`], flushed after every append.
#[derive(Debug)]
pub struct WriterTranscript<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> WriterTranscript<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> Transcript for WriterTranscript<W> {
    fn append(&self, text: &str) {
        let mut writer = self.writer.borrow_mut();
        let _ = writer.write_all(text.as_bytes());
        let _ = writer.flush();
    }
}

/// In-memory transcript.
#[derive(Debug, Default)]
pub struct MemoryTranscript {
    text: RefCell<String>,
}

impl MemoryTranscript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far.
    #[must_use]
    pub fn contents(&self) -> String {
        self.text.borrow().clone()
    }
}

impl Transcript for MemoryTranscript {
    fn append(&self, text: &str) {
        self.text.borrow_mut().push_str(text);
    }
}
