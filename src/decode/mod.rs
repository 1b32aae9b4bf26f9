//! Streaming UTF-8 decoding.
//!
//! Bytes arrive in arbitrary chunks, so a multi-byte character may be split
//! across two pushes. [`Utf8Decoder`] keeps the incomplete tail of one chunk
//! and completes it with the head of the next. Invalid sequences decode to
//! U+FFFD, one replacement per maximal invalid subpart, which is exactly what
//! [`String::from_utf8_lossy`] produces for the same bytes in one piece.

const BOM: char = '\u{FEFF}';

/// Incremental UTF-8 decoder with explicit remainder state.
#[derive(Debug)]
pub(crate) struct Utf8Decoder {
    /// Incomplete trailing sequence of the previous chunk (at most 3 bytes).
    remainder: Vec<u8>,
    /// No character has been produced yet.
    at_start: bool,
}

impl Utf8Decoder {
    pub(crate) fn new() -> Self {
        Self {
            remainder: Vec::with_capacity(4),
            at_start: true,
        }
    }

    /// Decodes `bytes`, appending complete characters to `out`.
    pub(crate) fn decode(&mut self, bytes: &[u8], out: &mut String) {
        let start = out.len();

        if self.remainder.is_empty() {
            self.decode_slice(bytes, out);
        } else {
            let mut joined = std::mem::take(&mut self.remainder);
            joined.extend_from_slice(bytes);
            self.decode_slice(&joined, out);
        }

        self.strip_bom(out, start);
    }

    /// Flushes the remainder at end of stream.
    ///
    /// An incomplete sequence can never be completed now and becomes a single
    /// replacement character.
    pub(crate) fn flush(&mut self, out: &mut String) {
        let start = out.len();
        if !self.remainder.is_empty() {
            self.remainder.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
        self.strip_bom(out, start);
    }

    /// Number of buffered bytes waiting for the rest of their character.
    pub(crate) fn pending_len(&self) -> usize {
        self.remainder.len()
    }

    fn decode_slice(&mut self, mut input: &[u8], out: &mut String) {
        loop {
            match std::str::from_utf8(input) {
                Ok(s) => {
                    out.push_str(s);
                    return;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));

                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        None => {
                            // Truncated sequence: wait for the next chunk
                            self.remainder.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Drops a byte order mark if it is the very first character of the stream.
    fn strip_bom(&mut self, out: &mut String, start: usize) {
        if !self.at_start || out.len() == start {
            return;
        }
        self.at_start = false;
        if out[start..].starts_with(BOM) {
            out.replace_range(start..start + BOM.len_utf8(), "");
        }
    }
}
