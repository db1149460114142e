//! Decoding of byte chunks whose UTF-8 sequences may be split between calls.
//!
//! Invalid sequences decode to U+FFFD, one replacement per maximal invalid
//! subpart, matching `bstr::decode_utf8`.

use core::ops::ControlFlow;

pub(crate) const REPLACEMENT: char = '\u{FFFD}';

/// Expected length of the sequence introduced by `lead`; 1 for bytes that
/// cannot start a multi-byte sequence.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

fn is_truncated(bytes: &[u8], decoded_len: usize) -> bool {
    decoded_len == bytes.len() && decoded_len < sequence_len(bytes[0])
}

/// The bytes of an incomplete sequence held until the next chunk.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Utf8Carry {
    bytes: [u8; 4],
    len: usize,
}

impl Utf8Carry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn pending(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn stash(&mut self, bytes: &[u8]) {
        debug_assert!(self.len + bytes.len() <= self.bytes.len());
        for &b in bytes {
            self.push(b);
        }
    }

    /// Drops the first `n` carried bytes.
    fn consume(&mut self, n: usize) {
        self.bytes.copy_within(n..self.len, 0);
        self.len -= n;
    }

    /// Discards a carried incomplete sequence, returning whether there was
    /// one.
    pub(crate) fn take_truncated(&mut self) -> bool {
        let had = self.len > 0;
        self.len = 0;
        had
    }

    /// Decodes the carried bytes followed by `input`, calling `f` for each
    /// character. A truncated sequence at the end of `input` is carried.
    ///
    /// Stops as soon as `f` breaks; the rest of `input` is dropped.
    pub(crate) fn decode<F>(&mut self, mut input: &[u8], mut f: F) -> ControlFlow<()>
    where
        F: FnMut(char) -> ControlFlow<()>,
    {
        while !self.is_empty() {
            let (ch, n) = bstr::decode_utf8(self.pending());
            match ch {
                Some(ch) => {
                    self.consume(n);
                    f(ch)?;
                }
                None if is_truncated(self.pending(), n) => {
                    let Some((&byte, rest)) = input.split_first() else {
                        return ControlFlow::Continue(());
                    };
                    self.push(byte);
                    input = rest;
                }
                None => {
                    self.consume(n);
                    f(REPLACEMENT)?;
                }
            }
        }

        while !input.is_empty() {
            let (ch, n) = bstr::decode_utf8(input);
            match ch {
                Some(ch) => {
                    input = &input[n..];
                    f(ch)?;
                }
                None if is_truncated(input, n) => {
                    self.stash(input);
                    return ControlFlow::Continue(());
                }
                None => {
                    input = &input[n..];
                    f(REPLACEMENT)?;
                }
            }
        }
        ControlFlow::Continue(())
    }
}
