/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Adapters for feeding a [`Scanner`](crate::Scanner) input it doesn't
//! already hold entirely in memory.
//!
//! A `Scanner` itself only ever sees a `&str` slice via
//! [`Cursor`](crate::cursor::Cursor): it has no opinion on where that
//! slice came from. [`ChunkBuffer`] is a small convenience accumulator for
//! callers who receive YAML incrementally (reading a file in pieces,
//! consuming a network stream) and want to append chunks as they arrive
//! without re-scanning from the start each time.

use std::str;

use crate::{
    error::{Error, ErrorKind},
    token::Mark,
};

/// An owned, growable buffer of UTF-8 bytes fed to a `Scanner` over time.
///
/// Each call to [`ChunkBuffer::push`] appends bytes that must, taken
/// together with everything pushed before, still form valid UTF-8 (a
/// multi-byte codepoint may not be split across two `push` calls unless
/// the caller buffers it themselves first). [`ChunkBuffer::as_str`] hands
/// back everything accumulated so far for the scanner to re-drive a
/// [`Cursor`](crate::cursor::Cursor) over; [`ChunkBuffer::finish`] marks no
/// further chunks are coming, which callers surface to the scanner as
/// `is_final_block = true`.
#[derive(Debug, Default)]
pub struct ChunkBuffer
{
    bytes: Vec<u8>,
    /// Bytes already handed to the scanner and known not to be
    /// re-examined; kept so `compact` can discard them.
    consumed:    usize,
    final_block: bool,
}

impl ChunkBuffer
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Append a chunk of bytes. Errors if the buffer, taken as a whole,
    /// would no longer be valid UTF-8.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), Error>
    {
        self.bytes.extend_from_slice(chunk);

        if let Err(e) = str::from_utf8(&self.bytes)
        {
            let bad_at = e.valid_up_to();
            self.bytes.truncate(self.bytes.len() - chunk.len());

            return Err(Error::new(
                ErrorKind::UnterminatedScalar,
                Mark::new(0, 0, (self.consumed + bad_at) as u64),
            ));
        }

        Ok(())
    }

    /// Mark that no further chunks will be pushed; the next [`Scanner`](crate::Scanner)
    /// `advance` call sees `is_final_block = true` for whatever remains
    /// unconsumed.
    pub fn finish(&mut self)
    {
        self.final_block = true;
    }

    pub fn is_final(&self) -> bool
    {
        self.final_block
    }

    /// Everything accumulated so far, valid UTF-8 by construction.
    pub fn as_str(&self) -> &str
    {
        str::from_utf8(&self.bytes).expect("ChunkBuffer invariant: always valid utf8")
    }

    /// Record that the scanner consumed `n` bytes of [`ChunkBuffer::as_str`]
    /// and will never look at them again, so a later [`ChunkBuffer::compact`]
    /// knows it's safe to drop them.
    pub fn advance_consumed(&mut self, n: usize)
    {
        self.consumed += n;
    }

    /// Drop bytes already marked consumed via [`ChunkBuffer::advance_consumed`],
    /// shrinking memory use for long-running streams. Safe to call only
    /// when the caller holds no borrows into a prior [`ChunkBuffer::as_str`]
    /// result (the scanner re-borrows a fresh slice after every push).
    pub fn compact(&mut self)
    {
        if self.consumed == 0
        {
            return;
        }

        self.bytes.drain(0..self.consumed);
        self.consumed = 0;
    }
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn accumulates_chunks_in_order()
    {
        let mut buf = ChunkBuffer::new();

        buf.push(b"a: ").unwrap();
        buf.push(b"b\n").unwrap();

        assert_eq!(buf.as_str(), "a: b\n");
        assert!(!buf.is_final());

        buf.finish();
        assert!(buf.is_final());
    }

    #[test]
    fn rejects_invalid_utf8_without_corrupting_state()
    {
        let mut buf = ChunkBuffer::new();
        buf.push(b"abc").unwrap();

        assert!(buf.push(&[0xff, 0xfe]).is_err());
        assert_eq!(buf.as_str(), "abc");
    }

    #[test]
    fn compact_drops_consumed_prefix()
    {
        let mut buf = ChunkBuffer::new();
        buf.push(b"abcdef").unwrap();

        buf.advance_consumed(3);
        buf.compact();

        assert_eq!(buf.as_str(), "def");
    }
}
