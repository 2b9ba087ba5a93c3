/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A byte-position cursor over a borrowed UTF-8 slice, tracking the
//! line/column bookkeeping every [`Mark`] needs.
//!
//! This is the zero-copy fast path: [`Scanner::advance`](crate::Scanner::advance)
//! borrows tokens directly out of the slice a `Cursor` walks, it never
//! copies bytes around. [`crate::reader::ChunkBuffer`] exists for callers
//! who can't hand over the whole input up front; it owns a growing buffer
//! and hands a fresh `Cursor` over whatever has accumulated so far on each
//! `advance`.

use crate::token::Mark;

/// A cursor over a `&'de str`, positioned at a byte offset and aware of
/// which line/column that offset falls on.
///
/// Cloning a `Cursor` is cheap (it is `Copy`): the scanner uses this to
/// cheaply look ahead and roll back when a tentative scan (e.g. "is this a
/// plain scalar or a mapping key") doesn't pan out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'de>
{
    input:      &'de str,
    offset:     usize,
    line:       u64,
    line_start: usize,
}

impl<'de> Cursor<'de>
{
    /// A cursor positioned at the start of `input`.
    pub fn new(input: &'de str) -> Self
    {
        Self {
            input,
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// The full underlying buffer, irrespective of the cursor's position.
    pub fn buffer(&self) -> &'de str
    {
        self.input
    }

    /// The byte offset of the cursor within [`Cursor::buffer`].
    pub fn offset(&self) -> usize
    {
        self.offset
    }

    /// The remaining, not-yet-consumed suffix of the buffer.
    pub fn rest(&self) -> &'de str
    {
        // offset always sits on a char boundary: every advance moves by
        // whole chars or ASCII bytes known to be boundaries.
        &self.input[self.offset..]
    }

    pub fn is_empty(&self) -> bool
    {
        self.offset >= self.input.len()
    }

    /// The [`Mark`] for the cursor's current position.
    pub fn mark(&self) -> Mark
    {
        Mark::new(self.line, (self.offset - self.line_start + 1) as u64, self.offset as u64)
    }

    /// The byte at the cursor, if any remain.
    pub fn peek_byte(&self) -> Option<u8>
    {
        self.rest().as_bytes().first().copied()
    }

    /// The byte `n` positions ahead of the cursor, if that much remains.
    pub fn peek_byte_at(&self, n: usize) -> Option<u8>
    {
        self.rest().as_bytes().get(n).copied()
    }

    /// The character at the cursor, if any remain.
    pub fn peek_char(&self) -> Option<char>
    {
        self.rest().chars().next()
    }

    /// Advance past the single character at the cursor, returning it.
    /// A no-op returning `None` at end of input.
    pub fn advance_char(&mut self) -> Option<char>
    {
        let c = self.peek_char()?;
        self.offset += c.len_utf8();

        Some(c)
    }

    /// True if the remaining input starts with `needle`.
    pub fn starts_with(&self, needle: &str) -> bool
    {
        self.rest().starts_with(needle)
    }

    /// Advance the cursor by `n` bytes, which must land on a char boundary
    /// and must not cross a line break (use [`Cursor::consume_break`] for
    /// that). Returns the skipped slice.
    pub fn advance(&mut self, n: usize) -> &'de str
    {
        let start = self.offset;
        self.offset += n;

        &self.input[start..self.offset]
    }

    /// If the cursor sits on a line break (`\n`, `\r\n`, `\r`, or one of
    /// the YAML-recognized Unicode line breaks `\u{85}`, `\u{2028}`,
    /// `\u{2029}`), consume it and advance to the next line. Returns
    /// whether a break was consumed.
    pub fn consume_break(&mut self) -> bool
    {
        let rest = self.rest();
        let consumed = if rest.starts_with("\r\n")
        {
            2
        }
        else if rest.starts_with('\n') || rest.starts_with('\r')
        {
            1
        }
        else if let Some(c) = rest.chars().next()
        {
            match c
            {
                '\u{85}' | '\u{2028}' | '\u{2029}' => c.len_utf8(),
                _ => return false,
            }
        }
        else
        {
            return false;
        };

        self.offset += consumed;
        self.line += 1;
        self.line_start = self.offset;

        true
    }

    /// Skip a leading UTF-8 BOM (`\u{FEFF}`), if present at the current
    /// position. Only meaningful at the very start of a document.
    pub fn skip_bom(&mut self)
    {
        const BOM: &str = "\u{feff}";

        if self.rest().starts_with(BOM)
        {
            self.offset += BOM.len();
        }
    }

    /// Advance past `n` consecutive ASCII space (`0x20`) bytes, returning
    /// how many were actually skipped.
    pub fn skip_spaces(&mut self) -> usize
    {
        let n = self.rest().bytes().take_while(|&b| b == b' ').count();
        self.offset += n;

        n
    }

    /// True if a line break lies at the cursor.
    pub fn at_break(&self) -> bool
    {
        matches!(self.peek_byte(), Some(b'\n') | Some(b'\r'))
            || matches!(self.rest().chars().next(), Some('\u{85}') | Some('\u{2028}') | Some('\u{2029}'))
    }

    /// 0-based column of the cursor on its current line, in bytes.
    pub fn column(&self) -> usize
    {
        self.offset - self.line_start
    }

    /// 1-based line number of the cursor.
    pub fn line(&self) -> u64
    {
        self.line
    }
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tracks_line_and_column()
    {
        let mut c = Cursor::new("ab\ncd");

        c.advance(2);
        assert_eq!(c.column(), 2);
        assert_eq!(c.line(), 1);

        assert!(c.consume_break());
        assert_eq!(c.line(), 2);
        assert_eq!(c.column(), 0);

        let mark = c.mark();
        assert_eq!(mark.line, 2);
        assert_eq!(mark.column, 1);
        assert_eq!(mark.offset, 3);
    }

    #[test]
    fn consume_break_handles_crlf_as_one_break()
    {
        let mut c = Cursor::new("a\r\nb");

        c.advance(1);
        assert!(c.consume_break());
        assert_eq!(c.line(), 2);
        assert_eq!(c.offset(), 3);
    }

    #[test]
    fn skip_bom_only_consumes_at_start()
    {
        let mut c = Cursor::new("\u{feff}a: b");
        c.skip_bom();

        assert_eq!(c.rest(), "a: b");
    }
}
