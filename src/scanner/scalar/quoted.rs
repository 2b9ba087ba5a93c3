/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Single- and double-quoted scalar extent detection.

use crate::{
    cursor::Cursor,
    scanner::error::{ScanError, ScanResult as Result},
};

/// True if the cursor sits at a `---`/`...` marker followed by whitespace
/// or end of input, i.e. one that would be recognized as a document
/// boundary outside a scalar.
fn at_document_marker(cursor: &Cursor, marker: &str) -> bool
{
    cursor.starts_with(marker)
        && matches!(cursor.peek_byte_at(marker.len()), None | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r'))
}

/// Scan a single-quoted scalar, cursor positioned on the opening `'`.
/// Returns the raw text between the quotes (a doubled `''` is left
/// un-collapsed; the consumer turns it into a single `'`) and whether the
/// scalar spanned more than one line.
pub(in crate::scanner) fn scan_single_quoted<'de>(cursor: &mut Cursor<'de>) -> Result<(&'de str, bool)>
{
    cursor.advance(1);
    let start = cursor.offset();
    let mut multiline = false;

    loop
    {
        if cursor.is_empty()
        {
            return Err(ScanError::UnterminatedScalar);
        }

        if cursor.at_break()
        {
            multiline = true;
            cursor.consume_break();

            if at_document_marker(cursor, "---") || at_document_marker(cursor, "...")
            {
                return Err(ScanError::DocumentMarkerInScalar);
            }

            continue;
        }

        match cursor.peek_byte()
        {
            Some(b'\'') if cursor.peek_byte_at(1) == Some(b'\'') =>
            {
                cursor.advance(2);
            },
            Some(b'\'') =>
            {
                let text = &cursor.buffer()[start..cursor.offset()];
                cursor.advance(1);

                return Ok((text, multiline));
            },
            _ =>
            {
                cursor.advance_char();
            },
        }
    }
}

/// Scan a double-quoted scalar, cursor positioned on the opening `"`.
/// Validates every `\x` escape's leading character (and the digit count
/// for `\x`/`\u`/`\U`) without decoding it. Returns the raw text between
/// the quotes and whether it spanned more than one line.
pub(in crate::scanner) fn scan_double_quoted<'de>(cursor: &mut Cursor<'de>) -> Result<(&'de str, bool)>
{
    cursor.advance(1);
    let start = cursor.offset();
    let mut multiline = false;

    loop
    {
        if cursor.is_empty()
        {
            return Err(ScanError::UnterminatedScalar);
        }

        if cursor.at_break()
        {
            multiline = true;
            cursor.consume_break();

            if at_document_marker(cursor, "---") || at_document_marker(cursor, "...")
            {
                return Err(ScanError::DocumentMarkerInScalar);
            }

            continue;
        }

        match cursor.peek_byte()
        {
            Some(b'"') =>
            {
                let text = &cursor.buffer()[start..cursor.offset()];
                cursor.advance(1);

                return Ok((text, multiline));
            },
            Some(b'\\') =>
            {
                if cursor.peek_byte_at(1).map_or(false, |b| b == b'\n' || b == b'\r')
                {
                    multiline = true;
                    cursor.advance(1);
                    cursor.consume_break();

                    if at_document_marker(cursor, "---") || at_document_marker(cursor, "...")
                    {
                        return Err(ScanError::DocumentMarkerInScalar);
                    }

                    continue;
                }

                scan_escape(cursor)?;
            },
            _ =>
            {
                cursor.advance_char();
            },
        }
    }
}

fn scan_escape(cursor: &mut Cursor) -> Result<()>
{
    match cursor.peek_byte_at(1)
    {
        Some(
            b'0' | b'a' | b'b' | b't' | b'n' | b'v' | b'f' | b'r' | b'e' | b' ' | b'"' | b'\\' | b'/' | b'N' | b'_'
            | b'L' | b'P',
        ) =>
        {
            cursor.advance(2);
            Ok(())
        },
        Some(b'x') => scan_hex_escape(cursor, 2),
        Some(b'u') => scan_hex_escape(cursor, 4),
        Some(b'U') => scan_hex_escape(cursor, 8),
        _ => Err(ScanError::BadEscape),
    }
}

fn scan_hex_escape(cursor: &mut Cursor, digits: usize) -> Result<()>
{
    cursor.advance(2);

    for _ in 0..digits
    {
        match cursor.peek_byte()
        {
            Some(b) if b.is_ascii_hexdigit() => cursor.advance(1),
            _ => return Err(ScanError::BadEscape),
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn scans_single_quoted_with_doubled_quote()
    {
        let mut c = Cursor::new("'it''s'\n");
        let (text, multiline) = scan_single_quoted(&mut c).unwrap();

        assert_eq!(text, "it''s");
        assert!(!multiline);
        assert_eq!(c.rest(), "\n");
    }

    #[test]
    fn unterminated_single_quote_is_fatal()
    {
        let mut c = Cursor::new("'abc");
        assert_eq!(scan_single_quoted(&mut c), Err(ScanError::UnterminatedScalar));
    }

    #[test]
    fn scans_double_quoted_with_known_escapes()
    {
        let mut c = Cursor::new(r#""a\n\tb""#);
        let (text, multiline) = scan_double_quoted(&mut c).unwrap();

        assert_eq!(text, r"a\n\tb");
        assert!(!multiline);
    }

    #[test]
    fn rejects_unknown_escape()
    {
        let mut c = Cursor::new(r#""\q""#);
        assert_eq!(scan_double_quoted(&mut c), Err(ScanError::BadEscape));
    }

    #[test]
    fn validates_hex_escape_digit_count()
    {
        let mut c = Cursor::new(r#""\x4""#);
        assert_eq!(scan_double_quoted(&mut c), Err(ScanError::BadEscape));
    }

    #[test]
    fn multiline_flag_set_on_line_crossing()
    {
        let mut c = Cursor::new("'a\nb'");
        let (text, multiline) = scan_single_quoted(&mut c).unwrap();

        assert_eq!(text, "a\nb");
        assert!(multiline);
    }

    #[test]
    fn single_quoted_rejects_document_end_marker_mid_scalar()
    {
        let mut c = Cursor::new("'a\n...\nb'");
        assert_eq!(scan_single_quoted(&mut c), Err(ScanError::DocumentMarkerInScalar));
    }

    #[test]
    fn double_quoted_rejects_document_start_marker_mid_scalar()
    {
        let mut c = Cursor::new("\"a\n---\nb\"");
        assert_eq!(scan_double_quoted(&mut c), Err(ScanError::DocumentMarkerInScalar));
    }

    #[test]
    fn double_quoted_rejects_document_marker_after_escaped_continuation()
    {
        let mut c = Cursor::new("\"a\\\n---\nb\"");
        assert_eq!(scan_double_quoted(&mut c), Err(ScanError::DocumentMarkerInScalar));
    }

    #[test]
    fn document_marker_prefix_inside_a_word_is_not_rejected()
    {
        let mut c = Cursor::new("'a\n---b\nc'");
        let (text, multiline) = scan_single_quoted(&mut c).unwrap();

        assert_eq!(text, "a\n---b\nc");
        assert!(multiline);
    }
}
