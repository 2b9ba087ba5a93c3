/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Plain (unquoted) scalar extent detection.

use crate::{
    cursor::Cursor,
    scanner::{
        error::ScanResult as Result,
        scalar::is_flow_terminator,
    },
};

/// Scan a plain scalar starting at the cursor's current position,
/// returning its raw extent (not trimmed — trailing whitespace on the
/// final line is the consumer's concern per the scalar-text contract).
///
/// `in_flow` controls whether `,[]{}`  terminate the scalar. `indent_floor`
/// is the column a continuation line must exceed to still belong to this
/// scalar (the enclosing block collection's indent, or the flow
/// collection's enclosing block ancestor).
pub(in crate::scanner) fn scan_plain_scalar<'de>(
    cursor: &mut Cursor<'de>,
    in_flow: bool,
    indent_floor: usize,
) -> Result<&'de str>
{
    let start = cursor.offset();
    let mut end = start;

    'lines: loop
    {
        while let Some(c) = cursor.peek_char()
        {
            if c == '\n' || c == '\r' || matches!(c, '\u{85}' | '\u{2028}' | '\u{2029}')
            {
                break;
            }

            if c == ':' && ends_scalar_after_colon(cursor, in_flow)
            {
                break 'lines;
            }

            if in_flow && c.is_ascii() && is_flow_terminator(c as u8)
            {
                break 'lines;
            }

            if c == '#' && cursor.offset() > start && is_space_byte(cursor.buffer().as_bytes()[cursor.offset() - 1])
            {
                break 'lines;
            }

            cursor.advance_char();
            end = cursor.offset();
        }

        if cursor.is_empty()
        {
            break;
        }

        // At a line break: peek ahead to see whether the next line is a
        // legal continuation of this scalar.
        let resume = *cursor;
        cursor.consume_break();
        cursor.skip_spaces();

        let continues = !cursor.is_empty()
            && !cursor.at_break()
            && cursor.column() > indent_floor
            && !cursor.starts_with("---")
            && !cursor.starts_with("...");

        if !continues
        {
            *cursor = resume;
            break;
        }
    }

    Ok(&cursor.buffer()[start..end])
}

fn is_space_byte(b: u8) -> bool
{
    b == b' ' || b == b'\t'
}

fn ends_scalar_after_colon(cursor: &Cursor, in_flow: bool) -> bool
{
    match cursor.peek_byte_at(1)
    {
        None => true,
        Some(b) if b.is_ascii_whitespace() => true,
        Some(b) if in_flow && is_flow_terminator(b) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn stops_before_value_indicator()
    {
        let mut c = Cursor::new("key: value\n");
        let text = scan_plain_scalar(&mut c, false, 0).unwrap();

        assert_eq!(text, "key");
        assert_eq!(c.rest(), ": value\n");
    }

    #[test]
    fn stops_at_flow_terminator()
    {
        let mut c = Cursor::new("a, b]");
        let text = scan_plain_scalar(&mut c, true, 0).unwrap();

        assert_eq!(text, "a");
    }

    #[test]
    fn stops_at_unspaced_hash_is_not_a_comment()
    {
        let mut c = Cursor::new("a#b\n");
        let text = scan_plain_scalar(&mut c, false, 0).unwrap();

        assert_eq!(text, "a#b");
    }

    #[test]
    fn continues_onto_indented_next_line()
    {
        let mut c = Cursor::new("line one\n  line two\nk: v");
        let text = scan_plain_scalar(&mut c, false, 0).unwrap();

        assert_eq!(text, "line one\n  line two");
    }

    #[test]
    fn does_not_continue_past_dedent()
    {
        let mut c = Cursor::new("value\nk: v");
        let text = scan_plain_scalar(&mut c, false, 0).unwrap();

        assert_eq!(text, "value");
        assert_eq!(c.rest(), "\nk: v");
    }
}
