/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Literal (`|`) and folded (`>`) block scalar extent detection.

use crate::{
    cursor::Cursor,
    scanner::error::{ScanError, ScanResult as Result},
    token::{Chomping, ScalarStyle},
};

/// Scan a block scalar, cursor positioned on the leading `|`/`>`. Returns
/// the style, the raw body (including its leading indentation, the
/// consumer strips `content_indent` columns off each line), the detected
/// content indent, and the chomping mode.
pub(in crate::scanner) fn scan_block_scalar<'de>(
    cursor: &mut Cursor<'de>,
    parent_indent: usize,
) -> Result<(ScalarStyle, &'de str, u32, Chomping)>
{
    let style = match cursor.peek_byte()
    {
        Some(b'|') => ScalarStyle::Literal,
        Some(b'>') => ScalarStyle::Folded,
        _ => return Err(ScanError::BadBlockScalarHeader),
    };
    cursor.advance(1);

    let (chomping, explicit_indent) = scan_header(cursor)?;

    scan_trailing_header_whitespace(cursor)?;

    if !cursor.is_empty()
    {
        cursor.consume_break();
    }

    let content_indent = match explicit_indent
    {
        Some(n) => parent_indent + n as usize,
        None => determine_content_indent(cursor)?,
    };

    let start = cursor.offset();
    let end = consume_body(cursor, content_indent)?;

    Ok((style, &cursor.buffer()[start..end], content_indent as u32, chomping))
}

fn scan_header(cursor: &mut Cursor) -> Result<(Chomping, Option<u8>)>
{
    let mut chomping = Chomping::Clip;
    let mut indent = None;
    let mut seen_chomping = false;
    let mut seen_indent = false;

    loop
    {
        match cursor.peek_byte()
        {
            Some(b'-') if !seen_chomping =>
            {
                chomping = Chomping::Strip;
                seen_chomping = true;
                cursor.advance(1);
            },
            Some(b'+') if !seen_chomping =>
            {
                chomping = Chomping::Keep;
                seen_chomping = true;
                cursor.advance(1);
            },
            Some(b'0') if !seen_indent => return Err(ScanError::BadBlockScalarHeader),
            Some(b) if b.is_ascii_digit() && !seen_indent =>
            {
                indent = Some(b - b'0');
                seen_indent = true;
                cursor.advance(1);
            },
            _ => break,
        }
    }

    Ok((chomping, indent))
}

fn scan_trailing_header_whitespace(cursor: &mut Cursor) -> Result<()>
{
    let spaces = cursor.skip_spaces();

    if cursor.is_empty() || cursor.at_break()
    {
        return Ok(());
    }

    if cursor.peek_byte() == Some(b'#') && spaces > 0
    {
        while !cursor.is_empty() && !cursor.at_break()
        {
            cursor.advance_char();
        }

        return Ok(());
    }

    Err(ScanError::BadBlockScalarHeader)
}

fn count_spaces(cursor: &Cursor) -> usize
{
    cursor.rest().bytes().take_while(|&b| b == b' ').count()
}

fn determine_content_indent(cursor: &Cursor) -> Result<usize>
{
    let mut probe = *cursor;
    let mut max_blank_indent = 0usize;

    loop
    {
        if probe.is_empty()
        {
            return Ok(0);
        }

        if probe.peek_byte() == Some(b'\t')
        {
            return Err(ScanError::IndentationError);
        }

        let spaces = count_spaces(&probe);
        probe.advance(spaces);

        if probe.is_empty()
        {
            return Ok(0);
        }

        if probe.at_break()
        {
            max_blank_indent = max_blank_indent.max(spaces);
            probe.consume_break();
            continue;
        }

        if max_blank_indent > spaces
        {
            return Err(ScanError::IndentationError);
        }

        return Ok(spaces);
    }
}

fn consume_body(cursor: &mut Cursor, content_indent: usize) -> Result<usize>
{
    let mut end = cursor.offset();

    loop
    {
        if cursor.is_empty()
        {
            break;
        }

        if cursor.peek_byte() == Some(b'\t')
        {
            return Err(ScanError::IndentationError);
        }

        let spaces = count_spaces(cursor);
        let after_spaces = cursor.peek_byte_at(spaces);
        let is_blank = matches!(after_spaces, None | Some(b'\n') | Some(b'\r'));

        if is_blank
        {
            cursor.advance(spaces);
            end = cursor.offset();

            if cursor.is_empty()
            {
                break;
            }

            cursor.consume_break();
            end = cursor.offset();
            continue;
        }

        if spaces < content_indent
        {
            break;
        }

        cursor.advance(spaces);

        while !cursor.is_empty() && !cursor.at_break()
        {
            cursor.advance_char();
        }

        end = cursor.offset();

        if !cursor.is_empty()
        {
            cursor.consume_break();
            end = cursor.offset();
        }
    }

    Ok(end)
}
