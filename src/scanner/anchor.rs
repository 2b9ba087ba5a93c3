/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Anchor (`&name`), alias (`*name`) and tag (`!`, `!!`, `!<verbatim>`,
//! `!handle!suffix`) scanning.

use crate::{
    cursor::Cursor,
    scanner::{
        directive::TagRegistry,
        error::{ScanError, ScanResult as Result},
    },
};

/// Which of `&`/`*` started the node property being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::scanner) enum AnchorKind
{
    Anchor,
    Alias,
}

impl AnchorKind
{
    pub fn of(byte: u8) -> Option<Self>
    {
        match byte
        {
            b'&' => Some(AnchorKind::Anchor),
            b'*' => Some(AnchorKind::Alias),
            _ => None,
        }
    }
}

fn is_name_byte(b: u8) -> bool
{
    !b.is_ascii_whitespace() && !matches!(b, b',' | b'[' | b']' | b'{' | b'}')
}

/// Scan a `&name` or `*name`, cursor positioned on the leading `&`/`*`.
pub(in crate::scanner) fn scan_anchor_or_alias<'de>(cursor: &mut Cursor<'de>) -> Result<&'de str>
{
    cursor.advance(1);

    let len = cursor.rest().bytes().take_while(|&b| is_name_byte(b)).count();

    if len == 0
    {
        return Err(ScanError::AmbiguousAnchorOrTag);
    }

    Ok(cursor.advance(len))
}

/// Scan a tag property, cursor positioned on the leading `!`. Returns
/// `(handle, suffix)`; for the verbatim form `handle` is the literal `"!"`
/// marker and `suffix` is the raw text inside `<...>`.
pub(in crate::scanner) fn scan_tag<'de>(
    cursor: &mut Cursor<'de>,
    registry: &TagRegistry<'de>,
) -> Result<(&'de str, &'de str)>
{
    if cursor.peek_byte() != Some(b'!')
    {
        return Err(ScanError::BadBlockScalarHeader);
    }

    if cursor.peek_byte_at(1) == Some(b'<')
    {
        cursor.advance(2);

        let len = cursor.rest().bytes().take_while(|&b| b != b'>').count();

        if cursor.peek_byte_at(len) != Some(b'>')
        {
            return Err(ScanError::UnknownTagHandle);
        }

        let content = cursor.advance(len);
        cursor.advance(1);

        return Ok(("!", content));
    }

    let name_len = cursor.rest()[1..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
        .count();

    let handle = if name_len > 0 && cursor.peek_byte_at(1 + name_len) == Some(b'!')
    {
        let handle = cursor.advance(2 + name_len);

        if registry.resolve(handle).is_none()
        {
            return Err(ScanError::UnknownTagHandle);
        }

        handle
    }
    else if cursor.peek_byte_at(1) == Some(b'!')
    {
        cursor.advance(2)
    }
    else
    {
        cursor.advance(1)
    };

    let suffix_len = cursor.rest().bytes().take_while(|&b| is_name_byte(b)).count();
    let suffix = cursor.advance(suffix_len);

    Ok((handle, suffix))
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn scans_anchor_name()
    {
        let mut c = Cursor::new("&id 1");
        assert_eq!(scan_anchor_or_alias(&mut c).unwrap(), "id");
        assert_eq!(c.rest(), " 1");
    }

    #[test]
    fn empty_anchor_name_is_an_error()
    {
        let mut c = Cursor::new("& ");
        assert!(scan_anchor_or_alias(&mut c).is_err());
    }

    #[test]
    fn scans_primary_tag_shorthand()
    {
        let mut c = Cursor::new("!str value");
        let reg = TagRegistry::new();

        assert_eq!(scan_tag(&mut c, &reg).unwrap(), ("!", "str"));
    }

    #[test]
    fn scans_secondary_tag_shorthand()
    {
        let mut c = Cursor::new("!!str value");
        let reg = TagRegistry::new();

        assert_eq!(scan_tag(&mut c, &reg).unwrap(), ("!!", "str"));
    }

    #[test]
    fn scans_verbatim_tag()
    {
        let mut c = Cursor::new("!<tag:yaml.org,2002:str> value");
        let reg = TagRegistry::new();

        assert_eq!(scan_tag(&mut c, &reg).unwrap(), ("!", "tag:yaml.org,2002:str"));
    }

    #[test]
    fn named_handle_must_be_registered()
    {
        let mut c = Cursor::new("!e!local value");
        let reg = TagRegistry::new();

        assert_eq!(scan_tag(&mut c, &reg), Err(ScanError::UnknownTagHandle));
    }

    #[test]
    fn registered_named_handle_resolves()
    {
        let mut c = Cursor::new("!e!local value");
        let mut reg = TagRegistry::new();
        reg.register("!e!", "tag:example.com,2000:app/");

        assert_eq!(scan_tag(&mut c, &reg).unwrap(), ("!e!", "local"));
    }
}
