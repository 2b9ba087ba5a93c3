/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! `%YAML`/`%TAG` directive parsing and the tag-handle registry they
//! populate.

use atoi::atoi;

use crate::{
    cursor::Cursor,
    scanner::error::{ScanError, ScanResult as Result},
};

/// Which directive a `%` line names, determined by its first word.
pub(in crate::scanner) enum DirectiveKind
{
    Version,
    Tag,
    /// Anything else: non-fatal, the caller skips the rest of the line.
    Unknown,
}

impl DirectiveKind
{
    pub fn classify(rest: &str) -> Self
    {
        if rest.starts_with("YAML") && rest[4..].chars().next().map_or(true, |c| c.is_whitespace())
        {
            DirectiveKind::Version
        }
        else if rest.starts_with("TAG") && rest[3..].chars().next().map_or(true, |c| c.is_whitespace())
        {
            DirectiveKind::Tag
        }
        else
        {
            DirectiveKind::Unknown
        }
    }
}

/// Parse `<major>.<minor>` after `%YAML` and its separating whitespace
/// have already been consumed.
pub(in crate::scanner) fn scan_version(cursor: &mut Cursor) -> Result<(u8, u8)>
{
    let major = scan_version_component(cursor)?;

    if cursor.peek_byte() != Some(b'.')
    {
        return Err(ScanError::DirectiveError);
    }
    cursor.advance(1);

    let minor = scan_version_component(cursor)?;

    Ok((major, minor))
}

fn scan_version_component(cursor: &mut Cursor) -> Result<u8>
{
    let digits = cursor.rest().as_bytes();
    let n = digits.iter().take_while(|b| b.is_ascii_digit()).count();

    if n == 0
    {
        return Err(ScanError::DirectiveError);
    }

    let value = atoi::<u8>(&digits[..n]).ok_or(ScanError::DirectiveError)?;
    cursor.advance(n);

    Ok(value)
}

/// Parse `<handle> <prefix>` after `%TAG` and its separating whitespace
/// have already been consumed.
pub(in crate::scanner) fn scan_tag_directive<'de>(cursor: &mut Cursor<'de>) -> Result<(&'de str, &'de str)>
{
    let handle = scan_handle(cursor)?;

    let spaces = cursor.skip_spaces();
    if spaces == 0
    {
        return Err(ScanError::DirectiveError);
    }

    let prefix_len = cursor
        .rest()
        .bytes()
        .take_while(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .count();

    if prefix_len == 0
    {
        return Err(ScanError::DirectiveError);
    }

    let prefix = cursor.advance(prefix_len);

    Ok((handle, prefix))
}

/// Parse a tag handle: `!`, `!!`, or `!name!`.
pub(in crate::scanner) fn scan_handle<'de>(cursor: &mut Cursor<'de>) -> Result<&'de str>
{
    if cursor.peek_byte() != Some(b'!')
    {
        return Err(ScanError::DirectiveError);
    }

    let name_len = cursor.rest()[1..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
        .count();

    let total = match cursor.peek_byte_at(1 + name_len)
    {
        Some(b'!') => 2 + name_len,
        _ if name_len == 0 => 1,
        _ => return Err(ScanError::DirectiveError),
    };

    Ok(cursor.advance(total))
}

/// The set of tag handles declared so far, always seeded with the
/// primary (`!`) and secondary (`!!`) handles.
#[derive(Debug, Clone)]
pub(in crate::scanner) struct TagRegistry<'de>
{
    handles: Vec<(&'de str, &'de str)>,
}

impl<'de> TagRegistry<'de>
{
    const PRIMARY: &'static str = "!";
    const SECONDARY: &'static str = "!!";
    const SECONDARY_PREFIX: &'static str = "!";
    const NONSPECIFIC_PREFIX: &'static str = "!";

    pub fn new() -> Self
    {
        Self {
            handles: vec![
                (Self::PRIMARY, Self::NONSPECIFIC_PREFIX),
                (Self::SECONDARY, Self::SECONDARY_PREFIX),
            ],
        }
    }

    pub fn reset(&mut self)
    {
        *self = Self::new();
    }

    pub fn register(&mut self, handle: &'de str, prefix: &'de str)
    {
        if let Some(slot) = self.handles.iter_mut().find(|(h, _)| *h == handle)
        {
            slot.1 = prefix;
        }
        else
        {
            self.handles.push((handle, prefix));
        }
    }

    pub fn resolve(&self, handle: &str) -> Option<&'de str>
    {
        self.handles.iter().find(|(h, _)| *h == handle).map(|(_, p)| *p)
    }
}

impl<'de> Default for TagRegistry<'de>
{
    fn default() -> Self
    {
        Self::new()
    }
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn classifies_known_directives()
    {
        assert!(matches!(DirectiveKind::classify("YAML 1.2"), DirectiveKind::Version));
        assert!(matches!(DirectiveKind::classify("TAG ! x"), DirectiveKind::Tag));
        assert!(matches!(DirectiveKind::classify("FOO bar"), DirectiveKind::Unknown));
    }

    #[test]
    fn scans_version()
    {
        let mut c = Cursor::new("1.2\n");
        assert_eq!(scan_version(&mut c).unwrap(), (1, 2));
        assert_eq!(c.rest(), "\n");
    }

    #[test]
    fn registry_seeded_with_primary_and_secondary()
    {
        let reg = TagRegistry::new();

        assert_eq!(reg.resolve("!"), Some("!"));
        assert_eq!(reg.resolve("!!"), Some("!"));
        assert_eq!(reg.resolve("!unknown!"), None);
    }

    #[test]
    fn registry_register_and_resolve_named_handle()
    {
        let mut reg = TagRegistry::new();
        reg.register("!e!", "tag:example.com,2000:app/");

        assert_eq!(reg.resolve("!e!"), Some("tag:example.com,2000:app/"));
    }

    #[test]
    fn scans_named_handle()
    {
        let mut c = Cursor::new("!e! tag:example.com,2000:app/");
        assert_eq!(scan_handle(&mut c).unwrap(), "!e!");
    }
}
