/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The tokens this crate's [`Scanner`](crate::Scanner) emits, and the
//! supporting value types (marks, scalar and collection styles).

use std::fmt;

/// A source position: 1-based line, 1-based column, and the absolute byte
/// offset into the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mark
{
    pub line:   u64,
    pub column: u64,
    pub offset: u64,
}

impl Mark
{
    pub(crate) fn new(line: u64, column: u64, offset: u64) -> Self
    {
        Self {
            line,
            column,
            offset,
        }
    }

    pub(crate) const fn start() -> Self
    {
        Self {
            line:   1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Mark
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A token produced by [`Scanner::advance`](crate::Scanner::advance),
/// paired with the [`Mark`] at which it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'de>
{
    pub kind: TokenKind<'de>,
    pub mark: Mark,
}

impl<'de> Token<'de>
{
    pub(crate) fn new(kind: TokenKind<'de>, mark: Mark) -> Self
    {
        Self { kind, mark }
    }
}

/// The structural productions a [`Scanner`](crate::Scanner) can emit. See
/// each variant for the shape of YAML source that produces it.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'de>
{
    /// The stream's start. Always the first token, emitted exactly once.
    StreamStart,
    /// The stream's end. Always the last token, emitted exactly once.
    StreamEnd,

    /// The `%YAML <major>.<minor>` directive.
    VersionDirective(u8, u8),
    /// The `%TAG <handle> <prefix>` directive.
    TagDirective(&'de str, &'de str),

    /// A `---` marker opening a document.
    DocumentStart,
    /// A `...` marker closing a document.
    DocumentEnd,

    /// The start of a mapping, block or flow.
    MappingStart(CollectionStyle),
    /// The end of a mapping opened by a matching [`TokenKind::MappingStart`].
    MappingEnd,
    /// The start of a sequence, block or flow.
    SequenceStart(CollectionStyle),
    /// The end of a sequence opened by a matching [`TokenKind::SequenceStart`].
    SequenceEnd,

    /// A `-` block sequence entry indicator.
    BlockEntry,
    /// A `,` flow collection entry separator.
    FlowEntry,
    /// A `?` explicit key indicator, or a retroactively inserted implicit
    /// key marker.
    Key,
    /// A `:` mapping value indicator.
    Value,

    /// A `*name` alias, referencing a previously anchored node.
    Alias(&'de str),
    /// A `&name` anchor, attached to the node that follows it.
    Anchor(&'de str),
    /// A `!handle!suffix`, `!!suffix`, `!` or `!<verbatim>` tag.
    Tag(&'de str, &'de str),

    /// A scalar leaf: its raw source slice and style.
    Scalar(ScalarToken<'de>),

    /// A `#` comment, only emitted when [`Options::read_comments`] is set.
    ///
    /// [`Options::read_comments`]: crate::Options::read_comments
    Comment(&'de str),
}

/// A scalar's raw source text together with the style it was written in.
///
/// The text is exactly as it appeared in the source: no unescaping,
/// dequoting or line folding has been performed. `content_indent` is only
/// meaningful for [`ScalarStyle::Literal`] and [`ScalarStyle::Folded`]
/// scalars, where it is the number of leading columns a consumer must
/// strip from every body line before applying chomping/folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarToken<'de>
{
    pub text:  &'de str,
    pub style: ScalarStyle,
    pub content_indent: Option<u32>,
    /// Only meaningful for [`ScalarStyle::Literal`]/[`ScalarStyle::Folded`]:
    /// the chomping indicator read off the block scalar header, needed by
    /// the consumer to decide how trailing line breaks in `text` fold.
    pub chomping: Option<Chomping>,
}

impl<'de> ScalarToken<'de>
{
    pub(crate) fn plain(text: &'de str) -> Self
    {
        Self {
            text,
            style: ScalarStyle::Plain,
            content_indent: None,
            chomping: None,
        }
    }

    pub(crate) fn quoted(text: &'de str, style: ScalarStyle) -> Self
    {
        debug_assert!(matches!(
            style,
            ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted
        ));

        Self {
            text,
            style,
            content_indent: None,
            chomping: None,
        }
    }

    pub(crate) fn block(text: &'de str, style: ScalarStyle, content_indent: u32, chomping: Chomping) -> Self
    {
        debug_assert!(matches!(style, ScalarStyle::Literal | ScalarStyle::Folded));

        Self {
            text,
            style,
            content_indent: Some(content_indent),
            chomping: Some(chomping),
        }
    }
}

/// The style a [`ScalarToken`] was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarStyle
{
    /// No delimiters; content and extent were inferred from context.
    Plain,
    /// Delimited by `'...'`, with `''` an escaped quote.
    SingleQuoted,
    /// Delimited by `"..."`, supporting backslash escapes.
    DoubleQuoted,
    /// A `|` block scalar: line breaks are preserved.
    Literal,
    /// A `>` block scalar: non-empty line runs fold to a single space.
    Folded,
}

/// Whether a collection ([`TokenKind::MappingStart`]/[`TokenKind::SequenceStart`])
/// is written in block (indentation based) or flow (bracket based) style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionStyle
{
    Block,
    Flow,
}

/// Chomping behavior selected by a block scalar's header
/// (`-` strip, `+` keep, unmarked clip). Exposed so a
/// consumer applying §6's scalar-text contract does not
/// need to re-derive it from the header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chomping
{
    Strip,
    Clip,
    Keep,
}
