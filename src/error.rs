/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The diagnostic error type returned by every fallible operation in this
//! crate, and the taxonomy of fatal conditions a [`Scanner`](crate::Scanner)
//! can raise.

use std::fmt;

use crate::token::Mark;

/// Result typedef used throughout this crate's public API.
pub type Result<T> = std::result::Result<T, Error>;

/// A fatal diagnostic raised while scanning, carrying the [`Mark`] at
/// which the offending byte was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error
{
    kind: ErrorKind,
    mark: Mark,
}

impl Error
{
    pub(crate) fn new(kind: ErrorKind, mark: Mark) -> Self
    {
        Self { kind, mark }
    }

    /// The kind of fatal condition encountered.
    pub fn kind(&self) -> ErrorKind
    {
        self.kind
    }

    /// The line at which the error occurred, 1-based.
    pub fn line(&self) -> u64
    {
        self.mark.line
    }

    /// The column into the line at which the error occurred, 1-based.
    pub fn column(&self) -> u64
    {
        self.mark.column
    }

    /// The absolute byte offset into the input buffer.
    pub fn at(&self) -> u64
    {
        self.mark.offset
    }

    /// The full source [`Mark`].
    pub fn mark(&self) -> Mark
    {
        self.mark
    }

    /// Rough category of this error, useful for deciding whether a caller
    /// should treat it as a normal parse failure or as a truncated stream.
    pub fn classify(&self) -> Category
    {
        self.kind.category()
    }
}

impl fmt::Display for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}, at {}", self.kind, self.mark)
    }
}

impl std::error::Error for Error {}

/// A rough category of [`Error`], useful for making decisions upon
/// encountering one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category
{
    /// The YAML stream was not syntactically valid.
    Syntax,
    /// The content was syntactically well-formed but invalid on its own
    /// terms (an unrecognized escape, a malformed block scalar header, an
    /// undeclared tag handle).
    Data,
    /// The YAML stream unexpectedly terminated before it was appropriate
    /// to do so.
    Eof,
}

/// The taxonomy of fatal conditions the scanner can raise. Each variant
/// corresponds to one of the diagnostic categories named in the core's
/// error handling design; see each variant's documentation for the
/// specific byte sequences that trigger it.
///
/// Notably absent is an `UnknownDirective` variant: an unrecognized
/// `%directive` is not fatal, the scanner silently skips the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind
{
    /// A tab was used for indentation, content appeared at the wrong
    /// column, or a dedent had no matching collection to close into.
    IndentationError,
    /// A quoted or block scalar was not closed before end of input while
    /// `is_final_block` was set.
    UnterminatedScalar,
    /// An unrecognized `\x` escape was found in a double-quoted scalar.
    BadEscape,
    /// A block scalar header (`|`/`>`) held an invalid chomping
    /// indicator, indent digit (`0`), or trailing content.
    BadBlockScalarHeader,
    /// An unknown directive name (other than `YAML`/`TAG`), a duplicate
    /// `%YAML`, a non-numeric version, trailing junk after a directive,
    /// or a missing `---` where one was required.
    DirectiveError,
    /// A `!handle!suffix` tag referenced a handle that was never
    /// registered via `%TAG`.
    UnknownTagHandle,
    /// A candidate implicit mapping key crossed a line break before its
    /// terminating `:` was found.
    MultilineImplicitKey,
    /// A `#` was encountered that was not preceded by whitespace.
    CommentWithoutSpace,
    /// A flow collection was missing a required comma, had a leading or
    /// doubled comma, or used a block-only indicator (`-` as a bare block
    /// entry) inside flow.
    FlowError,
    /// A collection was nested deeper than the configured
    /// [`Options::max_depth`](crate::Options::max_depth).
    DepthExceeded,
    /// The input ended while inside a flow collection, or immediately
    /// after a directive line with no terminating line break.
    UnexpectedEndOfInput,
    /// An anchor or alias followed another anchor on the same node, or an
    /// anchor shared a line with a `---` that preceded an implicit
    /// mapping.
    AmbiguousAnchorOrTag,
    /// A second root-level node was found without an intervening `---`.
    MultipleRootNodes,
    /// Non-whitespace, non-`:` content followed a quoted scalar on the
    /// same line.
    TrailingContentAfterQuoted,
    /// A `:` was found where a mapping key was expected, but a key-value
    /// pair had already completed on this line without opening a new
    /// collection to hold it (`a: b: c: d`).
    MappingValueNotAllowed,
    /// A `---`/`...` document marker appeared on a continuation line of a
    /// quoted scalar.
    DocumentMarkerInScalar,
}

impl ErrorKind
{
    fn category(self) -> Category
    {
        match self
        {
            ErrorKind::UnexpectedEndOfInput | ErrorKind::UnterminatedScalar => Category::Eof,
            ErrorKind::BadEscape | ErrorKind::BadBlockScalarHeader | ErrorKind::UnknownTagHandle => Category::Data,
            _ => Category::Syntax,
        }
    }
}

impl fmt::Display for ErrorKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        use ErrorKind::*;

        let msg = match self
        {
            IndentationError => "invalid indentation",
            UnterminatedScalar => "scalar was not terminated before end of input",
            BadEscape => "unknown escape sequence",
            BadBlockScalarHeader => "invalid block scalar header",
            DirectiveError => "malformed or misplaced directive",
            UnknownTagHandle => "tag handle was not declared with %TAG",
            MultilineImplicitKey => "implicit mapping key spans more than one line",
            CommentWithoutSpace => "comment indicator '#' must be preceded by whitespace",
            FlowError => "malformed flow collection",
            DepthExceeded => "exceeded the maximum nesting depth",
            UnexpectedEndOfInput => "unexpected end of input",
            AmbiguousAnchorOrTag => "ambiguous anchor, alias or tag placement",
            MultipleRootNodes => "a document may only have one root node",
            TrailingContentAfterQuoted => "content follows a quoted scalar on the same line",
            MappingValueNotAllowed => "mapping value not allowed here",
            DocumentMarkerInScalar => "document marker inside a quoted scalar",
        };

        f.write_str(msg)
    }
}
