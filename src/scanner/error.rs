/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Scanner-internal signal type. [`ScanError`] mirrors the public
//! [`ErrorKind`](crate::error::ErrorKind) taxonomy plus one extra,
//! non-fatal variant, `Extend`, raised when a scan ran off the end of
//! the buffer and more input might resolve it.

use std::fmt;

use crate::error::ErrorKind;

pub(crate) type ScanResult<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanError
{
    IndentationError,
    UnterminatedScalar,
    BadEscape,
    BadBlockScalarHeader,
    DirectiveError,
    UnknownTagHandle,
    MultilineImplicitKey,
    CommentWithoutSpace,
    FlowError,
    DepthExceeded,
    AmbiguousAnchorOrTag,
    MultipleRootNodes,
    TrailingContentAfterQuoted,
    MappingValueNotAllowed,
    DocumentMarkerInScalar,

    /// The cursor ran out of bytes mid-token. Not itself user-facing: the
    /// driver turns this into [`ErrorKind::UnexpectedEndOfInput`] when
    /// `is_final_block` is set, or into an `Incomplete` outcome otherwise.
    Extend,
}

impl ScanError
{
    /// Convert to the public taxonomy. Panics on `Extend`: callers must
    /// resolve that signal against `is_final_block` before it reaches the
    /// public API.
    pub(crate) fn into_kind(self) -> ErrorKind
    {
        match self
        {
            ScanError::IndentationError => ErrorKind::IndentationError,
            ScanError::UnterminatedScalar => ErrorKind::UnterminatedScalar,
            ScanError::BadEscape => ErrorKind::BadEscape,
            ScanError::BadBlockScalarHeader => ErrorKind::BadBlockScalarHeader,
            ScanError::DirectiveError => ErrorKind::DirectiveError,
            ScanError::UnknownTagHandle => ErrorKind::UnknownTagHandle,
            ScanError::MultilineImplicitKey => ErrorKind::MultilineImplicitKey,
            ScanError::CommentWithoutSpace => ErrorKind::CommentWithoutSpace,
            ScanError::FlowError => ErrorKind::FlowError,
            ScanError::DepthExceeded => ErrorKind::DepthExceeded,
            ScanError::AmbiguousAnchorOrTag => ErrorKind::AmbiguousAnchorOrTag,
            ScanError::MultipleRootNodes => ErrorKind::MultipleRootNodes,
            ScanError::TrailingContentAfterQuoted => ErrorKind::TrailingContentAfterQuoted,
            ScanError::MappingValueNotAllowed => ErrorKind::MappingValueNotAllowed,
            ScanError::DocumentMarkerInScalar => ErrorKind::DocumentMarkerInScalar,
            ScanError::Extend => unreachable!("Extend must be resolved before reaching the public API"),
        }
    }
}

impl fmt::Display for ScanError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for ScanError {}
