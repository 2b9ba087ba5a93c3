/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Configuration accepted by a [`Scanner`](crate::Scanner).

use bitflags::bitflags;

/// The default maximum nesting depth. Bounds the combined block/flow
/// collection stack; exceeding it raises
/// [`ErrorKind::DepthExceeded`](crate::error::ErrorKind::DepthExceeded).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling a [`Scanner`](crate::Scanner)'s behavior.
///
/// Constructed with [`Options::default`] and adjusted with the builder
/// methods, or via direct field assignment since all fields are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options
{
    /// Maximum combined block/flow nesting depth. Default
    /// [`DEFAULT_MAX_DEPTH`].
    pub max_depth: usize,
    /// Emit [`TokenKind::Comment`](crate::token::TokenKind::Comment)
    /// tokens for `#` comments instead of silently skipping them.
    /// Default `false`.
    pub read_comments: bool,
    /// Permit a trailing `,` immediately before a flow collection's
    /// closing bracket. Default `true`.
    pub allow_trailing_commas: bool,
    /// Reserved for a downstream consumer: the core never tracks key
    /// uniqueness itself, duplicate mapping keys are a consumer concern.
    /// Default `false`.
    pub strict_duplicate_keys: bool,
}

impl Default for Options
{
    fn default() -> Self
    {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            read_comments: false,
            allow_trailing_commas: true,
            strict_duplicate_keys: false,
        }
    }
}

impl Options
{
    pub(crate) fn flags(&self) -> Flags
    {
        let mut flags = Flags::empty();

        if self.read_comments
        {
            flags.insert(Flags::COMMENTS);
        }

        if self.allow_trailing_commas
        {
            flags.insert(Flags::TRAILING_COMMA);
        }

        flags
    }
}

bitflags! {
    /// Internal bitset mirrored from [`Options`] for cheap copies through
    /// the scan hot path, the same role the teacher crate's `Flags` plays
    /// for its `O_EXTENDABLE`/`O_LAZY` switches.
    pub(crate) struct Flags: u32 {
        const COMMENTS      = 0b0000_0001;
        const TRAILING_COMMA = 0b0000_0010;
    }
}
