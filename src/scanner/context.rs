/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The nested collection stack a [`Scanner`](crate::Scanner) walks while
//! inside `InBlockContent`/`InFlowContent`: one level per open mapping or
//! sequence, recording whether it's a mapping or sequence, block or flow,
//! which side of a pair it's expecting next, and the indent it opened at.

use crate::scanner::error::{ScanError, ScanResult as Result};

/// One open collection: a `MappingStart`/`SequenceStart` not yet matched
/// by its `End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Level
{
    is_mapping: bool,
    is_flow:    bool,
    /// Only meaningful when `is_mapping`: true while the next node token
    /// emitted at this level is a key rather than a value.
    expecting_key: bool,
    /// Block: the column the collection opened at. Flow: the column of
    /// the opening bracket.
    indent: usize,
    /// Flow only: a scalar/alias/nested collection was just emitted, so
    /// the next non-terminator must be a separator.
    needs_comma: bool,
    /// Flow only: no entry has been emitted yet; a `,` here is fatal.
    awaiting_first_entry: bool,
    /// True for the single-pair mapping synthesized by a bare `:` inside
    /// a flow sequence; closing it takes priority over the sequence.
    synthetic_pair: bool,
}

/// The stack of [`Level`]s a scanner is nested inside, bounded by
/// [`Options::max_depth`](crate::Options::max_depth).
#[derive(Debug, Clone)]
pub(in crate::scanner) struct Context
{
    levels:    Vec<Level>,
    max_depth: usize,
}

impl Context
{
    pub fn new(max_depth: usize) -> Self
    {
        Self {
            levels: Vec::new(),
            max_depth,
        }
    }

    pub fn depth(&self) -> usize
    {
        self.levels.len()
    }

    /// Push a new collection level, enforcing `max_depth`.
    pub fn push(&mut self, is_mapping: bool, is_flow: bool, indent: usize) -> Result<()>
    {
        if self.levels.len() >= self.max_depth
        {
            return Err(ScanError::DepthExceeded);
        }

        self.levels.push(Level {
            is_mapping,
            is_flow,
            expecting_key: is_mapping,
            indent,
            needs_comma: false,
            awaiting_first_entry: true,
            synthetic_pair: false,
        });

        Ok(())
    }

    /// Push a synthetic single-pair mapping (the implicit mapping a bare
    /// `:` opens inside a flow sequence), sharing its indent with the
    /// sequence it's nested in.
    pub fn push_synthetic_pair(&mut self, indent: usize) -> Result<()>
    {
        self.push(true, true, indent)?;
        self.levels.last_mut().expect("just pushed").synthetic_pair = true;

        Ok(())
    }

    pub fn is_synthetic_pair(&self) -> bool
    {
        self.levels.last().map_or(false, |l| l.synthetic_pair)
    }

    pub fn needs_comma(&self) -> bool
    {
        self.levels.last().map_or(false, |l| l.needs_comma)
    }

    pub fn set_needs_comma(&mut self, value: bool)
    {
        if let Some(level) = self.levels.last_mut()
        {
            level.needs_comma = value;
        }
    }

    pub fn awaiting_first_entry(&self) -> bool
    {
        self.levels.last().map_or(false, |l| l.awaiting_first_entry)
    }

    pub fn set_awaiting_first_entry(&mut self, value: bool)
    {
        if let Some(level) = self.levels.last_mut()
        {
            level.awaiting_first_entry = value;
        }
    }

    /// Pop the innermost level, returning whether it was a mapping.
    pub fn pop(&mut self) -> Option<bool>
    {
        self.levels.pop().map(|l| l.is_mapping)
    }

    pub fn is_empty(&self) -> bool
    {
        self.levels.is_empty()
    }

    pub fn current_collection_is_mapping(&self) -> bool
    {
        self.levels.last().map_or(false, |l| l.is_mapping)
    }

    pub fn is_inside_flow_context(&self) -> bool
    {
        self.levels.last().map_or(false, |l| l.is_flow)
    }

    /// Indent the innermost collection opened at, or `None` if no
    /// collection is open (root content).
    pub fn current_indent(&self) -> Option<usize>
    {
        self.levels.last().map(|l| l.indent)
    }

    /// Scans ancestors outward from the top for the nearest *block*
    /// collection's indent, skipping any flow levels above it. `None` if
    /// there is no enclosing block collection (root, or everything above
    /// is flow with no block ancestor).
    pub fn enclosing_block_indent(&self) -> Option<usize>
    {
        self.levels.iter().rev().find(|l| !l.is_flow).map(|l| l.indent)
    }

    /// Toggle `expecting_key` at the innermost level (mapping only); call
    /// after emitting a `Key` or a value node.
    pub fn toggle_expecting_key(&mut self)
    {
        if let Some(level) = self.levels.last_mut()
        {
            level.expecting_key = !level.expecting_key;
        }
    }

    pub fn expecting_key(&self) -> bool
    {
        self.levels.last().map_or(true, |l| l.expecting_key)
    }

    /// Pop every level whose indent is strictly greater than `column` (a
    /// dedent past it), invoking `f` once per popped level with whether it
    /// was a mapping, in innermost-to-outermost order. A level sitting at
    /// exactly `column` stays open: that's a sibling entry reusing the
    /// same collection, not a dedent past it. Only block levels are
    /// considered; flow levels are never closed by indentation.
    pub fn close_to_column<F>(&mut self, column: usize, mut f: F) -> Result<usize>
    where
        F: FnMut(bool) -> Result<()>,
    {
        let mut closed = 0;

        while let Some(level) = self.levels.last()
        {
            if level.is_flow || level.indent <= column
            {
                break;
            }

            let level = self.levels.pop().expect("checked Some above");
            f(level.is_mapping)?;
            closed += 1;
        }

        Ok(closed)
    }

    /// Pop every open block level unconditionally, regardless of indent —
    /// used at document/stream end, where any still-open block collection
    /// closes no matter how it's indented. Stops (without error) at the
    /// first flow level, same as `close_to_column`: an unterminated flow
    /// collection is reported elsewhere, not silently closed here.
    pub fn close_all<F>(&mut self, mut f: F) -> Result<usize>
    where
        F: FnMut(bool) -> Result<()>,
    {
        let mut closed = 0;

        while let Some(level) = self.levels.last()
        {
            if level.is_flow
            {
                break;
            }

            let level = self.levels.pop().expect("checked Some above");
            f(level.is_mapping)?;
            closed += 1;
        }

        Ok(closed)
    }
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn push_pop_roundtrip()
    {
        let mut cx = Context::new(64);

        cx.push(true, false, 0).unwrap();
        assert!(cx.current_collection_is_mapping());
        assert_eq!(cx.current_indent(), Some(0));

        assert_eq!(cx.pop(), Some(true));
        assert!(cx.is_empty());
    }

    #[test]
    fn enforces_max_depth()
    {
        let mut cx = Context::new(2);

        cx.push(false, false, 0).unwrap();
        cx.push(false, false, 2).unwrap();

        assert_eq!(cx.push(false, false, 4), Err(ScanError::DepthExceeded));
    }

    #[test]
    fn enclosing_block_indent_skips_flow_levels()
    {
        let mut cx = Context::new(64);

        cx.push(true, false, 0).unwrap();
        cx.push(false, true, 5).unwrap();

        assert_eq!(cx.enclosing_block_indent(), Some(0));
    }

    #[test]
    fn close_to_column_pops_strictly_deeper_levels()
    {
        let mut cx = Context::new(64);
        cx.push(false, false, 0).unwrap();
        cx.push(true, false, 2).unwrap();

        let mut closed = Vec::new();
        cx.close_to_column(0, |is_mapping| {
            closed.push(is_mapping);
            Ok(())
        })
        .unwrap();

        assert_eq!(closed, vec![true]);
        assert!(!cx.is_empty());
        assert_eq!(cx.current_indent(), Some(0));
    }

    #[test]
    fn close_to_column_keeps_level_open_at_equal_indent()
    {
        let mut cx = Context::new(64);
        cx.push(true, false, 0).unwrap();

        let mut closed = Vec::new();
        cx.close_to_column(0, |is_mapping| {
            closed.push(is_mapping);
            Ok(())
        })
        .unwrap();

        assert!(closed.is_empty());
        assert!(!cx.is_empty());
    }

    #[test]
    fn close_all_pops_every_block_level_regardless_of_indent()
    {
        let mut cx = Context::new(64);
        cx.push(false, false, 0).unwrap();
        cx.push(true, false, 2).unwrap();

        let mut closed = Vec::new();
        cx.close_all(|is_mapping| {
            closed.push(is_mapping);
            Ok(())
        })
        .unwrap();

        assert_eq!(closed, vec![true, false]);
        assert!(cx.is_empty());
    }

    #[test]
    fn close_all_stops_at_a_flow_level()
    {
        let mut cx = Context::new(64);
        cx.push(false, false, 0).unwrap();
        cx.push(true, true, 2).unwrap();

        let mut closed = Vec::new();
        cx.close_all(|is_mapping| {
            closed.push(is_mapping);
            Ok(())
        })
        .unwrap();

        assert!(closed.is_empty());
        assert_eq!(cx.depth(), 2);
    }
}
