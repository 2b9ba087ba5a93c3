/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Implicit ("simple") mapping key detection.
//!
//! A plain or quoted scalar only turns out to be a mapping key once its
//! terminating `:` is seen, which may be many bytes (even, in flow
//! context, many lines) later. Rather than backtrack the cursor, the
//! driver asks [`KeyTracker::allow`] before scanning anything that could
//! be a key, records a [`Candidate`] if one is allowed, and asks
//! [`KeyTracker::promote`] on seeing a `:` in value-indicator shape. A
//! successful promotion hands back the logical buffer index a `Key` token
//! must be inserted at.

use crate::token::Mark;

/// Byte budget within which a candidate key's terminating `:` must
/// appear, past which it is considered stale.
const MAX_KEY_LOOKAHEAD: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate
{
    required: bool,
    token_insertion_index: usize,
    flow_level: usize,
    mark: Mark,
}

/// Tracks at most one pending simple-key candidate per flow level.
#[derive(Debug, Default, Clone)]
pub(in crate::scanner) struct KeyTracker
{
    candidates: Vec<Candidate>,
}

impl KeyTracker
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// True if a candidate may be recorded at this position: always in
    /// flow context, in block context only when nothing but whitespace
    /// has been seen on this line yet.
    pub fn allow(in_flow: bool, at_line_start: bool) -> bool
    {
        in_flow || at_line_start
    }

    /// Record a new candidate for `flow_level`, replacing any existing
    /// one at that level (the driver only calls this when `allow` held).
    pub fn record(&mut self, flow_level: usize, token_insertion_index: usize, mark: Mark, required: bool)
    {
        self.candidates.retain(|c| c.flow_level != flow_level);
        self.candidates.push(Candidate {
            required,
            token_insertion_index,
            flow_level,
            mark,
        });
    }

    /// Drop any candidate recorded for `flow_level`, e.g. because the
    /// node it would have decorated turned out not to be a key.
    pub fn invalidate(&mut self, flow_level: usize)
    {
        self.candidates.retain(|c| c.flow_level != flow_level);
    }

    /// Attempt to promote the candidate at `flow_level` to a key, given
    /// the current position. Returns the buffer index to insert `Key` at.
    pub fn promote(&mut self, flow_level: usize) -> Option<usize>
    {
        let idx = self.candidates.iter().position(|c| c.flow_level == flow_level)?;
        let candidate = self.candidates.remove(idx);

        Some(candidate.token_insertion_index)
    }

    /// Prune stale candidates: on a line change in block context (flow
    /// level 0), and unconditionally once the byte budget has elapsed.
    /// Returns true if a *required* candidate was pruned (a fatal
    /// "could not find expected ':'" condition).
    pub fn prune_stale(&mut self, current_mark: Mark, line_changed_in_block: bool) -> bool
    {
        let mut lost_required = false;

        self.candidates.retain(|c| {
            let block_stale = c.flow_level == 0 && line_changed_in_block;
            let budget_stale = current_mark.offset.saturating_sub(c.mark.offset) > MAX_KEY_LOOKAHEAD;

            let stale = block_stale || budget_stale;

            if stale && c.required
            {
                lost_required = true;
            }

            !stale
        });

        lost_required
    }
}
