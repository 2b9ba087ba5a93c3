/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Scalar boundary detection. Every scanner here returns the raw source
//! slice plus the style it was written in; none of them unescape, fold,
//! or strip indentation — that's the consumer's job per the scalar-text
//! contract.

pub mod block;
pub mod plain;
pub mod quoted;

/// True for a byte that ends a flow plain scalar no matter the
/// surrounding whitespace: the flow indicators and the value separator.
pub(in crate::scanner) fn is_flow_terminator(b: u8) -> bool
{
    matches!(b, b',' | b'[' | b']' | b'{' | b'}')
}
