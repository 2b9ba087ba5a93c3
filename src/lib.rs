/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A pull based, zero copy scanner for YAML 1.2 byte
//! streams.
//!
//! This crate implements only the tokenizer: it turns a
//! buffer of UTF-8 bytes into a flat sequence of structural
//! [`Token`](token::Token)s (stream/document/collection
//! delimiters, scalars, anchors, tags, aliases,
//! directives). It does not build a document tree, does not
//! resolve aliases and does not interpret tags beyond
//! checking that a named handle was declared. Those
//! concerns belong to a downstream consumer.
//!
//! The entry point is [`Scanner::advance`](scanner::Scanner::advance),
//! called in a loop until it reports the stream is
//! finished. [`reader::ChunkBuffer`] is a small convenience
//! type for callers that receive the input over time rather
//! than having it all in memory up front.

#![allow(clippy::suspicious_else_formatting)]

pub mod cursor;
pub mod error;
pub mod options;
pub mod reader;
pub mod token;

mod queue;
mod scanner;

pub use cursor::Cursor;
pub use error::{Error, Result};
pub use options::Options;
pub use scanner::{Advance, ReaderState, Scanner};
pub use token::{CollectionStyle, Mark, ScalarStyle, Token, TokenKind};
