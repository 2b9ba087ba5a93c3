/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The pull-based driver: [`Scanner::advance`] walks a [`Cursor`] one
//! token at a time, dispatching between the stream/document lifecycle,
//! the block content driver and the flow content driver.

mod anchor;
mod context;
mod directive;
mod error;
mod key;
mod scalar;

use crate::{
    cursor::Cursor,
    options::{Flags, Options},
    queue::TokenBuffer,
    scanner::{
        anchor::{scan_anchor_or_alias, scan_tag, AnchorKind},
        context::Context,
        directive::{scan_tag_directive, scan_version, DirectiveKind, TagRegistry},
        error::{ScanError, ScanResult},
        key::KeyTracker,
        scalar::{
            block::scan_block_scalar,
            plain::scan_plain_scalar,
            quoted::{scan_double_quoted, scan_single_quoted},
        },
    },
    token::{CollectionStyle, Mark, ScalarStyle, ScalarToken, Token, TokenKind},
    Error,
};

/// The outcome of one [`Scanner::advance`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance<'de>
{
    /// A token was produced.
    Token(Token<'de>),
    /// Not enough input to decide the next token, and `is_final_block`
    /// was `false`. Feed more bytes and call `advance` again.
    Incomplete,
    /// The stream is finished: [`TokenKind::StreamEnd`] has already been
    /// returned, and no further call to `advance` will produce a token.
    End,
}

/// An opaque, `Clone`-friendly snapshot of a [`Scanner`]'s state, captured
/// with [`Scanner::snapshot`] and restored with [`Scanner::restore`].
///
/// Holding one lets a caller try scanning further and roll back if that
/// turns out to have been the wrong decision, without re-scanning from the
/// start of the input.
#[derive(Debug, Clone)]
pub struct ReaderState<'de>
{
    scanner: Scanner<'de>,
}

/// What part of the stream/document grammar the driver is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState
{
    /// Before or between documents: directives, `---`/`...` markers.
    InStream,
    /// Inside a document's block-style content.
    InBlockContent,
    /// Inside a document's flow-style content (`[...]`/`{...}`).
    InFlowContent,
    /// `StreamEnd` has been emitted; no further tokens will follow.
    Finished,
}

/// A pull-based, zero-copy scanner over a borrowed YAML 1.2 source.
///
/// Call [`Scanner::advance`] in a loop until it returns
/// [`Advance::End`]. Each call borrows its token's content directly out
/// of the `&'de str` the scanner was constructed with; nothing is
/// copied or unescaped.
#[derive(Debug, Clone)]
pub struct Scanner<'de>
{
    cursor:  Cursor<'de>,
    flags:   Flags,
    buffer:  TokenBuffer<Token<'de>>,
    context: Context,
    keys:    KeyTracker,
    tags:    TagRegistry<'de>,
    state:   ParserState,

    stream_started: bool,
    document_open:  bool,
    yaml_directive_seen:   bool,
    expect_document_start: bool,
    last_scan_line: u64,

    /// True at the start of a block-context line, before any content byte
    /// has been consumed on it. Anchor/tag properties don't clear this for
    /// the node that follows them; every other node dispatch does.
    at_line_start: bool,
    /// Buffer insertion point and column captured at an anchor or tag that
    /// might turn out to prefix a mapping key, so a later retroactive `Key`
    /// insertion lands before the property rather than before the scalar
    /// that follows it.
    pending_key_origin: Option<(usize, usize)>,
    /// True immediately after a block-context anchor, until the next node
    /// dispatch. A second anchor seen while this is set is ambiguous.
    after_anchor: bool,
    /// Line on which the current document's root node was first seen, once
    /// `context` has emptied back out to it. A later empty-context dispatch
    /// on a different line is a second root node.
    root_node_line: Option<u64>,
}

impl<'de> Scanner<'de>
{
    /// Construct a scanner over the entirety of `input`. This is the
    /// zero-copy fast path: every token borrows from `input` for as long
    /// as the scanner lives.
    pub fn new(input: &'de str, options: Options) -> Self
    {
        let mut cursor = Cursor::new(input);
        cursor.skip_bom();

        Self {
            cursor,
            flags: options.flags(),
            buffer: TokenBuffer::new(),
            context: Context::new(options.max_depth),
            keys: KeyTracker::new(),
            tags: TagRegistry::new(),
            state: ParserState::InStream,
            stream_started: false,
            document_open: false,
            yaml_directive_seen: false,
            expect_document_start: false,
            last_scan_line: 1,
            at_line_start: true,
            pending_key_origin: None,
            after_anchor: false,
            root_node_line: None,
        }
    }

    /// Capture a snapshot of this scanner's state that can later be
    /// restored with [`Scanner::restore`]. Cheap relative to re-scanning:
    /// everything held is either `Copy` or a small owned buffer.
    pub fn snapshot(&self) -> ReaderState<'de>
    {
        ReaderState { scanner: self.clone() }
    }

    /// Roll this scanner back to a previously captured [`ReaderState`],
    /// discarding any tokens produced since.
    pub fn restore(&mut self, state: ReaderState<'de>)
    {
        *self = state.scanner;
    }

    /// Produce the next token, or report why none is available yet.
    ///
    /// `is_final_block` tells the scanner whether more input could still
    /// arrive: when `false` and the scanner runs out of bytes mid-token,
    /// it reports [`Advance::Incomplete`] instead of failing; when `true`
    /// the same condition is a fatal
    /// [`ErrorKind::UnexpectedEndOfInput`](crate::error::ErrorKind::UnexpectedEndOfInput).
    pub fn advance(&mut self, is_final_block: bool) -> crate::error::Result<Advance<'de>>
    {
        loop
        {
            if let Some(token) = self.buffer.pop()
            {
                return Ok(Advance::Token(token));
            }

            if self.state == ParserState::Finished
            {
                return Ok(Advance::End);
            }

            match self.step(is_final_block)
            {
                Ok(()) => continue,
                Err(ScanError::Extend) if !is_final_block => return Ok(Advance::Incomplete),
                Err(ScanError::Extend) =>
                {
                    let mark = self.cursor.mark();
                    return Err(Error::new(crate::error::ErrorKind::UnexpectedEndOfInput, mark));
                },
                Err(e) =>
                {
                    let mark = self.cursor.mark();
                    return Err(Error::new(e.into_kind(), mark));
                },
            }
        }
    }

    /// Perform one unit of scanning work, possibly enqueuing zero, one
    /// or several tokens into `self.buffer`.
    fn step(&mut self, is_final_block: bool) -> ScanResult<()>
    {
        if !self.stream_started
        {
            self.stream_started = true;
            let mark = self.cursor.mark();
            self.push(TokenKind::StreamStart, mark);
            return Ok(());
        }

        let line_changed = self.cursor.line() != self.last_scan_line;
        self.last_scan_line = self.cursor.line();
        self.keys.prune_stale(self.cursor.mark(), line_changed);

        match self.state
        {
            ParserState::InStream => self.step_in_stream(is_final_block),
            ParserState::InBlockContent => self.step_block(is_final_block),
            ParserState::InFlowContent => self.step_flow(is_final_block),
            ParserState::Finished => unreachable!("advance() returns before stepping once Finished"),
        }
    }

    fn push(&mut self, kind: TokenKind<'de>, mark: Mark) -> usize
    {
        self.buffer.enqueue(Token::new(kind, mark))
    }

    fn emit_stream_end(&mut self)
    {
        let mark = self.cursor.mark();
        self.push(TokenKind::StreamEnd, mark);
        self.state = ParserState::Finished;
    }

    fn flow_level(&self) -> usize
    {
        self.context.depth()
    }

    fn is_indicator_boundary(&self, offset: usize) -> bool
    {
        match self.cursor.peek_byte_at(offset)
        {
            None => true,
            Some(b) => matches!(b, b' ' | b'\t' | b'\n' | b'\r'),
        }
    }

    fn at_marker(&self, marker: &str) -> bool
    {
        self.cursor.starts_with(marker) && self.is_indicator_boundary(marker.len())
    }

    fn current_is_block_map_at(&self, column: usize) -> bool
    {
        !self.context.is_empty()
            && !self.context.is_inside_flow_context()
            && self.context.current_collection_is_mapping()
            && self.context.current_indent() == Some(column)
    }

    fn current_is_block_seq_at(&self, column: usize) -> bool
    {
        !self.context.is_empty()
            && !self.context.is_inside_flow_context()
            && !self.context.current_collection_is_mapping()
            && self.context.current_indent() == Some(column)
    }

    // -- stream/document lifecycle ----------------------------------------

    fn step_in_stream(&mut self, is_final_block: bool) -> ScanResult<()>
    {
        loop
        {
            self.cursor.skip_spaces();

            if self.cursor.at_break()
            {
                self.cursor.consume_break();
                continue;
            }

            break;
        }

        if self.cursor.is_empty()
        {
            if !is_final_block
            {
                return Err(ScanError::Extend);
            }

            if self.expect_document_start
            {
                return Err(ScanError::DirectiveError);
            }

            self.emit_stream_end();
            return Ok(());
        }

        if self.cursor.column() == 0 && self.cursor.peek_byte() == Some(b'%')
        {
            return self.scan_directive_line();
        }

        if self.at_marker("---")
        {
            let mark = self.cursor.mark();
            self.cursor.advance(3);
            self.cursor.skip_spaces();
            self.push(TokenKind::DocumentStart, mark);
            self.expect_document_start = false;
            self.document_open = true;
            self.state = ParserState::InBlockContent;
            return Ok(());
        }

        if self.expect_document_start
        {
            return Err(ScanError::DirectiveError);
        }

        if self.at_marker("...")
        {
            let mark = self.cursor.mark();
            self.cursor.advance(3);
            self.push(TokenKind::DocumentEnd, mark);
            return Ok(());
        }

        let mark = self.cursor.mark();
        self.push(TokenKind::DocumentStart, mark);
        self.document_open = true;
        self.state = ParserState::InBlockContent;
        Ok(())
    }

    fn scan_directive_line(&mut self) -> ScanResult<()>
    {
        let mark = self.cursor.mark();
        self.cursor.advance(1);

        match DirectiveKind::classify(self.cursor.rest())
        {
            DirectiveKind::Version =>
            {
                self.cursor.advance(4);
                self.cursor.skip_spaces();

                if self.yaml_directive_seen
                {
                    return Err(ScanError::DirectiveError);
                }

                let (major, minor) = scan_version(&mut self.cursor)?;
                self.yaml_directive_seen = true;
                self.finish_directive_line()?;
                self.push(TokenKind::VersionDirective(major, minor), mark);
            },
            DirectiveKind::Tag =>
            {
                self.cursor.advance(3);
                self.cursor.skip_spaces();

                let (handle, prefix) = scan_tag_directive(&mut self.cursor)?;
                self.tags.register(handle, prefix);
                self.finish_directive_line()?;
                self.push(TokenKind::TagDirective(handle, prefix), mark);
            },
            DirectiveKind::Unknown =>
            {
                while !self.cursor.is_empty() && !self.cursor.at_break()
                {
                    self.cursor.advance_char();
                }

                self.cursor.consume_break();
            },
        }

        self.expect_document_start = true;
        Ok(())
    }

    fn finish_directive_line(&mut self) -> ScanResult<()>
    {
        self.cursor.skip_spaces();

        if self.cursor.peek_byte() == Some(b'#')
        {
            while !self.cursor.is_empty() && !self.cursor.at_break()
            {
                self.cursor.advance_char();
            }
        }

        if !self.cursor.is_empty() && !self.cursor.at_break()
        {
            return Err(ScanError::DirectiveError);
        }

        self.cursor.consume_break();
        Ok(())
    }

    fn reset_for_new_document(&mut self)
    {
        self.tags.reset();
        self.yaml_directive_seen = false;
        self.keys = KeyTracker::new();
        self.root_node_line = None;
        self.pending_key_origin = None;
        self.after_anchor = false;
    }

    // -- block content driver ---------------------------------------------

    fn step_block(&mut self, is_final_block: bool) -> ScanResult<()>
    {
        if self.cursor.is_empty()
        {
            return self.finish_document_and_stream(is_final_block);
        }

        self.skip_block_whitespace_and_comments()?;

        if self.cursor.is_empty()
        {
            return self.finish_document_and_stream(is_final_block);
        }

        if self.cursor.column() == 0
        {
            if self.at_marker("---")
            {
                return self.transition_to_new_document();
            }

            if self.at_marker("...")
            {
                return self.end_current_document();
            }
        }

        let column = self.cursor.column();
        let mark = self.cursor.mark();

        if self.close_block_levels(column, mark)?
        {
            return Ok(());
        }

        self.dispatch_block_node(column)
    }

    /// Close every block collection whose indent is strictly deeper than
    /// `column` (a dedent past it), emitting their `End` tokens. Returns
    /// whether anything was closed (the caller re-dispatches on the next
    /// step rather than also scanning content in the same call).
    fn close_block_levels(&mut self, column: usize, mark: Mark) -> ScanResult<bool>
    {
        let mut ends = Vec::new();
        self.context.close_to_column(column, |is_mapping| {
            ends.push(is_mapping);
            Ok(())
        })?;

        let closed = !ends.is_empty();
        self.emit_level_closes(ends, mark);
        Ok(closed)
    }

    /// Close every open block collection regardless of indent, used at
    /// document/stream end where a still-open mapping or sequence closes
    /// no matter what column it started at.
    fn close_all_block_levels(&mut self, mark: Mark) -> ScanResult<()>
    {
        let mut ends = Vec::new();
        self.context.close_all(|is_mapping| {
            ends.push(is_mapping);
            Ok(())
        })?;

        self.emit_level_closes(ends, mark);
        Ok(())
    }

    fn emit_level_closes(&mut self, ends: Vec<bool>, mark: Mark)
    {
        for is_mapping in ends
        {
            let kind = if is_mapping { TokenKind::MappingEnd } else { TokenKind::SequenceEnd };
            self.push(kind, mark);

            if self.context.current_collection_is_mapping() && !self.context.expecting_key()
            {
                self.context.toggle_expecting_key();
            }
        }
    }

    fn finish_document_and_stream(&mut self, is_final_block: bool) -> ScanResult<()>
    {
        if !is_final_block
        {
            return Err(ScanError::Extend);
        }

        let mark = self.cursor.mark();
        self.close_all_block_levels(mark)?;

        if self.document_open
        {
            self.push(TokenKind::DocumentEnd, mark);
            self.document_open = false;
        }

        self.emit_stream_end();
        Ok(())
    }

    fn transition_to_new_document(&mut self) -> ScanResult<()>
    {
        let mark = self.cursor.mark();
        self.close_all_block_levels(mark)?;

        self.push(TokenKind::DocumentEnd, mark);
        self.reset_for_new_document();

        self.cursor.advance(3);
        self.cursor.skip_spaces();

        let start_mark = self.cursor.mark();
        self.push(TokenKind::DocumentStart, start_mark);
        self.document_open = true;

        Ok(())
    }

    fn end_current_document(&mut self) -> ScanResult<()>
    {
        let mark = self.cursor.mark();
        self.close_all_block_levels(mark)?;

        self.cursor.advance(3);
        self.push(TokenKind::DocumentEnd, mark);
        self.reset_for_new_document();
        self.document_open = false;
        self.state = ParserState::InStream;

        Ok(())
    }

    /// Skip spaces, comments and line breaks between block-context
    /// tokens. A literal tab seen here is always rejected: this driver
    /// never treats a tab as ordinary block-context whitespace.
    fn skip_block_whitespace_and_comments(&mut self) -> ScanResult<()>
    {
        loop
        {
            let before = self.cursor.offset();
            self.cursor.skip_spaces();

            if self.cursor.peek_byte() == Some(b'\t')
            {
                return Err(ScanError::IndentationError);
            }

            if self.cursor.peek_byte() == Some(b'#')
            {
                if self.cursor.column() == 0 || self.cursor.offset() > before
                {
                    let comment_mark = self.cursor.mark();
                    let start = self.cursor.offset();

                    while !self.cursor.is_empty() && !self.cursor.at_break()
                    {
                        self.cursor.advance_char();
                    }

                    if self.flags.contains(Flags::COMMENTS)
                    {
                        let text = &self.cursor.buffer()[start..self.cursor.offset()];
                        self.push(TokenKind::Comment(text), comment_mark);
                    }

                    continue;
                }

                return Err(ScanError::CommentWithoutSpace);
            }

            if self.cursor.at_break()
            {
                self.at_line_start = true;
                self.cursor.consume_break();
                continue;
            }

            break;
        }

        Ok(())
    }

    fn dispatch_block_node(&mut self, column: usize) -> ScanResult<()>
    {
        if self.context.is_empty()
        {
            let line = self.cursor.line();

            match self.root_node_line
            {
                Some(l) if l != line => return Err(ScanError::MultipleRootNodes),
                _ => self.root_node_line = Some(line),
            }
        }

        let mark = self.cursor.mark();

        match self.cursor.peek_byte()
        {
            Some(b'-') if self.is_indicator_boundary(1) => self.scan_block_entry(column, mark),
            Some(b'?') if self.is_indicator_boundary(1) => self.scan_explicit_key(column, mark),
            Some(b':') if self.is_indicator_boundary(1) => self.scan_block_value_indicator(column, mark),
            Some(b'[') => self.open_flow_collection(false, column, mark),
            Some(b'{') => self.open_flow_collection(true, column, mark),
            Some(b'\'') => self.scan_block_quoted(column, mark, true),
            Some(b'"') => self.scan_block_quoted(column, mark, false),
            Some(b'|') | Some(b'>') => self.scan_block_literal(column, mark),
            Some(b'&') | Some(b'*') => self.scan_block_anchor_or_alias(column, mark),
            Some(b'!') => self.scan_block_tag(column, mark),
            Some(_) => self.scan_block_plain(column, mark),
            None => Err(ScanError::Extend),
        }
    }

    fn scan_block_entry(&mut self, column: usize, mark: Mark) -> ScanResult<()>
    {
        self.at_line_start = false;
        self.pending_key_origin = None;
        self.after_anchor = false;

        if !self.current_is_block_seq_at(column)
        {
            self.context.push(false, false, column)?;
            self.push(TokenKind::SequenceStart(CollectionStyle::Block), mark);
            return Ok(());
        }

        self.cursor.advance(1);
        self.cursor.skip_spaces();
        self.push(TokenKind::BlockEntry, mark);
        Ok(())
    }

    fn scan_explicit_key(&mut self, column: usize, mark: Mark) -> ScanResult<()>
    {
        self.at_line_start = false;
        self.pending_key_origin = None;
        self.after_anchor = false;

        if !self.current_is_block_map_at(column)
        {
            self.context.push(true, false, column)?;
            self.push(TokenKind::MappingStart(CollectionStyle::Block), mark);
            return Ok(());
        }

        self.cursor.advance(1);
        self.cursor.skip_spaces();
        self.push(TokenKind::Key, mark);

        if self.context.expecting_key()
        {
            self.context.toggle_expecting_key();
        }

        Ok(())
    }

    fn scan_block_value_indicator(&mut self, column: usize, mark: Mark) -> ScanResult<()>
    {
        self.at_line_start = false;
        self.pending_key_origin = None;
        self.after_anchor = false;

        if !self.current_is_block_map_at(column)
        {
            self.context.push(true, false, column)?;
            self.push(TokenKind::MappingStart(CollectionStyle::Block), mark);
            self.push(TokenKind::Key, mark);
            self.push(TokenKind::Scalar(ScalarToken::plain("")), mark);

            if self.context.expecting_key()
            {
                self.context.toggle_expecting_key();
            }
        }

        self.cursor.advance(1);
        self.cursor.skip_spaces();
        self.push(TokenKind::Value, mark);
        Ok(())
    }

    fn open_flow_collection(&mut self, is_mapping: bool, column: usize, mark: Mark) -> ScanResult<()>
    {
        self.at_line_start = false;
        self.pending_key_origin = None;
        self.after_anchor = false;

        self.keys.invalidate(0);
        self.context.push(is_mapping, true, column)?;
        self.cursor.advance(1);

        let kind = if is_mapping
        {
            TokenKind::MappingStart(CollectionStyle::Flow)
        }
        else
        {
            TokenKind::SequenceStart(CollectionStyle::Flow)
        };

        self.push(kind, mark);
        self.state = ParserState::InFlowContent;
        Ok(())
    }

    fn scan_block_plain(&mut self, column: usize, mark: Mark) -> ScanResult<()>
    {
        self.after_anchor = false;

        let (insertion, key_column, key_allowed) = match self.pending_key_origin.take()
        {
            Some((insertion, key_column)) => (insertion, key_column, true),
            None =>
            {
                let allowed = KeyTracker::allow(false, self.at_line_start);
                (self.buffer.mark(), column, allowed)
            },
        };

        self.at_line_start = false;

        if key_allowed
        {
            self.keys.record(0, insertion, mark, false);
        }

        let indent_floor = self.context.enclosing_block_indent().unwrap_or(0);
        let text = scan_plain_scalar(&mut self.cursor, false, indent_floor)?;
        self.push(TokenKind::Scalar(ScalarToken::plain(text)), mark);

        self.try_promote_block_key(key_column, mark, key_allowed)
    }

    fn scan_block_quoted(&mut self, column: usize, mark: Mark, single: bool) -> ScanResult<()>
    {
        self.after_anchor = false;

        let (insertion, key_column, key_allowed) = match self.pending_key_origin.take()
        {
            Some((insertion, key_column)) => (insertion, key_column, true),
            None =>
            {
                let allowed = KeyTracker::allow(false, self.at_line_start);
                (self.buffer.mark(), column, allowed)
            },
        };

        self.at_line_start = false;

        if key_allowed
        {
            self.keys.record(0, insertion, mark, false);
        }

        let (text, multiline, style) = if single
        {
            let (t, m) = scan_single_quoted(&mut self.cursor)?;
            (t, m, ScalarStyle::SingleQuoted)
        }
        else
        {
            let (t, m) = scan_double_quoted(&mut self.cursor)?;
            (t, m, ScalarStyle::DoubleQuoted)
        };

        self.push(TokenKind::Scalar(ScalarToken::quoted(text, style)), mark);

        let followed_by_colon = self.cursor.peek_byte() == Some(b':') && self.is_indicator_boundary(1);

        if multiline
        {
            if followed_by_colon && self.keys.promote(0).is_some()
            {
                return Err(ScanError::MultilineImplicitKey);
            }

            self.keys.invalidate(0);
            return self.check_trailing_after_quoted();
        }

        if followed_by_colon
        {
            self.try_promote_block_key(key_column, mark, key_allowed)
        }
        else
        {
            self.keys.invalidate(0);
            self.check_trailing_after_quoted()
        }
    }

    fn scan_block_literal(&mut self, column: usize, mark: Mark) -> ScanResult<()>
    {
        self.at_line_start = false;
        self.pending_key_origin = None;
        self.after_anchor = false;
        self.keys.invalidate(0);

        let (style, text, indent, chomping) = scan_block_scalar(&mut self.cursor, column)?;
        self.push(TokenKind::Scalar(ScalarToken::block(text, style, indent, chomping)), mark);
        Ok(())
    }

    fn scan_block_anchor_or_alias(&mut self, column: usize, mark: Mark) -> ScanResult<()>
    {
        match AnchorKind::of(self.cursor.peek_byte().expect("matched on & or *"))
        {
            Some(AnchorKind::Anchor) =>
            {
                if self.after_anchor
                {
                    return Err(ScanError::AmbiguousAnchorOrTag);
                }

                if self.pending_key_origin.is_none() && KeyTracker::allow(false, self.at_line_start)
                {
                    self.pending_key_origin = Some((self.buffer.mark(), column));
                }

                let name = scan_anchor_or_alias(&mut self.cursor)?;
                self.push(TokenKind::Anchor(name), mark);
                self.keys.invalidate(0);
                self.after_anchor = true;
                Ok(())
            },
            Some(AnchorKind::Alias) =>
            {
                self.after_anchor = false;

                let (insertion, key_column, key_allowed) = match self.pending_key_origin.take()
                {
                    Some((insertion, key_column)) => (insertion, key_column, true),
                    None =>
                    {
                        let allowed = KeyTracker::allow(false, self.at_line_start);
                        (self.buffer.mark(), column, allowed)
                    },
                };

                self.at_line_start = false;

                if key_allowed
                {
                    self.keys.record(0, insertion, mark, false);
                }

                let name = scan_anchor_or_alias(&mut self.cursor)?;
                self.push(TokenKind::Alias(name), mark);

                self.try_promote_block_key(key_column, mark, key_allowed)
            },
            None => unreachable!("dispatch only calls this on & or *"),
        }
    }

    fn scan_block_tag(&mut self, column: usize, mark: Mark) -> ScanResult<()>
    {
        self.after_anchor = false;

        if self.pending_key_origin.is_none() && KeyTracker::allow(false, self.at_line_start)
        {
            self.pending_key_origin = Some((self.buffer.mark(), column));
        }

        let (handle, suffix) = scan_tag(&mut self.cursor, &self.tags)?;
        self.push(TokenKind::Tag(handle, suffix), mark);
        self.keys.invalidate(0);
        Ok(())
    }

    /// After scanning a node that could be a simple key (a plain/quoted
    /// scalar or an alias), check whether it's immediately followed by a
    /// `:` value indicator and, if so, retroactively insert the `Key`
    /// (and a `MappingStart` if none is open at this column yet) before
    /// it, then consume the indicator and emit `Value`.
    ///
    /// `key_allowed` is false when the node just scanned was not eligible
    /// to start a key in the first place (not at the start of a line and
    /// not inside flow) — a `:` found here is mid-line and the node it
    /// follows already completed a pair on this line, which is fatal.
    fn try_promote_block_key(&mut self, column: usize, mark: Mark, key_allowed: bool) -> ScanResult<()>
    {
        if self.cursor.peek_byte() == Some(b':') && self.is_indicator_boundary(1)
        {
            match self.keys.promote(0)
            {
                Some(insertion) =>
                {
                    if !self.current_is_block_map_at(column)
                    {
                        self.buffer
                            .insert_at(insertion, Token::new(TokenKind::MappingStart(CollectionStyle::Block), mark));
                        self.context.push(true, false, column)?;
                    }

                    self.buffer.insert_at(insertion, Token::new(TokenKind::Key, mark));
                    self.context.toggle_expecting_key();

                    let value_mark = self.cursor.mark();
                    self.cursor.advance(1);
                    self.cursor.skip_spaces();
                    self.push(TokenKind::Value, value_mark);
                },
                None =>
                {
                    if !key_allowed || (self.context.current_collection_is_mapping() && !self.context.expecting_key())
                    {
                        return Err(ScanError::MappingValueNotAllowed);
                    }
                },
            }
        }
        else
        {
            self.keys.invalidate(0);
        }

        Ok(())
    }

    // -- flow content driver -----------------------------------------------

    fn step_flow(&mut self, _is_final_block: bool) -> ScanResult<()>
    {
        if self.cursor.is_empty()
        {
            return Err(ScanError::Extend);
        }

        self.skip_flow_whitespace_and_comments()?;

        if self.cursor.is_empty()
        {
            return Err(ScanError::Extend);
        }

        let mark = self.cursor.mark();

        match self.cursor.peek_byte()
        {
            Some(b',') => self.scan_flow_entry_separator(mark),
            Some(b']') => self.close_flow(false, mark),
            Some(b'}') => self.close_flow(true, mark),
            Some(b':') => self.scan_flow_value_indicator(mark),
            Some(b'[') => self.open_flow_nested(false, mark),
            Some(b'{') => self.open_flow_nested(true, mark),
            Some(b'\'') => self.scan_flow_quoted(mark, true),
            Some(b'"') => self.scan_flow_quoted(mark, false),
            Some(b'&') | Some(b'*') => self.scan_flow_anchor_or_alias(mark),
            Some(b'!') => self.scan_flow_tag(mark),
            Some(_) => self.scan_flow_plain(mark),
            None => Err(ScanError::Extend),
        }
    }

    /// Flow context allows tabs as ordinary whitespace and lets content
    /// cross line breaks freely.
    fn skip_flow_whitespace_and_comments(&mut self) -> ScanResult<()>
    {
        loop
        {
            let before = self.cursor.offset();

            while matches!(self.cursor.peek_byte(), Some(b' ') | Some(b'\t'))
            {
                self.cursor.advance(1);
            }

            if self.cursor.at_break()
            {
                self.cursor.consume_break();
                continue;
            }

            if self.cursor.peek_byte() == Some(b'#')
            {
                if self.cursor.column() == 0 || self.cursor.offset() > before
                {
                    let comment_mark = self.cursor.mark();
                    let start = self.cursor.offset();

                    while !self.cursor.is_empty() && !self.cursor.at_break()
                    {
                        self.cursor.advance_char();
                    }

                    if self.flags.contains(Flags::COMMENTS)
                    {
                        let text = &self.cursor.buffer()[start..self.cursor.offset()];
                        self.push(TokenKind::Comment(text), comment_mark);
                    }

                    continue;
                }

                return Err(ScanError::CommentWithoutSpace);
            }

            break;
        }

        Ok(())
    }

    fn scan_flow_entry_separator(&mut self, mark: Mark) -> ScanResult<()>
    {
        self.after_anchor = false;

        if self.context.awaiting_first_entry() || !self.context.needs_comma()
        {
            return Err(ScanError::FlowError);
        }

        self.keys.invalidate(self.flow_level());
        self.cursor.advance(1);
        self.push(TokenKind::FlowEntry, mark);
        self.context.set_needs_comma(false);

        if !self.flags.contains(Flags::TRAILING_COMMA)
        {
            let mut lookahead = self.cursor;

            loop
            {
                while matches!(lookahead.peek_byte(), Some(b' ') | Some(b'\t'))
                {
                    lookahead.advance(1);
                }

                if lookahead.at_break()
                {
                    lookahead.consume_break();
                    continue;
                }

                break;
            }

            if matches!(lookahead.peek_byte(), Some(b']') | Some(b'}'))
            {
                return Err(ScanError::FlowError);
            }
        }

        Ok(())
    }

    fn close_flow(&mut self, closes_mapping: bool, mark: Mark) -> ScanResult<()>
    {
        self.after_anchor = false;
        self.keys.invalidate(self.flow_level());

        if self.context.is_synthetic_pair()
        {
            self.context.pop();
            self.push(TokenKind::MappingEnd, mark);
            self.context.set_needs_comma(true);
            self.context.set_awaiting_first_entry(false);
            return Ok(());
        }

        if !self.context.is_inside_flow_context() || self.context.current_collection_is_mapping() != closes_mapping
        {
            return Err(ScanError::FlowError);
        }

        self.cursor.advance(1);
        let is_mapping = self.context.pop().expect("checked is_inside_flow_context above");
        let kind = if is_mapping { TokenKind::MappingEnd } else { TokenKind::SequenceEnd };
        self.push(kind, mark);

        if self.context.is_inside_flow_context()
        {
            self.context.set_needs_comma(true);
            self.context.set_awaiting_first_entry(false);
        }
        else
        {
            self.state = ParserState::InBlockContent;

            if self.context.current_collection_is_mapping() && !self.context.expecting_key()
            {
                self.context.toggle_expecting_key();
            }
        }

        Ok(())
    }

    /// A bare `:` as the first byte of a flow entry: either completes a
    /// null-valued pair (`{ : value }`) or, inside a sequence, opens the
    /// synthetic single-pair mapping a bare `:` entry synthesizes.
    fn scan_flow_value_indicator(&mut self, mark: Mark) -> ScanResult<()>
    {
        self.after_anchor = false;

        if self.context.current_collection_is_mapping()
        {
            return Err(ScanError::FlowError);
        }

        // A candidate recorded earlier for this level and still pending
        // means its scalar was never immediately followed by this `:` —
        // i.e. it crossed at least one line break before this indicator
        // was found.
        if self.keys.promote(self.flow_level()).is_some()
        {
            return Err(ScanError::MultilineImplicitKey);
        }

        let indent = self.context.current_indent().unwrap_or(0);
        self.context.push_synthetic_pair(indent)?;
        self.push(TokenKind::MappingStart(CollectionStyle::Flow), mark);
        self.push(TokenKind::Key, mark);
        self.push(TokenKind::Scalar(ScalarToken::plain("")), mark);

        self.cursor.advance(1);
        self.cursor.skip_spaces();
        self.push(TokenKind::Value, mark);
        self.context.set_needs_comma(false);
        self.context.set_awaiting_first_entry(false);
        Ok(())
    }

    fn open_flow_nested(&mut self, is_mapping: bool, mark: Mark) -> ScanResult<()>
    {
        self.after_anchor = false;
        self.keys.invalidate(self.flow_level());

        let column = self.cursor.column();
        self.context.push(is_mapping, true, column)?;
        self.cursor.advance(1);

        let kind = if is_mapping
        {
            TokenKind::MappingStart(CollectionStyle::Flow)
        }
        else
        {
            TokenKind::SequenceStart(CollectionStyle::Flow)
        };

        self.push(kind, mark);
        Ok(())
    }

    fn scan_flow_plain(&mut self, mark: Mark) -> ScanResult<()>
    {
        self.after_anchor = false;
        let insertion = self.buffer.mark();
        self.keys.record(self.flow_level(), insertion, mark, false);

        let indent_floor = self.context.enclosing_block_indent().unwrap_or(0);
        let text = scan_plain_scalar(&mut self.cursor, true, indent_floor)?;
        self.push(TokenKind::Scalar(ScalarToken::plain(text)), mark);

        self.after_flow_node(mark)
    }

    fn scan_flow_quoted(&mut self, mark: Mark, single: bool) -> ScanResult<()>
    {
        self.after_anchor = false;
        let insertion = self.buffer.mark();
        self.keys.record(self.flow_level(), insertion, mark, false);

        let (text, multiline, style) = if single
        {
            let (t, m) = scan_single_quoted(&mut self.cursor)?;
            (t, m, ScalarStyle::SingleQuoted)
        }
        else
        {
            let (t, m) = scan_double_quoted(&mut self.cursor)?;
            (t, m, ScalarStyle::DoubleQuoted)
        };

        self.push(TokenKind::Scalar(ScalarToken::quoted(text, style)), mark);

        let followed_by_colon = self.cursor.peek_byte() == Some(b':') && self.is_indicator_boundary(1);

        if multiline
        {
            if followed_by_colon && self.keys.promote(self.flow_level()).is_some()
            {
                return Err(ScanError::MultilineImplicitKey);
            }

            self.keys.invalidate(self.flow_level());
            return self.check_trailing_after_quoted();
        }

        if followed_by_colon
        {
            self.try_promote_flow_key(mark)?;
            Ok(())
        }
        else
        {
            self.keys.invalidate(self.flow_level());
            self.check_trailing_after_quoted()?;
            self.context.set_needs_comma(true);
            self.context.set_awaiting_first_entry(false);
            Ok(())
        }
    }

    fn scan_flow_anchor_or_alias(&mut self, mark: Mark) -> ScanResult<()>
    {
        match AnchorKind::of(self.cursor.peek_byte().expect("matched on & or *"))
        {
            Some(AnchorKind::Anchor) =>
            {
                if self.after_anchor
                {
                    return Err(ScanError::AmbiguousAnchorOrTag);
                }

                let name = scan_anchor_or_alias(&mut self.cursor)?;
                self.push(TokenKind::Anchor(name), mark);
                self.keys.invalidate(self.flow_level());
                self.after_anchor = true;
                Ok(())
            },
            Some(AnchorKind::Alias) =>
            {
                self.after_anchor = false;

                let insertion = self.buffer.mark();
                self.keys.record(self.flow_level(), insertion, mark, false);

                let name = scan_anchor_or_alias(&mut self.cursor)?;
                self.push(TokenKind::Alias(name), mark);

                self.after_flow_node(mark)
            },
            None => unreachable!("dispatch only calls this on & or *"),
        }
    }

    fn scan_flow_tag(&mut self, mark: Mark) -> ScanResult<()>
    {
        self.after_anchor = false;
        let (handle, suffix) = scan_tag(&mut self.cursor, &self.tags)?;
        self.push(TokenKind::Tag(handle, suffix), mark);
        self.keys.invalidate(self.flow_level());
        Ok(())
    }

    fn after_flow_node(&mut self, mark: Mark) -> ScanResult<()>
    {
        if !self.try_promote_flow_key(mark)?
        {
            self.context.set_needs_comma(true);
            self.context.set_awaiting_first_entry(false);
        }

        Ok(())
    }

    /// Same role as [`Scanner::try_promote_block_key`], but for flow
    /// context: opens a synthetic single-pair mapping first when the
    /// enclosing collection is a sequence rather than a mapping.
    fn try_promote_flow_key(&mut self, mark: Mark) -> ScanResult<bool>
    {
        if self.cursor.peek_byte() != Some(b':') || !self.is_indicator_boundary(1)
        {
            // A line break immediately following leaves the candidate
            // pending: it may still turn out to be a (fatal) multiline
            // implicit key if a bare `:` surfaces once the break is
            // skipped. Anything else on the same line rules it out for
            // good.
            if !self.cursor.at_break()
            {
                self.keys.invalidate(self.flow_level());
            }

            return Ok(false);
        }

        match self.keys.promote(self.flow_level())
        {
            Some(insertion) =>
            {
                if !self.context.current_collection_is_mapping()
                {
                    self.buffer
                        .insert_at(insertion, Token::new(TokenKind::MappingStart(CollectionStyle::Flow), mark));
                    let indent = self.context.current_indent().unwrap_or(0);
                    self.context.push_synthetic_pair(indent)?;
                }

                self.buffer.insert_at(insertion, Token::new(TokenKind::Key, mark));

                let value_mark = self.cursor.mark();
                self.cursor.advance(1);
                self.cursor.skip_spaces();
                self.push(TokenKind::Value, value_mark);
                self.context.set_needs_comma(false);
                self.context.set_awaiting_first_entry(false);
                Ok(true)
            },
            None => Ok(false),
        }
    }

    fn check_trailing_after_quoted(&mut self) -> ScanResult<()>
    {
        self.cursor.skip_spaces();

        match self.cursor.peek_byte()
        {
            None => Ok(()),
            Some(b'#') => Ok(()),
            Some(b',') | Some(b']') | Some(b'}') if self.context.is_inside_flow_context() => Ok(()),
            _ if self.cursor.at_break() => Ok(()),
            _ => Err(ScanError::TrailingContentAfterQuoted),
        }
    }
}
