//! VDF scanning.
//!
//! This module provides [`scan`], a single-pass scanner that walks the whole
//! input once and reports its structure to a [`Visitor`]. It never builds a
//! tree itself: [`TreeBuilder`](crate::builder::TreeBuilder) and
//! [`JsonBuilder`](crate::map::JsonBuilder) are two visitors shipped with the
//! crate, and any other consumer can implement the three callbacks.
//!
//! ## Token pairing
//!
//! Tokens are collected into a two-slot buffer (key, value). Once both slots
//! are full the next token flushes the pair, so `a 1 b 2` on a single line is
//! two pairs. A bare `[tag]` token arriving while both slots are full is a
//! query: it annotates the pending pair and empties both slots.
//!
//! ```rust
//! use vdf_tree::de::{scan, Visitor};
//! use vdf_tree::{ParseOptions, Result, Value};
//!
//! #[derive(Default)]
//! struct Keys(Vec<String>);
//!
//! impl Visitor for Keys {
//!     fn on_enter(&mut self, key: String) -> Result<()> {
//!         self.0.push(format!("{} {{", key));
//!         Ok(())
//!     }
//!     fn on_exit(&mut self) -> Result<()> {
//!         self.0.push("}".to_string());
//!         Ok(())
//!     }
//!     fn on_key(&mut self, key: String, _value: Value, query: Option<String>) -> Result<()> {
//!         self.0.push(match query {
//!             Some(q) => format!("{} [{}]", key, q),
//!             None => key,
//!         });
//!         Ok(())
//!     }
//! }
//!
//! let mut keys = Keys::default();
//! scan("a 1 b 2 [X] c { d 3 }", &ParseOptions::new(), &mut keys).unwrap();
//! assert_eq!(keys.0, vec!["a", "b [X]", "c {", "d", "}"]);
//! ```

use crate::{Error, ParseOptions, Result, Value};
use log::debug;
use std::borrow::Cow;

/// Receives structural events from [`scan`] in document order.
///
/// Returning an error from any callback aborts the scan; events already
/// delivered are not rolled back.
pub trait Visitor {
    /// A block named `key` was opened.
    fn on_enter(&mut self, key: String) -> Result<()>;

    /// The innermost open block was closed.
    fn on_exit(&mut self) -> Result<()>;

    /// A `key value [query]` pair was completed.
    fn on_key(&mut self, key: String, value: Value, query: Option<String>) -> Result<()>;
}

/// Scans `text`, reporting blocks and pairs to `visitor`.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for unterminated quotes or comments, a block
/// opened without a key (or right after a complete pair), a key left without
/// a value at a block close or at end of input, and blocks still open at end
/// of input. Errors raised by the visitor are passed through unchanged.
pub fn scan<V>(text: &str, options: &ParseOptions, visitor: &mut V) -> Result<()>
where
    V: Visitor + ?Sized,
{
    debug!("scanning {} bytes", text.len());
    Scanner::new(text, options).run(visitor)
}

#[derive(Clone, Copy, Debug)]
struct Token<'a> {
    raw: &'a str,
    quoted: bool,
    offset: usize,
}

impl<'a> Token<'a> {
    fn is_query(&self) -> bool {
        !self.quoted && self.raw.len() >= 2 && self.raw.starts_with('[') && self.raw.ends_with(']')
    }
}

struct Scanner<'a, 'o> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    options: &'o ParseOptions,
    key: Option<Token<'a>>,
    value: Option<Token<'a>>,
    // Offsets of the `{` of every open block
    open_blocks: Vec<usize>,
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

#[inline]
fn is_terminator(b: u8) -> bool {
    is_whitespace(b) || b == b'{' || b == b'}'
}

impl<'a, 'o> Scanner<'a, 'o> {
    fn new(input: &'a str, options: &'o ParseOptions) -> Self {
        Scanner {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            options,
            key: None,
            value: None,
            open_blocks: Vec::new(),
        }
    }

    fn error(&self, offset: usize, msg: &str) -> Error {
        Error::syntax(self.input, offset, msg)
    }

    fn run<V: Visitor + ?Sized>(mut self, visitor: &mut V) -> Result<()> {
        while self.pos < self.bytes.len() {
            let c = self.bytes[self.pos];

            if is_whitespace(c) {
                self.pos += 1;
                continue;
            }

            match c {
                b'{' => self.open_block(visitor)?,
                b'}' => self.close_block(visitor)?,
                b'"' => {
                    let token = self.quoted()?;
                    self.push(token, visitor)?;
                }
                b'/' if self.peek(1) == Some(b'/') => self.line_comment(),
                b'/' if self.options.multilines && self.peek(1) == Some(b'*') => {
                    self.block_comment()?
                }
                _ => {
                    let token = self.bare();
                    self.push(token, visitor)?;
                }
            }
        }

        self.flush(visitor)?;
        if let Some(&offset) = self.open_blocks.last() {
            return Err(self.error(offset, "block was never closed"));
        }
        Ok(())
    }

    #[inline]
    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn open_block<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        let offset = self.pos;
        self.pos += 1;
        match (self.key.take(), self.value.take()) {
            (Some(key), None) => {
                self.open_blocks.push(offset);
                visitor.on_enter(self.text(&key).into_owned())
            }
            (None, _) => Err(self.error(offset, "attempted to enter block without key")),
            (Some(_), Some(_)) => Err(self.error(
                offset,
                "attempted to enter block after a complete key-value pair",
            )),
        }
    }

    fn close_block<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        self.pos += 1;
        self.flush(visitor)?;
        self.open_blocks.pop();
        visitor.on_exit()
    }

    // Emits a complete pending pair; a lone pending key is an error.
    fn flush<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        match (self.key.take(), self.value.take()) {
            (None, _) => Ok(()),
            (Some(key), Some(value)) => self.emit(visitor, key, value, None),
            (Some(key), None) => Err(self.error(
                key.offset,
                &format!("key \"{}\" did not conclude before end of block", key.raw),
            )),
        }
    }

    fn push<V: Visitor + ?Sized>(&mut self, token: Token<'a>, visitor: &mut V) -> Result<()> {
        match (self.key, self.value) {
            (None, _) => self.key = Some(token),
            (Some(_), None) => self.value = Some(token),
            (Some(key), Some(value)) => {
                self.value = None;
                if token.is_query() {
                    self.key = None;
                    let query = &token.raw[1..token.raw.len() - 1];
                    self.emit(visitor, key, value, Some(query.to_string()))?;
                } else {
                    self.key = Some(token);
                    self.emit(visitor, key, value, None)?;
                }
            }
        }
        Ok(())
    }

    fn emit<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        key: Token<'a>,
        value: Token<'a>,
        query: Option<String>,
    ) -> Result<()> {
        let value = if !value.quoted && self.options.types {
            Value::infer(&self.text(&value))
        } else {
            Value::String(self.text(&value).into_owned())
        };
        visitor.on_key(self.text(&key).into_owned(), value, query)
    }

    fn text(&self, token: &Token<'a>) -> Cow<'a, str> {
        if self.options.escapes {
            unescape(token.raw)
        } else {
            Cow::Borrowed(token.raw)
        }
    }

    fn quoted(&mut self) -> Result<Token<'a>> {
        let start = self.pos;
        let mut i = start + 1;
        loop {
            let rel = self.bytes[i..]
                .iter()
                .position(|&b| b == b'"')
                .ok_or_else(|| self.error(start, "encountered unterminated quote"))?;
            i += rel;
            if !self.options.escapes || self.backslashes_before(i, start + 1) % 2 == 0 {
                break;
            }
            i += 1;
        }
        self.pos = i + 1;
        Ok(Token {
            raw: &self.input[start + 1..i],
            quoted: true,
            offset: start,
        })
    }

    // Length of the run of backslashes ending right before `end`, not
    // reaching back past `floor`.
    fn backslashes_before(&self, end: usize, floor: usize) -> usize {
        self.bytes[floor..end]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count()
    }

    fn bare(&mut self) -> Token<'a> {
        let start = self.pos;
        let mut i = start;
        while i < self.bytes.len() {
            let b = self.bytes[i];
            if self.options.escapes && b == b'\\' {
                // The escaped byte belongs to the token, terminator or not.
                i += 2;
                continue;
            }
            if is_terminator(b) {
                break;
            }
            i += 1;
        }
        let end = i.min(self.bytes.len());
        self.pos = end;
        Token {
            raw: &self.input[start..end],
            quoted: false,
            offset: start,
        }
    }

    fn line_comment(&mut self) {
        self.pos = match self.bytes[self.pos..].iter().position(|&b| b == b'\n') {
            Some(rel) => self.pos + rel + 1,
            None => self.bytes.len(),
        };
    }

    fn block_comment(&mut self) -> Result<()> {
        let start = self.pos;
        let body = start + 2;
        match self.bytes[body..].windows(2).position(|w| w == b"*/") {
            Some(rel) => {
                self.pos = body + rel + 2;
                Ok(())
            }
            None => Err(self.error(start, "encountered unterminated multiline comment")),
        }
    }
}

/// Resolves backslash escapes.
///
/// `\\`, `\"`, `\{` and `\}` produce the escaped character; `\n`, `\t` and
/// `\r` produce the matching control character. Any other escape, including a
/// trailing lone backslash, is kept as written.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::de::unescape;
///
/// assert_eq!(unescape(r#"say \"hi\""#), r#"say "hi""#);
/// assert_eq!(unescape(r"a\\b"), r"a\b");
/// assert_eq!(unescape(r"tab\there"), "tab\there");
/// assert_eq!(unescape(r"escaped\ key"), r"escaped\ key");
/// ```
pub fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('{') => out.push('{'),
            Some('}') => out.push('}'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Event {
        Enter(String),
        Exit,
        Key(String, Value, Option<String>),
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl Visitor for Recorder {
        fn on_enter(&mut self, key: String) -> Result<()> {
            self.0.push(Event::Enter(key));
            Ok(())
        }

        fn on_exit(&mut self) -> Result<()> {
            self.0.push(Event::Exit);
            Ok(())
        }

        fn on_key(&mut self, key: String, value: Value, query: Option<String>) -> Result<()> {
            self.0.push(Event::Key(key, value, query));
            Ok(())
        }
    }

    fn events(text: &str, options: &ParseOptions) -> Result<Vec<Event>> {
        let mut recorder = Recorder::default();
        scan(text, options, &mut recorder)?;
        Ok(recorder.0)
    }

    fn key(k: &str, v: &str) -> Event {
        Event::Key(k.to_string(), Value::from(v), None)
    }

    #[test]
    fn test_flattened_pairs() {
        let got = events("a 1 b 2\nc 3", &ParseOptions::new()).unwrap();
        assert_eq!(got, vec![key("a", "1"), key("b", "2"), key("c", "3")]);
    }

    #[test]
    fn test_query_closes_pair() {
        let got = events("a 1 [Q] b 2", &ParseOptions::new()).unwrap();
        assert_eq!(
            got,
            vec![
                Event::Key("a".into(), Value::from("1"), Some("Q".into())),
                key("b", "2"),
            ]
        );
    }

    #[test]
    fn test_bracket_token_in_value_slot_is_value() {
        let got = events("a [Q]", &ParseOptions::new()).unwrap();
        assert_eq!(got, vec![key("a", "[Q]")]);
    }

    #[test]
    fn test_quoted_bracket_is_not_query() {
        let got = events("a 1 \"[Q]\" 2", &ParseOptions::new()).unwrap();
        assert_eq!(got, vec![key("a", "1"), key("[Q]", "2")]);
    }

    #[test]
    fn test_blocks_without_whitespace() {
        let got = events("a{b c}d e", &ParseOptions::new()).unwrap();
        assert_eq!(
            got,
            vec![
                Event::Enter("a".into()),
                key("b", "c"),
                Event::Exit,
                key("d", "e"),
            ]
        );
    }

    #[test]
    fn test_pair_flushed_before_exit() {
        let got = events("a { b c [Q] d e }", &ParseOptions::new()).unwrap();
        assert_eq!(got.len(), 4);
        assert_eq!(got[2], key("d", "e"));
        assert_eq!(got[3], Event::Exit);
    }

    #[test]
    fn test_escaped_terminator_in_bare_token() {
        let got = events(r"a\ b\{c\} v", &ParseOptions::new()).unwrap();
        assert_eq!(got, vec![key(r"a\ b{c}", "v")]);
    }

    #[test]
    fn test_escapes_disabled() {
        let options = ParseOptions::new().with_escapes(false);
        let got = events(r#""a\" "b" c\ d"#, &options).unwrap();
        assert_eq!(got, vec![key(r"a\", "b"), key(r"c\", "d")]);
    }

    #[test]
    fn test_comment_in_token_is_literal() {
        let got = events("url http://example.com // trailing", &ParseOptions::new()).unwrap();
        assert_eq!(got, vec![key("url", "http://example.com")]);
    }

    #[test]
    fn test_comment_at_end_without_newline() {
        let got = events("a b // done", &ParseOptions::new()).unwrap();
        assert_eq!(got, vec![key("a", "b")]);
    }

    #[test]
    fn test_block_comment_requires_full_terminator() {
        let options = ParseOptions::new().with_multilines(true);
        let err = events("a /*/ b", &options).unwrap_err();
        assert!(matches!(err, Error::Syntax { offset: 2, .. }));
    }

    #[test]
    fn test_types_only_on_bare_values() {
        let options = ParseOptions::new().with_types(true);
        let got = events("1 2 \"3\" \"4\" 5 true", &options).unwrap();
        assert_eq!(
            got,
            vec![
                Event::Key("1".into(), Value::from(2), None),
                Event::Key("3".into(), Value::from("4"), None),
                Event::Key("5".into(), Value::Bool(true), None),
            ]
        );
    }

    #[test]
    fn test_enter_after_complete_pair_fails() {
        let err = events("a b {", &ParseOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Syntax { offset: 4, .. }));
    }

    #[test]
    fn test_unpaired_key_reports_key_offset() {
        let err = events("a b c", &ParseOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Syntax { offset: 4, .. }));

        let err = events("x { lonely }", &ParseOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Syntax { offset: 4, .. }));
    }

    #[test]
    fn test_unclosed_block_reports_opening_brace() {
        let err = events("a { b { c d }", &ParseOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Syntax { offset: 2, .. }));
    }

    #[test]
    fn test_visitor_error_aborts_scan() {
        struct Failing(usize);
        impl Visitor for Failing {
            fn on_enter(&mut self, _key: String) -> Result<()> {
                Ok(())
            }
            fn on_exit(&mut self) -> Result<()> {
                Ok(())
            }
            fn on_key(
                &mut self,
                _key: String,
                _value: Value,
                _query: Option<String>,
            ) -> Result<()> {
                self.0 += 1;
                Err(Error::custom("stop"))
            }
        }

        let mut visitor = Failing(0);
        let err = scan("a 1 b 2 c 3", &ParseOptions::new(), &mut visitor).unwrap_err();
        assert_eq!(err, Error::Custom("stop".to_string()));
        assert_eq!(visitor.0, 1);
    }

    #[test]
    fn test_trailing_escape_on_multibyte_char() {
        let got = events("k v\\é", &ParseOptions::new()).unwrap();
        assert_eq!(got, vec![key("k", "v\\é")]);
    }

    #[test]
    fn test_unescape_borrows_when_clean() {
        assert!(matches!(unescape("plain"), Cow::Borrowed(_)));
        assert_eq!(unescape("end\\"), "end\\");
    }
}
