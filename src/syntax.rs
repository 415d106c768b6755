//! VDF text format reference
//!
//! This module documents the KeyValues ("VDF") dialect read and written by
//! this library. It contains no code.
//!
//! # Overview
//!
//! A document is a sequence of entries. An entry is either a *pair* (a key
//! followed by a value, optionally followed by a query tag) or a *set* (a key
//! followed by a brace-delimited block of further entries). Whitespace between
//! tokens is insignificant, so a whole document can sit on one line.
//!
//! ```text
//! "settings"
//! {
//!     "volume"      "80"
//!     fullscreen    1         [$WIN32]
//!     "nested"
//!     {
//!         name      "two words"
//!     }
//! }
//! ```
//!
//! # Tokens
//!
//! ## Quoted
//!
//! A quoted token runs from `"` to the next `"` that is preceded by an even
//! number of backslashes. `"a\"b"` is the single token `a"b`; `"a\\"` ends
//! after the second backslash. Quoted tokens may contain any whitespace,
//! braces, and newlines.
//!
//! ## Bare
//!
//! A bare token runs until whitespace, `{` or `}`. A backslash consumes the
//! character after it, so `a\ b` and `a\{b` are single tokens when escapes
//! are enabled.
//!
//! ## Query tags
//!
//! A bare token wrapped in square brackets that directly follows a complete
//! pair is that pair's *query*, for example `[$WIN32]` or `[!$X360]`. The
//! brackets are stripped and the content is kept verbatim. Anywhere else a
//! bracketed token is an ordinary key or value.
//!
//! | Input | Key | Value | Query |
//! |-------|-----|-------|-------|
//! | `k v [$A]` | `k` | `v` | `$A` |
//! | `k "[$A]"` | `k` | `[$A]` | none |
//! | `k [$A]` | `k` | `[$A]` | none |
//!
//! # Comments
//!
//! - `//` starts a comment that runs to the end of the line. It is always
//!   recognized outside quoted tokens.
//! - `/* ... */` is recognized only when multiline comments are enabled in
//!   [`ParseOptions`](crate::ParseOptions); otherwise `/*` begins a bare token.
//!
//! # Escapes
//!
//! With escapes enabled (the default) the following sequences are decoded in
//! keys and values:
//!
//! | Escape | Result |
//! |--------|--------|
//! | `\\` | `\` |
//! | `\"` | `"` |
//! | `\n` | newline |
//! | `\t` | tab |
//! | `\r` | carriage return |
//! | `\{`, `\}` | `{`, `}` |
//!
//! Any other escape is kept as written. With escapes disabled, backslashes are
//! plain characters and quoted tokens end at the first `"`.
//!
//! # Typed values
//!
//! With type inference enabled, *bare* values are converted: `true` and
//! `false` become booleans, and decimal numerals (optional sign, digits,
//! optional fraction, optional exponent) become integers or floats. Integers
//! that overflow 64 bits become floats. Quoted values and all keys stay
//! strings.
//!
//! # Errors
//!
//! | Input | Error |
//! |-------|-------|
//! | `key "value` | unterminated quoted token |
//! | `lonely` | key without a value |
//! | `a b { }` | block opened after a complete pair |
//! | `a {` | unclosed block |
//! | `}` | block closed with none open (structural) |
//! | `/* open` (multilines on) | unterminated comment |
//!
//! Syntax errors carry the byte offset, line and column where the problem
//! begins. Closing a block that was never opened is reported by the consumer
//! as a structural error. See [`Error`](crate::Error).
//!
//! # Output
//!
//! The serializer writes one entry per line, sets as
//!
//! ```text
//! key
//! {
//!     child value
//! }
//! ```
//!
//! with a configurable indent per nesting level (tab by default). Tokens are
//! quoted according to [`Quote`](crate::Quote); see [`ser`](crate::ser) for the
//! exact rules.
