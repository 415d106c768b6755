//! # vdf_tree
//!
//! A parser, tree model and serializer for Valve's KeyValues text format
//! (VDF), as used by game configuration, localization and manifest files.
//!
//! ## What is VDF?
//!
//! VDF is a brace-delimited format of nested *sets* and `key value` *pairs*.
//! Tokens may be quoted or bare, pairs may carry a `[query]` tag used for
//! platform conditionals, and keys are matched without regard to case. See
//! [`syntax`] for the full format reference.
//!
//! ```text
//! "settings"
//! {
//!     "volume"      "80"
//!     fullscreen    1         [$WIN32]
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Order Preserving**: children keep document order, duplicate keys included
//! - **Single Pass**: one scan over the input, no intermediate token list
//! - **Lossless Round Trips**: `parse(dump(doc)) == doc` for every dumpable tree
//! - **Event Driven**: the scanner reports to a [`Visitor`], so the same scanner
//!   feeds the tree builder, the plain-object projection, or your own consumer
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use vdf_tree::{dump, parse};
//!
//! let doc = parse(r#"
//!     "settings"
//!     {
//!         "volume"    "80"
//!         fullscreen  1   [$WIN32]
//!     }
//! "#).unwrap();
//!
//! let root = doc.root();
//! let settings = doc.dir(root, "SETTINGS").unwrap();
//! assert_eq!(doc.value(settings, "volume").unwrap().as_int().unwrap(), 80);
//!
//! let fullscreen = doc.get_pair(doc.pair(settings, "fullscreen").unwrap()).unwrap();
//! assert_eq!(fullscreen.query.as_deref(), Some("$WIN32"));
//!
//! assert_eq!(
//!     dump(&doc).unwrap(),
//!     "settings\n{\n\tvolume 80\n\tfullscreen 1 [$WIN32]\n}\n"
//! );
//! ```
//!
//! ### Editing
//!
//! ```rust
//! use vdf_tree::{dump, parse, Pair};
//!
//! let mut doc = parse("a { x 1 y 2 }").unwrap();
//! let a = doc.dir(doc.root(), "a").unwrap();
//!
//! let x = doc.pair(a, "x").unwrap();
//! doc.delete(a, x);
//!
//! let z = doc.create_pair(Pair::new("z", "3"));
//! doc.add(a, z).unwrap();
//!
//! assert_eq!(dump(&doc).unwrap(), "a\n{\n\ty 2\n\tz 3\n}\n");
//! ```
//!
//! ### Typed Values
//!
//! ```rust
//! use vdf_tree::{parse_with_options, ParseOptions, Value};
//!
//! let options = ParseOptions::new().with_types(true);
//! let doc = parse_with_options("on true\nratio 0.5\nname \"1\"", &options).unwrap();
//! let root = doc.root();
//!
//! assert_eq!(doc.value(root, "on").unwrap(), &Value::Bool(true));
//! assert_eq!(doc.value(root, "ratio").unwrap().as_float().unwrap(), 0.5);
//! assert!(doc.value(root, "name").unwrap().is_string());
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Parsing**: O(n) in the input length, single pass
//! - **Serialization**: O(n) in the output length, iterative traversal
//! - **Lookup**: O(k) in the number of children of the searched set
//! - **Memory**: nodes live in one arena per document
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Deeply nested input does not recurse in the scanner or serializer
//! - Proper error propagation with `Result` types

pub mod builder;
pub mod de;
pub mod error;
pub mod factory;
pub mod map;
pub mod options;
pub mod ser;
pub mod syntax;
pub mod tree;
pub mod value;

pub use builder::{MacroHandler, TreeBuilder};
pub use de::{scan, Visitor};
pub use error::{Error, Result};
pub use factory::Factory;
pub use map::{JsonMap, JsonValue};
pub use options::{DumpOptions, ParseOptions, Quote};
pub use tree::{Document, Kind, Node, NodeId, Pair};
pub use value::{Number, Value};

use log::debug;
use std::collections::HashMap;
use std::io;

/// Parses VDF text into a [`Document`] with default [`ParseOptions`].
///
/// # Examples
///
/// ```rust
/// use vdf_tree::parse;
///
/// let doc = parse("key value").unwrap();
/// assert_eq!(doc.value(doc.root(), "key").unwrap().as_str(), Some("value"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed text and [`Error::Structural`] for
/// a `}` with no open block.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<Document> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parses VDF text into a [`Document`] with custom options.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::{parse_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_multilines(true);
/// let doc = parse_with_options("/* note */ key value", &options).unwrap();
/// assert_eq!(doc.children(doc.root()).len(), 1);
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed text and [`Error::Structural`] for
/// a `}` with no open block.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Document> {
    let mut builder = TreeBuilder::new();
    scan(text, options, &mut builder)?;
    let doc = builder.finish();
    debug!("parsed document with {} nodes", doc.node_count() - 1);
    Ok(doc)
}

/// Parses VDF text, routing `#`-prefixed keys through `handler`.
///
/// See [`builder`] for an example.
///
/// # Errors
///
/// Same as [`parse_with_options`], plus any error returned by the handler.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_macros(
    text: &str,
    options: &ParseOptions,
    handler: &mut dyn MacroHandler,
) -> Result<Document> {
    let mut builder = TreeBuilder::new().with_macros(handler);
    scan(text, options, &mut builder)?;
    Ok(builder.finish())
}

/// Parses VDF text from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use vdf_tree::{from_reader, ParseOptions};
///
/// let doc = from_reader(Cursor::new(b"a { b c }"), &ParseOptions::new()).unwrap();
/// assert_eq!(doc.node_count(), 3);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails or the data is not UTF-8, and any
/// error [`parse_with_options`] returns.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R, options: &ParseOptions) -> Result<Document>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    parse_with_options(&string, options)
}

/// Parses VDF text from bytes.
///
/// # Errors
///
/// Returns [`Error::Io`] if the bytes are not UTF-8, and any error
/// [`parse_with_options`] returns.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8], options: &ParseOptions) -> Result<Document> {
    let s = std::str::from_utf8(v).map_err(|e| Error::io(&e.to_string()))?;
    parse_with_options(s, options)
}

/// Serializes a document with default [`DumpOptions`].
///
/// # Errors
///
/// Returns [`Error::Unrepresentable`] if a token cannot be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump(doc: &Document) -> Result<String> {
    ser::dump(doc, &DumpOptions::default())
}

/// Serializes a document with custom options.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::{dump_with_options, parse, DumpOptions};
///
/// let doc = parse("a { b c }").unwrap();
/// let text = dump_with_options(&doc, &DumpOptions::new().with_indent("  ")).unwrap();
/// assert_eq!(text, "a\n{\n  b c\n}\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Unrepresentable`] if a token cannot be written under
/// `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump_with_options(doc: &Document, options: &DumpOptions) -> Result<String> {
    ser::dump(doc, options)
}

/// Serializes a single set (with its subtree) or pair.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::{dump_node, parse, DumpOptions};
///
/// let doc = parse("a { b c }\nd e").unwrap();
/// let a = doc.dir(doc.root(), "a").unwrap();
/// assert_eq!(dump_node(&doc, a, &DumpOptions::new()).unwrap(), "a\n{\n\tb c\n}\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Structural`] for an unknown node and
/// [`Error::Unrepresentable`] if a token cannot be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump_node(doc: &Document, node: NodeId, options: &DumpOptions) -> Result<String> {
    ser::dump_node(doc, node, options)
}

/// Serializes a document to a writer.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, doc: &Document, options: &DumpOptions) -> Result<()>
where
    W: io::Write,
{
    let text = ser::dump(doc, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parses VDF text straight into an ordered object map, dropping pairs whose
/// query is mapped to `false` in `env`.
///
/// Escapes, multi-line comments and type inference are all enabled. See
/// [`map`] for the folding rules.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed text and [`Error::Structural`] for
/// a `}` with no open block.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn json(text: &str, env: &HashMap<String, bool>) -> Result<JsonMap> {
    json_with_options(text, env, &ParseOptions::json())
}

/// Like [`json`] with custom scanner options.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed text and [`Error::Structural`] for
/// a `}` with no open block.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn json_with_options(
    text: &str,
    env: &HashMap<String, bool>,
    options: &ParseOptions,
) -> Result<JsonMap> {
    let mut builder = map::JsonBuilder::new(env);
    scan(text, options, &mut builder)?;
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dump_parse() {
        let text = "a\n{\n\tb \"two words\"\n\tc d [$X]\n}\ne f\n";
        let doc = parse(text).unwrap();
        let dumped = dump(&doc).unwrap();
        assert_eq!(dumped, text);
        assert_eq!(parse(&dumped).unwrap(), doc);
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let err = from_slice(&[b'a', b' ', 0xff], &ParseOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_to_writer() {
        let doc = parse("a b").unwrap();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &doc, &DumpOptions::strict()).unwrap();
        assert_eq!(buffer, b"\"a\" \"b\"\n");
    }

    #[test]
    fn test_json_defaults_enable_types() {
        let map = json("/* c */ n 5", &HashMap::new()).unwrap();
        assert_eq!(map.get("n"), Some(&JsonValue::Value(Value::from(5))));
    }

    #[test]
    fn test_json_with_options_keeps_strings() {
        let map = json_with_options("n 5", &HashMap::new(), &ParseOptions::new()).unwrap();
        assert_eq!(map.get("n"), Some(&JsonValue::Value(Value::from("5"))));
    }
}
