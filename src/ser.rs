//! VDF serialization.
//!
//! This module provides the [`Serializer`] that writes a [`Document`] back to
//! text. Traversal is pre-order and iterative, so deeply nested trees do not
//! grow the call stack, and output goes into one pre-sized buffer.
//!
//! ## Quoting
//!
//! Under [`Quote::Auto`] a token is quoted only when it would not survive a
//! re-parse bare:
//!
//! - it is empty or contains a space
//! - it looks like a `[query]` tag
//! - it starts like a comment (`//`, `/*`)
//! - escapes are disabled and it contains other whitespace, braces, or starts
//!   with a quote
//!
//! [`Quote::AutoTyped`] additionally quotes string values that type inference
//! would turn into booleans or numbers.
//!
//! ```rust
//! use vdf_tree::{dump_with_options, parse, DumpOptions, Quote};
//!
//! let doc = parse("a \"b c\"\nkey \"[tag]\"").unwrap();
//! let text = dump_with_options(&doc, &DumpOptions::new()).unwrap();
//! assert_eq!(text, "a \"b c\"\nkey \"[tag]\"\n");
//!
//! let text = dump_with_options(&doc, &DumpOptions::new().with_quote(Quote::Always)).unwrap();
//! assert_eq!(text, "\"a\" \"b c\"\n\"key\" \"[tag]\"\n");
//! ```
//!
//! ## Escaping
//!
//! With escapes enabled, `\` and `"` are escaped and newline, tab and carriage
//! return are written as `\n`, `\t`, `\r`; bare tokens also escape `{` and
//! `}`. With escapes disabled nothing is escaped, and a token that cannot be
//! written faithfully is rejected with [`Error::Unrepresentable`].

use crate::tree::{Document, Kind, NodeId, Pair};
use crate::{DumpOptions, Error, Quote, Result, Value};
use log::debug;

/// Writes documents as VDF text.
pub struct Serializer<'o> {
    output: String,
    options: &'o DumpOptions,
}

enum Step {
    Open(NodeId, usize),
    Close(usize),
}

impl<'o> Serializer<'o> {
    pub fn new(options: &'o DumpOptions) -> Self {
        Serializer {
            output: String::new(),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes the children of the root (or of any set) at depth zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unrepresentable`] if a token cannot be written under
    /// the active options.
    pub fn write_children(&mut self, doc: &Document, set: NodeId) -> Result<()> {
        self.reserve_for(doc);
        let steps = doc.children(set).iter().rev().map(|&c| Step::Open(c, 0));
        self.walk(doc, steps.collect())
    }

    /// Writes a single node (a set with its subtree, or a pair) at depth zero.
    /// The root writes its children.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unrepresentable`] if a token cannot be written under
    /// the active options.
    pub fn write_node(&mut self, doc: &Document, node: NodeId) -> Result<()> {
        match doc.get(node).map(|n| n.kind()) {
            Some(Kind::Root) => self.write_children(doc, node),
            Some(_) => {
                self.reserve_for(doc);
                self.walk(doc, vec![Step::Open(node, 0)])
            }
            None => Err(Error::structural("unknown node")),
        }
    }

    // Rough guess of the output size so large trees avoid repeated growth.
    fn reserve_for(&mut self, doc: &Document) {
        self.output.reserve(doc.node_count().saturating_mul(24));
    }

    fn walk(&mut self, doc: &Document, mut stack: Vec<Step>) -> Result<()> {
        while let Some(step) = stack.pop() {
            match step {
                Step::Close(depth) => {
                    self.write_indent(depth);
                    self.output.push_str("}\n");
                }
                Step::Open(id, depth) => {
                    let node = &doc[id];
                    if let Some(pair) = node.as_pair() {
                        self.write_pair(pair, depth)?;
                        continue;
                    }

                    self.write_indent(depth);
                    self.write_token(node.key().unwrap_or_default(), true)?;
                    self.output.push('\n');
                    self.write_indent(depth);
                    self.output.push_str("{\n");

                    stack.push(Step::Close(depth));
                    for &child in node.children().iter().rev() {
                        stack.push(Step::Open(child, depth + 1));
                    }
                }
            }
        }
        Ok(())
    }

    fn write_indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.output.push_str(&self.options.indent);
        }
    }

    fn write_pair(&mut self, pair: &Pair, depth: usize) -> Result<()> {
        self.write_indent(depth);
        self.write_token(&pair.key, true)?;
        self.output.push(' ');
        match &pair.value {
            Value::String(s) => self.write_token(s, false)?,
            typed => self.output.push_str(&typed.to_string()),
        }
        if let Some(query) = &pair.query {
            if !query_stays_bare(query, self.options.escapes) {
                return Err(Error::unrepresentable(
                    query,
                    "query tags cannot contain unescaped whitespace or braces",
                ));
            }
            self.output.push_str(" [");
            self.output.push_str(query);
            self.output.push(']');
        }
        self.output.push('\n');
        Ok(())
    }

    fn write_token(&mut self, s: &str, is_key: bool) -> Result<()> {
        let quoted = needs_quotes(s, is_key, self.options);
        if quoted {
            self.output.push('"');
        }

        if self.options.escapes {
            for ch in s.chars() {
                match ch {
                    '\\' => self.output.push_str("\\\\"),
                    '"' => self.output.push_str("\\\""),
                    '\n' => self.output.push_str("\\n"),
                    '\t' => self.output.push_str("\\t"),
                    '\r' => self.output.push_str("\\r"),
                    '{' if !quoted => self.output.push_str("\\{"),
                    '}' if !quoted => self.output.push_str("\\}"),
                    _ => self.output.push(ch),
                }
            }
        } else {
            if quoted && s.contains('"') {
                return Err(Error::unrepresentable(
                    s,
                    "quoted token contains a quote and escapes are disabled",
                ));
            }
            self.output.push_str(s);
        }

        if quoted {
            self.output.push('"');
        }
        Ok(())
    }
}

// Queries are written raw, so `[query]` must re-scan as one bare token. With
// escapes on, a backslash carries the next byte whatever it is.
fn query_stays_bare(query: &str, escapes: bool) -> bool {
    let bytes = query.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if escapes => i += 2,
            b' ' | b'\t' | b'\r' | b'\n' | b'{' | b'}' => return false,
            _ => i += 1,
        }
    }
    true
}

/// Decides whether `s` must be quoted under `options`.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::ser::needs_quotes;
/// use vdf_tree::{DumpOptions, Quote};
///
/// let auto = DumpOptions::new();
/// assert!(!needs_quotes("abc", false, &auto));
/// assert!(needs_quotes("a b", false, &auto));
/// assert!(needs_quotes("", true, &auto));
/// assert!(needs_quotes("[tag]", true, &auto));
///
/// let typed = DumpOptions::new().with_quote(Quote::AutoTyped);
/// assert!(needs_quotes("123", false, &typed));
/// assert!(!needs_quotes("123", true, &typed));
/// ```
#[must_use]
pub fn needs_quotes(s: &str, is_key: bool, options: &DumpOptions) -> bool {
    if options.quote == Quote::Always {
        return true;
    }

    if s.is_empty()
        || s.contains(' ')
        || (s.len() >= 2 && s.starts_with('[') && s.ends_with(']'))
        || s.starts_with("//")
        || s.starts_with("/*")
    {
        return true;
    }

    let breaks_bare = |b: u8| matches!(b, b'\t' | b'\r' | b'\n' | b'{' | b'}');
    if !options.escapes && (s.starts_with('"') || s.bytes().any(breaks_bare)) {
        return true;
    }

    options.quote == Quote::AutoTyped && !is_key && Value::looks_typed(s)
}

/// Serializes the whole document.
///
/// # Errors
///
/// Returns [`Error::Unrepresentable`] if a token cannot be written under the
/// active options.
pub fn dump(doc: &Document, options: &DumpOptions) -> Result<String> {
    let mut serializer = Serializer::new(options);
    serializer.write_children(doc, doc.root())?;
    let output = serializer.into_inner();
    debug!(
        "dumped {} nodes into {} bytes",
        doc.node_count() - 1,
        output.len()
    );
    Ok(output)
}

/// Serializes one set (with its subtree) or pair.
///
/// # Errors
///
/// Returns [`Error::Structural`] for an unknown node and
/// [`Error::Unrepresentable`] if a token cannot be written.
pub fn dump_node(doc: &Document, node: NodeId, options: &DumpOptions) -> Result<String> {
    let mut serializer = Serializer::new(options);
    serializer.write_node(doc, node)?;
    Ok(serializer.into_inner())
}
