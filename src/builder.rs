//! Building a [`Document`] from scanner events.
//!
//! [`TreeBuilder`] is the [`Visitor`] behind [`parse`](crate::parse): it keeps a
//! cursor that starts at the root, descends into a new set on every block
//! open and climbs back on every close.
//!
//! ## Macro keys
//!
//! Keys starting with `#` can be routed to a [`MacroHandler`]. The handler
//! receives the document under construction and returns detached nodes to
//! splice in where the macro appeared; the macro pair itself is dropped.
//!
//! ```rust
//! use vdf_tree::{parse_with_macros, Document, NodeId, ParseOptions, Pair, Result, Value};
//!
//! let mut expand = |doc: &mut Document, key: &str, value: &Value| -> Result<Vec<NodeId>> {
//!     assert_eq!(key, "#define");
//!     Ok(vec![doc.create_pair(Pair::new("defined", value.clone()))])
//! };
//!
//! let doc = parse_with_macros("#define yes\nother 1", &ParseOptions::new(), &mut expand).unwrap();
//! let root = doc.root();
//! assert_eq!(doc.value(root, "defined").unwrap().as_str(), Some("yes"));
//! assert!(doc.find_pair(root, "#define").is_none());
//! ```

use crate::de::Visitor;
use crate::tree::{Document, NodeId, Pair};
use crate::{Error, Result, Value};
use log::trace;

/// Expands `#`-prefixed keys during parsing.
pub trait MacroHandler {
    /// Returns nodes (created in `doc` and still detached) to append to the
    /// current set in place of the macro pair.
    ///
    /// # Errors
    ///
    /// Any error aborts the parse.
    fn expand(&mut self, doc: &mut Document, key: &str, value: &Value) -> Result<Vec<NodeId>>;
}

impl<F> MacroHandler for F
where
    F: FnMut(&mut Document, &str, &Value) -> Result<Vec<NodeId>>,
{
    fn expand(&mut self, doc: &mut Document, key: &str, value: &Value) -> Result<Vec<NodeId>> {
        self(doc, key, value)
    }
}

/// Scanner consumer that builds a [`Document`].
pub struct TreeBuilder<'h> {
    doc: Document,
    cursor: NodeId,
    macros: Option<&'h mut dyn MacroHandler>,
}

impl Default for TreeBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h> TreeBuilder<'h> {
    #[must_use]
    pub fn new() -> Self {
        let doc = Document::new();
        let cursor = doc.root();
        TreeBuilder {
            doc,
            cursor,
            macros: None,
        }
    }

    /// Routes `#`-prefixed keys to `handler`.
    #[must_use]
    pub fn with_macros(mut self, handler: &'h mut dyn MacroHandler) -> Self {
        self.macros = Some(handler);
        self
    }

    /// The finished document. Only meaningful after a successful scan.
    #[must_use]
    pub fn finish(self) -> Document {
        self.doc
    }
}

impl Visitor for TreeBuilder<'_> {
    fn on_enter(&mut self, key: String) -> Result<()> {
        trace!("enter block \"{}\"", key);
        let set = self.doc.create_set(key);
        self.doc.attach(self.cursor, set);
        self.cursor = set;
        Ok(())
    }

    fn on_exit(&mut self) -> Result<()> {
        trace!("exit block");
        self.cursor = self
            .doc
            .parent(self.cursor)
            .ok_or_else(|| Error::structural("attempted to exit past root keyvalue"))?;
        Ok(())
    }

    fn on_key(&mut self, key: String, value: Value, query: Option<String>) -> Result<()> {
        if key.starts_with('#') {
            if let Some(handler) = self.macros.as_deref_mut() {
                trace!("expanding macro \"{}\"", key);
                let nodes = handler.expand(&mut self.doc, &key, &value)?;
                return self.doc.extend(self.cursor, nodes);
            }
        }

        let pair = self.doc.create_pair(Pair { key, value, query });
        self.doc.attach(self.cursor, pair);
        Ok(())
    }
}
