//! Fluent tree construction.
//!
//! ```rust
//! use vdf_tree::{dump, Document};
//!
//! let mut doc = Document::new();
//! doc.factory()
//!     .dir("settings")
//!         .pair("volume", 80)
//!         .pair_with_query("fullscreen", "1", "$WIN32")
//!         .back()
//!         .unwrap()
//!     .pair("name", "demo");
//!
//! assert_eq!(
//!     dump(&doc).unwrap(),
//!     "settings\n{\n\tvolume 80\n\tfullscreen 1 [$WIN32]\n}\nname demo\n"
//! );
//! ```

use crate::tree::{Document, NodeId, Pair};
use crate::{Error, Result, Value};

/// A cursor over a [`Document`] that appends children at the current set.
///
/// Created by [`Document::factory`] or [`Document::factory_at`].
pub struct Factory<'d> {
    doc: &'d mut Document,
    cursor: NodeId,
}

impl<'d> Factory<'d> {
    pub(crate) fn new(doc: &'d mut Document, cursor: NodeId) -> Self {
        Factory { doc, cursor }
    }

    /// Moves into the most recent set named `key`, creating it if missing.
    pub fn dir(mut self, key: &str) -> Self {
        self.cursor = match self.doc.find_dir(self.cursor, key) {
            Some(existing) => existing,
            None => self.new_set(key),
        };
        self
    }

    /// Creates a set named `key` and moves into it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] if the current set already has a set named `key`.
    pub fn dir_strict(mut self, key: &str) -> Result<Self> {
        if self.doc.find_dir(self.cursor, key).is_some() {
            return Err(Error::structural(&format!(
                "set \"{}\" already exists; strict mode cannot reuse it",
                key
            )));
        }
        self.cursor = self.new_set(key);
        Ok(self)
    }

    fn new_set(&mut self, key: &str) -> NodeId {
        let set = self.doc.create_set(key);
        self.doc.attach(self.cursor, set);
        set
    }

    /// Appends a pair to the current set.
    pub fn pair(self, key: &str, value: impl Into<Value>) -> Self {
        self.push(Pair::new(key, value))
    }

    /// Appends a pair with a query tag to the current set.
    pub fn pair_with_query(self, key: &str, value: impl Into<Value>, query: &str) -> Self {
        self.push(Pair::new(key, value).with_query(query))
    }

    fn push(self, pair: Pair) -> Self {
        let id = self.doc.create_pair(pair);
        self.doc.attach(self.cursor, id);
        self
    }

    /// Moves up one level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] if the current set has no parent.
    pub fn back(self) -> Result<Self> {
        self.back_levels(1)
    }

    /// Moves up `levels` levels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] when navigating past the top set.
    pub fn back_levels(mut self, levels: usize) -> Result<Self> {
        for _ in 0..levels {
            let parent = self.doc.parent(self.cursor);
            self.cursor = parent.ok_or_else(|| {
                Error::structural("attempted to navigate backwards past root set")
            })?;
        }
        Ok(self)
    }

    /// The set the factory currently appends to.
    #[must_use]
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Ends the chain, returning the current set.
    pub fn exit(self) -> NodeId {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_reuses_latest_set() {
        let mut doc = Document::new();
        let first = doc.factory().dir("a").pair("x", "1").back().unwrap().exit();
        assert_eq!(first, doc.root());

        doc.factory().dir("A").pair("y", "2");
        let sets = doc.dirs(doc.root(), Some("a"));
        assert_eq!(sets.len(), 1);
        assert_eq!(doc.children(sets[0]).len(), 2);
    }

    #[test]
    fn test_dir_strict_rejects_existing() {
        let mut doc = Document::new();
        doc.factory().dir("a");
        assert!(matches!(
            doc.factory().dir_strict("a"),
            Err(Error::Structural(_))
        ));
        assert!(doc.factory().dir_strict("b").is_ok());
    }

    #[test]
    fn test_back_past_root_fails() {
        let mut doc = Document::new();
        assert!(doc.factory().back().is_err());
        assert!(doc.factory().dir("a").dir("b").back_levels(3).is_err());
        let up = doc
            .factory()
            .dir("a")
            .dir("b")
            .back_levels(2)
            .unwrap()
            .exit();
        assert_eq!(up, doc.root());
    }

    #[test]
    fn test_factory_at_detached_set() {
        let mut doc = Document::new();
        let loose = doc.create_set("loose");
        let end = doc.factory_at(loose).unwrap().pair("k", "v").exit();
        assert_eq!(end, loose);
        assert_eq!(doc.children(loose).len(), 1);
        assert!(doc.factory_at(loose).unwrap().back().is_err());

        let pair = doc.children(loose)[0];
        assert!(doc.factory_at(pair).is_err());
    }
}
