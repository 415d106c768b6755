//! Ordered tree model.
//!
//! A [`Document`] owns every node of one tree in a flat arena and hands out
//! [`NodeId`] handles. Each node records its parent as a handle, so the tree
//! has back-references without shared ownership: the parent's child list is
//! the only owner, and removing a node from it leaves a valid, parentless node
//! that can be attached elsewhere.
//!
//! ## Lookups
//!
//! Key lookups ignore ASCII case. Singular lookups ([`Document::any`],
//! [`Document::dir`], [`Document::pair`]) search from the end of the child
//! list, so the most recently added match wins. Plural lookups return every
//! match in insertion order.
//!
//! ```rust
//! use vdf_tree::parse;
//!
//! let doc = parse("Foo 1\nfoo 2\nbar { }").unwrap();
//! let root = doc.root();
//!
//! assert_eq!(doc.value(root, "FOO").unwrap().as_str(), Some("2"));
//! assert_eq!(doc.pairs(root, Some("foo")).len(), 2);
//! assert!(doc.dir(root, "bar").is_ok());
//! assert!(doc.find_dir(root, "baz").is_none());
//! ```
//!
//! ## Removal
//!
//! [`Document::delete`] keeps the order of the remaining children and costs
//! O(n). [`Document::swap_delete`] is O(1) but moves the last child into the
//! freed slot, so sibling order is **not** preserved.

use crate::factory::Factory;
use crate::{Error, Result, Value};
use std::ops::{Index, IndexMut};

/// Handle to a node inside a [`Document`].
///
/// Handles are only meaningful for the document that created them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The three kinds of node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Root,
    Set,
    Pair,
}

/// A `key value [query]` leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct Pair {
    pub key: String,
    pub value: Value,
    pub query: Option<String>,
}

impl Pair {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Pair {
            key: key.into(),
            value: value.into(),
            query: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// See [`Value::as_bool`].
    #[must_use]
    pub fn as_bool(&self) -> bool {
        self.value.as_bool()
    }

    /// See [`Value::as_float`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not numeric.
    pub fn as_float(&self) -> Result<f64> {
        self.value.as_float()
    }

    /// See [`Value::as_int`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not numeric.
    pub fn as_int(&self) -> Result<i64> {
        self.value.as_int()
    }

    /// See [`Value::as_vector`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not a bracketed vector.
    pub fn as_vector(&self) -> Result<Vec<f64>> {
        self.value.as_vector()
    }

    /// See [`Value::as_vector_with`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not a delimited vector.
    pub fn as_vector_with(&self, open: &str, close: &str) -> Result<Vec<f64>> {
        self.value.as_vector_with(open, close)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Body {
    Root(Vec<NodeId>),
    Set { key: String, children: Vec<NodeId> },
    Pair(Pair),
}

/// One slot of the arena.
#[derive(Clone, Debug)]
pub struct Node {
    parent: Option<NodeId>,
    body: Body,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self.body {
            Body::Root(_) => Kind::Root,
            Body::Set { .. } => Kind::Set,
            Body::Pair(_) => Kind::Pair,
        }
    }

    /// The node's key; `None` for the root.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match &self.body {
            Body::Root(_) => None,
            Body::Set { key, .. } => Some(key),
            Body::Pair(pair) => Some(&pair.key),
        }
    }

    /// Renames a set or pair. The root has no key and is left unchanged.
    pub fn set_key(&mut self, new_key: impl Into<String>) {
        match &mut self.body {
            Body::Root(_) => {}
            Body::Set { key, .. } => *key = new_key.into(),
            Body::Pair(pair) => pair.key = new_key.into(),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order; empty for pairs.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match &self.body {
            Body::Root(children) | Body::Set { children, .. } => children,
            Body::Pair(_) => &[],
        }
    }

    #[must_use]
    pub fn is_pair(&self) -> bool {
        matches!(self.body, Body::Pair(_))
    }

    /// `true` for sets and the root.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.is_pair()
    }

    #[must_use]
    pub fn as_pair(&self) -> Option<&Pair> {
        match &self.body {
            Body::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    pub fn as_pair_mut(&mut self) -> Option<&mut Pair> {
        match &mut self.body {
            Body::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.body {
            Body::Root(children) | Body::Set { children, .. } => Some(children),
            Body::Pair(_) => None,
        }
    }

    fn matches(&self, key: &str) -> bool {
        self.key().is_some_and(|k| k.eq_ignore_ascii_case(key))
    }
}

/// An ordered KeyValues tree.
///
/// Equality compares the trees hanging off the two roots (keys, values,
/// queries and order); detached nodes are ignored.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

const ROOT: NodeId = NodeId(0);

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only an empty root.
    #[must_use]
    pub fn new() -> Self {
        Document {
            nodes: vec![Node {
                parent: None,
                body: Body::Root(Vec::new()),
            }],
        }
    }

    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        ROOT
    }

    /// Number of nodes in the arena, detached ones and the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    #[must_use]
    pub fn get_pair(&self, id: NodeId) -> Option<&Pair> {
        self.get(id).and_then(Node::as_pair)
    }

    pub fn get_pair_mut(&mut self, id: NodeId) -> Option<&mut Pair> {
        self.get_mut(id).and_then(Node::as_pair_mut)
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => node.children(),
            None => &[],
        }
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Starts a fluent builder at the root.
    pub fn factory(&mut self) -> Factory<'_> {
        Factory::new(self, ROOT)
    }

    /// Starts a fluent builder at `set`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] if `set` is not a set or the root.
    pub fn factory_at(&mut self, set: NodeId) -> Result<Factory<'_>> {
        match self.get(set) {
            Some(node) if node.is_set() => Ok(Factory::new(self, set)),
            _ => Err(Error::structural("factory must start at a set")),
        }
    }

    // ----- creation -----

    fn alloc(&mut self, body: Body) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: None, body });
        id
    }

    /// Creates a detached pair.
    pub fn create_pair(&mut self, pair: Pair) -> NodeId {
        self.alloc(Body::Pair(pair))
    }

    /// Creates a detached, empty set.
    pub fn create_set(&mut self, key: impl Into<String>) -> NodeId {
        self.alloc(Body::Set {
            key: key.into(),
            children: Vec::new(),
        })
    }

    /// Deep-copies the subtree at `node` of `other` into this document.
    /// The copy is detached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] if `node` is unknown to `other` or is
    /// its root.
    pub fn import(&mut self, other: &Document, node: NodeId) -> Result<NodeId> {
        match other.get(node).map(Node::kind) {
            None => return Err(Error::structural("unknown node")),
            Some(Kind::Root) => return Err(Error::structural("cannot import a root")),
            Some(_) => {}
        }

        let mut top = None;
        let mut stack = vec![(node, None)];
        while let Some((src, parent)) = stack.pop() {
            let copy = match &other.nodes[src.0].body {
                Body::Pair(pair) => self.create_pair(pair.clone()),
                Body::Set { key, .. } => self.create_set(key.clone()),
                Body::Root(_) => return Err(Error::structural("cannot import a root")),
            };
            match parent {
                Some(p) => self.attach(p, copy),
                None => top = Some(copy),
            }
            for &child in other.children(src).iter().rev() {
                stack.push((child, Some(copy)));
            }
        }
        top.ok_or_else(|| Error::structural("unknown node"))
    }

    // ----- mutation -----

    // Appends without validation; callers guarantee the invariants.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.nodes[parent.0].children_mut() {
            children.push(child);
            self.nodes[child.0].parent = Some(parent);
        }
    }

    /// Appends `child` to `parent` and makes `parent` its owner.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] if either handle is unknown, `parent` is a
    /// pair, `child` is the root, `child` already has a parent, or `child`
    /// is an ancestor of `parent`.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        let (Some(p), Some(c)) = (self.get(parent), self.get(child)) else {
            return Err(Error::structural("unknown node"));
        };
        if p.is_pair() {
            return Err(Error::structural("pairs cannot have children"));
        }
        if c.kind() == Kind::Root {
            return Err(Error::structural("the root cannot be added to a set"));
        }
        if c.parent.is_some() {
            return Err(Error::structural("node already belongs to a set"));
        }
        if self.ancestors(parent).any(|a| a == child) || parent == child {
            return Err(Error::structural("a set cannot contain itself"));
        }

        self.attach(parent, child);
        Ok(child)
    }

    /// Adds every node of `children` to `parent`, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first node [`Document::add`] rejects; earlier nodes stay added.
    pub fn extend<I>(&mut self, parent: NodeId, children: I) -> Result<()>
    where
        I: IntoIterator<Item = NodeId>,
    {
        for child in children {
            self.add(parent, child)?;
        }
        Ok(())
    }

    /// Removes `child` from `parent`, keeping the order of the other children.
    ///
    /// Presence is checked by identity. Returns `false` if `child` is not a
    /// child of `parent`. The removed node stays valid and parentless.
    pub fn delete(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.remove_with(parent, child, |children, i| {
            children.remove(i);
        })
    }

    /// Removes `child` from `parent` in O(1) by moving the last child into its
    /// slot. **The order of the remaining children changes.**
    pub fn swap_delete(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.remove_with(parent, child, |children, i| {
            children.swap_remove(i);
        })
    }

    /// Removes `node` from whichever set holds it, preserving sibling order.
    /// Returns `false` for detached nodes.
    pub fn detach(&mut self, node: NodeId) -> bool {
        match self.parent(node) {
            Some(parent) => self.delete(parent, node),
            None => false,
        }
    }

    fn remove_with<F>(&mut self, parent: NodeId, child: NodeId, remove: F) -> bool
    where
        F: FnOnce(&mut Vec<NodeId>, usize),
    {
        let Some(children) = self.nodes.get_mut(parent.0).and_then(Node::children_mut) else {
            return false;
        };
        let Some(i) = children.iter().position(|&c| c == child) else {
            return false;
        };
        remove(children, i);
        self.nodes[child.0].parent = None;
        true
    }

    /// Iterates from the parent of `id` up to the top of its tree.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    // ----- lookup -----

    fn find_where<F>(&self, set: NodeId, key: &str, accept: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.children(set).iter().rev().copied().find(|&id| {
            let node = &self.nodes[id.0];
            node.matches(key) && accept(node)
        })
    }

    fn filter_where<F>(&self, set: NodeId, key: Option<&str>, accept: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.children(set)
            .iter()
            .copied()
            .filter(|&id| {
                let node = &self.nodes[id.0];
                accept(node) && key.map_or(true, |k| node.matches(k))
            })
            .collect()
    }

    /// Most recent child of `set` with `key`, of either kind.
    #[must_use]
    pub fn find_any(&self, set: NodeId, key: &str) -> Option<NodeId> {
        self.find_where(set, key, |_| true)
    }

    /// Like [`Document::find_any`], failing when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no child has `key`.
    pub fn any(&self, set: NodeId, key: &str) -> Result<NodeId> {
        self.find_any(set, key)
            .ok_or_else(|| Error::not_found("child", key))
    }

    /// Most recent set child of `set` with `key`.
    #[must_use]
    pub fn find_dir(&self, set: NodeId, key: &str) -> Option<NodeId> {
        self.find_where(set, key, Node::is_set)
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no set child has `key`.
    pub fn dir(&self, set: NodeId, key: &str) -> Result<NodeId> {
        self.find_dir(set, key)
            .ok_or_else(|| Error::not_found("set", key))
    }

    /// Most recent pair child of `set` with `key`.
    #[must_use]
    pub fn find_pair(&self, set: NodeId, key: &str) -> Option<NodeId> {
        self.find_where(set, key, Node::is_pair)
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no pair child has `key`.
    pub fn pair(&self, set: NodeId, key: &str) -> Result<NodeId> {
        self.find_pair(set, key)
            .ok_or_else(|| Error::not_found("pair", key))
    }

    /// Value of the most recent pair with `key`.
    #[must_use]
    pub fn find_value(&self, set: NodeId, key: &str) -> Option<&Value> {
        self.find_pair(set, key)
            .and_then(|id| self.get_pair(id))
            .map(|pair| &pair.value)
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no pair child has `key`.
    pub fn value(&self, set: NodeId, key: &str) -> Result<&Value> {
        self.find_value(set, key)
            .ok_or_else(|| Error::not_found("pair", key))
    }

    /// Set children matching `key` (all sets when `None`), in insertion order.
    #[must_use]
    pub fn dirs(&self, set: NodeId, key: Option<&str>) -> Vec<NodeId> {
        self.filter_where(set, key, Node::is_set)
    }

    /// Pair children matching `key` (all pairs when `None`), in insertion order.
    #[must_use]
    pub fn pairs(&self, set: NodeId, key: Option<&str>) -> Vec<NodeId> {
        self.filter_where(set, key, Node::is_pair)
    }

    /// Children matching `key` (all children when `None`), in insertion order.
    #[must_use]
    pub fn all(&self, set: NodeId, key: Option<&str>) -> Vec<NodeId> {
        self.filter_where(set, key, |_| true)
    }

    /// Compares the subtree at `a` with the subtree at `b` of `other`.
    #[must_use]
    pub fn subtree_eq(&self, a: NodeId, other: &Document, b: NodeId) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((x, y)) = stack.pop() {
            let (Some(nx), Some(ny)) = (self.get(x), other.get(y)) else {
                return false;
            };
            let same = match (&nx.body, &ny.body) {
                (Body::Root(_), Body::Root(_)) => true,
                (Body::Set { key: kx, .. }, Body::Set { key: ky, .. }) => kx == ky,
                (Body::Pair(px), Body::Pair(py)) => px == py,
                _ => false,
            };
            let (cx, cy) = (nx.children(), ny.children());
            if !same || cx.len() != cy.len() {
                return false;
            }
            stack.extend(cx.iter().copied().zip(cy.iter().copied()));
        }
        true
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(ROOT, other, ROOT)
    }
}

impl Index<NodeId> for Document {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Document {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}
