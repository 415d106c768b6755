//! Plain-object projection of VDF text.
//!
//! [`json`](crate::json) skips the tree entirely and folds scanner events into a
//! [`JsonMap`], an insertion-ordered object much like what a JSON decoder
//! produces. Blocks become nested objects and pairs become fields. A repeated
//! key overwrites the earlier entry but keeps its original position.
//!
//! Pairs tagged with a query are dropped when that query is mapped to `false`
//! in the environment passed to [`json`](crate::json); unknown queries are kept.
//!
//! ```rust
//! use std::collections::HashMap;
//! use vdf_tree::{json, JsonValue};
//!
//! let env = HashMap::from([("$XBOX".to_string(), false)]);
//! let map = json("a { b 1 c 2 [$XBOX] } a { d yes }", &env).unwrap();
//!
//! let a = map.get("a").and_then(JsonValue::as_object).unwrap();
//! assert_eq!(a.len(), 1);
//! assert_eq!(a.get("d").and_then(JsonValue::as_value).and_then(|v| v.as_str()), Some("yes"));
//! ```

use crate::de::Visitor;
use crate::{Error, Result, Value};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// A field of a [`JsonMap`]: either a scalar or a nested object.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Value(Value),
    Object(JsonMap),
}

impl JsonValue {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            JsonValue::Value(v) => Some(v),
            JsonValue::Object(_) => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&JsonMap> {
        match self {
            JsonValue::Object(map) => Some(map),
            JsonValue::Value(_) => None,
        }
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        JsonValue::Value(value)
    }
}

impl From<JsonMap> for JsonValue {
    fn from(map: JsonMap) -> Self {
        JsonValue::Object(map)
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            JsonValue::Value(v) => v.serialize(serializer),
            JsonValue::Object(map) => map.serialize(serializer),
        }
    }
}

/// An ordered map of string keys to [`JsonValue`]s.
///
/// A thin wrapper around [`IndexMap`] so iteration and serialization follow
/// the order keys first appeared in the source text.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::{JsonMap, JsonValue, Value};
///
/// let mut map = JsonMap::new();
/// map.insert("first".to_string(), JsonValue::from(Value::from(1)));
/// map.insert("second".to_string(), JsonValue::from(Value::from(2)));
/// map.insert("first".to_string(), JsonValue::from(Value::from(3)));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonMap(IndexMap<String, JsonValue>);

impl JsonMap {
    #[must_use]
    pub fn new() -> Self {
        JsonMap(IndexMap::new())
    }

    /// Inserts a field, returning the value it replaced. A replaced key keeps
    /// its position.
    pub fn insert(&mut self, key: String, value: JsonValue) -> Option<JsonValue> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, JsonValue> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, JsonValue> {
        self.0.iter()
    }
}

impl IntoIterator for JsonMap {
    type Item = (String, JsonValue);
    type IntoIter = indexmap::map::IntoIter<String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, JsonValue)> for JsonMap {
    fn from_iter<T: IntoIterator<Item = (String, JsonValue)>>(iter: T) -> Self {
        JsonMap(IndexMap::from_iter(iter))
    }
}

impl Serialize for JsonMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Scanner consumer that folds events into a [`JsonMap`].
pub struct JsonBuilder<'e> {
    env: &'e HashMap<String, bool>,
    current: JsonMap,
    // Enclosing objects with the key the current one will be stored under.
    stack: Vec<(String, JsonMap)>,
}

impl<'e> JsonBuilder<'e> {
    #[must_use]
    pub fn new(env: &'e HashMap<String, bool>) -> Self {
        JsonBuilder {
            env,
            current: JsonMap::new(),
            stack: Vec::new(),
        }
    }

    #[must_use]
    pub fn finish(self) -> JsonMap {
        self.current
    }
}

impl Visitor for JsonBuilder<'_> {
    fn on_enter(&mut self, key: String) -> Result<()> {
        let parent = std::mem::take(&mut self.current);
        self.stack.push((key, parent));
        Ok(())
    }

    fn on_exit(&mut self) -> Result<()> {
        let (key, mut parent) = self
            .stack
            .pop()
            .ok_or_else(|| Error::structural("attempted to exit past root keyvalue"))?;
        let child = std::mem::replace(&mut self.current, JsonMap::new());
        parent.insert(key, JsonValue::Object(child));
        self.current = parent;
        Ok(())
    }

    fn on_key(&mut self, key: String, value: Value, query: Option<String>) -> Result<()> {
        if let Some(query) = &query {
            if self.env.get(query) == Some(&false) {
                return Ok(());
            }
        }
        self.current.insert(key, JsonValue::Value(value));
        Ok(())
    }
}
