// Read-only access to the untyped payloads delivered by the source site.
//
// Every formatter reads fields through `RawNode::get`, so a missing parent,
// an explicit `null` and a value of the wrong shape all collapse to `None`.

use serde_json::Value;

/// Conversion from a raw JSON value into a typed output field.
pub trait FromRaw: Sized {
    fn from_raw(value: &Value) -> Option<Self>;
}

impl FromRaw for String {
    fn from_raw(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            // ids occasionally arrive as numbers
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl FromRaw for i64 {
    fn from_raw(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromRaw for f64 {
    fn from_raw(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromRaw for bool {
    fn from_raw(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromRaw for Value {
    fn from_raw(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// Borrowed view over one entity of the source payload.
#[derive(Debug, Clone, Copy)]
pub struct RawNode<'a>(&'a Value);

impl<'a> RawNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &'a Value {
        self.0
    }

    /// Walk `path` through nested objects. Absent keys and `null` both yield `None`.
    pub fn path(&self, path: &[&str]) -> Option<RawNode<'a>> {
        let mut current = self.0;
        for key in path {
            current = current.as_object()?.get(*key)?;
        }
        if current.is_null() {
            None
        } else {
            Some(RawNode(current))
        }
    }

    /// Element `index` of an array node.
    pub fn at(&self, index: usize) -> Option<RawNode<'a>> {
        self.0
            .as_array()?
            .get(index)
            .filter(|v| !v.is_null())
            .map(RawNode)
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.path(&[key]).is_some()
    }

    /// Typed read of the field at `path`.
    pub fn get<T: FromRaw>(&self, path: &[&str]) -> Option<T> {
        self.path(path).and_then(|node| T::from_raw(node.0))
    }

    pub fn get_or<T: FromRaw>(&self, path: &[&str], default: T) -> T {
        self.get(path).unwrap_or(default)
    }

    /// The `{ count, edges: [{ node }] }` collection stored under `key`.
    pub fn edges(&self, key: &str) -> Option<EdgeCollection<'a>> {
        let collection = self.path(&[key])?;
        if !collection.0.is_object() {
            return None;
        }
        Some(EdgeCollection::from_node(collection))
    }
}

/// One edge/node list. `count` is reported by the site and is independent of
/// how many edges were actually delivered.
#[derive(Debug, Clone)]
pub struct EdgeCollection<'a> {
    pub count: Option<i64>,
    pub nodes: Vec<RawNode<'a>>,
}

impl<'a> EdgeCollection<'a> {
    fn from_node(collection: RawNode<'a>) -> Self {
        let nodes = collection
            .path(&["edges"])
            .and_then(|edges| edges.0.as_array())
            .map(|edges| {
                edges
                    .iter()
                    .filter_map(|edge| RawNode(edge).path(&["node"]))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            count: collection.get(&["count"]),
            nodes,
        }
    }

    pub fn first(&self) -> Option<RawNode<'a>> {
        self.nodes.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
