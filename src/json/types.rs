//! JSON value tree.
//!
//! The tree is built once by the parser and then only read. Every container
//! owns its children by value, so releasing a [`Root`] releases the whole
//! tree exactly once.
//!
//! [`Object`] is a fixed-capacity hash table without collision chaining: a
//! key whose bucket is already taken is dropped on insertion. Lookups check
//! the stored key, so a colliding key reads as absent rather than returning
//! another key's property.

use std::fmt;

use tracing::debug;

use super::hasher::hash_key;
use super::path::Path;
use crate::error::JsonResult;

/// A parsed JSON value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// JSON null literal
    #[default]
    Null,
    /// Integer literal
    Integer(i64),
    /// Decimal literal
    Float(f64),
    /// String body, escapes left as written
    String(String),
    /// Ordered list of values
    Array(Array),
    /// Keyed properties
    Object(Object),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is an integer value.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns true if this is a float value.
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true for arrays and objects.
    pub fn is_container(&self) -> bool {
        self.is_array() || self.is_object()
    }

    /// Returns the integer if this is an Integer, None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as `f64` for both Integer and Float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an Array, None otherwise.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a reference to the object if this is an Object, None otherwise.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a property value from an object by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()
            .and_then(|o| o.get(key))
            .map(Property::value)
    }

    /// Get an element from an array by index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Walk a parsed path from this value.
    pub fn lookup(&self, path: &Path) -> Option<&Value> {
        path.resolve(self)
    }

    /// Returns the type name as a string for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// A named value; only ever stored inside an [`Object`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: Value,
}

impl Property {
    /// Create a property from a name and an already built value.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Integer property.
    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, Value::Integer(value))
    }

    /// Float property.
    pub fn float(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, Value::Float(value))
    }

    /// String property.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Value::String(value.into()))
    }

    /// Null property.
    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }

    /// Property taking ownership of an array.
    pub fn array(name: impl Into<String>, value: Array) -> Self {
        Self::new(name, Value::Array(value))
    }

    /// Property taking ownership of an object.
    pub fn object(name: impl Into<String>, value: Object) -> Self {
        Self::new(name, Value::Object(value))
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Split into name and value.
    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }

    /// Take the value, dropping the name.
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Ordered sequence of values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value at the end.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Element at `index`, or None when out of range.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Elements as a slice.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Outcome of [`Object::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The property now occupies its bucket.
    Inserted,
    /// The bucket was already taken (or the table has no buckets); the
    /// property was discarded.
    Dropped,
}

impl Insertion {
    /// Returns true if the property was stored.
    pub fn is_inserted(self) -> bool {
        self == Insertion::Inserted
    }
}

/// Fixed-capacity hash table of properties.
///
/// The bucket count is set once, at twice the expected element count, and
/// never changes. There is no chaining and no rehashing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    buckets: Vec<Option<Property>>,
    len: usize,
}

impl Object {
    /// Create a table sized for `expected` properties (load factor 0.5).
    pub fn with_capacity(expected: usize) -> Self {
        let bucket_count = expected.saturating_mul(2);
        Self {
            buckets: (0..bucket_count).map(|_| None).collect(),
            len: 0,
        }
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no property is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_of(&self, key: &str) -> Option<usize> {
        let count = self.buckets.len() as u64;
        if count == 0 {
            return None;
        }
        // The remainder is below the bucket count, which is a usize.
        Some((hash_key(key) % count) as usize)
    }

    /// Store `property` under `key`. An occupied bucket is left untouched
    /// and the new property is dropped.
    pub fn set(&mut self, key: &str, property: Property) -> Insertion {
        let Some(slot) = self.bucket_of(key).and_then(|i| self.buckets.get_mut(i)) else {
            debug!(key, "object has no buckets, property dropped");
            return Insertion::Dropped;
        };

        if let Some(existing) = slot.as_ref() {
            debug!(
                key,
                occupant = existing.name(),
                "bucket already occupied, property dropped"
            );
            return Insertion::Dropped;
        }

        *slot = Some(property);
        self.len += 1;
        Insertion::Inserted
    }

    /// Store a property under its own name.
    pub fn insert(&mut self, property: Property) -> Insertion {
        let key = property.name.clone();
        self.set(&key, property)
    }

    /// Property stored under `key`. A bucket occupied by a different key
    /// reads as absent.
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.bucket_of(key)
            .and_then(|i| self.buckets.get(i))
            .and_then(Option::as_ref)
            .filter(|p| p.name() == key)
    }

    /// Returns true if a property is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over stored properties in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.buckets.iter().filter_map(Option::as_ref)
    }

    /// Names of stored properties in bucket order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(Property::name)
    }
}

/// Owner of a parsed document's top-level value.
///
/// Only the parser creates a `Root`. Releasing it (by [`Root::destroy`] or
/// by dropping it) releases every array, object, property and string in the
/// tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    value: Value,
}

impl Root {
    pub(crate) fn new(value: Value) -> Self {
        Self { value }
    }

    /// The top-level value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take the top-level value out of the root.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Parse `path` and walk it from the top-level value.
    ///
    /// Returns `Ok(None)` when the path is well formed but addresses nothing.
    pub fn lookup(&self, path: &str) -> JsonResult<Option<&Value>> {
        let path = Path::parse(path)?;
        Ok(path.resolve(&self.value))
    }

    /// Release the tree. Consumes the root, so it can be called only once.
    pub fn destroy(self) {
        debug!(root = self.value.type_name(), "releasing document tree");
        drop(self);
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Array(a) => write!(f, "array ({} elements)", a.len()),
            Value::Object(o) => write!(
                f,
                "object ({} properties, {} buckets)",
                o.len(),
                o.bucket_count()
            ),
            other => f.write_str(other.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two keys that land in the same bucket of a 4-bucket table.
    fn colliding_pair() -> (&'static str, &'static str) {
        // hash("a") = 97, hash("e") = 101; 97 % 4 == 1 == 101 % 4
        ("a", "e")
    }

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert!(Value::Integer(42).is_integer());
        assert!(Value::Float(1.5).is_float());
        assert!(Value::from("x").is_string());
        assert!(Value::Array(Array::new()).is_array());
        assert!(Value::Object(Object::with_capacity(1)).is_object());
        assert!(Value::Object(Object::default()).is_container());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(42).as_i64(), Some(42));
        assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from("test").as_str(), Some("test"));
        assert_eq!(Value::Null.as_i64(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Integer(0).type_name(), "integer");
        assert_eq!(Value::Float(0.0).type_name(), "float");
        assert_eq!(Value::String(String::new()).type_name(), "string");
        assert_eq!(Value::Array(Array::new()).type_name(), "array");
        assert_eq!(Value::Object(Object::default()).type_name(), "object");
    }

    #[test]
    fn test_array_preserves_order_and_duplicates() {
        let mut array = Array::new();
        array.push(1i64);
        array.push(1i64);
        array.push("two");
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(0), Some(&Value::Integer(1)));
        assert_eq!(array.get(1), Some(&Value::Integer(1)));
        assert_eq!(array.get(2), Some(&Value::from("two")));
        assert_eq!(array.get(3), None);
    }

    #[test]
    fn test_object_sizing() {
        assert_eq!(Object::with_capacity(3).bucket_count(), 6);
        assert_eq!(Object::with_capacity(0).bucket_count(), 0);
    }

    #[test]
    fn test_object_set_and_get() {
        let mut object = Object::with_capacity(2);
        assert_eq!(object.set("a", Property::int("a", 1)), Insertion::Inserted);
        assert_eq!(object.insert(Property::string("b", "x")), Insertion::Inserted);
        assert_eq!(object.len(), 2);
        assert_eq!(object.get("a").map(Property::value), Some(&Value::Integer(1)));
        assert_eq!(object.get("b").and_then(|p| p.value().as_str()), Some("x"));
        assert!(object.get("c").is_none());
    }

    #[test]
    fn test_collision_keeps_first() {
        let (first, second) = colliding_pair();
        let mut object = Object::with_capacity(2);
        assert_eq!(object.bucket_count(), 4);

        assert!(object.set(first, Property::int(first, 1)).is_inserted());
        assert_eq!(
            object.set(second, Property::int(second, 2)),
            Insertion::Dropped
        );

        assert_eq!(object.len(), 1);
        assert_eq!(object.get(first).map(Property::value), Some(&Value::Integer(1)));
        // The occupant's key does not match, so the second key reads absent.
        assert!(object.get(second).is_none());
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let mut object = Object::with_capacity(2);
        object.set("k", Property::int("k", 1));
        assert_eq!(object.set("k", Property::int("k", 2)), Insertion::Dropped);
        assert_eq!(object.get("k").and_then(|p| p.value().as_i64()), Some(1));
    }

    #[test]
    fn test_zero_capacity_object() {
        let mut object = Object::with_capacity(0);
        assert_eq!(object.set("a", Property::null("a")), Insertion::Dropped);
        assert!(object.get("a").is_none());
        assert!(object.is_empty());
    }

    #[test]
    fn test_property_constructors() {
        let p = Property::array("xs", [1i64, 2].into_iter().collect());
        assert_eq!(p.name(), "xs");
        assert_eq!(p.value().as_array().map(Array::len), Some(2));

        let p = Property::object("o", Object::with_capacity(1));
        assert!(p.value().is_object());

        let (name, value) = Property::float("f", 0.5).into_parts();
        assert_eq!(name, "f");
        assert_eq!(value, Value::Float(0.5));
        assert!(Property::null("n").into_value().is_null());
    }

    #[test]
    fn test_root_display_and_destroy() {
        let mut object = Object::with_capacity(1);
        object.insert(Property::int("a", 1));
        let root = Root::new(Value::Object(object));
        assert_eq!(root.to_string(), "object (1 properties, 2 buckets)");
        root.destroy();

        let root = Root::new(Value::Array([1i64, 2, 3].into_iter().collect()));
        assert_eq!(root.to_string(), "array (3 elements)");
        assert_eq!(root.into_value().as_array().map(Array::len), Some(3));
    }
}
