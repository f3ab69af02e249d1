//! Insertion-ordered keyed collections.
//!
//! A [`Collection`] maps unique [`Key`]s to values and iterates in insertion
//! order. Filter output keeps the input keys; pluck output is a
//! `Collection<FieldValue>` keyed by the original keys or by re-key values.

use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::{Number, Value};

/// Identity of an entry within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(String),
}

impl Key {
    /// Converts a field value into a key.
    ///
    /// Strings become string keys unless they are canonical decimal integers,
    /// which become integer keys. Integers become integer keys, booleans map
    /// to `0`/`1` and floats truncate toward zero. Lists and numbers outside
    /// the `i64` range cannot be keys.
    pub fn from_value(value: &Value<'_>) -> Option<Key> {
        match value {
            Value::String(s) => Some(Key::from(*s)),
            Value::Number(n) => n.to_i64().map(Key::Int),
            Value::Bool(b) => Some(Key::Int(i64::from(*b))),
            Value::List(_) => None,
        }
    }

    /// Returns the string key, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            Key::Int(_) => None,
        }
    }

    /// Returns the integer key, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => f.write_str(s),
        }
    }
}

/// Parses `s` as an integer key when it is the canonical decimal form.
///
/// `"7"` and `"-3"` qualify; `"007"`, `"+7"` and `"-0"` do not.
fn canonical_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|i| i.to_string() == s)
}

/// Canonical decimal strings become [`Key::Int`], so `"0"` and `0` name the
/// same entry.
impl From<&str> for Key {
    fn from(s: &str) -> Self {
        canonical_int(s).map_or_else(|| Key::Str(s.to_string()), Key::Int)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        match canonical_int(&s) {
            Some(i) => Key::Int(i),
            None => Key::Str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i64::from(i))
    }
}

impl From<u32> for Key {
    fn from(i: u32) -> Self {
        Key::Int(i64::from(i))
    }
}

impl From<Number> for Key {
    fn from(n: Number) -> Self {
        n.to_i64()
            .map(Key::Int)
            .unwrap_or_else(|| Key::Str(n.to_string()))
    }
}

/// Insertion-ordered map from [`Key`] to `V`.
///
/// Keys are unique. Inserting an existing key replaces its value and keeps
/// the entry at its original position.
///
/// ```
/// use sifter::{Collection, Key};
///
/// let mut c = Collection::new();
/// c.insert("foo", 1);
/// c.insert(0, 2);
/// c.insert("foo", 3);
///
/// let entries: Vec<_> = c.iter().map(|(k, v)| (k.clone(), *v)).collect();
/// assert_eq!(entries, vec![(Key::from("foo"), 3), (Key::Int(0), 2)]);
/// ```
#[derive(Clone, PartialEq)]
pub struct Collection<V> {
    entries: Vec<(Key, V)>,
    index: HashMap<Key, usize>,
}

impl<V> Collection<V> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Collection {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates an empty collection with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Collection {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Builds a collection keyed by position (`0`, `1`, ...).
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::Int(i as i64), v))
            .collect()
    }

    /// Inserts an entry, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<Key>, value: V) -> Option<V> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &Key) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Returns the value for a key, mutably.
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&pos) => Some(&mut self.entries[pos].1),
            None => None,
        }
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Returns a collection of references with the same keys and order.
    pub fn as_refs(&self) -> Collection<&V> {
        self.iter().map(|(k, v)| (k.clone(), v)).collect()
    }
}

impl<V> Default for Collection<V> {
    fn default() -> Self {
        Collection::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Collection<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<Key>, V> FromIterator<(K, V)> for Collection<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut collection = Collection::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            collection.insert(k, v);
        }
        collection
    }
}

impl<K: Into<Key>, V> Extend<(K, V)> for Collection<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V> IntoIterator for Collection<V> {
    type Item = (Key, V);
    type IntoIter = std::vec::IntoIter<(Key, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

type EntryRef<'a, V> = fn(&'a (Key, V)) -> (&'a Key, &'a V);

impl<'a, V> IntoIterator for &'a Collection<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (Key, V)>, EntryRef<'a, V>>;

    fn into_iter(self) -> Self::IntoIter {
        fn split<K, V>(entry: &(K, V)) -> (&K, &V) {
            (&entry.0, &entry.1)
        }
        self.entries.iter().map(split as EntryRef<'a, V>)
    }
}

/// Serializes as a JSON-style object; integer keys become their decimal text.
impl<V: Serialize> Serialize for Collection<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(&k.to_string(), v)?;
        }
        map.end()
    }
}

/// Deserializes from an object, keeping document order.
///
/// Object keys go through `Key::from`, so canonical integers come back as
/// [`Key::Int`], matching how [`Serialize`] writes them.
impl<'de, V: Deserialize<'de>> Deserialize<'de> for Collection<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CollectionVisitor<V>(std::marker::PhantomData<V>);

        impl<'de, V: Deserialize<'de>> serde::de::Visitor<'de> for CollectionVisitor<V> {
            type Value = Collection<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of records")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                let mut collection = Collection::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, V>()? {
                    collection.insert(Key::from(k), v);
                }
                Ok(collection)
            }
        }

        deserializer.deserialize_map(CollectionVisitor(std::marker::PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order() {
        let mut c = Collection::new();
        c.insert("b", 1);
        c.insert("a", 2);
        c.insert(7, 3);
        let keys: Vec<_> = c.keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("b"), Key::from("a"), Key::Int(7)]);
    }

    #[test]
    fn overwrite_keeps_first_position() {
        let mut c = Collection::new();
        c.insert("x", 1);
        c.insert("y", 2);
        assert_eq!(c.insert("x", 3), Some(1));
        assert_eq!(c.len(), 2);
        let values: Vec<_> = c.values().copied().collect();
        assert_eq!(values, vec![3, 2]);
    }

    #[test]
    fn numeric_string_and_int_name_the_same_key() {
        let mut c = Collection::new();
        c.insert("0", "str");
        c.insert(0, "int");
        assert_eq!(c.len(), 1);
        assert_eq!(c.get(&Key::Int(0)), Some(&"int"));
        assert_eq!(c.get(&Key::from("0")), Some(&"int"));
    }

    #[test]
    fn non_canonical_numeric_strings_stay_strings() {
        assert_eq!(Key::from("007"), Key::Str("007".to_string()));
        assert_eq!(Key::from("-0"), Key::Str("-0".to_string()));
        assert_eq!(Key::from("+7"), Key::Str("+7".to_string()));
        assert_eq!(Key::from("-3".to_string()), Key::Int(-3));
        assert_eq!(Key::from_value(&Value::String("12")), Some(Key::Int(12)));
    }

    #[test]
    fn serialized_keys_never_repeat() {
        let mut c = Collection::new();
        c.insert("0", 1);
        c.insert(0, 2);
        let text = serde_json::to_string(&c).unwrap();
        assert_eq!(text, r#"{"0":2}"#);

        let back: Collection<i32> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn from_values_is_positional() {
        let c = Collection::from_values(["a", "b"]);
        assert_eq!(c.get(&Key::Int(1)), Some(&"b"));
    }

    #[test]
    fn key_from_value() {
        assert_eq!(Key::from_value(&Value::String("f")), Some(Key::from("f")));
        assert_eq!(
            Key::from_value(&Value::Number(Number::F64(2.7))),
            Some(Key::Int(2))
        );
        assert_eq!(Key::from_value(&Value::Bool(true)), Some(Key::Int(1)));
        assert_eq!(Key::from_value(&Value::List(vec![])), None);
    }

    #[test]
    fn json_round_trip_keeps_order_and_key_kinds() {
        let mut c = Collection::new();
        c.insert("f", 1);
        c.insert(0, 2);
        c.insert("z", 3);

        let text = serde_json::to_string(&c).unwrap();
        assert_eq!(text, r#"{"f":1,"0":2,"z":3}"#);

        let back: Collection<i32> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn leading_zero_stays_string() {
        let c: Collection<i32> = serde_json::from_str(r#"{"007":1}"#).unwrap();
        assert_eq!(c.get(&Key::from("007")), Some(&1));
    }
}
