//! Field access for map-shaped and object-shaped records.
//!
//! The engine reads every record through [`Record::field`]. Map-shaped
//! records (`HashMap`, `BTreeMap`, JSON objects) implement it by key lookup;
//! object-shaped records implement it by matching on the field name, either
//! by hand or with `#[derive(Record)]` from `sifter-macros`.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use crate::value::{FieldValue, Number, Value};

/// A record whose fields can be read by name.
///
/// Returning `None` means the field is absent. That is never an error: the
/// filter treats it as a non-matching criterion and pluck skips it or falls
/// back to a positional key.
///
/// # Manual Implementation
///
/// ```
/// use sifter::{Number, Record, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
///     owner: Option<String>,
/// }
///
/// impl Record for Task {
///     fn field(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "name" => Some(Value::String(&self.name)),
///             "priority" => Some(Value::Number(Number::from(self.priority))),
///             "owner" => self.owner.as_deref().map(Value::String),
///             _ => None,
///         }
///     }
/// }
///
/// let task = Task { name: "Fix bug".into(), priority: 5, owner: None };
/// assert_eq!(task.field("name"), Some(Value::String("Fix bug")));
/// assert_eq!(task.field("owner"), None);
/// ```
pub trait Record {
    /// Reads a field by name, or `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<Value<'_>>;

    /// Returns `true` if the field is present.
    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Rc<R> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Arc<R> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }
}

impl Record for HashMap<String, FieldValue> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).map(FieldValue::as_value)
    }
}

impl Record for BTreeMap<String, FieldValue> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).map(FieldValue::as_value)
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).and_then(json_value)
    }
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.as_object().and_then(|map| map.field(name))
    }
}

/// Converts a JSON value into a field view.
///
/// `null` and nested objects have no field representation and read as absent.
/// Inside arrays they are dropped.
fn json_value(value: &serde_json::Value) -> Option<Value<'_>> {
    use serde_json::Value as Json;

    match value {
        Json::Bool(b) => Some(Value::Bool(*b)),
        Json::String(s) => Some(Value::String(s)),
        Json::Number(n) => json_number(n).map(Value::Number),
        Json::Array(items) => Some(Value::List(items.iter().filter_map(json_value).collect())),
        Json::Null | Json::Object(_) => None,
    }
}

fn json_number(n: &serde_json::Number) -> Option<Number> {
    if let Some(i) = n.as_i64() {
        Some(Number::I64(i))
    } else if let Some(u) = n.as_u64() {
        Some(Number::U64(u))
    } else {
        n.as_f64().map(Number::F64)
    }
}

/// A record that is either map-shaped or object-shaped.
///
/// Use this when one collection mixes both representations.
///
/// ```
/// use std::collections::BTreeMap;
/// use sifter::{AnyRecord, FieldValue, Record, Value};
///
/// let mut map = BTreeMap::new();
/// map.insert("name".to_string(), FieldValue::from("foo"));
///
/// let record = AnyRecord::Map(map);
/// assert_eq!(record.field("name"), Some(Value::String("foo")));
/// ```
pub enum AnyRecord {
    /// Key/value record.
    Map(BTreeMap<String, FieldValue>),
    /// Record exposing named attributes.
    Object(Box<dyn Record>),
}

impl AnyRecord {
    /// Wraps an object-shaped record.
    pub fn object<R: Record + 'static>(record: R) -> Self {
        AnyRecord::Object(Box::new(record))
    }
}

impl Record for AnyRecord {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        match self {
            AnyRecord::Map(map) => map.field(name),
            AnyRecord::Object(object) => object.field(name),
        }
    }
}

impl std::fmt::Debug for AnyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnyRecord::Map(map) => f.debug_tuple("Map").field(map).finish(),
            AnyRecord::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// Conversion from a struct field to a [`Value`].
///
/// Used by `#[derive(Record)]`. `Option<T>` reads as absent when `None`.
pub trait AsValue {
    /// Returns the field view, or `None` when the field should read as absent.
    fn as_value(&self) -> Option<Value<'_>>;
}

impl AsValue for String {
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::String(self))
    }
}

impl AsValue for str {
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::String(self))
    }
}

impl AsValue for &str {
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::String(self))
    }
}

impl AsValue for bool {
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::Bool(*self))
    }
}

impl AsValue for Number {
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::Number(*self))
    }
}

impl AsValue for FieldValue {
    fn as_value(&self) -> Option<Value<'_>> {
        Some(FieldValue::as_value(self))
    }
}

macro_rules! impl_as_value_number {
    ($($ty:ty),*) => {
        $(
            impl AsValue for $ty {
                fn as_value(&self) -> Option<Value<'_>> {
                    Some(Value::Number(Number::from(*self)))
                }
            }
        )*
    };
}

impl_as_value_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Option<Value<'_>> {
        self.as_ref().and_then(AsValue::as_value)
    }
}

impl<T: AsValue> AsValue for [T] {
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::List(self.iter().filter_map(AsValue::as_value).collect()))
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(&self) -> Option<Value<'_>> {
        self.as_slice().as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Box<T> {
    fn as_value(&self) -> Option<Value<'_>> {
        (**self).as_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct TestItem {
        name: String,
        count: i32,
        tags: Vec<String>,
        owner: Option<String>,
    }

    impl Record for TestItem {
        fn field(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "name" => self.name.as_value(),
                "count" => self.count.as_value(),
                "tags" => self.tags.as_value(),
                "owner" => self.owner.as_value(),
                _ => None,
            }
        }
    }

    fn item() -> TestItem {
        TestItem {
            name: "test".to_string(),
            count: 42,
            tags: vec!["red".to_string()],
            owner: None,
        }
    }

    #[test]
    fn object_shaped_fields() {
        let item = item();
        assert_eq!(item.field("name"), Some(Value::String("test")));
        assert_eq!(item.field("count"), Some(Value::Number(Number::I64(42))));
        assert_eq!(
            item.field("tags"),
            Some(Value::List(vec![Value::String("red")]))
        );
        assert_eq!(item.field("owner"), None);
        assert_eq!(item.field("unknown"), None);
        assert!(item.has_field("name"));
        assert!(!item.has_field("owner"));
    }

    #[test]
    fn map_shaped_fields() {
        let mut map = HashMap::new();
        map.insert("name".to_string(), FieldValue::from("test"));
        map.insert("count".to_string(), FieldValue::from(42i64));

        assert_eq!(map.field("name"), Some(Value::String("test")));
        assert_eq!(map.field("count"), Some(Value::Number(Number::I64(42))));
        assert_eq!(map.field("unknown"), None);
    }

    #[test]
    fn json_object_fields() {
        let doc = json!({
            "name": "foo",
            "id": 7,
            "ratio": 0.5,
            "flags": [true, null, "x"],
            "gone": null,
            "nested": {"a": 1},
        });

        assert_eq!(doc.field("name"), Some(Value::String("foo")));
        assert_eq!(doc.field("id"), Some(Value::Number(Number::I64(7))));
        assert_eq!(doc.field("ratio"), Some(Value::Number(Number::F64(0.5))));
        assert_eq!(
            doc.field("flags"),
            Some(Value::List(vec![Value::Bool(true), Value::String("x")]))
        );
        assert_eq!(doc.field("gone"), None);
        assert_eq!(doc.field("nested"), None);
        assert_eq!(json!([1, 2]).field("0"), None);
    }

    #[test]
    fn references_and_boxes_forward() {
        let record = item();
        let by_ref: &TestItem = &record;
        assert_eq!(by_ref.field("name"), Some(Value::String("test")));

        let boxed: Box<dyn Record> = Box::new(record);
        assert_eq!(boxed.field("count"), Some(Value::Number(Number::I64(42))));

        let shared = Rc::new(item());
        assert_eq!(shared.field("name"), Some(Value::String("test")));
    }

    #[test]
    fn any_record_reads_both_shapes() {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), FieldValue::from("test"));

        let mixed = [AnyRecord::Map(map), AnyRecord::object(item())];
        for record in &mixed {
            assert_eq!(record.field("name"), Some(Value::String("test")));
        }
    }
}
