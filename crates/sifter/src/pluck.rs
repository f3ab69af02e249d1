//! Single-field projection across a collection.

use tracing::trace;

use crate::collection::{Collection, Key};
use crate::record::Record;
use crate::value::FieldValue;

/// Result of a pluck: key to copied field value.
pub type Plucked = Collection<FieldValue>;

/// Projects one field out of every record.
///
/// Without an index key the output keeps the collection's keys. With one,
/// each record is re-keyed by the value of its index field; a record lacking
/// that field (or holding a list there) is keyed by its ordinal among such
/// records, counted from `0`. Later entries overwrite earlier ones on key
/// collision. Records that lack `field` itself contribute no entry, though
/// they still advance the positional counter.
///
/// Values are copied out, so the result never aliases the source records.
///
/// # Example
///
/// ```
/// use sifter::{Collection, FieldValue, Key, Pluck};
/// use serde_json::json;
///
/// let mut people = Collection::new();
/// people.insert("foo", json!({"name": "foo", "id": "f"}));
/// people.insert("bar", json!({"name": "bar"}));
///
/// let names = Pluck::new("name").index_by("id").apply(&people);
/// assert_eq!(names.get(&Key::from("f")), Some(&FieldValue::from("foo")));
/// assert_eq!(names.get(&Key::Int(0)), Some(&FieldValue::from("bar")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pluck {
    field: String,
    index_key: Option<String>,
}

impl Pluck {
    /// Plucks `field`, keeping the collection's keys.
    pub fn new(field: impl Into<String>) -> Self {
        Pluck {
            field: field.into(),
            index_key: None,
        }
    }

    /// Re-keys the output by the value of `index_key`.
    pub fn index_by(mut self, index_key: impl Into<String>) -> Self {
        self.index_key = Some(index_key.into());
        self
    }

    /// Returns the plucked field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the re-key field name, if set.
    pub fn index_key(&self) -> Option<&str> {
        self.index_key.as_deref()
    }

    /// Runs the projection.
    pub fn apply<R: Record>(&self, collection: &Collection<R>) -> Plucked {
        let mut plucked = Collection::with_capacity(collection.len());

        match self.index_key.as_deref() {
            None => {
                for (key, record) in collection {
                    if let Some(value) = record.field(&self.field) {
                        plucked.insert(key.clone(), value.to_field_value());
                    }
                }
            }
            Some(index_key) => {
                let mut next_position: i64 = 0;
                for (_, record) in collection {
                    let key = match record.field(index_key).as_ref().and_then(Key::from_value) {
                        Some(key) => key,
                        None => {
                            let key = Key::Int(next_position);
                            next_position += 1;
                            key
                        }
                    };
                    if let Some(value) = record.field(&self.field) {
                        plucked.insert(key, value.to_field_value());
                    }
                }
            }
        }

        trace!(
            field = %self.field,
            index_key = ?self.index_key,
            records = collection.len(),
            plucked = plucked.len(),
            "pluck pass complete"
        );
        plucked
    }
}

/// Projects `field_name` out of every record, optionally re-keyed by
/// `index_key`. See [`Pluck`] for the keying rules.
pub fn pluck_field<R: Record>(
    collection: &Collection<R>,
    field_name: &str,
    index_key: Option<&str>,
) -> Plucked {
    let pluck = match index_key {
        Some(index_key) => Pluck::new(field_name).index_by(index_key),
        None => Pluck::new(field_name),
    };
    pluck.apply(collection)
}
