//! Sifter - filter and pluck engine for keyed record collections.
//!
//! Sifter selects records out of an insertion-ordered [`Collection`] by
//! field criteria and projects single fields out of them. It supports:
//!
//! - Map-shaped records (`HashMap`, `BTreeMap`, JSON objects) and
//!   object-shaped records (any type implementing [`Record`])
//! - Scalar equality and list-overlap criteria
//! - Three combination modes: ALL, ANY, NONE
//! - Pluck with optional re-keying by another field
//!
//! # Quick Start
//!
//! ```rust
//! use sifter::{Collection, FieldValue, Filter, Key, Mode, Number, Record, Value};
//!
//! struct Task {
//!     name: String,
//!     priority: i64,
//!     tags: Vec<String>,
//! }
//!
//! impl Record for Task {
//!     fn field(&self, name: &str) -> Option<Value<'_>> {
//!         match name {
//!             "name" => Some(Value::String(&self.name)),
//!             "priority" => Some(Value::Number(Number::I64(self.priority))),
//!             "tags" => Some(Value::List(self.tags.iter().map(|t| Value::String(t)).collect())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut tasks = Collection::new();
//! tasks.insert("docs", Task { name: "Write docs".into(), priority: 3, tags: vec!["docs".into()] });
//! tasks.insert("bug", Task { name: "Fix bug".into(), priority: 5, tags: vec!["bug".into()] });
//! tasks.insert("old", Task { name: "Old task".into(), priority: 1, tags: vec![] });
//!
//! let names = Filter::new()
//!     .mode(Mode::Any)
//!     .equals("priority", 5i64)
//!     .any_of("tags", ["docs"])
//!     .pluck(&tasks, "name");
//!
//! assert_eq!(names.len(), 2);
//! assert_eq!(names.get(&Key::from("bug")), Some(&FieldValue::from("Fix bug")));
//! ```
//!
//! # Match Semantics
//!
//! Each criterion yields one boolean per record:
//!
//! - a scalar criterion matches when the field is present and strictly equal
//! - a list criterion matches when the field is a list sharing at least one
//!   element with it
//! - an absent field never matches
//!
//! The booleans then combine by [`Mode`]:
//!
//! ```text
//! All  = every criterion matched      (no criteria: match)
//! Any  = at least one matched          (no criteria: no match)
//! None = no criterion matched          (no criteria: match)
//! ```
//!
//! # Equality
//!
//! | Field | Criterion | Equal when |
//! |-------|-----------|------------|
//! | String | String | byte-identical |
//! | Number | Number | numerically equal, across `I64`/`U64`/`F64` |
//! | Bool | Bool | identical |
//! | anything | different kind | never |

mod collection;
mod criteria;
mod error;
mod filter;
pub mod links;
mod pluck;
mod record;
mod value;

// Re-export public API
pub use collection::{Collection, Key};
pub use criteria::{Criteria, Criterion, Expected, Mode};
pub use error::{LinkError, Result, SifterError};
pub use filter::{filter_pluck, filter_records, Filter};
pub use pluck::{pluck_field, Pluck, Plucked};
pub use record::{AnyRecord, AsValue, Record};
pub use value::{FieldValue, Number, Scalar, Value};

#[cfg(feature = "derive")]
pub use sifter_macros::Record;
