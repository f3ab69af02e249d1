//! Proc macros for Sifter.
//!
//! - [`Record`] - Generate the field accessor for object-shaped records

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for a struct with named fields.
///
/// Every field is readable by its name unless marked `#[record(skip)]`.
/// Field types must implement `sifter::AsValue`; `Option` fields read as
/// absent when `None`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from the record |
/// | `rename = "..."` | Use a custom name for criteria and pluck |
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Bookmark::NAME`, `Bookmark::ID`)
/// 2. Implementation of `Record::field()`
///
/// # Example
///
/// ```ignore
/// use sifter::{Collection, Filter, Record};
///
/// #[derive(Record)]
/// struct Bookmark {
///     name: String,
///     #[record(rename = "id")]
///     slug: String,
///     tags: Vec<String>,
///     owner: Option<String>,
///     #[record(skip)]
///     cache: Vec<u8>,
/// }
///
/// let mut bookmarks = Collection::new();
/// bookmarks.insert("a", Bookmark {
///     name: "Docs".into(),
///     slug: "d".into(),
///     tags: vec!["rust".into()],
///     owner: None,
///     cache: vec![],
/// });
///
/// let names = Filter::new()
///     .any_of(Bookmark::TAGS, ["rust"])
///     .pluck(&bookmarks, Bookmark::NAME);
/// assert_eq!(names.len(), 1);
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
