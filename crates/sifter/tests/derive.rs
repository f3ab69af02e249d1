//! Tests for the `#[derive(Record)]` macro.

use sifter::{Collection, FieldValue, Filter, Key, Mode, Number, Record, Value};

#[derive(Debug, Clone, sifter_macros::Record)]
struct Bookmark {
    name: String,
    #[record(rename = "id")]
    slug: String,
    rating: u8,
    visible: bool,
    tags: Vec<String>,
    owner: Option<String>,
    #[record(skip)]
    #[allow(dead_code)]
    cache: Vec<u8>,
}

fn bookmark(name: &str, slug: &str, rating: u8, tags: &[&str], owner: Option<&str>) -> Bookmark {
    Bookmark {
        name: name.to_string(),
        slug: slug.to_string(),
        rating,
        visible: rating > 0,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        owner: owner.map(String::from),
        cache: vec![1, 2, 3],
    }
}

fn bookmarks() -> Collection<Bookmark> {
    let mut c = Collection::new();
    c.insert("docs", bookmark("Docs", "d", 5, &["rust", "ref"], Some("ana")));
    c.insert("blog", bookmark("Blog", "b", 3, &["rust"], None));
    c.insert("news", bookmark("News", "n", 0, &[], Some("sam")));
    c
}

#[test]
fn field_constants() {
    assert_eq!(Bookmark::NAME, "name");
    assert_eq!(Bookmark::ID, "id");
    assert_eq!(Bookmark::RATING, "rating");
    assert_eq!(Bookmark::TAGS, "tags");
    assert_eq!(Bookmark::OWNER, "owner");
}

#[test]
fn field_access() {
    let b = bookmark("Docs", "d", 5, &["rust"], Some("ana"));

    assert_eq!(b.field("name"), Some(Value::String("Docs")));
    assert_eq!(b.field("id"), Some(Value::String("d")));
    assert_eq!(b.field("rating"), Some(Value::Number(Number::U64(5))));
    assert_eq!(b.field("visible"), Some(Value::Bool(true)));
    assert_eq!(
        b.field("tags"),
        Some(Value::List(vec![Value::String("rust")]))
    );
    assert_eq!(b.field("owner"), Some(Value::String("ana")));
}

#[test]
fn renamed_field_hides_rust_name() {
    let b = bookmark("Docs", "d", 5, &[], None);
    assert!(b.field("slug").is_none());
    assert!(b.has_field("id"));
}

#[test]
fn skipped_field_is_absent() {
    let b = bookmark("Docs", "d", 5, &[], None);
    assert!(b.field("cache").is_none());
}

#[test]
fn none_option_is_absent() {
    let b = bookmark("Blog", "b", 3, &[], None);
    assert!(b.field("owner").is_none());
    assert!(!b.has_field("owner"));
}

#[test]
fn filter_derived_records() {
    let c = bookmarks();

    let rust = Filter::new().any_of(Bookmark::TAGS, ["rust"]).apply(&c);
    assert_eq!(
        rust.keys().cloned().collect::<Vec<_>>(),
        vec![Key::from("docs"), Key::from("blog")]
    );

    // A rating of 5 is equal to the criterion 5 regardless of integer width.
    let top = Filter::new().equals(Bookmark::RATING, 5i64).apply(&c);
    assert_eq!(top.len(), 1);

    // An absent owner never matches, so NONE keeps the record.
    let not_ana = Filter::new()
        .mode(Mode::None)
        .equals(Bookmark::OWNER, "ana")
        .apply(&c);
    assert_eq!(
        not_ana.keys().cloned().collect::<Vec<_>>(),
        vec![Key::from("blog"), Key::from("news")]
    );
}

#[test]
fn pluck_derived_records_by_renamed_key() {
    let c = bookmarks();
    let visible = Filter::new().equals(Bookmark::VISIBLE, true).apply(&c);

    let plucked = sifter::pluck_field(&visible, Bookmark::NAME, Some(Bookmark::ID));
    assert_eq!(plucked.get(&Key::from("d")), Some(&FieldValue::from("Docs")));
    assert_eq!(plucked.get(&Key::from("b")), Some(&FieldValue::from("Blog")));
    assert_eq!(plucked.len(), 2);
}

#[derive(sifter_macros::Record)]
struct Wrapper<T: sifter::AsValue> {
    inner: T,
}

#[test]
fn generic_struct() {
    let w = Wrapper { inner: 7i32 };
    assert_eq!(w.field("inner"), Some(Value::Number(Number::I64(7))));
    assert_eq!(Wrapper::<i32>::INNER, "inner");
}
