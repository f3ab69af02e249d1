//! Filter builder and executor.
//!
//! The [`Filter`] struct provides a fluent builder API for constructing
//! criteria and methods for running them against collections.

use tracing::trace;

use crate::collection::{Collection, Key};
use crate::criteria::{Criteria, Criterion, Mode};
use crate::pluck::{Pluck, Plucked};
use crate::record::Record;
use crate::value::Scalar;

/// A set of criteria combined under one [`Mode`].
///
/// # Example
///
/// ```
/// use sifter::{Collection, Filter, Key, Mode};
/// use serde_json::json;
///
/// let mut tasks = Collection::new();
/// tasks.insert("a", json!({"name": "Write docs", "done": false, "tags": ["docs"]}));
/// tasks.insert("b", json!({"name": "Fix bug", "done": true, "tags": ["bug"]}));
///
/// let open = Filter::new()
///     .mode(Mode::All)
///     .equals("done", false)
///     .apply(&tasks);
/// assert_eq!(open.keys().collect::<Vec<_>>(), vec![&Key::from("a")]);
///
/// let names = Filter::new()
///     .mode(Mode::Any)
///     .any_of("tags", ["bug", "perf"])
///     .pluck(&tasks, "name");
/// assert_eq!(names.get(&Key::from("b")).and_then(|v| v.as_str()), Some("Fix bug"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    criteria: Criteria,
    mode: Mode,
}

impl Filter {
    /// Creates an empty `All` filter, which matches every record.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Creates a filter from prepared criteria.
    pub fn from_criteria(criteria: Criteria, mode: Mode) -> Self {
        Filter { criteria, mode }
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Sets the combination mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds an equality criterion.
    pub fn equals(mut self, field: &str, value: impl Scalar) -> Self {
        self.criteria = self.criteria.equals(field, value);
        self
    }

    /// Adds an overlap criterion.
    pub fn any_of<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Scalar,
    {
        self.criteria = self.criteria.any_of(field, values);
        self
    }

    /// Adds a prepared criterion.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criteria.insert(criterion);
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the criteria.
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Returns the combination mode.
    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    /// Returns `true` if this filter has no criteria.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests a single record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.mode.combine(
            self.criteria
                .iter()
                .map(|criterion| criterion.matches(record.field(&criterion.field).as_ref())),
        )
    }

    /// Returns the matching records under their original keys, in order.
    pub fn apply<'a, R: Record>(&self, collection: &'a Collection<R>) -> Collection<&'a R> {
        let matched: Collection<&'a R> = collection
            .iter()
            .filter(|(_, record)| self.matches(*record))
            .map(|(key, record)| (key.clone(), record))
            .collect();

        trace!(
            mode = %self.mode,
            criteria = self.criteria.len(),
            records = collection.len(),
            matched = matched.len(),
            "filter pass complete"
        );
        matched
    }

    /// Filters, then plucks `field` from the matches under their original keys.
    pub fn pluck<R: Record>(&self, collection: &Collection<R>, field: &str) -> Plucked {
        Pluck::new(field).apply(&self.apply(collection))
    }

    /// Counts the matching records.
    pub fn count<R: Record>(&self, collection: &Collection<R>) -> usize {
        collection.values().filter(|record| self.matches(*record)).count()
    }

    /// Returns `true` if any record matches.
    pub fn any<R: Record>(&self, collection: &Collection<R>) -> bool {
        collection.values().any(|record| self.matches(record))
    }

    /// Finds the first matching record and its key.
    pub fn find<'a, R: Record>(&self, collection: &'a Collection<R>) -> Option<(&'a Key, &'a R)> {
        collection.iter().find(|(_, record)| self.matches(*record))
    }
}

/// Returns the records of `collection` that satisfy `criteria` under `mode`.
///
/// Keys and relative order are preserved; the input is not modified.
pub fn filter_records<'a, R: Record>(
    collection: &'a Collection<R>,
    criteria: &Criteria,
    mode: Mode,
) -> Collection<&'a R> {
    Filter::from_criteria(criteria.clone(), mode).apply(collection)
}

/// Filters like [`filter_records`], then plucks `extract_field` from the
/// matches, keyed by their original keys.
pub fn filter_pluck<R: Record>(
    collection: &Collection<R>,
    criteria: &Criteria,
    mode: Mode,
    extract_field: &str,
) -> Plucked {
    Filter::from_criteria(criteria.clone(), mode).pluck(collection, extract_field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldValue, Number, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Task {
        name: String,
        priority: i64,
        archived: bool,
        labels: Vec<String>,
        owner: Option<String>,
    }

    impl Record for Task {
        fn field(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "name" => Some(Value::String(&self.name)),
                "priority" => Some(Value::Number(Number::I64(self.priority))),
                "archived" => Some(Value::Bool(self.archived)),
                "labels" => Some(Value::List(
                    self.labels.iter().map(|l| Value::String(l)).collect(),
                )),
                "owner" => self.owner.as_deref().map(Value::String),
                _ => None,
            }
        }
    }

    fn task(name: &str, priority: i64, archived: bool, labels: &[&str]) -> Task {
        Task {
            name: name.to_string(),
            priority,
            archived,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            owner: None,
        }
    }

    fn sample_tasks() -> Collection<Task> {
        let mut c = Collection::new();
        c.insert("a", task("Task A", 1, false, &["docs"]));
        c.insert("b", task("Task B", 2, false, &["bug"]));
        c.insert("u", task("Urgent Task", 5, false, &["bug", "urgent"]));
        c.insert("c", task("Critical Task", 5, true, &["urgent"]));
        c.insert("d", task("Done Task", 3, true, &[]));
        c
    }

    fn keys<V>(c: &Collection<V>) -> Vec<String> {
        c.keys().map(|k| k.to_string()).collect()
    }

    #[test]
    fn empty_all_matches_everything() {
        let tasks = sample_tasks();
        let results = Filter::new().apply(&tasks);
        assert_eq!(keys(&results), vec!["a", "b", "u", "c", "d"]);
    }

    #[test]
    fn empty_any_matches_nothing() {
        let tasks = sample_tasks();
        assert!(Filter::new().mode(Mode::Any).apply(&tasks).is_empty());
    }

    #[test]
    fn empty_none_matches_everything() {
        let tasks = sample_tasks();
        assert_eq!(Filter::new().mode(Mode::None).apply(&tasks).len(), 5);
    }

    #[test]
    fn all_mode() {
        let tasks = sample_tasks();
        let results = Filter::new()
            .equals("priority", 5i64)
            .equals("archived", false)
            .apply(&tasks);
        assert_eq!(keys(&results), vec!["u"]);
    }

    #[test]
    fn any_mode() {
        let tasks = sample_tasks();
        let results = Filter::new()
            .mode(Mode::Any)
            .equals("priority", 1i64)
            .equals("archived", true)
            .apply(&tasks);
        assert_eq!(keys(&results), vec!["a", "c", "d"]);
    }

    #[test]
    fn none_mode() {
        let tasks = sample_tasks();
        let results = Filter::new()
            .mode(Mode::None)
            .equals("archived", true)
            .any_of("labels", ["bug"])
            .apply(&tasks);
        assert_eq!(keys(&results), vec!["a"]);
    }

    #[test]
    fn overlap_criterion() {
        let tasks = sample_tasks();
        let results = Filter::new().any_of("labels", ["urgent", "docs"]).apply(&tasks);
        assert_eq!(keys(&results), vec!["a", "u", "c"]);
    }

    #[test]
    fn absent_field_never_matches() {
        let tasks = sample_tasks();
        assert!(Filter::new().equals("owner", "me").apply(&tasks).is_empty());

        // Under NONE an absent field counts as "did not match", so records pass.
        let none = Filter::new().mode(Mode::None).equals("owner", "me");
        assert_eq!(none.count(&tasks), 5);
    }

    #[test]
    fn numeric_equality_across_variants() {
        let tasks = sample_tasks();
        assert_eq!(Filter::new().equals("priority", 5.0f64).count(&tasks), 2);
        assert_eq!(Filter::new().equals("priority", 5u32).count(&tasks), 2);
    }

    #[test]
    fn no_cross_type_coercion() {
        let tasks = sample_tasks();
        assert_eq!(Filter::new().equals("archived", "1").count(&tasks), 0);
        assert_eq!(Filter::new().equals("priority", "5").count(&tasks), 0);
    }

    #[test]
    fn pluck_after_filter() {
        let tasks = sample_tasks();
        let names = Filter::new().equals("archived", true).pluck(&tasks, "name");
        assert_eq!(
            names.values().cloned().collect::<Vec<_>>(),
            vec![
                FieldValue::from("Critical Task"),
                FieldValue::from("Done Task")
            ]
        );
        assert_eq!(keys(&names), vec!["c", "d"]);
    }

    #[test]
    fn count_any_find() {
        let tasks = sample_tasks();
        let archived = Filter::new().equals("archived", true);
        assert_eq!(archived.count(&tasks), 2);
        assert!(archived.any(&tasks));

        let (key, found) = archived.find(&tasks).unwrap();
        assert_eq!(key, &Key::from("c"));
        assert_eq!(found.name, "Critical Task");

        assert!(Filter::new().equals("name", "Nope").find(&tasks).is_none());
    }

    #[test]
    fn free_functions_match_builder() {
        let tasks = sample_tasks();
        let criteria = Criteria::new().equals("archived", false);

        let records = filter_records(&tasks, &criteria, Mode::All);
        assert_eq!(keys(&records), vec!["a", "b", "u"]);

        let names = filter_pluck(&tasks, &criteria, Mode::None, "name");
        assert_eq!(keys(&names), vec!["c", "d"]);
    }

    #[test]
    fn filter_does_not_touch_input() {
        let tasks = sample_tasks();
        let before = tasks.clone();
        let _ = Filter::new().equals("archived", true).apply(&tasks);
        assert_eq!(tasks, before);
    }

    #[test]
    fn owned_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Filter>();
        assert_send_sync::<Criteria>();
        assert_send_sync::<Pluck>();
        assert_send_sync::<Plucked>();
        assert_send_sync::<Collection<Task>>();
    }

    #[test]
    fn introspection() {
        let filter = Filter::new().mode(Mode::Any).equals("a", 1i64);
        assert_eq!(filter.get_mode(), Mode::Any);
        assert_eq!(filter.criteria().len(), 1);
        assert!(!filter.is_empty());
        assert!(Filter::new().is_empty());
    }
}
