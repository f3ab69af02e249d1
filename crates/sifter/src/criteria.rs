//! Criteria and combination modes.
//!
//! A [`Criterion`] pairs a field name with an [`Expected`] value. A record is
//! tested against every criterion and the per-criterion results are combined
//! according to a [`Mode`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SifterError};
use crate::value::{FieldValue, Scalar, Value};

/// How per-criterion results combine into a per-record match.
///
/// | Mode | Matches when | Empty criteria |
/// |------|--------------|----------------|
/// | `All` | every criterion matches | matches |
/// | `Any` | at least one criterion matches | never matches |
/// | `None` | no criterion matches | matches |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Mode {
    /// Every criterion must match.
    #[default]
    All,
    /// At least one criterion must match.
    Any,
    /// No criterion may match.
    None,
}

impl Mode {
    /// Combines per-criterion results.
    ///
    /// Short-circuits in the same way `Iterator::all`/`any` do.
    pub fn combine<I>(self, mut results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        match self {
            Mode::All => results.all(|m| m),
            Mode::Any => results.any(|m| m),
            Mode::None => results.all(|m| !m),
        }
    }

    /// Returns the canonical name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::Any => "any",
            Mode::None => "none",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a mode name, case-insensitively.
///
/// `and`, `or` and `not` are accepted as aliases for `all`, `any` and `none`.
impl FromStr for Mode {
    type Err = SifterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "and" => Ok(Mode::All),
            "any" | "or" => Ok(Mode::Any),
            "none" | "not" => Ok(Mode::None),
            _ => {
                debug!(mode = s, "rejecting unknown filter mode");
                Err(SifterError::UnknownMode(s.to_string()))
            }
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = SifterError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Mode> for &'static str {
    fn from(mode: Mode) -> Self {
        mode.as_str()
    }
}

/// The value a criterion expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expected {
    /// Field must equal this scalar.
    Scalar(FieldValue),
    /// Field must be a list sharing at least one element with this set.
    AnyOf(Vec<FieldValue>),
}

impl Expected {
    /// Builds an expected scalar, rejecting lists.
    pub fn scalar(field: &str, value: FieldValue) -> Result<Self> {
        if value.is_scalar() {
            Ok(Expected::Scalar(value))
        } else {
            Err(invalid(field, "expected a scalar, got a list"))
        }
    }

    /// Builds an expected set, rejecting nested lists.
    pub fn any_of(field: &str, values: Vec<FieldValue>) -> Result<Self> {
        if values.iter().all(FieldValue::is_scalar) {
            Ok(Expected::AnyOf(values))
        } else {
            Err(invalid(field, "set members must be scalars"))
        }
    }

    /// Classifies an owned value: lists become sets, scalars stay scalars.
    pub fn from_value(field: &str, value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::List(items) => Expected::any_of(field, items),
            scalar => Ok(Expected::Scalar(scalar)),
        }
    }

    /// Tests a field read against this expectation.
    ///
    /// A scalar matches by strict equality. A set matches when the field is a
    /// list and at least one of its elements strictly equals a set member.
    /// An absent field never matches.
    pub fn matches(&self, actual: Option<&Value<'_>>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self {
            Expected::Scalar(expected) => expected.as_value().strict_eq(actual),
            Expected::AnyOf(set) => match actual {
                Value::List(items) => items
                    .iter()
                    .any(|item| set.iter().any(|member| member.as_value().strict_eq(item))),
                _ => false,
            },
        }
    }
}

/// A single field test.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    /// The field to read.
    pub field: String,
    /// The value to compare against.
    pub expected: Expected,
}

impl Criterion {
    /// Creates a new criterion.
    pub fn new(field: impl Into<String>, expected: Expected) -> Self {
        Criterion {
            field: field.into(),
            expected,
        }
    }

    /// Evaluates this criterion against a field read.
    pub fn matches(&self, actual: Option<&Value<'_>>) -> bool {
        self.expected.matches(actual)
    }
}

/// Ordered field-to-expected-value mapping.
///
/// Setting a field twice replaces the earlier expectation, as a map would.
///
/// ```
/// use sifter::Criteria;
///
/// let criteria = Criteria::new()
///     .equals("field1", true)
///     .any_of("field4", ["blue"]);
/// assert_eq!(criteria.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    criteria: Vec<Criterion>,
}

impl Criteria {
    /// Creates empty criteria.
    pub fn new() -> Self {
        Criteria::default()
    }

    /// Adds or replaces an equality criterion.
    pub fn equals(self, field: &str, value: impl Scalar) -> Self {
        self.with(Criterion::new(field, Expected::Scalar(value.into())))
    }

    /// Adds or replaces an overlap criterion.
    pub fn any_of<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Scalar,
    {
        let set = values.into_iter().map(Into::<FieldValue>::into).collect();
        self.with(Criterion::new(field, Expected::AnyOf(set)))
    }

    /// Adds or replaces a criterion from a dynamic value.
    ///
    /// Scalars become equality tests and lists become overlap tests. A list
    /// holding another list is rejected with [`SifterError::InvalidCriterion`].
    pub fn try_equals(self, field: &str, value: impl Into<FieldValue>) -> Result<Self> {
        let expected = Expected::from_value(field, value.into())
            .inspect_err(|e| debug!(field, error = %e, "rejecting criterion"))?;
        Ok(self.with(Criterion::new(field, expected)))
    }

    /// Adds or replaces an overlap criterion from dynamic values, rejecting
    /// nested lists.
    pub fn try_any_of<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let set = values.into_iter().map(Into::<FieldValue>::into).collect();
        let expected = Expected::any_of(field, set)
            .inspect_err(|e| debug!(field, error = %e, "rejecting criterion"))?;
        Ok(self.with(Criterion::new(field, expected)))
    }

    /// Adds or replaces a criterion.
    pub fn with(mut self, criterion: Criterion) -> Self {
        self.insert(criterion);
        self
    }

    /// Adds or replaces a criterion in place.
    pub fn insert(&mut self, criterion: Criterion) {
        match self.criteria.iter_mut().find(|c| c.field == criterion.field) {
            Some(existing) => *existing = criterion,
            None => self.criteria.push(criterion),
        }
    }

    /// Builds criteria from a JSON object of `field: expected` pairs.
    ///
    /// Scalars become equality tests and arrays of scalars become overlap
    /// tests. `null`, nested objects and arrays containing non-scalars are
    /// rejected.
    pub fn from_json(doc: &serde_json::Value) -> Result<Self> {
        let Some(object) = doc.as_object() else {
            debug!("rejecting criteria document that is not an object");
            return Err(invalid("", "criteria must be a JSON object"));
        };

        let mut criteria = Criteria::new();
        for (field, value) in object {
            let expected = match value {
                serde_json::Value::Null => Err(invalid(field, "null is not a valid criterion")),
                serde_json::Value::Object(_) => {
                    Err(invalid(field, "objects are not valid criteria"))
                }
                serde_json::Value::Array(items) => {
                    let set = items
                        .iter()
                        .map(|item| json_scalar(field, item))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Expected::AnyOf(set))
                }
                scalar => json_scalar(field, scalar).map(Expected::Scalar),
            }
            .inspect_err(|e| debug!(field = %field, error = %e, "rejecting criterion"))?;
            criteria.insert(Criterion::new(field.as_str(), expected));
        }
        Ok(criteria)
    }

    /// Parses criteria from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: serde_json::Value = serde_json::from_str(text)?;
        Criteria::from_json(&doc)
    }

    /// Returns the criteria in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.criteria.iter()
    }

    /// Number of criteria.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Returns `true` if there are no criteria.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Criterion> for Criteria {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        let mut criteria = Criteria::new();
        for criterion in iter {
            criteria.insert(criterion);
        }
        criteria
    }
}

fn json_scalar(field: &str, value: &serde_json::Value) -> Result<FieldValue> {
    match value {
        serde_json::Value::Bool(_)
        | serde_json::Value::Number(_)
        | serde_json::Value::String(_) => {
            serde_json::from_value(value.clone()).map_err(SifterError::from)
        }
        _ => Err(invalid(field, "set members must be scalars")),
    }
}

fn invalid(field: &str, reason: &'static str) -> SifterError {
    SifterError::InvalidCriterion {
        field: field.to_string(),
        reason,
    }
}
