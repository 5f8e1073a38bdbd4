//! Field values, column type tags, and row containers.
//!
//! Rows travel through the pipeline as maps of column name to [`FieldValue`].
//! Column layouts are declared as [`ColumnSet`]s: an ordered mapping of column
//! name to [`ColumnKind`], the tag the quoting layer switches on when it
//! renders a value into a statement literal.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

/// Canonical rendering for date/time values, used both for change detection
/// and for statement literals.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single field value as fetched from a remote source or the local store.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent / SQL NULL.
    Null,
    /// Boolean flag.
    Boolean(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Text value.
    Text(String),
    /// Date/time value, naive (source and store share one zone).
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Whether this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value, when it has one.
    ///
    /// Integers, floats, and numeric-looking text convert to an
    /// arbitrary-precision decimal. Floats go through their shortest decimal
    /// rendering first, so `10.0` and `"10.00"` compare equal rather than
    /// diverging on binary representation error. Non-finite floats and
    /// non-numeric text have no numeric view.
    pub fn as_decimal(&self) -> Option<BigDecimal> {
        match self {
            Self::Integer(value) => Some(BigDecimal::from(*value)),
            Self::Float(value) => {
                if value.is_finite() {
                    value.to_string().parse().ok()
                } else {
                    None
                }
            }
            Self::Text(value) => value.trim().parse().ok(),
            Self::Null | Self::Boolean(_) | Self::Timestamp(_) => None,
        }
    }

    /// Whether the value looks numeric (has a decimal view).
    pub fn is_numeric(&self) -> bool {
        self.as_decimal().is_some()
    }

    /// Canonical text rendering, or `None` for NULL.
    ///
    /// Timestamps normalize to [`TIMESTAMP_FORMAT`]; booleans render as
    /// `1`/`0` the way they are persisted.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Boolean(value) => Some(if *value { "1".into() } else { "0".into() }),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Text(value) => Some(value.clone()),
            Self::Timestamp(value) => Some(value.format(TIMESTAMP_FORMAT).to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

/// Value-type tag carried alongside each column name.
///
/// The quoting layer switches on the tag, not on runtime inspection of the
/// value, so a column keeps one rendering across every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Quoted text literal.
    Text,
    /// Bare integer literal.
    Integer,
    /// `1`/`0` literal.
    Boolean,
    /// Quoted canonical date/time literal.
    Timestamp,
    /// Bare exact-decimal literal.
    Decimal,
}

/// A row in flight: column name to field value.
pub type RowData = BTreeMap<String, FieldValue>;

/// Ordered mapping of column name to [`ColumnKind`].
///
/// Declares which columns participate in a statement (insert/update layouts)
/// or in change detection (check columns). Order is preserved: statements list
/// columns in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<(String, ColumnKind)>,
}

impl ColumnSet {
    /// Create an empty column set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, replacing the kind of an already-declared name in place.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        let name = name.into();
        if let Some(entry) = self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            entry.1 = kind;
        } else {
            self.columns.push((name, kind));
        }
        self
    }

    /// Remove a column. Update layouts are typically the insert layout minus
    /// immutable columns, built with this.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.columns.retain(|(existing, _)| existing != name);
        self
    }

    /// Kind of a declared column, if present.
    pub fn get(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|(existing, _)| existing == name).map(|(_, kind)| *kind)
    }

    /// Whether the column is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Column names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no columns are declared.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
