//! Filter Builder Module
//!
//! Composes document-store filter predicates as plain JSON. Only structure
//! is built here; the injected persistence layer interprets the operators.
//! Date bounds become `$gte`/`$lte` objects in RFC 3339 form.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

// == Filter Builder ==
/// Chainable builder of filter documents.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    doc: Map<String, Value>,
}

impl FilterBuilder {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Equality ==
    /// Requires `field == value`.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.doc.insert(field.to_string(), value.into());
        self
    }

    /// Requires `field == value` only when a value is present.
    pub fn eq_opt(self, field: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    // == Date Range ==
    /// Bounds `field` between `from` and `to` (inclusive on both ends).
    ///
    /// Produces `{"$gte": from, "$lte": to}` with whichever bounds are
    /// present; with neither bound the field is left out entirely.
    pub fn date_range(
        mut self,
        field: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        let mut range = Map::new();
        if let Some(from) = from {
            range.insert("$gte".to_string(), Value::String(from.to_rfc3339()));
        }
        if let Some(to) = to {
            range.insert("$lte".to_string(), Value::String(to.to_rfc3339()));
        }

        if !range.is_empty() {
            self.doc.insert(field.to_string(), Value::Object(range));
        }
        self
    }

    // == Build ==
    /// Finishes the document.
    pub fn build(self) -> Value {
        Value::Object(self.doc)
    }
}
