//! Label-to-code translation tables.
//!
//! Some xDome fields are filtered on numeric codes while users supply
//! display labels. A [`FormatLookup`] maps a field name to the table that
//! translates its labels.

use std::collections::HashMap;

/// Per-field translation tables from display label to API code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatLookup {
    tables: HashMap<String, HashMap<String, i64>>,
}

impl FormatLookup {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The vendor vocabulary shipped with the connector.
    ///
    /// Currently only `purdue_level` (`"Level 1"` through `"Level 5"`).
    #[must_use]
    pub fn vendor() -> Self {
        Self::new().with_table(
            "purdue_level",
            (1..=5).map(|level| (format!("Level {level}"), level)),
        )
    }

    /// Register (or replace) the table for `field`.
    #[must_use]
    pub fn with_table<L>(mut self, field: impl Into<String>, entries: L) -> Self
    where
        L: IntoIterator<Item = (String, i64)>,
    {
        self.tables.insert(field.into(), entries.into_iter().collect());
        self
    }

    /// Whether `field` is translated through a table.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.tables.contains_key(field)
    }

    /// Translate `label` for `field`.
    ///
    /// Returns `None` when the field has no table or the label is unknown.
    #[must_use]
    pub fn code(&self, field: &str, label: &str) -> Option<i64> {
        self.tables.get(field)?.get(label).copied()
    }
}
