//! Multi-choice selection for a single criteria field.
//!
//! A toggle never patches the current set in place: it returns the complete
//! replacement set, which the caller stores wholesale. Several fields
//! updated back to back therefore cannot clobber one another with a stale
//! snapshot.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::FilterOption;

/// The chosen option values of one field. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection {
    values: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Symmetric difference with `{value}`: added if absent, removed if present.
    pub fn toggled(&self, value: &str) -> Self {
        let mut values = self.values.clone();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        Self { values }
    }

    /// Same as toggling a selected value off; a no-op if it is not selected.
    pub fn removed(&self, value: &str) -> Self {
        let mut values = self.values.clone();
        values.remove(value);
        Self { values }
    }

    /// Options of `catalog` in catalog order, paired with their selected flag.
    pub fn render<'a>(
        &'a self,
        catalog: &'a [FilterOption],
    ) -> impl Iterator<Item = (&'a FilterOption, bool)> + 'a {
        catalog.iter().map(move |o| (o, self.contains(o.value)))
    }

    /// Selected values that do not appear in `catalog`.
    pub fn unknown_values<'a>(&'a self, catalog: &'a [FilterOption]) -> impl Iterator<Item = &'a str> {
        self.iter()
            .filter(move |v| !catalog.iter().any(|o| o.value == *v))
    }
}

impl<S: Into<String>> FromIterator<S> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}
