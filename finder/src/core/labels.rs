//! Declarative label → field mapping for contact blocks
//!
//! Directory pages render contact details as short lines such as
//! `T: +43 1 234 56` or `W: www.example.at`. The [`LabelMap`] turns those
//! prefixes into semantic [`Field`]s; everything that depends on the site's
//! wording lives here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic fields of a firm's detail page
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Address,
    Phone,
    Email,
    Website,
    Description,
    Category,
}

/// Mapping from label tokens (`"T:"`) to fields, matched case-insensitively
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    labels: BTreeMap<String, Field>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self::from_pairs([
            ("A:", Field::Address),
            ("Adresse:", Field::Address),
            ("T:", Field::Phone),
            ("Tel:", Field::Phone),
            ("Telefon:", Field::Phone),
            ("E:", Field::Email),
            ("E-Mail:", Field::Email),
            ("Email:", Field::Email),
            ("W:", Field::Website),
            ("Web:", Field::Website),
            ("Website:", Field::Website),
            ("Homepage:", Field::Website),
        ])
    }
}

impl LabelMap {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Field)>) -> Self {
        Self {
            labels: pairs
                .into_iter()
                .map(|(label, field)| (label.to_string(), field))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels that map to `field`
    pub fn labels_for(&self, field: Field) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|(_, f)| **f == field)
            .map(|(label, _)| label.as_str())
            .collect()
    }

    /// Match one contact line, returning the field and the trimmed value
    ///
    /// The longest matching label wins so `E-Mail:` is not read as `E:`.
    pub fn match_line<'l>(&self, line: &'l str) -> Option<(Field, &'l str)> {
        let line = line.trim_start();
        self.labels
            .iter()
            .filter(|(label, _)| {
                line.get(..label.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(label))
            })
            .max_by_key(|(label, _)| label.len())
            .map(|(label, field)| (*field, line[label.len()..].trim()))
    }
}

/// Fields parsed from one detail page
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: BTreeMap<Field, String>,
    website_labeled: bool,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a labeled value. The first non-blank value for a field wins.
    ///
    /// A website label marks the page even when its value is blank.
    pub fn set(&mut self, field: Field, value: &str) {
        if field == Field::Website {
            self.website_labeled = true;
        }
        let value = collapse_whitespace(value);
        if value.is_empty() {
            return;
        }
        self.values.entry(field).or_insert(value);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn has_website(&self) -> bool {
        self.website_labeled
    }

    pub fn take(&mut self, field: Field) -> Option<String> {
        self.values.remove(&field)
    }
}

/// Join runs of whitespace (including newlines) into single spaces
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
