//! Questionnaire item catalog
//!
//! The catalog is immutable reference data: an ordered list of Likert items,
//! each tagged with the trait it measures and whether its answer is reversed.

use crate::error::SurveyError;
use crate::types::{Trait, TraitMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single questionnaire item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item code (e.g. "O1")
    pub code: String,
    /// Question text presented to the respondent
    #[serde(default)]
    pub text: String,
    #[serde(rename = "trait")]
    pub trait_: Trait,
    #[serde(default)]
    pub is_reversed: bool,
    /// Unique presentation position
    pub order: u32,
}

impl Item {
    pub fn new(code: impl Into<String>, trait_: Trait, is_reversed: bool, order: u32) -> Self {
        Self {
            code: code.into(),
            text: String::new(),
            trait_,
            is_reversed,
            order,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Ordered, validated set of items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl ItemCatalog {
    /// Build a catalog sorted by `order`.
    ///
    /// Fails on duplicate codes or duplicate order values.
    pub fn new(mut items: Vec<Item>) -> Result<Self, SurveyError> {
        let mut codes = HashSet::with_capacity(items.len());
        let mut orders = HashSet::with_capacity(items.len());
        for item in &items {
            if !codes.insert(item.code.as_str()) {
                return Err(SurveyError::InvalidCatalog(format!(
                    "duplicate item code {}",
                    item.code
                )));
            }
            if !orders.insert(item.order) {
                return Err(SurveyError::InvalidCatalog(format!(
                    "duplicate item order {}",
                    item.order
                )));
            }
        }

        items.sort_by_key(|item| item.order);
        tracing::debug!(items = items.len(), "item catalog loaded");
        Ok(Self { items })
    }

    /// Load a catalog from a JSON array of items
    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Self::new(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Number of items per trait
    pub fn trait_counts(&self) -> TraitMap<usize> {
        let mut counts = TraitMap::default();
        for item in &self.items {
            counts[item.trait_] += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a ItemCatalog {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Public projection of an item for the questionnaire endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub code: String,
    pub text: String,
    #[serde(rename = "trait")]
    pub trait_: Trait,
    pub is_reversed: bool,
    pub order: u32,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            code: item.code.clone(),
            text: item.text.clone(),
            trait_: item.trait_,
            is_reversed: item.is_reversed,
            order: item.order,
        }
    }
}
