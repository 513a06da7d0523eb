use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lower bound of the response scale.
pub const SCALE_MIN: u8 = 1;
/// Upper bound of the response scale.
pub const SCALE_MAX: u8 = 5;

/// Discriminates the supported inventories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InventoryKind {
    Bfi2,
    Hexaco,
}

impl InventoryKind {
    pub const fn slug(self) -> &'static str {
        match self {
            InventoryKind::Bfi2 => "bfi2",
            InventoryKind::Hexaco => "hexaco",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            InventoryKind::Bfi2 => "Big Five Inventory-2",
            InventoryKind::Hexaco => "HEXACO Personality Inventory",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        match value {
            "bfi2" => Some(InventoryKind::Bfi2),
            "hexaco" => Some(InventoryKind::Hexaco),
            _ => None,
        }
    }
}

/// One inventory item as distributed in the static question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub item_number: u32,
    pub text: String,
    pub domain: String,
    pub facet: String,
    #[serde(default)]
    pub reverse_scored: bool,
}

/// A single Likert response, guaranteed to lie on the 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LikertValue(u8);

impl LikertValue {
    pub fn new(value: u8) -> Result<Self, InvalidLikertValue> {
        if (SCALE_MIN..=SCALE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidLikertValue(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Reverse-keyed items reflect around the scale midpoint: `(max + min) - value`.
    pub const fn effective(self, reverse_scored: bool) -> u8 {
        if reverse_scored {
            SCALE_MIN + SCALE_MAX - self.0
        } else {
            self.0
        }
    }
}

impl TryFrom<u8> for LikertValue {
    type Error = InvalidLikertValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LikertValue> for u8 {
    fn from(value: LikertValue) -> Self {
        value.0
    }
}

/// Raised when a response falls outside the inventory scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("likert response {0} outside the 1..=5 scale")]
pub struct InvalidLikertValue(pub u8);

/// Item responses keyed by item number. Recording an item twice overwrites
/// the earlier value; ordering is not significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet {
    values: BTreeMap<u32, LikertValue>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the response for an item, returning the previous
    /// value if one existed.
    pub fn record(&mut self, item_number: u32, value: LikertValue) -> Option<LikertValue> {
        self.values.insert(item_number, value)
    }

    pub fn get(&self, item_number: u32) -> Option<LikertValue> {
        self.values.get(&item_number).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, LikertValue)> + '_ {
        self.values.iter().map(|(item, value)| (*item, *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likert_values_enforce_scale_bounds() {
        assert!(LikertValue::new(0).is_err());
        assert!(LikertValue::new(6).is_err());
        for raw in SCALE_MIN..=SCALE_MAX {
            assert_eq!(LikertValue::new(raw).expect("in range").get(), raw);
        }
    }

    #[test]
    fn reverse_keyed_items_reflect_around_midpoint() {
        for raw in SCALE_MIN..=SCALE_MAX {
            let value = LikertValue::new(raw).expect("in range");
            assert_eq!(value.effective(false), raw);
            assert_eq!(value.effective(true), SCALE_MIN + SCALE_MAX - raw);
        }
    }

    #[test]
    fn recording_an_item_twice_overwrites() {
        let mut responses = ResponseSet::new();
        let first = LikertValue::new(2).expect("in range");
        let second = LikertValue::new(5).expect("in range");

        assert_eq!(responses.record(7, first), None);
        assert_eq!(responses.record(7, second), Some(first));
        assert_eq!(responses.get(7), Some(second));
        assert_eq!(responses.len(), 1);
    }

    #[test]
    fn response_sets_reject_out_of_scale_json() {
        let parsed: Result<ResponseSet, _> = serde_json::from_str(r#"{"1": 9}"#);
        assert!(parsed.is_err());

        let parsed: ResponseSet =
            serde_json::from_str(r#"{"1": 4, "2": 1}"#).expect("valid payload");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get(1).map(LikertValue::get), Some(4));
    }
}
