use crate::models::{Category, Listing, Typology};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Constraints a user can put on the listing view.
///
/// Every field is independent; an unset field imposes no constraint.
/// The set is replaced on each change, so equality is enough to tell
/// whether the view needs recomputing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSet {
    /// Exact opportunity category
    #[serde(deserialize_with = "blank_as_none")]
    pub category: Option<Category>,
    /// Score floor; 0 means no floor
    pub min_score: i32,
    /// Minimum days on market (inclusive)
    pub min_days: Option<i64>,
    /// Maximum days on market (inclusive)
    pub max_days: Option<i64>,
    /// Exact typology
    #[serde(deserialize_with = "blank_as_none")]
    pub typology: Option<Typology>,
    /// Case-insensitive substring of the parish
    pub parish: Option<String>,
    /// Minimum price in euros (inclusive)
    pub min_price: Option<i64>,
    /// Maximum price in euros (inclusive)
    pub max_price: Option<i64>,
    /// Case-insensitive substring of title or location
    pub query: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(self, category: Category) -> Self {
        Self {
            category: Some(category),
            ..self
        }
    }

    pub fn with_min_score(self, min_score: i32) -> Self {
        Self { min_score, ..self }
    }

    pub fn with_days(self, min_days: Option<i64>, max_days: Option<i64>) -> Self {
        Self {
            min_days,
            max_days,
            ..self
        }
    }

    pub fn with_typology(self, typology: Typology) -> Self {
        Self {
            typology: Some(typology),
            ..self
        }
    }

    pub fn with_parish(self, parish: impl Into<String>) -> Self {
        Self {
            parish: Some(parish.into()),
            ..self
        }
    }

    pub fn with_price(self, min_price: Option<i64>, max_price: Option<i64>) -> Self {
        Self {
            min_price,
            max_price,
            ..self
        }
    }

    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..self
        }
    }

    /// Quick preset: on the market for at least `days`, no upper bound
    pub fn older_than(self, days: i64) -> Self {
        self.with_days(Some(days), None)
    }

    /// True when no predicate is active
    pub fn is_unconstrained(&self) -> bool {
        self.normalized() == Self::default()
    }

    /// Score floor, if one is active
    fn score_floor(&self) -> Option<i32> {
        Some(self.min_score).filter(|score| *score > 0)
    }

    /// Blank strings and a non-positive score floor collapse to "unset"
    pub fn normalized(&self) -> Self {
        let clean = |s: &Option<String>| {
            s.as_ref()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            min_score: self.score_floor().unwrap_or(0),
            parish: clean(&self.parish),
            query: clean(&self.query),
            typology: self
                .typology
                .clone()
                .filter(|t| !matches!(t, Typology::Other(raw) if raw.trim().is_empty())),
            ..*self
        }
    }

    /// Check a single listing against every active predicate
    pub fn matches(&self, listing: &Listing) -> bool {
        self.normalized().matches_normalized(listing)
    }

    /// `matches` for a set that already went through `normalized`
    pub(crate) fn matches_normalized(&self, listing: &Listing) -> bool {
        if let Some(category) = self.category {
            if listing.opportunity_category != Some(category) {
                return false;
            }
        }

        if let Some(floor) = self.score_floor() {
            match listing.opportunity_score {
                Some(score) if score >= floor => {}
                _ => return false,
            }
        }

        if !within(listing.days_on_market, self.min_days, self.max_days) {
            return false;
        }

        if let Some(typology) = &self.typology {
            if listing.typology.as_ref() != Some(typology) {
                return false;
            }
        }

        if let Some(parish) = &self.parish {
            match &listing.parish {
                Some(value) if contains_ignore_case(value, parish) => {}
                _ => return false,
            }
        }

        if !within(listing.price, self.min_price, self.max_price) {
            return false;
        }

        if let Some(query) = &self.query {
            let haystacks = [
                Some(listing.title.as_str()),
                listing.parish.as_deref(),
                listing.municipality.as_deref(),
                listing.location.as_deref(),
            ];
            if !haystacks
                .iter()
                .flatten()
                .any(|text| contains_ignore_case(text, query))
            {
                return false;
            }
        }

        true
    }
}

/// The dashboard sends `""` for "any"; read that as unset
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.parse().map(Some).map_err(D::Error::custom),
        _ => Ok(None),
    }
}

/// Inclusive range check; a missing value fails any set bound
fn within(value: Option<i64>, min: Option<i64>, max: Option<i64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match value {
        Some(v) => min.map_or(true, |lo| v >= lo) && max.map_or(true, |hi| v <= hi),
        None => false,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
