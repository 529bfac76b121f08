use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Opportunity category assigned upstream by the analyzer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    A,
    B,
    C,
    D,
    #[serde(other)]
    Unknown,
}

impl Category {
    /// The four categories the analyzer emits, in display order
    pub const ALL: [Category; 4] = [Category::A, Category::B, Category::C, Category::D];

    pub fn label(&self) -> &'static str {
        match self {
            Category::A => "Stagnant",
            Category::B => "Aggressive price",
            Category::C => "Renovation potential",
            Category::D => "Other flagged",
            Category::Unknown => "N/A",
        }
    }

    /// Rule of thumb the analyzer used to place a listing in this category
    pub fn criteria(&self) -> &'static str {
        match self {
            Category::A => ">= 180 days on market, >= 2 price cuts",
            Category::B => "<= 30 days on market, >= 12% below market",
            Category::C => "below market with renovation drivers",
            Category::D => "detailed analysis",
            Category::Unknown => "",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::A => write!(f, "A"),
            Category::B => write!(f, "B"),
            Category::C => write!(f, "C"),
            Category::D => write!(f, "D"),
            Category::Unknown => write!(f, "?"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Category::A),
            "B" => Ok(Category::B),
            "C" => Ok(Category::C),
            "D" => Ok(Category::D),
            other => Err(format!("unknown opportunity category '{}'", other)),
        }
    }
}

/// Portuguese typology: T0..T4 by bedroom count, T5+ above that, or a house
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Typology {
    T0,
    T1,
    T2,
    T3,
    T4,
    T5Plus,
    Moradia,
    Other(String),
}

impl From<String> for Typology {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        let upper = trimmed.to_ascii_uppercase();
        match upper.as_str() {
            "T0" => Typology::T0,
            "T1" => Typology::T1,
            "T2" => Typology::T2,
            "T3" => Typology::T3,
            "T4" => Typology::T4,
            "T5+" => Typology::T5Plus,
            "MORADIA" => Typology::Moradia,
            _ => match upper.strip_prefix('T').and_then(|n| n.parse::<u32>().ok()) {
                Some(n) if n >= 5 => Typology::T5Plus,
                _ => Typology::Other(trimmed.to_string()),
            },
        }
    }
}

impl From<Typology> for String {
    fn from(typology: Typology) -> Self {
        typology.to_string()
    }
}

impl FromStr for Typology {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Typology::from(s.to_string()))
    }
}

impl fmt::Display for Typology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typology::T0 => write!(f, "T0"),
            Typology::T1 => write!(f, "T1"),
            Typology::T2 => write!(f, "T2"),
            Typology::T3 => write!(f, "T3"),
            Typology::T4 => write!(f, "T4"),
            Typology::T5Plus => write!(f, "T5+"),
            Typology::Moradia => write!(f, "Moradia"),
            Typology::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Coarse bucket for an opportunity score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: i32) -> Self {
        if score >= 70 {
            ScoreTier::High
        } else if score >= 50 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }
}

/// One opportunity listing as exported by the data pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, alias = "photos")]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typology: Option<Typology>,
    #[serde(default, alias = "area", skip_serializing_if = "Option::is_none")]
    pub area_m2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,

    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<i64>,
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<i64>,
    #[serde(default, alias = "precoM2", skip_serializing_if = "Option::is_none")]
    pub price_per_m2: Option<f64>,
    #[serde(default)]
    pub price_drops: u32,

    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub days_on_market: Option<i64>,
    #[serde(default, alias = "discountVsMarket", skip_serializing_if = "Option::is_none")]
    pub vs_market: Option<f64>,
    #[serde(
        default,
        alias = "score",
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub opportunity_score: Option<i32>,
    #[serde(default, alias = "category", skip_serializing_if = "Option::is_none")]
    pub opportunity_category: Option<Category>,

    #[serde(default, alias = "dataLeilao", skip_serializing_if = "Option::is_none")]
    pub auction_date: Option<String>,
    #[serde(default, alias = "contacto", skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, alias = "notas", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Listing {
    /// Bare listing with only an id; everything else unset
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: None,
            source: None,
            url: None,
            images: Vec::new(),
            parish: None,
            municipality: None,
            location: None,
            typology: None,
            area_m2: None,
            bedrooms: None,
            bathrooms: None,
            price: None,
            original_price: None,
            price_per_m2: None,
            price_drops: 0,
            days_on_market: None,
            vs_market: None,
            opportunity_score: None,
            opportunity_category: None,
            auction_date: None,
            contact: None,
            notes: None,
        }
    }

    /// Price per m², falling back to price / area rounded to whole euros
    pub fn effective_price_per_m2(&self) -> Option<f64> {
        if let Some(ppm) = self.price_per_m2 {
            return Some(ppm);
        }
        match (self.price, self.area_m2) {
            (Some(price), Some(area)) if area > 0.0 => Some((price as f64 / area).round()),
            _ => None,
        }
    }

    /// Percentage cut from the original asking price
    pub fn reduction_from_original(&self) -> Option<f64> {
        match (self.original_price, self.price) {
            (Some(original), Some(price)) if original > 0 => {
                Some((original - price) as f64 / original as f64 * 100.0)
            }
            _ => None,
        }
    }

    pub fn score_tier(&self) -> Option<ScoreTier> {
        self.opportunity_score.map(ScoreTier::from_score)
    }

    /// "parish, municipality" from whichever parts are known
    pub fn location_label(&self) -> String {
        let area = self.municipality.as_deref().or(self.location.as_deref());
        match (self.parish.as_deref(), area) {
            (Some(parish), Some(area)) => format!("{}, {}", parish, area),
            (Some(parish), None) => parish.to_string(),
            (None, Some(area)) => area.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Integer field the export job may have written as `250000` or `250000.0`
fn whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(value) => T::try_from(value.round() as i64)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("{} is out of range", value))),
        None => Ok(None),
    }
}

/// Keep every listing that parses; log and drop the rest
fn readable_listings<'de, D>(deserializer: D) -> Result<Vec<Listing>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<Listing>(entry) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!("Skipping unreadable listing #{}: {}", i, e);
                None
            }
        })
        .collect())
}

/// Snapshot payload as written by the export job and kept in the cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(
        default,
        alias = "exported_at",
        alias = "updatedAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub exported_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, deserialize_with = "readable_listings")]
    pub properties: Vec<Listing>,
}

impl Snapshot {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dashboard_aliases() {
        let raw = r#"{
            "id": "idealista-1",
            "title": "T2 em Belém",
            "parish": "Belém",
            "municipality": "Lisboa",
            "typology": "T2",
            "area": 78.5,
            "photos": ["https://img/1.jpg"],
            "price": 345000,
            "precoM2": 4395,
            "discountVsMarket": -14.2,
            "score": 81,
            "category": "B",
            "dataLeilao": "2025-03-10",
            "contacto": "+351 210 000 000",
            "notas": "Leilão eletrónico"
        }"#;

        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.area_m2, Some(78.5));
        assert_eq!(listing.images.len(), 1);
        assert_eq!(listing.price_per_m2, Some(4395.0));
        assert_eq!(listing.vs_market, Some(-14.2));
        assert_eq!(listing.opportunity_score, Some(81));
        assert_eq!(listing.opportunity_category, Some(Category::B));
        assert_eq!(listing.auction_date.as_deref(), Some("2025-03-10"));
        assert_eq!(listing.contact.as_deref(), Some("+351 210 000 000"));
        assert_eq!(listing.notes.as_deref(), Some("Leilão eletrónico"));
        assert_eq!(listing.price_drops, 0);
    }

    #[test]
    fn unknown_category_is_kept_not_rejected() {
        let listing: Listing =
            serde_json::from_str(r#"{"id": "x", "opportunityCategory": "Z"}"#).unwrap();
        assert_eq!(listing.opportunity_category, Some(Category::Unknown));
    }

    #[test]
    fn typology_normalizes_large_and_house_values() {
        assert_eq!(Typology::from("t3".to_string()), Typology::T3);
        assert_eq!(Typology::from("T5".to_string()), Typology::T5Plus);
        assert_eq!(Typology::from("T7".to_string()), Typology::T5Plus);
        assert_eq!(Typology::from("moradia".to_string()), Typology::Moradia);
        assert_eq!(
            Typology::from("Loja".to_string()),
            Typology::Other("Loja".to_string())
        );
        assert_eq!(Typology::T5Plus.to_string(), "T5+");
    }

    #[test]
    fn derives_price_per_m2_when_absent() {
        let mut listing = Listing::new("a");
        listing.price = Some(300_000);
        listing.area_m2 = Some(80.0);
        assert_eq!(listing.effective_price_per_m2(), Some(3750.0));

        listing.price_per_m2 = Some(4000.0);
        assert_eq!(listing.effective_price_per_m2(), Some(4000.0));

        listing.price_per_m2 = None;
        listing.area_m2 = Some(0.0);
        assert_eq!(listing.effective_price_per_m2(), None);
    }

    #[test]
    fn reduction_from_original_price() {
        let mut listing = Listing::new("a");
        listing.price = Some(180_000);
        listing.original_price = Some(200_000);
        assert_eq!(listing.reduction_from_original(), Some(10.0));

        listing.original_price = None;
        assert_eq!(listing.reduction_from_original(), None);
    }

    #[test]
    fn score_tiers() {
        assert_eq!(ScoreTier::from_score(70), ScoreTier::High);
        assert_eq!(ScoreTier::from_score(69), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_score(50), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_score(12), ScoreTier::Low);
    }

    #[test]
    fn location_label_uses_known_parts() {
        let mut listing = Listing::new("a");
        assert_eq!(listing.location_label(), "");
        listing.parish = Some("Alvalade".to_string());
        assert_eq!(listing.location_label(), "Alvalade");
        listing.municipality = Some("Lisboa".to_string());
        assert_eq!(listing.location_label(), "Alvalade, Lisboa");
    }

    #[test]
    fn snapshot_without_properties_is_empty() {
        let snapshot = Snapshot::from_json(r#"{"exported_at": "2025-01-01T00:00:00"}"#).unwrap();
        assert!(snapshot.properties.is_empty());
        assert_eq!(snapshot.exported_at.as_deref(), Some("2025-01-01T00:00:00"));
    }

    #[test]
    fn reads_agent_export_with_float_numbers() {
        let raw = r#"{"properties": [
            {"id": "idealista-77", "portal": "idealista", "url": "https://x/77", "title": "T3 Alvalade",
             "price": 250000.0, "pricePerM2": 3125.0, "areaM2": 80.0, "typology": "T3",
             "location": "Alvalade, Lisboa", "parish": "Alvalade", "municipality": "Lisboa",
             "daysOnMarket": 210, "opportunityScore": 78, "opportunityCategory": "A", "photos": []}
        ], "updatedAt": "2025-02-01T10:00:00"}"#;

        let snapshot = Snapshot::from_json(raw).unwrap();
        assert_eq!(snapshot.properties.len(), 1);
        let listing = &snapshot.properties[0];
        assert_eq!(listing.price, Some(250_000));
        assert_eq!(listing.price_per_m2, Some(3125.0));
        assert_eq!(listing.opportunity_score, Some(78));
        assert_eq!(snapshot.exported_at.as_deref(), Some("2025-02-01T10:00:00"));
    }

    #[test]
    fn fractional_prices_round_to_whole_euros() {
        let listing: Listing =
            serde_json::from_str(r#"{"id": "x", "price": 199999.6, "originalPrice": null}"#).unwrap();
        assert_eq!(listing.price, Some(200_000));
        assert_eq!(listing.original_price, None);
    }

    #[test]
    fn unreadable_listing_is_skipped_not_fatal() {
        let raw = r#"{"properties": [
            {"id": "good-1", "price": 100000},
            {"title": "no id here"},
            {"id": "bad-score", "opportunityScore": "high"},
            {"id": "good-2", "price": 120000.0}
        ]}"#;
        let snapshot = Snapshot::from_json(raw).unwrap();
        let ids: Vec<&str> = snapshot.properties.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["good-1", "good-2"]);
    }

    #[test]
    fn non_array_properties_is_still_an_error() {
        assert!(Snapshot::from_json(r#"{"properties": "nope"}"#).is_err());
    }
}
