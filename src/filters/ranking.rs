use crate::models::Listing;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Score a listing needs to make the curated selection
pub const CURATED_MIN_SCORE: i32 = 70;
pub const DEFAULT_CURATED_LIMIT: usize = 12;

/// Display orderings for a listing view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Highest opportunity score first
    #[default]
    Score,
    PriceAsc,
    PriceDesc,
    /// Longest on the market first
    DaysOnMarket,
    /// Cheapest per m² first
    PricePerM2,
}

/// Compare two optional keys, sending missing ones to the end
fn missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of a view in place
pub fn sort_listings(listings: &mut [&Listing], order: SortOrder) {
    listings.sort_by(|a, b| match order {
        SortOrder::Score => missing_last(a.opportunity_score, b.opportunity_score, true),
        SortOrder::PriceAsc => missing_last(a.price, b.price, false),
        SortOrder::PriceDesc => missing_last(a.price, b.price, true),
        SortOrder::DaysOnMarket => missing_last(a.days_on_market, b.days_on_market, true),
        SortOrder::PricePerM2 => {
            missing_last(a.effective_price_per_m2(), b.effective_price_per_m2(), false)
        }
    });
}

/// Final selection: score >= 70, best score first, then freshest
pub fn curate<'a, I>(listings: I, limit: usize) -> Vec<&'a Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut picks: Vec<&Listing> = listings
        .into_iter()
        .filter(|l| l.opportunity_score.map_or(false, |s| s >= CURATED_MIN_SCORE))
        .collect();

    picks.sort_by(|a, b| {
        b.opportunity_score
            .cmp(&a.opportunity_score)
            .then_with(|| missing_last(a.days_on_market, b.days_on_market, false))
    });
    picks.truncate(limit);
    picks
}
