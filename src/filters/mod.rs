//! Filtering, aggregation and ordering over an in-memory listing set.
//!
//! Everything here is pure and synchronous: same inputs, same outputs.

pub mod ranking;
pub mod stats;
pub mod types;

pub use ranking::{curate, sort_listings, SortOrder, CURATED_MIN_SCORE, DEFAULT_CURATED_LIMIT};
pub use stats::{compute_statistics, Statistics};
pub use types::FilterSet;

use crate::models::Listing;

/// Keep the listings that satisfy every active predicate, in input order
pub fn apply_filters<'a>(listings: &'a [Listing], filters: &FilterSet) -> Vec<&'a Listing> {
    let filters = filters.normalized();
    listings
        .iter()
        .filter(|l| filters.matches_normalized(l))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Typology};

    fn listing(id: &str, price: i64, score: i32, category: Category, days: i64) -> Listing {
        let mut listing = Listing::new(id);
        listing.price = Some(price);
        listing.opportunity_score = Some(score);
        listing.opportunity_category = Some(category);
        listing.days_on_market = Some(days);
        listing
    }

    fn pair() -> Vec<Listing> {
        vec![
            listing("first", 145_000, 72, Category::A, 45),
            listing("second", 300_000, 40, Category::B, 10),
        ]
    }

    fn ids(filtered: &[&Listing]) -> Vec<String> {
        filtered.iter().map(|l| l.id.clone()).collect()
    }

    fn sample() -> Vec<Listing> {
        let mut listings = pair();
        let mut third = listing("third", 220_000, 65, Category::C, 190);
        third.parish = Some("Belém".to_string());
        third.typology = Some(Typology::T2);
        listings.push(third);
        let mut fourth = Listing::new("fourth");
        fourth.title = "Moradia em Carnide".to_string();
        listings.push(fourth);
        listings.push(listing("fifth", 99_000, 91, Category::A, 400));
        listings
    }

    #[test]
    fn min_score_keeps_only_first() {
        let listings = pair();
        let filtered = apply_filters(&listings, &FilterSet::new().with_min_score(50));
        assert_eq!(ids(&filtered), vec!["first"]);
    }

    #[test]
    fn min_price_keeps_only_second() {
        let listings = pair();
        let filtered = apply_filters(&listings, &FilterSet::new().with_price(Some(150_000), None));
        assert_eq!(ids(&filtered), vec!["second"]);
    }

    #[test]
    fn parish_match_ignores_case() {
        let listings = sample();
        let filtered = apply_filters(&listings, &FilterSet::new().with_parish("belém"));
        assert_eq!(ids(&filtered), vec!["third"]);
    }

    #[test]
    fn default_filters_are_identity() {
        let listings = sample();
        let filtered = apply_filters(&listings, &FilterSet::default());
        assert_eq!(filtered.len(), listings.len());
        for (kept, original) in filtered.iter().zip(listings.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn result_is_an_ordered_subsequence() {
        let listings = sample();
        let filter_sets = [
            FilterSet::new().with_category(Category::A),
            FilterSet::new().older_than(30),
            FilterSet::new().with_price(None, Some(250_000)),
            FilterSet::new().with_min_score(60).with_days(None, Some(200)),
        ];

        for filters in &filter_sets {
            let filtered = apply_filters(&listings, filters);
            let positions: Vec<usize> = filtered
                .iter()
                .map(|kept| {
                    listings
                        .iter()
                        .position(|l| std::ptr::eq(l, *kept))
                        .unwrap()
                })
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", filters);
        }
    }

    #[test]
    fn adding_a_constraint_never_grows_the_result() {
        let listings = sample();
        let base = FilterSet::new().with_min_score(50);
        let narrower = [
            base.clone().with_category(Category::A),
            base.clone().with_days(Some(100), None),
            base.clone().with_price(None, Some(150_000)),
            base.clone().with_typology(Typology::T2),
            base.clone().with_parish("bel"),
            base.clone().with_query("moradia"),
        ];

        let wide = ids(&apply_filters(&listings, &base));
        for filters in &narrower {
            let narrow = ids(&apply_filters(&listings, filters));
            assert!(narrow.len() <= wide.len());
            assert!(narrow.iter().all(|id| wide.contains(id)), "{:?}", filters);
        }
    }

    #[test]
    fn combined_predicates_are_anded() {
        let listings = sample();
        let filters = FilterSet::new()
            .with_category(Category::A)
            .with_days(Some(100), None)
            .with_price(None, Some(100_000));
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec!["fifth"]);
    }

    #[test]
    fn out_of_range_values_are_filtered_not_rejected() {
        let mut odd = listing("odd", 100_000, 150, Category::Unknown, 5);
        odd.days_on_market = Some(-3);
        let listings = vec![odd];

        assert_eq!(apply_filters(&listings, &FilterSet::default()).len(), 1);
        assert_eq!(
            apply_filters(&listings, &FilterSet::new().with_min_score(100)).len(),
            1
        );
        assert!(apply_filters(&listings, &FilterSet::new().with_category(Category::D)).is_empty());
    }
}
