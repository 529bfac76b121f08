use crate::models::{Category, Listing};
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Summary figures for a listing set, recomputed whenever the set changes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(rename = "totalProperties")]
    pub total: usize,
    pub average_price: f64,
    pub average_score: f64,
    pub average_days: f64,
    /// Counts for A..D; every category is present even when zero
    pub by_category: BTreeMap<Category, usize>,
    /// Listings with no category or one outside A..D
    pub uncategorized: usize,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            total: 0,
            average_price: 0.0,
            average_score: 0.0,
            average_days: 0.0,
            by_category: Category::ALL.iter().map(|c| (*c, 0)).collect(),
            uncategorized: 0,
        }
    }
}

impl Statistics {
    pub fn count(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    /// Share of `category` among all listings, in percent
    pub fn share(&self, category: Category) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(category) as f64 / self.total as f64 * 100.0
    }
}

#[derive(Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    fn value(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }
}

/// Aggregate a listing set: the whole store or a filtered view.
///
/// Averages only count listings that carry the field, and are 0 when none do.
pub fn compute_statistics<I>(listings: I) -> Statistics
where
    I: IntoIterator,
    I::Item: Borrow<Listing>,
{
    let mut stats = Statistics::default();
    let mut price = Mean::default();
    let mut score = Mean::default();
    let mut days = Mean::default();

    for item in listings {
        let listing = item.borrow();
        stats.total += 1;
        price.add(listing.price.map(|p| p as f64));
        score.add(listing.opportunity_score.map(f64::from));
        days.add(listing.days_on_market.map(|d| d as f64));

        match listing.opportunity_category {
            Some(category) if category != Category::Unknown => {
                *stats.by_category.entry(category).or_insert(0) += 1;
            }
            _ => stats.uncategorized += 1,
        }
    }

    stats.average_price = price.value();
    stats.average_score = score.value();
    stats.average_days = days.value();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{apply_filters, FilterSet};

    fn listing(id: &str, price: i64, score: i32, category: Option<Category>, days: i64) -> Listing {
        let mut listing = Listing::new(id);
        listing.price = Some(price);
        listing.opportunity_score = Some(score);
        listing.opportunity_category = category;
        listing.days_on_market = Some(days);
        listing
    }

    #[test]
    fn empty_input_is_all_zero() {
        let stats = compute_statistics(&[] as &[Listing]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_price, 0.0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.average_days, 0.0);
        assert_eq!(stats.by_category.len(), 4);
        assert!(stats.by_category.values().all(|c| *c == 0));
        assert_eq!(stats.share(Category::A), 0.0);
    }

    #[test]
    fn averages_are_plain_means() {
        let listings = vec![
            listing("a", 145_000, 72, Some(Category::A), 45),
            listing("b", 300_000, 40, Some(Category::B), 10),
        ];
        let stats = compute_statistics(&listings);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_price, 222_500.0);
        assert_eq!(stats.average_score, 56.0);
        assert_eq!(stats.average_days, 27.5);
        assert_eq!(stats.count(Category::A), 1);
        assert_eq!(stats.count(Category::C), 0);
        assert_eq!(stats.share(Category::B), 50.0);
    }

    #[test]
    fn missing_fields_do_not_drag_averages_down() {
        let listings = vec![
            listing("a", 200_000, 80, Some(Category::A), 100),
            Listing::new("bare"),
        ];
        let stats = compute_statistics(&listings);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_price, 200_000.0);
        assert_eq!(stats.average_score, 80.0);
    }

    #[test]
    fn category_counts_sum_to_total() {
        let listings = vec![
            listing("a", 1, 1, Some(Category::A), 1),
            listing("b", 1, 1, Some(Category::D), 1),
            listing("c", 1, 1, Some(Category::D), 1),
            listing("d", 1, 1, Some(Category::Unknown), 1),
            listing("e", 1, 1, None, 1),
        ];
        let stats = compute_statistics(&listings);
        let categorized: usize = stats.by_category.values().sum();
        assert_eq!(categorized + stats.uncategorized, stats.total);
        assert_eq!(stats.uncategorized, 2);
        assert!(!stats.by_category.contains_key(&Category::Unknown));
    }

    #[test]
    fn works_over_a_filtered_view() {
        let listings = vec![
            listing("a", 100_000, 90, Some(Category::A), 200),
            listing("b", 500_000, 30, Some(Category::B), 5),
        ];
        let view = apply_filters(&listings, &FilterSet::new().with_min_score(50));
        let stats = compute_statistics(view);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.average_price, 100_000.0);
    }

    #[test]
    fn serializes_with_dashboard_names() {
        let json = serde_json::to_value(compute_statistics(&[] as &[Listing])).unwrap();
        assert_eq!(json["totalProperties"], 0);
        assert_eq!(json["byCategory"]["A"], 0);
        assert!(json.get("averageDays").is_some());
    }
}
