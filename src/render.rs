//! Terminal rendering of listings and statistics.

use lisboa_scout::models::{Category, Listing, ScoreTier};
use lisboa_scout::Statistics;

/// Format euros the Portuguese way: "1 450 000 €"
pub fn format_eur(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{} €", grouped)
    } else {
        format!("{} €", grouped)
    }
}

fn category_badge(category: Option<Category>) -> String {
    match category {
        Some(c) if c != Category::Unknown => format!("[{}] {}", c, c.label()),
        _ => "[?] N/A".to_string(),
    }
}

fn score_badge(listing: &Listing) -> String {
    match (listing.opportunity_score, listing.score_tier()) {
        (Some(score), Some(tier)) => {
            let mark = match tier {
                ScoreTier::High => "★",
                ScoreTier::Medium => "☆",
                ScoreTier::Low => "·",
            };
            format!("{} {}/100", mark, score)
        }
        _ => "-/100".to_string(),
    }
}

fn price_text(listing: &Listing) -> String {
    listing
        .price
        .map(format_eur)
        .unwrap_or_else(|| "price on request".to_string())
}

pub fn results_header(shown: usize, total: usize) {
    if shown == total {
        println!("{} opportunities\n", shown);
    } else {
        println!("{} opportunities (of {} total)\n", shown, total);
    }
}

pub fn no_matches() {
    println!("No opportunities found. Try loosening the filters.");
}

pub fn unavailable() {
    println!("Listing data is unavailable right now: no cache, no bundled data, no remote.");
}

/// Grid view: one multi-line card per listing
pub fn card(index: usize, listing: &Listing) {
    println!("{}. {} ({})", index, listing.title, price_text(listing));
    println!("   {}  {}", category_badge(listing.opportunity_category), score_badge(listing));

    let mut facts = Vec::new();
    if let Some(typology) = &listing.typology {
        facts.push(typology.to_string());
    }
    if let Some(area) = listing.area_m2 {
        facts.push(format!("{} m²", area));
    }
    if let Some(ppm) = listing.effective_price_per_m2() {
        facts.push(format!("{}/m²", format_eur(ppm.round() as i64)));
    }
    if !facts.is_empty() {
        println!("   {}", facts.join(" • "));
    }

    let location = listing.location_label();
    if !location.is_empty() {
        println!("   {}", location);
    }
    if let Some(days) = listing.days_on_market {
        println!("   {} days on market", days);
    }
    println!("   ID: {}", listing.id);
    println!();
}

/// List view: one line per listing
pub fn row(listing: &Listing) {
    println!(
        "{:<10} {:>14}  {:<3} {:>6}  {:>5}d  {:<8} {}",
        listing.id,
        price_text(listing),
        listing
            .opportunity_category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string()),
        listing
            .opportunity_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string()),
        listing
            .days_on_market
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        listing
            .typology
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_default(),
        listing.title,
    );
}

/// Detail view for a single listing
pub fn detail(listing: &Listing) {
    println!("{}", listing.title);
    println!("{}", "=".repeat(listing.title.chars().count().max(10)));
    println!("{}  {}", category_badge(listing.opportunity_category), score_badge(listing));
    if let Some(category) = listing.opportunity_category {
        if !category.criteria().is_empty() {
            println!("({})", category.criteria());
        }
    }
    println!();

    println!("Price:          {}", price_text(listing));
    if let (Some(original), Some(reduction)) =
        (listing.original_price, listing.reduction_from_original())
    {
        println!("Original price: {} (-{:.1}%)", format_eur(original), reduction);
    }
    if let Some(ppm) = listing.effective_price_per_m2() {
        println!("Per m²:         {}", format_eur(ppm.round() as i64));
    }
    if let Some(vs) = listing.vs_market {
        println!("vs market:      {:+.1}%", vs);
    }
    if listing.price_drops > 0 {
        println!("Price drops:    {}", listing.price_drops);
    }
    if let Some(days) = listing.days_on_market {
        println!("Days on market: {}", days);
    }
    println!();

    let location = listing.location_label();
    if !location.is_empty() {
        println!("Location:       {}", location);
    }
    if let Some(typology) = &listing.typology {
        println!("Typology:       {}", typology);
    }
    if let Some(area) = listing.area_m2 {
        println!("Area:           {} m²", area);
    }
    if let Some(bedrooms) = listing.bedrooms {
        println!("Bedrooms:       {}", bedrooms);
    }
    if let Some(bathrooms) = listing.bathrooms {
        println!("Bathrooms:      {}", bathrooms);
    }
    if let Some(date) = &listing.auction_date {
        println!("Auction date:   {}", date);
    }
    if let Some(contact) = &listing.contact {
        println!("Contact:        {}", contact);
    }

    if let Some(description) = &listing.description {
        println!("\n{}", description);
    }
    if let Some(notes) = &listing.notes {
        println!("\nNotes: {}", notes);
    }

    println!();
    if let Some(source) = &listing.source {
        println!("Source: {}", source);
    }
    if let Some(url) = &listing.url {
        println!("URL:    {}", url);
    }
    for image in &listing.images {
        println!("Image:  {}", image);
    }
}

/// KPI block plus the category distribution bars
pub fn statistics(stats: &Statistics) {
    println!("Total opportunities: {}", stats.total);
    println!("Average score:       {:.0}/100", stats.average_score);
    println!("Average time listed: {:.0} days", stats.average_days);
    println!("Average price:       {}", format_eur(stats.average_price.round() as i64));
    println!();
    println!("By category:");
    for category in Category::ALL {
        let share = stats.share(category);
        let bar = "█".repeat((share / 5.0).round() as usize);
        println!(
            "  {} - {:<20} {:>4}  {}",
            category,
            category.label(),
            stats.count(category),
            bar
        );
    }
    if stats.uncategorized > 0 {
        println!("  uncategorized            {:>4}", stats.uncategorized);
    }
}
