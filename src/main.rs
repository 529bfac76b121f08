mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lisboa_scout::filters::{apply_filters, compute_statistics, curate, sort_listings, SortOrder};
use lisboa_scout::sources::RemoteSource;
use lisboa_scout::storage::FileStorage;
use lisboa_scout::{Category, Config, DataOrigin, FilterSet, ListingStore, Typology};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lisboa-scout")]
#[command(about = "Lisbon real-estate opportunities: filter, rank and inspect listings")]
#[command(version)]
struct Cli {
    /// Fetch the latest snapshot before showing anything
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// List listings matching the filters (default)
    List {
        #[arg(long, value_enum, default_value_t = SortArg::Score)]
        sort: SortArg,

        #[arg(long, value_enum, default_value_t = ViewArg::Grid)]
        view: ViewArg,

        /// Show at most this many listings
        #[arg(long)]
        limit: Option<usize>,

        /// Print the matching listings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summary statistics for the matching listings
    Stats {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Full detail for one listing
    Show {
        /// Listing id
        id: String,
    },

    /// Top picks: score >= 70, best first
    Curated {
        #[arg(long, default_value_t = lisboa_scout::filters::DEFAULT_CURATED_LIMIT)]
        limit: usize,
    },

    /// Delete the cached snapshot
    ClearCache,
}

#[derive(Args)]
struct FilterArgs {
    /// Opportunity category (A, B, C or D)
    #[arg(long, global = true, value_parser = parse_category)]
    category: Option<Category>,

    /// Minimum opportunity score
    #[arg(long, global = true, default_value_t = 0)]
    min_score: i32,

    #[arg(long, global = true)]
    min_days: Option<i64>,

    #[arg(long, global = true)]
    max_days: Option<i64>,

    /// Only listings at least this many days on the market (90, 180, 365...)
    #[arg(long, global = true, conflicts_with_all = ["min_days", "max_days"])]
    older_than: Option<i64>,

    /// Typology (T0..T4, T5+, Moradia)
    #[arg(long, global = true)]
    typology: Option<String>,

    /// Parish, case-insensitive substring
    #[arg(long, global = true)]
    parish: Option<String>,

    #[arg(long, global = true)]
    min_price: Option<i64>,

    #[arg(long, global = true)]
    max_price: Option<i64>,

    /// Free text matched against title and location
    #[arg(long, short = 'q', global = true)]
    query: Option<String>,
}

fn parse_category(raw: &str) -> std::result::Result<Category, String> {
    raw.parse()
}

impl FilterArgs {
    fn to_filter_set(&self) -> FilterSet {
        let filters = FilterSet {
            category: self.category,
            min_score: self.min_score,
            min_days: self.min_days,
            max_days: self.max_days,
            typology: self.typology.as_deref().map(|t| Typology::from(t.to_string())),
            parish: self.parish.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            query: self.query.clone(),
        };
        match self.older_than {
            Some(days) => filters.older_than(days),
            None => filters,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Score,
    PriceAsc,
    PriceDesc,
    Days,
    PricePerM2,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Score => SortOrder::Score,
            SortArg::PriceAsc => SortOrder::PriceAsc,
            SortArg::PriceDesc => SortOrder::PriceDesc,
            SortArg::Days => SortOrder::DaysOnMarket,
            SortArg::PricePerM2 => SortOrder::PricePerM2,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Grid,
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only rendered output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    info!("🏠 Lisboa Scout");

    let storage = FileStorage::open(&config.cache_dir)
        .with_context(|| format!("Failed to open cache dir {}", config.cache_dir.display()))?;
    let remote = RemoteSource::new(&config)?;
    let store = ListingStore::new(Arc::new(storage), Arc::new(remote));

    let command = cli.command.unwrap_or(Commands::List {
        sort: SortArg::Score,
        view: ViewArg::Grid,
        limit: None,
        json: false,
    });

    if let Commands::ClearCache = command {
        store.clear_cache().context("Failed to clear cache")?;
        info!("🗑️  Cache cleared");
        return Ok(());
    }

    let mut origin = None;
    if cli.refresh {
        let outcome = store.refresh().await;
        if outcome.is_updated() {
            origin = Some(DataOrigin::Remote);
        } else {
            warn!("Using previously available data");
        }
    }

    let origin = match origin {
        Some(origin) => origin,
        None => {
            let report = store.load().await;
            for issue in &report.issues {
                warn!("{}", issue);
            }
            report.origin
        }
    };

    let listings = store.current();
    match store.last_sync_time() {
        Some(at) => info!("Data source: {:?}, last sync {}", origin, at.to_rfc3339()),
        None => info!("Data source: {:?}, never synced", origin),
    }

    if origin == DataOrigin::Unavailable {
        render::unavailable();
        return Ok(());
    }

    let filters = cli.filters.to_filter_set();

    match command {
        Commands::List {
            sort,
            view,
            limit,
            json,
        } => {
            let mut view_listings = apply_filters(&listings, &filters);
            sort_listings(&mut view_listings, sort.into());
            let matched = view_listings.len();
            if let Some(limit) = limit {
                view_listings.truncate(limit);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&view_listings)?);
                return Ok(());
            }

            render::results_header(matched, listings.len());
            if view_listings.is_empty() {
                render::no_matches();
            }
            for (i, listing) in view_listings.iter().enumerate() {
                match view {
                    ViewArg::Grid => render::card(i + 1, listing),
                    ViewArg::List => render::row(listing),
                }
            }
        }
        Commands::Stats { json } => {
            let stats = compute_statistics(apply_filters(&listings, &filters));
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                render::statistics(&stats);
            }
        }
        Commands::Show { id } => match listings.iter().find(|l| l.id == id) {
            Some(listing) => render::detail(listing),
            None => anyhow::bail!("No listing with id '{}'", id),
        },
        Commands::Curated { limit } => {
            let picks = curate(apply_filters(&listings, &filters), limit);
            render::results_header(picks.len(), listings.len());
            if picks.is_empty() {
                render::no_matches();
            }
            for (i, listing) in picks.iter().enumerate() {
                render::card(i + 1, listing);
            }
        }
        // Handled before loading
        Commands::ClearCache => {}
    }

    Ok(())
}
