//! `luxelane` - browse the product catalog from the terminal
//!
//! Runs the storefront store against the live catalog, applies the filters
//! given on the command line and prints the matching products followed by the
//! category list.
//!
//! ```text
//! luxelane --search shirt --category clothes --min 10 --max 100 --sort asc
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use luxelane_catalog::{HttpCatalogClient, SortOrder};
use luxelane_core::environment::SystemClock;
use luxelane_storefront::{
    FilterState, StorefrontAction, StorefrontConfig, StorefrontEnvironment, StorefrontReducer,
    StorefrontState, StorefrontStore,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for the catalog before giving up
const RESPONSE_WAIT: Duration = Duration::from_secs(30);

/// Browse the LuxeLane product catalog
#[derive(Parser, Debug)]
#[command(name = "luxelane")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Title substring to search for
    #[arg(long, default_value = "")]
    search: String,

    /// Category slug to filter by
    #[arg(long)]
    category: Option<String>,

    /// Minimum price, passed to the catalog as typed
    #[arg(long, default_value = "")]
    min: String,

    /// Maximum price, passed to the catalog as typed
    #[arg(long, default_value = "")]
    max: String,

    /// Price sort direction
    #[arg(long)]
    sort: Option<SortOrder>,

    /// Catalog API root (overrides LUXELANE_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

impl Cli {
    fn filters(&self) -> FilterState {
        FilterState {
            category_slug: self.category.clone().unwrap_or_default(),
            min_price: self.min.clone(),
            max_price: self.max.clone(),
            search_text: self.search.clone(),
            sort_order: self.sort,
            pending_search_text: self.search.clone(),
        }
    }
}

/// Send `LoadCatalog` and collect the product and category outcomes
async fn load_catalog(store: &StorefrontStore) -> Result<(StorefrontAction, StorefrontAction)> {
    let mut outcomes = store.subscribe_actions();
    store.send(StorefrontAction::LoadCatalog).await?;

    let mut products = None;
    let mut categories = None;
    tokio::time::timeout(RESPONSE_WAIT, async {
        while products.is_none() || categories.is_none() {
            match outcomes.recv().await {
                Ok(
                    action @ (StorefrontAction::ProductsLoaded { .. }
                    | StorefrontAction::ProductsFailed { .. }),
                ) => products = Some(action),
                Ok(
                    action @ (StorefrontAction::CategoriesLoaded { .. }
                    | StorefrontAction::CategoriesFailed { .. }),
                ) => categories = Some(action),
                Ok(_) | Err(RecvError::Lagged(_)) => {},
                Err(RecvError::Closed) => break,
            }
        }
    })
    .await
    .context("timed out waiting for the catalog")?;

    match (products, categories) {
        (Some(products), Some(categories)) => Ok((products, categories)),
        _ => bail!("store stopped before the catalog loaded"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luxelane=info,luxelane_storefront=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = StorefrontConfig::from_env().context("invalid configuration")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
        config.validate().context("invalid --base-url")?;
    }
    tracing::info!(base_url = %config.catalog.base_url, "Starting storefront");

    let env = StorefrontEnvironment::new(
        Arc::new(HttpCatalogClient::new(&config.catalog)),
        Arc::new(SystemClock),
        config.search_debounce,
    );
    let initial = StorefrontState {
        filters: cli.filters(),
        ..StorefrontState::default()
    };
    let store = StorefrontStore::new(initial, StorefrontReducer::new(), env);

    let (products, categories) = load_catalog(&store).await?;
    if let StorefrontAction::ProductsFailed { error } = products {
        bail!("could not load products: {error}");
    }

    store
        .state(|state| {
            if state.is_empty_result() {
                println!("No products match these filters.");
            }
            for product in &state.all_products {
                println!(
                    "{:>6}  {:>12}  {}  [{}]",
                    product.id, product.price.to_string(), product.title, product.category.name
                );
            }
        })
        .await;

    match categories {
        StorefrontAction::CategoriesFailed { error } => {
            tracing::warn!(%error, "Could not load categories");
        },
        _ => {
            let names = store
                .state(|state| {
                    state
                        .categories
                        .iter()
                        .map(|c| format!("{} ({})", c.name, c.slug))
                        .collect::<Vec<_>>()
                })
                .await;
            println!("\nCategories: {}", names.join(", "));
        },
    }

    store
        .shutdown(Duration::from_secs(5))
        .await
        .context("store did not shut down cleanly")?;
    Ok(())
}
