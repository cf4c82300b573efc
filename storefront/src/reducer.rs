//! Storefront reducer
//!
//! Cart and filter intents are applied synchronously. Catalog requests are
//! returned as effects whose outcome comes back as a response action; a
//! failure only ever lands in the matching [`RequestStatus`] and previously
//! fetched data stays visible.
//!
//! Overlapping product fetches are neither cancelled nor sequenced: whichever
//! response arrives last is what the state shows.
//!
//! [`RequestStatus`]: crate::types::RequestStatus

use crate::query::{compose, SEARCH_DEBOUNCE};
use crate::types::{StorefrontAction, StorefrontState};
use luxelane_catalog::{CatalogClient, Product, ProductQuery};
use luxelane_core::effect::Effect;
use luxelane_core::environment::Clock;
use luxelane_core::reducer::Reducer;
use luxelane_core::{async_effect, debounce, smallvec, SmallVec};
use std::sync::Arc;
use std::time::Duration;

/// Environment for the storefront containing dependencies
#[derive(Clone)]
pub struct StorefrontEnvironment {
    /// Product catalog
    pub catalog: Arc<dyn CatalogClient>,
    /// Clock for `last_loaded_at` stamps
    pub clock: Arc<dyn Clock>,
    /// Quiet period before search text is folded into the filters
    pub search_debounce: Duration,
}

impl StorefrontEnvironment {
    /// Creates a new storefront environment
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        clock: Arc<dyn Clock>,
        search_debounce: Duration,
    ) -> Self {
        Self {
            catalog,
            clock,
            search_debounce,
        }
    }
}

/// Reducer for the storefront state
#[derive(Clone, Debug, Default)]
pub struct StorefrontReducer;

impl StorefrontReducer {
    /// Creates a new storefront reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Mark products as loading and query the catalog
    fn fetch_products(
        state: &mut StorefrontState,
        env: &StorefrontEnvironment,
        query: ProductQuery,
    ) -> Effect<StorefrontAction> {
        tracing::debug!(?query, "Fetching products");
        state.products_status.begin();

        let catalog = Arc::clone(&env.catalog);
        async_effect! {
            match catalog.fetch_all_products(query).await {
                Ok(products) => Some(StorefrontAction::ProductsLoaded { products }),
                Err(error) => {
                    tracing::warn!(%error, "Product fetch failed");
                    Some(StorefrontAction::ProductsFailed {
                        error: error.to_string(),
                    })
                },
            }
        }
    }

    /// Re-query with the current filters
    fn refetch(state: &mut StorefrontState, env: &StorefrontEnvironment) -> Effect<StorefrontAction> {
        let query = compose(&state.filters);
        Self::fetch_products(state, env, query)
    }

    fn fetch_categories(
        state: &mut StorefrontState,
        env: &StorefrontEnvironment,
    ) -> Effect<StorefrontAction> {
        tracing::debug!("Fetching categories");
        state.categories_status.begin();

        let catalog = Arc::clone(&env.catalog);
        async_effect! {
            match catalog.fetch_category_list(None).await {
                Ok(categories) => Some(StorefrontAction::CategoriesLoaded { categories }),
                Err(error) => {
                    tracing::warn!(%error, "Category fetch failed");
                    Some(StorefrontAction::CategoriesFailed {
                        error: error.to_string(),
                    })
                },
            }
        }
    }

    fn fetch_related(
        state: &mut StorefrontState,
        env: &StorefrontEnvironment,
        product: &Product,
    ) -> Effect<StorefrontAction> {
        tracing::debug!(product_id = product.id, "Fetching related products");
        if state.related_for != Some(product.id) {
            state.related_products.clear();
            state.related_for = Some(product.id);
        }
        state.related_status.begin();

        let catalog = Arc::clone(&env.catalog);
        let product_id = product.id;
        let category_id = product.category.id;
        async_effect! {
            match catalog.fetch_all_products(ProductQuery::unfiltered()).await {
                Ok(products) => Some(StorefrontAction::RelatedLoaded {
                    product_id,
                    category_id,
                    products,
                }),
                Err(error) => {
                    tracing::warn!(%error, product_id, "Related product fetch failed");
                    Some(StorefrontAction::RelatedFailed {
                        product_id,
                        error: error.to_string(),
                    })
                },
            }
        }
    }
}

impl Reducer for StorefrontReducer {
    type State = StorefrontState;
    type Action = StorefrontAction;
    type Environment = StorefrontEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(action = action.name(), "Reducing storefront action");

        match action {
            // Catalog requests
            StorefrontAction::FetchProducts { query } => {
                smallvec![Self::fetch_products(state, env, query)]
            },
            StorefrontAction::Refresh => smallvec![Self::refetch(state, env)],
            StorefrontAction::LoadCatalog => smallvec![Effect::merge(vec![
                Self::refetch(state, env),
                Self::fetch_categories(state, env),
            ])],
            StorefrontAction::ProductsLoaded { products } => {
                tracing::debug!(count = products.len(), "Products loaded");
                state.all_products = products;
                state.products_status.succeed(env.clock.now());
                smallvec![Effect::None]
            },
            StorefrontAction::ProductsFailed { error } => {
                state.products_status.fail(error);
                smallvec![Effect::None]
            },
            StorefrontAction::FetchCategories => smallvec![Self::fetch_categories(state, env)],
            StorefrontAction::CategoriesLoaded { categories } => {
                tracing::debug!(count = categories.len(), "Categories loaded");
                state.categories = categories;
                state.categories_status.succeed(env.clock.now());
                smallvec![Effect::None]
            },
            StorefrontAction::CategoriesFailed { error } => {
                state.categories_status.fail(error);
                smallvec![Effect::None]
            },
            StorefrontAction::LoadRelated { product } => {
                smallvec![Self::fetch_related(state, env, &product)]
            },
            // Responses for a product the detail screen has moved on from are dropped
            StorefrontAction::RelatedLoaded { product_id, .. }
            | StorefrontAction::RelatedFailed { product_id, .. }
                if state.related_for != Some(product_id) =>
            {
                tracing::debug!(product_id, "Ignoring stale related products");
                smallvec![Effect::None]
            },
            StorefrontAction::RelatedLoaded {
                product_id,
                category_id,
                products,
            } => {
                state.related_products = products
                    .into_iter()
                    .filter(|p| p.category.id == category_id && p.id != product_id)
                    .collect();
                state.related_status.succeed(env.clock.now());
                smallvec![Effect::None]
            },
            StorefrontAction::RelatedFailed { error, .. } => {
                state.related_status.fail(error);
                smallvec![Effect::None]
            },

            // Cart
            StorefrontAction::AddToCart { product } => {
                state.cart.add(product);
                smallvec![Effect::None]
            },
            StorefrontAction::IncrementQuantity { product_id } => {
                state.cart.increment(product_id);
                smallvec![Effect::None]
            },
            StorefrontAction::DecrementQuantity { product_id } => {
                state.cart.decrement(product_id);
                smallvec![Effect::None]
            },
            StorefrontAction::RemoveFromCart { product_id } => {
                state.cart.remove(product_id);
                smallvec![Effect::None]
            },
            StorefrontAction::ClearCart => {
                state.cart.clear();
                smallvec![Effect::None]
            },

            // Filters: an unchanged value issues no request
            StorefrontAction::SetMinPrice { value } => {
                if state.filters.min_price == value {
                    return smallvec![Effect::None];
                }
                state.filters.min_price = value;
                smallvec![Self::refetch(state, env)]
            },
            StorefrontAction::SetMaxPrice { value } => {
                if state.filters.max_price == value {
                    return smallvec![Effect::None];
                }
                state.filters.max_price = value;
                smallvec![Self::refetch(state, env)]
            },
            StorefrontAction::SetSortOrder { order } => {
                if state.filters.sort_order == Some(order) {
                    return smallvec![Effect::None];
                }
                state.filters.sort_order = Some(order);
                smallvec![Self::refetch(state, env)]
            },
            StorefrontAction::SelectCategory { slug } => {
                let slug = slug.unwrap_or_default();
                let changed =
                    state.filters.category_slug != slug || !state.filters.search_text.is_empty();

                state.filters.category_slug = slug;
                state.filters.search_text.clear();
                state.filters.pending_search_text.clear();

                if changed {
                    smallvec![Effect::Cancel(SEARCH_DEBOUNCE), Self::refetch(state, env)]
                } else {
                    smallvec![Effect::Cancel(SEARCH_DEBOUNCE)]
                }
            },
            StorefrontAction::SearchTextChanged { text } => {
                state.filters.pending_search_text.clone_from(&text);
                smallvec![debounce! {
                    id: SEARCH_DEBOUNCE,
                    duration: env.search_debounce,
                    action: StorefrontAction::SearchDebounced { text }
                }]
            },
            StorefrontAction::SearchDebounced { text } => {
                if state.filters.search_text == text {
                    return smallvec![Effect::None];
                }
                tracing::debug!(%text, "Search text committed");
                state.filters.search_text = text;
                smallvec![Self::refetch(state, env)]
            },
        }
    }
}
