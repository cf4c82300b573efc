//! # LuxeLane Storefront
//!
//! State-and-query core of the LuxeLane mobile storefront.
//!
//! - [`StorefrontState`]: products, categories, cart, filters and per-request status
//! - [`cart`]: add/increment/decrement/remove/clear on a map keyed by product id
//! - [`query`]: composes catalog query parameters from the filters, with a
//!   debounced search field
//! - [`StorefrontReducer`]: turns intents into state changes and catalog effects
//!
//! ## Example
//!
//! ```no_run
//! use luxelane_catalog::HttpCatalogClient;
//! use luxelane_core::environment::SystemClock;
//! use luxelane_storefront::{
//!     StorefrontAction, StorefrontConfig, StorefrontEnvironment, StorefrontReducer,
//!     StorefrontState, StorefrontStore,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorefrontConfig::from_env()?;
//! let env = StorefrontEnvironment::new(
//!     Arc::new(HttpCatalogClient::new(&config.catalog)),
//!     Arc::new(SystemClock),
//!     config.search_debounce,
//! );
//! let store = StorefrontStore::new(StorefrontState::default(), StorefrontReducer::new(), env);
//!
//! store.send(StorefrontAction::SearchTextChanged { text: "shirt".into() }).await?;
//! let subtotal = store.state(|s| s.cart_subtotal()).await;
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod config;
pub mod query;
pub mod reducer;
pub mod types;

pub use cart::{Cart, CartLine};
pub use config::{ConfigError, StorefrontConfig};
pub use query::{compose, SEARCH_DEBOUNCE};
pub use reducer::{StorefrontEnvironment, StorefrontReducer};
pub use types::{FilterState, RequestStatus, StorefrontAction, StorefrontState};

/// Store running the storefront reducer
pub type StorefrontStore = luxelane_runtime::Store<
    StorefrontState,
    StorefrontAction,
    StorefrontEnvironment,
    StorefrontReducer,
>;
