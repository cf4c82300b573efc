//! Storefront state and actions

use crate::cart::{Cart, CartLine};
use luxelane_catalog::{Category, Money, Product, ProductQuery, SortOrder};
use luxelane_core::{DateTime, Utc};
use luxelane_macros::Action;

/// Loading/error status of one kind of catalog request
///
/// Each request kind owns its own status; they are never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    /// A request is in flight
    pub loading: bool,
    /// Message of the last failure, cleared when a new request starts
    pub error: Option<String>,
    /// When the last successful response was applied
    pub last_loaded_at: Option<DateTime<Utc>>,
}

impl RequestStatus {
    /// Idle -> Loading (re-entry while loading is allowed)
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Loading -> Idle after a success
    pub fn succeed(&mut self, at: DateTime<Utc>) {
        self.loading = false;
        self.last_loaded_at = Some(at);
    }

    /// Loading -> Idle after a failure
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Not loading and no error
    #[must_use]
    pub const fn is_settled_ok(&self) -> bool {
        !self.loading && self.error.is_none()
    }
}

/// Current filter selections
///
/// Empty strings mean "no filter". Price bounds are kept exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Selected category slug
    pub category_slug: String,
    /// Lower price bound
    pub min_price: String,
    /// Upper price bound
    pub max_price: String,
    /// Search text folded into queries
    pub search_text: String,
    /// Sort direction
    pub sort_order: Option<SortOrder>,
    /// Latest keystroke value still waiting for the debounce
    pub pending_search_text: String,
}

/// Everything the storefront screens read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorefrontState {
    /// Result of the last successful product fetch
    pub all_products: Vec<Product>,
    /// Result of the last successful category fetch
    pub categories: Vec<Category>,
    /// Products related to the one on the detail screen
    pub related_products: Vec<Product>,
    /// Product whose detail screen `related_products` belongs to
    pub related_for: Option<u64>,
    /// Shopping cart
    pub cart: Cart,
    /// Filter selections
    pub filters: FilterState,
    /// Status of product fetches
    pub products_status: RequestStatus,
    /// Status of category fetches
    pub categories_status: RequestStatus,
    /// Status of related product fetches
    pub related_status: RequestStatus,
}

impl StorefrontState {
    /// Cart subtotal, recomputed on every call
    #[must_use]
    pub fn cart_subtotal(&self) -> Money {
        self.cart.subtotal()
    }

    /// Number of units in the cart
    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Cart lines, in no particular order
    pub fn cart_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.cart.lines()
    }

    /// Quantity of a product in the cart, 0 when absent
    #[must_use]
    pub fn cart_quantity(&self, product_id: u64) -> u32 {
        self.cart.quantity(product_id)
    }

    /// The last product fetch succeeded and returned nothing
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.products_status.is_settled_ok() && self.all_products.is_empty()
    }
}

/// Inputs to the storefront reducer
///
/// Intents come from the screens; responses are produced by effects.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum StorefrontAction {
    /// Query the catalog with an explicit parameter set
    #[intent]
    FetchProducts {
        /// Parameters sent to the catalog
        query: ProductQuery,
    },

    /// Load the category list
    #[intent]
    FetchCategories,

    /// Re-run the product query for the current filters
    #[intent]
    Refresh,

    /// First load of a browsing screen: products and categories side by side
    #[intent]
    LoadCatalog,

    /// Load products in the same category as `product`
    #[intent]
    LoadRelated {
        /// Product shown on the detail screen
        product: Product,
    },

    /// Put one unit of a product in the cart
    #[intent]
    AddToCart {
        /// Product to add
        product: Product,
    },

    /// One more unit of a product already in the cart
    #[intent]
    IncrementQuantity {
        /// Product id
        product_id: u64,
    },

    /// One less unit; the line goes away at zero
    #[intent]
    DecrementQuantity {
        /// Product id
        product_id: u64,
    },

    /// Drop a line from the cart
    #[intent]
    RemoveFromCart {
        /// Product id
        product_id: u64,
    },

    /// Empty the cart
    #[intent]
    ClearCart,

    /// Set the lower price bound
    #[intent]
    SetMinPrice {
        /// Raw text as typed
        value: String,
    },

    /// Set the upper price bound
    #[intent]
    SetMaxPrice {
        /// Raw text as typed
        value: String,
    },

    /// Set the sort direction
    #[intent]
    SetSortOrder {
        /// New direction
        order: SortOrder,
    },

    /// Select a category, or `None` for all
    #[intent]
    SelectCategory {
        /// Category slug
        slug: Option<String>,
    },

    /// A keystroke in the search field
    #[intent]
    SearchTextChanged {
        /// Full field contents
        text: String,
    },

    /// The search field has been quiet for the debounce period
    #[response]
    SearchDebounced {
        /// Text to fold into the filters
        text: String,
    },

    /// Product fetch succeeded
    #[response]
    ProductsLoaded {
        /// Fetched products
        products: Vec<Product>,
    },

    /// Product fetch failed
    #[response]
    ProductsFailed {
        /// Failure message
        error: String,
    },

    /// Category fetch succeeded
    #[response]
    CategoriesLoaded {
        /// Fetched categories
        categories: Vec<Category>,
    },

    /// Category fetch failed
    #[response]
    CategoriesFailed {
        /// Failure message
        error: String,
    },

    /// Related product fetch succeeded
    #[response]
    RelatedLoaded {
        /// Product the list is related to
        product_id: u64,
        /// Its category
        category_id: u64,
        /// Unfiltered catalog listing
        products: Vec<Product>,
    },

    /// Related product fetch failed
    #[response]
    RelatedFailed {
        /// Product the request was made for
        product_id: u64,
        /// Failure message
        error: String,
    },
}
