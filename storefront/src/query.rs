//! Query composition
//!
//! Turns the current filter selections into the parameter record sent to the
//! catalog. Search text reaches the query only through the debounce: see
//! [`SEARCH_DEBOUNCE`].

use crate::types::FilterState;
use luxelane_catalog::ProductQuery;
use luxelane_core::effect::EffectId;

/// Cancellation id of the pending search debounce timer
pub const SEARCH_DEBOUNCE: EffectId = EffectId::new("storefront.search-debounce");

/// Compose the product query for `filters`
///
/// `title` is always present. Category and price bounds are included only
/// when non-empty, `sort` only when set. Pending (not yet debounced) search
/// text is ignored.
#[must_use]
pub fn compose(filters: &FilterState) -> ProductQuery {
    ProductQuery {
        title: filters.search_text.clone(),
        category_slug: non_empty(&filters.category_slug),
        price_min: non_empty(&filters.min_price),
        price_max: non_empty(&filters.max_price),
        sort: filters.sort_order,
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
