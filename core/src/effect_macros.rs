//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants from
//! reducers, particularly async catalog calls and debounced timers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use luxelane_core::async_effect;
///
/// async_effect! {
///     match client.fetch_all_products(query).await {
///         Ok(products) => Some(StorefrontAction::ProductsLoaded { products }),
///         Err(error) => Some(StorefrontAction::ProductsFailed { error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use luxelane_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(30),
///     action: StorefrontAction::Refresh
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create a debounced action: a delay that restarts whenever it is scheduled
/// again under the same id before it fires
///
/// # Example
///
/// ```rust,ignore
/// use luxelane_core::debounce;
/// use luxelane_core::effect::EffectId;
/// use std::time::Duration;
///
/// const SEARCH: EffectId = EffectId::new("search-debounce");
///
/// debounce! {
///     id: SEARCH,
///     duration: Duration::from_millis(500),
///     action: StorefrontAction::SearchDebounced { text }
/// }
/// ```
#[macro_export]
macro_rules! debounce {
    (
        id: $id:expr,
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($crate::delay! {
                duration: $duration,
                action: $action
            }),
        }
    };
}
