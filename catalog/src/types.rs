//! Catalog domain types
//!
//! These mirror the JSON payloads of the product catalog API. Products and
//! categories are immutable once fetched; a re-fetch replaces them wholesale.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// A monetary amount in US cents
///
/// The catalog reports prices as JSON numbers. They are rounded to the
/// nearest cent on decode so cart totals are exact integer sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero dollars
    pub const ZERO: Self = Self(0);

    /// Create an amount from a number of cents
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from a decimal dollar value, rounding to the nearest cent
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Catalog prices are far below i64::MAX cents
    pub fn from_dollars(dollars: f64) -> Self {
        Self((dollars * 100.0).round() as i64)
    }

    /// Amount in cents
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Amount in dollars as a float, for serialization only
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Renders as en-US USD, e.g. `$1,234.50`
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, digit) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        write!(f, "{sign}${grouped}.{cents:02}")
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        if !dollars.is_finite() {
            return Err(serde::de::Error::custom("price must be a finite number"));
        }
        Ok(Self::from_dollars(dollars))
    }
}

/// A product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Server-assigned id
    pub id: u64,
    /// Display label
    pub name: String,
    /// URL-safe name used by the `categorySlug` filter
    pub slug: String,
    /// Category artwork, when the catalog provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned id, unique across the catalog
    pub id: u64,
    /// Product name
    pub title: String,
    /// Unit price
    pub price: Money,
    /// Long-form description
    #[serde(default)]
    pub description: String,
    /// The category this product belongs to
    pub category: Category,
    /// Image URLs, first one is the thumbnail
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// The first image, used as thumbnail
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Price sort direction understood by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Cheapest first
    Asc,
    /// Most expensive first
    Desc,
}

impl SortOrder {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order {0:?}, expected \"asc\" or \"desc\"")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ParseSortOrderError(other.to_string())),
        }
    }
}

/// Query parameters for `GET /products`
///
/// `title` is always sent, an empty title means unfiltered. The other fields
/// are omitted from the query string when `None`. Price bounds are passed
/// through as the raw strings the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductQuery {
    /// Title substring
    pub title: String,
    /// Category slug
    #[serde(rename = "categorySlug", skip_serializing_if = "Option::is_none")]
    pub category_slug: Option<String>,
    /// Lower price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<String>,
    /// Upper price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<String>,
    /// Sort direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl ProductQuery {
    /// Query with no filters
    #[must_use]
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// The query as ordered key/value pairs, exactly as sent on the wire
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("title", self.title.clone())];
        if let Some(slug) = &self.category_slug {
            pairs.push(("categorySlug", slug.clone()));
        }
        if let Some(min) = &self.price_min {
            pairs.push(("price_min", min.clone()));
        }
        if let Some(max) = &self.price_max {
            pairs.push(("price_max", max.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }
}
