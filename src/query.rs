//! Listing query
//!
//! Price-range filtering and truncation applied to a catalog listing.
//!
//! Query-string values are parsed leniently: leading whitespace is skipped
//! and the longest numeric prefix is used (`"12abc"` is 12). A value with no
//! numeric prefix is ignored, as if the parameter were absent.

use serde::Deserialize;

use crate::product::Product;

/// Raw `GET /products` query-string parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub limit: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// Parsed listing query
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ListQuery {
    /// Keep at most this many records
    pub limit: Option<usize>,

    /// Drop records priced below this
    pub min_price: Option<f64>,

    /// Drop records priced above this
    pub max_price: Option<f64>,
}

impl ListQuery {
    /// Build from raw parameter values
    ///
    /// A negative limit is ignored.
    pub fn parse(limit: Option<&str>, min_price: Option<&str>, max_price: Option<&str>) -> Self {
        Self {
            limit: limit
                .and_then(parse_int_prefix)
                .and_then(|n| usize::try_from(n).ok()),
            min_price: min_price.and_then(parse_number_prefix),
            max_price: max_price.and_then(parse_number_prefix),
        }
    }

    /// Filter by price range, then keep the first `limit` survivors
    ///
    /// Input order is preserved.
    pub fn apply<I>(&self, products: I) -> Vec<Product>
    where
        I: IntoIterator<Item = Product>,
    {
        let matching = products.into_iter().filter(|p| self.matches(p));

        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    /// Whether `product` falls inside the price range
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}

impl From<&ListParams> for ListQuery {
    fn from(params: &ListParams) -> Self {
        Self::parse(
            params.limit.as_deref(),
            params.min_price.as_deref(),
            params.max_price.as_deref(),
        )
    }
}

/// Parse the leading integer of `s`: `"  42px"` → 42, `"-3"` → -3, `"x"` → None
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let end = signed_digits_end(s);
    s[..end].parse().ok()
}

/// Parse the leading decimal number of `s`: `"49.5usd"` → 49.5, `"."` → None
pub fn parse_number_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = signed_digits_end(s);

    let rest = &s[end..];
    if let Some(fraction) = rest.strip_prefix('.') {
        let digits = fraction.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            end += 1 + digits;
        }
    }

    s[..end].parse().ok()
}

/// Byte length of an optional sign followed by ASCII digits at the start of `s`
fn signed_digits_end(s: &str) -> usize {
    let sign = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        // A bare sign is not a number; leave `end` at zero so parsing fails
        0
    } else {
        sign + digits
    }
}
