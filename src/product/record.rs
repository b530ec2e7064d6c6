//! Product records
//!
//! Serde-backed record types plus the required-field check used by `add`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{CatalogError, Result};

/// Fields every add candidate must carry, in report order
pub const REQUIRED_FIELDS: [&str; 6] = ["title", "description", "price", "thumbnail", "code", "stock"];

/// A stored product
///
/// Field order here is the field order written to the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub stock: u64,
}

impl Product {
    /// Build a stored record from an id and its fields
    pub fn from_fields(id: u64, fields: ProductFields) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            price: fields.price,
            thumbnail: fields.thumbnail,
            code: fields.code,
            stock: fields.stock,
        }
    }

    /// Replace every field except `id`
    pub fn replace(&mut self, fields: ProductFields) {
        *self = Self::from_fields(self.id, fields);
    }

    /// Copy of the non-id fields
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            thumbnail: self.thumbnail.clone(),
            code: self.code.clone(),
            stock: self.stock,
        }
    }
}

/// Every non-id field of a product
///
/// Used as the replacement in `update`. Presence is enforced by the type;
/// the values themselves are taken as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub stock: u64,
}

/// A candidate for `add`
///
/// Any `id` the caller sends is not part of the type and is dropped on
/// deserialization. A field holding a value of the wrong JSON type (a
/// string price, a negative or fractional stock, a numeric title)
/// deserializes as `None`, so `validate` reports it with the missing fields
/// instead of the body failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "loose_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "loose_stock")]
    pub stock: Option<u64>,
}

impl NewProduct {
    /// Check that every required field is present and non-empty
    ///
    /// Empty text, a zero, negative or non-finite price, and a zero stock
    /// count as missing. All missing fields are reported together.
    pub fn validate(self) -> Result<ProductFields> {
        let title = self.title.filter(|s| !s.is_empty());
        let description = self.description.filter(|s| !s.is_empty());
        let price = self.price.filter(|p| p.is_finite() && *p > 0.0);
        let thumbnail = self.thumbnail.filter(|s| !s.is_empty());
        let code = self.code.filter(|s| !s.is_empty());
        let stock = self.stock.filter(|n| *n > 0);

        let present = [
            title.is_some(),
            description.is_some(),
            price.is_some(),
            thumbnail.is_some(),
            code.is_some(),
            stock.is_some(),
        ];

        match (title, description, price, thumbnail, code, stock) {
            (Some(title), Some(description), Some(price), Some(thumbnail), Some(code), Some(stock)) => {
                Ok(ProductFields { title, description, price, thumbnail, code, stock })
            }
            _ => {
                let missing = REQUIRED_FIELDS
                    .iter()
                    .zip(present)
                    .filter(|(_, ok)| !ok)
                    .map(|(name, _)| *name)
                    .collect();
                Err(CatalogError::Validation(missing))
            }
        }
    }
}

impl From<ProductFields> for NewProduct {
    fn from(fields: ProductFields) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
            price: Some(fields.price),
            thumbnail: Some(fields.thumbnail),
            code: Some(fields.code),
            stock: Some(fields.stock),
        }
    }
}

fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn loose_price<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}

fn loose_stock<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        _ => None,
    })
}

/// Write whole prices without a fractional part (`200`, not `200.0`)
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    if price.is_finite() && price.fract() == 0.0 && price.abs() < MAX_EXACT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}
