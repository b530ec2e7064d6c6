//! Listing snapshot returned by `CatalogStore::list`

use serde::Serialize;

use crate::product::Product;

/// An ordered snapshot of the catalog
///
/// Owns its records, so it can be iterated as many times as needed and is
/// unaffected by later store operations. Each `list()` call builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Listing {
    products: Vec<Product>,
}

impl Listing {
    pub(crate) fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Iterate the records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.products
    }

    pub fn into_vec(self) -> Vec<Product> {
        self.products
    }
}

impl IntoIterator for Listing {
    type Item = Product;
    type IntoIter = std::vec::IntoIter<Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.into_iter()
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}
