//! Product Module
//!
//! The record types that flow through the store.
//!
//! ## Types
//! - `Product`: a stored record, always carrying a store-assigned id
//! - `NewProduct`: an add candidate; every field may be missing
//! - `ProductFields`: a full replacement for an existing record
//!
//! ## On-disk shape
//! ```text
//! {
//!   "id": 1,
//!   "title": "producto prueba",
//!   "description": "Este es un producto prueba",
//!   "price": 200,
//!   "thumbnail": "Sin imagen",
//!   "code": "abc123",
//!   "stock": 25
//! }
//! ```

mod record;

pub use record::{NewProduct, Product, ProductFields, REQUIRED_FIELDS};
