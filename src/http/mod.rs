//! HTTP Module
//!
//! The catalog's HTTP surface.
//!
//! ## Routes
//! - `GET    /products?limit=N&minPrice=P&maxPrice=P`
//! - `GET    /products/:id`
//! - `POST   /products`
//! - `PUT    /products/:id`
//! - `DELETE /products/:id`
//!
//! Store operations block on the store lock and on file I/O, so handlers
//! run them with `tokio::task::spawn_blocking`. A task that panics is
//! answered with 500.

mod error;
mod routes;
mod server;

pub use error::ApiError;
pub use routes::router;
pub use server::Server;
