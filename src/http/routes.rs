//! Route handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::backend::Backend;
use crate::product::{NewProduct, Product, ProductFields};
use crate::query::{parse_int_prefix, ListParams, ListQuery};
use crate::store::CatalogStore;

use super::ApiError;

type S<B> = Arc<CatalogStore<B>>;

/// Build the catalog router over `store`
pub fn router<B: Backend + 'static>(store: S<B>) -> Router {
    Router::new()
        .route("/products", get(list::<B>).post(create::<B>))
        .route(
            "/products/:id",
            get(get_one::<B>).put(replace::<B>).delete(remove::<B>),
        )
        .with_state(store)
}

async fn list<B: Backend + 'static>(
    State(store): State<S<B>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let query = ListQuery::from(&params);
    tracing::debug!("GET /products {:?}", query);

    let listing = blocking(store, |store| store.list()).await?;
    Ok(Json(query.apply(listing)))
}

async fn get_one<B: Backend + 'static>(
    State(store): State<S<B>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id)?;
    tracing::debug!("GET /products/{}", id);

    let product = blocking(store, move |store| store.get_by_id(id)).await?;
    Ok(Json(product))
}

async fn create<B: Backend + 'static>(
    State(store): State<S<B>>,
    Json(candidate): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    tracing::debug!("POST /products");

    let product = blocking(store, move |store| store.add(candidate)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn replace<B: Backend + 'static>(
    State(store): State<S<B>>,
    Path(raw_id): Path<String>,
    Json(fields): Json<ProductFields>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id)?;
    tracing::debug!("PUT /products/{}", id);

    let product = blocking(store, move |store| store.update(id, fields)).await?;
    Ok(Json(product))
}

async fn remove<B: Backend + 'static>(
    State(store): State<S<B>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id)?;
    tracing::debug!("DELETE /products/{}", id);

    let product = blocking(store, move |store| store.delete(id)).await?;
    Ok(Json(product))
}

/// Run a store operation on the blocking pool
///
/// Every operation waits on the store lock and does file I/O, so it must not
/// run on a runtime worker.
async fn blocking<B, T, F>(store: S<B>, op: F) -> Result<T, ApiError>
where
    B: Backend + 'static,
    T: Send + 'static,
    F: FnOnce(&CatalogStore<B>) -> crate::Result<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || op(&store)).await?;
    Ok(result?)
}

/// Leading-integer parse of the `:id` segment; no record has a non-numeric id
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    parse_int_prefix(raw)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| ApiError::UnknownId(raw.to_string()))
}
