//! HTTP tests for the catalog server
//!
//! Each test serves a store on 127.0.0.1:0 and talks to it with reqwest.

use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use catalog::backend::{Backend, MemoryBackend};
use catalog::http::Server;
use catalog::{CatalogError, CatalogStore, Config, NewProduct, Product};
use parking_lot::Mutex;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// =============================================================================
// Helper Functions
// =============================================================================

type Store = Arc<CatalogStore<MemoryBackend>>;

fn store_with_prices(prices: &[f64]) -> (MemoryBackend, Store) {
    let backend = MemoryBackend::new();
    let store = CatalogStore::with_backend(backend.clone());
    for (i, &price) in prices.iter().enumerate() {
        store
            .add(NewProduct {
                title: Some(format!("Producto {}", i + 1)),
                description: Some(format!("Descripción del producto {}", i + 1)),
                price: Some(price),
                thumbnail: Some(format!("thumbnail{}.jpg", i + 1)),
                code: Some(format!("CODE{}", i + 1)),
                stock: Some(5),
            })
            .unwrap();
    }
    (backend, Arc::new(store))
}

/// Serve `store` in the background and return its base URL
async fn spawn_server<B: Backend + 'static>(store: Arc<CatalogStore<B>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = Server::new(Config::default(), store);
    tokio::spawn(async move {
        server
            .serve(listener, std::future::pending())
            .await
            .unwrap();
    });

    format!("http://{}", addr)
}

/// Backend whose writes wait until the test releases them
///
/// Each write reports on `entered` and then waits up to five seconds on
/// `release`; a write that is never released fails.
struct GatedBackend {
    inner: MemoryBackend,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl Backend for GatedBackend {
    fn read(&self) -> catalog::Result<Option<Bytes>> {
        self.inner.read()
    }

    fn write(&self, data: &[u8]) -> catalog::Result<()> {
        let _ = self.entered.lock().send(());
        self.release
            .lock()
            .recv_timeout(Duration::from_secs(5))
            .map_err(|e| CatalogError::Io(io::Error::new(io::ErrorKind::TimedOut, e)))?;
        self.inner.write(data)
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

fn product_body(code: &str, price: f64) -> serde_json::Value {
    json!({
        "title": "t",
        "description": "d",
        "price": price,
        "thumbnail": "th",
        "code": code,
        "stock": 25
    })
}

// =============================================================================
// GET /products
// =============================================================================

#[tokio::test]
async fn test_list_all_products() {
    let (_backend, store) = store_with_prices(&[10.0, 20.0, 30.0]);
    let base = spawn_server(store).await;

    let resp = reqwest::get(format!("{}/products", base)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let products: Vec<Product> = resp.json().await.unwrap();
    let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_list_with_price_range_and_limit() {
    let (_backend, store) = store_with_prices(&[10.0, 60.0, 70.0, 90.0, 110.0]);
    let base = spawn_server(store).await;

    let resp = reqwest::get(format!("{}/products?minPrice=50&maxPrice=100&limit=2", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let products: Vec<Product> = resp.json().await.unwrap();
    let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![60.0, 70.0]);
}

#[tokio::test]
async fn test_list_ignores_invalid_parameters() {
    let (_backend, store) = store_with_prices(&[10.0, 20.0]);
    let base = spawn_server(store).await;

    let resp = reqwest::get(format!("{}/products?limit=abc&minPrice=&maxPrice=x", base))
        .await
        .unwrap();

    let products: Vec<Product> = resp.json().await.unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_list_empty_store() {
    let (_backend, store) = store_with_prices(&[]);
    let base = spawn_server(store).await;

    let resp = reqwest::get(format!("{}/products", base)).await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "[]");
}

#[tokio::test]
async fn test_list_broken_file_is_500_with_error_text() {
    let (backend, store) = store_with_prices(&[10.0]);
    let base = spawn_server(store).await;
    backend.set_contents("{ broken");

    let resp = reqwest::get(format!("{}/products", base)).await.unwrap();

    assert_eq!(resp.status(), 500);
    assert!(resp.text().await.unwrap().starts_with("Failed to parse catalog file"));
}

// =============================================================================
// GET /products/:id
// =============================================================================

#[tokio::test]
async fn test_get_product_by_id() {
    let (_backend, store) = store_with_prices(&[10.0, 20.0]);
    let base = spawn_server(store).await;

    let resp = reqwest::get(format!("{}/products/2", base)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let product: Product = resp.json().await.unwrap();
    assert_eq!(product.id, 2);
    assert_eq!(product.code, "CODE2");
}

#[tokio::test]
async fn test_get_missing_product_is_404() {
    let (_backend, store) = store_with_prices(&[10.0]);
    let base = spawn_server(store).await;

    let resp = reqwest::get(format!("{}/products/99", base)).await.unwrap();

    assert_eq!(resp.status(), 404);
    assert_eq!(resp.text().await.unwrap(), "Product 99 not found");
}

#[tokio::test]
async fn test_get_non_numeric_id_is_404() {
    let (_backend, store) = store_with_prices(&[10.0]);
    let base = spawn_server(store).await;

    let resp = reqwest::get(format!("{}/products/abc", base)).await.unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_get_id_uses_leading_digits() {
    let (_backend, store) = store_with_prices(&[10.0]);
    let base = spawn_server(store).await;

    let resp = reqwest::get(format!("{}/products/1abc", base)).await.unwrap();

    assert_eq!(resp.status(), 200);
    let product: Product = resp.json().await.unwrap();
    assert_eq!(product.id, 1);
}

// =============================================================================
// POST / PUT / DELETE
// =============================================================================

#[tokio::test]
async fn test_create_product() {
    let (backend, store) = store_with_prices(&[]);
    let base = spawn_server(store).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/products", base))
        .json(&product_body("abc123", 200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let product: Product = resp.json().await.unwrap();
    assert_eq!(product.id, 1);
    assert!(backend.contents().is_some());
}

#[tokio::test]
async fn test_create_wrong_value_types_is_400() {
    let (_backend, store) = store_with_prices(&[]);
    let base = spawn_server(store.clone()).await;

    let mut body = product_body("abc", 1.0);
    body["price"] = json!("abc");
    body["stock"] = json!(-3);
    body["title"] = json!(12);

    let resp = reqwest::Client::new()
        .post(format!("{}/products", base))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    assert_eq!(
        resp.text().await.unwrap(),
        "Missing required fields: title, price, stock"
    );
    assert!(store.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_duplicate_code_is_409() {
    let (_backend, store) = store_with_prices(&[10.0]);
    let base = spawn_server(store).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/products", base))
        .json(&product_body("CODE1", 5.0))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_create_missing_fields_is_400() {
    let (_backend, store) = store_with_prices(&[]);
    let base = spawn_server(store.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/products", base))
        .json(&json!({ "title": "t", "price": 10 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    assert!(resp.text().await.unwrap().contains("description"));
    assert!(store.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_and_delete_product() {
    let (_backend, store) = store_with_prices(&[200.0]);
    let base = spawn_server(store).await;
    let client = reqwest::Client::new();
    let url = format!("{}/products/1", base);

    // Update
    let mut body = product_body("CODE1", 250.0);
    body["title"] = json!("Nuevo título");
    let resp = client.put(&url).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let product: Product = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(product.id, 1);
    assert_eq!(product.title, "Nuevo título");
    assert_eq!(product.price, 250.0);

    // Delete
    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let products: Vec<Product> = client
        .get(format!("{}/products", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_update_missing_product_is_404() {
    let (_backend, store) = store_with_prices(&[]);
    let base = spawn_server(store).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{}/products/5", base))
        .json(&product_body("x", 1.0))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_delete_missing_product_is_404() {
    let (_backend, store) = store_with_prices(&[]);
    let base = spawn_server(store).await;

    let resp = reqwest::Client::new()
        .delete(format!("{}/products/1", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_unique_ids() {
    let (_backend, store) = store_with_prices(&[]);
    let base = spawn_server(store.clone()).await;
    let client = reqwest::Client::new();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            let url = format!("{}/products", base);
            tokio::spawn(async move {
                let resp = client
                    .post(url)
                    .json(&product_body(&format!("c{}", i), 1.0))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(resp.status(), 201);
                resp.json::<Product>().await.unwrap().id
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();

    assert_eq!(ids, (1..=16).collect::<Vec<u64>>());
}

#[tokio::test(flavor = "current_thread")]
async fn test_slow_write_does_not_stall_the_runtime() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let store = Arc::new(CatalogStore::with_backend(GatedBackend {
        inner: MemoryBackend::new(),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    }));
    let base = spawn_server(store).await;

    let post = tokio::spawn(async move {
        reqwest::Client::new()
            .post(format!("{}/products", base))
            .json(&product_body("slow", 1.0))
            .send()
            .await
            .unwrap()
            .status()
    });

    // The single runtime thread must stay free while the write is parked
    let entered = tokio::task::spawn_blocking(move || {
        entered_rx.recv_timeout(Duration::from_secs(5))
    })
    .await
    .unwrap();
    assert!(entered.is_ok());

    release_tx.send(()).unwrap();
    assert_eq!(post.await.unwrap(), 201);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_server_stops_on_shutdown_signal() {
    let (_backend, store) = store_with_prices(&[]);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let server = Server::new(Config::default(), store);
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = rx.await;
    }));

    tx.send(()).unwrap();

    handle.await.unwrap().unwrap();
}
