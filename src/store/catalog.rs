//! Catalog store
//!
//! Owns the product collection and the next-id counter, mirrored to a
//! `Backend`.

use std::path::Path;

use parking_lot::Mutex;

use crate::backend::{Backend, FileBackend};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::product::{NewProduct, Product, ProductFields};

use super::Listing;

/// Whether the store has ever completed a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Constructed, no reload has completed yet
    Unloaded,

    /// At least one reload completed without error
    Loaded,
}

/// State guarded by the operation lock
struct Catalog {
    /// Records in insertion order
    products: Vec<Product>,

    /// Id handed to the next added record; `None` once `u64::MAX` is taken
    next_id: Option<u64>,

    /// Whether any reload has completed
    load_state: LoadState,
}

/// The catalog store
///
/// ## Concurrency Model: one operation at a time
///
/// Every operation holds `state` for its whole reload → compute → persist
/// sequence. Two concurrent `add` calls against one store therefore never
/// observe the same next id. Nothing guards against a second process
/// writing the same file.
pub struct CatalogStore<B: Backend = FileBackend> {
    /// Durable mirror of the collection
    backend: B,

    /// Collection, counter and load state
    state: Mutex<Catalog>,
}

impl CatalogStore<FileBackend> {
    /// Open a store over the catalog file named in `config`
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Create the file's parent directory if it doesn't exist
    /// 3. Attempt an initial reload (failures are logged, not returned)
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let backend = FileBackend::open(&config.catalog_path, config.sync_on_persist)?;
        Ok(Self::with_backend(backend))
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified catalog file
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().catalog_path(path).build();
        Self::open(&config)
    }
}

impl<B: Backend> CatalogStore<B> {
    /// Create a store over an arbitrary backend
    ///
    /// Performs an initial reload. A broken document does not prevent
    /// construction; the store stays `Unloaded` and every later operation
    /// reports the parse failure until the document is fixed.
    pub fn with_backend(backend: B) -> Self {
        let store = Self {
            backend,
            state: Mutex::new(Catalog {
                products: Vec::new(),
                next_id: Some(1),
                load_state: LoadState::Unloaded,
            }),
        };

        // Already logged inside reload
        let _ = store.reload();

        store
    }

    // =========================================================================
    // Durable Mirror
    // =========================================================================

    /// Resynchronize the in-memory collection from the backend
    ///
    /// - No document: memory is left as-is
    /// - Blank document: memory is left as-is
    /// - JSON array: replaces the collection, next id = max(id) + 1 (or 1);
    ///   a record holding `u64::MAX` leaves no next id
    /// - Anything else: `CatalogError::Parse`
    pub fn reload(&self) -> Result<()> {
        let mut catalog = self.state.lock();
        self.reload_locked(&mut catalog)
    }

    /// Write the in-memory collection to the backend as it stands
    pub fn persist(&self) -> Result<()> {
        let catalog = self.state.lock();
        self.write_products(&catalog.products)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Validate, id-assign, append and persist a new product
    ///
    /// Steps:
    /// 1. Reload
    /// 2. Check required fields (`Validation`)
    /// 3. Check code uniqueness against the reloaded collection (`DuplicateCode`)
    /// 4. Assign the next id (`IdsExhausted` if none is left), append, persist
    pub fn add(&self, candidate: NewProduct) -> Result<Product> {
        let mut catalog = self.state.lock();
        self.reload_locked(&mut catalog)?;

        let fields = candidate.validate().inspect_err(|e| {
            tracing::warn!("Rejected product: {}", e);
        })?;

        if catalog.products.iter().any(|p| p.code == fields.code) {
            tracing::warn!("Rejected product: code {:?} already in use", fields.code);
            return Err(CatalogError::DuplicateCode(fields.code));
        }

        let id = catalog.next_id.ok_or_else(|| {
            tracing::error!("Rejected product {:?}: every id up to {} is taken", fields.code, u64::MAX);
            CatalogError::IdsExhausted
        })?;

        let product = Product::from_fields(id, fields);
        let mut products = catalog.products.clone();
        products.push(product.clone());

        self.commit(&mut catalog, products, id.checked_add(1))?;
        tracing::info!("Added product {} ({})", product.id, product.code);

        Ok(product)
    }

    /// Snapshot of every product, in insertion order
    pub fn list(&self) -> Result<Listing> {
        let mut catalog = self.state.lock();
        self.reload_locked(&mut catalog)?;

        Ok(Listing::new(catalog.products.clone()))
    }

    /// Look up a product by id
    pub fn get_by_id(&self, id: u64) -> Result<Product> {
        let mut catalog = self.state.lock();
        self.reload_locked(&mut catalog)?;

        catalog
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Replace every field of product `id` except the id itself
    ///
    /// The replacement is stored as given: no required-field check and no
    /// code-uniqueness check, unlike `add`.
    pub fn update(&self, id: u64, replacement: ProductFields) -> Result<Product> {
        let mut catalog = self.state.lock();
        self.reload_locked(&mut catalog)?;

        let index = position(&catalog.products, id).ok_or_else(|| not_found(id))?;

        let mut products = catalog.products.clone();
        products[index].replace(replacement);
        let updated = products[index].clone();

        let next_id = catalog.next_id;
        self.commit(&mut catalog, products, next_id)?;
        tracing::info!("Updated product {}", id);

        Ok(updated)
    }

    /// Remove product `id`, returning the removed record
    pub fn delete(&self, id: u64) -> Result<Product> {
        let mut catalog = self.state.lock();
        self.reload_locked(&mut catalog)?;

        let index = position(&catalog.products, id).ok_or_else(|| not_found(id))?;

        let mut products = catalog.products.clone();
        let removed = products.remove(index);

        let next_id = catalog.next_id;
        self.commit(&mut catalog, products, next_id)?;
        tracing::info!("Deleted product {}", id);

        Ok(removed)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Id the next successful `add` will assign (as of the last reload)
    ///
    /// `None` when the highest stored id is `u64::MAX`.
    pub fn next_id(&self) -> Option<u64> {
        self.state.lock().next_id
    }

    /// Whether any reload has completed
    pub fn load_state(&self) -> LoadState {
        self.state.lock().load_state
    }

    /// Number of records currently held in memory (no reload)
    pub fn len(&self) -> usize {
        self.state.lock().products.len()
    }

    /// True when no records are held in memory (no reload)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The backend the collection is mirrored to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Reload with the operation lock already held
    fn reload_locked(&self, catalog: &mut Catalog) -> Result<()> {
        let location = self.backend.describe();

        let data = self.backend.read().inspect_err(|e| {
            tracing::error!("Failed to read catalog {}: {}", location, e);
        })?;

        let Some(data) = data else {
            tracing::warn!("Catalog {} does not exist yet, it will be created on first write", location);
            catalog.load_state = LoadState::Loaded;
            return Ok(());
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            tracing::warn!("Catalog {} is empty", location);
            catalog.load_state = LoadState::Loaded;
            return Ok(());
        }

        let products: Vec<Product> = serde_json::from_slice(&data).map_err(|e| {
            tracing::error!("Failed to load catalog {}: {}", location, e);
            CatalogError::Parse(e.to_string())
        })?;

        catalog.next_id = match products.iter().map(|p| p.id).max() {
            Some(id) => id.checked_add(1),
            None => Some(1),
        };
        catalog.products = products;
        catalog.load_state = LoadState::Loaded;

        tracing::debug!(
            "Reloaded {} products from {} (next id {:?})",
            catalog.products.len(),
            location,
            catalog.next_id
        );
        Ok(())
    }

    /// Persist `products`, and only then make them the in-memory collection
    fn commit(
        &self,
        catalog: &mut Catalog,
        products: Vec<Product>,
        next_id: Option<u64>,
    ) -> Result<()> {
        self.write_products(&products)?;
        catalog.products = products;
        catalog.next_id = next_id;
        Ok(())
    }

    /// Serialize and write the whole collection
    fn write_products(&self, products: &[Product]) -> Result<()> {
        let data = serde_json::to_vec_pretty(products).map_err(|e| {
            tracing::error!("Failed to encode catalog: {}", e);
            CatalogError::Encode(e.to_string())
        })?;

        self.backend.write(&data).inspect_err(|e| {
            tracing::error!("Failed to save catalog {}: {}", self.backend.describe(), e);
        })?;

        tracing::debug!("Saved {} products to {}", products.len(), self.backend.describe());
        Ok(())
    }
}

fn position(products: &[Product], id: u64) -> Option<usize> {
    products.iter().position(|p| p.id == id)
}

fn not_found(id: u64) -> CatalogError {
    tracing::warn!("Product {} not found", id);
    CatalogError::NotFound(id)
}
