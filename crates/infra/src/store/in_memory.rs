use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use plantify_core::{Entity, ProductId};
use plantify_products::{PageRequest, Product, ProductFilter, SortKey};

use super::{ProductStore, StoreError, StoreResult};

/// In-memory product collection for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store; later duplicates of an id replace earlier ones.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id(), p)).collect();
        Self {
            inner: RwLock::new(map),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<ProductId, Product>>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("product map lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<ProductId, Product>>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("product map lock poisoned".to_string()))
    }

    fn matching(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let map = self.read()?;
        Ok(map.values().filter(|p| filter.matches(p)).cloned().collect())
    }
}

fn sku_taken(map: &HashMap<ProductId, Product>, product: &Product) -> bool {
    map.values()
        .any(|other| other.id() != product.id() && other.sku() == product.sku())
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find(
        &self,
        filter: &ProductFilter,
        sort: SortKey,
        page: PageRequest,
    ) -> StoreResult<Vec<Product>> {
        let mut products = self.matching(filter)?;
        products.sort_by(|a, b| sort.compare(a, b));
        Ok(page.slice(products))
    }

    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64> {
        let map = self.read()?;
        let n = map.values().filter(|p| filter.matches(p)).count();
        Ok(u64::try_from(n).unwrap_or(u64::MAX))
    }

    async fn candidates(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        self.matching(filter)
    }

    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn insert(&self, product: Product) -> StoreResult<()> {
        let mut map = self.write()?;
        if map.contains_key(&product.id()) {
            return Err(StoreError::Conflict(format!("id {}", product.id())));
        }
        if sku_taken(&map, &product) {
            return Err(StoreError::Conflict(format!("sku {}", product.sku())));
        }
        map.insert(product.id(), product);
        Ok(())
    }

    async fn replace(&self, product: Product) -> StoreResult<()> {
        let mut map = self.write()?;
        if !map.contains_key(&product.id()) {
            return Err(StoreError::NotFound);
        }
        if sku_taken(&map, &product) {
            return Err(StoreError::Conflict(format!("sku {}", product.sku())));
        }
        map.insert(product.id(), product);
        Ok(())
    }
}
