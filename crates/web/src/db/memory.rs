//! In-process stores for tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use wfa_core::{AdminId, Category, ProductId, StoredImageName, Username};

use super::{AdminStore, ProductStore, RepositoryError};
use crate::models::{AdminIdentity, Product, ProductDraft};

#[derive(Debug)]
struct Table<T> {
    next_id: i32,
    rows: BTreeMap<i32, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Admin identities held in memory.
#[derive(Debug, Default)]
pub struct MemoryAdminStore {
    table: RwLock<Table<AdminIdentity>>,
}

impl MemoryAdminStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminStore for MemoryAdminStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<AdminIdentity>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|admin| admin.username == *username)
            .cloned())
    }

    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<AdminIdentity, RepositoryError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|admin| admin.username == *username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let id = table.allocate_id();
        let identity = AdminIdentity {
            id: AdminId::new(id),
            username: username.clone(),
            password_hash: password_hash.to_owned(),
        };
        table.rows.insert(id, identity.clone());
        Ok(identity)
    }

    async fn set_password_hash(
        &self,
        id: AdminId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        let identity = table
            .rows
            .get_mut(&id.as_i32())
            .ok_or(RepositoryError::NotFound)?;
        password_hash.clone_into(&mut identity.password_hash);
        Ok(())
    }
}

/// Products held in memory.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    table: RwLock<Table<Product>>,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self, category: Option<Category>) -> Result<Vec<Product>, RepositoryError> {
        let table = self.table.read().await;
        let mut products: Vec<Product> = table
            .rows
            .values()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect();
        products.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(products)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.table.read().await.rows.get(&id.as_i32()).cloned())
    }

    async fn insert(
        &self,
        draft: &ProductDraft,
        image: Option<&StoredImageName>,
    ) -> Result<Product, RepositoryError> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let product = Product {
            id: ProductId::new(id),
            name: draft.name.clone(),
            category: draft.category,
            price: draft.price,
            description: draft.description.clone(),
            image: image.cloned(),
            created_at: Utc::now(),
        };
        table.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        image: Option<&StoredImageName>,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut table = self.table.write().await;
        let Some(product) = table.rows.get_mut(&id.as_i32()) else {
            return Ok(None);
        };

        product.name.clone_from(&draft.name);
        product.category = draft.category;
        product.price = draft.price;
        product.description.clone_from(&draft.description);
        if let Some(image) = image {
            product.image = Some(image.clone());
        }
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self.table.write().await.rows.remove(&id.as_i32()).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wfa_core::Price;

    use super::*;

    fn draft(name: &str, category: Category) -> ProductDraft {
        ProductDraft::from_form(name, category, Some("10"), None)
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_filtered() {
        let store = MemoryProductStore::new();
        let a = store.insert(&draft("A", Category::Parts), None).await.unwrap();
        let b = store
            .insert(&draft("B", Category::Detailing), None)
            .await
            .unwrap();
        let c = store.insert(&draft("C", Category::Parts), None).await.unwrap();

        let all: Vec<_> = store.list(None).await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(all, vec![c.id, b.id, a.id]);

        let parts: Vec<_> = store
            .list(Some(Category::Parts))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(parts, vec![c.id, a.id]);
    }

    #[tokio::test]
    async fn test_update_keeps_image_when_none_given() {
        let store = MemoryProductStore::new();
        let image = StoredImageName::from_stored("20250101000000_a.jpg");
        let p = store
            .insert(&draft("A", Category::Parts), Some(&image))
            .await
            .unwrap();

        let mut changed = draft("A2", Category::Detailing);
        changed.price = Price::ZERO;
        let updated = store.update(p.id, &changed, None).await.unwrap().unwrap();

        assert_eq!(updated.name, "A2");
        assert_eq!(updated.image, Some(image));
        assert_eq!(updated.created_at, p.created_at);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryProductStore::new();
        let a = store.insert(&draft("A", Category::Parts), None).await.unwrap();
        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());

        let b = store.insert(&draft("B", Category::Parts), None).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryAdminStore::new();
        let name = Username::parse("admin").unwrap();
        store.create(&name, "hash").await.unwrap();
        assert!(matches!(
            store.create(&name, "other").await,
            Err(RepositoryError::Conflict(_))
        ));
    }
}
