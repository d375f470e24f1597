//! Product catalog repository.

use std::str::FromStr;

use customshop_core::ProductId;

use super::{RepositoryError, decode_collection, dedupe_by_id, keys};
use crate::models::Product;
use crate::store::Storage;

/// What a catalog starts with when nothing usable is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSeed {
    /// A single placeholder product (see [`Product::example`]).
    #[default]
    Example,
    /// No products.
    Empty,
}

impl CatalogSeed {
    fn products(self) -> Vec<Product> {
        match self {
            Self::Example => vec![Product::example()],
            Self::Empty => Vec::new(),
        }
    }
}

impl FromStr for CatalogSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "example" => Ok(Self::Example),
            "empty" => Ok(Self::Empty),
            _ => Err(format!("invalid catalog seed: {s} (expected example or empty)")),
        }
    }
}

/// Repository for the product catalog.
///
/// Products are kept newest first. The repository does not validate
/// products; see [`crate::services::forms::ProductForm`].
#[derive(Debug)]
pub struct CatalogRepository {
    storage: Storage,
    products: Vec<Product>,
}

impl CatalogRepository {
    /// Hydrate the catalog from the store.
    ///
    /// An absent, non-array, or empty stored catalog yields the seed. Of
    /// several stored products sharing an id, only the first is kept.
    #[must_use]
    pub fn load(storage: Storage, seed: CatalogSeed) -> Self {
        let products = match decode_collection::<Product>(keys::PRODUCTS, storage.load_json(keys::PRODUCTS)) {
            Some(products) if !products.is_empty() => {
                dedupe_by_id(keys::PRODUCTS, products, |p| p.id.as_str())
            }
            _ => seed.products(),
        };
        tracing::debug!(count = products.len(), "catalog loaded");
        Self { storage, products }
    }

    /// All products, newest first.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Whether a product with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.products.iter().any(|p| p.id.as_str() == id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Prepend a product and persist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is already used (nothing
    /// changes). Returns `RepositoryError::Store` if persisting fails; the
    /// product stays in memory.
    pub fn add(&mut self, product: Product) -> Result<(), RepositoryError> {
        if self.contains(product.id.as_str()) {
            return Err(RepositoryError::Conflict(format!(
                "product id {} already exists",
                product.id
            )));
        }
        self.products.insert(0, product);
        self.persist()
    }

    /// Replace the product with the same id and persist.
    ///
    /// Returns whether a product was replaced. An unknown id changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if persisting fails.
    pub fn update(&mut self, product: Product) -> Result<bool, RepositoryError> {
        let replaced = match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        };
        self.persist()?;
        Ok(replaced)
    }

    /// Remove the product with this id and persist.
    ///
    /// Returns whether anything was removed. Orders referencing the product
    /// are left alone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if persisting fails.
    pub fn delete(&mut self, id: &ProductId) -> Result<bool, RepositoryError> {
        let before = self.products.len();
        self.products.retain(|p| &p.id != id);
        let removed = self.products.len() < before;
        self.persist()?;
        Ok(removed)
    }

    /// Write the whole catalog to the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    pub fn persist(&self) -> Result<(), RepositoryError> {
        self.storage.save_json(keys::PRODUCTS, &self.products)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use customshop_core::Price;
    use rust_decimal::Decimal;

    use super::*;
    use crate::store::MemoryStore;

    fn product(id: &str, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_owned(),
            price: Price::new(Decimal::new(1000, 2)),
            description: String::new(),
            image_url: String::new(),
            category: "General".to_owned(),
        }
    }

    fn repo_with(entries: &[(&str, &str)], seed: CatalogSeed) -> (CatalogRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_entries(
            entries.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())),
        ));
        let repo = CatalogRepository::load(Storage::shared(store.clone()), seed);
        (repo, store)
    }

    #[test]
    fn test_first_run_seeds_example() {
        let (repo, _) = repo_with(&[], CatalogSeed::Example);
        assert_eq!(repo.list(), &[Product::example()]);
    }

    #[test]
    fn test_empty_seed_policy() {
        let (repo, _) = repo_with(&[], CatalogSeed::Empty);
        assert!(repo.is_empty());
    }

    #[test]
    fn test_stored_empty_array_yields_seed() {
        let (repo, _) = repo_with(&[(keys::PRODUCTS, "[]")], CatalogSeed::Example);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_corrupt_value_yields_seed() {
        let (repo, _) = repo_with(&[(keys::PRODUCTS, "{not json")], CatalogSeed::Example);
        assert_eq!(repo.list(), &[Product::example()]);

        let (repo, _) = repo_with(&[(keys::PRODUCTS, r#"{"id":"1"}"#)], CatalogSeed::Example);
        assert_eq!(repo.list(), &[Product::example()]);
    }

    #[test]
    fn test_malformed_elements_are_dropped() {
        let (repo, _) = repo_with(
            &[(
                keys::PRODUCTS,
                r#"[{"id":"a","title":"Lamp","price":10},{"title":"no id"},{"id":"b","title":"Mug","price":"4.5"}]"#,
            )],
            CatalogSeed::Example,
        );
        let ids: Vec<_> = repo.list().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_stored_ids_keep_first() {
        let (mut repo, _) = repo_with(
            &[(
                keys::PRODUCTS,
                r#"[{"id":"a","title":"Lamp","price":10},{"id":"a","title":"Copy","price":1},{"id":"b","title":"Mug","price":4}]"#,
            )],
            CatalogSeed::Example,
        );
        let titles: Vec<_> = repo.list().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Lamp", "Mug"]);

        assert!(repo.delete(&ProductId::new("a")).unwrap());
        assert!(!repo.contains("a"));
    }

    #[test]
    fn test_add_prepends() {
        let (mut repo, _) = repo_with(&[], CatalogSeed::Empty);
        for (id, title) in [("a", "A"), ("b", "B"), ("c", "C")] {
            repo.add(product(id, title)).unwrap();
        }
        let titles: Vec<_> = repo.list().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_add_duplicate_id_conflicts() {
        let (mut repo, store) = repo_with(&[], CatalogSeed::Empty);
        repo.add(product("a", "A")).unwrap();
        let err = repo.add(product("a", "Other")).unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.len(), 1);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let (mut repo, _) = repo_with(&[], CatalogSeed::Empty);
        repo.add(product("a", "A")).unwrap();
        assert!(repo.update(product("a", "Renamed")).unwrap());
        assert_eq!(repo.get(&ProductId::new("a")).unwrap().title, "Renamed");
        assert!(!repo.update(product("zzz", "Ghost")).unwrap());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let (mut repo, _) = repo_with(&[], CatalogSeed::Example);
        assert!(!repo.delete(&ProductId::new("missing")).unwrap());
        assert_eq!(repo.len(), 1);
        assert!(repo.delete(&ProductId::new("1")).unwrap());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_every_mutation_persists() {
        let (mut repo, store) = repo_with(&[], CatalogSeed::Empty);
        repo.add(product("a", "A")).unwrap();
        repo.update(product("a", "B")).unwrap();
        repo.delete(&ProductId::new("a")).unwrap();
        assert_eq!(store.writes(), 3);
        assert_eq!(store.raw(keys::PRODUCTS).unwrap(), "[]");
    }

    #[test]
    fn test_persisted_catalog_reloads() {
        let (mut repo, store) = repo_with(&[], CatalogSeed::Empty);
        repo.add(product("a", "A")).unwrap();
        repo.add(product("b", "B")).unwrap();

        let reloaded = CatalogRepository::load(Storage::shared(store), CatalogSeed::Empty);
        assert_eq!(reloaded.list(), repo.list());
    }

    #[test]
    fn test_catalog_seed_from_str() {
        assert_eq!("Example".parse::<CatalogSeed>().unwrap(), CatalogSeed::Example);
        assert_eq!(" empty".parse::<CatalogSeed>().unwrap(), CatalogSeed::Empty);
        assert!("full".parse::<CatalogSeed>().is_err());
    }
}
