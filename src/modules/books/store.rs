//! In-memory book collection.
//!
//! Reads share a lock; every mutation holds the write lock for its whole
//! read-modify-write sequence, so id assignment and scan-then-replace are
//! atomic across concurrent requests.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use bookshelf_kernel::settings::IdStrategy;

use super::models::{Book, BookRequest};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no book with id {id}")]
    NotFound { id: i64 },
}

#[derive(Debug)]
struct Shelf {
    books: Vec<Book>,
    /// Next id handed out under [`IdStrategy::Monotonic`].
    next_id: i64,
}

impl Shelf {
    fn assign_id(&mut self, strategy: IdStrategy) -> i64 {
        match strategy {
            IdStrategy::AfterLast => self.books.last().map_or(1, |book| book.id + 1),
            IdStrategy::Monotonic => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        }
    }
}

/// Shared handle to the catalog. Clones point at the same collection.
#[derive(Debug, Clone)]
pub struct BookStore {
    shelf: Arc<RwLock<Shelf>>,
    id_strategy: IdStrategy,
}

impl BookStore {
    /// Empty catalog.
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self::with_books(Vec::new(), id_strategy)
    }

    /// Catalog holding `books` in the given order.
    pub fn with_books(books: Vec<Book>, id_strategy: IdStrategy) -> Self {
        let next_id = books.iter().map(|book| book.id).max().unwrap_or(0) + 1;
        Self {
            shelf: Arc::new(RwLock::new(Shelf { books, next_id })),
            id_strategy,
        }
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }

    pub async fn len(&self) -> usize {
        self.shelf.read().await.books.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every book in insertion order.
    pub async fn list(&self) -> Vec<Book> {
        self.shelf.read().await.books.clone()
    }

    /// First book with a matching id.
    pub async fn get(&self, id: i64) -> Result<Book, CatalogError> {
        self.shelf
            .read()
            .await
            .books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound { id })
    }

    pub async fn by_rating(&self, rating: i64) -> Vec<Book> {
        self.filter(|book| book.rating == rating).await
    }

    pub async fn by_published_date(&self, published_date: i64) -> Vec<Book> {
        self.filter(|book| book.published_date == published_date).await
    }

    async fn filter(&self, predicate: impl Fn(&Book) -> bool) -> Vec<Book> {
        self.shelf
            .read()
            .await
            .books
            .iter()
            .filter(|book| predicate(book))
            .cloned()
            .collect()
    }

    /// Append a book under a freshly assigned id. Any id on the request is ignored.
    pub async fn create(&self, request: BookRequest) -> Book {
        let mut shelf = self.shelf.write().await;
        let id = shelf.assign_id(self.id_strategy);
        let book = request.into_book(id);
        shelf.books.push(book.clone());
        book
    }

    /// Replace every book whose id matches `book.id`. Returns how many were replaced.
    pub async fn update(&self, book: Book) -> Result<usize, CatalogError> {
        let mut shelf = self.shelf.write().await;
        let mut replaced = 0;
        for slot in shelf.books.iter_mut().filter(|slot| slot.id == book.id) {
            *slot = book.clone();
            replaced += 1;
        }

        if replaced == 0 {
            return Err(CatalogError::NotFound { id: book.id });
        }
        Ok(replaced)
    }

    /// Remove every book with a matching id. Returns how many were removed.
    pub async fn delete(&self, id: i64) -> Result<usize, CatalogError> {
        let mut shelf = self.shelf.write().await;
        let before = shelf.books.len();
        shelf.books.retain(|book| book.id != id);

        match before - shelf.books.len() {
            0 => Err(CatalogError::NotFound { id }),
            removed => Ok(removed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::seed_books;

    fn request(title: &str) -> BookRequest {
        BookRequest {
            id: None,
            title: title.to_string(),
            author: "Author".to_string(),
            description: "Description".to_string(),
            published_date: 2020,
            rating: 4,
        }
    }

    fn seeded(strategy: IdStrategy) -> BookStore {
        BookStore::with_books(seed_books(), strategy)
    }

    #[tokio::test]
    async fn create_after_seed_assigns_seven() {
        for strategy in [IdStrategy::Monotonic, IdStrategy::AfterLast] {
            let store = seeded(strategy);
            let book = store.create(request("Fresh Book")).await;

            assert_eq!(book.id, 7);
            assert_eq!(store.len().await, 7);
            assert_eq!(store.list().await.last(), Some(&book));
        }
    }

    #[tokio::test]
    async fn create_ignores_client_supplied_id() {
        let store = seeded(IdStrategy::Monotonic);
        let mut with_id = request("Sneaky Id");
        with_id.id = Some(1);

        let book = store.create(with_id).await;
        assert_eq!(book.id, 7);
        assert_eq!(store.get(1).await.unwrap().title, "Computer Science Pro");
    }

    #[tokio::test]
    async fn empty_store_starts_at_one() {
        for strategy in [IdStrategy::Monotonic, IdStrategy::AfterLast] {
            let store = BookStore::new(strategy);
            assert!(store.is_empty().await);
            assert_eq!(store.create(request("First Book")).await.id, 1);
        }
    }

    #[tokio::test]
    async fn after_last_reuses_id_of_deleted_tail() {
        let store = seeded(IdStrategy::AfterLast);
        store.delete(6).await.unwrap();

        assert_eq!(store.create(request("Reused")).await.id, 6);
    }

    #[tokio::test]
    async fn monotonic_never_reuses_ids() {
        let store = seeded(IdStrategy::Monotonic);
        store.delete(6).await.unwrap();

        assert_eq!(store.create(request("Not Reused")).await.id, 7);
        assert!(store.get(6).await.is_err());
    }

    #[tokio::test]
    async fn get_returns_first_match_or_not_found() {
        let store = seeded(IdStrategy::Monotonic);

        assert_eq!(store.get(3).await.unwrap().title, "Master Endpoints");
        assert_eq!(
            store.get(42).await.unwrap_err(),
            CatalogError::NotFound { id: 42 }
        );
    }

    #[tokio::test]
    async fn filters_keep_collection_order() {
        let store = seeded(IdStrategy::Monotonic);

        let rated: Vec<i64> = store.by_rating(5).await.iter().map(|b| b.id).collect();
        assert_eq!(rated, vec![1, 2, 3]);

        let published: Vec<i64> = store
            .by_published_date(2010)
            .await
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(published, vec![5, 6]);

        assert!(store.by_rating(0).await.is_empty());
        assert!(store.by_published_date(2030).await.is_empty());
        assert!(BookStore::new(IdStrategy::Monotonic)
            .by_rating(5)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn update_replaces_record_in_place() {
        let store = seeded(IdStrategy::Monotonic);
        let replacement = request("Master Endpoints v2").into_book(3);

        assert_eq!(store.update(replacement.clone()).await, Ok(1));
        assert_eq!(store.get(3).await.unwrap(), replacement);
        assert_eq!(store.list().await[2], replacement);
        assert_eq!(store.len().await, 6);
    }

    #[tokio::test]
    async fn unknown_ids_leave_collection_untouched() {
        let store = seeded(IdStrategy::Monotonic);
        let before = store.list().await;

        assert!(store.update(request("Ghost Book").into_book(99)).await.is_err());
        assert!(store.delete(99).await.is_err());
        assert!(store.get(99).await.is_err());

        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = seeded(IdStrategy::Monotonic);

        assert_eq!(store.delete(4).await, Ok(1));
        assert_eq!(store.len().await, 5);
        assert_eq!(store.get(4).await, Err(CatalogError::NotFound { id: 4 }));
    }

    #[tokio::test]
    async fn duplicate_ids_are_all_updated_and_deleted() {
        let books = vec![
            request("Twin One").into_book(2),
            request("Other").into_book(3),
            request("Twin Two").into_book(2),
            request("Twin Three").into_book(2),
        ];
        let store = BookStore::with_books(books, IdStrategy::AfterLast);

        let replacement = request("Replaced").into_book(2);
        assert_eq!(store.update(replacement).await, Ok(3));
        let titles: Vec<String> = store.list().await.into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Replaced", "Other", "Replaced", "Replaced"]);

        assert_eq!(store.delete(2).await, Ok(3));
        let remaining: Vec<i64> = store.list().await.iter().map(|b| b.id).collect();
        assert_eq!(remaining, vec![3]);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let store = seeded(IdStrategy::AfterLast);

        let handles: Vec<_> = (0..32)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move { store.create(request(&format!("Book {n}"))).await.id })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 32);
        assert_eq!(store.len().await, 38);
    }
}
