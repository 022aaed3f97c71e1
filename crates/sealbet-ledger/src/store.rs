//! Ledger store: the arena of market books.
//!
//! Books are keyed by derived market address. The outer map is behind a
//! `RwLock` that is only write-locked to add a market; every other access
//! read-locks it just long enough to clone one book's `Arc<Mutex<_>>`.
//! Operations on different markets therefore never contend, and every
//! mutation of one market's aggregate fields is serialized by its mutex.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, RwLock},
};

use sealbet_types::{Address, Result, SealbetError};

use crate::book::MarketBook;

/// Shared handle to one market's book.
pub type BookHandle = Arc<Mutex<MarketBook>>;

/// Keyed storage for every market book.
pub struct LedgerStore {
    books: RwLock<HashMap<Address, BookHandle>>,
}

impl LedgerStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
        }
    }

    /// Add a new market book. Never overwrites.
    ///
    /// # Errors
    /// `MarketAlreadyExists` if a book is already stored at this address.
    pub fn insert(&self, book: MarketBook) -> Result<()> {
        let address = book.address();
        let mut books = self.books.write().map_err(|_| poisoned("ledger map"))?;
        if books.contains_key(&address) {
            return Err(SealbetError::MarketAlreadyExists(address));
        }
        books.insert(address, Arc::new(Mutex::new(book)));
        tracing::debug!(market = %address.short(), "Market book stored");
        Ok(())
    }

    /// Handle to one market's book.
    ///
    /// # Errors
    /// `MarketNotFound` if no book exists at `market`.
    pub fn book(&self, market: &Address) -> Result<BookHandle> {
        let books = self.books.read().map_err(|_| poisoned("ledger map"))?;
        books
            .get(market)
            .cloned()
            .ok_or(SealbetError::MarketNotFound(*market))
    }

    /// Run `f` with exclusive access to one market's book.
    ///
    /// # Errors
    /// `MarketNotFound`, `Internal` on a poisoned lock, or whatever `f` returns.
    pub fn with_book<T>(
        &self,
        market: &Address,
        f: impl FnOnce(&mut MarketBook) -> Result<T>,
    ) -> Result<T> {
        let handle = self.book(market)?;
        let mut book = lock_book(&handle)?;
        f(&mut book)
    }

    /// Addresses of every stored market, sorted for deterministic iteration.
    ///
    /// # Errors
    /// `Internal` on a poisoned map lock.
    pub fn market_addresses(&self) -> Result<Vec<Address>> {
        let books = self.books.read().map_err(|_| poisoned("ledger map"))?;
        let mut out: Vec<Address> = books.keys().copied().collect();
        out.sort();
        Ok(out)
    }

    /// Number of stored markets.
    ///
    /// # Errors
    /// `Internal` on a poisoned map lock.
    pub fn len(&self) -> Result<usize> {
        let books = self.books.read().map_err(|_| poisoned("ledger map"))?;
        Ok(books.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock one book.
///
/// # Errors
/// `Internal` if a previous holder panicked.
pub fn lock_book(handle: &BookHandle) -> Result<MutexGuard<'_, MarketBook>> {
    handle.lock().map_err(|_| poisoned("market book"))
}

fn poisoned(what: &str) -> SealbetError {
    SealbetError::Internal(format!("{what} lock poisoned"))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sealbet_types::{Identity, Market, MarketId, address};

    use super::*;

    fn make_book(creator: Identity, id: u64) -> MarketBook {
        let now = Utc::now();
        MarketBook::new(Market {
            address: address::market_address(&creator, MarketId(id)),
            creator,
            oracle: creator,
            market_id: MarketId(id),
            question: "Q?".into(),
            deadline: now + Duration::hours(1),
            reveal_deadline: now + Duration::hours(25),
            total_pool: 0,
            yes_pool: 0,
            no_pool: 0,
            yes_count: 0,
            no_count: 0,
            outcome: None,
            resolved_at: None,
            created_at: now,
        })
    }

    #[test]
    fn insert_then_lookup() {
        let store = LedgerStore::new();
        let creator = Identity::random();
        let book = make_book(creator, 1);
        let addr = book.address();
        store.insert(book).unwrap();

        assert!(store.book(&addr).is_ok());
        assert_eq!(store.len().unwrap(), 1);
        let question = store
            .with_book(&addr, |b| Ok(b.market().question.clone()))
            .unwrap();
        assert_eq!(question, "Q?");
    }

    #[test]
    fn duplicate_market_rejected() {
        let store = LedgerStore::new();
        let creator = Identity::random();
        store.insert(make_book(creator, 1)).unwrap();
        let err = store.insert(make_book(creator, 1)).unwrap_err();
        assert!(matches!(err, SealbetError::MarketAlreadyExists(_)));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn same_id_different_creators_coexist() {
        let store = LedgerStore::new();
        store.insert(make_book(Identity::random(), 1)).unwrap();
        store.insert(make_book(Identity::random(), 1)).unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn missing_market_errors() {
        let store = LedgerStore::new();
        assert!(store.is_empty().unwrap());
        let err = store.book(&Address([9; 32])).unwrap_err();
        assert!(matches!(err, SealbetError::MarketNotFound(_)));
    }

    #[test]
    fn with_book_mutations_persist() {
        let store = LedgerStore::new();
        let book = make_book(Identity::random(), 3);
        let addr = book.address();
        store.insert(book).unwrap();

        store
            .with_book(&addr, |b| {
                b.vault_mut().balance = 42;
                Ok(())
            })
            .unwrap();
        let bal = store.with_book(&addr, |b| Ok(b.vault().balance)).unwrap();
        assert_eq!(bal, 42);
    }

    #[test]
    fn market_addresses_sorted() {
        let store = LedgerStore::new();
        for id in 0..5 {
            store.insert(make_book(Identity::random(), id)).unwrap();
        }
        let addrs = store.market_addresses().unwrap();
        assert_eq!(addrs.len(), 5);
        assert!(addrs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn poisoned_map_reports_internal() {
        let store = LedgerStore::new();
        let addr = {
            let book = make_book(Identity::random(), 1);
            let addr = book.address();
            store.insert(book).unwrap();
            addr
        };
        let _ = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = store.books.write().unwrap();
                    panic!("writer died holding the map lock");
                })
                .join()
        });

        assert!(matches!(store.market_addresses().unwrap_err(), SealbetError::Internal(_)));
        assert!(matches!(store.len().unwrap_err(), SealbetError::Internal(_)));
        assert!(matches!(store.book(&addr).unwrap_err(), SealbetError::Internal(_)));
    }
}
