//! Order and favorites persistence

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use mockall::automock;
use moonbeam::orders::{Order, OrderId, StatusUpdate};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::identity::UserId;

/// Errors raised by an [`OrderStore`].
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A status update referenced an order that was never saved.
    #[error("order {0} has not been saved")]
    NotFound(OrderId),

    /// The store is unusable after a writer panicked.
    #[error("order store lock poisoned")]
    Poisoned,
}

/// Where placed orders, their status changes and favorites are recorded.
#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Save a newly placed order, attributed to `user` when signed in.
    async fn save_order(&self, user: Option<UserId>, order: &Order) -> Result<(), PersistenceError>;

    /// Append a status change to a saved order.
    async fn append_status(
        &self,
        order: OrderId,
        update: StatusUpdate,
    ) -> Result<(), PersistenceError>;

    /// Record whether `item` is one of `user`'s favorites.
    async fn set_favorite(
        &self,
        user: UserId,
        item: &str,
        favorite: bool,
    ) -> Result<(), PersistenceError>;
}

/// A saved order and who placed it.
#[derive(Debug, Clone)]
pub struct StoredOrder {
    /// Placing user; `None` for guest checkouts
    pub user: Option<UserId>,

    /// Order as placed
    pub order: Order,

    /// Status changes appended after placement, oldest first
    pub updates: Vec<StatusUpdate>,
}

#[derive(Debug, Default)]
struct Tables {
    orders: FxHashMap<OrderId, StoredOrder>,
    favorites: FxHashMap<UserId, FxHashSet<String>>,
}

/// Process-local [`OrderStore`].
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    tables: Mutex<Tables>,
}

impl InMemoryOrderStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A saved order.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Poisoned`] if the store lock is poisoned.
    pub fn order(&self, id: OrderId) -> Result<Option<StoredOrder>, PersistenceError> {
        Ok(self.lock()?.orders.get(&id).cloned())
    }

    /// Ids of `user`'s favorite items, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Poisoned`] if the store lock is poisoned.
    pub fn favorites(&self, user: UserId) -> Result<Vec<String>, PersistenceError> {
        let mut favorites: Vec<_> = self
            .lock()?
            .favorites
            .get(&user)
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default();

        favorites.sort_unstable();

        Ok(favorites)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, PersistenceError> {
        self.tables
            .lock()
            .map_err(|_poisoned| PersistenceError::Poisoned)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save_order(
        &self,
        user: Option<UserId>,
        order: &Order,
    ) -> Result<(), PersistenceError> {
        self.lock()?.orders.insert(
            order.id(),
            StoredOrder {
                user,
                order: order.clone(),
                updates: Vec::new(),
            },
        );

        Ok(())
    }

    async fn append_status(
        &self,
        order: OrderId,
        update: StatusUpdate,
    ) -> Result<(), PersistenceError> {
        self.lock()?
            .orders
            .get_mut(&order)
            .ok_or(PersistenceError::NotFound(order))?
            .updates
            .push(update);

        Ok(())
    }

    async fn set_favorite(
        &self,
        user: UserId,
        item: &str,
        favorite: bool,
    ) -> Result<(), PersistenceError> {
        let mut tables = self.lock()?;
        let items = tables.favorites.entry(user).or_default();

        if favorite {
            items.insert(item.to_string());
        } else {
            items.remove(item);
        }

        Ok(())
    }
}
