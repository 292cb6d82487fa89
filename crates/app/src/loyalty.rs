//! Loyalty ledger

use std::sync::Mutex;

use async_trait::async_trait;
use mockall::automock;
use moonbeam::rewards::Rewards;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::identity::UserId;

/// Errors raised by a [`LoyaltyLedger`].
#[derive(Debug, Error)]
pub enum LoyaltyError {
    /// The ledger is unusable after a writer panicked.
    #[error("loyalty ledger lock poisoned")]
    Poisoned,
}

/// Keeps each member's star balance.
#[automock]
#[async_trait]
pub trait LoyaltyLedger: Send + Sync {
    /// Add `stars` to `user`'s balance and return the new balance.
    async fn credit(&self, user: UserId, stars: u32) -> Result<Rewards, LoyaltyError>;

    /// `user`'s current balance.
    async fn balance(&self, user: UserId) -> Result<Rewards, LoyaltyError>;
}

/// Process-local [`LoyaltyLedger`]. Unknown members start with a new-member balance.
#[derive(Debug, Default)]
pub struct InMemoryLoyaltyLedger {
    balances: Mutex<FxHashMap<UserId, Rewards>>,
}

impl InMemoryLoyaltyLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoyaltyLedger for InMemoryLoyaltyLedger {
    async fn credit(&self, user: UserId, stars: u32) -> Result<Rewards, LoyaltyError> {
        let mut balances = self
            .balances
            .lock()
            .map_err(|_poisoned| LoyaltyError::Poisoned)?;

        let rewards = balances.entry(user).or_default();
        rewards.credit(stars);

        Ok(*rewards)
    }

    async fn balance(&self, user: UserId) -> Result<Rewards, LoyaltyError> {
        let balances = self
            .balances
            .lock()
            .map_err(|_poisoned| LoyaltyError::Poisoned)?;

        Ok(balances.get(&user).copied().unwrap_or_default())
    }
}
