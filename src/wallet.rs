//! Portal-wide coin balance
//!
//! Every game reports earnings through its `CoinSink`; the host forwards them
//! here. Purchases are all-or-nothing.

use serde::{Deserialize, Serialize};

use crate::sim::CoinSink;

/// Balance a fresh portal starts with
pub const STARTING_BALANCE: u64 = 1500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    balance: u64,
    purchased: Vec<String>,
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(STARTING_BALANCE)
    }
}

impl Wallet {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            purchased: Vec::new(),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn deposit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    pub fn owns(&self, item_id: &str) -> bool {
        self.purchased.iter().any(|p| p == item_id)
    }

    /// Items bought so far, in purchase order
    pub fn purchased(&self) -> &[String] {
        &self.purchased
    }

    /// Buy `item_id` for `price`
    ///
    /// Returns false without touching the balance if the item is already
    /// owned or the balance is short.
    pub fn purchase(&mut self, item_id: &str, price: u64) -> bool {
        if self.owns(item_id) {
            log::warn!("Purchase rejected: {} already owned", item_id);
            return false;
        }
        if self.balance < price {
            log::warn!(
                "Purchase rejected: {} costs {}, balance {}",
                item_id,
                price,
                self.balance
            );
            return false;
        }
        self.balance -= price;
        self.purchased.push(item_id.to_string());
        log::info!("Purchased {} for {} ({} left)", item_id, price, self.balance);
        true
    }
}

impl CoinSink for Wallet {
    fn coins_earned(&mut self, amount: u32) {
        self.deposit(u64::from(amount));
    }
}
