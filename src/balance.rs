//! Spendable balances with change notification.
//!
//! Subscribers receive a `tokio::sync::watch` receiver per (address, denom).
//! The latest value is always readable; `changed()` resolves on every update.

use crate::models::Currency;
use bigdecimal::BigDecimal;
use num_traits::Zero;
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::watch;
use tracing::debug;

pub trait BalanceProvider: Send + Sync {
    /// Subscribes to the spendable balance of `currency` held by `address`.
    fn subscribe(&self, address: &str, currency: &Currency) -> watch::Receiver<BigDecimal>;
}

/// Balance book held in memory. Unknown balances read as zero until set.
#[derive(Debug, Default)]
pub struct InMemoryBalances {
    channels: RwLock<HashMap<(String, String), watch::Sender<BigDecimal>>>,
}

impl InMemoryBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates a balance and notifies every subscriber.
    pub fn set_balance(&self, address: &str, denom: &str, amount: BigDecimal) {
        let key = (address.to_string(), denom.to_string());
        let mut channels = self.channels.write();
        match channels.get(&key) {
            Some(tx) => {
                tx.send_replace(amount);
            }
            None => {
                let (tx, _rx) = watch::channel(amount);
                channels.insert(key, tx);
            }
        }
        debug!(address, denom, "[BALANCE] updated");
    }

    pub fn balance(&self, address: &str, denom: &str) -> BigDecimal {
        self.channels
            .read()
            .get(&(address.to_string(), denom.to_string()))
            .map(|tx| tx.borrow().clone())
            .unwrap_or_else(BigDecimal::zero)
    }
}

impl BalanceProvider for InMemoryBalances {
    fn subscribe(&self, address: &str, currency: &Currency) -> watch::Receiver<BigDecimal> {
        let key = (address.to_string(), currency.denom.clone());
        if let Some(tx) = self.channels.read().get(&key) {
            return tx.subscribe();
        }
        self.channels
            .write()
            .entry(key)
            .or_insert_with(|| watch::channel(BigDecimal::zero()).0)
            .subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let balances = InMemoryBalances::new();
        let osmo = Currency::new("OSMO", "uosmo", 6);
        let mut rx = balances.subscribe("osmo1abc", &osmo);
        assert_eq!(*rx.borrow(), BigDecimal::zero());

        balances.set_balance("osmo1abc", "uosmo", dec("12.5"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), dec("12.5"));
        assert_eq!(balances.balance("osmo1abc", "uosmo"), dec("12.5"));
    }

    #[test]
    fn balance_set_before_subscription_is_visible() {
        let balances = InMemoryBalances::new();
        balances.set_balance("osmo1abc", "uosmo", dec("3"));
        let rx = balances.subscribe("osmo1abc", &Currency::new("OSMO", "uosmo", 6));
        assert_eq!(*rx.borrow(), dec("3"));
        assert_eq!(balances.balance("osmo1xyz", "uosmo"), BigDecimal::zero());
    }
}
