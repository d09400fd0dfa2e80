//! Asset registry lookups and the currency lists behind the token selector.

use crate::models::Currency;
use std::collections::HashMap;

/// Source of truth for tradable currencies.
pub trait AssetRegistry: Send + Sync {
    /// Looks up a currency by minimal denom.
    fn currency(&self, denom: &str) -> Option<Currency>;

    /// Every currency that can be sent, in display order.
    fn currencies(&self) -> Vec<Currency>;
}

/// Registry backed by a fixed currency list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    ordered: Vec<Currency>,
    by_denom: HashMap<String, usize>,
}

impl InMemoryRegistry {
    /// Later duplicates of a denom are ignored.
    pub fn new(currencies: impl IntoIterator<Item = Currency>) -> Self {
        let mut registry = Self::default();
        for currency in currencies {
            if registry.by_denom.contains_key(&currency.denom) {
                continue;
            }
            registry
                .by_denom
                .insert(currency.denom.clone(), registry.ordered.len());
            registry.ordered.push(currency);
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl AssetRegistry for InMemoryRegistry {
    fn currency(&self, denom: &str) -> Option<Currency> {
        self.by_denom
            .get(denom)
            .map(|&index| self.ordered[index].clone())
    }

    fn currencies(&self) -> Vec<Currency> {
        self.ordered.clone()
    }
}

/// Currencies offered for one side: everything except the other side's selection.
pub fn selectable_currencies(registry: &dyn AssetRegistry, exclude: &Currency) -> Vec<Currency> {
    registry
        .currencies()
        .into_iter()
        .filter(|currency| currency != exclude)
        .collect()
}

/// Case-insensitive search on symbol or IBC channel path. An empty query matches all.
pub fn search_currencies<'a>(currencies: &'a [Currency], query: &str) -> Vec<&'a Currency> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return currencies.iter().collect();
    }
    currencies
        .iter()
        .filter(|currency| {
            currency.symbol.to_lowercase().contains(&query)
                || currency
                    .channel_paths
                    .iter()
                    .any(|channel| channel.to_lowercase().contains(&query))
        })
        .collect()
}
