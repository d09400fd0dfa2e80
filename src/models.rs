//! Shared data structures used throughout the crate.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A tradable asset as listed by the asset registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    /// Display symbol (e.g., "OSMO").
    pub symbol: String,
    /// On-chain minimal denom (e.g., "uosmo"). This is the identity of the currency.
    pub denom: String,
    /// Number of decimals between the minimal denom and the display unit.
    pub decimals: u32,
    /// Chain the asset was bridged from, if it is not native.
    #[serde(default)]
    pub origin_chain: Option<String>,
    /// IBC channel ids the asset travelled through (e.g., "channel-0").
    #[serde(default)]
    pub channel_paths: Vec<String>,
    #[serde(default)]
    pub image: Option<Url>,
}

impl Currency {
    pub fn new(symbol: impl Into<String>, denom: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            denom: denom.into(),
            decimals,
            origin_chain: None,
            channel_paths: Vec::new(),
            image: None,
        }
    }

    pub fn with_origin_chain(mut self, chain: impl Into<String>) -> Self {
        self.origin_chain = Some(chain.into());
        self
    }

    pub fn with_channel_path(mut self, channel: impl Into<String>) -> Self {
        self.channel_paths.push(channel.into());
        self
    }

    pub fn is_bridged(&self) -> bool {
        self.origin_chain.is_some()
    }

    /// Chain label shown next to the symbol in selection lists.
    pub fn meta_label<'a>(&'a self, home_chain: &'a str) -> &'a str {
        self.origin_chain.as_deref().unwrap_or(home_chain)
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.denom == other.denom
    }
}

impl Eq for Currency {}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Balance shortcut applied to the send side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fraction {
    /// MAX, the whole available balance.
    Max,
    /// HALF of the available balance.
    Half,
}

impl Fraction {
    pub fn ratio(self) -> BigDecimal {
        match self {
            Fraction::Max => BigDecimal::from(1),
            Fraction::Half => BigDecimal::new(BigInt::from(5), 1),
        }
    }

    /// Parses the labels used in configuration ("max", "half", "1", "0.5").
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "max" | "1" | "1.0" => Some(Fraction::Max),
            "half" | "0.5" => Some(Fraction::Half),
            _ => None,
        }
    }
}

/// Which side of the swap form a currency is selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Send,
    Out,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currencies_compare_by_denom() {
        let a = Currency::new("ATOM", "ibc/27394F", 6);
        let mut b = Currency::new("Cosmos Hub", "ibc/27394F", 6);
        b.origin_chain = Some("cosmoshub-4".into());
        assert_eq!(a, b);
        assert_ne!(a, Currency::new("OSMO", "uosmo", 6));
    }

    #[test]
    fn meta_label_prefers_origin_chain() {
        let osmo = Currency::new("OSMO", "uosmo", 6);
        let atom = Currency::new("ATOM", "ibc/27394F", 6).with_origin_chain("Cosmos Hub");
        assert_eq!(osmo.meta_label("Osmosis"), "Osmosis");
        assert_eq!(atom.meta_label("Osmosis"), "Cosmos Hub");
        assert!(atom.is_bridged());
    }

    #[test]
    fn fraction_labels() {
        assert_eq!(Fraction::parse("MAX"), Some(Fraction::Max));
        assert_eq!(Fraction::parse("0.5"), Some(Fraction::Half));
        assert_eq!(Fraction::parse("0.25"), None);
        assert_eq!(Fraction::Half.ratio().to_string(), "0.5");
    }
}
