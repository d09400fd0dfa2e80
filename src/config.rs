//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use crate::models::{Currency, Fraction};
use crate::router::FixedRoute;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Slippage presets offered by the settings panel, in percent.
pub const DEFAULT_SLIPPAGE_PRESETS: [&str; 3] = ["1", "3", "5"];

/// Chain label used for currencies that were not bridged in.
pub const HOME_CHAIN_NAME: &str = "Osmosis";

/// Consolidated application configuration for the demo session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON file with currencies, balances and routes.
    pub market_file: PathBuf,
    /// Account whose balances back the MAX/HALF shortcuts.
    pub account_address: String,
    /// Minimal denom selected on the send side.
    pub send_denom: String,
    /// Minimal denom selected on the out side.
    pub out_denom: String,
    /// Amount typed into the send side, if any.
    pub amount: Option<String>,
    /// MAX/HALF shortcut, takes precedence over `amount`.
    pub fraction: Option<Fraction>,
    pub slippage: SlippageSettings,
}

/// Slippage settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SlippageSettings {
    /// Preset tolerances in percent.
    pub presets: Vec<String>,
    /// Manually entered tolerance in percent; enables manual mode when set.
    pub manual: Option<String>,
}

impl Default for SlippageSettings {
    fn default() -> Self {
        Self {
            presets: DEFAULT_SLIPPAGE_PRESETS.iter().map(|p| p.to_string()).collect(),
            manual: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let market_file = std::env::var("MARKET_FILE")
            .unwrap_or_else(|_| "demos/market.json".into())
            .into();
        let account_address = std::env::var("ACCOUNT_ADDRESS")
            .map_err(|_| AppError::Config("Set ACCOUNT_ADDRESS to the trading account".into()))?;
        let send_denom = std::env::var("SEND_DENOM").unwrap_or_else(|_| "uosmo".into());
        let out_denom = std::env::var("OUT_DENOM")?;
        let amount = std::env::var("SWAP_AMOUNT")
            .ok()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        let fraction = match std::env::var("SWAP_FRACTION") {
            Ok(label) => Some(Fraction::parse(&label).ok_or_else(|| {
                AppError::Config(format!("SWAP_FRACTION must be max or half, got {label:?}"))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            market_file,
            account_address,
            send_denom,
            out_denom,
            amount,
            fraction,
            slippage: load_slippage_settings(),
        })
    }
}

/// Load slippage settings from environment variables
pub fn load_slippage_settings() -> SlippageSettings {
    let presets = std::env::var("SLIPPAGE_PRESETS")
        .ok()
        .map(|raw| parse_presets(&raw))
        .filter(|presets| !presets.is_empty())
        .unwrap_or_else(|| SlippageSettings::default().presets);

    let manual = std::env::var("MANUAL_SLIPPAGE").ok();

    SlippageSettings { presets, manual }
}

fn parse_presets(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Offline market snapshot: listed currencies, the account's balances and
/// the route table served by the static router.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketFile {
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub balances: Vec<BalanceEntry>,
    #[serde(default)]
    pub routes: Vec<FixedRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceEntry {
    pub denom: String,
    pub amount: BigDecimal,
}

impl MarketFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let market: MarketFile = serde_json::from_str(raw)?;
        if market.currencies.len() < 2 {
            return Err(AppError::Config(
                "market file must list at least two currencies".into(),
            ));
        }
        Ok(market)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_split_and_trimmed() {
        assert_eq!(parse_presets(" 0.5, 1 ,,2"), vec!["0.5", "1", "2"]);
        assert!(parse_presets(" , ").is_empty());
    }

    #[test]
    fn default_presets() {
        let settings = SlippageSettings::default();
        assert_eq!(settings.presets, vec!["1", "3", "5"]);
        assert!(settings.manual.is_none());
    }

    #[test]
    fn parses_market_file() {
        let raw = r#"{
            "currencies": [
                { "symbol": "OSMO", "denom": "uosmo", "decimals": 6 },
                { "symbol": "ATOM", "denom": "ibc/27394F", "decimals": 6,
                  "origin_chain": "Cosmos Hub", "channel_paths": ["channel-0"],
                  "image": "https://example.com/atom.svg" }
            ],
            "balances": [{ "denom": "uosmo", "amount": "250.5" }],
            "routes": [{
                "token_in_denom": "uosmo",
                "hops": [{ "pool_id": "1", "token_out_denom": "ibc/27394F" }],
                "spot_price": "1.0",
                "execution_price": "0.995",
                "swap_fee": "0.002"
            }]
        }"#;
        let market = MarketFile::parse(raw).unwrap();
        assert_eq!(market.currencies.len(), 2);
        assert_eq!(market.currencies[1].channel_paths, vec!["channel-0"]);
        assert!(market.currencies[1].image.is_some());
        assert_eq!(market.balances[0].amount.to_string(), "250.5");
        assert!(market.routes[0].max_amount_in.is_none());
    }

    #[test]
    fn market_file_needs_two_currencies() {
        let raw = r#"{ "currencies": [{ "symbol": "OSMO", "denom": "uosmo", "decimals": 6 }] }"#;
        assert!(matches!(MarketFile::parse(raw), Err(AppError::Config(_))));
        assert!(matches!(MarketFile::parse("{"), Err(AppError::SerdeJson(_))));
    }

    #[test]
    fn bad_image_url_and_amount_are_serialization_errors() {
        let bad_url = r#"{ "currencies": [
            { "symbol": "OSMO", "denom": "uosmo", "decimals": 6, "image": "not a url" },
            { "symbol": "ION", "denom": "uion", "decimals": 6 }
        ] }"#;
        assert!(matches!(MarketFile::parse(bad_url), Err(AppError::SerdeJson(_))));

        let bad_amount = r#"{ "currencies": [
            { "symbol": "OSMO", "denom": "uosmo", "decimals": 6 },
            { "symbol": "ION", "denom": "uion", "decimals": 6 }
        ], "balances": [{ "denom": "uosmo", "amount": "lots" }] }"#;
        assert!(matches!(MarketFile::parse(bad_amount), Err(AppError::SerdeJson(_))));
    }
}
