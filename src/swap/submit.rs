//! Conversion of a current quote into a swap message for the wallet layer.

use super::SwapQuoteConfig;
use crate::errors::QuoteError;
use crate::utils::{format_amount, to_base_units};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Amount in minimal units, e.g. `{ "denom": "uosmo", "amount": "10000000" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAmountInRoute {
    pub pool_id: String,
    pub token_out_denom: String,
}

/// Multihop swap-exact-amount-in message, ready to be signed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultihopSwapMsg {
    pub sender: String,
    pub routes: Vec<SwapAmountInRoute>,
    pub token_in: Coin,
    pub token_out_min_amount: String,
    /// Tolerance the minimum was computed with, in percent.
    pub slippage_percent: String,
}

impl SwapQuoteConfig {
    /// Whether the presentation layer should enable the swap button.
    pub fn can_submit(&self) -> bool {
        self.try_build_swap_msg().is_ok()
    }

    /// Builds the swap message for the current quote. Failures are recorded
    /// on the config as well as returned.
    pub fn build_swap_msg(&mut self) -> Result<MultihopSwapMsg, QuoteError> {
        let result = self.try_build_swap_msg();
        match &result {
            Ok(msg) => info!(
                sender = %msg.sender,
                hops = msg.routes.len(),
                token_in = %msg.token_in.amount,
                min_out = %msg.token_out_min_amount,
                "[SWAP] swap message built"
            ),
            Err(e) => self.error = Some(e.clone()),
        }
        result
    }

    fn try_build_swap_msg(&self) -> Result<MultihopSwapMsg, QuoteError> {
        if let Some(err) = self.slippage.error() {
            return Err(err.clone());
        }
        let no_route = || QuoteError::NoRoute {
            send: self.send_currency.symbol.clone(),
            out: self.out_currency.symbol.clone(),
        };
        let quote = self.current_quote().ok_or_else(no_route)?;
        let route = quote.route.as_ref().ok_or_else(no_route)?;
        if quote.amount_in.is_zero() {
            return Err(no_route());
        }

        let available = self.available_balance();
        if quote.amount_in > available {
            return Err(QuoteError::InsufficientBalance {
                denom: self.send_currency.symbol.clone(),
                available: format_amount(&available, self.send_currency.decimals),
            });
        }

        let token_in = self
            .registry
            .currency(&route.token_in_denom)
            .ok_or_else(|| QuoteError::CurrencyNotFound(route.token_in_denom.clone()))?;

        let mut routes = Vec::with_capacity(route.hops.len());
        let mut token_out = None;
        for hop in &route.hops {
            let currency = self
                .registry
                .currency(&hop.token_out_denom)
                .ok_or_else(|| QuoteError::CurrencyNotFound(hop.token_out_denom.clone()))?;
            routes.push(SwapAmountInRoute {
                pool_id: hop.pool_id.clone(),
                token_out_denom: currency.denom.clone(),
            });
            token_out = Some(currency);
        }
        let token_out = token_out.ok_or_else(no_route)?;

        Ok(MultihopSwapMsg {
            sender: self.address.clone(),
            routes,
            token_in: Coin {
                denom: token_in.denom.clone(),
                amount: to_base_units(&quote.amount_in, token_in.decimals).to_string(),
            },
            token_out_min_amount: to_base_units(
                &quote.min_output_after_slippage,
                token_out.decimals,
            )
            .to_string(),
            slippage_percent: self.slippage.slippage_percent(),
        })
    }
}
