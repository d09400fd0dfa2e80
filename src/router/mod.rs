//! Routing collaborator.
//!
//! The router searches liquidity pools for the best path between two
//! currencies. Only its result shape lives here; the search itself is external.

use crate::errors::Result;
use crate::models::Currency;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

pub mod fixed;

pub use fixed::{FixedRoute, StaticRouter};

/// One pool traversal of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHop {
    pub pool_id: String,
    pub token_out_denom: String,
}

/// Best route found for a given input amount.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuote {
    pub token_in_denom: String,
    pub hops: Vec<RouteHop>,
    /// Output amount in display units of the out currency.
    pub output_amount: BigDecimal,
    /// Realized out-per-in price of this trade.
    pub execution_price: BigDecimal,
    /// Out-per-in price before the trade, without swap fees.
    pub spot_price: BigDecimal,
    /// Cumulative swap fee ratio across all hops.
    pub swap_fee: BigDecimal,
}

#[async_trait]
pub trait Router: Send + Sync {
    /// Returns the best route for `amount` of `send` into `out`, or `None` if
    /// the pair cannot be routed.
    async fn best_route(
        &self,
        send: &Currency,
        out: &Currency,
        amount: &BigDecimal,
    ) -> Result<Option<RouteQuote>>;
}
