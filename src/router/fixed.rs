use super::{RouteHop, RouteQuote, Router};
use crate::errors::Result;
use crate::models::Currency;
use crate::utils::floor_to_precision;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A pre-computed route between two denoms at fixed prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedRoute {
    pub token_in_denom: String,
    pub hops: Vec<RouteHop>,
    pub spot_price: BigDecimal,
    pub execution_price: BigDecimal,
    #[serde(default)]
    pub swap_fee: BigDecimal,
    /// Largest input the route can absorb; larger amounts are unroutable.
    #[serde(default)]
    pub max_amount_in: Option<BigDecimal>,
}

impl FixedRoute {
    pub fn token_out_denom(&self) -> Option<&str> {
        self.hops.last().map(|hop| hop.token_out_denom.as_str())
    }

    /// The same pools walked in the opposite direction, at reciprocal prices.
    pub fn reversed(&self) -> Option<FixedRoute> {
        let mut denoms = vec![self.token_in_denom.clone()];
        denoms.extend(self.hops.iter().map(|hop| hop.token_out_denom.clone()));
        denoms.reverse();

        let hops = self
            .hops
            .iter()
            .rev()
            .zip(denoms.iter().skip(1))
            .map(|(hop, denom)| RouteHop {
                pool_id: hop.pool_id.clone(),
                token_out_denom: denom.clone(),
            })
            .collect();

        Some(FixedRoute {
            token_in_denom: denoms.first()?.clone(),
            hops,
            spot_price: reciprocal(&self.spot_price),
            execution_price: reciprocal(&self.execution_price),
            swap_fee: self.swap_fee.clone(),
            max_amount_in: None,
        })
    }
}

fn reciprocal(price: &BigDecimal) -> BigDecimal {
    if price.is_zero() {
        BigDecimal::zero()
    } else {
        BigDecimal::one() / price
    }
}

/// Router answering from a fixed route table; reverse directions are derived
/// when only one direction is listed.
#[derive(Debug, Clone, Default)]
pub struct StaticRouter {
    routes: HashMap<(String, String), FixedRoute>,
}

impl StaticRouter {
    pub fn new(routes: impl IntoIterator<Item = FixedRoute>) -> Self {
        let mut router = Self::default();
        for route in routes {
            router.insert(route);
        }
        router
    }

    /// Adds a route, replacing any previous route for the same pair. Routes
    /// without hops are ignored.
    pub fn insert(&mut self, route: FixedRoute) {
        let Some(out) = route.token_out_denom().map(str::to_string) else {
            return;
        };
        self.routes
            .insert((route.token_in_denom.clone(), out), route);
    }

    fn lookup(&self, send: &str, out: &str) -> Option<FixedRoute> {
        if let Some(route) = self.routes.get(&(send.to_string(), out.to_string())) {
            return Some(route.clone());
        }
        self.routes
            .get(&(out.to_string(), send.to_string()))
            .and_then(FixedRoute::reversed)
    }
}

#[async_trait]
impl Router for StaticRouter {
    async fn best_route(
        &self,
        send: &Currency,
        out: &Currency,
        amount: &BigDecimal,
    ) -> Result<Option<RouteQuote>> {
        let Some(route) = self.lookup(&send.denom, &out.denom) else {
            debug!(send = %send.denom, out = %out.denom, "[ROUTER] no route for pair");
            return Ok(None);
        };
        if route.max_amount_in.as_ref().is_some_and(|max| amount > max) {
            debug!(send = %send.denom, out = %out.denom, "[ROUTER] amount exceeds route capacity");
            return Ok(None);
        }

        let output_amount = floor_to_precision(&(amount * &route.execution_price), out.decimals);
        Ok(Some(RouteQuote {
            token_in_denom: route.token_in_denom,
            hops: route.hops,
            output_amount,
            execution_price: route.execution_price,
            spot_price: route.spot_price,
            swap_fee: route.swap_fee,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn two_hop_route() -> FixedRoute {
        FixedRoute {
            token_in_denom: "uosmo".into(),
            hops: vec![
                RouteHop {
                    pool_id: "1".into(),
                    token_out_denom: "ibc/ATOM".into(),
                },
                RouteHop {
                    pool_id: "7".into(),
                    token_out_denom: "ibc/JUNO".into(),
                },
            ],
            spot_price: dec("2"),
            execution_price: dec("1.6"),
            swap_fee: dec("0.005"),
            max_amount_in: Some(dec("1000")),
        }
    }

    #[test]
    fn reversed_route_walks_pools_backwards() {
        let reversed = two_hop_route().reversed().unwrap();
        assert_eq!(reversed.token_in_denom, "ibc/JUNO");
        assert_eq!(
            reversed.hops,
            vec![
                RouteHop {
                    pool_id: "7".into(),
                    token_out_denom: "ibc/ATOM".into(),
                },
                RouteHop {
                    pool_id: "1".into(),
                    token_out_denom: "uosmo".into(),
                },
            ]
        );
        assert_eq!(reversed.spot_price, dec("0.5"));
        assert_eq!(reversed.execution_price, dec("0.625"));
    }

    #[tokio::test]
    async fn quotes_both_directions() {
        let router = StaticRouter::new([two_hop_route()]);
        let osmo = Currency::new("OSMO", "uosmo", 6);
        let juno = Currency::new("JUNO", "ibc/JUNO", 6);

        let forward = router.best_route(&osmo, &juno, &dec("10")).await.unwrap().unwrap();
        assert_eq!(forward.output_amount, dec("16"));
        assert_eq!(forward.hops.len(), 2);

        let backward = router.best_route(&juno, &osmo, &dec("16")).await.unwrap().unwrap();
        assert_eq!(backward.output_amount, dec("10"));
        assert_eq!(backward.token_in_denom, "ibc/JUNO");
    }

    #[tokio::test]
    async fn unknown_pair_and_capacity_yield_no_route() {
        let router = StaticRouter::new([two_hop_route()]);
        let osmo = Currency::new("OSMO", "uosmo", 6);
        let juno = Currency::new("JUNO", "ibc/JUNO", 6);
        let ion = Currency::new("ION", "uion", 6);

        assert!(router.best_route(&osmo, &ion, &dec("1")).await.unwrap().is_none());
        assert!(router.best_route(&osmo, &juno, &dec("1001")).await.unwrap().is_none());
    }
}
