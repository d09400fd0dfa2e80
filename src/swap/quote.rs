//! Quote derivation from a router result.

use crate::errors::QuoteError;
use crate::models::Currency;
use crate::router::RouteQuote;
use crate::utils::floor_to_precision;
use bigdecimal::BigDecimal;
use num_traits::{One, Zero};

/// Identifies the inputs a quote was derived for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub send_denom: String,
    pub out_denom: String,
    pub raw_amount: String,
}

/// Everything `derive_quote` needs besides the router answer.
#[derive(Debug, Clone)]
pub struct QuoteInput {
    pub key: QuoteKey,
    pub send: Currency,
    pub out: Currency,
    pub amount: BigDecimal,
}

impl QuoteInput {
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub key: QuoteKey,
    pub send: Currency,
    pub out: Currency,
    pub amount_in: BigDecimal,
    pub output_amount: BigDecimal,
    /// Out-per-in spot price before the trade; zero when unknown.
    pub spot_price: BigDecimal,
    pub swap_fee: BigDecimal,
    /// `1 - execution / spot`, clamped to [0, 1].
    pub price_impact: BigDecimal,
    pub min_output_after_slippage: BigDecimal,
    pub route: Option<RouteQuote>,
}

impl Quote {
    /// Inert quote for an empty or zero amount.
    pub fn zero(input: &QuoteInput) -> Self {
        Self {
            key: input.key.clone(),
            send: input.send.clone(),
            out: input.out.clone(),
            amount_in: BigDecimal::zero(),
            output_amount: BigDecimal::zero(),
            spot_price: BigDecimal::zero(),
            swap_fee: BigDecimal::zero(),
            price_impact: BigDecimal::zero(),
            min_output_after_slippage: BigDecimal::zero(),
            route: None,
        }
    }

    /// "1 send = x out", floored to the out currency's decimals.
    pub fn spot_price_out_over_in(&self) -> Result<BigDecimal, QuoteError> {
        if self.spot_price.is_zero() {
            return Err(QuoteError::UndefinedPrice);
        }
        Ok(floor_to_precision(&self.spot_price, self.out.decimals))
    }

    /// "1 out = x send", floored to the send currency's decimals.
    pub fn spot_price_in_over_out(&self) -> Result<BigDecimal, QuoteError> {
        if self.spot_price.is_zero() {
            return Err(QuoteError::UndefinedPrice);
        }
        Ok(floor_to_precision(
            &(BigDecimal::one() / &self.spot_price),
            self.send.decimals,
        ))
    }

    /// Recomputes the minimum output for a new tolerance.
    pub fn reprice(&mut self, tolerance: &BigDecimal) {
        self.min_output_after_slippage =
            min_output(&self.output_amount, tolerance, self.out.decimals);
    }
}

/// Derives a quote from the router's answer.
///
/// Zero amounts never reach the router and produce a zero quote. A missing
/// route is `NoRoute`.
pub fn derive_quote(
    input: &QuoteInput,
    route: Option<RouteQuote>,
    tolerance: &BigDecimal,
) -> Result<Quote, QuoteError> {
    if input.is_zero() {
        return Ok(Quote::zero(input));
    }
    let Some(route) = route else {
        return Err(QuoteError::NoRoute {
            send: input.send.symbol.clone(),
            out: input.out.symbol.clone(),
        });
    };

    let output_amount = route.output_amount.clone();
    let price_impact = price_impact(&route.execution_price, &route.spot_price);
    let min_output_after_slippage = min_output(&output_amount, tolerance, input.out.decimals);

    Ok(Quote {
        key: input.key.clone(),
        send: input.send.clone(),
        out: input.out.clone(),
        amount_in: input.amount.clone(),
        output_amount,
        spot_price: route.spot_price.clone(),
        swap_fee: route.swap_fee.clone(),
        price_impact,
        min_output_after_slippage,
        route: Some(route),
    })
}

fn price_impact(execution_price: &BigDecimal, spot_price: &BigDecimal) -> BigDecimal {
    if spot_price.is_zero() {
        return BigDecimal::zero();
    }
    let impact = BigDecimal::one() - execution_price / spot_price;
    impact.clamp(BigDecimal::zero(), BigDecimal::one())
}

fn min_output(output: &BigDecimal, tolerance: &BigDecimal, decimals: u32) -> BigDecimal {
    let kept = (BigDecimal::one() - tolerance).max(BigDecimal::zero());
    floor_to_precision(&(output * kept), decimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouteHop;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn input(amount: &str) -> QuoteInput {
        QuoteInput {
            key: QuoteKey {
                send_denom: "uosmo".into(),
                out_denom: "uatom".into(),
                raw_amount: amount.into(),
            },
            send: Currency::new("OSMO", "uosmo", 6),
            out: Currency::new("ATOM", "uatom", 6),
            amount: if amount.is_empty() { BigDecimal::zero() } else { dec(amount) },
        }
    }

    fn route(output: &str, execution: &str, spot: &str) -> RouteQuote {
        RouteQuote {
            token_in_denom: "uosmo".into(),
            hops: vec![RouteHop {
                pool_id: "1".into(),
                token_out_denom: "uatom".into(),
            }],
            output_amount: dec(output),
            execution_price: dec(execution),
            spot_price: dec(spot),
            swap_fee: dec("0.002"),
        }
    }

    #[test]
    fn osmo_to_atom_scenario() {
        let quote = derive_quote(&input("10"), Some(route("9.95", "0.995", "1.0")), &dec("0.01"))
            .unwrap();
        assert_eq!(quote.output_amount, dec("9.95"));
        assert_eq!(quote.price_impact, dec("0.005"));
        assert_eq!(quote.min_output_after_slippage, dec("9.8505"));
        assert_eq!(quote.swap_fee, dec("0.002"));
        assert_eq!(quote.spot_price_out_over_in().unwrap(), dec("1"));
        assert_eq!(quote.spot_price_in_over_out().unwrap(), dec("1"));
    }

    #[test]
    fn zero_amount_is_inert() {
        for amount in ["0", "", "0.000"] {
            let quote = derive_quote(&input(amount), None, &dec("0.01")).unwrap();
            assert!(quote.output_amount.is_zero());
            assert!(quote.route.is_none());
            assert_eq!(quote.spot_price_out_over_in(), Err(QuoteError::UndefinedPrice));
        }
    }

    #[test]
    fn missing_route_is_no_route() {
        let err = derive_quote(&input("10"), None, &dec("0.01")).unwrap_err();
        assert_eq!(
            err,
            QuoteError::NoRoute {
                send: "OSMO".into(),
                out: "ATOM".into()
            }
        );
    }

    #[test]
    fn price_impact_is_clamped() {
        // execution better than spot
        let better = derive_quote(&input("10"), Some(route("11", "1.1", "1")), &dec("0")).unwrap();
        assert_eq!(better.price_impact, dec("0"));
        // zero execution price
        let worst = derive_quote(&input("10"), Some(route("0", "0", "1")), &dec("0")).unwrap();
        assert_eq!(worst.price_impact, dec("1"));
        // zero spot never divides
        let undefined =
            derive_quote(&input("10"), Some(route("1", "0.1", "0")), &dec("0")).unwrap();
        assert_eq!(undefined.price_impact, dec("0"));
        assert_eq!(undefined.spot_price_in_over_out(), Err(QuoteError::UndefinedPrice));
    }

    #[test]
    fn reciprocal_spot_prices_are_floored() {
        let quote = derive_quote(&input("3"), Some(route("9", "3", "3")), &dec("0.01")).unwrap();
        assert_eq!(quote.spot_price_out_over_in().unwrap(), dec("3"));
        assert_eq!(quote.spot_price_in_over_out().unwrap(), dec("0.333333"));
    }

    #[test]
    fn reprice_updates_min_output() {
        let mut quote =
            derive_quote(&input("10"), Some(route("9.95", "0.995", "1")), &dec("0.01")).unwrap();
        quote.reprice(&dec("0.05"));
        assert_eq!(quote.min_output_after_slippage, dec("9.4525"));
    }
}
