//! Swap form state: currency selection, amount entry and quote caching.
//!
//! A `SwapQuoteConfig` lives as long as one swap widget. It is mutated
//! synchronously by input events and asks the router for quotes through
//! [`QuoteRequest`]s, of which only the latest is ever applied.

use crate::balance::BalanceProvider;
use crate::errors::{AppError, QuoteError, Result};
use crate::models::{Currency, Fraction, Side};
use crate::registry::{AssetRegistry, selectable_currencies};
use crate::router::{RouteQuote, Router};
use crate::slippage::SlippageConfig;
use crate::utils::{
    floor_to_precision, format_amount, fraction_digits, normalize_amount_input, parse_amount,
};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub mod quote;
pub mod request;
pub mod submit;

pub use quote::{Quote, QuoteInput, QuoteKey, derive_quote};
pub use request::{QuoteRequest, RequestTracker};
pub use submit::{Coin, MultihopSwapMsg, SwapAmountInRoute};

pub struct SwapQuoteConfig {
    address: String,
    registry: Arc<dyn AssetRegistry>,
    balances: Arc<dyn BalanceProvider>,
    send_currency: Currency,
    out_currency: Currency,
    raw_amount: String,
    fraction: Option<Fraction>,
    slippage: SlippageConfig,
    balance_rx: watch::Receiver<BigDecimal>,
    last_quote: Option<Quote>,
    error: Option<QuoteError>,
    requests: RequestTracker,
}

impl SwapQuoteConfig {
    pub fn new(
        address: impl Into<String>,
        registry: Arc<dyn AssetRegistry>,
        balances: Arc<dyn BalanceProvider>,
        send_currency: Currency,
        out_currency: Currency,
    ) -> Result<Self> {
        if send_currency == out_currency {
            return Err(AppError::Config(format!(
                "send and out currency must differ, both are {}",
                send_currency.denom
            )));
        }
        let address = address.into();
        let mut balance_rx = balances.subscribe(&address, &send_currency);
        balance_rx.borrow_and_update();

        Ok(Self {
            address,
            registry,
            balances,
            send_currency,
            out_currency,
            raw_amount: String::new(),
            fraction: None,
            slippage: SlippageConfig::default(),
            balance_rx,
            last_quote: None,
            error: None,
            requests: RequestTracker::default(),
        })
    }

    /// Starts with the first two registry currencies.
    pub fn from_registry(
        address: impl Into<String>,
        registry: Arc<dyn AssetRegistry>,
        balances: Arc<dyn BalanceProvider>,
    ) -> Result<Self> {
        let mut currencies = registry.currencies().into_iter();
        let (Some(send), Some(out)) = (currencies.next(), currencies.next()) else {
            return Err(AppError::Config("registry needs at least two currencies".into()));
        };
        Self::new(address, registry, balances, send, out)
    }

    pub fn with_slippage(mut self, slippage: SlippageConfig) -> Self {
        self.slippage = slippage;
        self
    }

    // ---------- reads ----------

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn send_currency(&self) -> &Currency {
        &self.send_currency
    }

    pub fn out_currency(&self) -> &Currency {
        &self.out_currency
    }

    pub fn raw_amount(&self) -> &str {
        &self.raw_amount
    }

    /// Parsed send amount; empty input is zero.
    pub fn amount(&self) -> BigDecimal {
        parse_amount(&self.raw_amount).unwrap_or_else(BigDecimal::zero)
    }

    pub fn fraction(&self) -> Option<Fraction> {
        self.fraction
    }

    pub fn available_balance(&self) -> BigDecimal {
        self.balance_rx.borrow().clone()
    }

    pub fn slippage(&self) -> &SlippageConfig {
        &self.slippage
    }

    pub fn slippage_tolerance(&self) -> BigDecimal {
        self.slippage.tolerance()
    }

    /// Quote error first, then the manual slippage error.
    pub fn error(&self) -> Option<&QuoteError> {
        self.error.as_ref().or_else(|| self.slippage.error())
    }

    pub fn quote_key(&self) -> QuoteKey {
        QuoteKey {
            send_denom: self.send_currency.denom.clone(),
            out_denom: self.out_currency.denom.clone(),
            raw_amount: self.raw_amount.clone(),
        }
    }

    /// Last derived quote, possibly for older inputs. Kept for display.
    pub fn last_quote(&self) -> Option<&Quote> {
        self.last_quote.as_ref()
    }

    /// Last derived quote if it matches the current inputs.
    pub fn current_quote(&self) -> Option<&Quote> {
        self.last_quote
            .as_ref()
            .filter(|quote| quote.key == self.quote_key())
    }

    /// Output amount of the cached quote, zero if none was ever derived.
    pub fn expected_output(&self) -> BigDecimal {
        self.last_quote
            .as_ref()
            .map(|quote| quote.output_amount.clone())
            .unwrap_or_else(BigDecimal::zero)
    }

    /// Currencies offered for one side of the form.
    pub fn selectable_currencies(&self, side: Side) -> Vec<Currency> {
        let exclude = match side {
            Side::Send => &self.out_currency,
            Side::Out => &self.send_currency,
        };
        selectable_currencies(self.registry.as_ref(), exclude)
    }

    // ---------- currency selection ----------

    pub fn set_send_currency(&mut self, currency: Currency) {
        if currency == self.send_currency {
            return;
        }
        if currency == self.out_currency {
            std::mem::swap(&mut self.send_currency, &mut self.out_currency);
        } else {
            self.send_currency = currency;
        }
        debug!(
            send = %self.send_currency.denom,
            out = %self.out_currency.denom,
            "[SWAP] send currency set"
        );
        self.on_send_currency_changed();
    }

    pub fn set_out_currency(&mut self, currency: Currency) {
        if currency == self.out_currency {
            return;
        }
        if currency == self.send_currency {
            std::mem::swap(&mut self.send_currency, &mut self.out_currency);
            self.on_send_currency_changed();
        } else {
            self.out_currency = currency;
            self.invalidate();
        }
        debug!(
            send = %self.send_currency.denom,
            out = %self.out_currency.denom,
            "[SWAP] out currency set"
        );
    }

    /// Resolves `denom` through the registry; unknown denoms are recorded as
    /// `CurrencyNotFound` and leave the selection untouched.
    pub fn select_denom(&mut self, side: Side, denom: &str) -> std::result::Result<(), QuoteError> {
        let Some(currency) = self.registry.currency(denom) else {
            let err = QuoteError::CurrencyNotFound(denom.to_string());
            self.error = Some(err.clone());
            return Err(err);
        };
        match side {
            Side::Send => self.set_send_currency(currency),
            Side::Out => self.set_out_currency(currency),
        }
        Ok(())
    }

    /// Swaps the sides. The send amount becomes the last known output amount,
    /// or is cleared when there is none.
    pub fn switch_in_and_out(&mut self) {
        let previous_output = self
            .last_quote
            .as_ref()
            .filter(|quote| quote.send == self.send_currency && quote.out == self.out_currency)
            .map(|quote| quote.output_amount.clone())
            .filter(|output| !output.is_zero());

        std::mem::swap(&mut self.send_currency, &mut self.out_currency);
        self.fraction = None;
        self.raw_amount = previous_output
            .map(|output| format_amount(&output, self.send_currency.decimals))
            .unwrap_or_default();
        debug!(
            send = %self.send_currency.denom,
            out = %self.out_currency.denom,
            amount = %self.raw_amount,
            "[SWAP] switched sides"
        );
        self.on_send_currency_changed();
    }

    fn on_send_currency_changed(&mut self) {
        self.balance_rx = self.balances.subscribe(&self.address, &self.send_currency);
        self.balance_rx.borrow_and_update();
        if self.fraction.is_some() {
            self.apply_fraction();
        } else if fraction_digits(&self.raw_amount) > self.send_currency.decimals as usize {
            let amount = floor_to_precision(&self.amount(), self.send_currency.decimals);
            self.raw_amount = format_amount(&amount, self.send_currency.decimals);
        }
        self.invalidate();
    }

    // ---------- amount entry ----------

    /// Accepts empty or non-negative decimal text within the send currency's
    /// precision. Returns `false` and leaves state untouched otherwise.
    pub fn set_amount(&mut self, text: &str) -> bool {
        let Some(amount) = normalize_amount_input(text) else {
            debug!(input = text, "[SWAP] rejected amount");
            return false;
        };
        if fraction_digits(&amount) > self.send_currency.decimals as usize {
            debug!(
                input = text,
                decimals = self.send_currency.decimals,
                "[SWAP] rejected amount precision"
            );
            return false;
        }
        self.fraction = None;
        if amount != self.raw_amount {
            self.raw_amount = amount;
            self.invalidate();
        }
        true
    }

    /// MAX / HALF shortcut. `None` keeps the current amount but stops tracking
    /// the balance.
    pub fn set_fraction(&mut self, fraction: Option<Fraction>) {
        self.fraction = fraction;
        if self.fraction.is_some() {
            self.apply_fraction();
        }
    }

    fn apply_fraction(&mut self) {
        let Some(fraction) = self.fraction else {
            return;
        };
        let decimals = self.send_currency.decimals;
        let amount = floor_to_precision(&(fraction.ratio() * self.available_balance()), decimals);
        let raw_amount = format_amount(&amount, decimals);
        if raw_amount != self.raw_amount {
            self.raw_amount = raw_amount;
            self.invalidate();
        }
    }

    /// Applies a pending balance change, if any. Returns whether one was seen.
    pub fn sync_balance(&mut self) -> bool {
        if !self.balance_rx.has_changed().unwrap_or(false) {
            return false;
        }
        self.balance_rx.borrow_and_update();
        debug!(denom = %self.send_currency.denom, "[BALANCE] balance changed");
        self.apply_fraction();
        true
    }

    /// Waits for the next balance change and applies it. Returns `false` once
    /// the provider stops publishing.
    pub async fn balance_changed(&mut self) -> bool {
        if self.balance_rx.changed().await.is_err() {
            return false;
        }
        self.balance_rx.borrow_and_update();
        self.apply_fraction();
        true
    }

    // ---------- slippage ----------

    pub fn select_slippage(&mut self, index: usize) -> bool {
        let selected = self.slippage.select(index);
        self.reprice_cached_quote();
        selected
    }

    pub fn set_manual_slippage(&mut self, text: &str) {
        self.slippage.set_manual(text);
        self.reprice_cached_quote();
    }

    pub fn set_is_manual_slippage(&mut self, is_manual: bool) {
        self.slippage.set_is_manual(is_manual);
        self.reprice_cached_quote();
    }

    fn reprice_cached_quote(&mut self) {
        let tolerance = self.slippage.tolerance();
        if let Some(quote) = self.last_quote.as_mut() {
            quote.reprice(&tolerance);
        }
    }

    // ---------- quoting ----------

    /// Marks the cached quote stale and drops interest in pending requests.
    fn invalidate(&mut self) {
        self.error = None;
        self.requests.cancel_pending();
    }

    pub fn quote_input(&self) -> QuoteInput {
        QuoteInput {
            key: self.quote_key(),
            send: self.send_currency.clone(),
            out: self.out_currency.clone(),
            amount: self.amount(),
        }
    }

    /// Issues a request for the current inputs, superseding any pending one.
    pub fn begin_quote(&mut self) -> QuoteRequest {
        QuoteRequest {
            seq: self.requests.issue(),
            input: self.quote_input(),
        }
    }

    /// Applies a router response. Responses to superseded requests are
    /// dropped and `false` is returned.
    pub fn complete_quote(
        &mut self,
        request: &QuoteRequest,
        outcome: Result<Option<RouteQuote>>,
    ) -> bool {
        if !self.requests.is_latest(request.seq) || request.input.key != self.quote_key() {
            debug!(
                seq = request.seq,
                latest = self.requests.latest(),
                "[QUOTE] dropping stale response"
            );
            return false;
        }
        let route = match outcome {
            Ok(route) => route,
            Err(e) => {
                warn!(error = %e, "[QUOTE] router failed");
                self.error = Some(e.into());
                return true;
            }
        };
        match derive_quote(&request.input, route, &self.slippage.tolerance()) {
            Ok(quote) => {
                debug!(seq = request.seq, output = %quote.output_amount, "[QUOTE] applied");
                self.last_quote = Some(quote);
                self.error = None;
            }
            Err(e) => {
                info!(error = %e, "[QUOTE] quote failed");
                self.error = Some(e);
            }
        }
        true
    }

    /// Requests, awaits and applies a quote for the current inputs.
    pub async fn refresh_quote(
        &mut self,
        router: &dyn Router,
    ) -> std::result::Result<&Quote, QuoteError> {
        let request = self.begin_quote();
        let outcome = request.fetch(router).await;
        self.complete_quote(&request, outcome);
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let no_route = QuoteError::NoRoute {
            send: self.send_currency.symbol.clone(),
            out: self.out_currency.symbol.clone(),
        };
        self.current_quote().ok_or(no_route)
    }
}
