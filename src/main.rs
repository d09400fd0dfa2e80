use anyhow::Result;
use std::sync::Arc;
use trade_clipboard::{
    balance::InMemoryBalances,
    config::{AppConfig, HOME_CHAIN_NAME, MarketFile},
    errors::{AppError, QuoteError},
    models::Side,
    registry::{AssetRegistry, InMemoryRegistry},
    router::StaticRouter,
    slippage::SlippageConfig,
    swap::{Quote, SwapQuoteConfig},
    utils::{self, format_amount, format_percent},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::from_env()?;
    let market = MarketFile::load(&config.market_file)?;
    tracing::info!(
        file = %config.market_file.display(),
        currencies = market.currencies.len(),
        routes = market.routes.len(),
        "[INIT] market loaded"
    );

    let registry = Arc::new(InMemoryRegistry::new(market.currencies));
    let balances = Arc::new(InMemoryBalances::new());
    for entry in market.balances {
        balances.set_balance(&config.account_address, &entry.denom, entry.amount);
    }
    let router = StaticRouter::new(market.routes);

    let lookup = |denom: &str| {
        registry
            .currency(denom)
            .ok_or_else(|| AppError::Config(format!("{denom} is not listed in the market file")))
    };
    let send = lookup(&config.send_denom)?;
    let out = lookup(&config.out_denom)?;

    let mut slippage = SlippageConfig::new(&config.slippage.presets)?;
    if let Some(manual) = &config.slippage.manual {
        slippage.set_manual(manual);
    }

    let mut session = SwapQuoteConfig::new(
        config.account_address.clone(),
        registry.clone(),
        balances.clone(),
        send,
        out,
    )?
    .with_slippage(slippage);

    for currency in session.selectable_currencies(Side::Out) {
        tracing::debug!(
            symbol = %currency.symbol,
            chain = currency.meta_label(HOME_CHAIN_NAME),
            "[INIT] selectable out currency"
        );
    }

    match (config.fraction, config.amount.as_deref()) {
        (Some(fraction), _) => session.set_fraction(Some(fraction)),
        (None, Some(amount)) => {
            if !session.set_amount(amount) {
                return Err(QuoteError::InvalidAmountFormat(amount.to_string()).into());
            }
        }
        (None, None) => tracing::warn!("[INIT] no SWAP_AMOUNT or SWAP_FRACTION, quoting zero"),
    }

    tracing::info!(
        address = %session.address(),
        send = %session.send_currency(),
        out = %session.out_currency(),
        amount = %session.raw_amount(),
        available = %format_amount(&session.available_balance(), session.send_currency().decimals),
        slippage = %session.slippage().slippage_percent(),
        "[INIT] swap form ready"
    );

    match session.refresh_quote(&router).await {
        Ok(quote) => log_quote(quote),
        Err(e) => tracing::warn!(error = %e, "[QUOTE] no quote available"),
    }

    if session.can_submit() {
        let msg = session.build_swap_msg()?;
        println!("{}", serde_json::to_string_pretty(&msg)?);
    } else if let Some(e) = session.error() {
        tracing::warn!(error = %e, "[SWAP] swap disabled");
    }

    Ok(())
}

fn log_quote(quote: &Quote) {
    let rate = quote
        .spot_price_out_over_in()
        .map(|price| format_amount(&price, 3))
        .unwrap_or_else(|_| "-".into());
    tracing::info!(
        "[QUOTE] 1 {} = {} {} | fee {} | impact {} | min received {} {}",
        quote.send.symbol,
        rate,
        quote.out.symbol,
        format_percent(&quote.swap_fee, 2),
        format_percent(&quote.price_impact, 2),
        format_amount(&quote.min_output_after_slippage, quote.out.decimals),
        quote.out.symbol,
    );
}
