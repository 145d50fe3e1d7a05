//! # Aluminium Market Monitor
//!
//! Polls the market snapshot feed, keeps the market board current and logs
//! what the dashboard would render: futures ladders with their spreads,
//! landed prices, the import parity gap and the supplier benchmark.

use aluminium_monitor::utils::logger::setup_logger;
use aluminium_monitor::*;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logger().map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    info!("Starting Aluminium Market Monitor v{}", VERSION);

    let config = MonitorConfig::from_env()?;
    info!(
        "Snapshot source: {}, refresh every {}ms",
        config.snapshot_path.display(),
        config.refresh_interval.as_millis()
    );

    let board = MarketBoard::new();
    let (refresh_tx, refresh_rx) = mpsc::channel::<RefreshResult>(16);

    info!("Starting snapshot ingester task...");
    let ingester_board = board.clone();
    let ingester_handle = tokio::spawn(async move {
        let mut ingester = SnapshotIngester::new(refresh_rx, ingester_board);
        ingester.run().await;
        ingester.stats().clone()
    });

    let source = JsonFileSource::new(&config.snapshot_path);
    tokio::select! {
        delivered = poll_source(&source, refresh_tx, config.refresh_interval, config.cycle_limit()) => {
            info!("Polling finished after {} refreshes", delivered);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping refresh");
        }
    }

    let stats = ingester_handle.await?;
    info!(
        "Refreshes: {} ok, {} failed ({:.2}% success)",
        stats.successful_refreshes,
        stats.failed_refreshes,
        stats.success_rate()
    );

    match board.state()? {
        BoardState::Ready(view) => report_view(&view, &config),
        BoardState::Unavailable { reason } => {
            warn!("Market data unavailable: {}", reason);
        }
        BoardState::Empty => warn!("No market data received"),
    }

    Ok(())
}

fn report_view(view: &MarketView, config: &MonitorConfig) {
    info!("Market view as of {}", view.as_of);

    for exchange in [Exchange::Lme, Exchange::Mcx, Exchange::Shfe] {
        let Some(group) = view.group(exchange) else {
            info!("{}: no quotes", exchange);
            continue;
        };

        info!(
            "{} ({} contracts, trend {}, curve {})",
            exchange,
            group.ladder.contract_count(),
            group.trend,
            group
                .curve
                .map(|c| c.to_string())
                .unwrap_or_else(|| "n/a".to_string())
        );
        for quote in group.ladder.quotes() {
            info!(
                "  {:<12} {} {:+}% {}",
                quote.label,
                money(quote.currency, quote.price),
                quote.change_percent,
                quote.trend
            );
        }
        for record in &group.spreads {
            info!(
                "  spread {} {} ({})",
                record.label,
                record.display_delta(),
                record.spread.structure()
            );
        }
    }

    if let Some(csp) = &view.avg_csp {
        info!("Avg CSP {}: {}", csp.period, money(csp.currency, csp.price));
    }

    if let Some(changes) = view.settlement_changes(&config.fx_pair) {
        for change in changes {
            let percent = change
                .percent_change
                .map(|p| format!("{:+.2}%", round_for_display(p)))
                .unwrap_or_else(|| "n/a".to_string());
            info!(
                "CSP {}: {} ({}, {}, {:+.0} INR/MT)",
                change.date,
                money(Currency::Usd, change.price),
                change.display_usd_change(),
                percent,
                change.inr_change_per_mt().round()
            );
        }
    }

    let mcx_form = McxCalculatorForm {
        premium: config.mcx_premium.to_string(),
        delivery: config.mcx_delivery.to_string(),
        ..McxCalculatorForm::default()
    };
    let mcx_landed = match mcx_form.evaluate(view.front_month(Exchange::Mcx)) {
        Ok(price) => {
            info!("MCX landed price: {}/kg", money(Currency::Inr, price));
            Some(price)
        }
        Err(e) => {
            error!("MCX landed price unavailable: {}", e);
            None
        }
    };

    match (view.front_month(Exchange::Lme), view.fx_rate(&config.fx_pair)) {
        (Some(lme_spot), Some(fx)) => {
            let import_form = LmeImportForm {
                duty_percent: config.import_duty_percent.to_string(),
                ..LmeImportForm::prefilled(lme_spot, fx.rate)
            };
            match import_form.evaluate() {
                Ok(price) => info!(
                    "LME import landed price @ {} {}: {}/kg",
                    fx.pair_name,
                    fx.rate,
                    money(Currency::Inr, price)
                ),
                Err(e) => error!("LME import landed price unavailable: {}", e),
            }
        }
        _ => warn!("LME import calculator needs LME spot and {}", config.fx_pair),
    }

    if let Some(gap) = view.import_parity_gap(&config.fx_pair) {
        info!(
            "MCX over LME import parity: {}/kg",
            money(Currency::Inr, gap)
        );
    }

    if let Some(reference) = mcx_landed {
        info!("Suppliers against MCX landed {}/kg:", round_for_display(reference));
        for bench in benchmark_suppliers(&view.suppliers, reference) {
            info!(
                "  {:<10} {}/kg ({:+})",
                bench.supplier_name,
                money(Currency::Inr, bench.price_per_kg),
                round_for_display(bench.premium_over_reference)
            );
        }
    }

    match serde_json::to_string(view) {
        Ok(json) => debug!("Market view: {}", json),
        Err(e) => error!("Could not serialize market view: {}", e),
    }
}

fn money(currency: Currency, amount: Decimal) -> String {
    format!("{}{:.2}", currency.symbol(), round_for_display(amount))
}
