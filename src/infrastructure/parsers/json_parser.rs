use crate::domain::{feed::*, quotes::*, types::*};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Raw JSON structures for the market snapshot feed.
///
/// Amounts arrive as display strings ("₹214.45", "$3,257.66", "+0.76%").
/// Every field is optional at the serde level so a missing value surfaces as
/// `InvalidInput` naming the field rather than a generic JSON error.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    as_of: Option<String>,
    #[serde(default)]
    lme: Vec<RawQuote>,
    #[serde(default)]
    mcx: Vec<RawQuote>,
    #[serde(default)]
    shfe: Vec<RawQuote>,
    avg_csp: Option<RawCashSettlement>,
    #[serde(default)]
    csp_history: Vec<RawSettlementDay>,
    #[serde(default)]
    suppliers: Vec<RawSupplier>,
    #[serde(default)]
    fx: Vec<RawFxRate>,
}

/// Raw exchange quote
#[derive(Debug, Deserialize)]
struct RawQuote {
    label: Option<String>,
    price: Option<String>,
    change_percent: Option<String>,
    updated: Option<String>,
}

/// Raw cash settlement average
#[derive(Debug, Deserialize)]
struct RawCashSettlement {
    price: Option<String>,
    period: Option<String>,
}

/// Raw daily cash settlement
#[derive(Debug, Deserialize)]
struct RawSettlementDay {
    date: Option<String>,
    price: Option<String>,
}

/// Raw supplier list price
#[derive(Debug, Deserialize)]
struct RawSupplier {
    name: Option<String>,
    price: Option<String>,
    grade: Option<String>,
    change_percent: Option<String>,
    updated: Option<String>,
}

/// Raw FX reference rate
#[derive(Debug, Deserialize)]
struct RawFxRate {
    name: Option<String>,
    rate: Option<String>,
    change_percent: Option<String>,
    updated: Option<String>,
}

/// Parse a market snapshot from a JSON string
pub fn parse_market_snapshot(json_str: &str) -> MonitorResult<MarketSnapshot> {
    let raw: RawSnapshot = serde_json::from_str(json_str)?;

    let as_of = parse_timestamp(require("as_of", raw.as_of.as_deref())?)?;
    let mut snapshot = MarketSnapshot::new(as_of);

    snapshot.lme = parse_quotes(Exchange::Lme, &raw.lme)?;
    snapshot.mcx = parse_quotes(Exchange::Mcx, &raw.mcx)?;
    snapshot.shfe = parse_quotes(Exchange::Shfe, &raw.shfe)?;

    if let Some(csp) = raw.avg_csp {
        let price = parse_amount(
            "avg_csp.price",
            require("avg_csp.price", csp.price.as_deref())?,
            Currency::Usd,
        )?;
        snapshot.avg_csp = Some(CashSettlement {
            price,
            currency: Currency::Usd,
            period: require("avg_csp.period", csp.period.as_deref())?.to_string(),
        });
    }

    snapshot.csp_history = raw
        .csp_history
        .iter()
        .map(parse_settlement_day)
        .collect::<MonitorResult<Vec<_>>>()?;

    snapshot.suppliers = raw
        .suppliers
        .iter()
        .map(parse_supplier)
        .collect::<MonitorResult<Vec<_>>>()?;

    snapshot.fx_rates = raw
        .fx
        .iter()
        .map(parse_fx_rate)
        .collect::<MonitorResult<Vec<_>>>()?;

    Ok(snapshot)
}

fn parse_quotes(exchange: Exchange, raw: &[RawQuote]) -> MonitorResult<Vec<QuoteUpdate>> {
    let currency = exchange.quote_currency();
    let mut quotes = Vec::with_capacity(raw.len());

    for quote in raw {
        let label = require(&format!("{} quote label", exchange), quote.label.as_deref())?;
        let field = |name: &str| format!("{} {} {}", exchange, label, name);

        let price = parse_amount(
            &field("price"),
            require(&field("price"), quote.price.as_deref())?,
            currency,
        )?;
        let change_percent = parse_percent(
            &field("change"),
            require(&field("change"), quote.change_percent.as_deref())?,
        )?;
        let timestamp = parse_timestamp(require(&field("updated"), quote.updated.as_deref())?)?;

        quotes.push(QuoteUpdate::new(
            label,
            price,
            currency,
            change_percent,
            timestamp,
        ));
    }

    Ok(quotes)
}

fn parse_settlement_day(raw: &RawSettlementDay) -> MonitorResult<CashSettlementDay> {
    let text = require("csp_history date", raw.date.as_deref())?;
    let date = chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| MonitorError::invalid(format!("Invalid date '{}': {}", text, e)))?;
    let field = format!("csp_history {} price", date);

    Ok(CashSettlementDay {
        date,
        price: parse_amount(&field, require(&field, raw.price.as_deref())?, Currency::Usd)?,
    })
}

fn parse_supplier(raw: &RawSupplier) -> MonitorResult<SupplierQuote> {
    let name = require("supplier name", raw.name.as_deref())?;
    let field = |f: &str| format!("supplier {} {}", name, f);

    Ok(SupplierQuote {
        supplier_name: name.to_string(),
        price_per_mt: parse_amount(
            &field("price"),
            require(&field("price"), raw.price.as_deref())?,
            Currency::Inr,
        )?,
        grade: require(&field("grade"), raw.grade.as_deref())?.to_string(),
        last_updated: parse_timestamp(require(&field("updated"), raw.updated.as_deref())?)?,
        change_percent: parse_percent(
            &field("change"),
            require(&field("change"), raw.change_percent.as_deref())?,
        )?,
    })
}

fn parse_fx_rate(raw: &RawFxRate) -> MonitorResult<FxUpdate> {
    let name = require("fx name", raw.name.as_deref())?;
    let field = |f: &str| format!("fx {} {}", name, f);

    Ok(FxUpdate {
        pair_name: name.to_string(),
        rate: parse_decimal(&field("rate"), require(&field("rate"), raw.rate.as_deref())?)?,
        change_percent: parse_percent(
            &field("change"),
            require(&field("change"), raw.change_percent.as_deref())?,
        )?,
        updated: parse_timestamp(require(&field("updated"), raw.updated.as_deref())?)?,
    })
}

fn require<'a>(field: &str, value: Option<&'a str>) -> MonitorResult<&'a str> {
    value.ok_or_else(|| MonitorError::invalid(format!("{} is missing", field)))
}

/// Parse a display amount such as "₹218,500" or "$3,257.66".
///
/// A leading currency symbol is optional but must match `expected`.
/// Thousands separators are dropped when they sit between groups of three
/// digits; rupee amounts may also use lakh grouping ("₹2,18,500").
pub fn parse_amount(field: &str, text: &str, expected: Currency) -> MonitorResult<Decimal> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();

    let digits = match chars.next().and_then(Currency::from_symbol) {
        Some(currency) if currency == expected => chars.as_str(),
        Some(currency) => {
            return Err(MonitorError::invalid(format!(
                "{} is quoted in {}, expected {}",
                field, currency, expected
            )))
        }
        None => trimmed,
    };

    parse_decimal(field, &strip_group_separators(field, digits, expected)?)
}

fn strip_group_separators(field: &str, text: &str, currency: Currency) -> MonitorResult<String> {
    if !text.contains(',') {
        return Ok(text.to_string());
    }

    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };
    let groups: Vec<&str> = integer.split(',').collect();
    let lead = groups[0].trim_start_matches(['+', '-']).len();
    let rest = &groups[1..];

    let western = (1..=3).contains(&lead) && rest.iter().all(|g| g.len() == 3);
    let lakh = currency == Currency::Inr
        && (1..=2).contains(&lead)
        && rest.last().is_some_and(|g| g.len() == 3)
        && rest[..rest.len() - 1].iter().all(|g| g.len() == 2);

    if !(western || lakh) || fraction.is_some_and(|f| f.contains(',')) {
        return Err(MonitorError::invalid(format!(
            "{} '{}' has misplaced thousands separators",
            field, text
        )));
    }

    let mut plain = groups.concat();
    if let Some(fraction) = fraction {
        plain.push('.');
        plain.push_str(fraction);
    }
    Ok(plain)
}

/// Parse a display percentage such as "+0.76%" or "-0.12%"
pub fn parse_percent(field: &str, text: &str) -> MonitorResult<Decimal> {
    let trimmed = text.trim();
    parse_decimal(field, trimmed.strip_suffix('%').unwrap_or(trimmed))
}

/// Parse timestamp from ISO 8601 string
fn parse_timestamp(ts_str: &str) -> MonitorResult<Timestamp> {
    chrono::DateTime::parse_from_rfc3339(ts_str)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| MonitorError::invalid(format!("Invalid timestamp '{}': {}", ts_str, e)))
}

/// Load and parse a market snapshot from file
pub fn load_market_snapshot(file_path: impl AsRef<Path>) -> MonitorResult<MarketSnapshot> {
    let content = std::fs::read_to_string(file_path)?;
    parse_market_snapshot(&content)
}
