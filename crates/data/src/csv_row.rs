use chrono::NaiveDate;
use core_types::{Bar, Exchange, Interval};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::str::FromStr;

/// Bit-exact column mapping from the Chinese-language CSV headers real
/// inputs use, per spec.md §6. Kept here rather than re-derived because the
/// original source data is produced with these exact headers.
fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn field<'a>(headers: &csv::StringRecord, record: &'a csv::StringRecord, name: &str) -> Option<&'a str> {
    column_index(headers, name).and_then(|i| record.get(i))
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim()).ok()
}

/// Parses one CSV row into a `Bar`. Returns `Ok(None)` for a row that is
/// blank or otherwise skippable; `Err` for a row that is present but
/// malformed (caller logs and drops it rather than aborting the load).
pub fn parse_row(
    symbol: &str,
    exchange: Exchange,
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
) -> Result<Option<Bar>, String> {
    let date_str = field(headers, record, "交易日期").ok_or("missing 交易日期 column")?;
    if date_str.trim().is_empty() {
        return Ok(None);
    }
    let timestamp = NaiveDate::parse_from_str(date_str.trim(), "%Y%m%d")
        .map_err(|e| format!("bad date '{date_str}': {e}"))?;

    let open = field(headers, record, "开盘价").and_then(parse_decimal).ok_or("bad 开盘价")?;
    let high = field(headers, record, "最高价").and_then(parse_decimal).ok_or("bad 最高价")?;
    let low = field(headers, record, "最低价").and_then(parse_decimal).ok_or("bad 最低价")?;
    let close = field(headers, record, "收盘价").and_then(parse_decimal).ok_or("bad 收盘价")?;
    let pre_close = field(headers, record, "昨收价").and_then(parse_decimal).unwrap_or(open);
    let limit_up = field(headers, record, "今日涨停价").and_then(parse_decimal).unwrap_or(high);
    let limit_down = field(headers, record, "今日跌停价").and_then(parse_decimal).unwrap_or(low);

    let volume_lots = field(headers, record, "成交量(手)").and_then(parse_decimal).unwrap_or(Decimal::ZERO);
    let volume = volume_lots * dec!(100);

    let turnover_thousands = field(headers, record, "成交额(千元)").and_then(parse_decimal).unwrap_or(Decimal::ZERO);
    let turnover = turnover_thousands * dec!(1000);

    let mut extras: HashMap<String, Decimal> = HashMap::new();
    if let Some(v) = field(headers, record, "复权因子").and_then(parse_decimal) {
        extras.insert("adj_factor".to_string(), v);
    }
    if let Some(v) = field(headers, record, "总市值(万元)").and_then(parse_decimal) {
        extras.insert("total_mv".to_string(), v * dec!(10000));
    }
    if let Some(v) = field(headers, record, "市盈率").and_then(parse_decimal) {
        extras.insert("pe_ttm".to_string(), v);
    }
    if let Some(v) = field(headers, record, "换手率(%)").and_then(parse_decimal) {
        extras.insert("turnover_rate".to_string(), v);
    }

    let bar = Bar::new(
        symbol.to_string(),
        exchange,
        timestamp,
        Interval::Daily,
        open,
        high,
        low,
        close,
        volume,
        turnover,
        pre_close,
        limit_up,
        limit_down,
        extras,
    )
    .map_err(|e| e.to_string())?;

    Ok(Some(bar))
}
