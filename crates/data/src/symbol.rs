use crate::error::DataError;
use core_types::Exchange;

/// Normalizes an unqualified 6-digit A-share code into its canonical
/// `CCCCCC.XX` form, per spec.md §6:
/// starts with `6` -> SH, `0`/`3` -> SZ, `4`/`8` -> BJ.
pub fn normalize_symbol(raw: &str) -> Result<String, DataError> {
    if let Some((code, suffix)) = raw.split_once('.') {
        if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
            return Ok(format!("{code}.{}", suffix.to_uppercase()));
        }
        return Err(DataError::MalformedSymbol(raw.to_string()));
    }

    if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(DataError::MalformedSymbol(raw.to_string()));
    }

    let exchange = exchange_for_code(raw).ok_or_else(|| DataError::MalformedSymbol(raw.to_string()))?;
    Ok(format!("{raw}.{exchange}"))
}

fn exchange_for_code(code: &str) -> Option<Exchange> {
    match code.chars().next()? {
        '6' => Some(Exchange::SH),
        '0' | '3' => Some(Exchange::SZ),
        '4' | '8' => Some(Exchange::BJ),
        _ => None,
    }
}

/// Splits a canonical `CCCCCC.XX` symbol into its exchange.
pub fn exchange_of(symbol: &str) -> Result<Exchange, DataError> {
    let (_, suffix) = symbol
        .split_once('.')
        .ok_or_else(|| DataError::MalformedSymbol(symbol.to_string()))?;
    match suffix.to_uppercase().as_str() {
        "SH" => Ok(Exchange::SH),
        "SZ" => Ok(Exchange::SZ),
        "BJ" => Ok(Exchange::BJ),
        _ => Err(DataError::MalformedSymbol(symbol.to_string())),
    }
}
