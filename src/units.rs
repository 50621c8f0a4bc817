//! Exact conversion between human-readable decimal prices and the
//! contracts' 18-decimal fixed-point base unit.
//!
//! Validation happens here, before any network call: non-numeric, zero and
//! negative inputs are rejected with [`Error::InvalidPrice`].

use ethers_core::types::U256;

use crate::error::{Error, Result};

/// Fixed-point scale of on-chain amounts (wei per whole unit).
pub const PRICE_DECIMALS: usize = 18;

fn scale() -> U256 {
    U256::exp10(PRICE_DECIMALS)
}

/// Parse a positive decimal string (e.g. `"1.5"`) into base units.
///
/// Exact to 18 decimal places; more fractional digits than that, a
/// non-numeric string, zero, or a signed value are all `InvalidPrice`.
pub fn parse_price(price: &str) -> Result<U256> {
    let trimmed = price.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidPrice("empty string".into()));
    }
    if trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(Error::InvalidPrice(format!("signed value: {trimmed}")));
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(Error::InvalidPrice(format!("not a number: {trimmed}")));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidPrice(format!("not a number: {trimmed}")));
    }
    if frac.len() > PRICE_DECIMALS {
        return Err(Error::InvalidPrice(format!(
            "more than {PRICE_DECIMALS} fractional digits: {trimmed}"
        )));
    }

    let whole_units = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|e| Error::InvalidPrice(e.to_string()))?
    };
    let frac_units = if frac.is_empty() {
        U256::zero()
    } else {
        let mut padded = frac.to_string();
        padded.push_str(&"0".repeat(PRICE_DECIMALS - frac.len()));
        U256::from_dec_str(&padded).map_err(|e| Error::InvalidPrice(e.to_string()))?
    };

    let base_units = whole_units
        .checked_mul(scale())
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(|| Error::InvalidPrice(format!("overflow: {trimmed}")))?;

    if base_units.is_zero() {
        return Err(Error::InvalidPrice("price must be positive".into()));
    }
    Ok(base_units)
}

/// Render base units back as a decimal string, trimming trailing zeros.
///
/// Round-trips with [`parse_price`]: `format_price(parse_price(s)?)` yields
/// the canonical form of `s`.
pub fn format_price(base_units: U256) -> String {
    let whole = base_units / scale();
    let frac = base_units % scale();
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = PRICE_DECIMALS);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
