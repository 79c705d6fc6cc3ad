//! Exact decimal payment amounts.
//!
//! Amounts travel through URLs in user-facing units (SOL, USDC, ...) and are
//! converted to integer base units only when a transfer is built. All
//! arithmetic goes through [`rust_decimal::Decimal`]; binary floats never
//! touch an amount.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::WasmSolanaPayError;
use crate::validation;

/// Decimal places of native SOL (1 SOL = 10^9 lamports).
pub const NATIVE_DECIMALS: u8 = 9;

/// A non-negative decimal amount with at most
/// [`MAX_AMOUNT_DECIMALS`](crate::validation::MAX_AMOUNT_DECIMALS) significant
/// fractional digits.
///
/// The value is kept normalised, so `"1.50"` and `"1.5"` compare equal and
/// both render as `1.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Wrap a decimal after checking sign and precision.
    pub fn new(value: Decimal) -> Result<Self, WasmSolanaPayError> {
        validation::check_amount_value(&value)?;
        // normalize() turns -0 into 0 as well
        Ok(Amount(value.normalize()))
    }

    /// Amount from integer base units, e.g. lamports with `decimals = 9`.
    pub fn from_base_units(units: u64, decimals: u8) -> Result<Self, WasmSolanaPayError> {
        let mut value = Decimal::from(units);
        value.set_scale(decimals as u32).map_err(|e| {
            WasmSolanaPayError::PrecisionOverflow(format!(
                "cannot scale {} by {} decimals: {}",
                units, decimals, e
            ))
        })?;
        Amount::new(value)
    }

    /// The underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Number of significant fractional digits.
    pub fn decimal_places(&self) -> u32 {
        self.0.scale()
    }

    /// Convert to integer base units of an asset with `decimals` places.
    ///
    /// Fails with `PrecisionOverflow` when the amount has more fractional
    /// digits than the asset supports or the result does not fit in a `u64`.
    pub fn to_base_units(&self, decimals: u8) -> Result<u64, WasmSolanaPayError> {
        if self.0.is_zero() {
            return Ok(0);
        }

        let scale = self.0.scale();
        let decimals = decimals as u32;
        if scale > decimals {
            return Err(WasmSolanaPayError::PrecisionOverflow(format!(
                "{} has {} fractional digits, asset supports {}",
                self, scale, decimals
            )));
        }

        let factor = 10u128.checked_pow(decimals - scale).ok_or_else(|| {
            WasmSolanaPayError::PrecisionOverflow(format!("10^{} overflows", decimals - scale))
        })?;
        let units = self
            .0
            .mantissa()
            .unsigned_abs()
            .checked_mul(factor)
            .ok_or_else(|| {
                WasmSolanaPayError::PrecisionOverflow(format!(
                    "{} overflows at {} decimals",
                    self, decimals
                ))
            })?;

        u64::try_from(units).map_err(|_| {
            WasmSolanaPayError::PrecisionOverflow(format!(
                "{} base units exceed u64::MAX",
                units
            ))
        })
    }
}

impl FromStr for Amount {
    type Err = WasmSolanaPayError;

    /// Parse the URL form of an amount (`^\d+(\.\d+)?$`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validation::check_amount_syntax(s)?;
        // Trailing fractional zeros carry no value but count against the
        // 28-digit scale limit of `Decimal`.
        let trimmed = match s.split_once('.') {
            Some((int, frac)) if frac.trim_end_matches('0').is_empty() => int.to_string(),
            Some((int, frac)) => format!("{}.{}", int, frac.trim_end_matches('0')),
            None => s.to_string(),
        };
        let value = Decimal::from_str_exact(&trimmed)
            .map_err(|e| WasmSolanaPayError::InvalidAmount(format!("'{}': {}", s, e)))?;
        Amount::new(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = WasmSolanaPayError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

/// Shortest exact decimal form: no exponent, no trailing zeros.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
