//! Exact conversion between human readable amounts and raw chain units
//!
//! All arithmetic is done on `u128`; there is no floating point anywhere in
//! the conversion path.

use crate::error::{CrowdloanError, Result};
use std::fmt;

/// Maximum number of fractional digits rendered for display. Extra digits
/// are truncated (rounded toward zero).
pub const MAX_DISPLAY_DECIMALS: u32 = 12;

/// A raw on-chain integer amount paired with the number of decimals used to
/// display it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenAmount {
	raw: u128,
	decimals: u32,
}

impl TokenAmount {
	pub fn new(raw: u128, decimals: u32) -> Self {
		Self { raw, decimals }
	}

	pub fn zero(decimals: u32) -> Self {
		Self::new(0, decimals)
	}

	pub fn raw(&self) -> u128 {
		self.raw
	}

	pub fn decimals(&self) -> u32 {
		self.decimals
	}

	pub fn is_zero(&self) -> bool {
		self.raw == 0
	}
}

impl fmt::Display for TokenAmount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&bn_to_fixed(self.raw, self.decimals))
	}
}

/// Render `amount / 10^decimals` as a plain decimal string
///
/// Trailing fractional zeros are dropped and at most
/// [`MAX_DISPLAY_DECIMALS`] fractional digits are kept.
pub fn bn_to_fixed(amount: u128, decimals: u32) -> String {
	if decimals == 0 {
		return amount.to_string();
	}

	let digits = amount.to_string();
	let decimals = decimals as usize;

	let (whole, fraction) = if digits.len() > decimals {
		let split = digits.len() - decimals;
		(digits[..split].to_string(), digits[split..].to_string())
	} else {
		("0".to_string(), format!("{:0>width$}", digits, width = decimals))
	};

	let shown = fraction.len().min(MAX_DISPLAY_DECIMALS as usize);
	let fraction = fraction[..shown].trim_end_matches('0');

	if fraction.is_empty() {
		whole
	} else {
		format!("{}.{}", whole, fraction)
	}
}

/// Parse a human readable amount ("10", "10.5", "0.0001") into raw chain
/// units, truncating digits beyond `decimals` toward zero
pub fn parse_amount(amount_str: &str, decimals: u32) -> Result<u128> {
	let invalid = |reason: &str| CrowdloanError::InvalidAmount {
		amount: amount_str.to_string(),
		reason: reason.to_string(),
	};

	let trimmed = amount_str.trim();
	if trimmed.is_empty() {
		return Err(invalid("amount cannot be empty"));
	}
	if trimmed.starts_with('-') {
		return Err(invalid("amount cannot be negative"));
	}
	let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);

	let (whole, fraction) = match trimmed.split_once('.') {
		Some((whole, fraction)) => (whole, fraction),
		None => (trimmed, ""),
	};

	if whole.is_empty() && fraction.is_empty() {
		return Err(invalid("amount has no digits"));
	}
	if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
	{
		return Err(invalid("use formats like '10', '10.5', '0.0001'"));
	}

	let scale = 10u128
		.checked_pow(decimals)
		.ok_or_else(|| invalid("too many decimals for this chain"))?;

	let whole_units = if whole.is_empty() {
		0
	} else {
		whole.parse::<u128>().map_err(|_| invalid("amount is too large"))?
	};

	// Digits past the chain precision are dropped
	let kept = &fraction[..fraction.len().min(decimals as usize)];
	let fraction_units = if kept.is_empty() {
		0
	} else {
		let padding = decimals - kept.len() as u32;
		kept.parse::<u128>().map_err(|_| invalid("amount is too large"))? * 10u128.pow(padding)
	};

	whole_units
		.checked_mul(scale)
		.and_then(|units| units.checked_add(fraction_units))
		.ok_or_else(|| invalid("amount is too large"))
}
