use ethers::{
	types::{Address, U256},
	utils::{format_units, parse_units, to_checksum, ParseUnits},
};

use crate::constants::tx::DISPLAY_FRACTION_DIGITS;

pub fn sub_display_format(log_target: &str) -> String {
	format!("{:<019}", log_target)
}

/// Parses a `0x` prefixed, 20-byte account address.
///
/// Mixed-case input must carry a valid EIP-55 checksum. All-lowercase and all-uppercase inputs
/// are accepted without a checksum.
pub fn parse_address(input: &str) -> Option<Address> {
	let input = input.trim();
	let hex = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X"))?;
	if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
		return None;
	}
	let address = hex.parse::<Address>().ok()?;

	let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
	let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
	if has_lower && has_upper && to_checksum(&address, None)[2..] != *hex {
		return None;
	}
	Some(address)
}

/// Parses a user entered decimal amount into the token's smallest unit.
///
/// The amount must be strictly positive and must not carry more fractional digits than
/// `decimals`. The returned error describes why the input was rejected.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, String> {
	let input = input.trim();
	if input.is_empty() {
		return Err("amount is empty".into());
	}
	// trailing zeros never change the value
	let normalized = match input.split_once('.') {
		Some((int, fraction)) => {
			let fraction = fraction.trim_end_matches('0');
			if fraction.len() > decimals as usize {
				return Err(format!("amount has more than {} decimal places", decimals));
			}
			if fraction.is_empty() {
				int.to_string()
			} else {
				format!("{}.{}", int, fraction)
			}
		},
		None => input.to_string(),
	};

	match parse_units(&normalized, decimals as u32) {
		Ok(ParseUnits::U256(value)) if !value.is_zero() => Ok(value),
		Ok(ParseUnits::U256(_)) => Err("amount must be greater than zero".into()),
		Ok(ParseUnits::I256(_)) => Err("amount must be greater than zero".into()),
		Err(_) => Err(format!("`{}` is not a decimal number", input)),
	}
}

/// Formats a raw token amount with the given decimals, keeping a few fractional digits.
pub fn format_amount(value: U256, decimals: u8) -> String {
	match format_units(value, decimals as u32) {
		Ok(formatted) => match formatted.split_once('.') {
			Some((int, fraction)) => {
				let digits = fraction.len().min(DISPLAY_FRACTION_DIGITS);
				if digits == 0 {
					int.to_string()
				} else {
					format!("{}.{}", int, &fraction[..digits])
				}
			},
			None => formatted,
		},
		Err(_) => value.to_string(),
	}
}

/// Shortens an address for human output. ex) `0x5FbD...0aa3`
pub fn short_address(address: &Address) -> String {
	let checksum = to_checksum(address, None);
	format!("{}...{}", &checksum[..6], &checksum[checksum.len() - 4..])
}
