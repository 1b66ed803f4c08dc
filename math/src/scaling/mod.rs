//! Conversion between native token amounts and the 18 decimal fixed point domain.
//!
//! Scaling up multiplies by `10^(18 - decimals)` and is exact. Scaling down divides by the same
//! factor and truncates, so a value leaving the pool is never rounded up. Amounts entering the
//! pool use [`scale_down_round_up`] instead.
//!
//! An asset may also carry a rate, the value of one scaled unit expressed in the pool's common
//! unit. Rates have 18 decimals and default to [`ONE`]. [`apply_rate`] moves a scaled amount into
//! the rated domain the invariant works in, [`remove_rate`] moves it back.


use crate::types::{Balance, Price, Rounding, ONE};
use crate::MathError::{InvalidDecimals, InvalidRate, MismatchedLength, Overflow};
use crate::{ensure, to_balance, to_u256, MathError};
use primitive_types::U256;
use sp_std::prelude::*;

/// Decimal precision of every scaled balance.
pub const FIXED_DECIMALS: u8 = 18;

/// Factor converting an amount with `decimals` precision to the fixed point domain.
pub fn scaling_factor(decimals: u8) -> Result<Balance, MathError> {
	ensure!(decimals <= FIXED_DECIMALS, InvalidDecimals);
	10u128
		.checked_pow((FIXED_DECIMALS - decimals) as u32)
		.ok_or(Overflow)
}

pub fn scale_up(amount: Balance, decimals: u8) -> Result<Balance, MathError> {
	amount.checked_mul(scaling_factor(decimals)?).ok_or(Overflow)
}

/// Truncating conversion back to native precision.
pub fn scale_down(amount: Balance, decimals: u8) -> Result<Balance, MathError> {
	Ok(amount / scaling_factor(decimals)?)
}

pub fn scale_down_round_up(amount: Balance, decimals: u8) -> Result<Balance, MathError> {
	let factor = scaling_factor(decimals)?;
	let result = amount / factor;
	if amount % factor == 0 {
		Ok(result)
	} else {
		result.checked_add(1).ok_or(Overflow)
	}
}

pub fn scale_up_all(amounts: &[Balance], decimals: &[u8]) -> Result<Vec<Balance>, MathError> {
	ensure!(amounts.len() == decimals.len(), MismatchedLength);
	amounts
		.iter()
		.zip(decimals.iter())
		.map(|(amount, decimals)| scale_up(*amount, *decimals))
		.collect()
}

pub fn scale_down_all(amounts: &[Balance], decimals: &[u8]) -> Result<Vec<Balance>, MathError> {
	ensure!(amounts.len() == decimals.len(), MismatchedLength);
	amounts
		.iter()
		.zip(decimals.iter())
		.map(|(amount, decimals)| scale_down(*amount, *decimals))
		.collect()
}

/// Rated value of a scaled amount.
pub fn apply_rate(amount: Balance, rate: Balance, rounding: Rounding) -> Result<Balance, MathError> {
	ensure!(rate > 0, InvalidRate);
	if rate == ONE {
		return Ok(amount);
	}
	let (amount_hp, rate_hp, one_hp) = to_u256!(amount, rate, ONE);
	to_balance!(div_rounded(amount_hp * rate_hp, one_hp, rounding))
}

/// Scaled amount holding a rated value.
pub fn remove_rate(amount: Balance, rate: Balance, rounding: Rounding) -> Result<Balance, MathError> {
	ensure!(rate > 0, InvalidRate);
	if rate == ONE {
		return Ok(amount);
	}
	let (amount_hp, rate_hp, one_hp) = to_u256!(amount, rate, ONE);
	to_balance!(div_rounded(amount_hp * one_hp, rate_hp, rounding))
}

fn div_rounded(numerator: U256, denominator: U256, rounding: Rounding) -> U256 {
	match rounding {
		Rounding::Down => numerator / denominator,
		Rounding::Up => (numerator + denominator - U256::one()) / denominator,
	}
}

/// Rated reserves, each rounded down.
pub fn apply_rates(amounts: &[Balance], rates: &[Balance]) -> Result<Vec<Balance>, MathError> {
	ensure!(amounts.len() == rates.len(), MismatchedLength);
	amounts
		.iter()
		.zip(rates.iter())
		.map(|(amount, rate)| apply_rate(*amount, *rate, Rounding::Down))
		.collect()
}

/// Converts a price between rated amounts into a price between scaled amounts.
pub fn unrate_price(price: Price, rate_in: Balance, rate_out: Balance) -> Result<Price, MathError> {
	ensure!(rate_in > 0 && rate_out > 0, InvalidRate);
	let (inner, rate_in_hp, rate_out_hp) = to_u256!(price.into_inner(), rate_in, rate_out);
	Ok(Price::from_inner(to_balance!(inner * rate_out_hp / rate_in_hp)?))
}
