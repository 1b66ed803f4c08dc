//! # Flatswap Math
//!
//! Pure calculations behind stable pools whose amplification is configured per asset.
//!
//! - [`scaling`] converts native token amounts into the 18 decimal fixed point domain and back.
//! - [`stableswap`] solves the invariant and derives trade and liquidity amounts from it.
//!
//! Every function is side-effect free and deterministic. Intermediate products are computed
//! with 256 bit integers; results are returned as [`types::Balance`].
#![allow(clippy::bool_to_int_with_if)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(not(feature = "std"), test))]
extern crate std;

pub mod scaling;
pub mod stableswap;
pub mod types;

#[macro_export]
macro_rules! ensure {
	($e:expr, $f:expr) => {
		match $e {
			true => (),
			false => {
				return Err($f);
			}
		}
	};
}

#[macro_export]
macro_rules! to_u256 {
    ($($x:expr),+) => (
        {($(U256::from($x)),+)}
    );
}

#[macro_export]
macro_rules! to_balance {
	($x:expr) => {
		Balance::try_from($x).map_err(|_| $crate::MathError::Overflow)
	};
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MathError {
	/// Result or an intermediate value does not fit the integer width.
	Overflow,
	/// Requested amount would drain (or exceed) the reserve.
	InsufficientOutReserve,
	/// A reserve taking part in the calculation is zero.
	ZeroReserve,
	DivisionByZero,
	/// Newton's method did not settle within the iteration cap.
	NotConverged,
	/// Token decimals exceed the fixed point precision.
	InvalidDecimals,
	InvalidAssetIndex,
	/// Asset rate is zero.
	InvalidRate,
	/// Amplification is zero or does not match the reserves.
	InvalidAmplification,
	/// Input slices of different lengths.
	MismatchedLength,
	/// Updated reserves produce a lower invariant where a higher one was expected.
	InvariantDecreased,
}
