// Copyright (C) 2020-2022  Intergalactic, Limited (GIB).
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use flatswap_math::MathError;
use flatswap_traits::SettlementError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// Creating a pool with same assets or less than 2 assets is not allowed.
	#[error("pool assets must be unique and at least 2")]
	IncorrectAssets,

	/// Maximum number of assets has been exceeded.
	#[error("maximum number of assets exceeded")]
	MaxAssetsExceeded,

	/// A pool with given id does not exist.
	#[error("pool not found")]
	PoolNotFound,

	/// A pool with given id is already registered.
	#[error("pool already exists")]
	PoolExists,

	/// Asset is not in the pool.
	#[error("asset is not in the pool")]
	AssetNotInPool,

	/// Trading an asset for itself is not allowed.
	#[error("cannot trade an asset for itself")]
	SameAsset,

	/// Invalid asset amount provided. Amount must be greater than zero.
	#[error("invalid asset amount")]
	InvalidAssetAmount,

	/// Initial liquidity of every asset must be > 0.
	#[error("initial liquidity of every asset must be non-zero")]
	InvalidInitialLiquidity,

	/// Amplification is outside configured range or does not fit the pool.
	#[error("invalid amplification")]
	InvalidAmplification,

	/// Asset decimals exceed 18.
	#[error("invalid asset decimals")]
	InvalidDecimals,

	/// Asset rate is zero or rates do not match the pool assets.
	#[error("invalid asset rate")]
	InvalidRate,

	/// Liquidity has not reached the required minimum, or a trade would drain a reserve.
	#[error("insufficient liquidity")]
	InsufficientLiquidity,

	/// Insufficient liquidity left in the pool after withdrawal.
	#[error("insufficient liquidity left in the pool")]
	InsufficientLiquidityRemaining,

	/// Amount is less than the minimum trading amount configured.
	#[error("amount is below minimum trading limit")]
	InsufficientTradingAmount,

	/// Slippage protection.
	#[error("slippage limit exceeded")]
	SlippageLimit,

	/// Pool already holds liquidity.
	#[error("pool is already initialized")]
	AlreadyInitialized,

	/// Pool has no liquidity yet.
	#[error("pool is not initialized")]
	NotInitialized,

	/// Newton's method failed to converge.
	#[error("invariant calculation did not converge")]
	NotConverged,

	/// Arithmetic overflow.
	#[error("arithmetic overflow")]
	Overflow,

	/// Pool reserves differ from the balances held by the ledger.
	#[error("pool reserves do not match ledger balances")]
	ReserveMismatch,

	/// Settlement was calculated against a state which is no longer current.
	#[error("settlement is stale")]
	StaleSettlement,

	/// Ledger refused to settle the operation.
	#[error("settlement failed: {0}")]
	Settlement(#[from] SettlementError),
}

impl From<MathError> for Error {
	fn from(value: MathError) -> Self {
		match value {
			MathError::InsufficientOutReserve => Error::InsufficientLiquidity,
			MathError::NotConverged => Error::NotConverged,
			MathError::InvalidDecimals => Error::InvalidDecimals,
			MathError::InvalidAmplification => Error::InvalidAmplification,
			MathError::InvalidRate => Error::InvalidRate,
			MathError::InvalidAssetIndex => Error::AssetNotInPool,
			MathError::ZeroReserve | MathError::MismatchedLength | MathError::InvariantDecreased => {
				Error::InvalidAssetAmount
			}
			MathError::Overflow | MathError::DivisionByZero => Error::Overflow,
		}
	}
}
