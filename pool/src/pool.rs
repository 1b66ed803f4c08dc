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

use crate::types::{
	ExitKind, ExitResult, JoinKind, JoinResult, PoolInfo, PoolSnapshot, PoolState, PoolStatus, SwapKind, SwapResult,
};
use crate::{Balance, Config, Error, PoolDelta, PoolId, D_ITERATIONS, LOG_TARGET, MAX_ASSETS_IN_POOL, Y_ITERATIONS};
use flatswap_math::ensure;
use flatswap_math::scaling::{
	apply_rate, apply_rates, remove_rate, scale_down, scale_down_all, scale_down_round_up, scale_up, scale_up_all,
	unrate_price, FIXED_DECIMALS,
};
use flatswap_math::stableswap::{
	calculate_add_one_asset, calculate_d, calculate_in_given_out, calculate_out_given_in, calculate_proportional_amounts,
	calculate_shares, calculate_shares_for_amounts_out, calculate_spot_price, calculate_withdraw_one_asset,
};
use flatswap_math::types::{Price, Rounding};
use flatswap_traits::{AssetDelta, Direction, ShareDelta};
use std::marker::PhantomData;

/// Outcome of a calculated operation which has not been committed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement<AssetId, R> {
	/// Result reported to the caller.
	pub result: R,
	/// Token and share movements to be settled by the ledger.
	pub delta: PoolDelta<AssetId>,
	initial: PoolState,
	state: PoolState,
}

impl<AssetId, R> Settlement<AssetId, R> {
	/// Pool state after the operation is committed.
	pub fn state(&self) -> &PoolState {
		&self.state
	}
}

/// Checks pool definition against configured limits.
pub fn validate_pool_info<T: Config>(info: &PoolInfo<T::AssetId>) -> Result<(), Error> {
	ensure!(info.is_valid(), Error::IncorrectAssets);
	ensure!(info.assets.len() <= MAX_ASSETS_IN_POOL, Error::MaxAssetsExceeded);
	ensure!(
		info.amplification.len() == info.assets.len()
			&& info.amplification.iter().all(|amp| T::AMPLIFICATION_RANGE.contains(amp)),
		Error::InvalidAmplification
	);
	ensure!(
		info.decimals.len() == info.assets.len() && info.decimals.iter().all(|d| *d <= FIXED_DECIMALS),
		Error::InvalidDecimals
	);
	ensure!(
		info.rates.is_empty() || (info.rates.len() == info.assets.len() && info.rates.iter().all(|r| *r > 0)),
		Error::InvalidRate
	);
	Ok(())
}

pub struct Pool<T: Config> {
	id: PoolId,
	info: PoolInfo<T::AssetId>,
	rates: Vec<Balance>,
	state: PoolState,
	_marker: PhantomData<T>,
}

impl<T: Config> Pool<T> {
	pub fn new(id: PoolId, info: PoolInfo<T::AssetId>) -> Result<Self, Error> {
		validate_pool_info::<T>(&info)?;
		let state = PoolState::empty(info.assets.len());
		let rates = info.resolved_rates();
		Ok(Self {
			id,
			info,
			rates,
			state,
			_marker: PhantomData,
		})
	}

	pub fn id(&self) -> PoolId {
		self.id
	}

	pub fn info(&self) -> &PoolInfo<T::AssetId> {
		&self.info
	}

	pub fn state(&self) -> &PoolState {
		&self.state
	}

	pub fn status(&self) -> PoolStatus {
		self.state.status()
	}

	/// Reserves in native decimals. These are the balances the ledger is expected to hold.
	pub fn raw_reserves(&self) -> Result<Vec<Balance>, Error> {
		Ok(scale_down_all(&self.state.reserves, &self.info.decimals)?)
	}

	pub fn snapshot(&self) -> Result<PoolSnapshot<T::AssetId>, Error> {
		Ok(PoolSnapshot {
			pool_id: self.id,
			status: self.status(),
			assets: self.info.assets.clone(),
			decimals: self.info.decimals.clone(),
			amplification: self.info.amplification.clone(),
			rates: self.rates.clone(),
			reserves: self.raw_reserves()?,
			scaled_reserves: self.state.reserves.clone(),
			shares: self.state.shares,
			invariant: self.state.last_invariant,
		})
	}

	/// Marginal price of `asset_out` in units of `asset_in`, both in 18 decimals.
	pub fn spot_price(&self, asset_in: T::AssetId, asset_out: T::AssetId) -> Result<Price, Error> {
		self.ensure_active()?;
		ensure!(asset_in != asset_out, Error::SameAsset);
		let idx_in = self.asset_index(asset_in)?;
		let idx_out = self.asset_index(asset_out)?;

		let price = calculate_spot_price::<D_ITERATIONS>(
			&self.rated_reserves()?,
			&self.info.amplification,
			idx_in,
			idx_out,
		)?;
		Ok(unrate_price(price, self.rates[idx_in], self.rates[idx_out])?)
	}

	/// Scaled reserves valued at asset rates. The invariant is solved over these.
	pub fn rated_reserves(&self) -> Result<Vec<Balance>, Error> {
		Ok(apply_rates(&self.state.reserves, &self.rates)?)
	}

	/// Commits a settlement calculated by this pool against its current state.
	pub fn apply<R>(&mut self, settlement: Settlement<T::AssetId, R>) -> Result<R, Error> {
		ensure!(
			settlement.delta.pool_id == self.id && settlement.initial == self.state,
			Error::StaleSettlement
		);

		log::debug!(target: LOG_TARGET,
			"pool {}: settled {:?}, shares {} -> {}, invariant {} -> {}",
			self.id,
			settlement.delta.assets,
			self.state.shares,
			settlement.state.shares,
			self.state.last_invariant,
			settlement.state.last_invariant,
		);

		self.state = settlement.state;
		Ok(settlement.result)
	}

	pub fn swap(&mut self, asset_in: T::AssetId, asset_out: T::AssetId, kind: SwapKind) -> Result<SwapResult, Error> {
		let settlement = self.calculate_swap(asset_in, asset_out, kind)?;
		self.apply(settlement)
	}

	pub fn swap_given_in(
		&mut self,
		asset_in: T::AssetId,
		asset_out: T::AssetId,
		amount_in: Balance,
		min_amount_out: Balance,
	) -> Result<SwapResult, Error> {
		self.swap(
			asset_in,
			asset_out,
			SwapKind::GivenIn {
				amount_in,
				min_amount_out,
			},
		)
	}

	pub fn swap_given_out(
		&mut self,
		asset_in: T::AssetId,
		asset_out: T::AssetId,
		amount_out: Balance,
		max_amount_in: Balance,
	) -> Result<SwapResult, Error> {
		self.swap(
			asset_in,
			asset_out,
			SwapKind::GivenOut {
				amount_out,
				max_amount_in,
			},
		)
	}

	pub fn join(&mut self, kind: &JoinKind<T::AssetId>) -> Result<JoinResult, Error> {
		let settlement = self.calculate_join(kind)?;
		self.apply(settlement)
	}

	pub fn init(&mut self, amounts_in: Vec<Balance>) -> Result<JoinResult, Error> {
		self.join(&JoinKind::Init { amounts_in })
	}

	pub fn join_exact_tokens_in(&mut self, amounts_in: Vec<Balance>, min_shares_out: Balance) -> Result<JoinResult, Error> {
		self.join(&JoinKind::ExactTokensIn {
			amounts_in,
			min_shares_out,
		})
	}

	pub fn join_exact_shares_out(
		&mut self,
		shares_out: Balance,
		max_amounts_in: Vec<Balance>,
	) -> Result<JoinResult, Error> {
		self.join(&JoinKind::ExactSharesOut {
			shares_out,
			max_amounts_in,
		})
	}

	pub fn join_exact_shares_out_for_one_asset(
		&mut self,
		shares_out: Balance,
		asset: T::AssetId,
		max_amount_in: Balance,
	) -> Result<JoinResult, Error> {
		self.join(&JoinKind::ExactSharesOutForOneAsset {
			shares_out,
			asset,
			max_amount_in,
		})
	}

	pub fn exit(&mut self, kind: &ExitKind<T::AssetId>) -> Result<ExitResult, Error> {
		let settlement = self.calculate_exit(kind)?;
		self.apply(settlement)
	}

	pub fn exit_exact_tokens_out(&mut self, amounts_out: Vec<Balance>, max_shares_in: Balance) -> Result<ExitResult, Error> {
		self.exit(&ExitKind::ExactTokensOut {
			amounts_out,
			max_shares_in,
		})
	}

	pub fn exit_exact_shares_in(
		&mut self,
		shares_in: Balance,
		min_amounts_out: Vec<Balance>,
	) -> Result<ExitResult, Error> {
		self.exit(&ExitKind::ExactSharesIn {
			shares_in,
			min_amounts_out,
		})
	}

	pub fn exit_exact_shares_in_for_one_asset(
		&mut self,
		shares_in: Balance,
		asset: T::AssetId,
		min_amount_out: Balance,
	) -> Result<ExitResult, Error> {
		self.exit(&ExitKind::ExactSharesInForOneAsset {
			shares_in,
			asset,
			min_amount_out,
		})
	}

	pub fn query_swap(&self, asset_in: T::AssetId, asset_out: T::AssetId, kind: SwapKind) -> Result<SwapResult, Error> {
		self.calculate_swap(asset_in, asset_out, kind).map(|s| s.result)
	}

	pub fn query_join(&self, kind: &JoinKind<T::AssetId>) -> Result<JoinResult, Error> {
		self.calculate_join(kind).map(|s| s.result)
	}

	pub fn query_exit(&self, kind: &ExitKind<T::AssetId>) -> Result<ExitResult, Error> {
		self.calculate_exit(kind).map(|s| s.result)
	}

	pub fn calculate_swap(
		&self,
		asset_in: T::AssetId,
		asset_out: T::AssetId,
		kind: SwapKind,
	) -> Result<Settlement<T::AssetId, SwapResult>, Error> {
		self.ensure_active()?;
		ensure!(asset_in != asset_out, Error::SameAsset);

		let idx_in = self.asset_index(asset_in)?;
		let idx_out = self.asset_index(asset_out)?;
		let decimals_in = self.info.decimals[idx_in];
		let decimals_out = self.info.decimals[idx_out];
		let (rate_in, rate_out) = (self.rates[idx_in], self.rates[idx_out]);
		let reserves = &self.state.reserves;
		let rated = self.rated_reserves()?;

		let (amount_in, amount_out, scaled_in, scaled_out) = match kind {
			SwapKind::GivenIn {
				amount_in,
				min_amount_out,
			} => {
				ensure!(amount_in > 0, Error::InvalidAssetAmount);
				let scaled_in = scale_up(amount_in, decimals_in)?;
				ensure!(scaled_in >= T::MIN_TRADING_LIMIT, Error::InsufficientTradingAmount);

				let rated_out = calculate_out_given_in::<D_ITERATIONS, Y_ITERATIONS>(
					&rated,
					&self.info.amplification,
					idx_in,
					idx_out,
					apply_rate(scaled_in, rate_in, Rounding::Down)?,
				)?;
				let amount_out = scale_down(remove_rate(rated_out, rate_out, Rounding::Down)?, decimals_out)?;

				ensure!(amount_out > 0, Error::InsufficientTradingAmount);
				ensure!(amount_out >= min_amount_out, Error::SlippageLimit);

				(amount_in, amount_out, scaled_in, scale_up(amount_out, decimals_out)?)
			}
			SwapKind::GivenOut {
				amount_out,
				max_amount_in,
			} => {
				ensure!(amount_out > 0, Error::InvalidAssetAmount);
				let scaled_out = scale_up(amount_out, decimals_out)?;
				ensure!(scaled_out >= T::MIN_TRADING_LIMIT, Error::InsufficientTradingAmount);
				ensure!(scaled_out < reserves[idx_out], Error::InsufficientLiquidity);

				let rated_in = calculate_in_given_out::<D_ITERATIONS, Y_ITERATIONS>(
					&rated,
					&self.info.amplification,
					idx_in,
					idx_out,
					apply_rate(scaled_out, rate_out, Rounding::Up)?,
				)?;
				let amount_in = scale_down_round_up(remove_rate(rated_in, rate_in, Rounding::Up)?, decimals_in)?;

				ensure!(amount_in > 0, Error::InsufficientTradingAmount);
				ensure!(amount_in <= max_amount_in, Error::SlippageLimit);

				(amount_in, amount_out, scale_up(amount_in, decimals_in)?, scaled_out)
			}
		};

		let mut updated = reserves.clone();
		updated[idx_in] = updated[idx_in].checked_add(scaled_in).ok_or(Error::Overflow)?;
		updated[idx_out] = updated[idx_out]
			.checked_sub(scaled_out)
			.ok_or(Error::InsufficientLiquidity)?;
		ensure!(updated[idx_out] > 0, Error::InsufficientLiquidity);

		log::trace!(target: LOG_TARGET,
			"pool {}: swap {:?} -> {:?}, amount in {}, amount out {}",
			self.id, asset_in, asset_out, amount_in, amount_out
		);

		self.settlement(
			SwapResult { amount_in, amount_out },
			vec![
				AssetDelta::incoming(asset_in, amount_in),
				AssetDelta::outgoing(asset_out, amount_out),
			],
			ShareDelta::None,
			updated,
			self.state.shares,
		)
	}

	pub fn calculate_join(&self, kind: &JoinKind<T::AssetId>) -> Result<Settlement<T::AssetId, JoinResult>, Error> {
		let reserves = &self.state.reserves;
		let issuance = self.state.shares;
		let amplification = &self.info.amplification;
		let decimals = &self.info.decimals;

		let (amounts_in, shares_out) = match kind {
			JoinKind::Init { amounts_in } => {
				ensure!(self.status() == PoolStatus::Uninitialized, Error::AlreadyInitialized);
				ensure!(amounts_in.len() == self.info.assets.len(), Error::IncorrectAssets);
				ensure!(amounts_in.iter().all(|a| *a > 0), Error::InvalidInitialLiquidity);

				let scaled = scale_up_all(amounts_in, decimals)?;
				let shares = calculate_d::<D_ITERATIONS>(&apply_rates(&scaled, &self.rates)?, amplification)?;
				ensure!(shares >= T::MIN_POOL_LIQUIDITY, Error::InsufficientLiquidity);

				(amounts_in.clone(), shares)
			}
			JoinKind::ExactTokensIn {
				amounts_in,
				min_shares_out,
			} => {
				self.ensure_active()?;
				ensure!(amounts_in.len() == self.info.assets.len(), Error::IncorrectAssets);
				ensure!(amounts_in.iter().any(|a| *a > 0), Error::InvalidAssetAmount);

				let updated = add_amounts(reserves, &scale_up_all(amounts_in, decimals)?)?;
				let shares = calculate_shares::<D_ITERATIONS>(
					&self.rated_reserves()?,
					&apply_rates(&updated, &self.rates)?,
					amplification,
					issuance,
				)?;

				ensure!(shares > 0, Error::InvalidAssetAmount);
				ensure!(shares >= *min_shares_out, Error::SlippageLimit);

				(amounts_in.clone(), shares)
			}
			JoinKind::ExactSharesOut {
				shares_out,
				max_amounts_in,
			} => {
				self.ensure_active()?;
				ensure!(max_amounts_in.len() == self.info.assets.len(), Error::IncorrectAssets);
				ensure!(*shares_out > 0, Error::InvalidAssetAmount);

				let scaled = calculate_proportional_amounts(reserves, *shares_out, issuance, Rounding::Up)?;
				let amounts_in = scaled
					.iter()
					.zip(decimals.iter())
					.map(|(amount, d)| scale_down_round_up(*amount, *d))
					.collect::<Result<Vec<Balance>, _>>()?;

				ensure!(
					amounts_in.iter().zip(max_amounts_in.iter()).all(|(a, max)| a <= max),
					Error::SlippageLimit
				);

				(amounts_in, *shares_out)
			}
			JoinKind::ExactSharesOutForOneAsset {
				shares_out,
				asset,
				max_amount_in,
			} => {
				self.ensure_active()?;
				let idx = self.asset_index(*asset)?;
				ensure!(*shares_out > 0, Error::InvalidAssetAmount);

				let rated_in = calculate_add_one_asset::<D_ITERATIONS, Y_ITERATIONS>(
					&self.rated_reserves()?,
					*shares_out,
					idx,
					issuance,
					amplification,
				)?;
				let scaled_in = remove_rate(rated_in, self.rates[idx], Rounding::Up)?;
				let amount_in = scale_down_round_up(scaled_in, decimals[idx])?;

				ensure!(amount_in > 0, Error::InvalidAssetAmount);
				ensure!(amount_in <= *max_amount_in, Error::SlippageLimit);

				let mut amounts_in = vec![0; self.info.assets.len()];
				amounts_in[idx] = amount_in;
				(amounts_in, *shares_out)
			}
		};

		let updated = add_amounts(reserves, &scale_up_all(&amounts_in, decimals)?)?;
		let supply = issuance.checked_add(shares_out).ok_or(Error::Overflow)?;

		log::trace!(target: LOG_TARGET,
			"pool {}: join {:?}, shares out {}",
			self.id, amounts_in, shares_out
		);

		let assets = self.asset_deltas(&amounts_in, Direction::In);
		self.settlement(
			JoinResult { amounts_in, shares_out },
			assets,
			ShareDelta::Mint(shares_out),
			updated,
			supply,
		)
	}

	pub fn calculate_exit(&self, kind: &ExitKind<T::AssetId>) -> Result<Settlement<T::AssetId, ExitResult>, Error> {
		self.ensure_active()?;

		let reserves = &self.state.reserves;
		let issuance = self.state.shares;
		let amplification = &self.info.amplification;
		let decimals = &self.info.decimals;

		let (amounts_out, shares_in) = match kind {
			ExitKind::ExactTokensOut {
				amounts_out,
				max_shares_in,
			} => {
				ensure!(amounts_out.len() == self.info.assets.len(), Error::IncorrectAssets);
				ensure!(amounts_out.iter().any(|a| *a > 0), Error::InvalidAssetAmount);

				let scaled = scale_up_all(amounts_out, decimals)?;
				ensure!(
					scaled.iter().zip(reserves.iter()).all(|(a, r)| a < r),
					Error::InsufficientLiquidity
				);

				let updated = sub_amounts(reserves, &scaled)?;
				let shares = calculate_shares_for_amounts_out::<D_ITERATIONS>(
					&self.rated_reserves()?,
					&apply_rates(&updated, &self.rates)?,
					amplification,
					issuance,
				)?;

				ensure!(shares <= *max_shares_in, Error::SlippageLimit);

				(amounts_out.clone(), shares)
			}
			ExitKind::ExactSharesIn {
				shares_in,
				min_amounts_out,
			} => {
				ensure!(min_amounts_out.len() == self.info.assets.len(), Error::IncorrectAssets);
				ensure!(*shares_in > 0, Error::InvalidAssetAmount);
				Self::ensure_remaining_liquidity(issuance, *shares_in)?;

				let scaled = calculate_proportional_amounts(reserves, *shares_in, issuance, Rounding::Down)?;
				let amounts_out = scale_down_all(&scaled, decimals)?;

				ensure!(amounts_out.iter().any(|a| *a > 0), Error::InvalidAssetAmount);
				ensure!(
					amounts_out.iter().zip(min_amounts_out.iter()).all(|(a, min)| a >= min),
					Error::SlippageLimit
				);

				(amounts_out, *shares_in)
			}
			ExitKind::ExactSharesInForOneAsset {
				shares_in,
				asset,
				min_amount_out,
			} => {
				let idx = self.asset_index(*asset)?;
				ensure!(*shares_in > 0, Error::InvalidAssetAmount);
				Self::ensure_remaining_liquidity(issuance, *shares_in)?;

				let rated_out = calculate_withdraw_one_asset::<D_ITERATIONS, Y_ITERATIONS>(
					&self.rated_reserves()?,
					*shares_in,
					idx,
					issuance,
					amplification,
				)?;
				let scaled_out = remove_rate(rated_out, self.rates[idx], Rounding::Down)?;
				let amount_out = scale_down(scaled_out, decimals[idx])?;

				ensure!(amount_out > 0, Error::InvalidAssetAmount);
				ensure!(amount_out >= *min_amount_out, Error::SlippageLimit);

				let mut amounts_out = vec![0; self.info.assets.len()];
				amounts_out[idx] = amount_out;
				(amounts_out, *shares_in)
			}
		};

		Self::ensure_remaining_liquidity(issuance, shares_in)?;

		let updated = sub_amounts(reserves, &scale_up_all(&amounts_out, decimals)?)?;
		ensure!(updated.iter().all(|r| *r > 0), Error::InsufficientLiquidity);

		log::trace!(target: LOG_TARGET,
			"pool {}: exit {:?}, shares in {}",
			self.id, amounts_out, shares_in
		);

		let assets = self.asset_deltas(&amounts_out, Direction::Out);
		self.settlement(
			ExitResult { amounts_out, shares_in },
			assets,
			ShareDelta::Burn(shares_in),
			updated,
			issuance - shares_in,
		)
	}

	fn settlement<R>(
		&self,
		result: R,
		assets: Vec<AssetDelta<T::AssetId>>,
		shares: ShareDelta,
		reserves: Vec<Balance>,
		supply: Balance,
	) -> Result<Settlement<T::AssetId, R>, Error> {
		let rated = apply_rates(&reserves, &self.rates)?;
		let last_invariant = calculate_d::<D_ITERATIONS>(&rated, &self.info.amplification)?;
		Ok(Settlement {
			result,
			delta: PoolDelta {
				pool_id: self.id,
				assets,
				shares,
			},
			initial: self.state.clone(),
			state: PoolState {
				reserves,
				shares: supply,
				last_invariant,
			},
		})
	}

	fn asset_deltas(&self, amounts: &[Balance], direction: Direction) -> Vec<AssetDelta<T::AssetId>> {
		self.info
			.assets
			.iter()
			.zip(amounts.iter())
			.filter(|(_, amount)| **amount > 0)
			.map(|(asset_id, amount)| AssetDelta {
				asset_id: *asset_id,
				amount: *amount,
				direction,
			})
			.collect()
	}

	fn asset_index(&self, asset: T::AssetId) -> Result<usize, Error> {
		self.info.find_asset(asset).ok_or(Error::AssetNotInPool)
	}

	fn ensure_active(&self) -> Result<(), Error> {
		ensure!(self.status() == PoolStatus::Active, Error::NotInitialized);
		Ok(())
	}

	fn ensure_remaining_liquidity(issuance: Balance, shares_in: Balance) -> Result<(), Error> {
		let remaining = issuance
			.checked_sub(shares_in)
			.ok_or(Error::InsufficientLiquidityRemaining)?;
		ensure!(remaining >= T::MIN_POOL_LIQUIDITY, Error::InsufficientLiquidityRemaining);
		Ok(())
	}
}

fn add_amounts(reserves: &[Balance], amounts: &[Balance]) -> Result<Vec<Balance>, Error> {
	reserves
		.iter()
		.zip(amounts.iter())
		.map(|(reserve, amount)| reserve.checked_add(*amount).ok_or(Error::Overflow))
		.collect()
}

fn sub_amounts(reserves: &[Balance], amounts: &[Balance]) -> Result<Vec<Balance>, Error> {
	reserves
		.iter()
		.zip(amounts.iter())
		.map(|(reserve, amount)| reserve.checked_sub(*amount).ok_or(Error::InsufficientLiquidity))
		.collect()
}
