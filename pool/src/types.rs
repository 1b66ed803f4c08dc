use crate::{Balance, PoolId};
use flatswap_math::types::ONE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Pool properties, fixed when the pool is created.
/// `assets`: pool assets
/// `amplification`: flatness coefficient of each asset
/// `decimals`: native decimals of each asset
/// `rates`: value of one scaled unit of each asset in the pool's common unit, 18 decimals.
/// Empty means `ONE` for every asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo<AssetId> {
	pub assets: Vec<AssetId>,
	pub amplification: Vec<u16>,
	pub decimals: Vec<u8>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub rates: Vec<Balance>,
}

pub(crate) fn has_unique_elements<T>(iter: &mut T) -> bool
where
	T: Iterator,
	T::Item: Ord,
{
	let mut uniq = BTreeSet::new();
	iter.all(move |x| uniq.insert(x))
}

impl<AssetId> PoolInfo<AssetId>
where
	AssetId: Ord + Copy,
{
	pub fn new(assets: Vec<AssetId>, amplification: Vec<u16>, decimals: Vec<u8>) -> Self {
		Self {
			assets,
			amplification,
			decimals,
			rates: Vec::new(),
		}
	}

	pub fn with_rates(self, rates: Vec<Balance>) -> Self {
		Self { rates, ..self }
	}

	/// Rate of every asset, defaulted where not configured.
	pub fn resolved_rates(&self) -> Vec<Balance> {
		if self.rates.is_empty() {
			vec![ONE; self.assets.len()]
		} else {
			self.rates.clone()
		}
	}

	pub fn find_asset(&self, asset: AssetId) -> Option<usize> {
		self.assets.iter().position(|v| *v == asset)
	}

	pub(crate) fn is_valid(&self) -> bool {
		self.assets.len() >= 2 && has_unique_elements(&mut self.assets.iter())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStatus {
	Uninitialized,
	Active,
}

/// Mutable part of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolState {
	/// Scaled reserve of each asset, in the order of `PoolInfo::assets`.
	pub reserves: Vec<Balance>,
	/// Total share supply.
	pub shares: Balance,
	/// Invariant recorded after the last committed operation.
	pub last_invariant: Balance,
}

impl PoolState {
	pub(crate) fn empty(assets: usize) -> Self {
		Self {
			reserves: vec![0; assets],
			shares: 0,
			last_invariant: 0,
		}
	}

	pub fn status(&self) -> PoolStatus {
		if self.shares == 0 {
			PoolStatus::Uninitialized
		} else {
			PoolStatus::Active
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
	/// Calculate the result only. Nothing is settled or committed.
	Query,
	#[default]
	Execute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapKind {
	/// Sell exact `amount_in`, receive at least `min_amount_out`.
	GivenIn { amount_in: Balance, min_amount_out: Balance },
	/// Buy exact `amount_out`, pay at most `max_amount_in`.
	GivenOut { amount_out: Balance, max_amount_in: Balance },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest<AssetId> {
	pub asset_in: AssetId,
	pub asset_out: AssetId,
	pub kind: SwapKind,
	pub mode: ExecutionMode,
}

impl<AssetId> SwapRequest<AssetId> {
	pub fn given_in(asset_in: AssetId, asset_out: AssetId, amount_in: Balance, min_amount_out: Balance) -> Self {
		Self {
			asset_in,
			asset_out,
			kind: SwapKind::GivenIn {
				amount_in,
				min_amount_out,
			},
			mode: ExecutionMode::Execute,
		}
	}

	pub fn given_out(asset_in: AssetId, asset_out: AssetId, amount_out: Balance, max_amount_in: Balance) -> Self {
		Self {
			asset_in,
			asset_out,
			kind: SwapKind::GivenOut {
				amount_out,
				max_amount_in,
			},
			mode: ExecutionMode::Execute,
		}
	}

	pub fn query(self) -> Self {
		Self {
			mode: ExecutionMode::Query,
			..self
		}
	}
}

/// Amounts are raw, in each asset's native decimals, ordered as the pool assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind<AssetId> {
	/// First liquidity of the pool. Every asset must be provided.
	Init { amounts_in: Vec<Balance> },
	ExactTokensIn {
		amounts_in: Vec<Balance>,
		min_shares_out: Balance,
	},
	/// Mint exact shares, paying every asset proportionally.
	ExactSharesOut {
		shares_out: Balance,
		max_amounts_in: Vec<Balance>,
	},
	/// Mint exact shares, paying one asset.
	ExactSharesOutForOneAsset {
		shares_out: Balance,
		asset: AssetId,
		max_amount_in: Balance,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitKind<AssetId> {
	ExactTokensOut {
		amounts_out: Vec<Balance>,
		max_shares_in: Balance,
	},
	/// Burn exact shares, receiving every asset proportionally.
	ExactSharesIn {
		shares_in: Balance,
		min_amounts_out: Vec<Balance>,
	},
	/// Burn exact shares, receiving one asset.
	ExactSharesInForOneAsset {
		shares_in: Balance,
		asset: AssetId,
		min_amount_out: Balance,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest<AssetId> {
	pub kind: JoinKind<AssetId>,
	pub mode: ExecutionMode,
}

impl<AssetId> JoinRequest<AssetId> {
	pub fn new(kind: JoinKind<AssetId>) -> Self {
		Self {
			kind,
			mode: ExecutionMode::Execute,
		}
	}

	pub fn query(self) -> Self {
		Self {
			mode: ExecutionMode::Query,
			..self
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRequest<AssetId> {
	pub kind: ExitKind<AssetId>,
	pub mode: ExecutionMode,
}

impl<AssetId> ExitRequest<AssetId> {
	pub fn new(kind: ExitKind<AssetId>) -> Self {
		Self {
			kind,
			mode: ExecutionMode::Execute,
		}
	}

	pub fn query(self) -> Self {
		Self {
			mode: ExecutionMode::Query,
			..self
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
	pub amount_in: Balance,
	pub amount_out: Balance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResult {
	/// Raw amount of each pool asset, zero for assets not provided.
	pub amounts_in: Vec<Balance>,
	pub shares_out: Balance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitResult {
	/// Raw amount of each pool asset, zero for assets not withdrawn.
	pub amounts_out: Vec<Balance>,
	pub shares_in: Balance,
}

/// Read model of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot<AssetId> {
	pub pool_id: PoolId,
	pub status: PoolStatus,
	pub assets: Vec<AssetId>,
	pub decimals: Vec<u8>,
	pub amplification: Vec<u16>,
	pub rates: Vec<Balance>,
	/// Reserves in native decimals.
	pub reserves: Vec<Balance>,
	pub scaled_reserves: Vec<Balance>,
	pub shares: Balance,
	pub invariant: Balance,
}
