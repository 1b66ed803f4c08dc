use crate::{Balance, PoolId};
use serde::{Deserialize, Serialize};

/// Direction of a token movement, seen from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
	In,
	Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDelta<AssetId> {
	pub asset_id: AssetId,
	/// Raw amount in the token's native decimals.
	pub amount: Balance,
	pub direction: Direction,
}

impl<AssetId> AssetDelta<AssetId> {
	pub fn incoming(asset_id: AssetId, amount: Balance) -> Self {
		Self {
			asset_id,
			amount,
			direction: Direction::In,
		}
	}

	pub fn outgoing(asset_id: AssetId, amount: Balance) -> Self {
		Self {
			asset_id,
			amount,
			direction: Direction::Out,
		}
	}
}

/// Change of the pool share supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShareDelta {
	#[default]
	None,
	Mint(Balance),
	Burn(Balance),
}

/// Settlement record of one pool operation, submitted to the ledger.
///
/// Zero amounts are omitted from `assets`. Assets keep the order of the pool definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDelta<AssetId> {
	pub pool_id: PoolId,
	pub assets: Vec<AssetDelta<AssetId>>,
	pub shares: ShareDelta,
}

impl<AssetId: PartialEq> PoolDelta<AssetId> {
	/// Signed movement of `asset_id`: incoming amount minus outgoing amount.
	pub fn net_amount(&self, asset_id: &AssetId) -> i128 {
		self.assets
			.iter()
			.filter(|delta| delta.asset_id == *asset_id)
			.fold(0i128, |acc, delta| match delta.direction {
				Direction::In => acc.saturating_add_unsigned(delta.amount),
				Direction::Out => acc.saturating_sub_unsigned(delta.amount),
			})
	}

	pub fn amount_in(&self, asset_id: &AssetId) -> Balance {
		self.amount(asset_id, Direction::In)
	}

	pub fn amount_out(&self, asset_id: &AssetId) -> Balance {
		self.amount(asset_id, Direction::Out)
	}

	fn amount(&self, asset_id: &AssetId, direction: Direction) -> Balance {
		self.assets
			.iter()
			.filter(|delta| delta.asset_id == *asset_id && delta.direction == direction)
			.fold(0, |acc: Balance, delta| acc.saturating_add(delta.amount))
	}
}
