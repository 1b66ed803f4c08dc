use crate::{Balance, PoolDelta, PoolId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
	#[error("pool is not registered in the ledger")]
	PoolNotRegistered,
	#[error("insufficient funds to settle the operation")]
	InsufficientFunds,
	#[error("settlement rejected: {0}")]
	Rejected(String),
}

/// Custody of pool balances.
///
/// The ledger holds the raw token balances of every pool it registered. Pools never move tokens
/// themselves; they hand a [`PoolDelta`] to the ledger and commit their own state only after
/// `apply` succeeded.
pub trait Ledger<AssetId> {
	/// Registers a pool with given assets and returns its unique id.
	fn register_pool(&self, assets: &[AssetId]) -> Result<PoolId, SettlementError>;

	/// Raw balances of a pool, in the order of assets it was registered with.
	fn balances(&self, pool_id: PoolId) -> Result<Vec<Balance>, SettlementError>;

	/// Applies all movements of `delta` atomically.
	fn apply(&self, delta: &PoolDelta<AssetId>) -> Result<(), SettlementError>;
}
