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

use crate::pool::{validate_pool_info, Pool, Settlement};
use crate::types::{
	ExecutionMode, ExitRequest, ExitResult, JoinRequest, JoinResult, PoolInfo, PoolSnapshot, SwapRequest, SwapResult,
};
use crate::{Config, Error, PoolId, LOG_TARGET};
use flatswap_math::ensure;
use flatswap_math::types::Price;
use flatswap_traits::Ledger;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;

type SharedPool<T> = Arc<Mutex<Pool<T>>>;

/// Pools settled through one ledger.
///
/// Operations on one pool are serialized by the pool's lock, different pools run in parallel.
pub struct PoolRegistry<T: Config> {
	ledger: T::Ledger,
	pools: RwLock<BTreeMap<PoolId, SharedPool<T>>>,
}

impl<T: Config> PoolRegistry<T> {
	pub fn new(ledger: T::Ledger) -> Self {
		Self {
			ledger,
			pools: RwLock::new(BTreeMap::new()),
		}
	}

	pub fn ledger(&self) -> &T::Ledger {
		&self.ledger
	}

	/// Create a pool with given definition.
	///
	/// The pool is registered in the ledger, which assigns its id. Note that this does not seed the
	/// pool with liquidity, use a `JoinKind::Init` join to provide initial liquidity.
	pub fn create_pool(&self, info: PoolInfo<T::AssetId>) -> Result<PoolId, Error> {
		validate_pool_info::<T>(&info)?;

		let mut pools = self.pools.write();
		let pool_id = self.ledger.register_pool(&info.assets)?;
		ensure!(!pools.contains_key(&pool_id), Error::PoolExists);

		log::debug!(target: LOG_TARGET,
			"pool {} created: assets {:?}, amplification {:?}, decimals {:?}, rates {:?}",
			pool_id, info.assets, info.amplification, info.decimals, info.rates
		);

		let pool = Pool::new(pool_id, info)?;
		pools.insert(pool_id, Arc::new(Mutex::new(pool)));
		Ok(pool_id)
	}

	pub fn pool_ids(&self) -> Vec<PoolId> {
		self.pools.read().keys().copied().collect()
	}

	pub fn swap(&self, pool_id: PoolId, request: SwapRequest<T::AssetId>) -> Result<SwapResult, Error> {
		let pool = self.pool(pool_id)?;
		let mut pool = pool.lock();
		let settlement = pool.calculate_swap(request.asset_in, request.asset_out, request.kind)?;
		self.settle(&mut pool, settlement, request.mode)
	}

	pub fn join(&self, pool_id: PoolId, request: JoinRequest<T::AssetId>) -> Result<JoinResult, Error> {
		let pool = self.pool(pool_id)?;
		let mut pool = pool.lock();
		let settlement = pool.calculate_join(&request.kind)?;
		self.settle(&mut pool, settlement, request.mode)
	}

	pub fn exit(&self, pool_id: PoolId, request: ExitRequest<T::AssetId>) -> Result<ExitResult, Error> {
		let pool = self.pool(pool_id)?;
		let mut pool = pool.lock();
		let settlement = pool.calculate_exit(&request.kind)?;
		self.settle(&mut pool, settlement, request.mode)
	}

	pub fn spot_price(&self, pool_id: PoolId, asset_in: T::AssetId, asset_out: T::AssetId) -> Result<Price, Error> {
		let pool = self.pool(pool_id)?;
		let pool = pool.lock();
		pool.spot_price(asset_in, asset_out)
	}

	pub fn snapshot(&self, pool_id: PoolId) -> Result<PoolSnapshot<T::AssetId>, Error> {
		let pool = self.pool(pool_id)?;
		let pool = pool.lock();
		pool.snapshot()
	}

	/// Compares balances held by the ledger with the pool's own reserves.
	pub fn verify_reserves(&self, pool_id: PoolId) -> Result<(), Error> {
		let pool = self.pool(pool_id)?;
		let pool = pool.lock();

		let expected = pool.raw_reserves()?;
		let actual = self.ledger.balances(pool_id)?;

		if expected != actual {
			log::warn!(target: LOG_TARGET,
				"pool {}: reserves {:?} do not match ledger balances {:?}",
				pool_id, expected, actual
			);
			return Err(Error::ReserveMismatch);
		}
		Ok(())
	}

	fn pool(&self, pool_id: PoolId) -> Result<SharedPool<T>, Error> {
		self.pools.read().get(&pool_id).cloned().ok_or(Error::PoolNotFound)
	}

	fn settle<R>(
		&self,
		pool: &mut Pool<T>,
		settlement: Settlement<T::AssetId, R>,
		mode: ExecutionMode,
	) -> Result<R, Error> {
		match mode {
			ExecutionMode::Query => Ok(settlement.result),
			ExecutionMode::Execute => {
				if let Err(error) = self.ledger.apply(&settlement.delta) {
					log::warn!(target: LOG_TARGET,
						"pool {}: ledger rejected {:?}: {}",
						pool.id(), settlement.delta, error
					);
					return Err(error.into());
				}
				pool.apply(settlement)
			}
		}
	}
}
