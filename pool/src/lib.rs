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

//! # Flatswap pool
//!
//! Stable pools whose curvature is configured per asset.
//!
//! ## Overview
//!
//! A pool is a pure calculator over its own state. Every operation first produces a
//! [`pool::Settlement`]: the result for the caller, the [`PoolDelta`] describing token movements
//! and the pool state after the operation. Tokens are custodied by an external [`Ledger`]; the
//! [`PoolRegistry`] submits the delta to the ledger and commits the new state only when the ledger
//! accepted it.
//!
//! ### Terminology
//!
//! * **LP** - liquidity provider
//! * **Shares** - pool share units (BPT) minted on joins and burned on exits
//! * **Amplification** - per-asset flatness coefficient, a higher value means a flatter curve on that asset's side
//! * **Scaled balance** - balance converted to 18 decimals
//! * **Rate** - value of one scaled unit of an asset, the invariant works on rated balances
//!
//! ## Assumptions
//!
//! Maximum number of assets in pool is 5.
//!
//! First join must provide liquidity of all pool assets and mints shares equal to the invariant.
//!
//! Share supply never drops below `Config::MIN_POOL_LIQUIDITY` once the pool is initialized.

use core::ops::RangeInclusive;
use flatswap_traits::Ledger;

pub use flatswap_traits::{Balance, PoolDelta, PoolId};

mod error;
pub mod pool;
pub mod registry;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use error::Error;
pub use pool::{Pool, Settlement};
pub use registry::PoolRegistry;

pub const LOG_TARGET: &str = "flatswap::pool";

pub const MAX_ASSETS_IN_POOL: usize = 5;

const D_ITERATIONS: u8 = flatswap_math::stableswap::MAX_D_ITERATIONS;
const Y_ITERATIONS: u8 = flatswap_math::stableswap::MAX_Y_ITERATIONS;

pub trait Config {
	/// Identifier for the class of asset.
	type AssetId: Ord + Copy + core::fmt::Debug + Send + Sync + 'static;

	/// Custody of pool balances.
	type Ledger: Ledger<Self::AssetId> + Send + Sync;

	/// Minimum share supply of an initialized pool.
	const MIN_POOL_LIQUIDITY: Balance;

	/// Minimum trading amount, in scaled units.
	const MIN_TRADING_LIMIT: Balance;

	/// Amplification inclusive range. Pool's amplification coefficients must be within this range.
	const AMPLIFICATION_RANGE: RangeInclusive<u16>;
}
