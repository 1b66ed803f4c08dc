use crate::tests::mock::*;
use crate::types::{PoolInfo, SwapRequest};
use crate::{Balance, Error, Pool};
use flatswap_traits::Ledger;
use pretty_assertions::assert_eq;
use sp_arithmetic::{FixedPointNumber, FixedU128};

const XCQR_RATE: Balance = 10 * ONE;

fn plain_pool() -> PoolInfo<AssetId> {
	stable_pool(vec![XCQR, USDC], 100, vec![18, 6])
}

/// One XCQR is worth ten USDC.
fn rated_pool() -> PoolInfo<AssetId> {
	plain_pool().with_rates(vec![XCQR_RATE, ONE])
}

fn liquidity() -> Vec<Balance> {
	vec![100_000 * ONE, 1_000_000 * USDC_ONE]
}

#[test]
fn rated_pool_should_value_reserves_at_rate() {
	let plain = initialized_pool(plain_pool(), liquidity());
	let rated = initialized_pool(rated_pool(), liquidity());

	assert_eq!(plain.state().shares, 1_094_540_843_072_931_312_798_773);
	assert_eq!(rated.state().shares, 2_000_000 * ONE + 2);
	assert_eq!(rated.rated_reserves(), Ok(vec![1_000_000 * ONE, 1_000_000 * ONE]));
	assert_eq!(rated.state().reserves, vec![100_000 * ONE, 1_000_000 * ONE]);
	assert_eq!(rated.raw_reserves(), Ok(liquidity()));
}

#[test]
fn rate_should_move_spot_price() {
	let plain = initialized_pool(plain_pool(), liquidity());
	let rated = initialized_pool(rated_pool(), liquidity());

	assert_eq!(plain.spot_price(XCQR, USDC), Ok(FixedU128::from_inner(931_827_501_926_102_585)));
	assert_eq!(rated.spot_price(XCQR, USDC), Ok(FixedU128::from_rational(1, 10)));
	assert_eq!(rated.spot_price(USDC, XCQR), Ok(FixedU128::from_u32(10)));
}

#[test]
fn rate_should_move_swap_output() {
	let mut plain = initialized_pool(plain_pool(), liquidity());
	let mut rated = initialized_pool(rated_pool(), liquidity());

	let plain_sell = plain.swap_given_in(XCQR, USDC, 10 * ONE, 0).unwrap();
	let rated_sell = rated.swap_given_in(XCQR, USDC, 10 * ONE, 0).unwrap();

	assert_eq!(plain_sell.amount_out, 10_731_526);
	assert_eq!(rated_sell.amount_out, 99_999_950);
	assert_eq!(rated.raw_reserves(), Ok(vec![100_010 * ONE, 999_900_000_050]));
}

#[test]
fn buy_in_rated_pool_should_round_amount_in_up() {
	let mut pool = initialized_pool(rated_pool(), liquidity());

	let result = pool.swap_given_out(XCQR, USDC, 100 * USDC_ONE, u128::MAX).unwrap();

	assert_eq!(result.amount_in, 10_000_004_975_126_902_555);
	assert_eq!(
		pool.raw_reserves(),
		Ok(vec![100_010_000_004_975_126_902_555, 999_900_000_000])
	);
}

#[test]
fn liquidity_in_rated_pool_should_follow_rate() {
	let mut pool = initialized_pool(rated_pool(), liquidity());

	let joined = pool.join_exact_tokens_in(vec![10 * ONE, 0], 0).unwrap();
	assert_eq!(joined.shares_out, 99_999_987_562_810_883_320);

	let mut pool = initialized_pool(rated_pool(), liquidity());

	let exited = pool.exit_exact_shares_in_for_one_asset(100 * ONE, XCQR, 0).unwrap();
	assert_eq!(exited.amounts_out, vec![9_999_998_756_157_019_658, 0]);
}

#[test]
fn rated_pool_should_keep_ledger_in_sync() {
	let registry = ExtBuilder::default().with_pool(rated_pool(), liquidity()).build();

	registry
		.swap(FIRST_POOL_ID, SwapRequest::given_in(XCQR, USDC, 10 * ONE, 0))
		.unwrap();
	registry
		.swap(FIRST_POOL_ID, SwapRequest::given_out(XCQR, USDC, 100 * USDC_ONE, u128::MAX))
		.unwrap();

	let snapshot = registry.snapshot(FIRST_POOL_ID).unwrap();
	assert_eq!(snapshot.rates, vec![XCQR_RATE, ONE]);
	assert!(snapshot.invariant >= 2_000_000 * ONE + 2);
	assert_eq!(registry.ledger().balances(FIRST_POOL_ID), Ok(snapshot.reserves));
	assert_eq!(registry.verify_reserves(FIRST_POOL_ID), Ok(()));
}

#[test]
fn pool_without_rates_should_default_to_one() {
	let pool = Pool::<Test>::new(FIRST_POOL_ID, plain_pool()).unwrap();

	assert_eq!(pool.snapshot().map(|s| s.rates), Ok(vec![ONE, ONE]));
}

#[test]
fn create_pool_should_fail_when_rates_are_invalid() {
	assert_eq!(
		Pool::<Test>::new(FIRST_POOL_ID, plain_pool().with_rates(vec![ONE, 0])).err(),
		Some(Error::InvalidRate)
	);
	assert_eq!(
		Pool::<Test>::new(FIRST_POOL_ID, plain_pool().with_rates(vec![ONE])).err(),
		Some(Error::InvalidRate)
	);
}

#[test]
fn pool_info_with_rates_should_deserialize_from_json() {
	let json = r#"{
		"assets": [1, 2],
		"amplification": [100, 100],
		"decimals": [18, 6],
		"rates": [10000000000000000000, 1000000000000000000]
	}"#;

	let info: PoolInfo<AssetId> = serde_json::from_str(json).unwrap();

	assert_eq!(info, rated_pool());
}
