use crate::tests::mock::*;
use crate::types::PoolInfo;
use crate::{Balance, Pool};
use primitive_types::U256;
use proptest::prelude::*;
use proptest::proptest;

fn asset_reserve() -> impl Strategy<Value = Balance> {
	100_000..100_000_000u128
}

fn trade_amount() -> impl Strategy<Value = Balance> {
	1..10_000u128
}

fn amplification() -> impl Strategy<Value = u16> {
	1..500u16
}

fn rate() -> impl Strategy<Value = Balance> {
	ONE / 2..20 * ONE
}

fn pool(
	reserve_xcqr: Balance,
	reserve_usdc: Balance,
	amp_xcqr: u16,
	amp_usdc: u16,
	rate_xcqr: Balance,
) -> Pool<Test> {
	initialized_pool(
		PoolInfo::new(vec![XCQR, USDC], vec![amp_xcqr, amp_usdc], vec![18, 6]).with_rates(vec![rate_xcqr, ONE]),
		vec![reserve_xcqr * ONE, reserve_usdc * USDC_ONE],
	)
}

/// Invariant per share, compared without division.
#[derive(Clone, Copy)]
struct ShareValue {
	invariant: Balance,
	shares: Balance,
}

impl ShareValue {
	fn of(pool: &Pool<Test>) -> Self {
		Self {
			invariant: pool.state().last_invariant,
			shares: pool.state().shares,
		}
	}

	fn not_less_than(&self, other: &ShareValue) -> bool {
		U256::from(self.invariant) * U256::from(other.shares) >= U256::from(other.invariant) * U256::from(self.shares)
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(200))]
	#[test]
	fn swapping_back_should_not_be_profitable(amount in trade_amount(),
		reserve_xcqr in asset_reserve(),
		reserve_usdc in asset_reserve(),
		amp_xcqr in amplification(),
		amp_usdc in amplification(),
		rate_xcqr in rate(),
	) {
		let mut pool = pool(reserve_xcqr, reserve_usdc, amp_xcqr, amp_usdc, rate_xcqr);

		let sold = pool.swap_given_in(USDC, XCQR, amount * USDC_ONE, 0).unwrap();
		let bought_back = pool.swap_given_in(XCQR, USDC, sold.amount_out, 0).unwrap();

		prop_assert!(bought_back.amount_out <= amount * USDC_ONE);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(200))]
	#[test]
	fn join_then_exit_one_asset_should_not_be_profitable(amount in trade_amount(),
		reserve_xcqr in asset_reserve(),
		reserve_usdc in asset_reserve(),
		amp_xcqr in amplification(),
		amp_usdc in amplification(),
		rate_xcqr in rate(),
	) {
		let mut pool = pool(reserve_xcqr, reserve_usdc, amp_xcqr, amp_usdc, rate_xcqr);

		let joined = pool.join_exact_tokens_in(vec![amount * ONE, 0], 0).unwrap();
		let exited = pool.exit_exact_shares_in_for_one_asset(joined.shares_out, XCQR, 0).unwrap();

		prop_assert!(exited.amounts_out[0] <= amount * ONE);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(100))]
	#[test]
	fn share_value_should_not_decrease(amount in trade_amount(),
		reserve_xcqr in asset_reserve(),
		reserve_usdc in asset_reserve(),
		amp_xcqr in amplification(),
		amp_usdc in amplification(),
		rate_xcqr in rate(),
	) {
		let mut pool = pool(reserve_xcqr, reserve_usdc, amp_xcqr, amp_usdc, rate_xcqr);
		let mut previous = ShareValue::of(&pool);

		let mut check = |pool: &Pool<Test>| -> bool {
			let current = ShareValue::of(pool);
			let ok = current.not_less_than(&previous);
			previous = current;
			ok
		};

		pool.swap_given_in(USDC, XCQR, amount * USDC_ONE, 0).unwrap();
		prop_assert!(check(&pool));

		pool.swap_given_out(XCQR, USDC, amount * USDC_ONE, u128::MAX).unwrap();
		prop_assert!(check(&pool));

		pool.join_exact_tokens_in(vec![amount * ONE, 0], 0).unwrap();
		prop_assert!(check(&pool));

		pool.join_exact_shares_out(amount * ONE, vec![u128::MAX, u128::MAX]).unwrap();
		prop_assert!(check(&pool));

		pool.join_exact_shares_out_for_one_asset(amount * ONE, USDC, u128::MAX).unwrap();
		prop_assert!(check(&pool));

		pool.exit_exact_tokens_out(vec![0, amount * USDC_ONE], u128::MAX).unwrap();
		prop_assert!(check(&pool));

		pool.exit_exact_shares_in(amount * ONE, vec![0, 0]).unwrap();
		prop_assert!(check(&pool));

		pool.exit_exact_shares_in_for_one_asset(amount * ONE, XCQR, 0).unwrap();
		prop_assert!(check(&pool));
	}
}
