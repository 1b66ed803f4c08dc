use super::*;
use crate::stableswap::*;
use crate::MathError;

const AMPLIFICATION: [u16; 3] = [50, 50, 50];
const RESERVES: [Balance; 3] = [1_000_000 * ONE, 2_000_000 * ONE, 3_000_000 * ONE];

#[test]
fn calculate_d_should_work_when_reserves_are_imbalanced() {
	let d = calculate_d::<D_ITERATIONS>(&RESERVES, &AMPLIFICATION).unwrap();

	assert_eq!(d, 5_998_523_256_529_250_825_715_746u128);
	assert!(stable_swap_equation(d, &AMPLIFICATION, &RESERVES));
}

#[test]
fn calculate_d_should_work_with_five_assets() {
	let reserves = [ONE * 1_000_000; 5];
	let d = calculate_d::<D_ITERATIONS>(&reserves, &[7; 5]).unwrap();

	assert_eq!(d, 5_000_000 * ONE + 2);
	assert!(stable_swap_equation(d, &[7; 5], &reserves));
}

#[test]
fn calculate_d_should_fail_when_any_reserve_is_zero() {
	assert_eq!(
		calculate_d::<D_ITERATIONS>(&[ONE, 0, ONE], &AMPLIFICATION),
		Err(MathError::ZeroReserve)
	);
}

#[test]
fn out_given_in_should_work_between_any_pair() {
	assert_eq!(
		calculate_out_given_in::<D_ITERATIONS, Y_ITERATIONS>(&RESERVES, &AMPLIFICATION, 0, 2, 1_000 * ONE),
		Ok(1_003_934_367_847_405_526_321u128)
	);
	assert_eq!(
		calculate_out_given_in::<D_ITERATIONS, Y_ITERATIONS>(&RESERVES, &AMPLIFICATION, 2, 0, 1_000 * ONE),
		Ok(996_071_954_857_866_358_622u128)
	);
	assert_eq!(
		calculate_out_given_in::<D_ITERATIONS, Y_ITERATIONS>(&[ONE * 1_000_000; 5], &[7; 5], 0, 4, 1_000 * ONE),
		Ok(999_999_771_480_628_193_739u128)
	);
}

#[test]
fn in_given_out_should_work_between_any_pair() {
	assert_eq!(
		calculate_in_given_out::<D_ITERATIONS, Y_ITERATIONS>(&RESERVES, &AMPLIFICATION, 0, 2, 1_000 * ONE),
		Ok(996_081_032_915_891_367_616u128)
	);
}

#[test]
fn trade_should_not_decrease_invariant() {
	let d0 = calculate_d::<D_ITERATIONS>(&RESERVES, &AMPLIFICATION).unwrap();
	let amount_out =
		calculate_out_given_in::<D_ITERATIONS, Y_ITERATIONS>(&RESERVES, &AMPLIFICATION, 1, 0, 10_000 * ONE).unwrap();

	let updated = [RESERVES[0] - amount_out, RESERVES[1] + 10_000 * ONE, RESERVES[2]];
	let d1 = calculate_d::<D_ITERATIONS>(&updated, &AMPLIFICATION).unwrap();

	assert!(d1 >= d0);
}

#[test]
fn shares_should_be_minted_when_one_asset_is_added() {
	let issuance = calculate_d::<D_ITERATIONS>(&RESERVES, &AMPLIFICATION).unwrap();
	let updated = [RESERVES[0], RESERVES[1] + 500 * ONE, RESERVES[2]];

	assert_eq!(
		calculate_shares::<D_ITERATIONS>(&RESERVES, &updated, &AMPLIFICATION, issuance),
		Ok(499_876_815_120_149_500_010u128)
	);
}

#[test]
fn withdraw_one_asset_should_work() {
	let issuance = calculate_d::<D_ITERATIONS>(&RESERVES, &AMPLIFICATION).unwrap();

	assert_eq!(
		calculate_withdraw_one_asset::<D_ITERATIONS, Y_ITERATIONS>(&RESERVES, 1_000 * ONE, 1, issuance, &AMPLIFICATION),
		Ok(1_000_245_692_239_975_803_258u128)
	);
}

#[test]
fn mixed_amplification_pool_should_trade_each_asset_on_its_own_curvature() {
	let reserves = [1_000_000 * ONE; 3];
	let amplification = [499u16, 100u16, 1u16];
	let d0 = calculate_d::<D_ITERATIONS>(&reserves, &amplification).unwrap();

	let cases = [
		(0, 2, 9_999_977_736_025_408_979_884u128),
		(1, 0, 9_999_889_888_707_505_795_120u128),
		(2, 0, 9_990_098_809_725_611_687_171u128),
	];
	for (idx_in, idx_out, expected) in cases {
		let amount_out = calculate_out_given_in::<D_ITERATIONS, Y_ITERATIONS>(
			&reserves,
			&amplification,
			idx_in,
			idx_out,
			10_000 * ONE,
		)
		.unwrap();
		assert_eq!(amount_out, expected);

		let mut updated = reserves;
		updated[idx_in] += 10_000 * ONE;
		updated[idx_out] -= amount_out;
		assert!(calculate_d::<D_ITERATIONS>(&updated, &amplification).unwrap() >= d0);
	}
}
