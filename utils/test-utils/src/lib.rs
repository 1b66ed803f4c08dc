use pretty_assertions::assert_eq;

/// Installs `env_logger` once for the whole test binary. `RUST_LOG` controls the output.
pub fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// Compares two sequences of balances element-wise, allowing `delta` difference for each entry.
pub fn assert_balances_approx(actual: &[u128], expected: &[u128], delta: u128) {
	assert_eq!(actual.len(), expected.len(), "balances have different length");
	for (idx, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
		let diff = a.abs_diff(*e);
		if diff > delta {
			panic!(
				"\nbalance {} not equal\nleft: {:?}\nright: {:?}\ndiff: {}\n",
				idx, actual, expected, diff
			);
		}
	}
}

#[macro_export]
macro_rules! assert_eq_approx {
	( $x:expr, $y:expr, $z:expr, $r:expr) => {{
		let diff = if $x >= $y { $x - $y } else { $y - $x };
		if diff > $z {
			panic!("\n{} not equal\nleft: {:?}\nright: {:?}\n", $r, $x, $y);
		}
	}};
}

#[macro_export]
macro_rules! assert_balance {
	($ledger:expr, $pool_id:expr, $asset_idx:expr, $expected_balance:expr) => {{
		assert_eq!($ledger.balances($pool_id).unwrap()[$asset_idx], $expected_balance);
	}};
}

#[macro_export]
macro_rules! assert_balance_approx {
	( $ledger:expr, $pool_id:expr, $asset_idx:expr, $expected_balance:expr, $delta:expr) => {{
		let balance = $ledger.balances($pool_id).unwrap()[$asset_idx];

		let diff = if balance >= $expected_balance {
			balance - $expected_balance
		} else {
			$expected_balance - balance
		};
		if diff > $delta {
			panic!(
				"\n{} not equal\nleft: {:?}\nright: {:?}\n",
				"The balances are not equal", balance, $expected_balance
			);
		}
	}};
}
