mod multi_assets;

use crate::stableswap::calculate_ann;
use crate::types::Balance;
use primitive_types::U512;

pub(crate) const ONE: Balance = 1_000_000_000_000_000_000;
const D_ITERATIONS: u8 = 255;
const Y_ITERATIONS: u8 = 255;

/// Checks `ann·S + D = ann·D + D^(n+1) / (n^n·P) + Σ E_i` up to the rounding tolerance of the solver.
pub(crate) fn stable_swap_equation(d: Balance, amplification: &[u16], balances: &[Balance]) -> bool {
	let n = balances.len();
	let amp_max = amplification.iter().copied().max().unwrap();
	let ann = U512::from(calculate_ann(n, amp_max as Balance).unwrap());
	let nn = U512::from(n).pow(U512::from(n));
	let sum = balances.iter().fold(U512::zero(), |acc, v| acc + U512::from(*v));
	let product = balances.iter().fold(U512::one(), |acc, v| acc * U512::from(*v));
	let d = U512::from(d);

	let excess = balances
		.iter()
		.zip(amplification.iter())
		.fold(U512::zero(), |acc, (x, amp)| {
			let nx = U512::from(*x) * U512::from(n);
			if nx <= d {
				return acc;
			}
			let ann_asset = U512::from(calculate_ann(n, *amp as Balance).unwrap());
			acc + (ann - ann_asset) * (nx - d) * (nx - d) / ((ann_asset + U512::from(n)) * nx)
		});

	let left = ann * sum + d;
	let right = ann * d + d.pow(U512::from(n + 1)) / (nn * product) + excess;

	let diff = if left > right { left - right } else { right - left };
	let tolerance = U512::from(100u32) * (U512::from(2u32) * ann + U512::from(2 * (n + 1)));
	diff <= tolerance
}
