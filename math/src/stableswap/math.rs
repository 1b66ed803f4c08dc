use crate::types::{Balance, Price, Rounding, ONE};
use crate::MathError::{
	DivisionByZero, InsufficientOutReserve, InvalidAmplification, InvalidAssetIndex, InvariantDecreased,
	MismatchedLength, NotConverged, Overflow, ZeroReserve,
};
use crate::{ensure, to_balance, to_u256, MathError};
use num_traits::Zero;
use primitive_types::{U256, U512};
use sp_std::prelude::*;

pub const MAX_Y_ITERATIONS: u8 = 255;
pub const MAX_D_ITERATIONS: u8 = 255;

const PRECISION: u8 = 1;

/// Calculate amount to be received from the pool given the amount to be sent to the pool.
///
/// D - number of iterations for Newton's method on the invariant
/// Y - number of iterations for Newton's method on the reserve of `idx_out`
pub fn calculate_out_given_in<const D: u8, const Y: u8>(
	balances: &[Balance],
	amplification: &[u16],
	idx_in: usize,
	idx_out: usize,
	amount_in: Balance,
) -> Result<Balance, MathError> {
	ensure!(
		idx_in < balances.len() && idx_out < balances.len() && idx_in != idx_out,
		InvalidAssetIndex
	);
	if amount_in.is_zero() {
		return Ok(Balance::zero());
	}

	let d = calculate_d::<D>(balances, amplification)?;

	let mut updated = balances.to_vec();
	updated[idx_in] = updated[idx_in].checked_add(amount_in).ok_or(Overflow)?;

	let new_reserve_out = calculate_y::<Y>(&updated, amplification, d, idx_out)?;
	let amount_out = balances[idx_out].saturating_sub(new_reserve_out);

	ensure!(amount_out < balances[idx_out], InsufficientOutReserve);
	Ok(amount_out)
}

/// Calculate amount to be sent to the pool given the amount to be received from the pool.
pub fn calculate_in_given_out<const D: u8, const Y: u8>(
	balances: &[Balance],
	amplification: &[u16],
	idx_in: usize,
	idx_out: usize,
	amount_out: Balance,
) -> Result<Balance, MathError> {
	ensure!(
		idx_in < balances.len() && idx_out < balances.len() && idx_in != idx_out,
		InvalidAssetIndex
	);
	ensure!(amount_out < balances[idx_out], InsufficientOutReserve);
	if amount_out.is_zero() {
		return Ok(Balance::zero());
	}

	let d = calculate_d::<D>(balances, amplification)?;

	let mut updated = balances.to_vec();
	updated[idx_out] = updated[idx_out].saturating_sub(amount_out);

	let new_reserve_in = calculate_y::<Y>(&updated, amplification, d, idx_in)?;
	new_reserve_in.checked_sub(balances[idx_in]).ok_or(Overflow)
}

/// Calculate amount of shares to be given to LP after LP provided liquidity of some assets to the pool.
///
/// With zero issuance the initial supply equals the updated invariant.
pub fn calculate_shares<const D: u8>(
	initial_reserves: &[Balance],
	updated_reserves: &[Balance],
	amplification: &[u16],
	share_issuance: Balance,
) -> Result<Balance, MathError> {
	ensure!(initial_reserves.len() == updated_reserves.len(), MismatchedLength);

	let initial_d = calculate_d::<D>(initial_reserves, amplification)?;

	// calculate_d can be above the exact value by up to 2. Lowering the updated one keeps
	// the minted amount rounded down.
	let updated_d = calculate_d::<D>(updated_reserves, amplification)?.saturating_sub(2);

	ensure!(updated_d >= initial_d, InvariantDecreased);

	if share_issuance.is_zero() {
		return Ok(updated_d);
	}

	let (issuance_hp, d_diff, d0) = to_u256!(share_issuance, updated_d - initial_d, initial_d);
	let share_amount = issuance_hp
		.checked_mul(d_diff)
		.ok_or(Overflow)?
		.checked_div(d0)
		.ok_or(DivisionByZero)?;
	to_balance!(share_amount)
}

/// Calculate amount of shares to be burned when LP withdraws exact amounts of assets.
pub fn calculate_shares_for_amounts_out<const D: u8>(
	initial_reserves: &[Balance],
	updated_reserves: &[Balance],
	amplification: &[u16],
	share_issuance: Balance,
) -> Result<Balance, MathError> {
	ensure!(initial_reserves.len() == updated_reserves.len(), MismatchedLength);

	let initial_d = calculate_d::<D>(initial_reserves, amplification)?;
	let updated_d = calculate_d::<D>(updated_reserves, amplification)?.saturating_sub(2);

	let (issuance_hp, d_diff, d0) = to_u256!(share_issuance, initial_d.saturating_sub(updated_d), initial_d);
	let shares = div_round_up(issuance_hp.checked_mul(d_diff).ok_or(Overflow)?, d0)?;
	to_balance!(shares)
}

/// Given amount of shares to mint, calculate amount of selected asset the LP has to provide.
pub fn calculate_add_one_asset<const D: u8, const Y: u8>(
	reserves: &[Balance],
	shares: Balance,
	asset_index: usize,
	share_asset_issuance: Balance,
	amplification: &[u16],
) -> Result<Balance, MathError> {
	ensure!(asset_index < reserves.len(), InvalidAssetIndex);
	ensure!(!share_asset_issuance.is_zero(), DivisionByZero);

	let initial_d = calculate_d::<D>(reserves, amplification)?;

	let (d_hp, shares_hp, issuance_hp) = to_u256!(initial_d, shares, share_asset_issuance);
	let updated_supply = issuance_hp.checked_add(shares_hp).ok_or(Overflow)?;
	let d1 = div_round_up(d_hp.checked_mul(updated_supply).ok_or(Overflow)?, issuance_hp)?;

	let y = calculate_y::<Y>(reserves, amplification, to_balance!(d1)?, asset_index)?;
	y.checked_sub(reserves[asset_index]).ok_or(Overflow)
}

/// Given amount of shares and asset reserves, calculate corresponding amount of selected asset to be withdrawn.
pub fn calculate_withdraw_one_asset<const D: u8, const Y: u8>(
	reserves: &[Balance],
	shares: Balance,
	asset_index: usize,
	share_asset_issuance: Balance,
	amplification: &[u16],
) -> Result<Balance, MathError> {
	ensure!(asset_index < reserves.len(), InvalidAssetIndex);
	ensure!(shares < share_asset_issuance, InsufficientOutReserve);

	let initial_d = calculate_d::<D>(reserves, amplification)?;

	let (d_hp, shares_hp, issuance_hp) = to_u256!(initial_d, shares, share_asset_issuance);
	let d_diff = d_hp
		.checked_mul(shares_hp)
		.ok_or(Overflow)?
		.checked_div(issuance_hp)
		.ok_or(DivisionByZero)?;
	let d1 = d_hp.checked_sub(d_diff).ok_or(Overflow)?;

	let y = calculate_y::<Y>(reserves, amplification, to_balance!(d1)?, asset_index)?;
	let amount_out = reserves[asset_index].saturating_sub(y);

	ensure!(amount_out < reserves[asset_index], InsufficientOutReserve);
	Ok(amount_out)
}

/// Share of each reserve corresponding to `shares` out of `share_issuance`.
pub fn calculate_proportional_amounts(
	reserves: &[Balance],
	shares: Balance,
	share_issuance: Balance,
	rounding: Rounding,
) -> Result<Vec<Balance>, MathError> {
	ensure!(!share_issuance.is_zero(), DivisionByZero);

	let (shares_hp, issuance_hp) = to_u256!(shares, share_issuance);
	reserves
		.iter()
		.map(|reserve| {
			let product = to_u256!(*reserve).checked_mul(shares_hp).ok_or(Overflow)?;
			let amount = match rounding {
				Rounding::Down => product / issuance_hp,
				Rounding::Up => div_round_up(product, issuance_hp)?,
			};
			to_balance!(amount)
		})
		.collect()
}

/// Marginal price of `idx_out` denominated in `idx_in`, i.e. how many units of `idx_in`
/// one unit of `idx_out` is worth at current balances.
pub fn calculate_spot_price<const D: u8>(
	balances: &[Balance],
	amplification: &[u16],
	idx_in: usize,
	idx_out: usize,
) -> Result<Price, MathError> {
	ensure!(
		idx_in < balances.len() && idx_out < balances.len() && idx_in != idx_out,
		InvalidAssetIndex
	);
	ensure!(balances.iter().all(|v| !v.is_zero()), ZeroReserve);

	let d = calculate_d::<D>(balances, amplification)?;
	let (ann, curvature) = calculate_curvature(balances.len(), amplification)?;
	let d_p = calculate_d_product(balances, d)?;
	let (d_hp, n_coins, ann_hp) = to_u256!(d, balances.len(), ann);

	// x * dF/dx of the invariant equation for one asset
	let weight = |idx: usize| -> Result<U256, MathError> {
		let x = to_u256!(balances[idx]);
		let slope = excess_slope(x, curvature[idx], d_hp, n_coins).ok_or(Overflow)?;
		ann_hp
			.checked_mul(x)
			.and_then(|v| v.checked_add(d_p))
			.and_then(|v| v.checked_sub(slope))
			.ok_or(Overflow)
	};

	let (x_in, x_out, one) = (
		U512::from(balances[idx_in]),
		U512::from(balances[idx_out]),
		U512::from(ONE),
	);
	let numerator = U512::from(weight(idx_out)?)
		.checked_mul(x_in)
		.and_then(|v| v.checked_mul(one))
		.ok_or(Overflow)?;
	let denominator = U512::from(weight(idx_in)?).checked_mul(x_out).ok_or(Overflow)?;

	let price = numerator.checked_div(denominator).ok_or(DivisionByZero)?;
	ensure!(price <= U512::from(u128::MAX), Overflow);
	Ok(Price::from_inner(price.low_u128()))
}

/// Solve the invariant `D` of given balances.
///
/// `D` satisfies
///
/// `ann·S + D = ann·D + D^(n+1) / (n^n·P) + Σ E_i`
///
/// where `ann` is the highest amplification times `n^n`, and `E_i = k_i·(n·x_i - D)^2 / (n·x_i)`
/// is the excess term of asset `i`, present only while `n·x_i > D`. Its weight
/// `k_i = (ann_max - ann_i) / (ann_i + n)` is zero for assets with the highest amplification, so a
/// pool with one amplification for every asset is the plain stableswap curve. A lower
/// amplification bends the curve more once its asset is in excess.
///
/// Every excess term is convex, so the curve stays convex for any number of assets.
pub fn calculate_d<const D: u8>(balances: &[Balance], amplification: &[u16]) -> Result<Balance, MathError> {
	let (ann, curvature) = calculate_curvature(balances.len(), amplification)?;

	let xp_hp: Vec<U256> = balances.iter().map(|v| to_u256!(*v)).collect();
	let s_hp = xp_hp
		.iter()
		.try_fold(U256::zero(), |acc, v| acc.checked_add(*v))
		.ok_or(Overflow)?;

	if s_hp.is_zero() {
		return Ok(Balance::zero());
	}

	ensure!(xp_hp.iter().all(|v| !v.is_zero()), ZeroReserve);

	let mut sorted = xp_hp.clone();
	sorted.sort();

	let (n_coins, ann_hp, precision_hp) = to_u256!(xp_hp.len(), ann, PRECISION as u128);

	let mut d = s_hp;

	for _ in 0..D {
		let d_p = sorted
			.iter()
			.try_fold(d, |acc, v| acc.checked_mul(d)?.checked_div(v.checked_mul(n_coins)?))
			.ok_or(Overflow)?;
		let excess = excess_slopes(&xp_hp, &curvature, d, n_coins).ok_or(Overflow)?;
		let d_prev = d;

		d = next_d(d, d_p, s_hp, n_coins, ann_hp, excess).ok_or(Overflow)?;

		if has_converged(d_prev, d, precision_hp) {
			return to_balance!(d);
		}
	}

	Err(NotConverged)
}

/// Solve the balance of `asset_index` which keeps the invariant at `d` while the other balances stay put.
pub fn calculate_y<const Y: u8>(
	balances: &[Balance],
	amplification: &[u16],
	d: Balance,
	asset_index: usize,
) -> Result<Balance, MathError> {
	ensure!(asset_index < balances.len(), InvalidAssetIndex);

	let (ann, curvature) = calculate_curvature(balances.len(), amplification)?;

	let (others, others_curvature): (Vec<U256>, Vec<Curvature>) = balances
		.iter()
		.zip(curvature.iter())
		.enumerate()
		.filter(|(idx, _)| *idx != asset_index)
		.map(|(_, (v, c))| (to_u256!(*v), *c))
		.unzip();

	ensure!(others.iter().all(|v| !v.is_zero()), ZeroReserve);

	let (d_hp, n_coins, ann_hp, precision_hp) = to_u256!(d, balances.len(), ann, PRECISION as u128);

	let mut sorted = others.clone();
	sorted.sort();

	let c = sorted
		.iter()
		.try_fold(d_hp, |acc, v| acc.checked_mul(d_hp)?.checked_div(v.checked_mul(n_coins)?))
		.and_then(|c| c.checked_mul(d_hp)?.checked_div(n_coins))
		.ok_or(Overflow)?;

	let excess = others
		.iter()
		.zip(others_curvature.iter())
		.try_fold(U256::zero(), |acc, (x, curvature)| {
			acc.checked_add(excess_term(*x, *curvature, d_hp, n_coins)?)
		})
		.ok_or(Overflow)?;

	let equation = YEquation {
		ann: ann_hp,
		d: d_hp,
		n_coins,
		sum: others
			.iter()
			.try_fold(U256::zero(), |acc, v| acc.checked_add(*v))
			.ok_or(Overflow)?,
		c,
		excess,
		curvature: curvature[asset_index],
	};

	let mut y = d_hp;

	for _ in 0..Y {
		let y_prev = y;
		y = equation.next(y).ok_or(Overflow)?;

		if has_converged(y_prev, y, precision_hp) {
			return to_balance!(y);
		}
	}

	Err(NotConverged)
}

/// amplification * n^n where n is number of assets in pool.
pub(crate) fn calculate_ann(len: usize, amplification: Balance) -> Result<Balance, MathError> {
	(0..len)
		.try_fold(amplification, |acc, _| acc.checked_mul(len as u128))
		.ok_or(Overflow)
}

/// Weight `(ann_max - ann) / (ann + n)` of an asset's excess term.
///
/// In a two asset pool this makes each side match, near balance, the plain curve with the
/// amplification of the asset in excess.
#[derive(Clone, Copy, Debug)]
struct Curvature {
	numerator: U256,
	denominator: U256,
}

impl Curvature {
	fn is_flat(&self) -> bool {
		self.numerator.is_zero()
	}
}

/// `ann` of the highest amplification and the excess weight of every asset.
fn calculate_curvature(len: usize, amplification: &[u16]) -> Result<(Balance, Vec<Curvature>), MathError> {
	ensure!(len == amplification.len(), MismatchedLength);
	ensure!(
		!amplification.is_empty() && amplification.iter().all(|a| !a.is_zero()),
		InvalidAmplification
	);

	let amp_max = amplification.iter().copied().max().unwrap_or_default();
	let ann = calculate_ann(len, amp_max as Balance)?;

	let curvature = amplification
		.iter()
		.map(|amp| {
			let ann_asset = calculate_ann(len, *amp as Balance)?;
			Ok(Curvature {
				numerator: to_u256!(ann - ann_asset),
				denominator: to_u256!(ann_asset).checked_add(to_u256!(len)).ok_or(Overflow)?,
			})
		})
		.collect::<Result<Vec<_>, MathError>>()?;
	Ok((ann, curvature))
}

/// `k·(n·x - d)^2 / (n·x)`, zero unless the asset is in excess.
fn excess_term(x: U256, curvature: Curvature, d: U256, n_coins: U256) -> Option<U256> {
	let nx = x.checked_mul(n_coins)?;
	if nx <= d || curvature.is_flat() {
		return Some(U256::zero());
	}
	let diff = nx - d;
	curvature
		.numerator
		.checked_mul(diff.checked_mul(diff)?)?
		.checked_div(curvature.denominator.checked_mul(nx)?)
}

/// `x·dE/dx = k·((n·x)^2 - d^2) / (n·x)` of one excess term.
fn excess_slope(x: U256, curvature: Curvature, d: U256, n_coins: U256) -> Option<U256> {
	let nx = x.checked_mul(n_coins)?;
	if nx <= d || curvature.is_flat() {
		return Some(U256::zero());
	}
	curvature
		.numerator
		.checked_mul(nx.checked_mul(nx)?.checked_sub(d.checked_mul(d)?)?)?
		.checked_div(curvature.denominator.checked_mul(nx)?)
}

/// Sums of `x·dE/dx` and `-d·dE/dd` over the excess terms of all assets.
fn excess_slopes(xp: &[U256], curvature: &[Curvature], d: U256, n_coins: U256) -> Option<(U256, U256)> {
	let two = U256::from(2u8);
	xp.iter()
		.zip(curvature.iter())
		.try_fold((U256::zero(), U256::zero()), |(slope, d_slope), (x, curvature)| {
			let nx = x.checked_mul(n_coins)?;
			if nx <= d || curvature.is_flat() {
				return Some((slope, d_slope));
			}
			let ds = two
				.checked_mul(curvature.numerator)?
				.checked_mul(d)?
				.checked_mul(nx - d)?
				.checked_div(curvature.denominator.checked_mul(nx)?)?;
			Some((
				slope.checked_add(excess_slope(*x, *curvature, d, n_coins)?)?,
				d_slope.checked_add(ds)?,
			))
		})
}

/// D^(n+1) / (n^n * prod(x)) folded over sorted balances.
fn calculate_d_product(balances: &[Balance], d: Balance) -> Result<U256, MathError> {
	let mut xp_hp: Vec<U256> = balances.iter().map(|v| to_u256!(*v)).collect();
	xp_hp.sort();

	let (d_hp, n_coins) = to_u256!(d, balances.len());
	xp_hp
		.iter()
		.try_fold(d_hp, |acc, v| acc.checked_mul(d_hp)?.checked_div(v.checked_mul(n_coins)?))
		.ok_or(Overflow)
}

fn next_d(d: U256, d_p: U256, s: U256, n_coins: U256, ann: U256, excess: (U256, U256)) -> Option<U256> {
	let (slope, d_slope) = excess;
	let numerator = ann
		.checked_mul(s)?
		.checked_add(d_p.checked_mul(n_coins)?)?
		.checked_sub(slope)?
		.checked_mul(d)?;
	let denominator = ann
		.checked_sub(U256::one())?
		.checked_mul(d)?
		.checked_add(n_coins.checked_add(U256::one())?.checked_mul(d_p)?)?
		.checked_sub(d_slope)?;

	// adding two accounts for the rounding of the divisions, the result is never below the exact invariant
	numerator.checked_div(denominator)?.checked_add(to_u256!(2_u128))
}

/// Newton step on `y·(ann·(S' + y) + D - ann·D - D_p - E) = 0` for the missing balance `y`.
struct YEquation {
	ann: U256,
	d: U256,
	n_coins: U256,
	/// Sum of the other balances.
	sum: U256,
	/// D^(n+1) / (n^n * prod(other balances))
	c: U256,
	/// Excess terms of the other balances.
	excess: U256,
	curvature: Curvature,
}

impl YEquation {
	fn next(&self, y: U256) -> Option<U256> {
		let two = U256::from(2u8);
		let ny = y.checked_mul(self.n_coins)?;

		let (bend, bend_slope) = if ny > self.d && !self.curvature.is_flat() {
			let bend = self
				.curvature
				.numerator
				.checked_mul(ny.checked_mul(ny)?.checked_sub(self.d.checked_mul(self.d)?)?)?
				.checked_div(self.curvature.denominator.checked_mul(self.n_coins)?)?;
			let bend_slope = two
				.checked_mul(self.curvature.numerator)?
				.checked_mul(ny - self.d)?
				.checked_div(self.curvature.denominator)?;
			(bend, bend_slope)
		} else {
			(U256::zero(), U256::zero())
		};

		let numerator = self
			.ann
			.checked_mul(y)?
			.checked_mul(y)?
			.checked_add(self.c)?
			.checked_sub(bend)?;
		let denominator = self
			.ann
			.checked_mul(two.checked_mul(y)?.checked_add(self.sum)?)?
			.checked_add(self.d)?
			.checked_sub(self.ann.checked_mul(self.d)?)?
			.checked_sub(self.excess)?
			.checked_sub(bend_slope)?;

		numerator.checked_div(denominator)?.checked_add(to_u256!(2_u128))
	}
}

fn div_round_up(numerator: U256, denominator: U256) -> Result<U256, MathError> {
	ensure!(!denominator.is_zero(), DivisionByZero);
	let result = numerator / denominator;
	if (numerator % denominator).is_zero() {
		Ok(result)
	} else {
		result.checked_add(U256::one()).ok_or(Overflow)
	}
}

#[inline]
fn has_converged(v0: U256, v1: U256, precision: U256) -> bool {
	let diff = abs_diff(v0, v1);

	(v1 <= v0 && diff < precision) || (v1 > v0 && diff <= precision)
}

#[inline]
fn abs_diff(d0: U256, d1: U256) -> U256 {
	if d1 >= d0 {
		// This is safe due the previous condition
		d1 - d0
	} else {
		d0 - d1
	}
}
