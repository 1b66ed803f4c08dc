use sp_arithmetic::FixedU128;

pub type Balance = u128;
pub type Price = FixedU128;

/// One unit in the 18 decimal fixed point domain.
pub const ONE: Balance = 1_000_000_000_000_000_000;

/// Direction in which a division result is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
	Down,
	Up,
}
