mod math;

#[cfg(test)]
pub mod tests;

pub use math::*;
