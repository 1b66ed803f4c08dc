mod invariants;
mod rates;
