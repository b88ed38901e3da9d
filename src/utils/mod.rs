pub mod dates;
pub mod gapfill;
pub mod reconcile;
pub mod rules;
pub mod xlsx;
