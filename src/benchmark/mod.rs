//! Population benchmark reference data
//!
//! The benchmark table is loaded and validated once, then shared read-only by
//! every comparison. Callers either use the bundled table or supply their own.

mod data;
mod table;

pub use data::builtin_benchmarks;
pub use table::BenchmarkTable;
