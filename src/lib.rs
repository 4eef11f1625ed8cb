//! vitalbench - Population benchmark comparison for personal health metrics
//!
//! vitalbench places a user's latest measurements (resting heart rate, VO2 max,
//! steps) within age-stratified population benchmarks through a deterministic
//! pipeline: benchmark lookup → percentile estimation → direction normalization
//! → rating classification → report encoding.
//!
//! ## Modules
//!
//! - **Comparison engine**: `percentile`, `normalizer`, `rating`, `comparison`
//! - **Reference data**: `benchmark`, validated once and shared read-only
//! - **Measurements**: `measurement`, `analytics`, `profile`, `mock`
//! - **Output**: `encoder`, `pipeline`, `ffi`

pub mod analytics;
pub mod benchmark;
pub mod comparison;
pub mod encoder;
pub mod error;
pub mod measurement;
pub mod mock;
pub mod normalizer;
pub mod percentile;
pub mod pipeline;
pub mod profile;
pub mod rating;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use benchmark::BenchmarkTable;
pub use comparison::{BenchmarkComparator, Unavailable};
pub use error::BenchmarkError;
pub use pipeline::{compare_json, measurements_to_report, BenchmarkProcessor};
pub use types::{
    AgeGroupBenchmark, Gender, MetricBenchmark, MetricType, Percentiles, Rating, UserComparison,
};

/// vitalbench version embedded in all reports
pub const VITALBENCH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "vitalbench";
