// src/repro/mod.rs
pub mod names;
mod scenario;
mod teardown;

pub use names::{ReproNames, DEFAULT_LOCATION, DEFAULT_PREFIX};
pub use scenario::{run, Linkage, ReproReport, ReproSettings};
pub use teardown::{teardown, DeleteOutcome, ResourceKind, TeardownReport, TeardownStep};
