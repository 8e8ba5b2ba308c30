//! Conformance harness: probe definitions, the sequential runner with its
//! uniform failure boundary, and the report renderers.

pub mod config;
pub mod probe;
pub mod probes;
pub mod report;
pub mod runner;

pub use self::config::HarnessConfig;
pub use self::probe::{Probe, ProbeError, ProbeResult};
pub use self::probes::default_probes;
pub use self::runner::{run_suite, SuiteOutcome};
