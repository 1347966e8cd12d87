//! Report assembly engine.
//!
//! Turns per-unit provider results, some of which may have failed, into a
//! deterministic [`lpr_core::ReportDocument`]. Providers plug in through
//! [`MetricsProvider`]; [`Collector`] drives them with bounded concurrency and
//! [`assemble`] folds what came back.

pub mod assemble;
pub mod collect;
pub mod fixture;
pub mod performance;
pub mod provider;
pub mod submissions;
pub mod timeseries;

pub use assemble::{
    aggregate_locations, assemble, AssemblyFatalError, AssemblyOutcome, AssemblyPlan,
    CollectedSubAccount, MetricOutcome,
};
pub use collect::{CollectOptions, Collector};
pub use fixture::{FixtureError, FixtureProvider};
pub use performance::LocationFetch;
pub use provider::{MetricsProvider, ProviderError};
pub use submissions::build_table;
