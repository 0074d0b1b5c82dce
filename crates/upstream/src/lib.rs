//! Upstream collaborators for the TipCard gateway.
//!
//! - [`points::PointsClient`] — per-wallet airdrop points lookups.
//! - [`allowance::AllowanceClient`] — daily tip-allowance snapshots.
//! - [`identity`] — the interactor-resolver seam (who pressed the button).
//! - [`aggregator::IdentityDataAggregator`] — best-effort merge of all of
//!   the above into a resolved card state.
//!
//! Every client is a thin `reqwest` wrapper with a bounded per-call
//! timeout and retry-with-back-off on transient failures. Nothing in this
//! crate lets an upstream failure escape past the aggregator boundary.

pub mod aggregator;
pub mod allowance;
pub mod http;
pub mod identity;
pub mod points;

pub use aggregator::IdentityDataAggregator;
pub use allowance::{AllowanceClient, AllowanceEntry, AllowanceSource};
pub use identity::{Interactor, InteractorResolver, VerifiedAddresses};
pub use points::{PointsClient, PointsSource};
