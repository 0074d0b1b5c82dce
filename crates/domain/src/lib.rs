//! Shared domain types for TipCard: configuration, the common error
//! type, and the resolved card view-state.

pub mod config;
pub mod error;
pub mod state;
