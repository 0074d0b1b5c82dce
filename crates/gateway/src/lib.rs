//! TipCard gateway — HTTP server for the tipping-stats card.
//!
//! A request enters [`resolve`] (layered parameter merging), the frame
//! state machine in [`frame`] picks Idle or MyState (the latter invoking
//! the identity-data aggregator), and the final state is serialized and
//! handed to [`links::LinkStore`] to mint a short link. A second inbound
//! path resolves minted ids back to full parameter sets.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod frame;
pub mod links;
pub mod resolve;
pub mod state;
