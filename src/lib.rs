//! agent-arena: deterministic multi-agent strategy backtester.
//!
//! Thousands of seeded agents, each with its own strategy pair and risk
//! profile, trade the same daily price history. Runs are reproducible: an
//! agent id fully determines its traits and its result.
//!
//! Hexagonal architecture: simulation logic in [`domain`], port traits in
//! [`ports`], file-backed implementations in [`adapters`], and the binary's
//! command dispatch in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
