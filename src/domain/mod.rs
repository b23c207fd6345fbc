//! Core domain types and simulation logic.

pub mod agent;
pub mod aggregate;
pub mod arena;
pub mod candle;
pub mod catalog;
pub mod config_validation;
pub mod error;
pub mod execution;
pub mod indicator;
pub mod market;
pub mod portfolio;
pub mod position;
pub mod rng;
pub mod signal;
pub mod simulator;
pub mod strategy;
pub mod universe;
