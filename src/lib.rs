//! Hegemon bot library.
//!
//! Exposes the board graph, combat and dominator evaluation, rankers, troop
//! routing, round planning, and protocol modules for use by integration
//! tests, benchmarks, and the binary entry point.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod plan;
pub mod protocol;
pub mod rank;
pub mod state;
