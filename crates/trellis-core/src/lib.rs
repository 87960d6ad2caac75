//! Core types and trait definitions for the Trellis graph store.
//!
//! This crate is deliberately free of database dependencies. Backends
//! implement [`store::GraphStore`]; everything above them depends only on
//! this crate.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod graph;
pub mod instance;
pub mod store;

pub use error::{ConstraintKind, Error, Result};
