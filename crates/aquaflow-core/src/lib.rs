//! aquaflow-core library.
//!
//! Pure, synchronous reconstruction of Aqua Tree revision chains: given an
//! unordered mapping of revision hash → revision record (each record pointing
//! backwards via `previous_verification_hash`), this crate finds the genesis,
//! linearizes the chain, validates its shape, and produces a positioned
//! node/edge graph — including recursively attached linked chains — ready for
//! a downstream graph renderer.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per module with machine-readable
//!   `code()` accessors; malformed input is never silently papered over.
//! - **Logging**: `tracing` macros (`warn!`, `debug!`) for suspicious but
//!   recoverable input.
//! - **Purity**: no I/O, no globals, no interior mutability. Same input,
//!   same output.

pub mod chain;
pub mod layout;
pub mod model;
pub mod validate;
