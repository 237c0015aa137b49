//! normalgen CLI library.
//!
//! Command implementations and the shared JSON output types used by the
//! `normalgen` binary.

pub mod commands;
pub mod logging;
