//! Azul Rules
//!
//! The Azul rules engine plus a console reporter for playing it at a terminal.
//!
//! This crate re-exports the engine crate for convenience.

pub use azul_rules_engine::*;

pub mod display;
