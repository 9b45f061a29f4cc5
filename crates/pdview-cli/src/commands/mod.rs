//! CLI command implementations.

pub mod channels;
pub mod check;
pub mod common;
pub mod config;
pub mod inspect;
pub mod simulate;
