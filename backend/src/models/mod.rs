//! Database models for the Toko Back-Office Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
