//! Shared types and models for the Toko Back-Office Platform
//!
//! This crate contains types shared between the backend, the browser
//! presentation layer (via WASM), and other components of the system.

pub mod models;
pub mod reconciliation;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
