//! Shared utilities
//!
//! This module provides common utilities used across the crate, currently
//! the seeded random number generator for reproducible filter
//! initialization.

pub mod rng;

pub use rng::SimpleRng;
