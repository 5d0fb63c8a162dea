//! Convolution Compute Kernels
//!
//! This library provides the numeric core of a 2D convolutional layer: the
//! forward pass and the three backward-pass gradient computations, each
//! expressed as a pure per-coordinate kernel dispatched over a declared
//! output grid.
//!
//! # Modules
//!
//! - `kernels`: the four compute kernels (forward convolution, filter
//!   gradient, input gradient, bias gradient)
//! - `grid`: per-coordinate dispatch harness, sequential and parallel
//! - `tensor`: flat row-major tensor storage with zero-padded reads
//! - `config`: immutable kernel configuration and JSON loading
//! - `layer`: convolution layer object (parameters, initialization,
//!   gradient accumulator lifecycle)
//! - `utils`: shared utilities (seeded RNG)

pub mod config;
pub mod grid;
pub mod kernels;
pub mod layer;
pub mod tensor;
pub mod utils;
