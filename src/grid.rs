//! Per-coordinate kernel dispatch
//!
//! The kernels in this crate are pure functions from an output coordinate
//! to one scalar. This module is the harness that evaluates such a function
//! once for every coordinate of a declared output shape, either on the
//! current thread or spread across a thread pool. Coordinate evaluations
//! are mutually independent, so both drivers produce identical results.
//!
//! The declared shape is an input, not something derived from the kernel:
//! callers may declare any grid and the kernel is invoked for exactly those
//! coordinates.

use crate::tensor::Tensor3;
use rayon::prelude::*;

/// Evaluate `kernel(depth, row, col)` for every coordinate of the declared
/// shape, single-threaded, in row-major order.
pub fn dispatch<K>(depth: usize, height: usize, width: usize, kernel: K) -> Tensor3
where
    K: Fn(usize, usize, usize) -> f32,
{
    let mut data = Vec::with_capacity(depth * height * width);
    for d in 0..depth {
        for y in 0..height {
            for x in 0..width {
                data.push(kernel(d, y, x));
            }
        }
    }
    Tensor3::from_raw(depth, height, width, data)
}

/// Evaluate `kernel(depth, row, col)` for every coordinate of the declared
/// shape with rows distributed over the rayon thread pool.
///
/// Produces the same values as [`dispatch`]: no coordinate's evaluation
/// reads anything another coordinate writes.
pub fn par_dispatch<K>(depth: usize, height: usize, width: usize, kernel: K) -> Tensor3
where
    K: Fn(usize, usize, usize) -> f32 + Sync,
{
    if depth == 0 || height == 0 || width == 0 {
        return Tensor3::zeros(depth, height, width);
    }

    let mut data = vec![0.0f32; depth * height * width];
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(row_index, row)| {
            let d = row_index / height;
            let y = row_index % height;
            for (x, value) in row.iter_mut().enumerate() {
                *value = kernel(d, y, x);
            }
        });
    Tensor3::from_raw(depth, height, width, data)
}
