//! Filter-weight gradient kernel
//!
//! Computes the backward-pass gradient for every filter tap: each tap's
//! gradient is the correlation between the upstream delta map and the input
//! shifted by the tap's offset, summed over every delta position. The
//! previously accumulated gradient is carried through, so repeated calls
//! build a running sum the caller resets between parameter updates.

use crate::config::ConvolutionConfig;
use crate::grid;
use crate::tensor::Tensor3;

/// Gradient of the loss with respect to the filter weights.
///
/// Output shape equals the filter grid: one value per `(filter, row,
/// column)` tap. The first operand is the running gradient accumulator
/// with that same shape; its values are added through to the result, and
/// the kernel itself stays pure (it reads the accumulator and returns a
/// fresh tensor).
pub struct FilterGradient {
    config: ConvolutionConfig,
}

impl FilterGradient {
    /// Bind the configuration constants for this kernel.
    pub fn new(config: ConvolutionConfig) -> Self {
        Self { config }
    }

    /// The configuration this kernel was built with.
    pub fn config(&self) -> &ConvolutionConfig {
        &self.config
    }

    /// Contract output shape: the filter grid itself.
    pub fn output_shape(&self) -> (usize, usize, usize) {
        (
            self.config.filter_count,
            self.config.filter_height,
            self.config.filter_width,
        )
    }

    /// Accumulated gradient for the filter tap `(filter, row, col)`.
    ///
    /// Every delta position `(dy, dx)` of the filter's own delta plane
    /// contributes `inputs[channel][dy*stride_y - padding_y - row]
    /// [dx*stride_x - padding_x - col] * deltas[filter][dy][dx]`, summed
    /// over all input channels, with out-of-bounds input reads resolving
    /// to zero. The accumulator's value for the same tap is added through.
    ///
    /// # Arguments
    ///
    /// * `filter` - Filter index
    /// * `row` - Filter tap row
    /// * `col` - Filter tap column
    /// * `accumulator` - Running gradient, shaped like the filter grid
    /// * `inputs` - Input activations from the forward pass
    /// * `deltas` - Upstream gradient map
    pub fn at(
        &self,
        filter: usize,
        row: usize,
        col: usize,
        accumulator: &Tensor3,
        inputs: &Tensor3,
        deltas: &Tensor3,
    ) -> f32 {
        let c = &self.config;

        let mut sum = accumulator.read(filter, row as isize, col as isize);
        for channel in 0..c.input_depth {
            for dy in 0..c.deltas_height {
                let input_y =
                    dy as isize * c.stride_y as isize - c.padding_y as isize - row as isize;
                for dx in 0..c.deltas_width {
                    let input_x =
                        dx as isize * c.stride_x as isize - c.padding_x as isize - col as isize;
                    sum += inputs.read(channel, input_y, input_x)
                        * deltas.read(filter, dy as isize, dx as isize);
                }
            }
        }
        sum
    }

    /// Evaluate the kernel over the filter grid in parallel.
    pub fn run(&self, accumulator: &Tensor3, inputs: &Tensor3, deltas: &Tensor3) -> Tensor3 {
        let (depth, height, width) = self.output_shape();
        grid::par_dispatch(depth, height, width, |f, j, i| {
            self.at(f, j, i, accumulator, inputs, deltas)
        })
    }
}
