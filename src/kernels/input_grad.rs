//! Input gradient kernel
//!
//! Backpropagates the upstream delta map through the convolution window:
//! each input position accumulates a contribution from every delta position
//! whose receptive field covered it during the forward pass. The offset
//! relation mirrors the filter-gradient kernel with the roles of the output
//! coordinate and the delta coordinate exchanged.

use crate::config::ConvolutionConfig;
use crate::grid;
use crate::tensor::Tensor3;

/// Gradient of the loss with respect to the layer inputs.
///
/// Output shape equals the input volume: one value per `(channel, row,
/// column)` input coordinate. The inputs tensor supplies the weight-like
/// factor for each tap, indexed by the offset between the input position
/// and the delta position's window origin, with zero-padding applying to
/// any offset outside its bounds.
pub struct InputGradient {
    config: ConvolutionConfig,
}

impl InputGradient {
    /// Bind the configuration constants for this kernel.
    pub fn new(config: ConvolutionConfig) -> Self {
        Self { config }
    }

    /// The configuration this kernel was built with.
    pub fn config(&self) -> &ConvolutionConfig {
        &self.config
    }

    /// Contract output shape: the input volume itself.
    pub fn output_shape(&self) -> (usize, usize, usize) {
        (
            self.config.input_depth,
            self.config.input_height,
            self.config.input_width,
        )
    }

    /// Accumulated gradient for the input coordinate `(channel, y, x)`.
    ///
    /// Every delta position `(dy, dx)` of every delta plane contributes
    /// `inputs[channel][y + padding_y - dy*stride_y][x + padding_x -
    /// dx*stride_x] * deltas[plane][dy][dx]`, with out-of-bounds reads on
    /// either tensor resolving to zero.
    ///
    /// # Arguments
    ///
    /// * `channel` - Input plane index
    /// * `y` - Input row
    /// * `x` - Input column
    /// * `inputs` - Input activations from the forward pass
    /// * `deltas` - Upstream gradient map
    pub fn at(
        &self,
        channel: usize,
        y: usize,
        x: usize,
        inputs: &Tensor3,
        deltas: &Tensor3,
    ) -> f32 {
        let c = &self.config;

        let mut sum = 0.0f32;
        for plane in 0..c.deltas_depth {
            for dy in 0..c.deltas_height {
                let tap_y =
                    y as isize + c.padding_y as isize - dy as isize * c.stride_y as isize;
                for dx in 0..c.deltas_width {
                    let tap_x =
                        x as isize + c.padding_x as isize - dx as isize * c.stride_x as isize;
                    sum += inputs.read(channel, tap_y, tap_x)
                        * deltas.read(plane, dy as isize, dx as isize);
                }
            }
        }
        sum
    }

    /// Evaluate the kernel over the input volume in parallel.
    pub fn run(&self, inputs: &Tensor3, deltas: &Tensor3) -> Tensor3 {
        let (depth, height, width) = self.output_shape();
        grid::par_dispatch(depth, height, width, |d, y, x| {
            self.at(d, y, x, inputs, deltas)
        })
    }
}
