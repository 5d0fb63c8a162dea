//! Forward convolution kernel
//!
//! Computes one output activation per (filter, row, column) coordinate by
//! sliding the filter window over the zero-padded input volume. This is
//! cross-correlation: filter taps are applied without spatial flipping, the
//! convention used by convolution layers generally.

use crate::config::ConvolutionConfig;
use crate::grid;
use crate::tensor::Tensor3;

/// Windowed multiply-accumulate for the layer's forward pass.
///
/// The configuration is bound once at construction and shared by every
/// coordinate evaluation. The kernel itself is total: any coordinate
/// produces a number, with window taps outside the input volume reading as
/// zero. Output positions beyond the "valid" extent are not rejected, they
/// simply accumulate fewer non-zero taps.
///
/// Filters carry one plane per filter (`filter_count` x `filter_height` x
/// `filter_width`); the plane is applied to every input channel. The bias
/// is selected per filter and added once per output element.
pub struct ForwardConvolution {
    config: ConvolutionConfig,
}

impl ForwardConvolution {
    /// Bind the configuration constants for this kernel.
    pub fn new(config: ConvolutionConfig) -> Self {
        Self { config }
    }

    /// The configuration this kernel was built with.
    pub fn config(&self) -> &ConvolutionConfig {
        &self.config
    }

    /// Contract output shape: `filter_count` x `output_height` x
    /// `output_width` under the stride/padding relation.
    pub fn output_shape(&self) -> (usize, usize, usize) {
        (
            self.config.filter_count,
            self.config.output_height(),
            self.config.output_width(),
        )
    }

    /// One output activation for the coordinate `(filter, y, x)`.
    ///
    /// The window origin is `(y*stride_y - padding_y, x*stride_x -
    /// padding_x)`; every tap of every input channel is multiplied by the
    /// filter weight at the same offset and summed, and the filter's bias
    /// is added. A bias slice shorter than the filter index contributes
    /// zero rather than failing.
    ///
    /// # Arguments
    ///
    /// * `filter` - Filter (output plane) index
    /// * `y` - Output row
    /// * `x` - Output column
    /// * `filters` - Filter weights, one plane per filter
    /// * `inputs` - Input activations, `input_depth` planes
    /// * `biases` - One offset per filter
    pub fn at(
        &self,
        filter: usize,
        y: usize,
        x: usize,
        filters: &Tensor3,
        inputs: &Tensor3,
        biases: &[f32],
    ) -> f32 {
        let c = &self.config;
        let origin_y = y as isize * c.stride_y as isize - c.padding_y as isize;
        let origin_x = x as isize * c.stride_x as isize - c.padding_x as isize;

        let mut sum = biases.get(filter).copied().unwrap_or(0.0);
        for channel in 0..c.input_depth {
            for j in 0..c.filter_height {
                let input_y = origin_y + j as isize;
                for i in 0..c.filter_width {
                    let input_x = origin_x + i as isize;
                    sum += inputs.read(channel, input_y, input_x)
                        * filters.read(filter, j as isize, i as isize);
                }
            }
        }
        sum
    }

    /// Evaluate the kernel over its contract output shape in parallel.
    pub fn run(&self, filters: &Tensor3, inputs: &Tensor3, biases: &[f32]) -> Tensor3 {
        let (depth, height, width) = self.output_shape();
        grid::par_dispatch(depth, height, width, |f, y, x| {
            self.at(f, y, x, filters, inputs, biases)
        })
    }
}
