//! Configuration record for the convolution kernels
//!
//! This module provides the immutable set of scalar constants every kernel
//! is constructed with: strides, padding, and the filter/input/delta
//! extents. The record is bound into a kernel once at construction and
//! reused for every coordinate evaluation, so no shape arithmetic is
//! re-derived inside the hot loops. Configurations can also be parsed from
//! JSON files for config-driven layer construction.

use serde::Deserialize;
use std::error::Error;
use std::fs;

fn default_stride() -> usize {
    1
}

/// Scalar constants shared by the convolution kernels.
///
/// All fields are plain extents and offsets; the struct is `Copy` and is
/// captured by value in each kernel. Strides default to 1 and padding to 0
/// when omitted from a JSON configuration. The `deltas_*` extents describe
/// the upstream gradient map and are only consulted by the backward
/// kernels.
///
/// Callers are responsible for supplying constants consistent with the
/// tensors they pass in: the kernels never validate shapes and an
/// inconsistent configuration produces wrong numbers rather than an error.
/// Use [`ConvolutionConfig::validate`] at the orchestration boundary to
/// catch degenerate setups before entering the per-coordinate loops.
///
/// # Example
///
/// ```json
/// {
///   "filter_width": 3,
///   "filter_height": 3,
///   "filter_count": 8,
///   "input_width": 28,
///   "input_height": 28,
///   "input_depth": 1,
///   "padding_x": 1,
///   "padding_y": 1
/// }
/// ```
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConvolutionConfig {
    /// Horizontal step between successive output columns, in input elements.
    #[serde(default = "default_stride")]
    pub stride_x: usize,

    /// Vertical step between successive output rows, in input elements.
    #[serde(default = "default_stride")]
    pub stride_y: usize,

    /// Implicit zero columns assumed on the left and right of the input.
    #[serde(default)]
    pub padding_x: usize,

    /// Implicit zero rows assumed above and below the input.
    #[serde(default)]
    pub padding_y: usize,

    /// Columns per filter plane.
    pub filter_width: usize,

    /// Rows per filter plane.
    pub filter_height: usize,

    /// Number of filters, which is also the output depth.
    pub filter_count: usize,

    /// Columns per input plane.
    pub input_width: usize,

    /// Rows per input plane.
    pub input_height: usize,

    /// Number of input planes (channels).
    pub input_depth: usize,

    /// Columns in the upstream delta map (backward kernels only).
    #[serde(default)]
    pub deltas_width: usize,

    /// Rows in the upstream delta map (backward kernels only).
    #[serde(default)]
    pub deltas_height: usize,

    /// Planes in the upstream delta map (backward kernels only).
    #[serde(default)]
    pub deltas_depth: usize,
}

impl ConvolutionConfig {
    /// Output rows under the standard windowing relation.
    ///
    /// Calculated as `(input_height + 2*padding_y - filter_height) / stride_y + 1`.
    pub fn output_height(&self) -> usize {
        ((self.input_height as isize + 2 * self.padding_y as isize
            - self.filter_height as isize)
            / self.stride_y as isize
            + 1) as usize
    }

    /// Output columns under the standard windowing relation.
    ///
    /// Calculated as `(input_width + 2*padding_x - filter_width) / stride_x + 1`.
    pub fn output_width(&self) -> usize {
        ((self.input_width as isize + 2 * self.padding_x as isize - self.filter_width as isize)
            / self.stride_x as isize
            + 1) as usize
    }

    /// Copy of this configuration with the delta extents set to the
    /// forward output shape.
    ///
    /// The upstream gradient map always has the shape of the forward
    /// output, so backward orchestration can derive the `deltas_*`
    /// constants instead of asking the caller to repeat them.
    pub fn with_output_deltas(&self) -> Self {
        Self {
            deltas_width: self.output_width(),
            deltas_height: self.output_height(),
            deltas_depth: self.filter_count,
            ..*self
        }
    }

    /// Check the shape arithmetic a caller is responsible for.
    ///
    /// Returns an error for configurations that cannot describe a real
    /// layer: zero-sized filter grid, zero strides, empty input volume, or
    /// an input too small for the filter under the declared padding. This
    /// belongs at the orchestration boundary; the kernels themselves stay
    /// total and unchecked.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.filter_width == 0 || self.filter_height == 0 {
            return Err("filter dimensions must be non-zero".into());
        }
        if self.filter_count == 0 {
            return Err("filter count must be non-zero".into());
        }
        if self.stride_x == 0 || self.stride_y == 0 {
            return Err("strides must be non-zero".into());
        }
        if self.input_width == 0 || self.input_height == 0 || self.input_depth == 0 {
            return Err("input dimensions must be non-zero".into());
        }
        let span_x = self.input_width as isize + 2 * self.padding_x as isize;
        let span_y = self.input_height as isize + 2 * self.padding_y as isize;
        if span_x < self.filter_width as isize || span_y < self.filter_height as isize {
            return Err("padded input is smaller than the filter".into());
        }
        Ok(())
    }
}

/// Loads a kernel configuration from a JSON file.
///
/// Reads the file at `path` and deserializes its JSON contents into a
/// `ConvolutionConfig`.
///
/// # Returns
///
/// `Ok(ConvolutionConfig)` on success, or an error if the file cannot be
/// read or the JSON is invalid.
///
/// # Examples
///
/// ```no_run
/// use conv_kernels::config::load_config;
///
/// let config = load_config("layer.json").expect("failed to load config");
/// assert!(config.filter_count > 0);
/// ```
pub fn load_config(path: &str) -> Result<ConvolutionConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config: ConvolutionConfig = serde_json::from_str(&contents)?;
    Ok(config)
}
