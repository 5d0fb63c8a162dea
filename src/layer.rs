//! Convolution layer orchestration
//!
//! This module wraps the four compute kernels in a layer object that owns
//! the learned parameters and the gradient accumulators: filter weights
//! with Xavier initialization, per-filter biases, and the running filter
//! and bias gradients whose reset belongs to the caller's training-step
//! lifecycle. The layer adds no numeric semantics of its own; every number
//! it produces comes from a kernel.

use crate::config::ConvolutionConfig;
use crate::kernels::{BiasGradient, FilterGradient, ForwardConvolution, InputGradient};
use crate::tensor::Tensor3;
use crate::utils::SimpleRng;
use std::error::Error;

/// 2D convolution layer with learnable filters.
///
/// Holds one weight plane per filter (`filter_count` x `filter_height` x
/// `filter_width`), one bias per filter, and the two gradient
/// accumulators. Forward and backward passes dispatch the corresponding
/// kernels over their contract output shapes.
///
/// # Example
///
/// ```ignore
/// use conv_kernels::config::ConvolutionConfig;
/// use conv_kernels::layer::ConvolutionLayer;
/// use conv_kernels::utils::SimpleRng;
///
/// let mut rng = SimpleRng::new(42);
/// let layer = ConvolutionLayer::new(config, &mut rng)?;
/// let output = layer.forward(&inputs);
/// ```
pub struct ConvolutionLayer {
    config: ConvolutionConfig,
    filters: Tensor3,
    biases: Vec<f32>,
    filter_gradient: Tensor3,
    bias_gradient: Vec<f32>,
}

impl ConvolutionLayer {
    /// Create a layer with Xavier-initialized filters and zero biases.
    ///
    /// Weights are sampled from the uniform distribution [-limit, limit]
    /// where `limit = sqrt(6 / (fan_in + fan_out))`, with
    /// `fan_in = input_depth * filter_height * filter_width` and
    /// `fan_out = filter_count * filter_height * filter_width`.
    ///
    /// # Arguments
    ///
    /// * `config` - Kernel configuration; validated before any allocation
    /// * `rng` - Seeded generator for reproducible initialization
    ///
    /// # Returns
    ///
    /// The initialized layer, or the validation error for a degenerate
    /// configuration.
    pub fn new(config: ConvolutionConfig, rng: &mut SimpleRng) -> Result<Self, Box<dyn Error>> {
        config.validate()?;

        let tap_count = config.filter_height * config.filter_width;
        let fan_in = (config.input_depth * tap_count) as f32;
        let fan_out = (config.filter_count * tap_count) as f32;
        let limit = (6.0f32 / (fan_in + fan_out)).sqrt();

        let mut weights = vec![0.0f32; config.filter_count * tap_count];
        for value in &mut weights {
            *value = rng.gen_range_f32(-limit, limit);
        }
        let filters = Tensor3::from_raw(
            config.filter_count,
            config.filter_height,
            config.filter_width,
            weights,
        );

        Ok(Self {
            config,
            filters,
            biases: vec![0.0f32; config.filter_count],
            filter_gradient: Tensor3::zeros(
                config.filter_count,
                config.filter_height,
                config.filter_width,
            ),
            bias_gradient: vec![0.0f32; config.filter_count],
        })
    }

    /// Create a layer from explicit filter weights and biases.
    ///
    /// Useful for tests and for loading trained parameters. The filter
    /// tensor must match the configured filter grid and the bias vector
    /// must hold one value per filter.
    pub fn with_parameters(
        config: ConvolutionConfig,
        filters: Tensor3,
        biases: Vec<f32>,
    ) -> Result<Self, Box<dyn Error>> {
        config.validate()?;

        let expected = (
            config.filter_count,
            config.filter_height,
            config.filter_width,
        );
        if filters.shape() != expected {
            return Err(format!(
                "filter shape {:?} does not match configured grid {:?}",
                filters.shape(),
                expected
            )
            .into());
        }
        if biases.len() != config.filter_count {
            return Err(format!(
                "bias count {} does not match filter count {}",
                biases.len(),
                config.filter_count
            )
            .into());
        }

        Ok(Self {
            config,
            filters,
            biases,
            filter_gradient: Tensor3::zeros(
                config.filter_count,
                config.filter_height,
                config.filter_width,
            ),
            bias_gradient: vec![0.0f32; config.filter_count],
        })
    }

    /// The configuration this layer was built with.
    pub fn config(&self) -> &ConvolutionConfig {
        &self.config
    }

    /// Filter weights, one plane per filter.
    pub fn filters(&self) -> &Tensor3 {
        &self.filters
    }

    /// Per-filter biases.
    pub fn biases(&self) -> &[f32] {
        &self.biases
    }

    /// Running gradient with respect to the filter weights.
    pub fn filter_gradient(&self) -> &Tensor3 {
        &self.filter_gradient
    }

    /// Running gradient with respect to the biases.
    pub fn bias_gradient(&self) -> &[f32] {
        &self.bias_gradient
    }

    /// Output rows after convolution.
    pub fn output_height(&self) -> usize {
        self.config.output_height()
    }

    /// Output columns after convolution.
    pub fn output_width(&self) -> usize {
        self.config.output_width()
    }

    /// Total number of trainable parameters (weights plus biases).
    pub fn parameter_count(&self) -> usize {
        self.filters.as_slice().len() + self.biases.len()
    }

    /// Forward pass: compute output activations for the input volume.
    pub fn forward(&self, inputs: &Tensor3) -> Tensor3 {
        ForwardConvolution::new(self.config).run(&self.filters, inputs, &self.biases)
    }

    /// Backward pass: fold `deltas` into both gradient accumulators and
    /// return the gradient with respect to the inputs.
    ///
    /// `inputs` must be the same volume used in the corresponding forward
    /// pass, and `deltas` has the forward output's shape. Repeated calls
    /// keep accumulating until [`ConvolutionLayer::zero_gradients`].
    pub fn backward(&mut self, inputs: &Tensor3, deltas: &Tensor3) -> Tensor3 {
        let config = self.config.with_output_deltas();

        self.filter_gradient =
            FilterGradient::new(config).run(&self.filter_gradient, inputs, deltas);
        BiasGradient::new(config).accumulate(&mut self.bias_gradient, deltas);
        InputGradient::new(config).run(inputs, deltas)
    }

    /// Reset both gradient accumulators to zero.
    ///
    /// Called by the training loop after the accumulated gradients have
    /// been consumed by a parameter update.
    pub fn zero_gradients(&mut self) {
        self.filter_gradient = Tensor3::zeros(
            self.config.filter_count,
            self.config.filter_height,
            self.config.filter_width,
        );
        for value in self.bias_gradient.iter_mut() {
            *value = 0.0;
        }
    }
}
