//! Compute kernels for the convolution layer
//!
//! Four independent, stateless kernels cover the layer's numeric work:
//!
//! - [`ForwardConvolution`]: inputs x filters x biases -> output activations
//! - [`FilterGradient`]: inputs x deltas -> gradient w.r.t. filter weights
//! - [`InputGradient`]: inputs x deltas -> gradient w.r.t. layer inputs
//! - [`BiasGradient`]: deltas -> per-filter bias gradient, accumulated in place
//!
//! Each kernel is a pure per-coordinate function plus a convenience driver
//! that evaluates it over its contract output shape via [`crate::grid`].
//! Only `BiasGradient` mutates anything, and only the caller-owned
//! accumulator it is handed.

pub mod bias_grad;
pub mod filter_grad;
pub mod forward;
pub mod input_grad;

pub use bias_grad::BiasGradient;
pub use filter_grad::FilterGradient;
pub use forward::ForwardConvolution;
pub use input_grad::InputGradient;
