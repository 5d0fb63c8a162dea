// Tests for the forward convolution: output dimensions, windowing
// arithmetic, zero-padding behavior, and dispatch equivalence.

use approx::assert_relative_eq;
use conv_kernels::config::ConvolutionConfig;
use conv_kernels::grid;
use conv_kernels::kernels::ForwardConvolution;
use conv_kernels::tensor::Tensor3;
use conv_kernels::utils::SimpleRng;

fn config(
    input: (usize, usize, usize),
    filter: (usize, usize, usize),
    stride: usize,
    padding: usize,
) -> ConvolutionConfig {
    ConvolutionConfig {
        stride_x: stride,
        stride_y: stride,
        padding_x: padding,
        padding_y: padding,
        filter_width: filter.2,
        filter_height: filter.1,
        filter_count: filter.0,
        input_width: input.2,
        input_height: input.1,
        input_depth: input.0,
        deltas_width: 0,
        deltas_height: 0,
        deltas_depth: 0,
    }
}

// Fill a tensor with reproducible pseudo-random values.
fn random_tensor(depth: usize, height: usize, width: usize, rng: &mut SimpleRng) -> Tensor3 {
    let data: Vec<f32> = (0..depth * height * width)
        .map(|_| rng.gen_range_f32(-1.0, 1.0))
        .collect();
    Tensor3::from_raw(depth, height, width, data)
}

#[test]
fn test_output_shape_follows_stride_padding_relation() {
    let kernel = ForwardConvolution::new(config((1, 28, 28), (8, 3, 3), 1, 0));
    assert_eq!(kernel.output_shape(), (8, 26, 26));

    let kernel = ForwardConvolution::new(config((1, 28, 28), (8, 3, 3), 1, 1));
    assert_eq!(kernel.output_shape(), (8, 28, 28));

    let kernel = ForwardConvolution::new(config((3, 32, 32), (16, 5, 5), 2, 2));
    // (32 + 4 - 5) / 2 + 1 = 16
    assert_eq!(kernel.output_shape(), (16, 16, 16));
}

#[test]
fn test_windows_over_padding_read_zeros() {
    // A 2x2 box filter with padding 1: border windows only cover the
    // input corner cells, so every out-of-bounds tap contributes nothing.
    let inputs = Tensor3::from_nested(vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]);
    let filters = Tensor3::from_nested(vec![vec![vec![1.0, 1.0], vec![1.0, 1.0]]]);
    let biases = vec![0.0];

    let kernel = ForwardConvolution::new(config((1, 2, 2), (1, 2, 2), 1, 1));
    let output = kernel.run(&filters, &inputs, &biases);

    let expected = Tensor3::from_nested(vec![vec![
        vec![1.0, 3.0, 2.0],
        vec![4.0, 10.0, 6.0],
        vec![3.0, 7.0, 4.0],
    ]]);
    assert_eq!(output, expected);
}

#[test]
fn test_declared_grid_beyond_valid_extent_zero_fills() {
    // Declaring a 3x3 grid for a configuration whose relation yields 1x1:
    // positions past the valid extent still produce numbers, with taps
    // that slid off the input reading as zero.
    let inputs = Tensor3::from_nested(vec![vec![
        vec![1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0],
        vec![7.0, 8.0, 9.0],
    ]]);
    let filters = inputs.clone();
    let biases = vec![1.0, 2.0, 3.0];

    let kernel = ForwardConvolution::new(config((1, 3, 3), (1, 3, 3), 1, 0));
    assert_eq!(kernel.output_shape(), (1, 1, 1));

    let declared = grid::dispatch(1, 3, 3, |f, y, x| {
        kernel.at(f, y, x, &filters, &inputs, &biases)
    });

    let expected = Tensor3::from_nested(vec![vec![
        vec![286.0, 187.0, 91.0],
        vec![155.0, 95.0, 43.0],
        vec![51.0, 27.0, 10.0],
    ]]);
    assert_eq!(declared, expected);
}

#[test]
fn test_parallel_dispatch_matches_sequential() {
    let mut rng = SimpleRng::new(7);
    let kernel = ForwardConvolution::new(config((3, 9, 9), (4, 3, 3), 2, 1));

    let inputs = random_tensor(3, 9, 9, &mut rng);
    let filters = random_tensor(4, 3, 3, &mut rng);
    let biases: Vec<f32> = (0..4).map(|_| rng.gen_range_f32(-1.0, 1.0)).collect();

    let (depth, height, width) = kernel.output_shape();
    let sequential = grid::dispatch(depth, height, width, |f, y, x| {
        kernel.at(f, y, x, &filters, &inputs, &biases)
    });
    let parallel = kernel.run(&filters, &inputs, &biases);

    assert_eq!(sequential, parallel);
}

#[test]
fn test_multiple_filters_produce_independent_planes() {
    let inputs = Tensor3::from_nested(vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]);
    let filters = Tensor3::from_nested(vec![
        vec![vec![1.0, 0.0], vec![0.0, 0.0]],
        vec![vec![0.0, 0.0], vec![0.0, 1.0]],
    ]);
    let biases = vec![10.0, 20.0];

    let kernel = ForwardConvolution::new(config((1, 2, 2), (2, 2, 2), 1, 0));
    let output = kernel.run(&filters, &inputs, &biases);

    assert_eq!(output.shape(), (2, 1, 1));
    // Filter 0 picks the top-left tap, filter 1 the bottom-right one
    assert_relative_eq!(output.get(0, 0, 0), 11.0);
    assert_relative_eq!(output.get(1, 0, 0), 24.0);
}

#[test]
fn test_sum_is_linear_in_the_input() {
    // Doubling the input doubles every pre-bias activation.
    let mut rng = SimpleRng::new(99);
    let kernel = ForwardConvolution::new(config((2, 5, 5), (3, 3, 3), 1, 1));

    let inputs = random_tensor(2, 5, 5, &mut rng);
    let doubled = Tensor3::from_raw(
        2,
        5,
        5,
        inputs.as_slice().iter().map(|v| v * 2.0).collect(),
    );
    let filters = random_tensor(3, 3, 3, &mut rng);
    let biases = vec![0.0; 3];

    let base = kernel.run(&filters, &inputs, &biases);
    let scaled = kernel.run(&filters, &doubled, &biases);

    for (b, s) in base.as_slice().iter().zip(scaled.as_slice()) {
        assert_relative_eq!(*s, b * 2.0, epsilon = 1e-5);
    }
}
