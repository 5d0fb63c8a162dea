//! Tensor storage shared by the convolution kernels
//!
//! This module provides a minimal three-dimensional tensor over f32 data,
//! stored flat in row-major order (depth, then row, then column), plus the
//! zero-padded read used by every kernel's windowing arithmetic.

/// Rectangular depth × height × width volume of f32 values.
///
/// Data is stored in a flat `Vec<f32>` with row-major index arithmetic:
/// `index = (depth * height + row) * width + column`. This matches the
/// layout used for layer activations and weights throughout the crate.
///
/// # Example
///
/// ```ignore
/// use conv_kernels::tensor::Tensor3;
///
/// let t = Tensor3::from_nested(vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]);
/// assert_eq!(t.get(0, 1, 0), 3.0);
/// assert_eq!(t.read(0, -1, 0), 0.0); // outside the volume reads as zero
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor3 {
    depth: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl Tensor3 {
    /// Create a zero-filled tensor of the given shape.
    pub fn zeros(depth: usize, height: usize, width: usize) -> Self {
        Self {
            depth,
            height,
            width,
            data: vec![0.0f32; depth * height * width],
        }
    }

    /// Wrap an existing flat buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal `depth * height * width`.
    pub fn from_raw(depth: usize, height: usize, width: usize, data: Vec<f32>) -> Self {
        assert_eq!(
            data.len(),
            depth * height * width,
            "buffer length mismatch for {}x{}x{} tensor",
            depth,
            height,
            width
        );
        Self {
            depth,
            height,
            width,
            data,
        }
    }

    /// Build a tensor from nested plane/row/column vectors.
    ///
    /// Convenient for writing small literal volumes in tests and examples.
    ///
    /// # Panics
    ///
    /// Panics if the nested vectors are ragged (rows or planes of unequal
    /// size).
    pub fn from_nested(planes: Vec<Vec<Vec<f32>>>) -> Self {
        let depth = planes.len();
        let height = planes.first().map_or(0, |p| p.len());
        let width = planes
            .first()
            .and_then(|p| p.first())
            .map_or(0, |r| r.len());

        let mut data = Vec::with_capacity(depth * height * width);
        for plane in &planes {
            assert_eq!(plane.len(), height, "ragged plane in nested tensor");
            for row in plane {
                assert_eq!(row.len(), width, "ragged row in nested tensor");
                data.extend_from_slice(row);
            }
        }

        Self {
            depth,
            height,
            width,
            data,
        }
    }

    /// Number of planes (channels).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Rows per plane.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Shape as a (depth, height, width) triple.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.depth, self.height, self.width)
    }

    fn index(&self, depth: usize, row: usize, col: usize) -> usize {
        (depth * self.height + row) * self.width + col
    }

    /// In-bounds element access.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside the tensor's shape.
    pub fn get(&self, depth: usize, row: usize, col: usize) -> f32 {
        assert!(
            depth < self.depth && row < self.height && col < self.width,
            "coordinate ({}, {}, {}) outside {}x{}x{} tensor",
            depth,
            row,
            col,
            self.depth,
            self.height,
            self.width
        );
        self.data[self.index(depth, row, col)]
    }

    /// In-bounds element update.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside the tensor's shape.
    pub fn set(&mut self, depth: usize, row: usize, col: usize, value: f32) {
        assert!(
            depth < self.depth && row < self.height && col < self.width,
            "coordinate ({}, {}, {}) outside {}x{}x{} tensor",
            depth,
            row,
            col,
            self.depth,
            self.height,
            self.width
        );
        let index = self.index(depth, row, col);
        self.data[index] = value;
    }

    /// Zero-padded read with signed spatial coordinates.
    ///
    /// Any coordinate outside the tensor's logical bounds reads as `0.0`.
    /// This is the windowing helper every kernel relies on: taps that fall
    /// in the implicit zero border contribute nothing to the accumulation,
    /// and no read is ever an error.
    pub fn read(&self, depth: usize, row: isize, col: isize) -> f32 {
        if depth >= self.depth
            || row < 0
            || col < 0
            || row >= self.height as isize
            || col >= self.width as isize
        {
            return 0.0;
        }
        self.data[self.index(depth, row as usize, col as usize)]
    }

    /// Borrow the flat row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_nested_layout() {
        let t = Tensor3::from_nested(vec![
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![5.0, 6.0], vec![7.0, 8.0]],
        ]);

        assert_eq!(t.shape(), (2, 2, 2));
        assert_eq!(t.get(0, 0, 1), 2.0);
        assert_eq!(t.get(1, 1, 0), 7.0);
        assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_read_inside_bounds_matches_get() {
        let t = Tensor3::from_nested(vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]);

        assert_eq!(t.read(0, 0, 0), t.get(0, 0, 0));
        assert_eq!(t.read(0, 1, 1), t.get(0, 1, 1));
    }

    #[test]
    fn test_read_outside_bounds_is_zero() {
        let t = Tensor3::from_nested(vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]);

        assert_eq!(t.read(0, -1, 0), 0.0);
        assert_eq!(t.read(0, 0, -1), 0.0);
        assert_eq!(t.read(0, 2, 0), 0.0);
        assert_eq!(t.read(0, 0, 2), 0.0);
        assert_eq!(t.read(1, 0, 0), 0.0);
    }

    #[test]
    fn test_set_then_get() {
        let mut t = Tensor3::zeros(1, 2, 2);
        t.set(0, 1, 0, 9.5);

        assert_eq!(t.get(0, 1, 0), 9.5);
        assert_eq!(t.get(0, 0, 0), 0.0);
    }

    #[test]
    #[should_panic(expected = "buffer length mismatch")]
    fn test_from_raw_rejects_wrong_length() {
        Tensor3::from_raw(1, 2, 2, vec![0.0; 3]);
    }

    #[test]
    fn test_empty_tensor() {
        let t = Tensor3::zeros(0, 3, 3);
        assert_eq!(t.shape(), (0, 3, 3));
        assert_eq!(t.read(0, 0, 0), 0.0);
    }
}
