// Matrix Expansion
// Expands a matrix into the Cartesian product of its dimensions

use crate::matrix::models::{Combination, Matrix, Value};

/// Matrix expander producing combinations in nested-loop order
pub struct MatrixExpander;

impl MatrixExpander {
    /// Expand a matrix into every combination of its values.
    ///
    /// The first key is the outermost loop and the last key cycles fastest.
    /// A dimension without values yields no combinations; a matrix without
    /// dimensions yields a single empty combination.
    pub fn expand(matrix: &Matrix) -> Vec<Combination> {
        let dimensions: Vec<(&str, &[Value])> = matrix.dimensions().collect();
        if dimensions.iter().any(|(_, values)| values.is_empty()) {
            return Vec::new();
        }

        let mut combinations = Vec::with_capacity(matrix.combination_count());
        let mut indices = vec![0usize; dimensions.len()];

        loop {
            combinations.push(Self::combination_at(&dimensions, &indices));

            if !Self::advance(&dimensions, &mut indices) {
                break;
            }
        }

        tracing::trace!(
            dimensions = dimensions.len(),
            combinations = combinations.len(),
            "expanded matrix"
        );
        combinations
    }

    fn combination_at(dimensions: &[(&str, &[Value])], indices: &[usize]) -> Combination {
        dimensions
            .iter()
            .zip(indices)
            .map(|((key, values), &index)| (key.to_string(), values[index].clone()))
            .collect()
    }

    /// Step the index odometer, returning false once every position wrapped
    fn advance(dimensions: &[(&str, &[Value])], indices: &mut [usize]) -> bool {
        for position in (0..indices.len()).rev() {
            indices[position] += 1;
            if indices[position] < dimensions[position].1.len() {
                return true;
            }
            indices[position] = 0;
        }
        false
    }
}
