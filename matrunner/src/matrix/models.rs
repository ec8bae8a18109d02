// Matrix Models
// Ordered matrices, combinations and the declarative matrix definition

use crate::matrix::expander::MatrixExpander;
use crate::matrix::filter;

use serde_json::Map;

/// Opaque argument value. Values are only ever compared by equality.
pub use serde_json::Value;

/// One concrete assignment of a single value to each parameter name.
///
/// Keys keep their insertion order, so a combination lists matrix keys first
/// and keys merged in by include specs after them.
pub type Combination = Map<String, Value>;

/// A partial combination used to merge into or remove combinations
pub type FilterSpec = Combination;

/// Ordered mapping from parameter name to its candidate values.
///
/// Key order is the order in which keys were first inserted and drives the
/// iteration order of the Cartesian expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    dimensions: Vec<(String, Vec<Value>)>,
}

impl Matrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension, replacing the values of an existing key in place
    pub fn with<V>(mut self, key: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Value>,
    {
        self.insert(key, values.into_iter().map(Into::into).collect());
        self
    }

    /// Insert a dimension. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<Value>) {
        let key = key.into();
        match self.dimensions.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = values,
            None => self.dimensions.push((key, values)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.dimensions
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate dimensions in key order
    pub fn dimensions(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.dimensions
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|(name, _)| name.as_str())
    }

    /// Number of dimensions (keys)
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Number of combinations the matrix expands to, saturating at `usize::MAX`
    pub fn combination_count(&self) -> usize {
        self.dimensions
            .iter()
            .try_fold(1usize, |acc, (_, values)| acc.checked_mul(values.len()))
            .unwrap_or(usize::MAX)
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for Matrix
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<V>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Matrix::new(), |matrix, (key, values)| matrix.with(key, values))
    }
}

/// Declarative input of a matrix run: the base matrix plus optional
/// include and exclude matrices.
///
/// Include and exclude matrices are expanded with the same Cartesian
/// expansion as the base matrix; every resulting combination becomes one
/// filter spec.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixDefinition {
    pub matrix: Matrix,
    pub include: Option<Matrix>,
    pub exclude: Option<Matrix>,
}

impl MatrixDefinition {
    pub fn new(matrix: Matrix) -> Self {
        Self {
            matrix,
            include: None,
            exclude: None,
        }
    }

    pub fn with_include(mut self, include: Matrix) -> Self {
        self.include = Some(include);
        self
    }

    pub fn with_exclude(mut self, exclude: Matrix) -> Self {
        self.exclude = Some(exclude);
        self
    }

    /// Include filter specs in application order
    pub fn include_specs(&self) -> Vec<FilterSpec> {
        self.include
            .as_ref()
            .map(MatrixExpander::expand)
            .unwrap_or_default()
    }

    /// Exclude filter specs in application order
    pub fn exclude_specs(&self) -> Vec<FilterSpec> {
        self.exclude
            .as_ref()
            .map(MatrixExpander::expand)
            .unwrap_or_default()
    }

    /// Expand the matrix, then fold every include spec and every exclude spec
    /// over the result, in that order.
    pub fn combinations(&self) -> Vec<Combination> {
        let expanded = MatrixExpander::expand(&self.matrix);
        let expanded_count = expanded.len();

        let included = filter::include_all(expanded, &self.include_specs());
        let combinations = filter::exclude_all(included, &self.exclude_specs());

        tracing::debug!(
            expanded = expanded_count,
            remaining = combinations.len(),
            "built matrix combinations"
        );
        combinations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn combination(value: Value) -> Combination {
        value.as_object().cloned().unwrap()
    }

    fn sample_matrix() -> Matrix {
        Matrix::new()
            .with("a", [1, 2])
            .with("b", [3, 4])
            .with("c", [5, 6])
    }

    #[test]
    fn test_matrix_preserves_key_order() {
        let matrix = Matrix::new().with("zeta", [1]).with("alpha", [2]);
        let keys: Vec<_> = matrix.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_matrix_insert_replaces_in_place() {
        let matrix = sample_matrix().with("a", [9]);
        let keys: Vec<_> = matrix.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(matrix.get("a"), Some(&[json!(9)][..]));
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_combination_count() {
        assert_eq!(sample_matrix().combination_count(), 8);
        assert_eq!(Matrix::new().combination_count(), 1);
        assert_eq!(
            sample_matrix()
                .with("empty", Vec::<Value>::new())
                .combination_count(),
            0
        );
    }

    #[test]
    fn test_matrix_from_iter() {
        let matrix: Matrix = vec![("os", vec!["linux", "macos"]), ("arch", vec!["x64"])]
            .into_iter()
            .collect();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.get("os"), Some(&[json!("linux"), json!("macos")][..]));
    }

    #[test]
    fn test_definition_without_filters() {
        let definition = MatrixDefinition::new(sample_matrix());
        assert!(definition.include_specs().is_empty());
        assert!(definition.exclude_specs().is_empty());
        assert_eq!(definition.combinations().len(), 8);
    }

    #[test]
    fn test_definition_include_then_exclude() {
        let definition = MatrixDefinition::new(sample_matrix())
            .with_include(Matrix::new().with("a", [1]).with("d", [7]))
            .with_exclude(Matrix::new().with("d", [7]).with("c", [6]));

        let combinations = definition.combinations();

        assert_eq!(combinations.len(), 6);
        assert_eq!(
            combinations[0],
            combination(json!({"a": 1, "b": 3, "c": 5, "d": 7}))
        );
        assert_eq!(
            combinations[1],
            combination(json!({"a": 1, "b": 4, "c": 5, "d": 7}))
        );
        assert!(combinations
            .iter()
            .filter(|c| c["a"] == json!(2))
            .all(|c| !c.contains_key("d")));
    }

    #[test]
    fn test_definition_filter_matrices_expand_to_specs() {
        let definition = MatrixDefinition::new(sample_matrix())
            .with_exclude(Matrix::new().with("a", [1, 2]).with("c", [6]));

        assert_eq!(
            definition.exclude_specs(),
            vec![
                combination(json!({"a": 1, "c": 6})),
                combination(json!({"a": 2, "c": 6})),
            ]
        );

        let combinations = definition.combinations();
        assert_eq!(combinations.len(), 4);
        assert!(combinations.iter().all(|c| c["c"] == json!(5)));
    }
}
