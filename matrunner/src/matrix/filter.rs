// Combination Filters
// Include and exclude specs folded over an expanded combination list

use crate::matrix::models::{Combination, FilterSpec};

/// True when no key of `spec` conflicts with a value already in `combination`
fn is_compatible(combination: &Combination, spec: &FilterSpec) -> bool {
    spec.iter().all(|(key, value)| {
        combination
            .get(key)
            .map_or(true, |existing| existing == value)
    })
}

/// True when every entry of `spec` is present in `combination`
fn is_match(combination: &Combination, spec: &FilterSpec) -> bool {
    spec.iter()
        .all(|(key, value)| combination.get(key) == Some(value))
}

/// Merge an include spec into every compatible combination.
///
/// A combination is compatible when each key of the spec is either missing
/// from it or already holds the same value. Incompatible combinations are
/// left untouched and no combination is ever added or removed. An empty spec
/// is a no-op.
pub fn apply_include(mut combinations: Vec<Combination>, spec: &FilterSpec) -> Vec<Combination> {
    if spec.is_empty() {
        return combinations;
    }

    for combination in combinations
        .iter_mut()
        .filter(|combination| is_compatible(combination, spec))
    {
        for (key, value) in spec {
            combination.insert(key.clone(), value.clone());
        }
    }
    combinations
}

/// Drop every combination containing all entries of an exclude spec.
///
/// Surviving combinations keep their relative order. An empty spec is a no-op.
pub fn apply_exclude(mut combinations: Vec<Combination>, spec: &FilterSpec) -> Vec<Combination> {
    if spec.is_empty() {
        return combinations;
    }

    combinations.retain(|combination| !is_match(combination, spec));
    combinations
}

/// Apply include specs one at a time, each seeing the result of the previous one
pub fn include_all(combinations: Vec<Combination>, specs: &[FilterSpec]) -> Vec<Combination> {
    specs.iter().fold(combinations, apply_include)
}

/// Apply exclude specs one at a time, each seeing the result of the previous one
pub fn exclude_all(combinations: Vec<Combination>, specs: &[FilterSpec]) -> Vec<Combination> {
    let before = combinations.len();
    let remaining = specs.iter().fold(combinations, apply_exclude);
    tracing::trace!(
        specs = specs.len(),
        excluded = before - remaining.len(),
        "applied exclude specs"
    );
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::models::Value;
    use serde_json::json;

    fn combination(value: Value) -> Combination {
        value.as_object().cloned().unwrap()
    }

    fn combinations(values: Vec<Value>) -> Vec<Combination> {
        values.into_iter().map(combination).collect()
    }

    fn args_list() -> Vec<Combination> {
        combinations(vec![
            json!({"a": 1, "b": 3, "c": 5}),
            json!({"a": 1, "b": 3, "c": 6}),
            json!({"a": 1, "b": 4, "c": 5}),
            json!({"a": 1, "b": 4, "c": 6}),
            json!({"a": 2, "b": 3, "c": 5}),
            json!({"a": 2, "b": 3, "c": 6}),
            json!({"a": 2, "b": 4, "c": 5}),
            json!({"a": 2, "b": 4, "c": 6}),
        ])
    }

    #[test]
    fn test_filter_include_single_spec() {
        let include = vec![combination(json!({"a": 1, "b": 3, "d": 7}))];
        let target = combinations(vec![
            json!({"a": 1, "b": 3, "c": 5, "d": 7}),
            json!({"a": 1, "b": 3, "c": 6, "d": 7}),
            json!({"a": 1, "b": 4, "c": 5}),
            json!({"a": 1, "b": 4, "c": 6}),
            json!({"a": 2, "b": 3, "c": 5}),
            json!({"a": 2, "b": 3, "c": 6}),
            json!({"a": 2, "b": 4, "c": 5}),
            json!({"a": 2, "b": 4, "c": 6}),
        ]);

        assert_eq!(apply_include(args_list(), &include[0]), target);
        assert_eq!(include_all(args_list(), &include), target);
    }

    #[test]
    fn test_filter_include_sequence() {
        let include = vec![
            combination(json!({"a": 1, "b": 3, "d": 7})),
            combination(json!({"b": 4, "z": 0})),
        ];
        let target = combinations(vec![
            json!({"a": 1, "b": 3, "c": 5, "d": 7}),
            json!({"a": 1, "b": 3, "c": 6, "d": 7}),
            json!({"a": 1, "b": 4, "c": 5, "z": 0}),
            json!({"a": 1, "b": 4, "c": 6, "z": 0}),
            json!({"a": 2, "b": 3, "c": 5}),
            json!({"a": 2, "b": 3, "c": 6}),
            json!({"a": 2, "b": 4, "c": 5, "z": 0}),
            json!({"a": 2, "b": 4, "c": 6, "z": 0}),
        ]);

        assert_eq!(include_all(args_list(), &include), target);
    }

    #[test]
    fn test_filter_include_never_adds_combinations() {
        let spec = combination(json!({"a": 3, "d": 1}));
        let result = apply_include(args_list(), &spec);
        assert_eq!(result, args_list());
    }

    #[test]
    fn test_filter_include_disjoint_keys() {
        let spec = combination(json!({"os": "linux"}));
        let result = apply_include(args_list(), &spec);

        assert_eq!(result.len(), 8);
        for (merged, original) in result.iter().zip(args_list()) {
            assert_eq!(merged["os"], json!("linux"));
            for (key, value) in &original {
                assert_eq!(&merged[key.as_str()], value);
            }
        }
    }

    #[test]
    fn test_filter_include_checks_previously_added_keys() {
        let include = vec![
            combination(json!({"a": 1, "d": 7})),
            combination(json!({"d": 8})),
        ];
        let result = include_all(args_list(), &include);

        assert!(result[..4].iter().all(|c| c["d"] == json!(7)));
        assert!(result[4..].iter().all(|c| c["d"] == json!(8)));
    }

    #[test]
    fn test_filter_include_appends_new_keys_last() {
        let spec = combination(json!({"d": 7}));
        let result = apply_include(args_list(), &spec);
        let keys: Vec<_> = result[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_filter_exclude_requires_full_match() {
        let exclude = vec![combination(json!({"a": 1, "b": 3, "d": 5}))];

        assert_eq!(apply_exclude(args_list(), &exclude[0]), args_list());
        assert_eq!(exclude_all(args_list(), &exclude), args_list());
    }

    #[test]
    fn test_filter_exclude_partial_match() {
        let exclude = vec![combination(json!({"a": 1, "b": 3}))];
        let target = combinations(vec![
            json!({"a": 1, "b": 4, "c": 5}),
            json!({"a": 1, "b": 4, "c": 6}),
            json!({"a": 2, "b": 3, "c": 5}),
            json!({"a": 2, "b": 3, "c": 6}),
            json!({"a": 2, "b": 4, "c": 5}),
            json!({"a": 2, "b": 4, "c": 6}),
        ]);

        assert_eq!(exclude_all(args_list(), &exclude), target);
    }

    #[test]
    fn test_filter_exclude_cumulative() {
        let exclude = vec![
            combination(json!({"a": 1, "b": 3})),
            combination(json!({"c": 6})),
            combination(json!({"a": 1, "b": 3, "c": 5})),
        ];
        let target = combinations(vec![
            json!({"a": 1, "b": 4, "c": 5}),
            json!({"a": 2, "b": 3, "c": 5}),
            json!({"a": 2, "b": 4, "c": 5}),
        ]);

        assert_eq!(exclude_all(args_list(), &exclude), target);
    }

    #[test]
    fn test_empty_specs_are_noops() {
        let empty = Combination::new();
        assert_eq!(apply_include(args_list(), &empty), args_list());
        assert_eq!(apply_exclude(args_list(), &empty), args_list());
        assert_eq!(exclude_all(args_list(), &[]), args_list());
        assert_eq!(include_all(args_list(), &[]), args_list());
    }
}
