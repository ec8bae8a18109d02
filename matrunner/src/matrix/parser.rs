use crate::matrix::models::{Matrix, MatrixDefinition, Value};
use crate::{MatrixError, MatrixResult};

use std::fs;
use std::path::Path;

const DOCUMENT_KEYS: [&str; 3] = ["matrix", "include", "exclude"];

/// Parser and validator for matrix definitions.
///
/// Untyped input (YAML, JSON or a `serde_json::Value`) is checked eagerly:
/// the matrix and each optional include/exclude collection must be a mapping
/// whose values are all sequences.
pub struct MatrixParser;

impl MatrixParser {
    /// Parse a matrix definition from a file path.
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MatrixResult<MatrixDefinition> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Parse a matrix definition document from a YAML string.
    pub fn parse_yaml(content: &str) -> MatrixResult<MatrixDefinition> {
        let document: Value = serde_yaml::from_str(content)?;
        Self::from_document(&document)
    }

    /// Parse a matrix definition document from a JSON string.
    pub fn parse_json(content: &str) -> MatrixResult<MatrixDefinition> {
        let document: Value = serde_json::from_str(content)?;
        Self::from_document(&document)
    }

    /// Build a definition from a document with a required `matrix` key and
    /// optional `include` and `exclude` keys.
    pub fn from_document(document: &Value) -> MatrixResult<MatrixDefinition> {
        let fields = document.as_object().ok_or_else(|| {
            MatrixError::invalid_argument(format!(
                "matrix definition must be a mapping, got {}",
                kind_of(document)
            ))
        })?;

        if let Some(unknown) = fields
            .keys()
            .find(|key| !DOCUMENT_KEYS.contains(&key.as_str()))
        {
            return Err(MatrixError::invalid_argument(format!(
                "unknown key '{}' in matrix definition (expected one of: {})",
                unknown,
                DOCUMENT_KEYS.join(", ")
            )));
        }

        let matrix = fields
            .get("matrix")
            .ok_or_else(|| MatrixError::invalid_argument("matrix definition has no 'matrix' key"))?;

        Self::from_parts(matrix, fields.get("include"), fields.get("exclude"))
    }

    /// Validate a matrix and its optional include/exclude matrices.
    ///
    /// All three are checked before anything is expanded. A `null`
    /// include or exclude is treated as absent.
    pub fn from_parts(
        matrix: &Value,
        include: Option<&Value>,
        exclude: Option<&Value>,
    ) -> MatrixResult<MatrixDefinition> {
        let matrix = Self::parse_matrix("matrix", matrix)?;
        let include = Self::parse_optional("include", include)?;
        let exclude = Self::parse_optional("exclude", exclude)?;

        Ok(MatrixDefinition {
            matrix,
            include,
            exclude,
        })
    }

    /// Validate a single matrix. `label` names the input in error messages.
    pub fn parse_matrix(label: &str, value: &Value) -> MatrixResult<Matrix> {
        let dimensions = value.as_object().ok_or_else(|| {
            MatrixError::invalid_argument(format!(
                "{} must be a mapping, got {}",
                label,
                kind_of(value)
            ))
        })?;

        let mut matrix = Matrix::new();
        for (key, values) in dimensions {
            let values = values.as_array().ok_or_else(|| {
                MatrixError::invalid_argument(format!(
                    "{} values must be sequences, but '{}' is {}",
                    label,
                    key,
                    kind_of(values)
                ))
            })?;
            matrix.insert(key.clone(), values.clone());
        }
        Ok(matrix)
    }

    fn parse_optional(label: &str, value: Option<&Value>) -> MatrixResult<Option<Matrix>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Self::parse_matrix(label, value).map(Some),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
