use serde::Serialize;

/// Structural problem in the input rows. Always recoverable: the caller can
/// fix the named row/field and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("row {row_index}: field `{field}`: {message}")]
pub struct ValidationError {
    pub row_index: usize,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(row_index: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row_index,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Internal defect: a value that the normalizer guarantees never reaches
    /// a downstream component did anyway. Fatal to the current request.
    #[error("invariant violated: {context}")]
    Invariant { context: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_row_and_field() {
        let e = ValidationError::new(3, "maxPoints", "missing required field");
        assert_eq!(e.to_string(), "row 3: field `maxPoints`: missing required field");
    }

    #[test]
    fn validation_error_serializes_camel_case() {
        let e = ValidationError::new(0, "studentId", "missing required field");
        let v = serde_json::to_value(&e).expect("serialize");
        assert_eq!(v.get("rowIndex").and_then(|v| v.as_u64()), Some(0));
        assert_eq!(v.get("field").and_then(|v| v.as_str()), Some("studentId"));
    }
}
