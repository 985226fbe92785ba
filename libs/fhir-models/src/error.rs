//! Error and warning types for the FHIR JSON codec

use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`DecodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ChoiceConflict,
    UnknownResourceType,
    MissingRequiredField,
    TypeMismatch,
    MalformedJson,
    InvalidCode,
    DepthLimitExceeded,
    DocumentTooLarge,
}

impl ErrorKind {
    /// The `http://hl7.org/fhir/issue-type` code used when reporting this
    /// kind as an OperationOutcome issue.
    pub fn issue_type(self) -> &'static str {
        match self {
            ErrorKind::ChoiceConflict => "structure",
            ErrorKind::UnknownResourceType => "not-supported",
            ErrorKind::MissingRequiredField => "required",
            ErrorKind::TypeMismatch => "value",
            ErrorKind::MalformedJson => "structure",
            ErrorKind::InvalidCode => "code-invalid",
            ErrorKind::DepthLimitExceeded => "too-costly",
            ErrorKind::DocumentTooLarge => "too-long",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ChoiceConflict => "ChoiceConflict",
            ErrorKind::UnknownResourceType => "UnknownResourceType",
            ErrorKind::MissingRequiredField => "MissingRequiredField",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::MalformedJson => "MalformedJSON",
            ErrorKind::InvalidCode => "InvalidCode",
            ErrorKind::DepthLimitExceeded => "DepthLimitExceeded",
            ErrorKind::DocumentTooLarge => "DocumentTooLarge",
        };
        f.write_str(name)
    }
}

/// Structural decode failure.
///
/// Paths use FHIRPath-like notation rooted at the resource type, e.g.
/// `Bundle.entry[2].resource.code.coding[0].system`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{path}: more than one value for choice element ({})", .keys.join(", "))]
    ChoiceConflict { path: String, keys: Vec<String> },

    #[error("{path}: unknown resource type {}", .resource_type.as_deref().unwrap_or("<missing>"))]
    UnknownResourceType {
        path: String,
        resource_type: Option<String>,
    },

    #[error("{path}: missing required field")]
    MissingRequiredField { path: String },

    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Malformed JSON at line {line}, column {column}: {message}")]
    MalformedJson {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("{path}: code {code:?} is not defined in {value_set}")]
    InvalidCode {
        path: String,
        code: String,
        value_set: &'static str,
    },

    #[error("{path}: nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { path: String, limit: usize },

    #[error("Document of {size} bytes exceeds limit of {limit} bytes")]
    DocumentTooLarge { size: usize, limit: usize },
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::ChoiceConflict { .. } => ErrorKind::ChoiceConflict,
            DecodeError::UnknownResourceType { .. } => ErrorKind::UnknownResourceType,
            DecodeError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            DecodeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            DecodeError::MalformedJson { .. } => ErrorKind::MalformedJson,
            DecodeError::InvalidCode { .. } => ErrorKind::InvalidCode,
            DecodeError::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
            DecodeError::DocumentTooLarge { .. } => ErrorKind::DocumentTooLarge,
        }
    }

    /// Element path of the failure, if it is tied to one
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::ChoiceConflict { path, .. }
            | DecodeError::UnknownResourceType { path, .. }
            | DecodeError::MissingRequiredField { path }
            | DecodeError::TypeMismatch { path, .. }
            | DecodeError::InvalidCode { path, .. }
            | DecodeError::DepthLimitExceeded { path, .. } => Some(path),
            DecodeError::MalformedJson { .. } | DecodeError::DocumentTooLarge { .. } => None,
        }
    }

    /// Whether a container may skip the failing resource and keep going.
    ///
    /// Limit violations and unparsable input abort the whole decode call.
    pub fn is_contained_to_resource(&self) -> bool {
        !matches!(
            self,
            DecodeError::MalformedJson { .. }
                | DecodeError::DepthLimitExceeded { .. }
                | DecodeError::DocumentTooLarge { .. }
        )
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::MalformedJson {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Non-fatal finding reported alongside a successful decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// A closed value set received a code it does not define; the code is
    /// kept verbatim.
    UnrecognizedCode {
        path: String,
        code: String,
        value_set: &'static str,
    },
}

impl DecodeWarning {
    pub fn path(&self) -> &str {
        match self {
            DecodeWarning::UnrecognizedCode { path, .. } => path,
        }
    }
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::UnrecognizedCode {
                path,
                code,
                value_set,
            } => write!(f, "{path}: code {code:?} is not defined in {value_set}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_conflict_message_lists_keys() {
        let err = DecodeError::ChoiceConflict {
            path: "Condition.onset[x]".to_string(),
            keys: vec!["onsetDateTime".to_string(), "onsetAge".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Condition.onset[x]: more than one value for choice element (onsetDateTime, onsetAge)"
        );
        assert_eq!(err.kind(), ErrorKind::ChoiceConflict);
        assert_eq!(err.path(), Some("Condition.onset[x]"));
    }

    #[test]
    fn test_unknown_resource_type_without_name() {
        let err = DecodeError::UnknownResourceType {
            path: "Bundle.entry[0].resource".to_string(),
            resource_type: None,
        };
        assert!(err.to_string().ends_with("unknown resource type <missing>"));
        assert!(err.is_contained_to_resource());
    }

    #[test]
    fn test_malformed_json_from_serde() {
        let err: DecodeError = serde_json::from_str::<serde_json::Value>("{\"a\":")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
        assert_eq!(err.path(), None);
        assert!(!err.is_contained_to_resource());
    }

    #[test]
    fn test_issue_type_mapping() {
        assert_eq!(ErrorKind::MissingRequiredField.issue_type(), "required");
        assert_eq!(ErrorKind::UnknownResourceType.issue_type(), "not-supported");
        assert_eq!(ErrorKind::InvalidCode.issue_type(), "code-invalid");
    }
}
