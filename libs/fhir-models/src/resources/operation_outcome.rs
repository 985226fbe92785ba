use crate::codec::{
    DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value, ValueSet,
};
use crate::datatypes::CodeableConcept;
use crate::element::BackboneElement;
use crate::error::{DecodeError, DecodeWarning, Result};
use crate::resource::{DomainResource, TypedResource};

value_set! {
    pub enum IssueSeverity("http://hl7.org/fhir/ValueSet/issue-severity") {
        Fatal = "fatal",
        Error = "error",
        Warning = "warning",
        Information = "information",
    }
}

value_set! {
    /// A code that describes the type of issue
    pub enum IssueType("http://hl7.org/fhir/ValueSet/issue-type") {
        Invalid = "invalid",
        Structure = "structure",
        Required = "required",
        Value = "value",
        Invariant = "invariant",
        Security = "security",
        Login = "login",
        Unknown = "unknown",
        Expired = "expired",
        Forbidden = "forbidden",
        Suppressed = "suppressed",
        Processing = "processing",
        NotSupported = "not-supported",
        Duplicate = "duplicate",
        MultipleMatches = "multiple-matches",
        NotFound = "not-found",
        Deleted = "deleted",
        TooLong = "too-long",
        CodeInvalid = "code-invalid",
        Extension = "extension",
        TooCostly = "too-costly",
        BusinessRule = "business-rule",
        Conflict = "conflict",
        Transient = "transient",
        LockError = "lock-error",
        NoStore = "no-store",
        Exception = "exception",
        Timeout = "timeout",
        Incomplete = "incomplete",
        Throttled = "throttled",
        Informational = "informational",
    }
}

/// A collection of error, warning, or information messages that result
/// from a system action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationOutcome {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// A single issue associated with the action
    pub issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    /// One `warning` issue per decode warning
    pub fn from_warnings(warnings: &[DecodeWarning]) -> Self {
        Self {
            issue: warnings.iter().map(OperationOutcomeIssue::from).collect(),
            ..Default::default()
        }
    }

    /// Whether any issue is `error` or `fatal`
    pub fn has_errors(&self) -> bool {
        self.issue.iter().any(|i| {
            matches!(
                i.severity.value(),
                Some(IssueSeverity::Error | IssueSeverity::Fatal)
            )
        })
    }
}

impl TypedResource for OperationOutcome {
    const RESOURCE_TYPE: &'static str = "OperationOutcome";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(OperationOutcome {
            issue: r.required_list("issue")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("issue", &self.issue);
    }

    domain_resource_accessors!();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationOutcomeIssue {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// fatal | error | warning | information
    pub severity: Primitive<IssueSeverity>,

    /// Error or warning code
    pub code: Primitive<IssueType>,

    /// Additional details about the error
    pub details: Option<CodeableConcept>,

    /// Additional diagnostic information about the issue
    pub diagnostics: Option<Primitive<String>>,

    /// Deprecated: Path of element(s) related to issue
    pub location: Vec<Primitive<String>>,

    /// FHIRPath of element(s) related to issue
    pub expression: Vec<Primitive<String>>,
}

impl OperationOutcomeIssue {
    pub fn new(severity: IssueSeverity, code: IssueType) -> Self {
        Self {
            severity: Primitive::new(severity),
            code: Primitive::new(code),
            ..Default::default()
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: impl Into<String>) -> Self {
        self.diagnostics = Some(Primitive::new(diagnostics.into()));
        self
    }

    pub fn with_expression(mut self, path: impl Into<String>) -> Self {
        self.expression.push(Primitive::new(path.into()));
        self
    }

    pub fn expression_paths(&self) -> Vec<&str> {
        self.expression.iter().filter_map(Primitive::as_str).collect()
    }
}

impl From<&DecodeWarning> for OperationOutcomeIssue {
    fn from(warning: &DecodeWarning) -> Self {
        let code = match warning {
            DecodeWarning::UnrecognizedCode { .. } => IssueType::CodeInvalid,
        };
        OperationOutcomeIssue::new(IssueSeverity::Warning, code)
            .with_diagnostics(warning.to_string())
            .with_expression(warning.path())
    }
}

impl FhirType for OperationOutcomeIssue {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(OperationOutcomeIssue {
            severity: r.required_primitive("severity")?,
            code: r.required_primitive("code")?,
            details: r.optional("details")?,
            diagnostics: r.primitive("diagnostics")?,
            location: r.primitive_list("location")?,
            expression: r.primitive_list("expression")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("severity", &self.severity);
        w.required_primitive("code", &self.code);
        w.optional("details", &self.details);
        w.primitive("diagnostics", &self.diagnostics);
        w.primitive_list("location", &self.location);
        w.primitive_list("expression", &self.expression);
        w.finish(&self.base.unmodeled)
    }
}

impl DecodeError {
    /// Report this error as a single-issue OperationOutcome
    pub fn to_operation_outcome(&self) -> OperationOutcome {
        let code = IssueType::from_code(self.kind().issue_type())
            .unwrap_or(IssueType::Exception);
        let mut issue =
            OperationOutcomeIssue::new(IssueSeverity::Error, code).with_diagnostics(self.to_string());
        if let Some(path) = self.path() {
            issue = issue.with_expression(path);
        }
        OperationOutcome {
            issue: vec![issue],
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FhirJsonCodec;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_outcome_round_trip() {
        let raw = json!({
            "resourceType": "OperationOutcome",
            "id": "allok",
            "issue": [{
                "severity": "information",
                "code": "informational",
                "details": {"text": "All OK"}
            }]
        });
        let codec = FhirJsonCodec::r4();
        let outcome = codec.decode_value_as::<OperationOutcome>(raw.clone()).unwrap().value;
        assert!(!outcome.has_errors());
        assert_eq!(codec.encode_value(&outcome), raw);
    }

    #[test]
    fn test_issue_required() {
        let err = FhirJsonCodec::r4()
            .decode_str(r#"{"resourceType":"OperationOutcome"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.path(), Some("OperationOutcome.issue"));
    }

    #[test]
    fn test_decode_error_as_outcome() {
        let err = DecodeError::MissingRequiredField {
            path: "Observation.status".to_string(),
        };
        let outcome = err.to_operation_outcome();
        assert!(outcome.has_errors());

        let issue = &outcome.issue[0];
        assert_eq!(issue.code.value(), Some(&IssueType::Required));
        assert_eq!(issue.expression_paths(), vec!["Observation.status"]);
        assert_eq!(
            issue.diagnostics.as_ref().and_then(Primitive::as_str),
            Some("Observation.status: missing required field")
        );
    }

    #[test]
    fn test_pathless_error_has_no_expression() {
        let err = DecodeError::DocumentTooLarge { size: 10, limit: 5 };
        let issue = &err.to_operation_outcome().issue[0];
        assert_eq!(issue.code.value(), Some(&IssueType::TooLong));
        assert!(issue.expression.is_empty());
    }

    #[test]
    fn test_warnings_as_outcome() {
        let outcome = OperationOutcome::from_warnings(&[DecodeWarning::UnrecognizedCode {
            path: "Patient.gender".to_string(),
            code: "nonbinary".to_string(),
            value_set: "http://hl7.org/fhir/ValueSet/administrative-gender",
        }]);
        assert!(!outcome.has_errors());
        assert_eq!(
            outcome.issue[0].severity.value(),
            Some(&IssueSeverity::Warning)
        );
        assert_eq!(outcome.issue[0].expression_paths(), vec!["Patient.gender"]);
    }
}
