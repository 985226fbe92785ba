use super::{DecodeContext, FhirType};
use crate::error::Result;
use serde_json::{Map, Value};

/// A complex datatype carried as its JSON object without a typed model.
///
/// Used for choice variants whose type is legal at the position
/// (`valueExpression`, `valueUsageContext`, ...) but not modeled field by
/// field. The object is written back exactly as read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawComplex(pub Map<String, Value>);

impl RawComplex {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl FhirType for RawComplex {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(RawComplex(map)),
            other => Err(ctx.type_mismatch("object", &other)),
        }
    }

    fn encode(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

super::complex_choice_variant!(RawComplex);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeOptions;
    use crate::error::ErrorKind;
    use crate::registry::ResourceRegistry;
    use serde_json::json;

    fn decode(value: Value) -> Result<RawComplex> {
        let registry = ResourceRegistry::new();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);
        RawComplex::decode(value, &mut ctx)
    }

    #[test]
    fn test_object_kept_verbatim() {
        let raw = json!({"language": "text/fhirpath", "expression": "Patient.active"});
        let decoded = decode(raw.clone()).unwrap();
        assert_eq!(decoded.get("language"), Some(&json!("text/fhirpath")));
        assert_eq!(decoded.encode(), raw);
    }

    #[test]
    fn test_non_object_rejected() {
        let err = decode(json!("Patient.active")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }
}
