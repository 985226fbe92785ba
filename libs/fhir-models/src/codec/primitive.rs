use super::{DecodeContext, FhirType};
use crate::element::Element;
use crate::error::Result;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// A Rust type that maps onto one FHIR JSON primitive value
pub trait PrimitiveValue: Sized + Clone + PartialEq + fmt::Debug {
    /// JSON shape expected on the wire, used in `TypeMismatch` diagnostics
    const EXPECTED: &'static str;

    fn decode_primitive(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self>;
    fn encode_primitive(&self) -> Value;
}

impl PrimitiveValue for String {
    const EXPECTED: &'static str = "string";

    fn decode_primitive(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ctx.type_mismatch(Self::EXPECTED, &other)),
        }
    }

    fn encode_primitive(&self) -> Value {
        Value::String(self.clone())
    }
}

impl PrimitiveValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn decode_primitive(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ctx.type_mismatch(Self::EXPECTED, &other)),
        }
    }

    fn encode_primitive(&self) -> Value {
        Value::Bool(*self)
    }
}

impl PrimitiveValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn decode_primitive(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Ok(n),
            None => Err(ctx.type_mismatch(Self::EXPECTED, &value)),
        }
    }

    fn encode_primitive(&self) -> Value {
        Value::from(*self)
    }
}

/// `unsignedInt` and `positiveInt`
impl PrimitiveValue for u32 {
    const EXPECTED: &'static str = "unsigned integer";

    fn decode_primitive(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => Ok(n),
            None => Err(ctx.type_mismatch(Self::EXPECTED, &value)),
        }
    }

    fn encode_primitive(&self) -> Value {
        Value::from(*self)
    }
}

impl PrimitiveValue for Decimal {
    const EXPECTED: &'static str = "decimal";

    /// Parsed from the number's exact wire text
    fn decode_primitive(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let parsed = match &value {
            Value::Number(n) => {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .ok()
            }
            _ => None,
        };
        parsed.ok_or_else(|| ctx.type_mismatch(Self::EXPECTED, &value))
    }

    /// Written from the decimal's own text, so scale and trailing zeros
    /// survive (`1.50` stays `1.50`)
    fn encode_primitive(&self) -> Value {
        let text = self.to_string();
        match Number::from_str(&text) {
            Ok(n) => Value::Number(n),
            Err(_) => Value::String(text),
        }
    }
}

/// A FHIR primitive: an optional value plus the optional element carried in
/// the `_field` sibling (`id` and `extension` for that primitive).
///
/// Either half may be missing on the wire, but not both.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive<T> {
    pub value: Option<T>,
    pub element: Option<Element>,
}

impl<T> Default for Primitive<T> {
    fn default() -> Self {
        Self {
            value: None,
            element: None,
        }
    }
}

impl<T> Primitive<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Some(value),
            element: None,
        }
    }

    /// A value-less primitive that only carries extensions, e.g. a
    /// data-absent-reason
    pub fn from_element(element: Element) -> Self {
        Self {
            value: None,
            element: Some(element),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.element.is_none()
    }
}

impl<T> From<T> for Primitive<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl Primitive<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl From<&str> for Primitive<String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl<T: PrimitiveValue> Primitive<T> {
    /// Decode from the `field` value and the `_field` element, either of
    /// which may be absent
    pub fn decode_parts(
        value: Option<Value>,
        element: Option<Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Self> {
        let value = value.map(|v| T::decode_primitive(v, ctx)).transpose()?;
        let element = element.map(|e| Element::decode(e, ctx)).transpose()?;
        Ok(Self { value, element })
    }

    /// Encode into the `field` value and the `_field` element
    pub fn encode_parts(&self) -> (Option<Value>, Option<Value>) {
        (
            self.value.as_ref().map(PrimitiveValue::encode_primitive),
            self.element.as_ref().map(FhirType::encode),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeOptions;
    use crate::error::ErrorKind;
    use crate::registry::ResourceRegistry;
    use serde_json::json;

    fn decode<T: PrimitiveValue>(value: Value) -> Result<T> {
        let registry = ResourceRegistry::new();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);
        T::decode_primitive(value, &mut ctx)
    }

    #[test]
    fn test_integer_rejects_fraction_and_strings() {
        assert_eq!(decode::<i32>(json!(-7)).unwrap(), -7);
        assert_eq!(
            decode::<i32>(json!(1.5)).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            decode::<i32>(json!("5")).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            decode::<u32>(json!(-1)).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_decimal_values() {
        assert_eq!(
            decode::<Decimal>(json!(72.5)).unwrap(),
            Decimal::from_str("72.5").unwrap()
        );
        assert_eq!(decode::<Decimal>(json!(3)).unwrap(), Decimal::from(3));
        assert_eq!(
            decode::<Decimal>(json!("3.0")).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_decimal_encoding() {
        assert_eq!(Decimal::from(120).encode_primitive(), json!(120));
        assert_eq!(
            Decimal::from_str("0.25").unwrap().encode_primitive(),
            json!(0.25)
        );
    }

    #[test]
    fn test_decimal_keeps_wire_precision() {
        let value: Value = serde_json::from_str("1.50").unwrap();
        let decimal = decode::<Decimal>(value).unwrap();
        assert_eq!(decimal.scale(), 2);
        assert_eq!(decimal.encode_primitive().to_string(), "1.50");

        let long = Decimal::from_str("1234567.123456789012345").unwrap();
        let encoded = long.encode_primitive();
        assert_eq!(encoded.to_string(), "1234567.123456789012345");
        assert_eq!(decode::<Decimal>(encoded).unwrap(), long);
    }

    #[test]
    fn test_decimal_beyond_i64() {
        let big = Decimal::from_str("79228162514264337593543950335").unwrap();
        let encoded = big.encode_primitive();
        assert!(encoded.is_number());
        assert_eq!(decode::<Decimal>(encoded).unwrap(), big);
    }

    #[test]
    fn test_boolean_mismatch_reports_found_kind() {
        let err = decode::<bool>(json!("true")).unwrap_err();
        match err {
            crate::DecodeError::TypeMismatch {
                expected, found, ..
            } => {
                assert_eq!(expected, "boolean");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_primitive_parts_round_trip() {
        let registry = ResourceRegistry::new();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);

        let value = Some(json!("1970-01-01"));
        let element = Some(json!({"id": "dob", "extension": [{"url": "http://x", "valueBoolean": true}]}));
        let primitive =
            Primitive::<String>::decode_parts(value.clone(), element.clone(), &mut ctx).unwrap();

        assert_eq!(primitive.value.as_deref(), Some("1970-01-01"));
        let el = primitive.element.as_ref().unwrap();
        assert_eq!(el.id.as_deref(), Some("dob"));
        assert_eq!(el.extension.len(), 1);

        assert_eq!(primitive.encode_parts(), (value, element));
    }
}
