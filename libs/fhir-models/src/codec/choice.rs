use super::{DecodeContext, FhirType, Primitive, PrimitiveValue};
use crate::error::Result;
use serde_json::Value;

/// One allowed type of a choice element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceSuffix {
    /// Type suffix as it appears in the JSON key (`DateTime` in `onsetDateTime`)
    pub name: &'static str,
    /// Primitive variants may carry a `_onsetDateTime` sibling
    pub primitive: bool,
}

/// A FHIR choice element (`value[x]`, `onset[x]`, ...) as a closed sum type.
///
/// Implementations are generated by [`choice_type!`](crate::choice_type);
/// [`ObjectReader::choice`](super::ObjectReader::choice) and
/// [`ObjectWriter::choice`](super::ObjectWriter::choice) handle the key
/// scanning and conflict detection.
pub trait ChoiceType: Sized {
    const SUFFIXES: &'static [ChoiceSuffix];

    fn decode_variant(
        suffix: &str,
        value: Option<Value>,
        element: Option<Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Self>;

    /// Suffix of the populated variant
    fn suffix(&self) -> &'static str;

    fn encode_variant(&self) -> (Option<Value>, Option<Value>);
}

/// A type usable as the payload of a choice variant
pub trait ChoiceVariant: Sized {
    const IS_PRIMITIVE: bool;

    fn decode_variant(
        value: Option<Value>,
        element: Option<Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Self>;

    fn encode_variant(&self) -> (Option<Value>, Option<Value>);
}

impl<T: PrimitiveValue> ChoiceVariant for Primitive<T> {
    const IS_PRIMITIVE: bool = true;

    fn decode_variant(
        value: Option<Value>,
        element: Option<Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Self> {
        Primitive::decode_parts(value, element, ctx)
    }

    fn encode_variant(&self) -> (Option<Value>, Option<Value>) {
        self.encode_parts()
    }
}

/// Shared body of `ChoiceVariant::decode_variant` for complex types
pub fn decode_complex_variant<T: FhirType>(
    value: Option<Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<T> {
    match value {
        Some(value) => T::decode(value, ctx),
        None => Err(ctx.type_mismatch("object", &Value::Null)),
    }
}

/// Implement [`ChoiceVariant`] for complex datatypes
macro_rules! complex_choice_variant {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::codec::ChoiceVariant for $ty {
                const IS_PRIMITIVE: bool = false;

                fn decode_variant(
                    value: Option<serde_json::Value>,
                    _element: Option<serde_json::Value>,
                    ctx: &mut $crate::codec::DecodeContext<'_>,
                ) -> $crate::error::Result<Self> {
                    $crate::codec::decode_complex_variant(value, ctx)
                }

                fn encode_variant(&self) -> (Option<serde_json::Value>, Option<serde_json::Value>) {
                    (Some($crate::codec::FhirType::encode(self)), None)
                }
            }
        )+
    };
}

pub(crate) use complex_choice_variant;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DecodeOptions, ObjectReader, ObjectWriter};
    use crate::datatypes::{Period, Quantity};
    use crate::error::{DecodeError, ErrorKind};
    use crate::registry::ResourceRegistry;
    use serde_json::json;

    crate::choice_type! {
        /// Test choice over a primitive and two complex types
        enum Onset {
            DateTime(Primitive<String>),
            Age(Quantity),
            Period(Period),
            String(Primitive<String>),
        }
    }

    fn read_onset(value: Value) -> Result<Option<Onset>> {
        let registry = ResourceRegistry::new();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);
        ctx.scoped("Condition", |ctx| {
            let mut reader = ObjectReader::new(value, ctx)?;
            reader.choice::<Onset>("onset")
        })
    }

    #[test]
    fn test_suffix_table() {
        let names: Vec<_> = Onset::SUFFIXES.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["DateTime", "Age", "Period", "String"]);
        assert!(Onset::SUFFIXES[0].primitive);
        assert!(!Onset::SUFFIXES[1].primitive);
    }

    #[test]
    fn test_absent_choice() {
        assert_eq!(read_onset(json!({"note": "x"})).unwrap(), None);
    }

    #[test]
    fn test_single_variant() {
        let onset = read_onset(json!({"onsetDateTime": "2020-02-01"}))
            .unwrap()
            .unwrap();
        assert_eq!(onset.suffix(), "DateTime");
        match onset {
            Onset::DateTime(p) => assert_eq!(p.value.as_deref(), Some("2020-02-01")),
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn test_conflict_is_rejected() {
        let err = read_onset(json!({
            "onsetDateTime": "2020-02-01",
            "onsetAge": {"value": 40, "unit": "a"}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChoiceConflict);
        assert_eq!(
            err,
            DecodeError::ChoiceConflict {
                path: "Condition.onset[x]".to_string(),
                keys: vec!["onsetDateTime".to_string(), "onsetAge".to_string()],
            }
        );
    }

    #[test]
    fn test_primitive_extension_only_counts_as_present() {
        let onset = read_onset(json!({
            "_onsetString": {"extension": [{"url": "http://example.org/absent", "valueCode": "unknown"}]}
        }))
        .unwrap()
        .unwrap();
        match onset {
            Onset::String(p) => {
                assert!(p.value.is_none());
                assert_eq!(p.element.unwrap().extension.len(), 1);
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn test_primitive_extension_conflicts_with_other_variant() {
        let err = read_onset(json!({
            "_onsetString": {"id": "a"},
            "onsetPeriod": {"start": "2020"}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChoiceConflict);
    }

    #[test]
    fn test_encode_emits_exactly_one_key() {
        let mut writer = ObjectWriter::new();
        let onset = Some(Onset::String(Primitive::from("childhood")));
        writer.choice("onset", &onset);
        writer.choice::<Onset>("abatement", &None);
        assert_eq!(
            writer.finish(&Default::default()),
            json!({"onsetString": "childhood"})
        );
    }
}
