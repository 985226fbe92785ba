//! Decode/encode round trips over the JSON fixtures in `tests/data`

use ferrum_models::{
    AdministrativeGender, Basic, Bundle, Condition, DecodeOptions, DecodeWarning, ErrorKind,
    Extension, ExtensionValue, FhirJsonCodec, HumanName, Observation, ObservationStatus,
    ObservationValue, Patient, Practitioner, Primitive,
};
use serde_json::{json, Value};

mod test_support;

use test_support::{codec, fixture_names, load_fixture, load_fixture_str};

#[test]
fn test_all_fixtures_round_trip() {
    let names = fixture_names();
    assert!(!names.is_empty(), "no fixtures found");

    for name in names {
        let original = load_fixture(&name);
        let decoded = codec()
            .decode_str(&load_fixture_str(&name))
            .unwrap_or_else(|e| panic!("{name}: decode failed: {e}"));
        let encoded = codec().encode_value(&*decoded.value);
        assert_eq!(encoded, original, "{name}: round trip changed the document");

        // decode(encode(x)) == x
        let again = codec()
            .decode_value(encoded)
            .unwrap_or_else(|e| panic!("{name}: second decode failed: {e}"));
        assert_eq!(again.value, decoded.value, "{name}: second decode differs");
    }
}

#[test]
fn test_minimal_observation_literal() {
    let input = r#"{"resourceType":"Observation","status":"final","code":{"text":"x"}}"#;
    let obs = codec().decode_str_as::<Observation>(input).unwrap().value;
    assert_eq!(obs.status(), Some(&ObservationStatus::Final));
    assert_eq!(obs.code.text(), Some("x"));

    let output = codec().encode_value(&obs);
    let keys: Vec<&str> = output.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["resourceType", "status", "code"]);
    assert_eq!(codec().encode_string(&obs), input);
}

#[test]
fn test_unknown_extension_preserved() {
    let patient = codec()
        .decode_value_as::<Patient>(load_fixture("patient-example.json"))
        .unwrap()
        .value;

    let unknown: Vec<&Extension> = patient
        .base
        .extension
        .iter()
        .filter(|e| e.url == "http://example.org/fhir/StructureDefinition/unknown-vendor-flag")
        .collect();
    assert_eq!(unknown.len(), 1);
    match &unknown[0].value {
        Some(ExtensionValue::Expression(expr)) => {
            assert_eq!(expr.get("expression"), Some(&json!("Patient.active")))
        }
        other => panic!("unexpected extension value {other:?}"),
    }
    assert!(unknown[0].base.unmodeled.is_empty());

    let encoded = codec().encode_value(&patient);
    assert_eq!(
        encoded["extension"][1],
        json!({
            "url": "http://example.org/fhir/StructureDefinition/unknown-vendor-flag",
            "valueExpression": {"language": "text/fhirpath", "expression": "Patient.active"}
        })
    );
    assert_eq!(encoded["vendorScore"], json!(0.75));
}

#[test]
fn test_extension_value_conflict_with_metadata_type() {
    let err = codec()
        .decode_value(json!({
            "resourceType": "Basic",
            "code": {"text": "x"},
            "extension": [{
                "url": "http://example.org/flag",
                "valueString": "a",
                "valueExpression": {"language": "text/fhirpath", "expression": "true"}
            }]
        }))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ChoiceConflict);
    assert_eq!(err.path(), Some("Basic.extension[0].value[x]"));
}

#[test]
fn test_known_extension_is_typed() {
    let patient = codec()
        .decode_value_as::<Patient>(load_fixture("patient-example.json"))
        .unwrap()
        .value;
    let birth_place = patient.base.extension[0].value.as_ref().unwrap();
    match birth_place {
        ExtensionValue::Address(address) => {
            assert_eq!(address.city.as_ref().and_then(Primitive::as_str), Some("Springfield"))
        }
        other => panic!("unexpected extension value {other:?}"),
    }
}

#[test]
fn test_positional_primitive_extensions() {
    let patient = codec()
        .decode_value_as::<Patient>(load_fixture("patient-example.json"))
        .unwrap()
        .value;
    let maiden = &patient.name[2];
    assert_eq!(maiden.given.len(), 2);
    assert!(maiden.given[0].element.is_none());
    assert_eq!(maiden.given[1].as_str(), Some("James"));
    assert_eq!(maiden.given[1].element.as_ref().unwrap().extension.len(), 1);

    let encoded = codec().encode_value(&patient);
    assert_eq!(encoded["name"][2]["_given"][0], Value::Null);
    assert!(encoded["name"][0].get("_given").is_none());
}

#[test]
fn test_null_only_primitive_list_is_stable() {
    let decoded = codec()
        .decode_value(json!({"resourceType": "Patient", "name": [{"given": [null], "family": "Doe"}]}))
        .unwrap()
        .value;
    let encoded = codec().encode_value(&*decoded);
    assert_eq!(
        encoded,
        json!({"resourceType": "Patient", "name": [{"family": "Doe"}]})
    );
    let again = codec().decode_value(encoded).unwrap().value;
    assert_eq!(again, decoded);
}

#[test]
fn test_decimal_wire_text_is_kept() {
    let input = r#"{"resourceType":"Observation","status":"final","code":{"text":"x"},"valueQuantity":{"value":1.50,"unit":"mg"}}"#;
    let decoded = codec().decode_str(input).unwrap();
    assert_eq!(codec().encode_string(&*decoded.value), input);

    let long = r#"{"resourceType":"Observation","status":"final","code":{"text":"x"},"valueQuantity":{"value":1234567.123456789012345}}"#;
    let decoded = codec().decode_str(long).unwrap();
    assert_eq!(codec().encode_string(&*decoded.value), long);
}

#[test]
fn test_absent_vs_empty() {
    let mut patient = Patient::default();
    patient.base.id = Some("p1".to_string());
    let encoded = codec().encode_value(&patient);
    assert_eq!(encoded, json!({"resourceType": "Patient", "id": "p1"}));

    patient.name.push(HumanName::new("Chalmers", &["Peter"]));
    let encoded = codec().encode_value(&patient);
    assert_eq!(
        encoded["name"],
        json!([{"family": "Chalmers", "given": ["Peter"]}])
    );
}

#[test]
fn test_enum_tolerance_default_and_strict() {
    let input = r#"{"resourceType":"Patient","gender":"nonbinary"}"#;

    let decoded = codec().decode_str_as::<Patient>(input).unwrap();
    assert_eq!(
        decoded.warnings,
        vec![DecodeWarning::UnrecognizedCode {
            path: "Patient.gender".to_string(),
            code: "nonbinary".to_string(),
            value_set: "http://hl7.org/fhir/ValueSet/administrative-gender",
        }]
    );
    assert_eq!(
        decoded.value.gender(),
        Some(&AdministrativeGender::Unrecognized("nonbinary".to_string()))
    );
    assert_eq!(codec().encode_string(&decoded.value), input);

    let strict = FhirJsonCodec::r4().with_options(DecodeOptions::strict());
    let err = strict.decode_str(input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCode);
}

#[test]
fn test_contained_resources_are_typed() {
    let condition = codec()
        .decode_value_as::<Condition>(load_fixture("condition-contained.json"))
        .unwrap()
        .value;
    assert_eq!(condition.base.contained.len(), 2);

    let recorder = condition
        .recorder
        .as_ref()
        .and_then(|r| r.reference())
        .and_then(|r| condition.base.contained_by_id(r))
        .unwrap();
    let practitioner = recorder.downcast_ref::<Practitioner>().unwrap();
    assert_eq!(practitioner.name[0].display(), "Pieter Voigt");

    let basic = condition.base.contained_by_id("#b1").unwrap();
    assert!(basic.is::<Basic>());
    assert!(basic.has_modifier_extensions());
}

#[test]
fn test_contained_failure_fails_container() {
    let mut raw = load_fixture("condition-contained.json");
    raw["contained"][1]
        .as_object_mut()
        .unwrap()
        .remove("code");
    let err = codec().decode_value(raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.path(), Some("Condition.contained[1].code"));
}

#[test]
fn test_component_quantities() {
    let obs = codec()
        .decode_value_as::<Observation>(load_fixture("observation-bp.json"))
        .unwrap()
        .value;
    let values: Vec<String> = obs
        .component
        .iter()
        .filter_map(|c| match &c.value {
            Some(ObservationValue::Quantity(q)) => q.value().map(|v| v.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec!["107", "60.5"]);
}

#[test]
fn test_type_mismatch_path() {
    let err = codec()
        .decode_str(r#"{"resourceType":"Patient","name":[{"given":"Peter"}]}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path(), Some("Patient.name[0].given"));
}

#[test]
fn test_malformed_json() {
    let err = codec().decode_str(r#"{"resourceType":"Patient","#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedJson);
    assert!(!err.is_contained_to_resource());
}

#[test]
fn test_document_size_limit() {
    let small = FhirJsonCodec::r4()
        .with_options(DecodeOptions::default().with_max_document_bytes(16));
    let err = small
        .decode_str(r#"{"resourceType":"Patient","id":"too-long-for-the-limit"}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DocumentTooLarge);
}

#[test]
fn test_bundle_fixture_reencodes_failed_entry_verbatim() {
    let original = load_fixture("bundle-mixed.json");
    let bundle = codec()
        .decode_value_as::<Bundle>(original.clone())
        .unwrap()
        .value;
    assert_eq!(codec().encode_value(&bundle)["entry"][2], original["entry"][2]);
}
