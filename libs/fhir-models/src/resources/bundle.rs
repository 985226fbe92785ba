//! FHIR Bundle
//!
//! `Bundle.entry.resource` is dispatched through the registry. An entry
//! whose resource fails to decode does not fail the Bundle: the raw JSON and
//! the error are kept in [`EntryResource::Failed`] and re-emitted unchanged
//! on encode, so sibling entries survive.

use crate::codec::{
    DecodeContext, ExtensionBag, FhirType, ObjectReader, ObjectWriter, Primitive, Value,
};
use crate::datatypes::{Identifier, Signature};
use crate::element::BackboneElement;
use crate::error::{DecodeError, Result};
use crate::resource::{AnyResource, ResourceBase, TypedResource};
use crate::resources::OperationOutcome;
use rust_decimal::Decimal;

value_set! {
    /// Indicates the purpose of a bundle
    pub enum BundleType("http://hl7.org/fhir/ValueSet/bundle-type") {
        Document = "document",
        Message = "message",
        Transaction = "transaction",
        TransactionResponse = "transaction-response",
        Batch = "batch",
        BatchResponse = "batch-response",
        History = "history",
        Searchset = "searchset",
        Collection = "collection",
    }
}

value_set! {
    pub enum HttpVerb("http://hl7.org/fhir/ValueSet/http-verb") {
        Get = "GET",
        Head = "HEAD",
        Post = "POST",
        Put = "PUT",
        Delete = "DELETE",
        Patch = "PATCH",
    }
}

value_set! {
    /// Why an entry is in the result set
    pub enum SearchEntryMode("http://hl7.org/fhir/ValueSet/search-entry-mode") {
        Match = "match",
        Include = "include",
        Outcome = "outcome",
    }
}

/// A container for a collection of resources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    /// Resource id, meta, language and unmodeled keys
    pub base: ResourceBase,

    /// Persistent identifier for the bundle
    pub identifier: Option<Identifier>,

    /// Indicates the purpose of this bundle - how it was intended to be used
    pub type_: Primitive<BundleType>,

    /// When the bundle was assembled
    pub timestamp: Option<Primitive<String>>,

    /// If search, the total number of matches
    pub total: Option<Primitive<u32>>,

    /// Links related to this Bundle
    pub link: Vec<BundleLink>,

    /// Entry in the bundle - will have a resource or information
    pub entry: Vec<BundleEntry>,

    /// Digital Signature
    pub signature: Option<Signature>,
}

impl Bundle {
    /// Create a new Bundle with minimal required fields
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            type_: Primitive::new(bundle_type),
            ..Default::default()
        }
    }

    pub fn bundle_type(&self) -> Option<&BundleType> {
        self.type_.value()
    }

    /// Check if this is a transaction bundle
    pub fn is_transaction(&self) -> bool {
        matches!(self.bundle_type(), Some(BundleType::Transaction))
    }

    /// Check if this is a batch bundle
    pub fn is_batch(&self) -> bool {
        matches!(self.bundle_type(), Some(BundleType::Batch))
    }

    /// Check if this is a search result bundle
    pub fn is_searchset(&self) -> bool {
        matches!(self.bundle_type(), Some(BundleType::Searchset))
    }

    pub fn entry_count(&self) -> usize {
        self.entry.len()
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entry
    }

    pub fn entries_mut(&mut self) -> &mut [BundleEntry] {
        &mut self.entry
    }

    pub fn add_entry(&mut self, entry: BundleEntry) {
        self.entry.push(entry);
    }

    pub fn add_link(&mut self, relation: impl Into<String>, url: impl Into<String>) {
        self.link.push(BundleLink::new(relation, url));
    }

    /// Successfully decoded entry resources, in entry order
    pub fn resources(&self) -> impl Iterator<Item = &AnyResource> {
        self.entry
            .iter()
            .filter_map(|e| e.resource.as_ref().and_then(EntryResource::resource))
    }

    /// Entries whose resource failed to decode, with their entry index
    pub fn entry_errors(&self) -> Vec<(usize, &DecodeError)> {
        self.entry
            .iter()
            .enumerate()
            .filter_map(|(i, e)| {
                e.resource
                    .as_ref()
                    .and_then(EntryResource::error)
                    .map(|err| (i, err))
            })
            .collect()
    }

    /// One OperationOutcome covering every failed entry, or `None` when all
    /// entries decoded
    pub fn entry_outcome(&self) -> Option<OperationOutcome> {
        let errors = self.entry_errors();
        if errors.is_empty() {
            return None;
        }
        let mut outcome = OperationOutcome::default();
        for (_, err) in errors {
            outcome.issue.extend(err.to_operation_outcome().issue);
        }
        Some(outcome)
    }
}

impl TypedResource for Bundle {
    const RESOURCE_TYPE: &'static str = "Bundle";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Bundle {
            identifier: r.optional("identifier")?,
            type_: r.required_primitive("type")?,
            timestamp: r.primitive("timestamp")?,
            total: r.primitive("total")?,
            link: r.list("link")?,
            entry: r.list("entry")?,
            signature: r.optional("signature")?,
            base: r.finish_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.resource(&self.base);
        w.optional("identifier", &self.identifier);
        w.required_primitive("type", &self.type_);
        w.primitive("timestamp", &self.timestamp);
        w.primitive("total", &self.total);
        w.list("link", &self.link);
        w.list("entry", &self.entry);
        w.optional("signature", &self.signature);
    }

    fn unmodeled(&self) -> &ExtensionBag {
        &self.base.unmodeled
    }

    fn id(&self) -> Option<&str> {
        self.base.id.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleLink {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// See http://www.iana.org/assignments/link-relations/link-relations.xhtml#link-relations-1
    pub relation: Primitive<String>,

    /// Reference details for the link
    pub url: Primitive<String>,
}

impl BundleLink {
    pub fn new(relation: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            relation: Primitive::new(relation.into()),
            url: Primitive::new(url.into()),
            ..Default::default()
        }
    }
}

impl FhirType for BundleLink {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(BundleLink {
            relation: r.required_primitive("relation")?,
            url: r.required_primitive("url")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("relation", &self.relation);
        w.required_primitive("url", &self.url);
        w.finish(&self.base.unmodeled)
    }
}

/// The resource slot of a Bundle entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResource {
    Decoded(AnyResource),
    /// The entry's resource could not be decoded. `raw` is the JSON exactly
    /// as received.
    Failed { raw: Value, error: DecodeError },
}

impl EntryResource {
    /// Decode one entry resource, keeping recoverable failures in place.
    /// A failed entry contributes its error only; warnings raised before
    /// the failure are discarded with the partial decode.
    fn decode_entry(raw: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let registry = ctx.registry();
        let mark = ctx.warning_count();
        match ctx.scoped("resource", |ctx| registry.decode(raw.clone(), ctx)) {
            Ok(resource) => Ok(EntryResource::Decoded(resource)),
            Err(error) if error.is_contained_to_resource() => {
                tracing::debug!(error = %error, "Skipping undecodable bundle entry");
                ctx.truncate_warnings(mark);
                Ok(EntryResource::Failed { raw, error })
            }
            Err(error) => Err(error),
        }
    }

    pub fn resource(&self) -> Option<&AnyResource> {
        match self {
            EntryResource::Decoded(resource) => Some(resource),
            EntryResource::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            EntryResource::Decoded(_) => None,
            EntryResource::Failed { error, .. } => Some(error),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            EntryResource::Decoded(resource) => resource.to_value(),
            EntryResource::Failed { raw, .. } => raw.clone(),
        }
    }
}

impl From<AnyResource> for EntryResource {
    fn from(resource: AnyResource) -> Self {
        EntryResource::Decoded(resource)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleEntry {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Links related to this entry
    pub link: Vec<BundleLink>,

    /// URI for resource (Absolute URL server address or URI for UUID/OID)
    pub full_url: Option<Primitive<String>>,

    /// A resource in the bundle, or the raw JSON of one that failed to decode
    pub resource: Option<EntryResource>,

    /// Search related information
    pub search: Option<BundleEntrySearch>,

    /// Additional execution information (transaction/batch/history)
    pub request: Option<BundleEntryRequest>,

    /// Results of execution (transaction/batch/history)
    pub response: Option<BundleEntryResponse>,
}

impl BundleEntry {
    pub fn new(resource: impl Into<AnyResource>) -> Self {
        Self {
            resource: Some(EntryResource::Decoded(resource.into())),
            ..Default::default()
        }
    }

    pub fn with_full_url(mut self, url: impl Into<String>) -> Self {
        self.full_url = Some(Primitive::new(url.into()));
        self
    }
}

impl FhirType for BundleEntry {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        let link = r.list("link")?;
        let full_url = r.primitive("fullUrl")?;
        let resource = match r.take("resource") {
            Some(raw) => Some(EntryResource::decode_entry(raw, r.context())?),
            None => None,
        };
        Ok(BundleEntry {
            link,
            full_url,
            resource,
            search: r.optional("search")?,
            request: r.optional("request")?,
            response: r.optional("response")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.list("link", &self.link);
        w.primitive("fullUrl", &self.full_url);
        if let Some(resource) = &self.resource {
            w.raw("resource", resource.to_value());
        }
        w.optional("search", &self.search);
        w.optional("request", &self.request);
        w.optional("response", &self.response);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleEntrySearch {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// match | include | outcome - why this is in the result set
    pub mode: Option<Primitive<SearchEntryMode>>,

    /// Search ranking (between 0 and 1)
    pub score: Option<Primitive<Decimal>>,
}

impl FhirType for BundleEntrySearch {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(BundleEntrySearch {
            mode: r.primitive("mode")?,
            score: r.primitive("score")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.primitive("mode", &self.mode);
        w.primitive("score", &self.score);
        w.finish(&self.base.unmodeled)
    }
}

/// Request details for a transaction or batch entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleEntryRequest {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// GET | HEAD | POST | PUT | DELETE | PATCH
    pub method: Primitive<HttpVerb>,

    /// URL for HTTP equivalent of this entry
    pub url: Primitive<String>,

    /// For managing cache currency
    pub if_none_match: Option<Primitive<String>>,

    /// For managing cache currency
    pub if_modified_since: Option<Primitive<String>>,

    /// For managing update contention
    pub if_match: Option<Primitive<String>>,

    /// For conditional creates
    pub if_none_exist: Option<Primitive<String>>,
}

impl FhirType for BundleEntryRequest {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(BundleEntryRequest {
            method: r.required_primitive("method")?,
            url: r.required_primitive("url")?,
            if_none_match: r.primitive("ifNoneMatch")?,
            if_modified_since: r.primitive("ifModifiedSince")?,
            if_match: r.primitive("ifMatch")?,
            if_none_exist: r.primitive("ifNoneExist")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("method", &self.method);
        w.required_primitive("url", &self.url);
        w.primitive("ifNoneMatch", &self.if_none_match);
        w.primitive("ifModifiedSince", &self.if_modified_since);
        w.primitive("ifMatch", &self.if_match);
        w.primitive("ifNoneExist", &self.if_none_exist);
        w.finish(&self.base.unmodeled)
    }
}

/// Results of executing a transaction or batch entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleEntryResponse {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Status response code (text optional)
    pub status: Primitive<String>,

    /// The location (if the operation returns a location)
    pub location: Option<Primitive<String>>,

    /// The Etag for the resource (if relevant)
    pub etag: Option<Primitive<String>>,

    /// Server's date time modified
    pub last_modified: Option<Primitive<String>>,

    /// OperationOutcome with hints and warnings (for batch/transaction)
    pub outcome: Option<AnyResource>,
}

impl FhirType for BundleEntryResponse {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(BundleEntryResponse {
            status: r.required_primitive("status")?,
            location: r.primitive("location")?,
            etag: r.primitive("etag")?,
            last_modified: r.primitive("lastModified")?,
            outcome: r.optional("outcome")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("status", &self.status);
        w.primitive("location", &self.location);
        w.primitive("etag", &self.etag);
        w.primitive("lastModified", &self.last_modified);
        w.optional("outcome", &self.outcome);
        w.finish(&self.base.unmodeled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DecodeOptions, FhirJsonCodec};
    use crate::error::ErrorKind;
    use crate::resources::{Observation, Patient};
    use serde_json::json;

    fn mixed_bundle() -> Value {
        json!({
            "resourceType": "Bundle",
            "id": "mixed",
            "type": "collection",
            "entry": [
                {
                    "fullUrl": "http://example.org/fhir/Patient/123",
                    "resource": {"resourceType": "Patient", "id": "123"}
                },
                {
                    "resource": {
                        "resourceType": "Observation",
                        "status": "final",
                        "code": {"text": "x"}
                    }
                },
                {
                    "resource": {"resourceType": "Foo", "bar": 1}
                }
            ]
        })
    }

    #[test]
    fn test_deserialize_bundle() {
        let codec = FhirJsonCodec::r4();
        let bundle = codec
            .decode_value_as::<Bundle>(json!({
                "resourceType": "Bundle",
                "id": "example-bundle",
                "type": "searchset",
                "total": 1,
                "entry": [{
                    "fullUrl": "http://example.org/fhir/Patient/123",
                    "resource": {"resourceType": "Patient", "id": "123"},
                    "search": {"mode": "match", "score": 1}
                }]
            }))
            .unwrap()
            .value;
        assert_eq!(bundle.base.id.as_deref(), Some("example-bundle"));
        assert!(bundle.is_searchset());
        assert_eq!(bundle.total.as_ref().and_then(Primitive::value), Some(&1));
        assert_eq!(bundle.entry_count(), 1);
        let patient = bundle.resources().next().unwrap();
        assert!(patient.is::<Patient>());
        assert_eq!(patient.id(), Some("123"));
    }

    #[test]
    fn test_unknown_entry_does_not_abort_siblings() {
        let codec = FhirJsonCodec::r4();
        let bundle = codec.decode_value_as::<Bundle>(mixed_bundle()).unwrap().value;

        let decoded: Vec<_> = bundle.resources().map(|r| r.resource_type()).collect();
        assert_eq!(decoded, vec!["Patient", "Observation"]);

        let errors = bundle.entry_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 2);
        assert_eq!(
            errors[0].1,
            &DecodeError::UnknownResourceType {
                path: "Bundle.entry[2].resource".to_string(),
                resource_type: Some("Foo".to_string()),
            }
        );

        // failed entries are re-emitted verbatim
        assert_eq!(codec.encode_value(&bundle), mixed_bundle());
    }

    #[test]
    fn test_structural_entry_failure_is_per_entry() {
        let mut raw = mixed_bundle();
        raw["entry"][1]["resource"]
            .as_object_mut()
            .unwrap()
            .remove("status");
        let bundle = FhirJsonCodec::r4()
            .decode_value_as::<Bundle>(raw)
            .unwrap()
            .value;
        let errors = bundle.entry_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].1.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(errors[0].1.path(), Some("Bundle.entry[1].resource.status"));
        assert_eq!(bundle.resources().count(), 1);
    }

    #[test]
    fn test_failed_entry_reports_error_without_warnings() {
        let decoded = FhirJsonCodec::r4()
            .decode_value_as::<Bundle>(json!({
                "resourceType": "Bundle",
                "type": "collection",
                "entry": [
                    {"resource": {"resourceType": "Patient", "gender": "nonbinary", "birthDate": 5}},
                    {"resource": {"resourceType": "Patient", "gender": "unknown-ish"}}
                ]
            }))
            .unwrap();
        let errors = decoded.value.entry_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].1.kind(), ErrorKind::TypeMismatch);
        assert_eq!(errors[0].1.path(), Some("Bundle.entry[0].resource.birthDate"));

        // only the decoded sibling's warning survives
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(decoded.warnings[0].path(), "Bundle.entry[1].resource.gender");
    }

    #[test]
    fn test_depth_limit_aborts_whole_bundle() {
        let codec = FhirJsonCodec::r4().with_options(DecodeOptions::default().with_max_depth(4));
        let err = codec
            .decode_value(json!({
                "resourceType": "Bundle",
                "type": "collection",
                "entry": [{
                    "resource": {
                        "resourceType": "Observation",
                        "status": "final",
                        "code": {"coding": [{"system": "http://loinc.org"}]}
                    }
                }]
            }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthLimitExceeded);
    }

    #[test]
    fn test_entry_outcome() {
        let bundle = FhirJsonCodec::r4()
            .decode_value_as::<Bundle>(mixed_bundle())
            .unwrap()
            .value;
        let outcome = bundle.entry_outcome().unwrap();
        assert_eq!(outcome.issue.len(), 1);
        assert_eq!(
            outcome.issue[0].expression_paths(),
            vec!["Bundle.entry[2].resource"]
        );

        let clean = Bundle::new(BundleType::Collection);
        assert!(clean.entry_outcome().is_none());
    }

    #[test]
    fn test_build_transaction() {
        let mut bundle = Bundle::new(BundleType::Transaction);
        let mut entry = BundleEntry::new(Patient::default()).with_full_url("urn:uuid:1");
        entry.request = Some(BundleEntryRequest {
            method: Primitive::new(HttpVerb::Post),
            url: Primitive::new("Patient".to_string()),
            ..Default::default()
        });
        bundle.add_entry(entry);
        bundle.add_link("self", "http://example.org/fhir/Bundle/1");

        assert!(bundle.is_transaction());
        assert!(!bundle.is_batch());

        let codec = FhirJsonCodec::r4();
        let value = codec.encode_value(&bundle);
        assert_eq!(value["type"], "transaction");
        assert_eq!(value["entry"][0]["request"]["method"], "POST");
        assert_eq!(value["entry"][0]["resource"]["resourceType"], "Patient");

        let back = codec.decode_value_as::<Bundle>(value).unwrap().value;
        assert_eq!(back, bundle);
    }

    #[test]
    fn test_response_outcome_is_typed() {
        let bundle = FhirJsonCodec::r4()
            .decode_value_as::<Bundle>(json!({
                "resourceType": "Bundle",
                "type": "batch-response",
                "entry": [{
                    "response": {
                        "status": "400 Bad Request",
                        "outcome": {
                            "resourceType": "OperationOutcome",
                            "issue": [{"severity": "error", "code": "invalid"}]
                        }
                    }
                }]
            }))
            .unwrap()
            .value;
        let outcome = bundle.entry[0]
            .response
            .as_ref()
            .and_then(|r| r.outcome.as_ref())
            .unwrap();
        assert!(outcome.is::<OperationOutcome>());
        assert!(!outcome.is::<Observation>());
    }
}
