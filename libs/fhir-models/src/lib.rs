//! FHIR R4 data models with a round-trip-safe JSON codec
//!
//! This crate provides strongly-typed Rust structures for FHIR resources and
//! the codec that maps them to and from the FHIR JSON representation.
//!
//! # Module Organization
//!
//! - `codec`: reader/writer primitives, choice elements, value sets and the
//!   [`FhirJsonCodec`] entry point
//! - `element`: `Element`, `BackboneElement` and `Extension`
//! - `datatypes`: general-purpose complex datatypes
//! - `resource`: resource base types, [`TypedResource`] and [`AnyResource`]
//! - `registry`: `resourceType` dispatch for `contained` and `Bundle.entry`
//! - `resources`: concrete R4 resources
//!
//! # Round-trip guarantees
//!
//! - **Unknown keys survive**: anything a type does not model is kept in its
//!   [`ExtensionBag`] and written back on encode
//! - **Primitive metadata survives**: `_field` siblings (id and extensions
//!   on a primitive) are kept next to the value, including positional
//!   `_field` arrays
//! - **Choice elements are closed**: a `value[x]` group decodes to exactly
//!   one variant, and two populated variants are an error
//! - **Unset fields stay unset**: absent optional fields are never emitted,
//!   not even as `null` or `[]`
//!
//! # Example
//!
//! ```rust
//! use ferrum_models::{FhirJsonCodec, Observation, ObservationStatus};
//!
//! let codec = FhirJsonCodec::r4();
//! let input = r#"{"resourceType":"Observation","status":"final","code":{"text":"x"},"vendorField":42}"#;
//!
//! let obs = codec.decode_str_as::<Observation>(input).unwrap().value;
//! assert_eq!(obs.status(), Some(&ObservationStatus::Final));
//! assert!(obs.base.unmodeled.contains_key("vendorField"));
//!
//! assert_eq!(codec.encode_string(&obs), input);
//! ```

#[macro_use]
mod macros;

pub mod codec;
pub mod datatypes;
pub mod element;
pub mod error;
pub mod registry;
pub mod resource;
pub mod resources;

pub use codec::{
    DecodeContext, DecodeOptions, Decoded, ExtensionBag, FhirJsonCodec, FhirType, Primitive,
    RawComplex, ValueSet,
};
pub use datatypes::*;
pub use element::{BackboneElement, Element, Extension, ExtensionValue};
pub use error::{DecodeError, DecodeWarning, ErrorKind, Result};
pub use registry::{ResourceFactory, ResourceRegistry};
pub use resource::{
    decode_resource, encode_resource, AnyResource, DomainResource, Resource, ResourceBase,
    TypedResource,
};
pub use resources::*;
