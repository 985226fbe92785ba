//! Concrete FHIR R4 resources
//!
//! Each resource is a plain struct whose `base` holds the Resource or
//! DomainResource fields. Field order in `decode_fields`/`encode_fields`
//! follows the R4 element order, so encoded output lists fields the way
//! the published R4 examples do.

/// `TypedResource` accessors for a struct whose `base` is a
/// [`DomainResource`](crate::DomainResource)
macro_rules! domain_resource_accessors {
    () => {
        fn unmodeled(&self) -> &$crate::ExtensionBag {
            &self.base.unmodeled
        }

        fn id(&self) -> Option<&str> {
            self.base.id.as_deref()
        }

        fn modifier_extensions(&self) -> &[$crate::Extension] {
            &self.base.modifier_extension
        }
    };
}

mod basic;
mod bundle;
mod claim;
mod condition;
mod encounter;
mod medication_request;
mod observation;
mod operation_outcome;
mod organization;
mod patient;
mod practitioner;

pub use basic::Basic;
pub use bundle::{
    Bundle, BundleEntry, BundleEntryRequest, BundleEntryResponse, BundleEntrySearch, BundleLink,
    BundleType, EntryResource, HttpVerb, SearchEntryMode,
};
pub use claim::{
    Claim, ClaimAccident, ClaimAccidentLocation, ClaimCareTeam, ClaimDiagnosis,
    ClaimDiagnosisValue, ClaimInsurance, ClaimItem, ClaimItemDetail, ClaimItemLocation,
    ClaimItemServiced, ClaimItemSubDetail, ClaimPayee, ClaimProcedure, ClaimProcedureValue,
    ClaimRelated, ClaimStatus, ClaimSupportingInfo, ClaimSupportingInfoTiming,
    ClaimSupportingInfoValue, ClaimUse,
};
pub use condition::{
    Condition, ConditionAbatement, ConditionEvidence, ConditionOnset, ConditionStage,
};
pub use encounter::{
    Encounter, EncounterClassHistory, EncounterDiagnosis, EncounterHospitalization,
    EncounterLocation, EncounterLocationStatus, EncounterParticipant, EncounterStatus,
    EncounterStatusHistory,
};
pub use medication_request::{
    MedicationRequest, MedicationRequestDispense, MedicationRequestInitialFill,
    MedicationRequestIntent, MedicationRequestMedication, MedicationRequestPriority,
    MedicationRequestReported, MedicationRequestStatus, MedicationRequestSubstitution,
    MedicationRequestSubstitutionAllowed,
};
pub use observation::{
    Observation, ObservationComponent, ObservationEffective, ObservationReferenceRange,
    ObservationStatus, ObservationValue,
};
pub use operation_outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
pub use organization::{Organization, OrganizationContact};
pub use patient::{
    LinkType, Patient, PatientCommunication, PatientContact, PatientDeceased, PatientLink,
    PatientMultipleBirth,
};
pub use practitioner::{Practitioner, PractitionerQualification};
