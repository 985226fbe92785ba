use crate::codec::{DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value};
use crate::datatypes::{
    Address, Attachment, CodeableConcept, Identifier, Money, Period, Quantity, Reference,
    SimpleQuantity,
};
use crate::element::BackboneElement;
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};
use rust_decimal::Decimal;

value_set! {
    pub enum ClaimStatus("http://hl7.org/fhir/ValueSet/fm-status") {
        Active = "active",
        Cancelled = "cancelled",
        Draft = "draft",
        EnteredInError = "entered-in-error",
    }
}

value_set! {
    /// Whether the request is a claim, a pre-authorization or a
    /// pre-determination
    pub enum ClaimUse("http://hl7.org/fhir/ValueSet/claim-use") {
        Claim = "claim",
        Preauthorization = "preauthorization",
        Predetermination = "predetermination",
    }
}

choice_type! {
    /// `Claim.supportingInfo.timing[x]`
    pub enum ClaimSupportingInfoTiming {
        Date(Primitive<String>),
        Period(Period),
    }
}

choice_type! {
    /// `Claim.supportingInfo.value[x]`
    pub enum ClaimSupportingInfoValue {
        Boolean(Primitive<bool>),
        String(Primitive<String>),
        Quantity(Quantity),
        Attachment(Attachment),
        Reference(Reference),
    }
}

choice_type! {
    /// `Claim.diagnosis.diagnosis[x]`
    pub enum ClaimDiagnosisValue {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

choice_type! {
    /// `Claim.procedure.procedure[x]`
    pub enum ClaimProcedureValue {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

choice_type! {
    /// `Claim.accident.location[x]`
    pub enum ClaimAccidentLocation {
        Address(Address),
        Reference(Reference),
    }
}

choice_type! {
    /// `Claim.item.serviced[x]`
    pub enum ClaimItemServiced {
        Date(Primitive<String>),
        Period(Period),
    }
}

choice_type! {
    /// `Claim.item.location[x]`
    pub enum ClaimItemLocation {
        CodeableConcept(CodeableConcept),
        Address(Address),
        Reference(Reference),
    }
}

/// A provider-issued list of professional services and products which have
/// been provided, or are to be provided, to a patient
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claim {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// Business Identifier for claim
    pub identifier: Vec<Identifier>,

    /// active | cancelled | draft | entered-in-error
    pub status: Primitive<ClaimStatus>,

    /// Category or discipline
    pub type_: CodeableConcept,

    /// More granular claim type
    pub sub_type: Option<CodeableConcept>,

    /// claim | preauthorization | predetermination
    pub use_: Primitive<ClaimUse>,

    /// The recipient of the products and services
    pub patient: Reference,

    /// Relevant time frame for the claim
    pub billable_period: Option<Period>,

    /// Resource creation date
    pub created: Primitive<String>,

    /// Author of the claim
    pub enterer: Option<Reference>,

    /// Target
    pub insurer: Option<Reference>,

    /// Party responsible for the claim
    pub provider: Reference,

    /// Desired processing ugency
    pub priority: CodeableConcept,

    /// For whom to reserve funds
    pub funds_reserve: Option<CodeableConcept>,

    /// Prior or corollary claims
    pub related: Vec<ClaimRelated>,

    /// Prescription authorizing services and products
    pub prescription: Option<Reference>,

    /// Original prescription if superseded by fulfiller
    pub original_prescription: Option<Reference>,

    /// Recipient of benefits payable
    pub payee: Option<ClaimPayee>,

    /// Treatment referral
    pub referral: Option<Reference>,

    /// Servicing facility
    pub facility: Option<Reference>,

    /// Members of the care team
    pub care_team: Vec<ClaimCareTeam>,

    /// Supporting information
    pub supporting_info: Vec<ClaimSupportingInfo>,

    /// Pertinent diagnosis information
    pub diagnosis: Vec<ClaimDiagnosis>,

    /// Clinical procedures performed
    pub procedure: Vec<ClaimProcedure>,

    /// Patient insurance information
    pub insurance: Vec<ClaimInsurance>,

    /// Details of the event
    pub accident: Option<ClaimAccident>,

    /// Product or service provided
    pub item: Vec<ClaimItem>,

    /// Total claim cost
    pub total: Option<Money>,
}

impl Claim {
    pub fn status(&self) -> Option<&ClaimStatus> {
        self.status.value()
    }

    /// The insurance marked `focal`, i.e. the one to adjudicate this claim
    /// against
    pub fn focal_insurance(&self) -> Option<&ClaimInsurance> {
        self.insurance
            .iter()
            .find(|i| i.focal.value() == Some(&true))
    }

    /// Sum of the item `net` amounts, when every item carries one
    pub fn item_net_total(&self) -> Option<Decimal> {
        self.item
            .iter()
            .map(|item| item.net.as_ref().and_then(Money::amount))
            .sum()
    }
}

impl TypedResource for Claim {
    const RESOURCE_TYPE: &'static str = "Claim";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Claim {
            identifier: r.list("identifier")?,
            status: r.required_primitive("status")?,
            type_: r.required("type")?,
            sub_type: r.optional("subType")?,
            use_: r.required_primitive("use")?,
            patient: r.required("patient")?,
            billable_period: r.optional("billablePeriod")?,
            created: r.required_primitive("created")?,
            enterer: r.optional("enterer")?,
            insurer: r.optional("insurer")?,
            provider: r.required("provider")?,
            priority: r.required("priority")?,
            funds_reserve: r.optional("fundsReserve")?,
            related: r.list("related")?,
            prescription: r.optional("prescription")?,
            original_prescription: r.optional("originalPrescription")?,
            payee: r.optional("payee")?,
            referral: r.optional("referral")?,
            facility: r.optional("facility")?,
            care_team: r.list("careTeam")?,
            supporting_info: r.list("supportingInfo")?,
            diagnosis: r.list("diagnosis")?,
            procedure: r.list("procedure")?,
            insurance: r.required_list("insurance")?,
            accident: r.optional("accident")?,
            item: r.list("item")?,
            total: r.optional("total")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.required_primitive("status", &self.status);
        w.value("type", &self.type_);
        w.optional("subType", &self.sub_type);
        w.required_primitive("use", &self.use_);
        w.value("patient", &self.patient);
        w.optional("billablePeriod", &self.billable_period);
        w.required_primitive("created", &self.created);
        w.optional("enterer", &self.enterer);
        w.optional("insurer", &self.insurer);
        w.value("provider", &self.provider);
        w.value("priority", &self.priority);
        w.optional("fundsReserve", &self.funds_reserve);
        w.list("related", &self.related);
        w.optional("prescription", &self.prescription);
        w.optional("originalPrescription", &self.original_prescription);
        w.optional("payee", &self.payee);
        w.optional("referral", &self.referral);
        w.optional("facility", &self.facility);
        w.list("careTeam", &self.care_team);
        w.list("supportingInfo", &self.supporting_info);
        w.list("diagnosis", &self.diagnosis);
        w.list("procedure", &self.procedure);
        w.list("insurance", &self.insurance);
        w.optional("accident", &self.accident);
        w.list("item", &self.item);
        w.optional("total", &self.total);
    }

    domain_resource_accessors!();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimRelated {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Reference to the related claim
    pub claim: Option<Reference>,

    /// How the reference claim is related
    pub relationship: Option<CodeableConcept>,

    /// File or case reference
    pub reference: Option<Identifier>,
}

impl FhirType for ClaimRelated {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimRelated {
            claim: r.optional("claim")?,
            relationship: r.optional("relationship")?,
            reference: r.optional("reference")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.optional("claim", &self.claim);
        w.optional("relationship", &self.relationship);
        w.optional("reference", &self.reference);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimPayee {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Category of recipient
    pub type_: CodeableConcept,

    /// Recipient reference
    pub party: Option<Reference>,
}

impl FhirType for ClaimPayee {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimPayee {
            type_: r.required("type")?,
            party: r.optional("party")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.value("type", &self.type_);
        w.optional("party", &self.party);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimCareTeam {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Order of care team
    pub sequence: Primitive<u32>,

    /// Practitioner or organization
    pub provider: Reference,

    /// Indicator of the lead practitioner
    pub responsible: Option<Primitive<bool>>,

    /// Function within the team
    pub role: Option<CodeableConcept>,

    /// Practitioner credential or specialization
    pub qualification: Option<CodeableConcept>,
}

impl FhirType for ClaimCareTeam {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimCareTeam {
            sequence: r.required_primitive("sequence")?,
            provider: r.required("provider")?,
            responsible: r.primitive("responsible")?,
            role: r.optional("role")?,
            qualification: r.optional("qualification")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("sequence", &self.sequence);
        w.value("provider", &self.provider);
        w.primitive("responsible", &self.responsible);
        w.optional("role", &self.role);
        w.optional("qualification", &self.qualification);
        w.finish(&self.base.unmodeled)
    }
}

/// Additional information codes regarding exceptions, special
/// considerations, the condition, situation, prior or concurrent issues
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSupportingInfo {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Information instance identifier
    pub sequence: Primitive<u32>,

    /// Classification of the supplied information
    pub category: CodeableConcept,

    /// Type of information
    pub code: Option<CodeableConcept>,

    /// When it occurred
    pub timing: Option<ClaimSupportingInfoTiming>,

    /// Data to be provided
    pub value: Option<ClaimSupportingInfoValue>,

    /// Explanation for the information
    pub reason: Option<CodeableConcept>,
}

impl FhirType for ClaimSupportingInfo {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimSupportingInfo {
            sequence: r.required_primitive("sequence")?,
            category: r.required("category")?,
            code: r.optional("code")?,
            timing: r.choice("timing")?,
            value: r.choice("value")?,
            reason: r.optional("reason")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("sequence", &self.sequence);
        w.value("category", &self.category);
        w.optional("code", &self.code);
        w.choice("timing", &self.timing);
        w.choice("value", &self.value);
        w.optional("reason", &self.reason);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimDiagnosis {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Diagnosis instance identifier
    pub sequence: Primitive<u32>,

    /// Nature of illness or problem
    pub diagnosis: Option<ClaimDiagnosisValue>,

    /// Timing or nature of the diagnosis
    pub type_: Vec<CodeableConcept>,

    /// Present on admission
    pub on_admission: Option<CodeableConcept>,

    /// Package billing code
    pub package_code: Option<CodeableConcept>,
}

impl FhirType for ClaimDiagnosis {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimDiagnosis {
            sequence: r.required_primitive("sequence")?,
            diagnosis: Some(r.required_choice("diagnosis")?),
            type_: r.list("type")?,
            on_admission: r.optional("onAdmission")?,
            package_code: r.optional("packageCode")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("sequence", &self.sequence);
        w.choice("diagnosis", &self.diagnosis);
        w.list("type", &self.type_);
        w.optional("onAdmission", &self.on_admission);
        w.optional("packageCode", &self.package_code);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimProcedure {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Procedure instance identifier
    pub sequence: Primitive<u32>,

    /// Category of Procedure
    pub type_: Vec<CodeableConcept>,

    /// When the procedure was performed
    pub date: Option<Primitive<String>>,

    /// Specific clinical procedure
    pub procedure: Option<ClaimProcedureValue>,

    /// Unique device identifier
    pub udi: Vec<Reference>,
}

impl FhirType for ClaimProcedure {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimProcedure {
            sequence: r.required_primitive("sequence")?,
            type_: r.list("type")?,
            date: r.primitive("date")?,
            procedure: Some(r.required_choice("procedure")?),
            udi: r.list("udi")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("sequence", &self.sequence);
        w.list("type", &self.type_);
        w.primitive("date", &self.date);
        w.choice("procedure", &self.procedure);
        w.list("udi", &self.udi);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimInsurance {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Insurance instance identifier
    pub sequence: Primitive<u32>,

    /// Coverage to be used for adjudication
    pub focal: Primitive<bool>,

    /// Pre-assigned Claim number
    pub identifier: Option<Identifier>,

    /// Insurance information
    pub coverage: Reference,

    /// Additional provider contract number
    pub business_arrangement: Option<Primitive<String>>,

    /// Prior authorization reference number
    pub pre_auth_ref: Vec<Primitive<String>>,

    /// Adjudication results
    pub claim_response: Option<Reference>,
}

impl FhirType for ClaimInsurance {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimInsurance {
            sequence: r.required_primitive("sequence")?,
            focal: r.required_primitive("focal")?,
            identifier: r.optional("identifier")?,
            coverage: r.required("coverage")?,
            business_arrangement: r.primitive("businessArrangement")?,
            pre_auth_ref: r.primitive_list("preAuthRef")?,
            claim_response: r.optional("claimResponse")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("sequence", &self.sequence);
        w.required_primitive("focal", &self.focal);
        w.optional("identifier", &self.identifier);
        w.value("coverage", &self.coverage);
        w.primitive("businessArrangement", &self.business_arrangement);
        w.primitive_list("preAuthRef", &self.pre_auth_ref);
        w.optional("claimResponse", &self.claim_response);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimAccident {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// When the incident occurred
    pub date: Primitive<String>,

    /// The nature of the accident
    pub type_: Option<CodeableConcept>,

    /// Where the event occurred
    pub location: Option<ClaimAccidentLocation>,
}

impl FhirType for ClaimAccident {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimAccident {
            date: r.required_primitive("date")?,
            type_: r.optional("type")?,
            location: r.choice("location")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("date", &self.date);
        w.optional("type", &self.type_);
        w.choice("location", &self.location);
        w.finish(&self.base.unmodeled)
    }
}

/// A claim line: a product or service billed together with its pricing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimItem {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Item instance identifier
    pub sequence: Primitive<u32>,

    /// Applicable careTeam members
    pub care_team_sequence: Vec<Primitive<u32>>,

    /// Applicable diagnoses
    pub diagnosis_sequence: Vec<Primitive<u32>>,

    /// Applicable procedures
    pub procedure_sequence: Vec<Primitive<u32>>,

    /// Applicable exception and supporting information
    pub information_sequence: Vec<Primitive<u32>>,

    /// Revenue or cost center code
    pub revenue: Option<CodeableConcept>,

    /// Benefit classification
    pub category: Option<CodeableConcept>,

    /// Billing, service, product, or drug code
    pub product_or_service: CodeableConcept,

    /// Service or product billing modifiers
    pub modifier: Vec<CodeableConcept>,

    /// Program the product or service is provided under
    pub program_code: Vec<CodeableConcept>,

    /// Date or dates of service or product delivery
    pub serviced: Option<ClaimItemServiced>,

    /// Place of service or where product was supplied
    pub location: Option<ClaimItemLocation>,

    /// Count of products or services
    pub quantity: Option<SimpleQuantity>,

    /// Fee, charge or cost per item
    pub unit_price: Option<Money>,

    /// Price scaling factor
    pub factor: Option<Primitive<Decimal>>,

    /// Total item cost
    pub net: Option<Money>,

    /// Unique device identifier
    pub udi: Vec<Reference>,

    /// Anatomical location
    pub body_site: Option<CodeableConcept>,

    /// Anatomical sub-location
    pub sub_site: Vec<CodeableConcept>,

    /// Encounters related to this billed item
    pub encounter: Vec<Reference>,

    /// Product or service provided
    pub detail: Vec<ClaimItemDetail>,
}

impl FhirType for ClaimItem {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimItem {
            sequence: r.required_primitive("sequence")?,
            care_team_sequence: r.primitive_list("careTeamSequence")?,
            diagnosis_sequence: r.primitive_list("diagnosisSequence")?,
            procedure_sequence: r.primitive_list("procedureSequence")?,
            information_sequence: r.primitive_list("informationSequence")?,
            revenue: r.optional("revenue")?,
            category: r.optional("category")?,
            product_or_service: r.required("productOrService")?,
            modifier: r.list("modifier")?,
            program_code: r.list("programCode")?,
            serviced: r.choice("serviced")?,
            location: r.choice("location")?,
            quantity: r.optional("quantity")?,
            unit_price: r.optional("unitPrice")?,
            factor: r.primitive("factor")?,
            net: r.optional("net")?,
            udi: r.list("udi")?,
            body_site: r.optional("bodySite")?,
            sub_site: r.list("subSite")?,
            encounter: r.list("encounter")?,
            detail: r.list("detail")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("sequence", &self.sequence);
        w.primitive_list("careTeamSequence", &self.care_team_sequence);
        w.primitive_list("diagnosisSequence", &self.diagnosis_sequence);
        w.primitive_list("procedureSequence", &self.procedure_sequence);
        w.primitive_list("informationSequence", &self.information_sequence);
        w.optional("revenue", &self.revenue);
        w.optional("category", &self.category);
        w.value("productOrService", &self.product_or_service);
        w.list("modifier", &self.modifier);
        w.list("programCode", &self.program_code);
        w.choice("serviced", &self.serviced);
        w.choice("location", &self.location);
        w.optional("quantity", &self.quantity);
        w.optional("unitPrice", &self.unit_price);
        w.primitive("factor", &self.factor);
        w.optional("net", &self.net);
        w.list("udi", &self.udi);
        w.optional("bodySite", &self.body_site);
        w.list("subSite", &self.sub_site);
        w.list("encounter", &self.encounter);
        w.list("detail", &self.detail);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimItemDetail {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Item instance identifier
    pub sequence: Primitive<u32>,

    /// Revenue or cost center code
    pub revenue: Option<CodeableConcept>,

    /// Benefit classification
    pub category: Option<CodeableConcept>,

    /// Billing, service, product, or drug code
    pub product_or_service: CodeableConcept,

    /// Service or product billing modifiers
    pub modifier: Vec<CodeableConcept>,

    /// Program the product or service is provided under
    pub program_code: Vec<CodeableConcept>,

    /// Count of products or services
    pub quantity: Option<SimpleQuantity>,

    /// Fee, charge or cost per item
    pub unit_price: Option<Money>,

    /// Price scaling factor
    pub factor: Option<Primitive<Decimal>>,

    /// Total item cost
    pub net: Option<Money>,

    /// Unique device identifier
    pub udi: Vec<Reference>,

    /// Product or service provided
    pub sub_detail: Vec<ClaimItemSubDetail>,
}

impl FhirType for ClaimItemDetail {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimItemDetail {
            sequence: r.required_primitive("sequence")?,
            revenue: r.optional("revenue")?,
            category: r.optional("category")?,
            product_or_service: r.required("productOrService")?,
            modifier: r.list("modifier")?,
            program_code: r.list("programCode")?,
            quantity: r.optional("quantity")?,
            unit_price: r.optional("unitPrice")?,
            factor: r.primitive("factor")?,
            net: r.optional("net")?,
            udi: r.list("udi")?,
            sub_detail: r.list("subDetail")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("sequence", &self.sequence);
        w.optional("revenue", &self.revenue);
        w.optional("category", &self.category);
        w.value("productOrService", &self.product_or_service);
        w.list("modifier", &self.modifier);
        w.list("programCode", &self.program_code);
        w.optional("quantity", &self.quantity);
        w.optional("unitPrice", &self.unit_price);
        w.primitive("factor", &self.factor);
        w.optional("net", &self.net);
        w.list("udi", &self.udi);
        w.list("subDetail", &self.sub_detail);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimItemSubDetail {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Item instance identifier
    pub sequence: Primitive<u32>,

    /// Revenue or cost center code
    pub revenue: Option<CodeableConcept>,

    /// Benefit classification
    pub category: Option<CodeableConcept>,

    /// Billing, service, product, or drug code
    pub product_or_service: CodeableConcept,

    /// Service or product billing modifiers
    pub modifier: Vec<CodeableConcept>,

    /// Program the product or service is provided under
    pub program_code: Vec<CodeableConcept>,

    /// Count of products or services
    pub quantity: Option<SimpleQuantity>,

    /// Fee, charge or cost per item
    pub unit_price: Option<Money>,

    /// Price scaling factor
    pub factor: Option<Primitive<Decimal>>,

    /// Total item cost
    pub net: Option<Money>,

    /// Unique device identifier
    pub udi: Vec<Reference>,
}

impl FhirType for ClaimItemSubDetail {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ClaimItemSubDetail {
            sequence: r.required_primitive("sequence")?,
            revenue: r.optional("revenue")?,
            category: r.optional("category")?,
            product_or_service: r.required("productOrService")?,
            modifier: r.list("modifier")?,
            program_code: r.list("programCode")?,
            quantity: r.optional("quantity")?,
            unit_price: r.optional("unitPrice")?,
            factor: r.primitive("factor")?,
            net: r.optional("net")?,
            udi: r.list("udi")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("sequence", &self.sequence);
        w.optional("revenue", &self.revenue);
        w.optional("category", &self.category);
        w.value("productOrService", &self.product_or_service);
        w.list("modifier", &self.modifier);
        w.list("programCode", &self.program_code);
        w.optional("quantity", &self.quantity);
        w.optional("unitPrice", &self.unit_price);
        w.primitive("factor", &self.factor);
        w.optional("net", &self.net);
        w.list("udi", &self.udi);
        w.finish(&self.base.unmodeled)
    }
}
