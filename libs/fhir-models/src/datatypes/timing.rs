use super::{
    CodeableConcept, DaysOfWeek, Duration, Period, Range, Ratio, SimpleQuantity, UnitsOfTime,
};
use crate::codec::{
    complex_choice_variant, DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value,
};
use crate::element::{BackboneElement, Element};
use crate::error::Result;
use rust_decimal::Decimal;

/// An event that may occur multiple times: explicit `event` times, a
/// `repeat` rule, or a coded schedule such as `BID`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timing {
    pub base: BackboneElement,
    pub event: Vec<Primitive<String>>,
    pub repeat: Option<TimingRepeat>,
    pub code: Option<CodeableConcept>,
}

impl FhirType for Timing {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Timing {
            event: r.primitive_list("event")?,
            repeat: r.optional("repeat")?,
            code: r.optional("code")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.primitive_list("event", &self.event);
        w.optional("repeat", &self.repeat);
        w.optional("code", &self.code);
        w.finish(&self.base.unmodeled)
    }
}

choice_type! {
    /// `Timing.repeat.bounds[x]`
    pub enum TimingBounds {
        Duration(Duration),
        Range(Range),
        Period(Period),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingRepeat {
    pub base: Element,
    pub bounds: Option<TimingBounds>,
    pub count: Option<Primitive<u32>>,
    pub count_max: Option<Primitive<u32>>,
    pub duration: Option<Primitive<Decimal>>,
    pub duration_max: Option<Primitive<Decimal>>,
    pub duration_unit: Option<Primitive<UnitsOfTime>>,
    pub frequency: Option<Primitive<u32>>,
    pub frequency_max: Option<Primitive<u32>>,
    pub period: Option<Primitive<Decimal>>,
    pub period_max: Option<Primitive<Decimal>>,
    pub period_unit: Option<Primitive<UnitsOfTime>>,
    pub day_of_week: Vec<Primitive<DaysOfWeek>>,
    pub time_of_day: Vec<Primitive<String>>,
    pub when: Vec<Primitive<String>>,
    pub offset: Option<Primitive<u32>>,
}

impl FhirType for TimingRepeat {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(TimingRepeat {
            bounds: r.choice("bounds")?,
            count: r.primitive("count")?,
            count_max: r.primitive("countMax")?,
            duration: r.primitive("duration")?,
            duration_max: r.primitive("durationMax")?,
            duration_unit: r.primitive("durationUnit")?,
            frequency: r.primitive("frequency")?,
            frequency_max: r.primitive("frequencyMax")?,
            period: r.primitive("period")?,
            period_max: r.primitive("periodMax")?,
            period_unit: r.primitive("periodUnit")?,
            day_of_week: r.primitive_list("dayOfWeek")?,
            time_of_day: r.primitive_list("timeOfDay")?,
            when: r.primitive_list("when")?,
            offset: r.primitive("offset")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.choice("bounds", &self.bounds);
        w.primitive("count", &self.count);
        w.primitive("countMax", &self.count_max);
        w.primitive("duration", &self.duration);
        w.primitive("durationMax", &self.duration_max);
        w.primitive("durationUnit", &self.duration_unit);
        w.primitive("frequency", &self.frequency);
        w.primitive("frequencyMax", &self.frequency_max);
        w.primitive("period", &self.period);
        w.primitive("periodMax", &self.period_max);
        w.primitive("periodUnit", &self.period_unit);
        w.primitive_list("dayOfWeek", &self.day_of_week);
        w.primitive_list("timeOfDay", &self.time_of_day);
        w.primitive_list("when", &self.when);
        w.primitive("offset", &self.offset);
        w.finish(&self.base.unmodeled)
    }
}

choice_type! {
    /// `Dosage.asNeeded[x]`
    pub enum DosageAsNeeded {
        Boolean(Primitive<bool>),
        CodeableConcept(CodeableConcept),
    }
}

choice_type! {
    /// `Dosage.doseAndRate.dose[x]`
    pub enum DosageDose {
        Range(Range),
        Quantity(SimpleQuantity),
    }
}

choice_type! {
    /// `Dosage.doseAndRate.rate[x]`
    pub enum DosageRate {
        Ratio(Ratio),
        Range(Range),
        Quantity(SimpleQuantity),
    }
}

/// How a medication is or should be taken
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dosage {
    pub base: BackboneElement,
    pub sequence: Option<Primitive<i32>>,
    pub text: Option<Primitive<String>>,
    pub additional_instruction: Vec<CodeableConcept>,
    pub patient_instruction: Option<Primitive<String>>,
    pub timing: Option<Timing>,
    pub as_needed: Option<DosageAsNeeded>,
    pub site: Option<CodeableConcept>,
    pub route: Option<CodeableConcept>,
    pub method: Option<CodeableConcept>,
    pub dose_and_rate: Vec<DosageDoseAndRate>,
    pub max_dose_per_period: Option<Ratio>,
    pub max_dose_per_administration: Option<SimpleQuantity>,
    pub max_dose_per_lifetime: Option<SimpleQuantity>,
}

impl FhirType for Dosage {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Dosage {
            sequence: r.primitive("sequence")?,
            text: r.primitive("text")?,
            additional_instruction: r.list("additionalInstruction")?,
            patient_instruction: r.primitive("patientInstruction")?,
            timing: r.optional("timing")?,
            as_needed: r.choice("asNeeded")?,
            site: r.optional("site")?,
            route: r.optional("route")?,
            method: r.optional("method")?,
            dose_and_rate: r.list("doseAndRate")?,
            max_dose_per_period: r.optional("maxDosePerPeriod")?,
            max_dose_per_administration: r.optional("maxDosePerAdministration")?,
            max_dose_per_lifetime: r.optional("maxDosePerLifetime")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.primitive("sequence", &self.sequence);
        w.primitive("text", &self.text);
        w.list("additionalInstruction", &self.additional_instruction);
        w.primitive("patientInstruction", &self.patient_instruction);
        w.optional("timing", &self.timing);
        w.choice("asNeeded", &self.as_needed);
        w.optional("site", &self.site);
        w.optional("route", &self.route);
        w.optional("method", &self.method);
        w.list("doseAndRate", &self.dose_and_rate);
        w.optional("maxDosePerPeriod", &self.max_dose_per_period);
        w.optional("maxDosePerAdministration", &self.max_dose_per_administration);
        w.optional("maxDosePerLifetime", &self.max_dose_per_lifetime);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DosageDoseAndRate {
    pub base: Element,
    pub type_: Option<CodeableConcept>,
    pub dose: Option<DosageDose>,
    pub rate: Option<DosageRate>,
}

impl FhirType for DosageDoseAndRate {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(DosageDoseAndRate {
            type_: r.optional("type")?,
            dose: r.choice("dose")?,
            rate: r.choice("rate")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.optional("type", &self.type_);
        w.choice("dose", &self.dose);
        w.choice("rate", &self.rate);
        w.finish(&self.base.unmodeled)
    }
}

complex_choice_variant!(Timing, Dosage);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeOptions;
    use crate::error::ErrorKind;
    use crate::registry::ResourceRegistry;
    use serde_json::json;

    fn decode<T: FhirType>(value: Value) -> Result<T> {
        let registry = ResourceRegistry::new();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);
        T::decode(value, &mut ctx)
    }

    #[test]
    fn test_timing_repeat() {
        let raw = json!({
            "repeat": {
                "boundsDuration": {"value": 10, "unit": "days", "system": "http://unitsofmeasure.org", "code": "d"},
                "frequency": 2,
                "period": 1,
                "periodUnit": "d",
                "dayOfWeek": ["mon", "wed"],
                "timeOfDay": ["08:00:00", "20:00:00"]
            }
        });
        let timing: Timing = decode(raw.clone()).unwrap();
        let repeat = timing.repeat.as_ref().unwrap();
        assert!(matches!(repeat.bounds, Some(TimingBounds::Duration(_))));
        assert_eq!(repeat.day_of_week[1].value, Some(DaysOfWeek::Wed));
        assert_eq!(
            repeat.period_unit.as_ref().and_then(|u| u.value.clone()),
            Some(UnitsOfTime::Day)
        );
        assert_eq!(timing.encode(), raw);
    }

    #[test]
    fn test_dosage_dose_and_rate() {
        let raw = json!({
            "sequence": 1,
            "text": "1 tablet every 6 hours as needed",
            "asNeededBoolean": true,
            "route": {"text": "oral"},
            "doseAndRate": [{
                "doseQuantity": {"value": 1, "unit": "tablet"}
            }]
        });
        let dosage: Dosage = decode(raw.clone()).unwrap();
        assert_eq!(
            dosage.as_needed,
            Some(DosageAsNeeded::Boolean(Primitive::new(true)))
        );
        assert!(matches!(
            dosage.dose_and_rate[0].dose,
            Some(DosageDose::Quantity(_))
        ));
        assert_eq!(dosage.encode(), raw);
    }

    #[test]
    fn test_dose_choice_conflict_path() {
        let err = decode::<Dosage>(json!({
            "doseAndRate": [{
                "doseQuantity": {"value": 1},
                "doseRange": {"low": {"value": 1}}
            }]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChoiceConflict);
        assert_eq!(err.path(), Some("doseAndRate[0].dose[x]"));
    }
}
