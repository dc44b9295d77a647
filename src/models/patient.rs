use serde::{Deserialize, Serialize};

use super::enums::Gender;
use super::ValidationError;

pub const MAX_AGE: u32 = 120;
pub const MAX_SYMPTOM_DAYS: u32 = 30;

/// Demographics and symptoms entered for one assessment.
///
/// Every field has a safe default (empty, zero or false) so a partially
/// filled form still produces a score instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientInput {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub fever: bool,
    pub cough: bool,
    pub breathing_difficulty: bool,
    pub smoker: bool,
    pub chronic_condition: bool,
    pub symptom_days: u32,
}

impl PatientInput {
    /// Check the ranges the intake form enforces.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.age > MAX_AGE {
            return Err(ValidationError::OutOfRange {
                field: "age",
                min: 0,
                max: MAX_AGE,
                value: self.age,
            });
        }
        if self.symptom_days > MAX_SYMPTOM_DAYS {
            return Err(ValidationError::OutOfRange {
                field: "symptom_days",
                min: 0,
                max: MAX_SYMPTOM_DAYS,
                value: self.symptom_days,
            });
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate) but also requires a patient name,
    /// which reports need for their title and download name.
    pub fn validate_for_report(&self) -> Result<(), ValidationError> {
        self.validate()?;
        if self.name.trim().is_empty() {
            return Err(ValidationError::Missing("name"));
        }
        Ok(())
    }

    /// Symptom and history flags in chart order, with their display labels.
    pub fn indicators(&self) -> [(&'static str, bool); 5] {
        [
            ("Fever", self.fever),
            ("Cough", self.cough),
            ("Dyspnea", self.breathing_difficulty),
            ("Smoking History", self.smoker),
            ("Chronic Disease", self.chronic_condition),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_safe_defaults() {
        let input: PatientInput = serde_json::from_str(r#"{"age": 40}"#).unwrap();
        assert_eq!(input.age, 40);
        assert_eq!(input.name, "");
        assert_eq!(input.gender, Gender::Other);
        assert!(!input.fever);
        assert_eq!(input.symptom_days, 0);
    }

    #[test]
    fn validate_accepts_range_limits() {
        let input = PatientInput {
            age: MAX_AGE,
            symptom_days: MAX_SYMPTOM_DAYS,
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn validate_rejects_age_over_limit() {
        let input = PatientInput {
            age: 121,
            ..Default::default()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::OutOfRange {
                field: "age",
                min: 0,
                max: 120,
                value: 121
            })
        );
    }

    #[test]
    fn validate_rejects_symptom_days_over_limit() {
        let input = PatientInput {
            symptom_days: 31,
            ..Default::default()
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::OutOfRange { field: "symptom_days", .. })
        ));
    }

    #[test]
    fn report_validation_requires_name() {
        let input = PatientInput {
            name: "   ".into(),
            ..Default::default()
        };
        assert_eq!(
            input.validate_for_report(),
            Err(ValidationError::Missing("name"))
        );
    }

    #[test]
    fn indicators_follow_chart_order() {
        let input = PatientInput {
            cough: true,
            chronic_condition: true,
            ..Default::default()
        };
        let flags: Vec<bool> = input.indicators().iter().map(|(_, v)| *v).collect();
        assert_eq!(flags, vec![false, true, false, false, true]);
    }
}
