//! Rule-based clinical risk score.
//!
//! Additive point table over age band, symptoms, duration and history,
//! clamped to 100 and bucketed into LOW / MEDIUM / HIGH. Every contribution
//! is kept so reports can list what drove the score.
//!
//! The age bands leave 5..=45 at zero points. That gap is part of the
//! published rule table and kept as-is.
//!
//! [`contributing_factors`] names every band that scored, including the
//! 46-65 age band and the 4-7 day duration band. That is wider than the
//! printed clinical summary, which names only age over 65, age under 5 and
//! symptoms over 7 days.

use serde::Serialize;

use crate::models::{PatientInput, RiskCategory};

pub const MAX_SCORE: u32 = 100;

/// Lower bound of the MEDIUM band.
pub const MEDIUM_THRESHOLD: u32 = 30;
/// Lower bound of the HIGH band.
pub const HIGH_THRESHOLD: u32 = 60;

/// A rule in the point table that fired for this patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    AdvancedAge,
    OlderAdult,
    Pediatric,
    Fever,
    Cough,
    Dyspnea,
    ProlongedSymptoms,
    ExtendedSymptoms,
    SmokingHistory,
    ChronicLungDisease,
}

impl RiskFactor {
    pub fn points(&self) -> u32 {
        match self {
            Self::AdvancedAge => 25,
            Self::OlderAdult => 15,
            Self::Pediatric => 20,
            Self::Fever => 15,
            Self::Cough => 10,
            Self::Dyspnea => 20,
            Self::ProlongedSymptoms => 15,
            Self::ExtendedSymptoms => 10,
            Self::SmokingHistory => 10,
            Self::ChronicLungDisease => 15,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AdvancedAge => "Advanced age (>65)",
            Self::OlderAdult => "Older adult (46-65)",
            Self::Pediatric => "Pediatric (<5)",
            Self::Fever => "Fever present",
            Self::Cough => "Persistent cough",
            Self::Dyspnea => "Dyspnea",
            Self::ProlongedSymptoms => "Prolonged symptoms (>7 days)",
            Self::ExtendedSymptoms => "Symptoms for 4-7 days",
            Self::SmokingHistory => "Smoking history",
            Self::ChronicLungDisease => "Chronic lung disease",
        }
    }
}

/// Next step advised for a risk category. Ordered by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    HomeMonitoring,
    OutpatientEvaluation,
    EmergencyCare,
}

impl Recommendation {
    pub fn for_category(category: RiskCategory) -> Self {
        match category {
            RiskCategory::Low => Self::HomeMonitoring,
            RiskCategory::Medium => Self::OutpatientEvaluation,
            RiskCategory::High => Self::EmergencyCare,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::HomeMonitoring => {
                "Home monitoring advised. Seek medical evaluation if symptoms worsen."
            }
            Self::OutpatientEvaluation => {
                "Outpatient evaluation recommended. Consider diagnostic imaging."
            }
            Self::EmergencyCare => {
                "Immediate medical attention required. Emergency department assessment indicated."
            }
        }
    }
}

/// Score and category derived from a [`PatientInput`]. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub category: RiskCategory,
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    pub fn from_patient(input: &PatientInput) -> Self {
        let factors = contributing_factors(
            input.age,
            input.fever,
            input.cough,
            input.breathing_difficulty,
            input.smoker,
            input.chronic_condition,
            input.symptom_days,
        );
        let score = clamp_total(&factors);
        Self {
            score,
            category: category_for_score(score),
            factors,
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation::for_category(self.category)
    }
}

/// Rules that fire for the given inputs, in table order.
pub fn contributing_factors(
    age: u32,
    fever: bool,
    cough: bool,
    breathing_difficulty: bool,
    smoker: bool,
    chronic_condition: bool,
    symptom_days: u32,
) -> Vec<RiskFactor> {
    let mut factors = Vec::with_capacity(7);

    if age > 65 {
        factors.push(RiskFactor::AdvancedAge);
    } else if age > 45 {
        factors.push(RiskFactor::OlderAdult);
    } else if age < 5 {
        factors.push(RiskFactor::Pediatric);
    }

    if fever {
        factors.push(RiskFactor::Fever);
    }
    if cough {
        factors.push(RiskFactor::Cough);
    }
    if breathing_difficulty {
        factors.push(RiskFactor::Dyspnea);
    }

    if symptom_days > 7 {
        factors.push(RiskFactor::ProlongedSymptoms);
    } else if symptom_days > 3 {
        factors.push(RiskFactor::ExtendedSymptoms);
    }

    if smoker {
        factors.push(RiskFactor::SmokingHistory);
    }
    if chronic_condition {
        factors.push(RiskFactor::ChronicLungDisease);
    }

    factors
}

/// Clinical risk score in `0..=100`.
pub fn score(
    age: u32,
    fever: bool,
    cough: bool,
    breathing_difficulty: bool,
    smoker: bool,
    chronic_condition: bool,
    symptom_days: u32,
) -> u32 {
    clamp_total(&contributing_factors(
        age,
        fever,
        cough,
        breathing_difficulty,
        smoker,
        chronic_condition,
        symptom_days,
    ))
}

/// LOW below 30, MEDIUM below 60, HIGH from 60.
pub fn category_for_score(score: u32) -> RiskCategory {
    if score < MEDIUM_THRESHOLD {
        RiskCategory::Low
    } else if score < HIGH_THRESHOLD {
        RiskCategory::Medium
    } else {
        RiskCategory::High
    }
}

fn clamp_total(factors: &[RiskFactor]) -> u32 {
    factors
        .iter()
        .map(RiskFactor::points)
        .sum::<u32>()
        .min(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(age: u32, symptom_days: u32) -> PatientInput {
        PatientInput {
            name: "Test Patient".into(),
            age,
            symptom_days,
            ..Default::default()
        }
    }

    #[test]
    fn elderly_febrile_dyspneic_patient_is_high() {
        let input = PatientInput {
            fever: true,
            cough: true,
            breathing_difficulty: true,
            ..patient(70, 10)
        };
        let assessment = RiskAssessment::from_patient(&input);
        assert_eq!(assessment.score, 85);
        assert_eq!(assessment.category, RiskCategory::High);
    }

    #[test]
    fn healthy_adult_scores_zero() {
        let assessment = RiskAssessment::from_patient(&patient(30, 1));
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.category, RiskCategory::Low);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn febrile_toddler_is_medium() {
        let input = PatientInput {
            fever: true,
            ..patient(2, 5)
        };
        let assessment = RiskAssessment::from_patient(&input);
        assert_eq!(assessment.score, 45);
        assert_eq!(assessment.category, RiskCategory::Medium);
        assert_eq!(
            assessment.factors,
            vec![
                RiskFactor::Pediatric,
                RiskFactor::Fever,
                RiskFactor::ExtendedSymptoms
            ]
        );
    }

    #[test]
    fn middle_bands_are_listed_as_factors() {
        let factors = contributing_factors(50, false, false, false, false, false, 6);
        assert_eq!(
            factors,
            vec![RiskFactor::OlderAdult, RiskFactor::ExtendedSymptoms]
        );
        assert!(contributing_factors(30, false, false, false, false, false, 3).is_empty());
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(category_for_score(0), RiskCategory::Low);
        assert_eq!(category_for_score(29), RiskCategory::Low);
        assert_eq!(category_for_score(30), RiskCategory::Medium);
        assert_eq!(category_for_score(59), RiskCategory::Medium);
        assert_eq!(category_for_score(60), RiskCategory::High);
        assert_eq!(category_for_score(100), RiskCategory::High);
    }

    #[test]
    fn age_bands() {
        let age_points = |age| score(age, false, false, false, false, false, 0);
        assert_eq!(age_points(0), 20);
        assert_eq!(age_points(4), 20);
        assert_eq!(age_points(5), 0);
        assert_eq!(age_points(45), 0);
        assert_eq!(age_points(46), 15);
        assert_eq!(age_points(65), 15);
        assert_eq!(age_points(66), 25);
        assert_eq!(age_points(120), 25);
    }

    #[test]
    fn duration_bands() {
        let duration_points = |days| score(30, false, false, false, false, false, days);
        assert_eq!(duration_points(3), 0);
        assert_eq!(duration_points(4), 10);
        assert_eq!(duration_points(7), 10);
        assert_eq!(duration_points(8), 15);
        assert_eq!(duration_points(30), 15);
    }

    #[test]
    fn everything_present_clamps_to_100() {
        // 25 + 15 + 10 + 20 + 15 + 10 + 15 = 110
        assert_eq!(score(80, true, true, true, true, true, 14), 100);
    }

    #[test]
    fn score_stays_in_range_for_all_inputs() {
        for age in 0..=120 {
            for days in [0, 3, 4, 7, 8, 30] {
                for mask in 0u8..32 {
                    let s = score(
                        age,
                        mask & 1 != 0,
                        mask & 2 != 0,
                        mask & 4 != 0,
                        mask & 8 != 0,
                        mask & 16 != 0,
                        days,
                    );
                    assert!(s <= MAX_SCORE);
                }
            }
        }
    }

    #[test]
    fn toggling_any_flag_never_lowers_score() {
        for age in [0, 4, 30, 50, 70] {
            for days in [0, 5, 10] {
                for mask in 0u8..32 {
                    let flags = |m: u8| {
                        score(
                            age,
                            m & 1 != 0,
                            m & 2 != 0,
                            m & 4 != 0,
                            m & 8 != 0,
                            m & 16 != 0,
                            days,
                        )
                    };
                    for bit in 0..5 {
                        let without = mask & !(1 << bit);
                        let with = mask | (1 << bit);
                        assert!(flags(with) >= flags(without));
                    }
                }
            }
        }
    }

    #[test]
    fn longer_symptoms_never_lower_score() {
        for days in 0..30 {
            assert!(
                score(50, true, false, false, false, false, days + 1)
                    >= score(50, true, false, false, false, false, days)
            );
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let input = PatientInput {
            fever: true,
            smoker: true,
            ..patient(55, 6)
        };
        assert_eq!(
            RiskAssessment::from_patient(&input),
            RiskAssessment::from_patient(&input)
        );
    }

    #[test]
    fn factor_points_sum_to_unclamped_score() {
        let input = PatientInput {
            cough: true,
            chronic_condition: true,
            ..patient(50, 2)
        };
        let assessment = RiskAssessment::from_patient(&input);
        let total: u32 = assessment.factors.iter().map(RiskFactor::points).sum();
        assert_eq!(total, assessment.score);
        assert_eq!(assessment.score, 40);
    }

    #[test]
    fn recommendation_is_monotonic_in_category() {
        let tiers: Vec<Recommendation> = [RiskCategory::Low, RiskCategory::Medium, RiskCategory::High]
            .into_iter()
            .map(Recommendation::for_category)
            .collect();
        assert_eq!(
            tiers,
            vec![
                Recommendation::HomeMonitoring,
                Recommendation::OutpatientEvaluation,
                Recommendation::EmergencyCare
            ]
        );
        assert!(tiers.windows(2).all(|w| w[0] < w[1]));
    }
}
