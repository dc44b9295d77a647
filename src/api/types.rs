//! Shared state and response shapes for the HTTP layer.

use std::sync::Arc;

use serde::Serialize;

use crate::core_state::{ClassifierStatus, CoreState};
use crate::models::{ImagePrediction, RiskCategory};
use crate::risk::{Recommendation, RiskAssessment, RiskFactor};

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub classifier: ClassifierStatus,
}

#[derive(Debug, Serialize)]
pub struct FactorView {
    pub factor: RiskFactor,
    pub label: &'static str,
    pub points: u32,
}

#[derive(Debug, Serialize)]
pub struct RiskResponse {
    pub score: u32,
    pub category: RiskCategory,
    pub recommendation: Recommendation,
    pub message: &'static str,
    pub factors: Vec<FactorView>,
}

impl From<&RiskAssessment> for RiskResponse {
    fn from(assessment: &RiskAssessment) -> Self {
        let recommendation = assessment.recommendation();
        Self {
            score: assessment.score,
            category: assessment.category,
            recommendation,
            message: recommendation.message(),
            factors: assessment
                .factors
                .iter()
                .map(|&factor| FactorView {
                    factor,
                    label: factor.label(),
                    points: factor.points(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct XrayResponse {
    #[serde(flatten)]
    pub prediction: ImagePrediction,
    pub interpretation: &'static str,
}

impl From<ImagePrediction> for XrayResponse {
    fn from(prediction: ImagePrediction) -> Self {
        Self {
            interpretation: prediction.interpretation(),
            prediction,
        }
    }
}
