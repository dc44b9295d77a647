use serde::{Deserialize, Serialize};

use super::enums::XrayLabel;

/// Classifier verdict for one image. Probabilities are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePrediction {
    pub label: XrayLabel,
    /// Probability of `label`, 0–100.
    pub confidence: f32,
    pub normal_probability: f32,
    pub pneumonia_probability: f32,
}

impl ImagePrediction {
    /// Build a prediction from the two raw network logits
    /// (`[normal, pneumonia]`) via a numerically stable softmax.
    ///
    /// Ties go to the first class, matching an argmax that returns the
    /// lowest index.
    pub fn from_logits(logits: [f32; 2]) -> Self {
        let max = logits[0].max(logits[1]);
        let exps = [(logits[0] - max).exp(), (logits[1] - max).exp()];
        let sum = exps[0] + exps[1];
        let probs = [exps[0] / sum, exps[1] / sum];

        let index = if probs[1] > probs[0] { 1 } else { 0 };

        Self {
            label: XrayLabel::CLASSES[index],
            confidence: probs[index] * 100.0,
            normal_probability: probs[0] * 100.0,
            pneumonia_probability: probs[1] * 100.0,
        }
    }

    /// Plain-language reading of the verdict for display next to the numbers.
    pub fn interpretation(&self) -> &'static str {
        match self.label {
            XrayLabel::Pneumonia if self.confidence > 90.0 => {
                "High confidence detection. Immediate clinical correlation recommended."
            }
            XrayLabel::Pneumonia if self.confidence > 70.0 => {
                "Moderate confidence. Additional diagnostic workup advised."
            }
            XrayLabel::Pneumonia => "Possible finding. Further evaluation recommended.",
            XrayLabel::Normal if self.confidence > 90.0 => {
                "High confidence normal. Low probability of pneumonia."
            }
            XrayLabel::Normal => {
                "Appears normal. Clinical correlation recommended if symptomatic."
            }
        }
    }
}
