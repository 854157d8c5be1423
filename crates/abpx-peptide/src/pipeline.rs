//! Prediction pipeline: sequences → features → classifier → predictions.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::classifier::Classifier;
use crate::error::{PeptideError, Result};
use crate::features::FeatureExtractor;
use crate::sequence::validate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// 1 = antibacterial
    pub label: u8,
    /// Probability of the antibacterial class
    pub probability: f64,
}

/// Outcome for one submitted entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Predicted(Prediction),
    Invalid { reason: String },
}

/// A submitted entry with its 1-based input position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenedPeptide {
    pub index: usize,
    pub sequence: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl ScreenedPeptide {
    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.verdict {
            Verdict::Predicted(p) => Some(p),
            Verdict::Invalid { .. } => None,
        }
    }
}

pub struct PredictionPipeline {
    extractor: FeatureExtractor,
    classifier: Arc<dyn Classifier>,
}

impl PredictionPipeline {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self::with_extractor(FeatureExtractor::default(), classifier)
    }

    pub fn with_extractor(extractor: FeatureExtractor, classifier: Arc<dyn Classifier>) -> Self {
        Self { extractor, classifier }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// One prediction per sequence, in input order.
    ///
    /// Every sequence must be valid; the first invalid one aborts the batch.
    pub fn predict<S: AsRef<str>>(&self, sequences: &[S]) -> Result<Vec<Prediction>> {
        if sequences.is_empty() {
            return Err(PeptideError::EmptyInput);
        }
        for s in sequences {
            validate(s.as_ref())?;
        }

        let rows = self.extractor.extract(sequences)?;
        let labels = self.classifier.predict(&rows)?;
        let proba = self.classifier.predict_proba(&rows)?;

        if labels.len() != rows.len() || proba.len() != rows.len() {
            return Err(PeptideError::Classifier(format!(
                "expected {} outputs, got {} labels and {} probabilities",
                rows.len(),
                labels.len(),
                proba.len()
            )));
        }

        labels
            .into_iter()
            .zip(proba)
            .map(|(label, [_, positive])| {
                if label > 1 || !(0.0..=1.0).contains(&positive) {
                    return Err(PeptideError::Classifier(format!(
                        "out-of-range output: label {label}, probability {positive}"
                    )));
                }
                Ok(Prediction { label, probability: positive })
            })
            .collect()
    }

    /// Validate every entry, predict the valid ones, and report each entry in place.
    ///
    /// Invalid entries do not stop the others. Fails only on empty input or a
    /// classifier fault.
    pub fn screen<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<ScreenedPeptide>> {
        if inputs.is_empty() {
            return Err(PeptideError::EmptyInput);
        }

        let checks: Vec<std::result::Result<(), PeptideError>> =
            inputs.iter().map(|input| validate(input.as_ref())).collect();

        let batch: Vec<&str> = inputs
            .iter()
            .zip(&checks)
            .filter(|(_, check)| check.is_ok())
            .map(|(input, _)| input.as_ref())
            .collect();
        let mut predictions = if batch.is_empty() {
            Vec::new().into_iter()
        } else {
            self.predict(&batch)?.into_iter()
        };

        let mut screened = Vec::with_capacity(inputs.len());
        for (i, (input, check)) in inputs.iter().zip(checks).enumerate() {
            let verdict = match check {
                Ok(()) => {
                    let prediction = predictions.next().ok_or_else(|| {
                        PeptideError::Classifier("fewer predictions than valid entries".into())
                    })?;
                    Verdict::Predicted(prediction)
                }
                Err(e) => {
                    warn!("Entry {} rejected: {}", i + 1, e);
                    Verdict::Invalid { reason: e.to_string() }
                }
            };
            screened.push(ScreenedPeptide {
                index: i + 1,
                sequence: input.as_ref().to_string(),
                verdict,
            });
        }

        debug!(
            "Screened {} entries, {} predicted",
            screened.len(),
            screened.iter().filter(|s| s.prediction().is_some()).count()
        );
        Ok(screened)
    }
}
