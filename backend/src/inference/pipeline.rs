use super::classifier::{softmax, Classifier, ClassifierError};
use super::labels::Labels;
use super::preprocess::to_model_input;
use super::store::LoadError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to load classifier: {0}")]
    Load(#[from] LoadError),
    #[error("Classifier call failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Classifier returned an empty output")]
    EmptyOutput,
    #[error("Classifier returned {outputs} scores for {labels} labels")]
    LabelMismatch { outputs: usize, labels: usize },
    #[error("Classifier returned a non-finite score at index {index}")]
    NonFiniteOutput { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_label: String,
    pub confidence: f32,
    pub probabilities: Vec<f32>,
}

/// Decode, fit, normalize, classify, pick the top class.
pub struct Pipeline {
    classifier: Box<dyn Classifier>,
    labels: Labels,
    apply_softmax: bool,
}

impl Pipeline {
    pub fn new(classifier: Box<dyn Classifier>, labels: Labels) -> Self {
        Self {
            classifier,
            labels,
            apply_softmax: false,
        }
    }

    /// For models that emit logits rather than probabilities.
    pub fn with_softmax(mut self, apply_softmax: bool) -> Self {
        self.apply_softmax = apply_softmax;
        self
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn predict(&self, image_data: &[u8]) -> Result<Prediction, PipelineError> {
        let image = image::load_from_memory(image_data)?;
        let input = to_model_input(&image);

        let scores = self.classifier.predict(&input)?;
        let probabilities = if self.apply_softmax {
            softmax(&scores)
        } else {
            scores
        };

        let prediction = select(probabilities, &self.labels)?;
        log::info!(
            "Prediction: {} ({:.4})",
            prediction.class_label,
            prediction.confidence
        );
        Ok(prediction)
    }
}

/// Argmax over `probabilities`; the first index wins on ties.
pub fn select(probabilities: Vec<f32>, labels: &Labels) -> Result<Prediction, PipelineError> {
    if probabilities.is_empty() {
        return Err(PipelineError::EmptyOutput);
    }
    if probabilities.len() != labels.len() {
        return Err(PipelineError::LabelMismatch {
            outputs: probabilities.len(),
            labels: labels.len(),
        });
    }
    if let Some(index) = probabilities.iter().position(|p| !p.is_finite()) {
        return Err(PipelineError::NonFiniteOutput { index });
    }

    let mut index = 0;
    for (i, &p) in probabilities.iter().enumerate().skip(1) {
        if p > probabilities[index] {
            index = i;
        }
    }

    let class_label = labels
        .get(index)
        .map(str::to_string)
        .ok_or(PipelineError::LabelMismatch {
            outputs: probabilities.len(),
            labels: labels.len(),
        })?;
    let confidence = probabilities[index];
    Ok(Prediction {
        class_label,
        confidence,
        probabilities,
    })
}
