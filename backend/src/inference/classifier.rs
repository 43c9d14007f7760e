use super::preprocess::ModelInput;
use crate::config::ModelConfig;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[cfg(feature = "torch")]
    #[error("Torch error: {0}")]
    Torch(#[from] tch::TchError),
    #[cfg(feature = "torch")]
    #[error("Model input is not contiguous")]
    NonContiguousInput,
    #[cfg(feature = "torch")]
    #[error("Model lock poisoned")]
    Poisoned,
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

/// Forward inference over a normalized batch. Returns one score per class.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &ModelInput) -> Result<Vec<f32>, ClassifierError>;
}

#[cfg(feature = "torch")]
pub use torch::TorchClassifier;

#[cfg(feature = "torch")]
mod torch {
    use super::{Classifier, ClassifierError};
    use crate::config::{DeviceKind, ModelConfig};
    use crate::inference::preprocess::ModelInput;
    use std::sync::Mutex;
    use tch::{CModule, Device, IValue, Kind, Tensor};

    /// TorchScript module taking the NHWC batch as exported.
    pub struct TorchClassifier {
        model: Mutex<CModule>,
        device: Device,
    }

    impl TorchClassifier {
        pub fn load(config: &ModelConfig) -> Result<Self, ClassifierError> {
            let device = match config.device {
                DeviceKind::Auto => Device::cuda_if_available(),
                DeviceKind::Cpu => Device::Cpu,
                DeviceKind::Cuda => Device::Cuda(0),
            };
            let mut model = CModule::load_on_device(&config.path, device)?;
            model.set_eval();
            log::info!(
                "Loaded TorchScript model {} on {:?}",
                config.path.display(),
                device
            );
            Ok(Self {
                model: Mutex::new(model),
                device,
            })
        }
    }

    impl Classifier for TorchClassifier {
        fn predict(&self, input: &ModelInput) -> Result<Vec<f32>, ClassifierError> {
            let data = input.as_slice().ok_or(ClassifierError::NonContiguousInput)?;
            let shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
            let tensor = Tensor::from_slice(data).view(shape.as_slice()).to_device(self.device);

            let output = {
                let model = self.model.lock().map_err(|_| ClassifierError::Poisoned)?;
                tch::no_grad(|| model.forward_is(&[IValue::Tensor(tensor)]))?
            };
            let output = match output {
                IValue::Tensor(t) => t,
                IValue::Tuple(mut values) if !values.is_empty() => match values.remove(0) {
                    IValue::Tensor(t) => t,
                    other => {
                        return Err(ClassifierError::Unavailable(format!(
                            "unexpected model output {:?}",
                            other
                        )));
                    }
                },
                other => {
                    return Err(ClassifierError::Unavailable(format!(
                        "unexpected model output {:?}",
                        other
                    )));
                }
            };

            let output_flat = output.to_device(Device::Cpu).to_kind(Kind::Float).view([-1]);
            let output_vec = Vec::<f32>::try_from(&output_flat)?;
            Ok(output_vec)
        }
    }
}

/// Builds the classifier configured for this binary.
#[cfg(feature = "torch")]
pub fn load_classifier(config: &ModelConfig) -> Result<Box<dyn Classifier>, ClassifierError> {
    Ok(Box::new(TorchClassifier::load(config)?))
}

#[cfg(not(feature = "torch"))]
pub fn load_classifier(config: &ModelConfig) -> Result<Box<dyn Classifier>, ClassifierError> {
    Err(ClassifierError::Unavailable(format!(
        "cannot load {} ({:?}): backend was built without the `torch` feature",
        config.path.display(),
        config.device
    )))
}

/// Rescales raw scores into probabilities.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one_and_keeps_order() {
        let probs = softmax(&[1.0, 3.0, 2.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[1] > probs[2] && probs[2] > probs[0]);
    }

    #[test]
    fn softmax_handles_large_logits() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
    }

    #[cfg(not(feature = "torch"))]
    #[test]
    fn loading_without_torch_reports_unavailable() {
        let result = load_classifier(&ModelConfig::default());
        assert!(matches!(result, Err(ClassifierError::Unavailable(_))));
    }
}
