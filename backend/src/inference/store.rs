use super::classifier::{load_classifier, ClassifierError};
use super::labels::{LabelError, Labels};
use super::pipeline::Pipeline;
use crate::config::ModelConfig;
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Labels(#[from] LabelError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error("Model store lock poisoned")]
    Poisoned,
}

type Loader = Box<dyn Fn() -> Result<Pipeline, LoadError> + Send + Sync>;

/// Process-wide cache of the pipeline. Loaded on first use; a failed load
/// is not cached so the next request tries again.
pub struct ModelStore {
    loader: Loader,
    loaded: Mutex<Option<Arc<Pipeline>>>,
}

impl ModelStore {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Pipeline, LoadError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            loaded: Mutex::new(None),
        }
    }

    /// Loader reading the label file and classifier named in `config`.
    pub fn from_config(config: ModelConfig) -> Self {
        Self::new(move || {
            let labels = Labels::load(&config.labels)?;
            let classifier = load_classifier(&config)?;
            Ok(Pipeline::new(classifier, labels).with_softmax(config.apply_softmax))
        })
    }

    /// Store around an already built pipeline. There is nothing to reload from.
    #[cfg(test)]
    pub fn preloaded(pipeline: Pipeline) -> Self {
        Self {
            loader: Box::new(|| {
                Err(LoadError::Classifier(ClassifierError::Unavailable(
                    "no loader for a preloaded store".into(),
                )))
            }),
            loaded: Mutex::new(Some(Arc::new(pipeline))),
        }
    }

    pub fn get(&self) -> Result<Arc<Pipeline>, LoadError> {
        let mut slot = self.loaded.lock().map_err(|_| LoadError::Poisoned)?;
        if let Some(pipeline) = slot.as_ref() {
            return Ok(pipeline.clone());
        }

        log::info!("Loading classifier");
        let pipeline = Arc::new((self.loader)()?);
        *slot = Some(pipeline.clone());
        Ok(pipeline)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::pipeline::tests::{labels, FixedClassifier};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn loads_once_and_caches() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let store = ModelStore::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Pipeline::new(Box::new(FixedClassifier::new(vec![1.0, 0.0])), labels()))
        });

        assert!(!store.is_loaded());
        let first = store.get().unwrap();
        let second = store.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(store.is_loaded());
    }

    #[test]
    fn failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let store = ModelStore::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ClassifierError::Unavailable("missing model".into()).into())
            } else {
                Ok(Pipeline::new(Box::new(FixedClassifier::new(vec![1.0, 0.0])), labels()))
            }
        });

        assert!(matches!(store.get(), Err(LoadError::Classifier(_))));
        assert!(!store.is_loaded());
        assert!(store.get().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_label_file_is_a_load_error() {
        let config = ModelConfig {
            labels: std::env::temp_dir().join(format!("no-labels-{}.txt", uuid::Uuid::new_v4())),
            ..ModelConfig::default()
        };
        let store = ModelStore::from_config(config);
        assert!(matches!(store.get(), Err(LoadError::Labels(_))));
    }

    #[test]
    fn preloaded_store_serves_its_pipeline() {
        let store = ModelStore::preloaded(Pipeline::new(
            Box::new(FixedClassifier::new(vec![1.0, 0.0])),
            labels(),
        ));
        assert!(store.is_loaded());
        let first = store.get().unwrap();
        assert!(Arc::ptr_eq(&first, &store.get().unwrap()));
    }
}
