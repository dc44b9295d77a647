//! Process-wide application state.
//!
//! Holds the resolved configuration and the lazily loaded X-ray classifier.
//! The classifier is initialised at most once, behind a `OnceLock`, and is
//! read-only afterwards. A failed initialisation is remembered too: the
//! process keeps serving risk scores and reports, but refuses X-ray analysis
//! instead of retrying the load on every request.

use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::classifier::{self, ClassifierError, XrayClassifier};
use crate::config::AppConfig;

type Loader = dyn Fn(&AppConfig) -> Result<XrayClassifier, ClassifierError> + Send + Sync;

/// Classifier readiness as reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClassifierStatus {
    NotLoaded,
    Ready { backend: &'static str },
    Unavailable { reason: String },
}

pub struct CoreState {
    pub config: AppConfig,
    classifier: OnceLock<Result<Arc<XrayClassifier>, String>>,
    loader: Box<Loader>,
}

impl CoreState {
    /// State that loads the classifier from the configured weights.
    pub fn new(config: AppConfig) -> Self {
        Self::with_loader(config, classifier::load_from_config)
    }

    /// State with a custom classifier loader (tests, alternative backends).
    pub fn with_loader<F>(config: AppConfig, loader: F) -> Self
    where
        F: Fn(&AppConfig) -> Result<XrayClassifier, ClassifierError> + Send + Sync + 'static,
    {
        Self {
            config,
            classifier: OnceLock::new(),
            loader: Box::new(loader),
        }
    }

    /// Get the classifier, loading it on first use.
    ///
    /// Blocking: the first call may download weights and build the runtime
    /// session. Call from a blocking context.
    pub fn classifier(&self) -> Result<Arc<XrayClassifier>, ClassifierError> {
        let slot = self.classifier.get_or_init(|| {
            tracing::info!("Initializing X-ray classifier");
            match (self.loader)(&self.config) {
                Ok(classifier) => {
                    tracing::info!(backend = classifier.backend(), "X-ray classifier ready");
                    Ok(Arc::new(classifier))
                }
                Err(e) => {
                    tracing::error!(error = %e, "X-ray classifier failed to initialize; X-ray analysis disabled");
                    Err(e.to_string())
                }
            }
        });

        match slot {
            Ok(classifier) => Ok(Arc::clone(classifier)),
            Err(reason) => Err(ClassifierError::Unavailable(reason.clone())),
        }
    }

    pub fn classifier_status(&self) -> ClassifierStatus {
        match self.classifier.get() {
            None => ClassifierStatus::NotLoaded,
            Some(Ok(classifier)) => ClassifierStatus::Ready {
                backend: classifier.backend(),
            },
            Some(Err(reason)) => ClassifierStatus::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::testing;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_state(
        result: fn() -> Result<XrayClassifier, ClassifierError>,
    ) -> (CoreState, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let state = CoreState::with_loader(AppConfig::default(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            result()
        });
        (state, loads)
    }

    #[test]
    fn classifier_loads_once() {
        let (state, loads) = counting_state(|| Ok(testing::classifier([0.0, 1.0])));
        assert_eq!(state.classifier_status(), ClassifierStatus::NotLoaded);

        let first = state.classifier().unwrap();
        let second = state.classifier().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(
            state.classifier_status(),
            ClassifierStatus::Ready { backend: "fixed" }
        );
    }

    #[test]
    fn failed_load_is_remembered() {
        let (state, loads) = counting_state(|| Err(ClassifierError::BackendUnavailable));

        let err = state.classifier().err().unwrap();
        assert!(matches!(err, ClassifierError::Unavailable(_)));
        assert!(state.classifier().is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(matches!(
            state.classifier_status(),
            ClassifierStatus::Unavailable { .. }
        ));
    }

    #[test]
    fn concurrent_first_use_loads_once() {
        let (state, loads) = counting_state(|| Ok(testing::classifier([1.0, 0.0])));
        let state = Arc::new(state);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                std::thread::spawn(move || state.classifier().is_ok())
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
