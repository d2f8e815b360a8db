//! Conversion service holding the asynchronously loaded segmenter.

use std::future::Future;
use std::sync::OnceLock;

use tokio::sync::watch;

use crate::error::Error;
use crate::renderer::Renderer;
use crate::segmenter::Segmenter;

/// Message shown in place of output when the dictionary failed to load
pub const INIT_FAILED_MESSAGE: &str =
    "Failed to load the dictionary. Please restart and try again.";

/// Placeholder returned when conversion is requested too early
pub const NOT_READY_MESSAGE: &str = "Tokenizer is not ready.";

/// Lifecycle of the segmentation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Loading,
    Ready,
    /// Terminal; carries the load error message
    Failed(String),
}

/// State of the control that triggers a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerState {
    pub enabled: bool,
    pub label: &'static str,
}

impl From<&ServiceState> for TriggerState {
    fn from(state: &ServiceState) -> Self {
        match state {
            ServiceState::Uninitialized | ServiceState::Loading => Self {
                enabled: false,
                label: "Loading dictionary...",
            },
            ServiceState::Ready => Self {
                enabled: true,
                label: "Generate furigana",
            },
            ServiceState::Failed(_) => Self {
                enabled: false,
                label: "Dictionary unavailable",
            },
        }
    }
}

/// Owns the segmenter and renders text once it is ready.
pub struct Service<S> {
    state: watch::Sender<ServiceState>,
    segmenter: OnceLock<S>,
    renderer: Renderer,
}

impl<S: Segmenter> Service<S> {
    pub fn new(renderer: Renderer) -> Self {
        let (state, _) = watch::channel(ServiceState::Uninitialized);
        Self {
            state,
            segmenter: OnceLock::new(),
            renderer,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state.borrow().clone()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.state.subscribe()
    }

    pub fn trigger(&self) -> TriggerState {
        TriggerState::from(&*self.state.borrow())
    }

    pub fn is_ready(&self) -> bool {
        self.segmenter.get().is_some()
    }

    /// Await `build` and install its segmenter. Only the first call runs;
    /// a failure leaves the service in the terminal `Failed` state.
    pub async fn initialize<F>(&self, build: F) -> Result<(), Error>
    where
        F: Future<Output = anyhow::Result<S>>,
    {
        let started = self.state.send_if_modified(|state| {
            if *state == ServiceState::Uninitialized {
                *state = ServiceState::Loading;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(Error::AlreadyInitialized);
        }
        tracing::info!("Loading segmentation dictionary...");

        match build.await {
            Ok(segmenter) => {
                if self.segmenter.set(segmenter).is_err() {
                    return Err(Error::AlreadyInitialized);
                }
                self.state.send_replace(ServiceState::Ready);
                tracing::info!("Segmentation dictionary ready");
                Ok(())
            }
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::error!("Failed to load segmentation dictionary: {}", message);
                self.state.send_replace(ServiceState::Failed(message.clone()));
                Err(Error::ServiceInit(message))
            }
        }
    }

    /// Convert `text` to furigana markup, or fail if the segmenter is not loaded.
    pub fn try_convert(&self, text: &str) -> Result<String, Error> {
        let segmenter = self.segmenter.get().ok_or(Error::ServiceNotReady)?;
        Ok(self.renderer.render_text(segmenter, text))
    }

    /// Convert `text` to furigana markup. Before the segmenter is ready this
    /// returns a user-visible placeholder instead.
    pub fn convert(&self, text: &str) -> String {
        match self.try_convert(text) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Conversion requested: {}", e);
                NOT_READY_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tests::StubSegmenter;
    use pretty_assertions::assert_eq;

    fn service() -> Service<StubSegmenter> {
        Service::new(Renderer::default())
    }

    #[test]
    fn test_new_service_is_uninitialized() {
        let service = service();

        assert_eq!(service.state(), ServiceState::Uninitialized);
        assert!(!service.is_ready());
        assert_eq!(
            service.trigger(),
            TriggerState {
                enabled: false,
                label: "Loading dictionary...",
            }
        );
    }

    #[test]
    fn test_convert_before_ready_returns_placeholder() {
        let service = service();

        assert_eq!(service.convert("ありがとう"), NOT_READY_MESSAGE);
        assert_eq!(service.try_convert("ありがとう"), Err(Error::ServiceNotReady));
    }

    #[tokio::test]
    async fn test_initialize_success() {
        let service = service();
        let mut states = service.subscribe();

        service.initialize(async { Ok(StubSegmenter::new()) }).await.unwrap();

        assert_eq!(service.state(), ServiceState::Ready);
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), ServiceState::Ready);
        assert!(service.trigger().enabled);
        assert_eq!(service.trigger().label, "Generate furigana");
        assert_eq!(
            service.convert("ありがとう\n"),
            "<span class=\"word\">ありがとう</span><br>"
        );
    }

    #[tokio::test]
    async fn test_initialize_failure_is_terminal() {
        let service = service();

        let result = service
            .initialize(async { Err(anyhow::anyhow!("dictionary not found")) })
            .await;

        assert_eq!(result, Err(Error::ServiceInit("dictionary not found".to_string())));
        assert_eq!(service.state(), ServiceState::Failed("dictionary not found".to_string()));
        assert!(!service.trigger().enabled);
        assert_eq!(service.convert("ありがとう"), NOT_READY_MESSAGE);

        let retry = service.initialize(async { Ok(StubSegmenter::new()) }).await;
        assert_eq!(retry, Err(Error::AlreadyInitialized));
        assert!(!service.is_ready());
    }

    #[tokio::test]
    async fn test_initialize_twice() {
        let service = service();

        service.initialize(async { Ok(StubSegmenter::new()) }).await.unwrap();
        let second = service.initialize(async { Ok(StubSegmenter::new()) }).await;

        assert_eq!(second, Err(Error::AlreadyInitialized));
        assert_eq!(service.state(), ServiceState::Ready);
    }

    #[tokio::test]
    async fn test_state_is_loading_while_building() {
        let service = service();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let build = async {
            rx.await.ok();
            Ok(StubSegmenter::new())
        };
        let observe = async {
            tokio::task::yield_now().await;
            assert_eq!(service.state(), ServiceState::Loading);
            assert!(!service.trigger().enabled);
            tx.send(()).unwrap();
        };

        let (result, _) = tokio::join!(service.initialize(build), observe);
        result.unwrap();
        assert_eq!(service.state(), ServiceState::Ready);
    }
}
