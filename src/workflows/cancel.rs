use std::sync::{Arc, Mutex};

use log::warn;

use crate::controller::ScreenController;
use crate::screens::ScreenName;

#[derive(Debug, Clone, Default)]
pub struct CancelScreenState {
    /// The reason prompt opens once a code has been decoded.
    pub prompt_open: bool,
    pub error: Option<String>,
    /// Backend status message surfaced after submission.
    pub result_message: Option<String>,
}

/// Cancel-visit workflow: scan → reason prompt → cancel call → status
/// message and return to the entry screen.
pub struct CancelFlow {
    controller: ScreenController,
    epoch: u64,
    code: Mutex<Option<String>>,
    state: Mutex<CancelScreenState>,
}

impl CancelFlow {
    pub async fn mount(controller: ScreenController) -> Arc<Self> {
        let epoch = controller.epoch().await;
        let flow = Arc::new(Self {
            controller: controller.clone(),
            epoch,
            code: Mutex::new(None),
            state: Mutex::new(CancelScreenState::default()),
        });

        let decode_target = flow.clone();
        let scan = controller
            .start_scan(Box::new(move |text| {
                decode_target.handle_decode(text);
            }))
            .await;
        if let Err(err) = scan {
            warn!("cancel-visit scanner did not start: {err}");
            flow.state.lock().unwrap().error = Some(err.inline_message());
        }

        flow
    }

    /// No backend call on decode; the reason prompt opens first.
    pub fn handle_decode(&self, code: String) {
        *self.code.lock().unwrap() = Some(code);
        self.state.lock().unwrap().prompt_open = true;
    }

    /// Submit the cancellation. An empty reason blocks with an inline message
    /// and no remote call is made. The backend's status message is surfaced
    /// and the flow returns to the entry screen; only a transport failure
    /// keeps the visitor on the screen.
    pub async fn submit(&self, reason: &str) {
        if reason.trim().is_empty() {
            self.state.lock().unwrap().error =
                Some("Please enter a reason for cancellation".to_string());
            return;
        }
        let Some(code) = self.code.lock().unwrap().clone() else {
            return;
        };

        let result = self.controller.backend().cancel_visit(&code, reason).await;

        if !self.controller.is_current(self.epoch).await {
            return;
        }

        match result {
            Ok(response) => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.error = None;
                    state.result_message = response.message;
                }
                if let Err(err) = self
                    .controller
                    .show_screen(ScreenName::Welcome.as_str())
                    .await
                {
                    warn!("cancel-visit could not return to entry screen: {err}");
                }
            }
            Err(err) => {
                self.state.lock().unwrap().error = Some(err.inline_message());
            }
        }
    }

    pub fn snapshot(&self) -> CancelScreenState {
        self.state.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::WorkflowResponse;
    use crate::error::{KioskError, GENERIC_ERROR};
    use crate::screens::MemoryScreenStore;
    use crate::testing::{test_config, FakeBackend, ScriptedCamera};

    async fn flow_on_cancel_screen(backend: Arc<FakeBackend>) -> (ScreenController, Arc<CancelFlow>) {
        let config = test_config();
        let controller = ScreenController::new(
            &config,
            backend,
            Arc::new(ScriptedCamera::silent()),
            Arc::new(MemoryScreenStore::new()),
        );
        controller.start().await.unwrap();
        controller.show_screen("CancelVisit").await.unwrap();
        let flow = CancelFlow::mount(controller.clone()).await;
        (controller, flow)
    }

    #[tokio::test]
    async fn empty_reason_blocks_without_remote_call() {
        let backend = Arc::new(FakeBackend::default());
        let (controller, flow) = flow_on_cancel_screen(backend.clone()).await;
        flow.handle_decode("XYZ".into());

        flow.submit("   ").await;

        assert_eq!(backend.call_count("cancel_visit"), 0);
        assert!(flow.snapshot().error.is_some());
        assert_eq!(controller.active_screen().await, ScreenName::CancelVisit);
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn successful_cancel_shows_message_and_returns_to_entry() {
        let backend = Arc::new(FakeBackend::default());
        backend.queue_cancel(Ok(WorkflowResponse {
            success: None,
            message: Some("Successfully Cancelled!".into()),
        }));
        let (controller, flow) = flow_on_cancel_screen(backend.clone()).await;
        flow.handle_decode("XYZ".into());

        flow.submit("double booked").await;

        assert_eq!(backend.call_count("cancel_visit:XYZ:double booked"), 1);
        assert_eq!(
            flow.snapshot().result_message.as_deref(),
            Some("Successfully Cancelled!")
        );
        assert_eq!(controller.active_screen().await, ScreenName::Welcome);
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn transport_failure_keeps_the_screen() {
        let backend = Arc::new(FakeBackend::default());
        backend.queue_cancel(Err(KioskError::RemoteCall("timeout".into())));
        let (controller, flow) = flow_on_cancel_screen(backend.clone()).await;
        flow.handle_decode("XYZ".into());

        flow.submit("reason").await;

        assert_eq!(flow.snapshot().error.as_deref(), Some(GENERIC_ERROR));
        assert_eq!(controller.active_screen().await, ScreenName::CancelVisit);
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn decode_opens_prompt_without_backend_call() {
        let backend = Arc::new(FakeBackend::default());
        let (controller, flow) = flow_on_cancel_screen(backend.clone()).await;

        flow.handle_decode("XYZ".into());

        assert!(flow.snapshot().prompt_open);
        assert_eq!(backend.call_count("cancel_visit"), 0);
        controller.shutdown().await;
    }
}
