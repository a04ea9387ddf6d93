use std::sync::{Arc, Mutex};

use log::warn;

use crate::controller::ScreenController;
use crate::error::GENERIC_ERROR;
use crate::screens::ScreenName;

/// Inline display state for the check-out screen.
#[derive(Debug, Clone, Default)]
pub struct CheckOutScreenState {
    pub visitor_name: Option<String>,
    pub nfc_card_number: Option<String>,
    pub evaluation_open: bool,
    pub selected_rating: Option<u8>,
    pub comment: String,
    pub error: Option<String>,
}

/// Check-out workflow: scan → check-out call → evaluation prompt prefilled
/// with the visitor's name → evaluation submit → entry screen.
pub struct CheckOutFlow {
    controller: ScreenController,
    epoch: u64,
    code: Mutex<Option<String>>,
    state: Mutex<CheckOutScreenState>,
}

impl CheckOutFlow {
    /// Mount on the check-out screen: capture the transition epoch and start
    /// a scan session. A camera failure is surfaced inline; the screen simply
    /// offers no scanner.
    pub async fn mount(controller: ScreenController) -> Arc<Self> {
        let epoch = controller.epoch().await;
        let flow = Arc::new(Self {
            controller: controller.clone(),
            epoch,
            code: Mutex::new(None),
            state: Mutex::new(CheckOutScreenState::default()),
        });

        let decode_target = flow.clone();
        let scan = controller
            .start_scan(Box::new(move |text| {
                tokio::spawn(async move { decode_target.handle_decode(text).await });
            }))
            .await;
        if let Err(err) = scan {
            warn!("check-out scanner did not start: {err}");
            flow.state.lock().unwrap().error = Some(err.inline_message());
        }

        flow
    }

    /// Decode arrived: one backend call, then either the evaluation prompt
    /// opens or an inline error is shown. A result arriving after the screen
    /// has changed is dropped.
    pub async fn handle_decode(&self, code: String) {
        let result = self.controller.backend().check_out(&code).await;

        if !self.controller.is_current(self.epoch).await {
            return;
        }

        let mut state = self.state.lock().unwrap();
        match result {
            Ok(response) if response.is_success() => {
                *self.code.lock().unwrap() = Some(code);
                state.visitor_name = response.visitor_name;
                state.nfc_card_number = response.nfc_card_number;
                state.evaluation_open = true;
                state.error = None;
            }
            Ok(response) => {
                state.error = Some(response.message.unwrap_or_else(|| GENERIC_ERROR.to_string()));
            }
            Err(err) => {
                state.error = Some(err.inline_message());
            }
        }
    }

    pub fn select_rating(&self, rating: u8) {
        self.state.lock().unwrap().selected_rating = Some(rating);
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        self.state.lock().unwrap().comment = comment.into();
    }

    /// Submit the evaluation. Requires a selected rating (inline error, no
    /// call otherwise); success returns to the entry screen, which resets the
    /// session context.
    pub async fn submit_evaluation(&self) {
        let rating = self.state.lock().unwrap().selected_rating;
        let Some(rating) = rating else {
            self.state.lock().unwrap().error = Some("Please select an evaluation".to_string());
            return;
        };
        let Some(code) = self.code.lock().unwrap().clone() else {
            return;
        };
        let comment = self.state.lock().unwrap().comment.clone();

        let result = self
            .controller
            .backend()
            .submit_evaluation(&code, rating, &comment)
            .await;

        if !self.controller.is_current(self.epoch).await {
            return;
        }

        match result {
            Ok(response) if response.is_success() => {
                if let Err(err) = self
                    .controller
                    .show_screen(ScreenName::Welcome.as_str())
                    .await
                {
                    warn!("check-out could not return to entry screen: {err}");
                }
            }
            Ok(response) => {
                self.state.lock().unwrap().error =
                    Some(response.message.unwrap_or_else(|| GENERIC_ERROR.to_string()));
            }
            Err(err) => {
                self.state.lock().unwrap().error = Some(err.inline_message());
            }
        }
    }

    pub fn snapshot(&self) -> CheckOutScreenState {
        self.state.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::CheckOutResponse;
    use crate::config::DeviceClass;
    use crate::controller::TaskIntervals;
    use crate::error::KioskError;
    use crate::screens::MemoryScreenStore;
    use crate::testing::{test_config, FakeBackend, ScriptedCamera};
    use std::time::Duration;

    async fn controller_on_check_out(
        backend: Arc<FakeBackend>,
        camera: ScriptedCamera,
    ) -> ScreenController {
        let mut config = test_config();
        config.device_class = DeviceClass::Kiosk;
        let controller = ScreenController::with_intervals(
            &config,
            backend,
            Arc::new(camera),
            Arc::new(MemoryScreenStore::new()),
            TaskIntervals {
                clock_tick: Duration::from_secs(60),
                planned_visitor_poll: Duration::from_secs(600),
                handoff_refresh: Duration::from_secs(3600),
            },
        );
        controller.start().await.unwrap();
        controller.show_screen("CheckOut").await.unwrap();
        controller
    }

    #[tokio::test]
    async fn scan_to_evaluation_to_entry_screen() {
        let backend = Arc::new(FakeBackend::default());
        backend.queue_check_out(Ok(CheckOutResponse {
            success: Some(true),
            visitor_name: Some("Jane Doe".into()),
            ..CheckOutResponse::default()
        }));

        let controller =
            controller_on_check_out(backend.clone(), ScriptedCamera::decoding("ABC123")).await;
        let flow = CheckOutFlow::mount(controller.clone()).await;

        // Let the scan loop decode and the handler run.
        tokio::time::sleep(Duration::from_millis(300)).await;

        let state = flow.snapshot();
        assert!(state.evaluation_open, "evaluation prompt should be open");
        assert_eq!(state.visitor_name.as_deref(), Some("Jane Doe"));
        assert_eq!(backend.call_count("check_out:ABC123"), 1);

        flow.select_rating(5);
        flow.set_comment("great");
        flow.submit_evaluation().await;

        assert_eq!(
            backend.call_count("submit_evaluation:ABC123:5:great"),
            1
        );
        assert_eq!(controller.active_screen().await, ScreenName::Welcome);
        let context = controller.context().await;
        assert!(context.visitor.is_none());
        assert!(!context.drink_selected);
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn evaluation_requires_a_rating() {
        let backend = Arc::new(FakeBackend::default());
        let controller =
            controller_on_check_out(backend.clone(), ScriptedCamera::silent()).await;
        let flow = CheckOutFlow::mount(controller.clone()).await;

        flow.submit_evaluation().await;

        assert_eq!(backend.call_count("submit_evaluation"), 0);
        assert!(flow.snapshot().error.is_some());
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn business_failure_shows_backend_message() {
        let backend = Arc::new(FakeBackend::default());
        backend.queue_check_out(Ok(CheckOutResponse {
            success: Some(false),
            message: Some("Invalid QR Code!".into()),
            ..CheckOutResponse::default()
        }));
        let controller =
            controller_on_check_out(backend.clone(), ScriptedCamera::silent()).await;
        let flow = CheckOutFlow::mount(controller.clone()).await;

        flow.handle_decode("BAD".into()).await;

        let state = flow.snapshot();
        assert!(!state.evaluation_open);
        assert_eq!(state.error.as_deref(), Some("Invalid QR Code!"));
        assert_eq!(controller.active_screen().await, ScreenName::CheckOut);
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn network_failure_maps_to_generic_message() {
        let backend = Arc::new(FakeBackend::default());
        backend.queue_check_out(Err(KioskError::RemoteCall("connection refused".into())));
        let controller =
            controller_on_check_out(backend.clone(), ScriptedCamera::silent()).await;
        let flow = CheckOutFlow::mount(controller.clone()).await;

        flow.handle_decode("ABC".into()).await;

        assert_eq!(flow.snapshot().error.as_deref(), Some(GENERIC_ERROR));
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn stale_decode_result_is_dropped_after_navigation() {
        let backend = Arc::new(FakeBackend::default());
        let controller =
            controller_on_check_out(backend.clone(), ScriptedCamera::silent()).await;
        let flow = CheckOutFlow::mount(controller.clone()).await;

        // Navigate away before the (synchronous here) result is applied.
        controller.show_screen("WelcomePage").await.unwrap();
        flow.handle_decode("LATE".into()).await;

        let state = flow.snapshot();
        assert!(!state.evaluation_open);
        assert!(state.error.is_none());
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn camera_failure_is_inline_not_fatal() {
        let backend = Arc::new(FakeBackend::default());
        let mut config = test_config();
        config.device_class = DeviceClass::Kiosk;
        let controller = ScreenController::new(
            &config,
            backend,
            Arc::new(crate::scan::NoCamera),
            Arc::new(MemoryScreenStore::new()),
        );
        controller.start().await.unwrap();
        controller.show_screen("CheckOut").await.unwrap();

        let flow = CheckOutFlow::mount(controller.clone()).await;
        assert!(flow.snapshot().error.is_some());
        assert_eq!(controller.active_screen().await, ScreenName::CheckOut);
        controller.shutdown().await;
    }
}
