use std::sync::{Arc, Mutex};

use log::warn;

use crate::controller::ScreenController;
use crate::error::GENERIC_ERROR;
use crate::screens::ScreenName;

#[derive(Debug, Clone, Default)]
pub struct CheckInScreenState {
    pub error: Option<String>,
    /// Backend confirmation surfaced on the registration screen.
    pub message: Option<String>,
}

/// QR check-in workflow: scan → check-in call → registration detail screen.
pub struct CheckInFlow {
    controller: ScreenController,
    epoch: u64,
    state: Mutex<CheckInScreenState>,
}

impl CheckInFlow {
    pub async fn mount(controller: ScreenController) -> Arc<Self> {
        let epoch = controller.epoch().await;
        let flow = Arc::new(Self {
            controller: controller.clone(),
            epoch,
            state: Mutex::new(CheckInScreenState::default()),
        });

        let decode_target = flow.clone();
        let scan = controller
            .start_scan(Box::new(move |text| {
                tokio::spawn(async move { decode_target.handle_decode(text).await });
            }))
            .await;
        if let Err(err) = scan {
            warn!("check-in scanner did not start: {err}");
            flow.state.lock().unwrap().error = Some(err.inline_message());
        }

        flow
    }

    /// One backend call per decoded code. The only local validation is a
    /// non-empty payload; success moves into the registration detail screen.
    pub async fn handle_decode(&self, code: String) {
        if code.trim().is_empty() {
            self.state.lock().unwrap().error = Some(GENERIC_ERROR.to_string());
            return;
        }

        let result = self.controller.backend().check_in(&code).await;

        if !self.controller.is_current(self.epoch).await {
            return;
        }

        match result {
            Ok(response) if response.is_success() => {
                self.state.lock().unwrap().message = response.message;
                if let Err(err) = self
                    .controller
                    .show_screen(ScreenName::RegisterPage.as_str())
                    .await
                {
                    warn!("check-in could not open registration screen: {err}");
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

    pub fn snapshot(&self) -> CheckInScreenState {
        self.state.lock().unwrap().clone()
    }
}
