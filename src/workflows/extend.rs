use std::sync::{Arc, Mutex};

use log::warn;

use crate::controller::ScreenController;
use crate::error::GENERIC_ERROR;
use crate::screens::ScreenName;

#[derive(Debug, Clone, Default)]
pub struct ExtendScreenState {
    /// The duration popup opens once the lookup confirms eligibility.
    pub popup_open: bool,
    pub error: Option<String>,
}

/// Extend-visit workflow, the only two-step one: (a) lookup by code to obtain
/// a visitor id and confirm eligibility, (b) submit the chosen duration
/// against that id.
pub struct ExtendFlow {
    controller: ScreenController,
    epoch: u64,
    visitor_id: Mutex<Option<i64>>,
    state: Mutex<ExtendScreenState>,
}

impl ExtendFlow {
    pub async fn mount(controller: ScreenController) -> Arc<Self> {
        let epoch = controller.epoch().await;
        let flow = Arc::new(Self {
            controller: controller.clone(),
            epoch,
            visitor_id: Mutex::new(None),
            state: Mutex::new(ExtendScreenState::default()),
        });

        let decode_target = flow.clone();
        let scan = controller
            .start_scan(Box::new(move |text| {
                tokio::spawn(async move { decode_target.handle_decode(text).await });
            }))
            .await;
        if let Err(err) = scan {
            warn!("extend-visit scanner did not start: {err}");
            flow.state.lock().unwrap().error = Some(err.inline_message());
        }

        flow
    }

    /// Step (a): lookup. On failure the inline error is shown and the screen
    /// stays; no second remote call is issued.
    pub async fn handle_decode(&self, code: String) {
        let result = self.controller.backend().extend_lookup(&code).await;

        if !self.controller.is_current(self.epoch).await {
            return;
        }

        let mut state = self.state.lock().unwrap();
        match result {
            Ok(response) if response.is_success() => {
                *self.visitor_id.lock().unwrap() = response.id;
                state.popup_open = true;
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

    /// Step (b): submit the chosen duration. A non-positive duration blocks
    /// with an inline message and never issues the remote call.
    pub async fn submit(&self, extension_minutes: i64) {
        let minutes = match u32::try_from(extension_minutes) {
            Ok(minutes) if minutes > 0 => minutes,
            _ => {
                self.state.lock().unwrap().error =
                    Some("Please enter a valid extension time.".to_string());
                return;
            }
        };
        let Some(visitor_id) = *self.visitor_id.lock().unwrap() else {
            return;
        };

        let result = self
            .controller
            .backend()
            .extend_submit(visitor_id, minutes)
            .await;

        if !self.controller.is_current(self.epoch).await {
            return;
        }

        match result {
            Ok(response) if response.is_success() => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.popup_open = false;
                    state.error = None;
                }
                if let Err(err) = self
                    .controller
                    .show_screen(ScreenName::Welcome.as_str())
                    .await
                {
                    warn!("extend-visit could not return to entry screen: {err}");
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

    pub fn snapshot(&self) -> ExtendScreenState {
        self.state.lock().unwrap().clone()
    }
}
