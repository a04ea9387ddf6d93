//! In-memory fakes shared by the controller and workflow tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::types::{
    BootstrapData, CheckOutResponse, Company, CreateVisitorRequest, CreateVisitorResponse,
    ExtendLookupResponse, Station, TempCode, WorkflowResponse,
};
use crate::backend::FrontdeskBackend;
use crate::config::{DeviceClass, KioskConfig};
use crate::error::KioskError;
use crate::scan::{Camera, CameraStream, Facing, ScanRegion};
use crate::session::PlannedVisitor;

pub fn test_config() -> KioskConfig {
    KioskConfig {
        base_url: "https://frontdesk.example.com".into(),
        station_id: 1,
        token: "token".into(),
        device_class: DeviceClass::Kiosk,
        language: "en_US".into(),
        request_timeout_secs: 5,
        screen_state_path: None,
    }
}

/// Scriptable backend: queued responses per endpoint, falling back to plain
/// successes, plus a call log for interaction assertions.
#[derive(Default)]
pub struct FakeBackend {
    bootstrap: Mutex<Option<BootstrapData>>,
    planned: Mutex<Vec<PlannedVisitor>>,
    check_in: Mutex<VecDeque<Result<WorkflowResponse, KioskError>>>,
    check_out: Mutex<VecDeque<Result<CheckOutResponse, KioskError>>>,
    evaluation: Mutex<VecDeque<Result<WorkflowResponse, KioskError>>>,
    cancel: Mutex<VecDeque<Result<WorkflowResponse, KioskError>>>,
    extend_lookup: Mutex<VecDeque<Result<ExtendLookupResponse, KioskError>>>,
    extend_submit: Mutex<VecDeque<Result<WorkflowResponse, KioskError>>>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<serde_json::Value>>,
}

impl FakeBackend {
    fn default_bootstrap() -> BootstrapData {
        BootstrapData {
            station: Station {
                id: 1,
                name: "Main Gate".into(),
                self_check_in: false,
                theme: None,
                description: None,
            },
            company: Company {
                id: 1,
                name: "Acme".into(),
            },
            langs: vec![],
            drinks: vec![],
        }
    }

    pub fn enable_self_check_in(&self) {
        let mut bootstrap = Self::default_bootstrap();
        bootstrap.station.self_check_in = true;
        *self.bootstrap.lock().unwrap() = Some(bootstrap);
    }

    pub fn set_planned(&self, visitors: Vec<PlannedVisitor>) {
        *self.planned.lock().unwrap() = visitors;
    }

    pub fn queue_check_in(&self, response: Result<WorkflowResponse, KioskError>) {
        self.check_in.lock().unwrap().push_back(response);
    }

    pub fn queue_check_out(&self, response: Result<CheckOutResponse, KioskError>) {
        self.check_out.lock().unwrap().push_back(response);
    }

    pub fn queue_evaluation(&self, response: Result<WorkflowResponse, KioskError>) {
        self.evaluation.lock().unwrap().push_back(response);
    }

    pub fn queue_cancel(&self, response: Result<WorkflowResponse, KioskError>) {
        self.cancel.lock().unwrap().push_back(response);
    }

    pub fn queue_extend_lookup(&self, response: Result<ExtendLookupResponse, KioskError>) {
        self.extend_lookup.lock().unwrap().push_back(response);
    }

    pub fn queue_extend_submit(&self, response: Result<WorkflowResponse, KioskError>) {
        self.extend_submit.lock().unwrap().push_back(response);
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(endpoint))
            .count()
    }

    pub fn created_payloads(&self) -> Vec<serde_json::Value> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl FrontdeskBackend for FakeBackend {
    async fn get_frontdesk_data(&self, lang: &str) -> Result<BootstrapData, KioskError> {
        self.record(format!("get_frontdesk_data:{lang}"));
        Ok(self
            .bootstrap
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(Self::default_bootstrap))
    }

    async fn get_planned_visitors(&self) -> Result<Vec<PlannedVisitor>, KioskError> {
        self.record("get_planned_visitors");
        Ok(self.planned.lock().unwrap().clone())
    }

    async fn create_visitor(
        &self,
        request: &CreateVisitorRequest,
    ) -> Result<CreateVisitorResponse, KioskError> {
        self.record("create_visitor");
        self.created
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        Ok(CreateVisitorResponse {
            visitor_id: Some(99),
        })
    }

    async fn check_in(&self, code: &str) -> Result<WorkflowResponse, KioskError> {
        self.record(format!("check_in:{code}"));
        self.check_in.lock().unwrap().pop_front().unwrap_or(Ok(WorkflowResponse {
            success: Some(true),
            message: Some("Successfully Checked In".into()),
        }))
    }

    async fn check_out(&self, code: &str) -> Result<CheckOutResponse, KioskError> {
        self.record(format!("check_out:{code}"));
        self.check_out.lock().unwrap().pop_front().unwrap_or(Ok(CheckOutResponse {
            success: Some(true),
            message: Some("Successfully Checked Out!".into()),
            ..CheckOutResponse::default()
        }))
    }

    async fn submit_evaluation(
        &self,
        code: &str,
        rating: u8,
        comment: &str,
    ) -> Result<WorkflowResponse, KioskError> {
        self.record(format!("submit_evaluation:{code}:{rating}:{comment}"));
        self.evaluation.lock().unwrap().pop_front().unwrap_or(Ok(WorkflowResponse {
            success: Some(true),
            message: None,
        }))
    }

    async fn cancel_visit(
        &self,
        code: &str,
        reason: &str,
    ) -> Result<WorkflowResponse, KioskError> {
        self.record(format!("cancel_visit:{code}:{reason}"));
        self.cancel.lock().unwrap().pop_front().unwrap_or(Ok(WorkflowResponse {
            success: None,
            message: Some("Successfully Cancelled!".into()),
        }))
    }

    async fn extend_lookup(&self, code: &str) -> Result<ExtendLookupResponse, KioskError> {
        self.record(format!("extend_lookup:{code}"));
        self.extend_lookup.lock().unwrap().pop_front().unwrap_or(Ok(ExtendLookupResponse {
            success: Some(true),
            id: Some(7),
            planned_duration: Some(1.0),
            message: None,
        }))
    }

    async fn extend_submit(
        &self,
        visitor_id: i64,
        minutes: u32,
    ) -> Result<WorkflowResponse, KioskError> {
        self.record(format!("extend_submit:{visitor_id}:{minutes}"));
        self.extend_submit.lock().unwrap().pop_front().unwrap_or(Ok(WorkflowResponse {
            success: Some(true),
            message: Some("Visit extension requested!".into()),
        }))
    }

    async fn get_tmp_code(&self) -> Result<TempCode, KioskError> {
        self.record("get_tmp_code");
        Ok(TempCode("tmp".into(), "code".into()))
    }
}

/// Camera whose stream yields the scripted payload on every frame after a
/// number of empty frames; `silent` never decodes anything.
pub struct ScriptedCamera {
    payload: Option<String>,
    empty_frames: usize,
}

impl ScriptedCamera {
    pub fn decoding(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            empty_frames: 0,
        }
    }

    pub fn silent() -> Self {
        Self {
            payload: None,
            empty_frames: 0,
        }
    }
}

struct ScriptedStream {
    payload: Option<String>,
    remaining_empty: usize,
}

#[async_trait]
impl Camera for ScriptedCamera {
    async fn open(&self, _facing: Facing) -> Result<Box<dyn CameraStream>, KioskError> {
        Ok(Box::new(ScriptedStream {
            payload: self.payload.clone(),
            remaining_empty: self.empty_frames,
        }))
    }
}

#[async_trait]
impl CameraStream for ScriptedStream {
    async fn decode_attempt(&mut self, _region: ScanRegion) -> Option<String> {
        if self.remaining_empty > 0 {
            self.remaining_empty -= 1;
            return None;
        }
        self.payload.clone()
    }

    async fn stop(&mut self) {}
}
