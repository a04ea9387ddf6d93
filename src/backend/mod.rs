pub mod http;
pub mod types;

use async_trait::async_trait;

use crate::error::KioskError;
use crate::session::PlannedVisitor;

use types::{
    BootstrapData, CheckOutResponse, CreateVisitorRequest, CreateVisitorResponse,
    ExtendLookupResponse, TempCode, WorkflowResponse,
};

pub use http::HttpBackend;

/// The collaborator boundary. One method per endpoint the core consumes;
/// workflow handlers treat `success` flags in the responses as authoritative
/// over HTTP-level success.
#[async_trait]
pub trait FrontdeskBackend: Send + Sync {
    /// Station record, company record, and available languages for `lang`.
    async fn get_frontdesk_data(&self, lang: &str) -> Result<BootstrapData, KioskError>;

    /// Ordered planned-visitor list for the station.
    async fn get_planned_visitors(&self) -> Result<Vec<PlannedVisitor>, KioskError>;

    /// Create the visitor record from the assembled payload.
    async fn create_visitor(
        &self,
        request: &CreateVisitorRequest,
    ) -> Result<CreateVisitorResponse, KioskError>;

    /// Check in by decoded QR code.
    async fn check_in(&self, code: &str) -> Result<WorkflowResponse, KioskError>;

    /// Check out by decoded QR code; may include visitor name and card number.
    async fn check_out(&self, code: &str) -> Result<CheckOutResponse, KioskError>;

    /// Submit the satisfaction evaluation gathered at check-out.
    async fn submit_evaluation(
        &self,
        code: &str,
        rating: u8,
        comment: &str,
    ) -> Result<WorkflowResponse, KioskError>;

    /// Cancel the visit identified by the decoded QR code.
    async fn cancel_visit(&self, code: &str, reason: &str)
        -> Result<WorkflowResponse, KioskError>;

    /// Step (a) of extension: resolve the code to a visitor id and confirm
    /// eligibility.
    async fn extend_lookup(&self, code: &str) -> Result<ExtendLookupResponse, KioskError>;

    /// Step (b) of extension: submit the chosen duration in minutes.
    async fn extend_submit(
        &self,
        visitor_id: i64,
        minutes: u32,
    ) -> Result<WorkflowResponse, KioskError>;

    /// Two-part time-boxed code for the mobile hand-off URL.
    async fn get_tmp_code(&self) -> Result<TempCode, KioskError>;
}
