use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::config::KioskConfig;
use crate::error::{KioskError, GENERIC_ERROR};
use crate::session::PlannedVisitor;

use super::types::{
    BootstrapData, CheckOutResponse, CreateVisitorRequest, CreateVisitorResponse,
    ExtendLookupResponse, TempCode, WorkflowResponse,
};
use super::FrontdeskBackend;

#[derive(Serialize)]
struct RpcRequest<P: Serialize> {
    jsonrpc: &'static str,
    method: &'static str,
    params: P,
}

#[derive(serde::Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
}

/// JSON-RPC-shaped HTTP client for the frontdesk backend. Every call carries
/// the client-wide timeout so abandoned requests cannot pile up behind slow
/// networks.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    station_id: i64,
    token: String,
}

impl HttpBackend {
    pub fn new(config: &KioskConfig) -> Result<Self, KioskError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| KioskError::RemoteCall(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            station_id: config.station_id,
            token: config.token.clone(),
        })
    }

    fn station_url(&self, endpoint: &str) -> String {
        format!(
            "{}/frontdesk/{}/{}/{}",
            self.base_url, self.station_id, self.token, endpoint
        )
    }

    async fn rpc<P, T>(&self, url: String, params: P) -> Result<T, KioskError>
    where
        P: Serialize + Send + Sync,
        T: DeserializeOwned,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "call",
            params,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| KioskError::RemoteCall(err.to_string()))?;

        let body: RpcResponse<T> = response.json().await.map_err(|err| {
            warn!("malformed response from {url}: {err}");
            KioskError::BusinessRejection(GENERIC_ERROR.to_string())
        })?;

        body.result
            .ok_or_else(|| KioskError::BusinessRejection(GENERIC_ERROR.to_string()))
    }
}

#[async_trait]
impl FrontdeskBackend for HttpBackend {
    async fn get_frontdesk_data(&self, lang: &str) -> Result<BootstrapData, KioskError> {
        let url = format!(
            "{}/frontdesk/{}/{}/{}/get_frontdesk_data",
            self.base_url, self.station_id, self.token, lang
        );
        self.rpc(url, json!({})).await
    }

    async fn get_planned_visitors(&self) -> Result<Vec<PlannedVisitor>, KioskError> {
        self.rpc(self.station_url("get_planned_visitors"), json!({}))
            .await
    }

    async fn create_visitor(
        &self,
        request: &CreateVisitorRequest,
    ) -> Result<CreateVisitorResponse, KioskError> {
        self.rpc(self.station_url("prepare_visitor_data"), request)
            .await
    }

    async fn check_in(&self, code: &str) -> Result<WorkflowResponse, KioskError> {
        self.rpc(
            self.station_url("frontdesk_check_in"),
            json!({ "qrCode": code }),
        )
        .await
    }

    async fn check_out(&self, code: &str) -> Result<CheckOutResponse, KioskError> {
        self.rpc(
            self.station_url("frontdesk_check_out"),
            json!({ "qrCode": code }),
        )
        .await
    }

    async fn submit_evaluation(
        &self,
        code: &str,
        rating: u8,
        comment: &str,
    ) -> Result<WorkflowResponse, KioskError> {
        self.rpc(
            self.station_url("submit_evaluation"),
            json!({ "qrCode": code, "evaluation": rating, "comment": comment }),
        )
        .await
    }

    async fn cancel_visit(
        &self,
        code: &str,
        reason: &str,
    ) -> Result<WorkflowResponse, KioskError> {
        self.rpc(
            self.station_url("frontdesk_cancel_visit"),
            json!({ "qrCode": code, "reason": reason }),
        )
        .await
    }

    async fn extend_lookup(&self, code: &str) -> Result<ExtendLookupResponse, KioskError> {
        self.rpc(
            self.station_url("frontdesk_extend_visit"),
            json!({ "qrCode": code }),
        )
        .await
    }

    async fn extend_submit(
        &self,
        visitor_id: i64,
        minutes: u32,
    ) -> Result<WorkflowResponse, KioskError> {
        self.rpc(
            self.station_url("update_extension"),
            json!({ "visitor_id": visitor_id, "extension": minutes }),
        )
        .await
    }

    async fn get_tmp_code(&self) -> Result<TempCode, KioskError> {
        let url = format!(
            "{}/kiosk/{}/get_tmp_code/{}",
            self.base_url, self.station_id, self.token
        );
        self.rpc(url, json!({})).await
    }
}
