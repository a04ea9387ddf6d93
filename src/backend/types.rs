use serde::{Deserialize, Serialize};

use crate::session::{HostData, VisitorData, VisitorType};

/// Station record from the bootstrap call. Only the fields the core reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub self_check_in: bool,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub name: String,
}

/// Everything the bootstrap endpoint returns that the core depends on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapData {
    pub station: Station,
    pub company: Company,
    #[serde(default)]
    pub langs: Vec<Language>,
    #[serde(default)]
    pub drinks: Vec<Drink>,
}

/// Two-part time-boxed code used to build the mobile hand-off URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TempCode(pub String, pub String);

/// Shared response shape for the QR workflows. Business success requires an
/// explicit `success: true`; anything else — `false`, absent, or a bare
/// message — is a business failure. HTTP-level success is never authoritative.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl WorkflowResponse {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckOutResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub visitor_name: Option<String>,
    /// Alternate card-number identifier handed back for badge return.
    #[serde(default)]
    pub nfc_card_number: Option<String>,
    #[serde(default)]
    pub visitor_id: Option<i64>,
}

impl CheckOutResponse {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendLookupResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub planned_duration: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ExtendLookupResponse {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateVisitorResponse {
    #[serde(default)]
    pub visitor_id: Option<i64>,
}

/// A request field that serializes as its value when present and as the JSON
/// boolean `false` when absent. The backend distinguishes "not applicable to
/// this flow" (`false`) from a missing key; `null` is never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MaybeField<T> {
    Value(T),
    Absent(bool),
}

impl<T> MaybeField<T> {
    pub fn absent() -> Self {
        MaybeField::Absent(false)
    }
}

impl<T> From<Option<T>> for MaybeField<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => MaybeField::Value(value),
            None => MaybeField::Absent(false),
        }
    }
}

/// The ≈20-field create-visitor payload. Host-derived fields default to
/// `false`/empty when the active flow captured no host selection.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVisitorRequest {
    pub name: MaybeField<String>,
    pub second_name: MaybeField<String>,
    pub third_name: MaybeField<String>,
    pub fourth_name: MaybeField<String>,
    pub phone: MaybeField<String>,
    pub landline: MaybeField<String>,
    pub email: MaybeField<String>,
    pub company: MaybeField<String>,
    pub host_ids: Vec<i64>,
    pub host_name: Vec<String>,
    pub host_phone: Vec<String>,
    pub host_email: Vec<String>,
    pub is_recurring: bool,
    pub planned_date: MaybeField<String>,
    pub planned_date_end: MaybeField<String>,
    pub planned_time: MaybeField<String>,
    pub planned_duration: MaybeField<f64>,
    pub visit_purpose: MaybeField<String>,
    pub other_reason: MaybeField<String>,
    pub host_landline: MaybeField<String>,
    pub visitor_card: MaybeField<String>,
    pub passport: MaybeField<String>,
    pub emp_id: MaybeField<String>,
    pub visit_type: MaybeField<String>,
    pub wilayat: MaybeField<String>,
    pub recaptcha_response: MaybeField<String>,
    pub preferred_language: String,
}

impl CreateVisitorRequest {
    /// Assemble the payload from the session's visitor data and (optional)
    /// host selection. Company and employee id are mutually exclusive on the
    /// form; both pass through as captured.
    pub fn assemble(visitor: &VisitorData, host: Option<&HostData>, language: &str) -> Self {
        let visit_type = host.map(|h| {
            serde_json::to_value(h.visit_type)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default()
        });

        Self {
            name: visitor.name.clone().into(),
            second_name: visitor.second_name.clone().into(),
            third_name: visitor.third_name.clone().into(),
            fourth_name: visitor.fourth_name.clone().into(),
            phone: visitor.phone.clone().into(),
            landline: visitor.landline.clone().into(),
            email: visitor.email.clone().into(),
            company: match visitor.visitor_type {
                VisitorType::Company => visitor.company.clone().into(),
                _ => MaybeField::absent(),
            },
            host_ids: host.map(|h| vec![h.host_id]).unwrap_or_default(),
            host_name: host
                .and_then(|h| h.employee_name.clone())
                .map(|n| vec![n])
                .unwrap_or_default(),
            host_phone: host
                .and_then(|h| h.phone.clone())
                .map(|p| vec![p])
                .unwrap_or_default(),
            host_email: host
                .and_then(|h| h.email.clone())
                .map(|e| vec![e])
                .unwrap_or_default(),
            is_recurring: host.map(|h| h.is_recurring).unwrap_or(false),
            planned_date: host.and_then(|h| h.planned_date.clone()).into(),
            planned_date_end: host.and_then(|h| h.planned_date_end.clone()).into(),
            planned_time: host.and_then(|h| h.planned_time.clone()).into(),
            planned_duration: host.and_then(|h| h.planned_duration).into(),
            visit_purpose: host.and_then(|h| h.purpose.clone()).into(),
            other_reason: host.and_then(|h| h.other_reason.clone()).into(),
            host_landline: host.and_then(|h| h.landline.clone()).into(),
            visitor_card: visitor.identification_number.clone().into(),
            passport: visitor.passport.clone().into(),
            emp_id: visitor.employee_id.clone().into(),
            visit_type: visit_type.into(),
            wilayat: host.and_then(|h| h.wilayat.clone()).into(),
            recaptcha_response: host.and_then(|h| h.recaptcha_response.clone()).into(),
            preferred_language: language.to_string(),
        }
    }
}
