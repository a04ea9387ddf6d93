use serde::{Deserialize, Serialize};

/// Free-form identity data captured on the visitor form. Presence checks are
/// the calling screen's job; nothing here is validated further.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitorData {
    pub name: Option<String>,
    pub second_name: Option<String>,
    pub third_name: Option<String>,
    pub fourth_name: Option<String>,
    pub phone: Option<String>,
    pub landline: Option<String>,
    pub email: Option<String>,
    /// Mutually exclusive with `employee_id`.
    pub company: Option<String>,
    pub identification_number: Option<String>,
    pub passport: Option<String>,
    pub employee_id: Option<String>,
    pub visitor_type: VisitorType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorType {
    #[default]
    Individual,
    Company,
    Employee,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    #[default]
    Employee,
    Department,
}

/// Host selection plus planned-visit details captured on the host page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostData {
    pub host_id: i64,
    pub host_name: String,
    pub employee_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub landline: Option<String>,
    pub is_recurring: bool,
    pub planned_date: Option<String>,
    pub planned_date_end: Option<String>,
    pub planned_time: Option<String>,
    pub planned_duration: Option<f64>,
    pub purpose: Option<String>,
    pub other_reason: Option<String>,
    pub visit_type: VisitType,
    pub wilayat: Option<String>,
    pub recaptcha_response: Option<String>,
    pub preferred_language: Option<String>,
}

/// A planned-visitor record selected from the quick check-in list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedVisitorData {
    pub id: i64,
    pub message: Option<String>,
    pub hosts: Vec<String>,
}

/// One entry of the backend's planned-visitor list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedVisitor {
    pub id: i64,
    pub visitor_name: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// Mutable per-interaction state threaded between screens.
///
/// Owned exclusively by the `ScreenController`; screens receive read access via
/// props plus narrow setter callbacks. Reset on every transition into the
/// entry screen. Planned-visitor data and visitor/host data are mutually
/// exclusive per flow: a quick check-in never also populates host selection.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub visitor: Option<VisitorData>,
    pub host: Option<HostData>,
    pub planned_visitor: Option<PlannedVisitorData>,
    pub drink_selected: bool,
    pub planned_visitors: Vec<PlannedVisitor>,
    pub language: String,
}

impl SessionContext {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// Clear everything tied to the current visitor interaction. The cached
    /// planned-visitor list and language survive; they belong to the station,
    /// not the interaction.
    pub fn reset(&mut self) {
        self.visitor = None;
        self.host = None;
        self.planned_visitor = None;
        self.drink_selected = false;
    }

    pub fn set_visitor(&mut self, visitor: VisitorData) {
        self.visitor = Some(visitor);
        self.planned_visitor = None;
    }

    pub fn set_host(&mut self, host: HostData) {
        self.host = Some(host);
        self.planned_visitor = None;
    }

    pub fn set_planned_visitor(&mut self, planned: PlannedVisitorData) {
        self.planned_visitor = Some(planned);
        self.visitor = None;
        self.host = None;
    }

    pub fn set_drink(&mut self, selected: bool) {
        self.drink_selected = selected;
    }
}
