use serde::Serialize;

use crate::backend::types::{Company, Drink, Language, Station};
use crate::config::DeviceClass;
use crate::session::{HostData, PlannedVisitor, PlannedVisitorData, VisitorData};

use super::registry::ScreenName;

/// Everything the props builder may read: session context snapshot, bootstrap
/// data, and controller-owned display state. Screens only ever see the slice
/// their descriptor declares.
pub struct PropsSource<'a> {
    pub station: &'a Station,
    pub company: &'a Company,
    pub langs: &'a [Language],
    pub drinks: &'a [Drink],
    pub current_lang: &'a str,
    pub device_class: DeviceClass,
    pub visitor: Option<&'a VisitorData>,
    pub host: Option<&'a HostData>,
    pub planned_visitor: Option<&'a PlannedVisitorData>,
    pub drink_selected: bool,
    pub planned_visitors: &'a [PlannedVisitor],
    /// Time-of-day string maintained by the entry screen's clock tick.
    pub today: &'a str,
    /// Mobile hand-off URL, present only when self check-in is enabled.
    pub handoff_url: Option<&'a str>,
}

/// Typed props, one variant per screen. Absent optional values are `None`;
/// there is exactly one way for a screen to check "no data yet".
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen")]
pub enum ScreenProps {
    Welcome {
        company_name: String,
        company_id: i64,
        station: Station,
        langs: Vec<Language>,
        current_lang: String,
        today: String,
        handoff_url: Option<String>,
    },
    /// Shared shape for the form/workflow screens (visitor form, check-in/out,
    /// cancel, extend, group reservations).
    Workflow {
        visitor: Option<VisitorData>,
        station: Station,
        langs: Vec<Language>,
        current_lang: String,
        is_planned_visitors: bool,
        device_class: DeviceClass,
    },
    Host {
        station_id: i64,
        station: Station,
    },
    Register {
        is_drink_visible: bool,
        planned_visitor: Option<PlannedVisitorData>,
        host: Option<HostData>,
    },
    Drink {
        drinks: Vec<Drink>,
        visitor_id: Option<i64>,
    },
    End {
        drink_selected: bool,
        planned_visitor: Option<PlannedVisitorData>,
        host: Option<HostData>,
    },
    QuickCheckIn {
        planned_visitors: Vec<PlannedVisitor>,
        station_id: i64,
    },
}

impl ScreenProps {
    /// The prop names this variant carries, for validation against a
    /// `ScreenDescriptor::required_props` contract.
    pub fn prop_names(&self) -> &'static [&'static str] {
        match self {
            ScreenProps::Welcome { .. } => &[
                "company_name",
                "company_id",
                "station",
                "langs",
                "current_lang",
                "today",
                "handoff_url",
            ],
            ScreenProps::Workflow { .. } => &[
                "visitor",
                "station",
                "langs",
                "current_lang",
                "is_planned_visitors",
                "device_class",
            ],
            ScreenProps::Host { .. } => &["station_id", "station"],
            ScreenProps::Register { .. } => &["is_drink_visible", "planned_visitor", "host"],
            ScreenProps::Drink { .. } => &["drinks", "visitor_id"],
            ScreenProps::End { .. } => &["drink_selected", "planned_visitor", "host"],
            ScreenProps::QuickCheckIn { .. } => &["planned_visitors", "station_id"],
        }
    }
}

/// Pure mapping from the active screen to its props. Each variant carries
/// exactly the fields the screen declared; session fields a screen did not
/// declare never leak into its props.
pub fn build_props(screen: ScreenName, source: &PropsSource<'_>) -> ScreenProps {
    match screen {
        ScreenName::Welcome => ScreenProps::Welcome {
            company_name: source.company.name.clone(),
            company_id: source.company.id,
            station: source.station.clone(),
            langs: source.langs.to_vec(),
            current_lang: source.current_lang.to_string(),
            today: source.today.to_string(),
            handoff_url: source.handoff_url.map(str::to_string),
        },
        ScreenName::VisitorForm
        | ScreenName::CheckIn
        | ScreenName::CheckOut
        | ScreenName::CancelVisit
        | ScreenName::ExtendVisit
        | ScreenName::GroupReservations => ScreenProps::Workflow {
            visitor: source.visitor.cloned(),
            station: source.station.clone(),
            langs: source.langs.to_vec(),
            current_lang: source.current_lang.to_string(),
            is_planned_visitors: !source.planned_visitors.is_empty(),
            device_class: source.device_class,
        },
        ScreenName::HostPage => ScreenProps::Host {
            station_id: source.station.id,
            station: source.station.clone(),
        },
        ScreenName::RegisterPage => ScreenProps::Register {
            is_drink_visible: !source.drinks.is_empty(),
            planned_visitor: source.planned_visitor.cloned(),
            host: source.host.cloned(),
        },
        ScreenName::DrinkPage => ScreenProps::Drink {
            drinks: source.drinks.to_vec(),
            visitor_id: source.planned_visitor.map(|p| p.id),
        },
        ScreenName::EndPage => ScreenProps::End {
            drink_selected: source.drink_selected,
            planned_visitor: source.planned_visitor.cloned(),
            host: source.host.cloned(),
        },
        ScreenName::QuickCheckIn => ScreenProps::QuickCheckIn {
            planned_visitors: source.planned_visitors.to_vec(),
            station_id: source.station.id,
        },
    }
}
