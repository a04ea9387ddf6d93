use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Every full-page state of the kiosk flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenName {
    Welcome,
    VisitorForm,
    CheckIn,
    CheckOut,
    CancelVisit,
    ExtendVisit,
    GroupReservations,
    HostPage,
    RegisterPage,
    DrinkPage,
    EndPage,
    QuickCheckIn,
}

impl ScreenName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenName::Welcome => "WelcomePage",
            ScreenName::VisitorForm => "VisitorForm",
            ScreenName::CheckIn => "CheckIn",
            ScreenName::CheckOut => "CheckOut",
            ScreenName::CancelVisit => "CancelVisit",
            ScreenName::ExtendVisit => "ExtendVisit",
            ScreenName::GroupReservations => "GroupReservations",
            ScreenName::HostPage => "HostPage",
            ScreenName::RegisterPage => "RegisterPage",
            ScreenName::DrinkPage => "DrinkPage",
            ScreenName::EndPage => "EndPage",
            ScreenName::QuickCheckIn => "QuickCheckIn",
        }
    }
}

impl std::fmt::Display for ScreenName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static contract for one screen: its name, the props it is allowed to see,
/// and the lifecycle capabilities it opts into. Immutable once registered.
#[derive(Debug, Clone)]
pub struct ScreenDescriptor {
    pub name: ScreenName,
    pub required_props: &'static [&'static str],
    /// Entering this screen starts the planned-visitor poll; leaving cancels it.
    pub tracks_planned_visitors: bool,
    /// This screen mounts a QR scan session.
    pub needs_scanner: bool,
}

/// Name → descriptor mapping, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ScreenRegistry {
    screens: HashMap<&'static str, ScreenDescriptor>,
}

impl ScreenRegistry {
    /// The standard kiosk screen set.
    pub fn standard() -> Self {
        let descriptors = [
            ScreenDescriptor {
                name: ScreenName::Welcome,
                required_props: &[
                    "company_name",
                    "company_id",
                    "station",
                    "langs",
                    "current_lang",
                    "today",
                    "handoff_url",
                ],
                tracks_planned_visitors: false,
                needs_scanner: false,
            },
            ScreenDescriptor {
                name: ScreenName::VisitorForm,
                required_props: WORKFLOW_PROPS,
                tracks_planned_visitors: true,
                needs_scanner: false,
            },
            ScreenDescriptor {
                name: ScreenName::CheckIn,
                required_props: WORKFLOW_PROPS,
                tracks_planned_visitors: true,
                needs_scanner: true,
            },
            ScreenDescriptor {
                name: ScreenName::CheckOut,
                required_props: WORKFLOW_PROPS,
                tracks_planned_visitors: true,
                needs_scanner: true,
            },
            ScreenDescriptor {
                name: ScreenName::CancelVisit,
                required_props: WORKFLOW_PROPS,
                tracks_planned_visitors: true,
                needs_scanner: true,
            },
            ScreenDescriptor {
                name: ScreenName::ExtendVisit,
                required_props: WORKFLOW_PROPS,
                tracks_planned_visitors: true,
                needs_scanner: true,
            },
            ScreenDescriptor {
                name: ScreenName::GroupReservations,
                required_props: WORKFLOW_PROPS,
                tracks_planned_visitors: true,
                needs_scanner: false,
            },
            ScreenDescriptor {
                name: ScreenName::HostPage,
                required_props: &["station_id", "station"],
                tracks_planned_visitors: false,
                needs_scanner: false,
            },
            ScreenDescriptor {
                name: ScreenName::RegisterPage,
                required_props: &["is_drink_visible", "planned_visitor", "host"],
                tracks_planned_visitors: false,
                needs_scanner: false,
            },
            ScreenDescriptor {
                name: ScreenName::DrinkPage,
                required_props: &["drinks", "visitor_id"],
                tracks_planned_visitors: false,
                needs_scanner: false,
            },
            ScreenDescriptor {
                name: ScreenName::EndPage,
                required_props: &["drink_selected", "planned_visitor", "host"],
                tracks_planned_visitors: false,
                needs_scanner: false,
            },
            ScreenDescriptor {
                name: ScreenName::QuickCheckIn,
                required_props: &["planned_visitors", "station_id"],
                tracks_planned_visitors: false,
                needs_scanner: false,
            },
        ];

        let mut screens = HashMap::new();
        for descriptor in descriptors {
            screens.insert(descriptor.name.as_str(), descriptor);
        }
        Self { screens }
    }

    pub fn get(&self, name: &str) -> Option<&ScreenDescriptor> {
        self.screens.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.screens.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

/// Shared prop set for the form/workflow family of screens. The original
/// kiosk hands the same bag to all of them; the contract keeps that shape.
const WORKFLOW_PROPS: &[&str] = &[
    "visitor",
    "station",
    "langs",
    "current_lang",
    "is_planned_visitors",
    "device_class",
];
