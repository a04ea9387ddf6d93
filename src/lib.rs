pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod handoff;
pub mod scan;
pub mod screens;
pub mod session;
pub mod tasks;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{FrontdeskBackend, HttpBackend};
pub use config::{DeviceClass, KioskConfig};
pub use controller::{ScreenController, TaskIntervals};
pub use error::KioskError;
pub use scan::{Camera, NoCamera, QrScanSession, ScanStatus};
pub use screens::{ScreenName, ScreenProps, ScreenRegistry};
pub use session::SessionContext;
