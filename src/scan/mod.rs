pub mod camera;
pub mod session;

pub use camera::{Camera, CameraStream, Facing, NoCamera, ScanRegion};
pub use session::{QrScanSession, ScanStatus};
