use async_trait::async_trait;

use crate::error::KioskError;

/// Lens preference when opening the camera. Kiosk and mobile scanning both
/// prefer the rear-facing lens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Rear,
    Front,
}

/// Fixed central region decode attempts are constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRegion {
    pub width: u32,
    pub height: u32,
}

impl Default for ScanRegion {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
        }
    }
}

/// The camera hardware seam. The kiosk core never touches a device directly;
/// platform integrations implement this pair of traits.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Request camera access. Fails with `KioskError::Camera` when permission
    /// is denied or no camera exists.
    async fn open(&self, facing: Facing) -> Result<Box<dyn CameraStream>, KioskError>;
}

#[async_trait]
pub trait CameraStream: Send {
    /// Grab the next frame and attempt one QR decode over `region`.
    /// `None` means no code was found in this frame.
    async fn decode_attempt(&mut self, region: ScanRegion) -> Option<String>;

    /// Release the device. Must be idempotent; a second call is a no-op.
    async fn stop(&mut self);
}

/// Stand-in for stations without camera hardware: every open attempt reports
/// the camera as unavailable, which screens surface non-fatally.
pub struct NoCamera;

#[async_trait]
impl Camera for NoCamera {
    async fn open(&self, _facing: Facing) -> Result<Box<dyn CameraStream>, KioskError> {
        Err(KioskError::Camera("no camera device present".into()))
    }
}
