use thiserror::Error;

/// Error taxonomy for the kiosk core.
///
/// All four user-facing kinds are absorbed at the workflow-handler boundary and
/// surfaced as inline screen state; none propagate past the active screen.
/// `ScreenNotFound` is the exception: it indicates a registry/configuration
/// mismatch and is returned to the caller after being logged.
#[derive(Debug, Error)]
pub enum KioskError {
    /// Client-side validation failed; no network call was made.
    #[error("{0}")]
    Validation(String),

    /// Camera permission denied, hardware missing, or already in use.
    /// Non-fatal: scanning simply does not start.
    #[error("camera unavailable: {0}")]
    Camera(String),

    /// Network or transport failure during a backend call. Mapped to one
    /// generic localized message; never alters the session context.
    #[error("remote call failed: {0}")]
    RemoteCall(String),

    /// The backend answered with an explicit failure flag or message.
    #[error("{0}")]
    BusinessRejection(String),

    /// `show_screen` was asked for a name absent from the registry.
    #[error("screen not registered: {0}")]
    ScreenNotFound(String),
}

/// Fallback message for `RemoteCall` and shapeless responses.
pub const GENERIC_ERROR: &str = "Something went wrong, please try again.";

impl KioskError {
    /// The message a screen should display inline for this error.
    pub fn inline_message(&self) -> String {
        match self {
            KioskError::Validation(msg) | KioskError::BusinessRejection(msg) => msg.clone(),
            KioskError::RemoteCall(_) | KioskError::Camera(_) => GENERIC_ERROR.to_string(),
            KioskError::ScreenNotFound(name) => format!("screen not registered: {name}"),
        }
    }
}
