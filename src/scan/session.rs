use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::KioskError;

use super::camera::{Camera, Facing, ScanRegion};

/// Decode attempts per second while scanning.
const ATTEMPTS_PER_SECOND: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Idle,
    Scanning,
    Decoded,
    Stopped,
}

/// One camera-decoding session, created per screen mount and destroyed when
/// the screen unmounts or the owning workflow completes.
///
/// Lifecycle: Idle → Scanning → Decoded → Stopped, with Stopped terminal.
/// The decode callback fires at most once per session. The "already decoded"
/// guard is independent of camera-stop completion: stop is asynchronous, and
/// frames that race it are dropped by the guard, not by the hardware.
pub struct QrScanSession {
    id: Uuid,
    status: Arc<Mutex<ScanStatus>>,
    decoded_payload: Arc<Mutex<Option<String>>>,
    decoded_guard: Arc<AtomicBool>,
    /// System-wide "camera is a singleton" guard, shared by every session.
    camera_busy: Arc<AtomicBool>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
    region: ScanRegion,
}

impl QrScanSession {
    pub fn new(camera_busy: Arc<AtomicBool>) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: Arc::new(Mutex::new(ScanStatus::Idle)),
            decoded_payload: Arc::new(Mutex::new(None)),
            decoded_guard: Arc::new(AtomicBool::new(false)),
            camera_busy,
            cancel_token: CancellationToken::new(),
            handle: None,
            region: ScanRegion::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> ScanStatus {
        *self.status.lock().unwrap()
    }

    pub fn decoded_payload(&self) -> Option<String> {
        self.decoded_payload.lock().unwrap().clone()
    }

    /// Open the camera with rear-facing preference and begin the decode loop.
    /// `on_decode` is invoked exactly once, with the first decoded text.
    ///
    /// Fails with `KioskError::Camera` when the session is past Idle, the
    /// camera is held by another session, or the device cannot be opened.
    /// The failure is the owning screen's to surface; nothing crashes.
    pub async fn start(
        &mut self,
        camera: Arc<dyn Camera>,
        on_decode: Box<dyn FnOnce(String) + Send>,
    ) -> Result<(), KioskError> {
        if self.status() != ScanStatus::Idle {
            return Err(KioskError::Camera(
                "scan session already started; remount the screen to scan again".into(),
            ));
        }
        if self
            .camera_busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(KioskError::Camera("camera already in use".into()));
        }

        let mut stream = match camera.open(Facing::Rear).await {
            Ok(stream) => stream,
            Err(err) => {
                self.camera_busy.store(false, Ordering::SeqCst);
                warn!("scan session {} could not open camera: {err}", self.id);
                return Err(err);
            }
        };

        *self.status.lock().unwrap() = ScanStatus::Scanning;
        info!("scan session {} scanning", self.id);

        let status = self.status.clone();
        let decoded_payload = self.decoded_payload.clone();
        let decoded_guard = self.decoded_guard.clone();
        let camera_busy = self.camera_busy.clone();
        let token = self.cancel_token.clone();
        let region = self.region;
        let session_id = self.id;
        let mut callback = Some(on_decode);

        let handle = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_millis(1000 / ATTEMPTS_PER_SECOND));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let Some(text) = stream.decode_attempt(region).await else {
                            continue;
                        };
                        if decoded_guard.swap(true, Ordering::SeqCst) {
                            // A frame slipped in after the first decode while
                            // the stop request was still in flight. Drop it.
                            debug!("scan session {session_id} ignoring late frame");
                            continue;
                        }
                        *status.lock().unwrap() = ScanStatus::Decoded;
                        *decoded_payload.lock().unwrap() = Some(text.clone());
                        stream.stop().await;
                        info!("scan session {session_id} decoded");
                        if let Some(cb) = callback.take() {
                            cb(text);
                        }
                        break;
                    }
                    _ = token.cancelled() => {
                        stream.stop().await;
                        debug!("scan session {session_id} cancelled");
                        break;
                    }
                }
            }

            *status.lock().unwrap() = ScanStatus::Stopped;
            camera_busy.store(false, Ordering::SeqCst);
        });

        self.handle = Some(handle);
        Ok(())
    }

    /// Tear the session down. Idempotent; the decode loop issues its own stop
    /// request after a decode, so a second stop here is a no-op.
    pub async fn stop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.await.is_err() {
                warn!("scan session {} loop task failed to join", self.id);
            }
        }
        let mut status = self.status.lock().unwrap();
        if *status != ScanStatus::Stopped {
            *status = ScanStatus::Stopped;
        }
        self.camera_busy.store(false, Ordering::SeqCst);
    }
}

impl Drop for QrScanSession {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
