use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::backend::types::{BootstrapData, CreateVisitorRequest, CreateVisitorResponse};
use crate::backend::FrontdeskBackend;
use crate::config::{DeviceClass, KioskConfig};
use crate::error::KioskError;
use crate::handoff::handoff_url;
use crate::scan::{Camera, QrScanSession};
use crate::screens::props::{build_props, PropsSource};
use crate::screens::{ScreenName, ScreenProps, ScreenRegistry, ScreenStore};
use crate::session::{HostData, PlannedVisitorData, SessionContext, VisitorData, VisitorType};
use crate::tasks::TaskRegistry;

/// Periods for the controller-owned recurring tasks. Production values match
/// the kiosk defaults; tests shrink them.
#[derive(Debug, Clone, Copy)]
pub struct TaskIntervals {
    pub clock_tick: Duration,
    pub planned_visitor_poll: Duration,
    pub handoff_refresh: Duration,
}

impl Default for TaskIntervals {
    fn default() -> Self {
        Self {
            clock_tick: Duration::from_secs(1),
            planned_visitor_poll: Duration::from_secs(600),
            handoff_refresh: Duration::from_secs(3600),
        }
    }
}

struct ControllerState {
    active: ScreenName,
    /// Bumped on every transition; workflow handlers capture it before a
    /// backend call and drop results that arrive for a stale screen.
    epoch: u64,
    context: SessionContext,
    bootstrap: BootstrapData,
    today: String,
    handoff: Option<String>,
}

/// Owns the active screen, executes transitions, supplies props, and owns
/// installation/teardown of the background tasks and scan session tied to the
/// active screen. Exactly one screen is active at any time.
#[derive(Clone)]
pub struct ScreenController {
    state: Arc<Mutex<ControllerState>>,
    tasks: Arc<Mutex<TaskRegistry>>,
    scan: Arc<Mutex<Option<QrScanSession>>>,
    backend: Arc<dyn FrontdeskBackend>,
    camera: Arc<dyn Camera>,
    registry: Arc<ScreenRegistry>,
    store: Arc<dyn ScreenStore>,
    camera_busy: Arc<AtomicBool>,
    device_class: DeviceClass,
    station_id: i64,
    origin: String,
    intervals: TaskIntervals,
}

impl ScreenController {
    pub fn new(
        config: &KioskConfig,
        backend: Arc<dyn FrontdeskBackend>,
        camera: Arc<dyn Camera>,
        store: Arc<dyn ScreenStore>,
    ) -> Self {
        Self::with_intervals(config, backend, camera, store, TaskIntervals::default())
    }

    pub fn with_intervals(
        config: &KioskConfig,
        backend: Arc<dyn FrontdeskBackend>,
        camera: Arc<dyn Camera>,
        store: Arc<dyn ScreenStore>,
        intervals: TaskIntervals,
    ) -> Self {
        let entry = match config.device_class {
            DeviceClass::Kiosk => ScreenName::Welcome,
            DeviceClass::Mobile => ScreenName::VisitorForm,
        };

        Self {
            state: Arc::new(Mutex::new(ControllerState {
                active: entry,
                epoch: 0,
                context: SessionContext::new(config.language.clone()),
                bootstrap: BootstrapData::default(),
                today: String::new(),
                handoff: None,
            })),
            tasks: Arc::new(Mutex::new(TaskRegistry::new())),
            scan: Arc::new(Mutex::new(None)),
            backend,
            camera,
            registry: Arc::new(ScreenRegistry::standard()),
            store,
            camera_busy: Arc::new(AtomicBool::new(false)),
            device_class: config.device_class,
            station_id: config.station_id,
            origin: config.base_url.trim_end_matches('/').to_string(),
            intervals,
        }
    }

    /// The collaborator boundary, shared with the workflow handlers.
    pub fn backend(&self) -> Arc<dyn FrontdeskBackend> {
        self.backend.clone()
    }

    /// Default entry screen for this device class.
    pub fn entry_screen(&self) -> ScreenName {
        match self.device_class {
            DeviceClass::Kiosk => ScreenName::Welcome,
            DeviceClass::Mobile => ScreenName::VisitorForm,
        }
    }

    /// Load bootstrap data and enter the initial screen. For mobile, a screen
    /// name persisted before a reload is restored; a missing or unregistered
    /// stored name falls back to the default entry screen.
    pub async fn start(&self) -> Result<ScreenProps, KioskError> {
        let language = self.state.lock().await.context.language.clone();
        let bootstrap = self.backend.get_frontdesk_data(&language).await?;
        info!(
            "frontdesk station {} ({}) loaded",
            bootstrap.station.id, bootstrap.station.name
        );
        self.state.lock().await.bootstrap = bootstrap;

        let initial = match self.device_class {
            DeviceClass::Kiosk => self.entry_screen(),
            DeviceClass::Mobile => match self.store.load() {
                Some(saved) => match self.registry.get(&saved) {
                    Some(descriptor) => descriptor.name,
                    None => {
                        warn!("stored screen {saved} is not registered; using entry screen");
                        self.entry_screen()
                    }
                },
                None => self.entry_screen(),
            },
        };

        self.show_screen(initial.as_str()).await
    }

    /// Transition to the named screen. Fails with `ScreenNotFound` (and
    /// leaves everything untouched) when the name is absent from the
    /// registry. Otherwise: tear down the outgoing screen's tasks and scan
    /// session, reset the session context when entering the entry screen,
    /// install the incoming screen's tasks, and rebuild props.
    pub async fn show_screen(&self, name: &str) -> Result<ScreenProps, KioskError> {
        let Some(descriptor) = self.registry.get(name) else {
            error!("show_screen: {name} is not in the screen registry");
            return Err(KioskError::ScreenNotFound(name.to_string()));
        };
        let target = descriptor.name;
        let tracks_planned = descriptor.tracks_planned_visitors;

        self.teardown_active_screen().await;

        {
            let mut state = self.state.lock().await;
            state.epoch += 1;
            if target == self.entry_screen() {
                state.context.reset();
            }
            state.active = target;
        }

        self.install_tasks(target, tracks_planned).await;

        if self.device_class == DeviceClass::Mobile {
            self.store.save(target.as_str());
        }

        info!("screen -> {target}");
        Ok(self.current_props().await)
    }

    /// Explicit close action from the end screen: back to the entry screen,
    /// which also resets the session context.
    pub async fn close(&self) -> Result<ScreenProps, KioskError> {
        self.show_screen(self.entry_screen().as_str()).await
    }

    /// Where the visitor form continues. Employees visit their own company
    /// and pick no host, so they go straight to the registration screen;
    /// everyone else selects a host first.
    pub async fn next_after_visitor_form(&self) -> ScreenName {
        let state = self.state.lock().await;
        match state.context.visitor.as_ref().map(|v| v.visitor_type) {
            Some(VisitorType::Employee) => ScreenName::RegisterPage,
            _ => ScreenName::HostPage,
        }
    }

    pub async fn active_screen(&self) -> ScreenName {
        self.state.lock().await.active
    }

    /// Read-only snapshot of the session context. Screens get their slice
    /// through props; this is for the owner's own bookkeeping.
    pub async fn context(&self) -> SessionContext {
        self.state.lock().await.context.clone()
    }

    pub async fn epoch(&self) -> u64 {
        self.state.lock().await.epoch
    }

    /// Whether no transition has happened since `epoch` was captured. Stale
    /// in-flight workflow results must be dropped when this is false.
    pub async fn is_current(&self, epoch: u64) -> bool {
        self.state.lock().await.epoch == epoch
    }

    pub async fn current_props(&self) -> ScreenProps {
        let state = self.state.lock().await;
        let source = PropsSource {
            station: &state.bootstrap.station,
            company: &state.bootstrap.company,
            langs: &state.bootstrap.langs,
            drinks: &state.bootstrap.drinks,
            current_lang: &state.context.language,
            device_class: self.device_class,
            visitor: state.context.visitor.as_ref(),
            host: state.context.host.as_ref(),
            planned_visitor: state.context.planned_visitor.as_ref(),
            drink_selected: state.context.drink_selected,
            planned_visitors: &state.context.planned_visitors,
            today: &state.today,
            handoff_url: state.handoff.as_deref(),
        };
        build_props(state.active, &source)
    }

    // ------------------------------------------------------------------
    // Narrow session setters handed to screens through props callbacks.
    // ------------------------------------------------------------------

    pub async fn set_visitor_data(&self, visitor: VisitorData) {
        self.state.lock().await.context.set_visitor(visitor);
    }

    pub async fn set_host_data(&self, host: HostData) {
        self.state.lock().await.context.set_host(host);
    }

    pub async fn set_planned_visitor_data(&self, planned: PlannedVisitorData) {
        self.state.lock().await.context.set_planned_visitor(planned);
    }

    pub async fn set_drink(&self, selected: bool) {
        self.state.lock().await.context.set_drink(selected);
    }

    /// Rebuild bootstrap data for a newly chosen language and record it in
    /// the session context.
    pub async fn change_language(&self, lang: &str) -> Result<(), KioskError> {
        let bootstrap = self.backend.get_frontdesk_data(lang).await?;
        let mut state = self.state.lock().await;
        state.bootstrap = bootstrap;
        state.context.language = lang.to_string();
        Ok(())
    }

    /// Assemble and send the create-visitor payload from the current session
    /// context. Fails validation when no visitor data was captured.
    pub async fn create_visitor(&self) -> Result<CreateVisitorResponse, KioskError> {
        let request = {
            let state = self.state.lock().await;
            let visitor = state
                .context
                .visitor
                .as_ref()
                .ok_or_else(|| KioskError::Validation("no visitor data captured".into()))?;
            CreateVisitorRequest::assemble(
                visitor,
                state.context.host.as_ref(),
                &state.context.language,
            )
        };
        self.backend.create_visitor(&request).await
    }

    /// Refresh the planned-visitor list once, immediately. The poll task runs
    /// this on its interval as well.
    pub async fn refresh_planned_visitors(&self) {
        match self.backend.get_planned_visitors().await {
            Ok(visitors) => {
                self.state.lock().await.context.planned_visitors = visitors;
            }
            Err(err) => warn!("planned-visitor refresh failed: {err}"),
        }
    }

    /// Mount a scan session for the active screen. At most one session may be
    /// scanning system-wide; the camera error from a denied or busy device is
    /// the owning screen's to surface non-fatally.
    pub async fn start_scan(
        &self,
        on_decode: Box<dyn FnOnce(String) + Send>,
    ) -> Result<(), KioskError> {
        let mut slot = self.scan.lock().await;
        if let Some(existing) = slot.as_ref() {
            if existing.status() == crate::scan::ScanStatus::Scanning {
                return Err(KioskError::Camera(
                    "a scan session is already running on this screen".into(),
                ));
            }
        }
        let mut session = QrScanSession::new(self.camera_busy.clone());
        session.start(self.camera.clone(), on_decode).await?;
        *slot = Some(session);
        Ok(())
    }

    pub async fn scan_status(&self) -> Option<crate::scan::ScanStatus> {
        self.scan.lock().await.as_ref().map(|s| s.status())
    }

    /// Task and scan cleanup for the outgoing screen. Runs on every exit path
    /// exactly once per transition; both halves are idempotent.
    async fn teardown_active_screen(&self) {
        self.tasks.lock().await.cancel_all();
        if let Some(mut session) = self.scan.lock().await.take() {
            session.stop().await;
        }
    }

    async fn install_tasks(&self, screen: ScreenName, tracks_planned: bool) {
        let mut tasks = self.tasks.lock().await;

        if screen == ScreenName::Welcome {
            let state = self.state.clone();
            tasks.start_interval_immediate("clock-tick", self.intervals.clock_tick, move || {
                let state = state.clone();
                async move {
                    state.lock().await.today = Local::now().format("%H:%M").to_string();
                }
            });

            let self_check_in = self.state.lock().await.bootstrap.station.self_check_in;
            if self_check_in {
                let backend = self.backend.clone();
                let state = self.state.clone();
                let origin = self.origin.clone();
                let station_id = self.station_id;
                tasks.start_interval_immediate(
                    "handoff-refresh",
                    self.intervals.handoff_refresh,
                    move || {
                        let backend = backend.clone();
                        let state = state.clone();
                        let origin = origin.clone();
                        async move {
                            match backend.get_tmp_code().await {
                                Ok(code) => {
                                    let url = handoff_url(&origin, station_id, &code);
                                    state.lock().await.handoff = Some(url);
                                }
                                Err(err) => warn!("hand-off code refresh failed: {err}"),
                            }
                        }
                    },
                );
            }
        }

        if tracks_planned {
            let controller = self.clone();
            tasks.start_interval_immediate(
                "planned-visitor-poll",
                self.intervals.planned_visitor_poll,
                move || {
                    let controller = controller.clone();
                    async move {
                        controller.refresh_planned_visitors().await;
                    }
                },
            );
        }
    }

    /// Lifetime task start/cancel totals, for lifecycle assertions.
    pub async fn task_totals(&self) -> (usize, usize) {
        self.tasks.lock().await.totals()
    }

    pub async fn active_task_count(&self) -> usize {
        self.tasks.lock().await.active_count()
    }

    /// Cancel everything owned by the active screen, for process shutdown.
    pub async fn shutdown(&self) {
        self.teardown_active_screen().await;
    }
}
