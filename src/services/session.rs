//! Session controller - owns the live dashboard state
//!
//! One instance per operator session. Owns the simulator arena (one
//! motion simulator per camera, created on first use), the alert
//! pipeline (detector → cooldown gate → store), the chat transcript,
//! and the focus / lockdown / filter flags. Commands and frame ticks
//! are both applied here, on one task, so no state needs locking.
//!
//! The frame clock is an explicit tokio interval in `run`; every state
//! transition takes `now_ms` as a parameter, which keeps the whole
//! controller drivable from tests without timers or a display.

use crate::domain::floor_map::FloorMap;
use crate::domain::types::{
    Alert, AlertId, Camera, CameraId, ChatMessage, ChatRole, Detection,
};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::io::directory::Directory;
use crate::io::speech::Speech;
use crate::services::alert_gate::AlertCooldownGate;
use crate::services::alert_store::AlertStore;
use crate::services::detector::SuspiciousActivityDetector;
use crate::services::interpreter::{self, CommandContext, Effect};
use crate::services::scenario::{Scenario, ScenarioRunner, ScenarioStep};
use crate::services::simulator::{Dot, DotColor, Simulator, SimulatorParams};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tracing::{error, info, warn};

/// Detection channel depth; ample for a handful of dwelling dots per frame
const DETECTION_CHANNEL_CAPACITY: usize = 256;

/// Current wall-clock epoch in milliseconds
pub fn epoch_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Per-frame render snapshot for one camera feed
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub camera: Camera,
    pub map: FloorMap,
    /// Dots already filtered for lockdown / suspicious-only display
    pub dots: Vec<Dot>,
    /// Footer label, e.g. "14 VISITORS", "2 SUSPICIOUS", "LOCKDOWN"
    pub count_label: String,
    pub has_alert: bool,
}

pub struct SessionController {
    config: Config,
    directory: Directory,
    metrics: Arc<Metrics>,
    speech: Speech,
    simulators: FxHashMap<CameraId, Simulator>,
    detector: SuspiciousActivityDetector,
    detection_rx: mpsc::Receiver<Detection>,
    gate: AlertCooldownGate,
    alert_store: AlertStore,
    scenario: Option<ScenarioRunner>,
    transcript: VecDeque<ChatMessage>,
    response_tx: Option<mpsc::UnboundedSender<ChatMessage>>,
    focused: Option<CameraId>,
    lockdown: bool,
    show_only_suspicious: bool,
    /// Rejects commands submitted while one is still being applied
    processing: bool,
}

impl SessionController {
    pub fn new(config: Config, directory: Directory, metrics: Arc<Metrics>, speech: Speech) -> Self {
        let (detector, detection_rx) =
            SuspiciousActivityDetector::channel(DETECTION_CHANNEL_CAPACITY);
        let alert_store = AlertStore::new(directory.seed_alerts.clone());
        let gate = AlertCooldownGate::new(config.cooldown_ms());
        Self {
            config,
            directory,
            metrics,
            speech,
            simulators: FxHashMap::default(),
            detector,
            detection_rx,
            gate,
            alert_store,
            scenario: None,
            transcript: VecDeque::new(),
            response_tx: None,
            focused: None,
            lockdown: false,
            show_only_suspicious: false,
            processing: false,
        }
    }

    /// Mirror every transcript append onto a channel (console output)
    pub fn with_response_channel(mut self, tx: mpsc::UnboundedSender<ChatMessage>) -> Self {
        self.response_tx = Some(tx);
        self
    }

    // ------------------------------------------------------------------
    // Read accessors for renderers
    // ------------------------------------------------------------------

    pub fn site_name(&self) -> &str {
        self.config.site_name()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn focused(&self) -> Option<CameraId> {
        self.focused
    }

    pub fn is_lockdown(&self) -> bool {
        self.lockdown
    }

    pub fn show_only_suspicious(&self) -> bool {
        self.show_only_suspicious
    }

    pub fn transcript(&self) -> impl Iterator<Item = &ChatMessage> {
        self.transcript.iter()
    }

    pub fn visible_alerts(&self) -> Vec<Alert> {
        self.alert_store.visible()
    }

    pub fn scenario_name(&self) -> Option<&str> {
        self.scenario.as_ref().map(|r| r.name())
    }

    /// Render snapshots for the feeds currently on screen
    pub fn camera_frames(&self) -> Vec<CameraFrame> {
        let alerts = self.alert_store.visible();
        self.visible_camera_ids()
            .into_iter()
            .filter_map(|id| {
                let camera = self.directory.camera(id)?.clone();
                let map = self.directory.floor_map(id)?.clone();
                let all_dots =
                    self.simulators.get(&id).map(|s| s.dots().to_vec()).unwrap_or_default();
                let dots: Vec<Dot> = if self.lockdown {
                    Vec::new()
                } else if self.show_only_suspicious {
                    all_dots.iter().filter(|d| d.color == DotColor::Red).cloned().collect()
                } else {
                    all_dots
                };
                let count_label = if self.lockdown {
                    "LOCKDOWN".to_string()
                } else if self.show_only_suspicious {
                    format!("{} SUSPICIOUS", dots.len())
                } else {
                    format!("{} VISITORS", dots.len())
                };
                let has_alert = alerts.iter().any(|a| a.camera == Some(id));
                Some(CameraFrame { camera, map, dots, count_label, has_alert })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Frame step
    // ------------------------------------------------------------------

    /// Advance the session by one frame: scenario playback, one motion
    /// tick per visible camera, then alert pipeline drainage.
    pub fn frame(&mut self, now_ms: u64) {
        self.poll_scenario(now_ms);

        // An engaged museum is empty: no ticking, no lazy re-seeding
        if !self.lockdown {
            let scale = if self.focused.is_some() { self.config.focus_scale() } else { 1.0 };
            for id in self.visible_camera_ids() {
                if !self.ensure_simulator(id, now_ms) {
                    continue;
                }
                if let Some(sim) = self.simulators.get_mut(&id) {
                    let flagged = sim.tick(scale, now_ms);
                    self.metrics.record_tick();
                    for idx in flagged {
                        self.metrics.record_detection();
                        self.detector.observe(id, &sim.dots()[idx]);
                    }
                }
            }
        }

        // Detections cross a channel so alert state is never mutated from
        // inside the simulation step itself
        let mut pending = Vec::new();
        while let Ok(detection) = self.detection_rx.try_recv() {
            pending.push(detection);
        }
        for detection in pending {
            self.handle_detection(detection, now_ms);
        }
    }

    fn visible_camera_ids(&self) -> Vec<CameraId> {
        match self.focused {
            Some(id) => vec![id],
            None => self.directory.grid_cameras().map(|c| c.id).collect(),
        }
    }

    /// Create the camera's simulator on first use. Returns false when the
    /// camera has no floor map (the renderer shows a placeholder and the
    /// simulator is simply never invoked).
    fn ensure_simulator(&mut self, id: CameraId, now_ms: u64) -> bool {
        if self.simulators.contains_key(&id) {
            return true;
        }
        let Some(map) = self.directory.floor_map(id) else {
            return false;
        };
        let population = self.directory.camera(id).and_then(|c| c.people_count);
        let mut sim = Simulator::new(map.clone(), SimulatorParams::from(&self.config));
        sim.ensure_spawned(now_ms, population);
        self.simulators.insert(id, sim);
        true
    }

    fn reset_simulators(&mut self) {
        self.simulators.clear();
    }

    fn handle_detection(&mut self, detection: Detection, now_ms: u64) {
        let Some(camera) = self.directory.camera(detection.camera).cloned() else {
            return;
        };
        match self.gate.notify(&camera, now_ms) {
            Some(alert) => {
                let announcement = format!("Alert: {}", alert.message);
                self.alert_store.add(alert);
                self.metrics.record_alert_emitted();
                self.push_message(ChatRole::Assistant, &announcement, now_ms);
                self.speech
                    .say(&format!("Alert: Suspicious loitering detected at {}", camera.room));
            }
            None => self.metrics.record_alert_suppressed(),
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Interpret one operator command and apply its effects. A command
    /// arriving while another is in flight is dropped, not queued.
    pub fn handle_command(&mut self, input: &str, now_ms: u64) {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.processing {
            warn!("command_dropped_busy");
            self.metrics.record_command_dropped();
            return;
        }
        self.processing = true;
        self.push_message(ChatRole::User, trimmed, now_ms);

        let result = {
            let alerts = self.alert_store.visible();
            let ctx = CommandContext {
                cameras: &self.directory.cameras,
                guards: &self.directory.guards,
                alerts: &alerts,
            };
            interpreter::interpret(trimmed, &ctx)
        };

        match result {
            Ok(result) => {
                self.push_message(ChatRole::Assistant, &result.text, now_ms);
                self.apply_effects(&result.effects, now_ms);
                self.speech.say(&result.text);
                self.metrics.record_command_processed();
            }
            Err(e) => {
                error!(error = %e, "command_interpretation_failed");
                self.push_message(
                    ChatRole::Assistant,
                    "I hit an error processing that command.",
                    now_ms,
                );
            }
        }
        self.processing = false;
    }

    /// Apply interpreter effects. Idempotent: re-applying the current
    /// state is a no-op.
    fn apply_effects(&mut self, effects: &[Effect], now_ms: u64) {
        for effect in effects {
            match effect {
                Effect::FocusCamera(id) => {
                    info!(camera = %id, "focus_camera");
                    self.focused = Some(*id);
                }
                Effect::ShowAllCameras => {
                    info!("show_all_cameras");
                    self.focused = None;
                }
                Effect::SetLockdown(engaged) => self.set_lockdown(*engaged, now_ms),
                Effect::SetSuspiciousFilter(only) => {
                    self.show_only_suspicious = *only;
                }
                Effect::Emergency(kind) => {
                    warn!(kind = %kind.as_str(), "emergency_triggered");
                }
                Effect::ShowHelp => {}
            }
        }
    }

    fn set_lockdown(&mut self, engaged: bool, _now_ms: u64) {
        if self.lockdown == engaged {
            return;
        }
        self.lockdown = engaged;
        if engaged {
            // Engage wipes the generated alerts and all dismissals so a
            // later release starts from the untouched seed set
            self.alert_store.clear_dynamic();
            self.metrics.record_lockdown();
            info!("lockdown_engaged");
        } else {
            info!("lockdown_released");
        }
        self.gate.reset();
        self.reset_simulators();
    }

    /// Operator dismissed an alert from the panel
    pub fn dismiss_alert(&mut self, id: &AlertId) {
        self.alert_store.dismiss(id);
        self.metrics.record_alert_dismissed();
    }

    /// Start a scripted demo scenario; replaces any scenario in flight
    pub fn run_scenario(&mut self, id: u32, now_ms: u64) -> bool {
        match Scenario::by_id(id) {
            Some(scenario) => {
                info!(scenario = %scenario.name, "scenario_started");
                self.scenario = Some(ScenarioRunner::new(scenario, now_ms));
                true
            }
            None => {
                warn!(scenario_id = %id, "scenario_unknown");
                false
            }
        }
    }

    fn poll_scenario(&mut self, now_ms: u64) {
        let Some(runner) = self.scenario.as_mut() else {
            return;
        };
        let due = runner.poll(now_ms);
        let complete = runner.is_complete();
        let name = runner.name().to_string();

        for step in due {
            self.metrics.record_scenario_step();
            self.apply_scenario_step(step, now_ms);
        }
        if complete {
            info!(scenario = %name, "scenario_complete");
            self.scenario = None;
        }
    }

    fn apply_scenario_step(&mut self, step: ScenarioStep, now_ms: u64) {
        match step {
            ScenarioStep::Message(text) => {
                self.push_message(ChatRole::Assistant, &text, now_ms);
            }
            ScenarioStep::FocusCamera(id) => {
                if self.directory.camera(id).is_some() {
                    self.focused = Some(id);
                }
            }
            ScenarioStep::ClearFocus => self.focused = None,
            ScenarioStep::InjectAlert(alert) => self.alert_store.add(alert),
            ScenarioStep::ResolveAlert(id) => self.alert_store.dismiss(&id),
            ScenarioStep::Lockdown(engaged) => self.set_lockdown(engaged, now_ms),
        }
    }

    // ------------------------------------------------------------------
    // Transcript
    // ------------------------------------------------------------------

    pub fn push_message(&mut self, role: ChatRole, content: &str, now_ms: u64) {
        let message = ChatMessage { role, content: content.to_string(), at_ms: now_ms };
        while self.transcript.len() >= self.config.max_transcript() {
            self.transcript.pop_front();
        }
        self.transcript.push_back(message.clone());
        if let Some(tx) = &self.response_tx {
            let _ = tx.send(message);
        }
    }

    // ------------------------------------------------------------------
    // Run loop
    // ------------------------------------------------------------------

    /// Drive the session until the command channel closes or shutdown is
    /// signaled. Frames advance on a free-running interval; commands are
    /// applied between frames.
    pub async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<String>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut frames = interval(Duration::from_millis(self.config.frame_interval_ms()));
        loop {
            tokio::select! {
                _ = frames.tick() => {
                    self.frame(epoch_ms());
                }
                command = command_rx.recv() => {
                    match command {
                        Some(text) => self.handle_command(&text, epoch_ms()),
                        None => break,
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("session_shutdown");
                        break;
                    }
                }
            }
        }
        self.speech.stop();
    }
}
