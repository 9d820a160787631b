//! Scripted demo scenarios
//!
//! Each scenario is a named list of timed steps (chat messages, camera
//! switches, injected alerts, lockdown toggles) that plays out on the
//! session frame clock. Three demos ship built in: a quiet patrol, a
//! suspicious-activity investigation, and an active heist that ends in
//! lockdown.

use crate::domain::types::{Alert, AlertId, AlertStatus, CameraId, Severity};

/// One scripted action
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioStep {
    Message(String),
    FocusCamera(CameraId),
    ClearFocus,
    InjectAlert(Alert),
    ResolveAlert(AlertId),
    Lockdown(bool),
}

/// A step plus its offset from scenario start
#[derive(Debug, Clone, PartialEq)]
pub struct TimedStep {
    pub at_ms: u64,
    pub step: ScenarioStep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub duration_secs: u64,
    pub steps: Vec<TimedStep>,
}

fn msg(at_secs: f64, text: &str) -> TimedStep {
    TimedStep { at_ms: (at_secs * 1000.0) as u64, step: ScenarioStep::Message(text.to_string()) }
}

fn step(at_secs: f64, step: ScenarioStep) -> TimedStep {
    TimedStep { at_ms: (at_secs * 1000.0) as u64, step }
}

fn scripted_alert(
    id: &str,
    severity: Severity,
    kind: &str,
    message: &str,
    location: &str,
    camera: Option<u32>,
) -> Alert {
    Alert {
        id: AlertId(id.to_string()),
        severity,
        kind: kind.to_string(),
        message: message.to_string(),
        location: location.to_string(),
        camera: camera.map(CameraId),
        timestamp: "Just now".to_string(),
        status: AlertStatus::Active,
        auto_generated: false,
        created_at: 0,
    }
}

impl Scenario {
    /// Routine security check, all systems operational
    pub fn normal_patrol() -> Self {
        Self {
            id: 1,
            name: "Normal Patrol".to_string(),
            description: "Routine security check - all systems operational".to_string(),
            duration_secs: 30,
            steps: vec![
                msg(0.0, "Initiating normal patrol sequence. All systems operational."),
                step(2.0, ScenarioStep::FocusCamera(CameraId(1))),
                msg(3.0, "Camera 1 - Salle des États: 24 visitors detected. Normal activity patterns."),
                step(8.0, ScenarioStep::FocusCamera(CameraId(2))),
                msg(9.0, "Camera 2 - Daru Staircase: 18 visitors. Guard Dubois on station. All clear."),
                step(15.0, ScenarioStep::FocusCamera(CameraId(3))),
                msg(16.0, "Camera 3 - Egyptian Antiquities: 12 visitors. No suspicious activity detected."),
                msg(22.0, "Patrol complete. Museum security status: OPERATIONAL. All guards accounted for."),
                step(28.0, ScenarioStep::ClearFocus),
            ],
        }
    }

    /// Motion investigation that turns out to be a false alarm
    pub fn suspicious_activity() -> Self {
        Self {
            id: 2,
            name: "Suspicious Activity".to_string(),
            description: "Motion detected after hours - investigation required".to_string(),
            duration_secs: 45,
            steps: vec![
                msg(0.0, "Alert received: Unusual motion pattern detected in the Salle des États."),
                step(
                    1.0,
                    ScenarioStep::InjectAlert(scripted_alert(
                        "scenario-101",
                        Severity::Medium,
                        "motion",
                        "Unusual motion pattern - Salle des États",
                        "Denon Wing - Room 711",
                        Some(1),
                    )),
                ),
                step(3.0, ScenarioStep::FocusCamera(CameraId(1))),
                msg(5.0, "Switching to Camera 1. Analyzing motion patterns..."),
                msg(10.0, "Subject identified: Visitor lingering near artwork for extended period."),
                msg(15.0, "Dispatching Guard Dubois to the Salle des États for visual confirmation."),
                msg(20.0, "Guard Dubois, please investigate the Salle des États."),
                msg(25.0, "Guard Dubois en route. ETA: 30 seconds."),
                msg(32.0, "Guard Dubois reporting: Subject is a tourist taking photographs. No threat detected."),
                step(38.0, ScenarioStep::ResolveAlert(AlertId("scenario-101".to_string()))),
                msg(39.0, "Alert resolved. False alarm. Returning to normal operations."),
                step(43.0, ScenarioStep::ClearFocus),
            ],
        }
    }

    /// High-tension break-in demo ending in lockdown
    pub fn active_heist() -> Self {
        Self {
            id: 3,
            name: "Active Heist".to_string(),
            description: "Glass break in the Galerie d'Apollon - lockdown response".to_string(),
            duration_secs: 30,
            steps: vec![
                msg(0.0, "CRITICAL ALERT: Glass break detected in the Galerie d'Apollon!"),
                step(
                    0.5,
                    ScenarioStep::InjectAlert(scripted_alert(
                        "scenario-201",
                        Severity::Critical,
                        "glass-break",
                        "Glass break detected - Galerie d'Apollon",
                        "Denon Wing - Galerie d'Apollon",
                        None,
                    )),
                ),
                step(2.0, ScenarioStep::FocusCamera(CameraId(2))),
                msg(3.0, "Switching to Camera 2 - Daru Staircase. Multiple intruders detected!"),
                step(
                    5.0,
                    ScenarioStep::InjectAlert(scripted_alert(
                        "scenario-202",
                        Severity::Critical,
                        "theft",
                        "Display case breached - crown jewels collection",
                        "Denon Wing - Galerie d'Apollon",
                        None,
                    )),
                ),
                msg(7.0, "CONFIRMED: The Regent Diamond has been removed from its display case!"),
                msg(10.0, "Suspects moving toward the Daru Staircase. Dispatching all available guards."),
                step(
                    12.0,
                    ScenarioStep::InjectAlert(scripted_alert(
                        "scenario-203",
                        Severity::Critical,
                        "unauthorized-exit",
                        "Unauthorized exit attempt - service corridor",
                        "Richelieu Wing - Service Corridor",
                        Some(4),
                    )),
                ),
                step(15.0, ScenarioStep::FocusCamera(CameraId(4))),
                msg(16.0, "Suspects near Cour Marly. Camera 5 is offline - manual intervention required!"),
                msg(20.0, "Initiate emergency lockdown protocol NOW!"),
                step(22.0, ScenarioStep::Lockdown(true)),
                msg(23.0, "Museum lockdown activated. All exits sealed. Authorities en route."),
            ],
        }
    }

    pub fn all() -> Vec<Scenario> {
        vec![Self::normal_patrol(), Self::suspicious_activity(), Self::active_heist()]
    }

    pub fn by_id(id: u32) -> Option<Scenario> {
        Self::all().into_iter().find(|s| s.id == id)
    }
}

/// Advances a scenario against the session frame clock, one batch of due
/// steps per poll.
#[derive(Debug)]
pub struct ScenarioRunner {
    scenario: Scenario,
    started_at_ms: u64,
    next_step: usize,
}

impl ScenarioRunner {
    pub fn new(mut scenario: Scenario, now_ms: u64) -> Self {
        scenario.steps.sort_by_key(|s| s.at_ms);
        Self { scenario, started_at_ms: now_ms, next_step: 0 }
    }

    pub fn name(&self) -> &str {
        &self.scenario.name
    }

    /// All steps whose offset has elapsed since the last poll
    pub fn poll(&mut self, now_ms: u64) -> Vec<ScenarioStep> {
        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        let mut due = Vec::new();
        while self.next_step < self.scenario.steps.len()
            && self.scenario.steps[self.next_step].at_ms <= elapsed
        {
            due.push(self.scenario.steps[self.next_step].step.clone());
            self.next_step += 1;
        }
        due
    }

    pub fn is_complete(&self) -> bool {
        self.next_step >= self.scenario.steps.len()
    }
}
