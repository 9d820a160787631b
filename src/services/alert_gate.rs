//! Per-camera alert cooldown gate
//!
//! The motion simulator signals a dwelling visitor on every tick, which
//! would flood the alert panel. This gate converts detection events into
//! at most one alert per camera per cooldown window. The limiter is per
//! camera, not global: two cameras can each alert inside the same window.

use crate::domain::types::{Alert, AlertId, AlertStatus, Camera, CameraId, Severity};
use rustc_hash::FxHashMap;
use tracing::info;

pub struct AlertCooldownGate {
    cooldown_ms: u64,
    /// Last alert epoch (ms) per camera; absent means never alerted
    last_alert_ms: FxHashMap<CameraId, u64>,
}

impl AlertCooldownGate {
    pub fn new(cooldown_ms: u64) -> Self {
        Self { cooldown_ms, last_alert_ms: FxHashMap::default() }
    }

    /// Convert a detection on `camera` into an alert, unless one was
    /// already emitted for that camera inside the cooldown window.
    pub fn notify(&mut self, camera: &Camera, now_ms: u64) -> Option<Alert> {
        let last = self.last_alert_ms.get(&camera.id).copied().unwrap_or(0);
        if now_ms.saturating_sub(last) < self.cooldown_ms {
            return None;
        }
        self.last_alert_ms.insert(camera.id, now_ms);

        let alert = Alert {
            id: AlertId::generated(now_ms, camera.id),
            severity: Severity::High,
            kind: "suspicious-activity".to_string(),
            message: format!("Suspicious loitering detected - {}", camera.room),
            location: camera.room.clone(),
            camera: Some(camera.id),
            timestamp: "Just now".to_string(),
            status: AlertStatus::Active,
            auto_generated: true,
            created_at: now_ms,
        };
        info!(camera = %camera.id, room = %camera.room, alert_id = %alert.id, "alert_emitted");
        Some(alert)
    }

    /// Forget all cooldown history (lockdown transitions)
    pub fn reset(&mut self) {
        self.last_alert_ms.clear();
    }

    #[cfg(test)]
    pub fn tracked_cameras(&self) -> usize {
        self.last_alert_ms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CameraStatus;

    fn camera(id: u32, room: &str) -> Camera {
        Camera {
            id: CameraId(id),
            name: format!("Camera {}", id),
            status: CameraStatus::Active,
            room: room.to_string(),
            people_count: None,
        }
    }

    #[test]
    fn test_first_detection_alerts() {
        let mut gate = AlertCooldownGate::new(45_000);
        let cam = camera(1, "Denon Wing - Room 711");

        let alert = gate.notify(&cam, 100_000).expect("first detection should alert");
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.kind, "suspicious-activity");
        assert_eq!(alert.message, "Suspicious loitering detected - Denon Wing - Room 711");
        assert_eq!(alert.camera, Some(CameraId(1)));
        assert!(alert.auto_generated);
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(alert.created_at, 100_000);
    }

    #[test]
    fn test_repeat_within_window_is_suppressed() {
        let mut gate = AlertCooldownGate::new(45_000);
        let cam = camera(1, "Gallery 3");

        assert!(gate.notify(&cam, 100_000).is_some());
        // 10 seconds later: suppressed
        assert!(gate.notify(&cam, 110_000).is_none());
    }

    #[test]
    fn test_repeat_after_window_alerts_again() {
        let mut gate = AlertCooldownGate::new(45_000);
        let cam = camera(1, "Gallery 3");

        assert!(gate.notify(&cam, 100_000).is_some());
        // 46 seconds later: window elapsed
        assert!(gate.notify(&cam, 146_000).is_some());
    }

    #[test]
    fn test_cameras_rate_limit_independently() {
        let mut gate = AlertCooldownGate::new(45_000);
        let cam1 = camera(1, "Gallery 3");
        let cam2 = camera(2, "Daru Staircase");

        assert!(gate.notify(&cam1, 100_000).is_some());
        // Different camera inside the same window still alerts
        assert!(gate.notify(&cam2, 105_000).is_some());
        assert!(gate.notify(&cam1, 110_000).is_none());
        assert!(gate.notify(&cam2, 110_000).is_none());
    }

    #[test]
    fn test_alert_ids_are_unique_per_camera_and_epoch() {
        let mut gate = AlertCooldownGate::new(0);
        let cam1 = camera(1, "A");
        let cam2 = camera(2, "B");
        let a = gate.notify(&cam1, 1000).unwrap();
        let b = gate.notify(&cam2, 1000).unwrap();
        let c = gate.notify(&cam1, 2000).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_reset_clears_cooldowns() {
        let mut gate = AlertCooldownGate::new(45_000);
        let cam = camera(1, "Gallery 3");

        assert!(gate.notify(&cam, 100_000).is_some());
        assert_eq!(gate.tracked_cameras(), 1);

        gate.reset();
        assert_eq!(gate.tracked_cameras(), 0);
        // Immediately after reset the same camera may alert again
        assert!(gate.notify(&cam, 101_000).is_some());
    }
}
