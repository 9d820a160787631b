//! Suspicious-activity detection seam
//!
//! Thin forwarding layer between the motion simulators and the alert
//! pipeline. The simulator raises a raw per-dot signal every tick while a
//! visitor dwells; this seam stamps it with the camera id and hands it to
//! the session over a channel, keeping alert-state mutation out of the
//! simulation tick's own call frame.

use crate::domain::types::{CameraId, Detection};
use crate::services::simulator::Dot;
use tokio::sync::mpsc;
use tracing::debug;

/// Stateless wrapper turning simulator signals into `Detection` events
#[derive(Clone)]
pub struct SuspiciousActivityDetector {
    tx: mpsc::Sender<Detection>,
}

impl SuspiciousActivityDetector {
    /// Create a detector and the receiving end of its event channel
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Detection>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Forward one per-dot signal. Lossy by design: if the channel is
    /// full the event is dropped, because the same dot will signal again
    /// next tick.
    pub fn observe(&self, camera: CameraId, dot: &Dot) {
        let detection = Detection { camera, x: dot.x, y: dot.y };
        if self.tx.try_send(detection).is_err() {
            debug!(camera = %camera, "detection_channel_full");
        }
    }
}
