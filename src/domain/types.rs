//! Shared types for the museum security core

use serde::{Deserialize, Serialize};

/// Newtype wrapper for camera IDs to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CameraId(pub u32);

impl std::fmt::Display for CameraId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for alert IDs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct AlertId(pub String);

impl AlertId {
    /// Derive a unique id for an auto-generated alert from its creation
    /// epoch and originating camera.
    pub fn generated(epoch_ms: u64, camera: CameraId) -> Self {
        Self(format!("alert-{}-{}", epoch_ms, camera))
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Camera operational state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Active,
    Offline,
}

impl CameraStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CameraStatus::Active => "active",
            CameraStatus::Offline => "offline",
        }
    }
}

/// A monitored camera feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: CameraId,
    pub name: String,
    pub status: CameraStatus,
    /// Room or wing the camera covers, e.g. "Denon Wing - Room 711"
    pub room: String,
    /// Explicit population override; random draw when absent
    #[serde(default)]
    pub people_count: Option<usize>,
}

/// Guard duty state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardStatus {
    OnDuty,
    OffDuty,
    OnBreak,
}

impl GuardStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GuardStatus::OnDuty => "on-duty",
            GuardStatus::OffDuty => "off-duty",
            GuardStatus::OnBreak => "on-break",
        }
    }
}

/// A security guard with a last known post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub name: String,
    pub location: String,
    pub status: GuardStatus,
}

/// Alert severity, declared in display order so that sorting ascending
/// puts critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Display rank, critical lowest
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }
}

/// Alert lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Investigating,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Investigating => "investigating",
            AlertStatus::Resolved => "resolved",
        }
    }
}

/// A security alert, either seeded at startup or generated by the
/// detection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub severity: Severity,
    /// Short machine tag, e.g. "suspicious-activity", "motion"
    pub kind: String,
    pub message: String,
    pub location: String,
    #[serde(default)]
    pub camera: Option<CameraId>,
    /// Human-facing time label, e.g. "Just now", "2 min ago"
    pub timestamp: String,
    pub status: AlertStatus,
    #[serde(default)]
    pub auto_generated: bool,
    /// Creation time in epoch milliseconds (0 for seed data)
    #[serde(default)]
    pub created_at: u64,
}

/// Detection signal produced by a camera's motion simulator when a
/// visitor has dwelled past the suspicion threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub camera: CameraId,
    /// Dot position in base (unscaled) floor-map coordinates
    pub x: f64,
    pub y: f64,
}

/// Chat transcript author
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Epoch milliseconds at append time
    pub at_ms: u64,
}
