//! Domain models - core business types and floor geometry
//!
//! This module contains the canonical data types used throughout the system:
//! - `Camera`, `Guard`, `Alert` - directory and alerting entities
//! - `Detection` - signal from the motion simulator to the alert pipeline
//! - `FloorMap`, `Obstacle`, `Rect` - static per-camera floor geometry
//! - `ChatMessage` - session transcript entries

pub mod floor_map;
pub mod types;

// Re-export commonly used types at module level
pub use floor_map::{FloorMap, Obstacle, Rect};
pub use types::{
    Alert, AlertId, AlertStatus, Camera, CameraId, CameraStatus, ChatMessage, ChatRole, Detection,
    Guard, GuardStatus, Severity,
};
