//! Services - business logic and state management
//!
//! This module contains the core business logic services:
//! - `session` - Session controller owning all live dashboard state
//! - `simulator` - Per-camera visitor motion simulation
//! - `detector` - Suspicious-activity detection seam
//! - `alert_gate` - Per-camera alert cooldown debouncing
//! - `alert_store` - Merged, dismissal-aware alert collection
//! - `interpreter` - Rule-based command interpretation
//! - `scenario` - Scripted demo scenario playback

pub mod alert_gate;
pub mod alert_store;
pub mod detector;
pub mod interpreter;
pub mod scenario;
pub mod session;
pub mod simulator;

// Re-export commonly used types
pub use interpreter::{CommandContext, CommandResult, Effect};
pub use session::SessionController;
pub use simulator::{Dot, DotColor, Simulator};
