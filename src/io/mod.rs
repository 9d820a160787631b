//! IO modules - external collaborators
//!
//! This module contains the session's outward-facing seams:
//! - `directory` - Museum mock data (cameras, guards, seed alerts, floor maps)
//! - `speech` - Best-effort, cancelable speech output

pub mod directory;
pub mod speech;

// Re-export commonly used types
pub use directory::Directory;
pub use speech::{LogSpeech, NullSpeech, Speech, SpeechOutput};
