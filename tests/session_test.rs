//! End-to-end session flows through the public API
//!
//! Drives the session controller the way a binary would: commands in,
//! frames advanced on a synthetic clock, state observed through the
//! render accessors.

use artguard::domain::{CameraId, ChatRole, Severity};
use artguard::infra::{Config, Metrics};
use artguard::io::{Directory, Speech};
use artguard::services::SessionController;
use std::sync::Arc;

fn session_with_defaults() -> SessionController {
    SessionController::new(
        Config::default(),
        Directory::builtin(),
        Arc::new(Metrics::new()),
        Speech::disabled(),
    )
}

#[test]
fn test_status_report_reflects_builtin_directory() {
    let mut session = session_with_defaults();
    session.handle_command("status report", 1000);

    let reply = session
        .transcript()
        .filter(|m| m.role == ChatRole::Assistant)
        .last()
        .unwrap()
        .content
        .clone();
    assert!(reply.starts_with("System status: 4/5 cameras online, 1 offline."));
    assert!(reply.contains("Guards on duty: 3/4."));
    assert!(reply.contains("Alerts: 2 active."));
}

#[test]
fn test_focus_landmark_and_release_flow() {
    let mut session = session_with_defaults();

    session.handle_command("mona lisa", 1000);
    assert_eq!(session.focused(), Some(CameraId(1)));

    session.handle_command("show all feeds", 2000);
    assert_eq!(session.focused(), None);

    session.handle_command("where is agent dubois", 3000);
    let reply = session
        .transcript()
        .filter(|m| m.role == ChatRole::Assistant)
        .last()
        .unwrap()
        .content
        .clone();
    assert_eq!(reply, "Guard Dubois is at Salle des États (on-duty).");
}

#[test]
fn test_heist_scenario_injects_then_lockdown_clears() {
    let mut session = session_with_defaults();
    let seed_count = Directory::builtin().seed_alerts.len();
    assert!(session.run_scenario(3, 0));

    // Mid-scenario the three scripted critical alerts are live
    session.frame(13_000);
    let critical = session
        .visible_alerts()
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .count();
    assert_eq!(critical, 3);

    // The scripted lockdown clears every dynamic alert and empties rooms
    session.frame(24_000);
    assert!(session.is_lockdown());
    assert_eq!(session.visible_alerts().len(), seed_count);
    for frame in session.camera_frames() {
        assert!(frame.dots.is_empty());
        assert_eq!(frame.count_label, "LOCKDOWN");
    }

    // Releasing by command brings the visitors back on the next frame
    session.handle_command("release lockdown", 30_000);
    assert!(!session.is_lockdown());
    session.frame(30_100);
    for frame in session.camera_frames() {
        assert!(!frame.dots.is_empty());
    }
}

#[test]
fn test_dismissals_survive_until_lockdown() {
    let mut session = session_with_defaults();
    let seed_id = Directory::builtin().seed_alerts[0].id.clone();
    let seed_count = Directory::builtin().seed_alerts.len();

    session.dismiss_alert(&seed_id);
    assert_eq!(session.visible_alerts().len(), seed_count - 1);

    // Dismissing again changes nothing
    session.dismiss_alert(&seed_id);
    assert_eq!(session.visible_alerts().len(), seed_count - 1);

    // Lockdown forgets dismissals; release restores the full seed set
    session.handle_command("initiate lockdown", 1000);
    session.handle_command("release lockdown", 2000);
    assert_eq!(session.visible_alerts().len(), seed_count);
}

#[test]
fn test_alerts_render_in_severity_order() {
    let mut session = session_with_defaults();
    // Heist injects three criticals above the medium/low seeds
    session.run_scenario(3, 0);
    session.frame(13_000);

    let severities: Vec<Severity> =
        session.visible_alerts().iter().map(|a| a.severity).collect();
    let mut sorted = severities.clone();
    sorted.sort();
    assert_eq!(severities, sorted, "alert panel must be in severity order");
    assert_eq!(severities.first(), Some(&Severity::Critical));
}

#[test]
fn test_fallback_reply_includes_help() {
    let mut session = session_with_defaults();
    session.handle_command("asdkjasd", 1000);
    let reply = session
        .transcript()
        .filter(|m| m.role == ChatRole::Assistant)
        .last()
        .unwrap()
        .content
        .clone();
    assert!(reply.starts_with("I didn't catch that."));
    assert!(reply.contains("Try commands like:"));
}
