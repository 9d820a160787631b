//! Rule-based command interpretation
//!
//! Maps free-text operator commands (typed or transcribed) to a response
//! and a list of typed side-effect directives for the session controller.
//! Pure: no state, no side effects; the same input and context always
//! produce the same result.
//!
//! Recognition is an ordered list of (predicate, handler) rules evaluated
//! top to bottom, first match wins. Ordering is behavior: the lockdown
//! trigger must not fire before the release check has had its chance, and
//! the bare "alerts" trigger sits below the guard-lookup rule. A handler
//! may decline (e.g. "show camera" with no resolvable number), in which
//! case evaluation falls through to the remaining rules.

use crate::domain::types::{Alert, Camera, CameraId, CameraStatus, Guard, GuardStatus};
use anyhow::Result;
use regex::Regex;
use smallvec::{smallvec, SmallVec};
use std::sync::LazyLock;
use tracing::debug;

/// Side-effect directive for the session controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FocusCamera(CameraId),
    /// Clear focus and show the full grid
    ShowAllCameras,
    SetLockdown(bool),
    /// Toggle the suspicious-visitors-only view filter
    SetSuspiciousFilter(bool),
    Emergency(EmergencyKind),
    ShowHelp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyKind {
    Police,
}

impl EmergencyKind {
    pub fn as_str(&self) -> &str {
        match self {
            EmergencyKind::Police => "police",
        }
    }
}

/// Response text plus zero or more effects
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub text: String,
    pub effects: SmallVec<[Effect; 2]>,
}

impl CommandResult {
    fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), effects: SmallVec::new() }
    }
}

/// Read-only context snapshot handed in by the session controller
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub cameras: &'a [Camera],
    pub guards: &'a [Guard],
    pub alerts: &'a [Alert],
}

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}").expect("static pattern is valid"));

static GUARD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:agent|guard)\s+([a-z]+(?:\s+[a-z]+)?)").expect("static pattern is valid")
});

/// Spelled-out numerals, scanned in order; first substring hit wins
const WORD_NUMBERS: [(&str, u32); 10] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Phrases that route to the landmark-lookup rule
const LANDMARKS: [&str; 7] =
    ["mona lisa", "salle des", "egyptian", "sphinx", "winged victory", "daru", "marly"];

fn normalize(input: &str) -> String {
    input.to_lowercase().trim().to_string()
}

/// Prefer a 1-3 digit numeral, else the first spelled-out numeral
fn extract_number(text: &str) -> Option<u32> {
    if let Some(m) = DIGITS.find(text) {
        if let Ok(n) = m.as_str().parse() {
            return Some(n);
        }
    }
    let normalized = normalize(text);
    WORD_NUMBERS.iter().find(|(word, _)| normalized.contains(word)).map(|(_, n)| *n)
}

fn list_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No active alerts.".to_string();
    }
    alerts
        .iter()
        .map(|a| {
            format!("• [{}] {} ({})", a.severity.as_str().to_uppercase(), a.message, a.timestamp)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_report(ctx: &CommandContext) -> String {
    let online = ctx.cameras.iter().filter(|c| c.status == CameraStatus::Active).count();
    let offline = ctx.cameras.len() - online;
    let on_duty = ctx.guards.iter().filter(|g| g.status == GuardStatus::OnDuty).count();
    let alerts_line = if ctx.alerts.is_empty() {
        "No active alerts.".to_string()
    } else {
        format!("Alerts: {} active.\n{}", ctx.alerts.len(), list_alerts(ctx.alerts))
    };
    [
        format!(
            "System status: {}/{} cameras online, {} offline.",
            online,
            ctx.cameras.len(),
            offline
        ),
        format!("Guards on duty: {}/{}.", on_duty, ctx.guards.len()),
        alerts_line,
    ]
    .join("\n")
}

fn help_text() -> String {
    [
        "Try commands like:",
        "• 'status report'",
        "• 'show camera 2' or 'show all cameras'",
        "• 'where is agent Dubois'",
        "• 'any alerts?' or 'what's wrong?'",
        "• 'initiate lockdown', 'release lockdown'",
        "• 'show suspicious' or 'show every visitor'",
        "• 'mona lisa' or 'salle des états'",
    ]
    .join("\n")
}

type Predicate = fn(&str) -> bool;
type Handler = fn(&str, &str, &CommandContext<'_>) -> Option<CommandResult>;

/// Ordered rule table; see module docs for why the order matters
const RULES: &[(Predicate, Handler)] = &[
    (is_status, handle_status),
    (is_show_camera, handle_show_camera),
    (is_show_all, handle_show_all),
    (is_guard_lookup, handle_guard_lookup),
    (is_alerts, handle_alerts),
    (is_lockdown_engage, handle_lockdown_engage),
    (is_lockdown_release, handle_lockdown_release),
    (is_filter_suspicious, handle_filter_suspicious),
    (is_show_everyone, handle_show_everyone),
    (is_emergency, handle_emergency),
    (is_landmark, handle_landmark),
    (is_help, handle_help),
];

fn is_status(cmd: &str) -> bool {
    cmd.contains("status")
}

fn handle_status(_cmd: &str, _raw: &str, ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult::text_only(status_report(ctx)))
}

fn is_show_camera(cmd: &str) -> bool {
    cmd.contains("show camera")
}

fn handle_show_camera(cmd: &str, _raw: &str, ctx: &CommandContext) -> Option<CommandResult> {
    // No resolvable number: decline and let later rules have a look
    let n = extract_number(cmd)?;
    match ctx.cameras.iter().find(|c| c.id == CameraId(n)) {
        Some(camera) => Some(CommandResult {
            text: format!("Showing {}.", camera.name),
            effects: smallvec![Effect::FocusCamera(camera.id)],
        }),
        None => Some(CommandResult::text_only(format!("Camera {} not found.", n))),
    }
}

fn is_show_all(cmd: &str) -> bool {
    cmd.contains("show all camera") || cmd.contains("show all feeds") || cmd.contains("show all")
}

fn handle_show_all(_cmd: &str, _raw: &str, _ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult {
        text: "Displaying all camera feeds.".to_string(),
        effects: smallvec![Effect::ShowAllCameras],
    })
}

fn is_guard_lookup(cmd: &str) -> bool {
    cmd.contains("where is agent")
        || cmd.contains("where's agent")
        || cmd.contains("where is guard")
        || cmd.contains("where's guard")
        || (cmd.contains("where is") && (cmd.contains("agent") || cmd.contains("guard")))
}

fn handle_guard_lookup(_cmd: &str, raw: &str, ctx: &CommandContext) -> Option<CommandResult> {
    let token = GUARD_NAME
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase());
    let Some(token) = token else {
        return Some(CommandResult::text_only(
            "Please specify an agent name, e.g., 'Where is Agent Dubois?'",
        ));
    };
    match ctx.guards.iter().find(|g| g.name.to_lowercase().contains(&token)) {
        Some(guard) => Some(CommandResult::text_only(format!(
            "{} is at {} ({}).",
            guard.name,
            guard.location,
            guard.status.as_str()
        ))),
        None => Some(CommandResult::text_only(format!(
            "I don't have a current location for {}.",
            token
        ))),
    }
}

fn is_alerts(cmd: &str) -> bool {
    cmd.contains("any alerts")
        || cmd.contains("what's wrong")
        || cmd.contains("what is wrong")
        || cmd.contains("alerts")
}

fn handle_alerts(_cmd: &str, _raw: &str, ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult::text_only(list_alerts(ctx.alerts)))
}

fn is_lockdown_engage(cmd: &str) -> bool {
    cmd.contains("initiate lockdown") || (cmd.contains("lockdown") && !cmd.contains("release"))
}

fn handle_lockdown_engage(_cmd: &str, _raw: &str, _ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult {
        text: "Initiating museum lockdown protocol. All visitors evacuated, entrances secured."
            .to_string(),
        effects: smallvec![Effect::SetLockdown(true)],
    })
}

fn is_lockdown_release(cmd: &str) -> bool {
    cmd.contains("release lockdown")
        || cmd.contains("end lockdown")
        || cmd.contains("cancel lockdown")
}

fn handle_lockdown_release(_cmd: &str, _raw: &str, _ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult {
        text: "Lockdown released. Museum operations resuming to normal.".to_string(),
        effects: smallvec![Effect::SetLockdown(false)],
    })
}

fn is_filter_suspicious(cmd: &str) -> bool {
    cmd.contains("show suspicious")
        || cmd.contains("suspicious only")
        || cmd.contains("show only suspicious")
}

fn handle_filter_suspicious(_cmd: &str, _raw: &str, _ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult {
        text: "Filtering view to show only suspicious individuals.".to_string(),
        effects: smallvec![Effect::SetSuspiciousFilter(true)],
    })
}

fn is_show_everyone(cmd: &str) -> bool {
    cmd.contains("show every visitor") || cmd.contains("show everyone")
}

fn handle_show_everyone(_cmd: &str, _raw: &str, _ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult {
        text: "Displaying all visitors.".to_string(),
        effects: smallvec![Effect::SetSuspiciousFilter(false)],
    })
}

fn is_emergency(cmd: &str) -> bool {
    cmd.contains("call police") || cmd.contains("emergency") || cmd.contains("panic")
}

fn handle_emergency(_cmd: &str, _raw: &str, _ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult {
        text: "Emergency services protocol triggered. Contacting local authorities and \
               broadcasting message to security team."
            .to_string(),
        effects: smallvec![Effect::Emergency(EmergencyKind::Police)],
    })
}

fn is_landmark(cmd: &str) -> bool {
    LANDMARKS.iter().any(|l| cmd.contains(l))
}

fn handle_landmark(cmd: &str, _raw: &str, ctx: &CommandContext) -> Option<CommandResult> {
    // Two checks, both kept: the whole command as a substring of the
    // camera's "name room" text (hits for terse commands like "daru"),
    // then the landmark-to-wing table.
    let camera = ctx.cameras.iter().find(|c| {
        let search = format!("{} {}", c.name, c.room).to_lowercase();
        search.contains(cmd)
            || (cmd.contains("mona lisa") && search.contains("salle"))
            || (cmd.contains("egyptian") && search.contains("egyptian"))
            || (cmd.contains("sphinx") && search.contains("egyptian"))
            || (cmd.contains("winged victory") && search.contains("daru"))
            || (cmd.contains("marly") && search.contains("marly"))
    });
    match camera {
        Some(camera) => Some(CommandResult {
            text: format!("Focusing on {}.", camera.name),
            effects: smallvec![Effect::FocusCamera(camera.id)],
        }),
        None => Some(CommandResult::text_only("I could not find a camera for that location.")),
    }
}

fn is_help(cmd: &str) -> bool {
    cmd == "help" || cmd.contains("help me") || cmd.contains("what can you do")
}

fn handle_help(_cmd: &str, _raw: &str, _ctx: &CommandContext) -> Option<CommandResult> {
    Some(CommandResult { text: help_text(), effects: smallvec![Effect::ShowHelp] })
}

/// Interpret one command against the current context snapshot.
///
/// Fallible at the seam so the caller can substitute a generic failure
/// message; the current rule set is total and does not error.
pub fn interpret(input: &str, ctx: &CommandContext) -> Result<CommandResult> {
    let cmd = normalize(input);
    debug!(input = %input, "command_received");

    for (matches, handle) in RULES {
        if matches(&cmd) {
            if let Some(result) = handle(&cmd, input, ctx) {
                return Ok(result);
            }
        }
    }

    Ok(CommandResult::text_only(format!("I didn't catch that. {}", help_text())))
}
