//! ArtGuard TUI - live museum security dashboard
//!
//! Renders the camera feeds (floor plans + visitor dots), the alert
//! panel, and the command chat in the terminal. The session core runs
//! in-process; every UI tick advances the simulation one frame.
//!
//! Keyboard:
//! - type + Enter: send a command ("show camera 2", "initiate lockdown", ...)
//! - F1/F2/F3: run a scripted scenario (patrol / suspicious / heist)
//! - F8: dismiss the top alert
//! - Esc: quit
//!
//! Usage:
//!   cargo run --bin artguard-tui -- --config config/dev.toml

use artguard::domain::{ChatRole, Severity};
use artguard::infra::{Config, Metrics};
use artguard::io::{Directory, Speech};
use artguard::services::session::{epoch_ms, CameraFrame, SessionController};
use artguard::services::DotColor;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points, Rectangle},
        Block, Borders, List, ListItem, Paragraph,
    },
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "artguard-tui")]
#[command(about = "ArtGuard terminal dashboard")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

struct App {
    session: SessionController,
    input: String,
}

impl App {
    fn new(session: SessionController) -> Self {
        Self { session, input: String::new() }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    let directory = Directory::load(config.directory_file());

    let mut session = SessionController::new(
        config,
        directory,
        Arc::new(Metrics::new()),
        // The terminal owns stdout; simulated speech would fight the UI
        Speech::disabled(),
    );
    session.push_message(
        ChatRole::Assistant,
        "System online. Say 'status report' or try 'help' to see commands.",
        epoch_ms(),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui(&mut terminal, App::new(session));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(33);
    let mut last_tick = Instant::now();

    loop {
        app.session.frame(epoch_ms());
        terminal.draw(|f| draw_ui(f, &app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => return Ok(()),
                        KeyCode::Enter => {
                            let command = std::mem::take(&mut app.input);
                            app.session.handle_command(&command, epoch_ms());
                        }
                        KeyCode::Backspace => {
                            app.input.pop();
                        }
                        KeyCode::F(1) => {
                            app.session.run_scenario(1, epoch_ms());
                        }
                        KeyCode::F(2) => {
                            app.session.run_scenario(2, epoch_ms());
                        }
                        KeyCode::F(3) => {
                            app.session.run_scenario(3, epoch_ms());
                        }
                        KeyCode::F(8) => {
                            if let Some(alert) = app.session.visible_alerts().first() {
                                let id = alert.id.clone();
                                app.session.dismiss_alert(&id);
                            }
                        }
                        KeyCode::Char(c) => app.input.push(c),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
        ])
        .split(f.area());

    draw_header(f, main_chunks[0], app);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(38), // Chat + input
            Constraint::Percentage(62), // Cameras + alerts
        ])
        .split(main_chunks[1]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(body_chunks[0]);

    draw_chat(f, left_chunks[0], app);
    draw_input(f, left_chunks[1], app);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(body_chunks[1]);

    draw_cameras(f, right_chunks[0], app);
    draw_alerts(f, right_chunks[1], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let mut spans = vec![
        Span::styled(
            format!("{} ", session.site_name()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::styled("ONLINE", Style::default().fg(Color::Green)),
    ];
    if session.is_lockdown() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "LOCKDOWN",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if session.show_only_suspicious() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("SUSPICIOUS ONLY", Style::default().fg(Color::Yellow)));
    }
    if let Some(name) = session.scenario_name() {
        spans.push(Span::raw(" | Scenario: "));
        spans.push(Span::styled(name.to_string(), Style::default().fg(Color::Magenta)));
    }
    spans.push(Span::raw(match session.focused() {
        Some(id) => format!(" | Focused: camera {}", id),
        None => " | All feeds".to_string(),
    }));
    spans.push(Span::raw(" | F1-F3 scenarios, F8 dismiss, Esc quit"));

    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_cameras(f: &mut Frame, area: Rect, app: &App) {
    let frames = app.session.camera_frames();
    match frames.len() {
        0 => {
            let placeholder = Paragraph::new("No map data for this camera")
                .block(Block::default().borders(Borders::ALL).title("Camera Feeds"));
            f.render_widget(placeholder, area);
        }
        1 => draw_camera_canvas(f, area, &frames[0]),
        _ => {
            // 2x2 grid of the first four feeds
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            for (row_idx, row) in rows.iter().enumerate() {
                let cols = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(*row);
                for (col_idx, col) in cols.iter().enumerate() {
                    if let Some(frame) = frames.get(row_idx * 2 + col_idx) {
                        draw_camera_canvas(f, *col, frame);
                    }
                }
            }
        }
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::LightRed,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}

fn draw_camera_canvas(f: &mut Frame, area: Rect, camera_frame: &CameraFrame) {
    let map = &camera_frame.map;
    let border_color = if camera_frame.has_alert { Color::Red } else { Color::DarkGray };
    let title = format!(
        " {} [{}] - {} ",
        camera_frame.camera.name, camera_frame.count_label, camera_frame.camera.room
    );

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title),
        )
        .x_bounds([0.0, map.width])
        .y_bounds([0.0, map.height])
        .paint(|ctx| {
            // Floor-map y grows downward; the canvas y axis grows upward
            for obstacle in &map.obstacles {
                let rect = &obstacle.rect;
                ctx.draw(&Rectangle {
                    x: rect.x,
                    y: map.height - rect.y - rect.height,
                    width: rect.width,
                    height: rect.height,
                    color: if obstacle.is_passable() { Color::DarkGray } else { Color::Gray },
                });
                if let Some(label) = &obstacle.label {
                    ctx.print(
                        rect.x + rect.width / 2.0,
                        map.height - rect.y - rect.height / 2.0,
                        Span::styled(label.clone(), Style::default().fg(Color::DarkGray)),
                    );
                }
            }
            let green: Vec<(f64, f64)> = camera_frame
                .dots
                .iter()
                .filter(|d| d.color == DotColor::Green)
                .map(|d| (d.x, map.height - d.y))
                .collect();
            let red: Vec<(f64, f64)> = camera_frame
                .dots
                .iter()
                .filter(|d| d.color == DotColor::Red)
                .map(|d| (d.x, map.height - d.y))
                .collect();
            ctx.draw(&Points { coords: &green, color: Color::Green });
            ctx.draw(&Points { coords: &red, color: Color::Red });
        });
    f.render_widget(canvas, area);
}

fn draw_alerts(f: &mut Frame, area: Rect, app: &App) {
    let alerts = app.session.visible_alerts();
    let items: Vec<ListItem> = alerts
        .iter()
        .map(|alert| {
            let color = severity_color(alert.severity);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", alert.severity.as_str().to_uppercase()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(alert.message.clone()),
                Span::styled(
                    format!("  {} | {}", alert.timestamp, alert.location),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!(" Active Alerts ({}) ", alerts.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_chat(f: &mut Frame, area: Rect, app: &App) {
    let visible_rows = area.height.saturating_sub(2) as usize;
    let messages: Vec<&artguard::domain::ChatMessage> = app.session.transcript().collect();
    let start = messages.len().saturating_sub(visible_rows);

    let items: Vec<ListItem> = messages[start..]
        .iter()
        .map(|message| {
            let (tag, color) = match message.role {
                ChatRole::User => ("you", Color::Cyan),
                ChatRole::Assistant => ("artguard", Color::Green),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>9}> ", tag), Style::default().fg(color)),
                Span::raw(message.content.clone()),
            ]))
        })
        .collect();

    let list =
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Command Log "));
    f.render_widget(list, area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let input = Paragraph::new(format!("> {}", app.input))
        .block(Block::default().borders(Borders::ALL).title(" Command "));
    f.render_widget(input, area);
}
