use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parking_lot::RwLock;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tokio::time::{interval_at, MissedTickBehavior};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use safewatch::data::duration::format_duration;
use safewatch::schedule::{simulate, Due, Scheduler};
use safewatch::server::missing_assets;
use safewatch::ui::Theme;
use safewatch::{events, ui, App, Session, Settings, SharedSnapshot, Snapshot, StaticServer, Timing};

/// Upper bound on how long the dashboard waits for input between redraws.
const MAX_FRAME_WAIT: Duration = Duration::from_millis(50);

/// Log file used by the dashboard when `--log-file` is not given.
const DEFAULT_LOG_FILE: &str = "safewatch.log";

#[derive(Parser, Debug)]
#[command(name = "safewatch")]
#[command(about = "Simulated camera safety dashboard with a web asset server")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for the web asset server
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Directory holding the web assets
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Seed for drift and trigger targeting (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate right after each drift tick instead of on its own timer
    #[arg(long)]
    coupled: bool,

    /// Do not start the web asset server
    #[arg(long, conflicts_with = "headless")]
    no_server: bool,

    /// Write logs to this file (the dashboard defaults to safewatch.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run the simulation and web server without the terminal dashboard
    #[arg(long)]
    headless: bool,

    /// Simulate without sleeping, write the final state to a JSON file and exit
    #[arg(short, long, conflicts_with_all = ["headless", "no_server"])]
    export: Option<PathBuf>,

    /// Simulated seconds for --export
    #[arg(long, default_value = "30", requires = "export")]
    ticks: u64,
}

/// Where log output goes.
#[derive(Debug, PartialEq)]
enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

impl<'a> LogTarget<'a> {
    /// The terminal belongs to the dashboard, so it logs to a file.
    fn for_args(args: &'a Args) -> Self {
        match (&args.log_file, args.headless || args.export.is_some()) {
            (Some(path), _) => LogTarget::File(path),
            (None, true) => LogTarget::Stderr,
            (None, false) => LogTarget::File(Path::new(DEFAULT_LOG_FILE)),
        }
    }
}

fn init_tracing(target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "safewatch=info".into());

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
        LogTarget::File(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(LogTarget::for_args(&args))?;

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(assets) = args.assets.clone() {
        settings.server.assets = assets;
    }
    if args.coupled {
        settings.coupled = true;
    }
    settings.validate()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&settings, args.seed, export_path, Duration::from_secs(args.ticks));
    }

    if args.headless {
        return run_headless(&settings, args.seed);
    }

    run_dashboard(&settings, args.seed, !args.no_server)
}

/// Run the simulation and the web server until Ctrl-C.
fn run_headless(settings: &Settings, seed: Option<u64>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = Session::from_settings(settings, seed)?;
        let shared: SharedSnapshot = Arc::new(RwLock::new(session.snapshot()));

        let server = StaticServer::new(settings.server.clone(), shared.clone());
        let listener = server.bind().await?;
        let server_task = tokio::spawn(server.serve(listener));

        tracing::info!(
            units = settings.units,
            drift = %format_duration(settings.drift_interval),
            evaluate = %format_duration(settings.evaluate_interval),
            timing = ?settings.timing(),
            "simulation started"
        );

        let start = tokio::time::Instant::now();
        let mut drift = interval_at(start + settings.drift_interval, settings.drift_interval);
        drift.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut evaluate = interval_at(start + settings.evaluate_interval, settings.evaluate_interval);
        evaluate.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let coupled = settings.timing() == Timing::Coupled;

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let due = tokio::select! {
                _ = drift.tick() => Due { drift: true, evaluate: coupled },
                _ = evaluate.tick(), if !coupled => Due { drift: false, evaluate: true },
                _ = &mut shutdown => break,
            };
            session.advance(due);
            session.board_mut().siren_mut().release_expired(Instant::now());
            *shared.write() = session.snapshot();
        }

        tracing::info!("shutting down");
        server_task.abort();
        Ok::<_, anyhow::Error>(())
    })
}

/// Run the terminal dashboard, with the web server in the background.
fn run_dashboard(settings: &Settings, seed: Option<u64>, serve: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let session = Session::from_settings(settings, seed)?;
    let shared: SharedSnapshot = Arc::new(RwLock::new(Snapshot::default()));
    let server_task = serve.then(|| StaticServer::new(settings.server.clone(), shared.clone()).start());

    let scheduler = Scheduler::from_settings(settings, Instant::now());
    let mut app = App::new(session, scheduler, Theme::auto_detect()).with_publisher(shared);
    if serve {
        app.report_missing_assets(&missing_assets(&settings.server.assets));
    }
    tracing::info!(units = settings.units, serve, "dashboard started");

    let result = run_tui(app);

    if let Some(task) = server_task {
        task.abort();
    }
    result
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        let now = Instant::now();

        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let [header, body, status] = Layout::vertical([
                Constraint::Length(1), // Header / siren banner
                Constraint::Min(12),   // Panels
                Constraint::Length(1), // Status bar
            ])
            .areas(area);

            let [left, right] =
                Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .areas(body);

            // Sensor table: header row plus one row per unit, inside a border
            let sensor_height = app.session.units().len() as u16 + 3;
            let [cameras, sensors] =
                Layout::vertical([Constraint::Min(8), Constraint::Length(sensor_height)]).areas(left);
            let [log, timeline] =
                Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(right);

            ui::common::render_header(frame, app, header, now);
            ui::cameras::render(frame, app, cameras);
            ui::sensors::render(frame, app, sensors);
            ui::alerts::render_log(frame, app, log);
            ui::alerts::render_timeline(frame, app, timeline);
            ui::common::render_status_bar(frame, app, status);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Terminal bell for every new siren voice
        if app.take_bell() {
            terminal.backend_mut().write_all(b"\x07")?;
            terminal.backend_mut().flush()?;
        }

        let timeout = app.until_next(Instant::now()).min(MAX_FRAME_WAIT);
        if let Some(event) = events::poll_event(timeout)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        app.tick(Instant::now());
    }

    Ok(())
}

/// Simulate `span` of virtual time and write the final state to a JSON file
fn export_to_file(
    settings: &Settings,
    seed: Option<u64>,
    export_path: &Path,
    span: Duration,
) -> Result<()> {
    let mut session = Session::from_settings(settings, seed)?;
    let start = Instant::now();
    let mut scheduler = Scheduler::from_settings(settings, start);

    let counts = simulate(&mut session, &mut scheduler, start, span);
    tracing::info!(
        drifts = counts.drifts,
        evaluations = counts.evaluations,
        "simulation finished"
    );

    let json = serde_json::to_string_pretty(&session.snapshot_at(start + span))?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    println!("Exported state to: {}", export_path.display());
    Ok(())
}
