mod api;
mod app;
mod card;
mod chat;
mod cli;
mod config;
mod format;
mod issue;
mod keybinds;
mod loader;
mod logging;
mod main_actions;
mod main_events;
mod markdown;
mod sections;
mod theme;
mod ui;

use std::env;
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::api::{HttpIssueApi, IssueApi};
use crate::app::{App, AppAction};
use crate::card::Card;
use crate::chat::{ChatReply, ChatRequest};
use crate::cli::{CliCommand, LaunchOptions, USAGE, parse_args};
use crate::config::{Config, Endpoints};
use crate::issue::Issue;
use crate::loader::{IssueSource, load_issues};

type TuiBackend = CrosstermBackend<Stdout>;
type Tui = Terminal<TuiBackend>;

enum AppEvent {
    IssuesLoaded(Vec<Issue>),
    IssuesFailed(String),
    ChatReplied(ChatReply),
    ChatFailed(String),
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let (options, show) = match parse_args(&args)? {
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Show { number, options } => (options, Some(number)),
        CliCommand::Run(options) => (options, None),
    };

    let _log_guard = logging::init();
    let mut config = Config::load()?;
    config.set_server(options.server.clone());
    match show {
        Some(number) => handle_show(&config, number, options),
        None => run(config, options),
    }
}

fn handle_show(config: &Config, number: usize, options: LaunchOptions) -> Result<()> {
    let api = HttpIssueApi::new(&config.endpoints())?;
    let source = IssueSource::from_file(options.file);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let issues = runtime
        .block_on(load_issues(&source, &api))
        .context("Error loading data")?;

    let index = number.saturating_sub(1);
    let Some(issue) = issues.get(index) else {
        bail!("issue {} not found ({} loaded)", number, issues.len());
    };
    println!("{}", Card::render(issue, index, issues.len()).plain_text());
    Ok(())
}

fn run(config: Config, options: LaunchOptions) -> Result<()> {
    let endpoints = config.endpoints();
    let source = IssueSource::from_file(options.file);
    info!(issues = %endpoints.issues_url, chat = %endpoints.chat_url, ?source, "starting");

    let mut terminal_guard = TerminalGuard::init()?;
    let mut app = App::new(config);
    let (event_tx, event_rx) = mpsc::channel();
    main_actions::start_load(source, endpoints.clone(), event_tx.clone());

    run_app(
        terminal_guard.terminal_mut(),
        &mut app,
        &endpoints,
        event_rx,
        event_tx,
    )
}

fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    endpoints: &Endpoints,
    event_rx: Receiver<AppEvent>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        main_events::handle_events(app, &event_rx);
        terminal.draw(|frame| ui::draw(frame, app))?;

        if app.should_quit() {
            info!("quitting");
            return Ok(());
        }

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if !event::poll(timeout)? {
            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
            }
            continue;
        }

        match event::read()? {
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
            _ => {}
        }

        main_actions::handle_actions(app, endpoints, &event_tx);
    }
}

struct TerminalGuard {
    terminal: Tui,
}

impl TerminalGuard {
    fn init() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Tui {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
