//! Terminal front-end and entry point.
//!
//! This binary is the thin integration layer between the Roster library and a
//! line-oriented terminal. It reads commands from stdin, translates them into
//! library events and prints the rendered view after every visible change.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │     Event loop task     │
//! │  ┌──────────────────┐   │
//! │  │ AppState (owner) │   │  ← Single writer: every event lands here
//! │  └──────────────────┘   │
//! │     ▲            │      │
//! │     │ Event      │ Action
//! │     │            ▼      │
//! │  ┌──────────────────┐   │
//! │  │   StoreWorker    │   │  ← Store calls, image encoding
//! │  │ (tokio tasks)    │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! 1. **Load**: Parse flags, read config file, apply `ROSTER_*` overrides
//! 2. **Start**: Initialize tracing, build the store and worker
//! 3. **Initial fetch**: Post `Reload` to fill the cache
//! 4. **Loop**: Multiplex stdin commands and worker completions
//!
//! # Command Mapping
//!
//! - `find [QUERY]` → `Event::Search`
//! - `new` → `Event::OpenAdd`
//! - `edit ID` / `delete ID` → `Event::OpenEdit` / `Event::OpenDelete`
//! - `photo PATH` → `Event::ImageFromFile` for the open dialog
//! - `photo-url [URL]` → `Event::ImageFromUrl` for the open dialog
//! - `save key=value...` → `Event::SubmitAdd` or `Event::SubmitEdit`
//! - `confirm` → `Event::ConfirmDelete`
//! - `cancel` → `Event::CloseModal`
//! - `show ID` / `hide` → `Event::OpenImage` / `Event::CloseImage`
//! - `reload` / `refresh ID` → `Event::Reload` / `Event::Refresh`

use clap::{CommandFactory, Parser, Subcommand};
use roster::app::Session;
use roster::observability::init_tracing;
use roster::worker::StoreWorker;
use roster::{handle_event, infrastructure, initialize, AppState, Config, Employee, EmployeeId, Event, ImageTarget};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const DEFAULT_COLUMNS: usize = 100;

/// Employee directory client.
#[derive(Debug, Parser)]
#[command(name = "roster", version, about)]
struct Cli {
    /// Configuration file (default: ~/.config/roster/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the employee service
    #[arg(long)]
    api_url: Option<String>,

    /// Use a local JSON file instead of the remote service
    #[arg(long, value_name = "PATH")]
    local: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `roster=trace`
    #[arg(long)]
    trace_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        if let Some(url) = &self.api_url {
            map.insert("api_url".to_string(), url.clone());
        }
        if let Some(path) = &self.local {
            map.insert("local_store".to_string(), path.display().to_string());
        }
        if let Some(level) = &self.trace_level {
            map.insert("trace_level".to_string(), level.clone());
        }
        map
    }
}

/// One line typed at the prompt.
#[derive(Debug, Parser)]
#[command(
    name = "command",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Filter by name, email or job title; no query shows everyone
    Find { query: Vec<String> },
    /// Open the add dialog
    New,
    /// Open the edit dialog for an employee
    Edit { id: EmployeeId },
    /// Ask to delete an employee
    Delete { id: EmployeeId },
    /// Attach an image file to the open dialog
    Photo { path: PathBuf },
    /// Attach an image URL to the open dialog; no URL clears it
    PhotoUrl { url: Option<String> },
    /// Submit the open dialog with name=, email=, job= and image= fields
    Save { fields: Vec<String> },
    /// Confirm the pending delete
    Confirm,
    /// Close the open dialog
    Cancel,
    /// Preview an employee's image
    Show { id: EmployeeId },
    /// Close the image preview
    Hide,
    /// Fetch every employee again
    Reload,
    /// Fetch one employee again
    Refresh { id: EmployeeId },
    /// Show this help
    Help,
    /// Leave
    #[command(alias = "exit")]
    Quit,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("roster: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let _guard = init_tracing(&config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "roster starting");

    let store = match config.build_store() {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "failed to build store");
            eprintln!("roster: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let worker = StoreWorker::new(store, tx);
    let state = initialize(&config);

    run(state, worker, rx).await;
    tracing::info!("roster exiting");
    std::process::ExitCode::SUCCESS
}

fn load_config(cli: &Cli) -> roster::Result<Config> {
    let path = cli.config.clone().unwrap_or_else(infrastructure::config_file);
    let config = Config::from_file(&path)?
        .apply_overrides(&Config::env_overrides())
        .apply_overrides(&cli.overrides());
    config.validate()?;
    Ok(config)
}

async fn run(mut state: AppState, worker: StoreWorker, mut events: mpsc::UnboundedReceiver<Event>) {
    let cols = terminal_columns();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", roster::ui::render(&state, cols));
    dispatch(&mut state, &worker, Event::Reload, cols);

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        for event in command_events(command, &state).await {
                            dispatch(&mut state, &worker, event, cols);
                        }
                    }
                    Err(message) => println!("{message}"),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "failed to read stdin");
                    break;
                }
            },
            Some(event) = events.recv() => dispatch(&mut state, &worker, event, cols),
        }
    }
}

/// Runs one event through the handler and starts its actions.
fn dispatch(state: &mut AppState, worker: &StoreWorker, event: Event, cols: usize) {
    match handle_event(state, event) {
        Ok((render, actions)) => {
            for action in actions {
                worker.execute(action);
            }
            if render {
                println!("{}", roster::ui::render(state, cols));
            }
        }
        Err(e) => println!("error: {e}"),
    }
}

fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let tokens = tokenize(line)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    Line::try_parse_from(tokens)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.to_string())
}

/// Splits a line on whitespace, honoring single and double quotes.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Translates a command into events, reading files and looking up records.
async fn command_events(command: Command, state: &AppState) -> Vec<Event> {
    match command {
        Command::Find { query } => vec![Event::Search(query.join(" "))],
        Command::New => vec![Event::OpenAdd],
        Command::Edit { id } => lookup(state, id).map(Event::OpenEdit).into_iter().collect(),
        Command::Delete { id } => lookup(state, id).map(Event::OpenDelete).into_iter().collect(),
        Command::Photo { path } => {
            let Some(target) = image_target(state) else {
                return vec![];
            };
            match tokio::fs::read(&path).await {
                Ok(bytes) => vec![Event::ImageFromFile { bytes, target }],
                Err(e) => {
                    println!("error: cannot read {}: {e}", path.display());
                    vec![]
                }
            }
        }
        Command::PhotoUrl { url } => image_target(state)
            .map(|target| Event::ImageFromUrl {
                value: url.unwrap_or_default(),
                target,
            })
            .into_iter()
            .collect(),
        Command::Save { fields } => save_events(state, &fields),
        Command::Confirm => {
            let id = state.session().deleting().and_then(|record| record.id);
            vec![Event::ConfirmDelete(id)]
        }
        Command::Cancel => vec![Event::CloseModal],
        Command::Show { id } => match lookup(state, id) {
            Some(record) => match record.image_url {
                Some(url) => vec![Event::OpenImage {
                    url,
                    name: Some(record.name),
                }],
                None => {
                    println!("{} has no image", record.name);
                    vec![]
                }
            },
            None => vec![],
        },
        Command::Hide => vec![Event::CloseImage],
        Command::Reload => vec![Event::Reload],
        Command::Refresh { id } => vec![Event::Refresh(id)],
        Command::Help => {
            println!("{}", Line::command().render_help());
            vec![]
        }
        Command::Quit => vec![],
    }
}

fn lookup(state: &AppState, id: EmployeeId) -> Option<Employee> {
    let record = state.cache().get(id).cloned();
    if record.is_none() {
        println!("no employee with id {id}");
    }
    record
}

fn image_target(state: &AppState) -> Option<ImageTarget> {
    match state.session().session() {
        Session::Adding { .. } => Some(ImageTarget::Add),
        Session::Editing(_) => Some(ImageTarget::Edit),
        Session::Idle | Session::Deleting(_) => {
            println!("open `new` or `edit ID` first");
            None
        }
    }
}

/// Builds the submit event from `key=value` fields.
///
/// An `image=` field is sent as an image event first, so it lands in the
/// dialog before the payload is taken.
fn save_events(state: &AppState, fields: &[String]) -> Vec<Event> {
    let (mut payload, submit, target): (Employee, fn(Employee) -> Event, ImageTarget) =
        match state.session().session() {
            Session::Adding { .. } => (Employee::new(""), Event::SubmitAdd, ImageTarget::Add),
            Session::Editing(record) => (record.clone(), Event::SubmitEdit, ImageTarget::Edit),
            Session::Idle | Session::Deleting(_) => {
                println!("nothing to save; open `new` or `edit ID` first");
                return vec![];
            }
        };

    let mut events = Vec::new();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            println!("ignoring `{field}`: expected key=value");
            continue;
        };
        match key {
            "name" => payload.name = value.to_string(),
            "email" => payload.email = value.to_string(),
            "job" | "job_title" => payload.job_title = value.to_string(),
            "image" => events.push(Event::ImageFromUrl {
                value: value.to_string(),
                target,
            }),
            other => println!("ignoring unknown field `{other}`"),
        }
    }

    events.push(submit(payload));
    events
}

fn terminal_columns() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .filter(|&c| c > 0)
        .unwrap_or(DEFAULT_COLUMNS)
}
