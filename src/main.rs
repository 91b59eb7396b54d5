mod app;
mod domain;
mod input;
mod persistence;
mod report;
mod ticker;
mod timer;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{derive_view, Priority, SortKey, StatusFilter, TaskStore, ViewConfig, DEFAULT_CATEGORY};
use persistence::{
    ensure_data_dir, init_local_data_dir, log_file, FileStore, PersistenceBridge,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smart-tasks")]
#[command(about = "A terminal task list with due dates, priorities, subtasks and time tracking", long_about = None)]
struct Cli {
    /// Data directory (defaults to a local .smart-tasks or ~/.smart-tasks)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .smart-tasks directory in the current directory
    Init,
    /// Print tasks
    List {
        #[arg(short, long, value_enum, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        #[arg(short = 'o', long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,
        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a task
    Add {
        text: String,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },
    /// Export all tasks as pretty JSON
    Export {
        /// Output file path. Defaults to ./tasks-YYYY-MM-DD.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all tasks with the contents of a JSON document
    Import { path: PathBuf },
    /// Generate a markdown report with statistics
    Report {
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let data_dir = init_local_data_dir(&cwd)?;
        println!("Initialized smart-tasks directory: {}", data_dir.display());
        println!();
        println!("smart-tasks will now use this local directory for storage.");
        return Ok(());
    }

    let data_dir = ensure_data_dir(cli.dir.as_deref())?;
    init_logging(&data_dir);
    tracing::debug!(dir = %data_dir.display(), "using data directory");

    let bridge = PersistenceBridge::new(Box::new(FileStore::new(&data_dir)));

    match cli.command {
        Some(Commands::List {
            filter,
            sort,
            search,
        }) => {
            let store = TaskStore::from_tasks(bridge.load().tasks);
            let config = ViewConfig {
                filter,
                sort,
                search: search.unwrap_or_default(),
            };
            print_tasks(&store, &config);
            Ok(())
        }
        Some(Commands::Add {
            text,
            due,
            priority,
            category,
        }) => add_task(bridge, &text, due.as_deref(), priority, &category),
        Some(Commands::Export { output }) => {
            let tasks = bridge.load().tasks;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(persistence::export_file_name(Local::now().date_naive()))
            });
            bridge.export(&tasks, &path)?;
            println!("Exported {} tasks to {}", tasks.len(), path.display());
            Ok(())
        }
        Some(Commands::Import { path }) => {
            let dark_mode = bridge.load().dark_mode;
            let tasks = bridge.import(&path)?;
            let mut bridge = bridge;
            bridge.save(&tasks, dark_mode)?;
            println!("Imported {} tasks from {}", tasks.len(), path.display());
            Ok(())
        }
        Some(Commands::Report { output }) => {
            let today = Local::now().date_naive();
            let tasks = bridge.load().tasks;
            let output = output.unwrap_or_else(|| report::default_report_path(&data_dir, today));
            report::generate_report(&tasks, today, &output)?;
            println!("Report generated: {}", output.display());
            Ok(())
        }
        Some(Commands::Init) | None => run_tui(bridge),
    }
}

/// Log to a file in the data directory; the terminal belongs to the UI
fn init_logging(data_dir: &Path) {
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file(data_dir))
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Failed to open log file: {}", e);
            return;
        }
    };

    let filter = EnvFilter::try_from_env("SMART_TASKS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("smart_tasks=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn print_tasks(store: &TaskStore, config: &ViewConfig) {
    let today = Local::now().date_naive();
    let view = derive_view(store.tasks(), config);

    if view.is_empty() {
        println!("No tasks.");
        return;
    }

    for task in view {
        let mark = if task.completed { "x" } else { " " };
        let due = match task.due_date {
            Some(due) if task.is_overdue(today) => format!("  due {} (overdue)", due),
            Some(due) => format!("  due {}", due),
            None => String::new(),
        };
        println!(
            "[{}] {}  !{} #{}{}",
            mark,
            task.text,
            task.priority.to_tag(),
            task.category,
            due
        );
        for subtask in &task.subtasks {
            let mark = if subtask.completed { "x" } else { " " };
            println!("      [{}] {}", mark, subtask.text);
        }
    }
}

fn add_task(
    mut bridge: PersistenceBridge,
    text: &str,
    due: Option<&str>,
    priority: Priority,
    category: &str,
) -> Result<()> {
    let due_date = due
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("Invalid due date. Use YYYY-MM-DD: {}", e))
        })
        .transpose()?;

    let loaded = bridge.load();
    let mut store = TaskStore::from_tasks(loaded.tasks);
    if store.add(text, due_date, priority, category, Utc::now()).is_none() {
        anyhow::bail!("Task text must not be blank");
    }
    bridge.save(store.tasks(), loaded.dark_mode)?;
    println!("Added \"{}\"", text.trim());
    Ok(())
}

fn run_tui(bridge: PersistenceBridge) -> Result<()> {
    let export_dir = std::env::current_dir().context("Failed to read current directory")?;
    let mut app = AppState::new(bridge, export_dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Time already tracked is saved; the running clock is not resumed on restart
    app.timer.stop();
    if let Err(e) = app.flush() {
        tracing::error!(error = %e, "final save failed");
        eprintln!("Error saving state: {:#}", e);
    }

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let poll_rate = ticker::tick_duration();
    let mut ticker = ticker::Ticker::new();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        if app.take_timer_restart() {
            // Time before the key press belongs to no run
            ticker.lap();
        }
        app.tick(ticker.lap());

        if let Err(e) = app.save() {
            tracing::error!(error = %e, "save failed");
            app.status_message = Some(format!("Failed to save: {:#}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_priority_parses_as_value_enum() {
        let cli = Cli::try_parse_from(["smart-tasks", "add", "Ship it", "-p", "high"]).unwrap();
        match cli.command {
            Some(Commands::Add { priority, .. }) => assert_eq!(priority, Priority::High),
            _ => panic!("expected add command"),
        }

        let cli = Cli::try_parse_from(["smart-tasks", "add", "Later"]).unwrap();
        match cli.command {
            Some(Commands::Add { priority, .. }) => assert_eq!(priority, Priority::Medium),
            _ => panic!("expected add command"),
        }

        assert!(Cli::try_parse_from(["smart-tasks", "add", "X", "-p", "urgent"]).is_err());
    }
}
