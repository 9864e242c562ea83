// linetrace: time-travel line tracer for small teaching programs

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use linetrace::config::{ExecutionConfig, Language};
use linetrace::interpreter::engine::TraceEngine;
use linetrace::snapshot::ExecutionState;
use linetrace::ui::App;

#[derive(Parser)]
#[command(name = "linetrace")]
#[command(about = "Step through a small program line by line", long_about = None)]
struct Cli {
    /// Program to trace
    file: PathBuf,

    /// TOML file with execution settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Source language tag
    #[arg(long, value_enum)]
    language: Option<Language>,

    /// Maximum number of executed lines
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Write the full trace as JSON
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Print the trace instead of opening the TUI
    #[arg(long)]
    headless: bool,

    /// Delay between auto-play steps
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    speed_ms: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never mix with the trace on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ExecutionConfig::load(path)?,
        None => ExecutionConfig::default(),
    };
    if let Some(language) = cli.language {
        config = config.with_language(language);
    }
    if let Some(max_steps) = cli.max_steps {
        config = config.with_max_steps(max_steps);
    }

    let source = fs::read_to_string(&cli.file)
        .map_err(|e| format!("failed to read {}: {}", cli.file.display(), e))?;

    let engine = if cli.headless {
        TraceEngine::with_output_sink(&source, config, |text| println!("{}", text))
    } else {
        TraceEngine::new(&source, config)
    };

    if let Some(path) = &cli.export {
        engine.export().write_to(path)?;
        info!(path = %path.display(), "trace exported");
    }

    if cli.headless {
        return run_headless(&engine);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(engine, Duration::from_millis(cli.speed_ms));
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

/// Print one line per snapshot; exits with status 1 when the run ended in an error
fn run_headless(engine: &TraceEngine) -> Result<(), Box<dyn std::error::Error>> {
    let definitions = engine.functions().definitions();
    if !definitions.is_empty() {
        println!("--- functions ---");
        for def in definitions {
            println!(
                "{}({})  line {}",
                def.name,
                def.params.join(", "),
                def.declaration_line
            );
        }
    }

    println!("--- trace ({} steps) ---", engine.total_steps());
    for state in &engine.snapshots()[1..] {
        println!("{}", describe(state));
    }

    if let Some(message) = engine.final_state().error_message() {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
    Ok(())
}

fn describe(state: &ExecutionState) -> String {
    let mut line = match state.last_entry() {
        Some(entry) => entry.to_string(),
        None => format!(
            "step {:>3}  line {:>3}  halted",
            state.current_step, state.current_line
        ),
    };
    if let Some(message) = state.error_message() {
        line.push_str(&format!("  [{}]", message));
    }
    line
}
