use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};

mod aggregate;
mod config;
mod dashboard;
mod dataset;
mod error;
mod export;
mod filter;
mod models;
mod report;
mod session;

use config::{
    ALL_SELECTOR, DATA_ENV, DEFAULT_DASHBOARD_PATH, DEFAULT_EXPORT_PATH, DEFAULT_REPORT_PATH,
    DEFAULT_SEED_PATH,
};
use filter::ClassSelector;
use models::StudentRecord;
use session::Session;

#[derive(Parser)]
#[command(name = "student-dashboard")]
#[command(
    version,
    about = "Student performance dashboard over a small class dataset",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// CSV dataset to use instead of the built-in sample
    #[arg(long, global = true, env = DATA_ENV)]
    data: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the class selector options
    Classes,
    /// Print KPIs, charts data and profiles to the terminal
    Summary {
        #[arg(long, default_value = ALL_SELECTOR)]
        class: ClassSelector,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = ALL_SELECTOR)]
        class: ClassSelector,
        #[arg(long, default_value = DEFAULT_REPORT_PATH)]
        out: PathBuf,
    },
    /// Generate the HTML dashboard
    Dashboard {
        #[arg(long, default_value = ALL_SELECTOR)]
        class: ClassSelector,
        #[arg(long, default_value = DEFAULT_DASHBOARD_PATH)]
        out: PathBuf,
    },
    /// Export the derived view as JSON
    Export {
        #[arg(long, default_value = ALL_SELECTOR)]
        class: ClassSelector,
        #[arg(long, default_value = DEFAULT_EXPORT_PATH)]
        out: PathBuf,
    },
    /// Write the sample dataset as CSV
    Seed {
        #[arg(long, default_value = DEFAULT_SEED_PATH)]
        out: PathBuf,
    },
    /// Read class selections from stdin and recompute on each one
    Interactive,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let records = load_records(cli.data.as_deref())?;
    let mut session = Session::new(&records);

    match cli.command {
        Commands::Classes => {
            for option in session.options() {
                println!("{option}");
            }
        }
        Commands::Summary { class } => {
            print!("{}", report::render_summary(&session.select(class)));
        }
        Commands::Report { class, out } => {
            let report = report::build_report(&session.select(class), Local::now());
            dashboard::write_output(&out, &report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Dashboard { class, out } => {
            let html = dashboard::render_dashboard(&session.select(class), Local::now())
                .context("failed to render dashboard")?;
            dashboard::write_output(&out, &html)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Dashboard written to {}.", out.display());
        }
        Commands::Export { class, out } => {
            let json = export::export_json(&session.select(class))
                .context("failed to serialize dashboard view")?;
            dashboard::write_output(&out, &json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("View exported to {}.", out.display());
        }
        Commands::Seed { out } => {
            dataset::write_csv(&dataset::sample_dataset(), &out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Sample dataset written to {}.", out.display());
        }
        Commands::Interactive => run_interactive(&mut session)?,
    }

    Ok(())
}

fn load_records(path: Option<&std::path::Path>) -> anyhow::Result<Vec<StudentRecord>> {
    match path {
        Some(path) => dataset::load_csv(path)
            .with_context(|| format!("failed to load dataset from {}", path.display())),
        None => {
            debug!("Using built-in sample dataset");
            Ok(dataset::sample_dataset())
        }
    }
}

/// One recomputation per input line. A blank line repeats the last selection.
fn run_interactive(session: &mut Session<'_>) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("Classes: {}", session.options().join(", "));
    print!("{}", report::render_summary(&session.current()));

    loop {
        print!("class> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input == "quit" || input == "exit" {
            break;
        }

        let summary = if input.is_empty() {
            report::render_summary(&session.current())
        } else {
            let selector: ClassSelector = input.parse()?;
            report::render_summary(&session.select(selector))
        };
        print!("{summary}");
    }

    info!("Session ended on class {}", session.selector());
    Ok(())
}
