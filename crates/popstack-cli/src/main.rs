//! Popstack - Drive a popup queue from a script
//!
//! Reads one step per line, runs it against a popup controller with a
//! headless transition and background, and prints the events it produces.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use popstack_core::{paths, ManualScheduler, PopupOptions};
use tokio::task::LocalSet;

mod script;
mod session;

use session::{Clock, Session};

/// Popstack - popup queue playground
#[derive(Parser)]
#[command(name = "popstack")]
#[command(about = "Drive a popup queue from a script and watch what it shows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Options file (defaults to ~/.popstack/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Accept commands published on the engine (`emit` steps)
    #[arg(long, global = true)]
    global: bool,

    /// Run outgoing and incoming transitions concurrently
    #[arg(long, global = true)]
    overlap: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file (`-` reads stdin)
    Run {
        script: String,

        /// Use real timers instead of a virtual clock for `wait`
        #[arg(long)]
        realtime: bool,
    },

    /// Print the effective options as TOML
    Config,
}

impl Cli {
    fn options(&self) -> Result<PopupOptions> {
        let mut options = match &self.config {
            Some(path) => PopupOptions::load_from_path(path)?,
            None => PopupOptions::load()?,
        };
        options.global |= self.global;
        options.overlap |= self.overlap;
        Ok(options)
    }
}

fn read_script(source: &str) -> Result<String> {
    if source == "-" {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("Failed to read script from stdin")?;
        return Ok(contents);
    }
    let path = Path::new(source);
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))
}

async fn run(script_source: &str, options: PopupOptions, realtime: bool) -> Result<()> {
    let steps = script::parse(&read_script(script_source)?)?;
    tracing::info!(steps = steps.len(), realtime, "running script");

    let clock = if realtime {
        Clock::Realtime
    } else {
        Clock::Manual(ManualScheduler::new())
    };
    let mut session = Session::new(options, clock)?;

    for step in &steps {
        for line in session.execute(step).await {
            println!("{}", line);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = cli.options()?;
    tracing::debug!(config = ?paths::config_file(), "options loaded");

    match cli.command {
        Commands::Run { script, realtime } => {
            // Background hide checks are spawned with `spawn_local`
            LocalSet::new()
                .run_until(run(&script, options, realtime))
                .await
        }
        Commands::Config => {
            print!("{}", options.to_toml_string()?);
            Ok(())
        }
    }
}
