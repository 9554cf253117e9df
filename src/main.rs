use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use clawboard::config;
use clawboard::loader;
use clawboard::model::Schedule;
use clawboard::schedule;
use clawboard::server;
use clawboard::util::{now_ms, write_string};
use clawboard::views;

#[derive(Parser)]
#[command(author, version, about = "Mission-control dashboard for clawd agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        /// Bind address (overrides config; default: 127.0.0.1:18790)
        #[arg(long)]
        bind: Option<String>,
        /// Data directory or base URL (overrides config/env)
        #[arg(long)]
        data: Option<String>,
        /// State directory (overrides default)
        #[arg(long = "state-dir")]
        state_dir: Option<PathBuf>,
    },
    /// Render the dashboard to a static HTML page
    Render {
        /// Data directory or base URL (overrides config/env)
        #[arg(long)]
        data: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
        /// State directory (overrides default)
        #[arg(long = "state-dir")]
        state_dir: Option<PathBuf>,
    },
    /// Print the human-readable form of a schedule value
    Describe {
        /// Legacy string ("cron 0 9 * * *", "every 2h", "at <iso>") or a
        /// JSON schedule object
        schedule: String,
        /// State directory (overrides default)
        #[arg(long = "state-dir")]
        state_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve {
            bind,
            data,
            state_dir,
        } => {
            let (cfg, _state_dir) = config::load_config(state_dir)?;
            let source = config::resolve_data_source(data.as_deref(), &cfg);
            let bind = config::resolve_bind(bind.as_deref(), &cfg);
            let tz = config::resolve_timezone(&cfg);
            eprintln!("[clawboard] loading data from {}", source.describe());
            let data = Arc::new(loader::load_dashboard(&source, now_ms(), tz));
            server::run_server(&bind, data, tz)
        }
        Commands::Render {
            data,
            out,
            state_dir,
        } => {
            let (cfg, _state_dir) = config::load_config(state_dir)?;
            let source = config::resolve_data_source(data.as_deref(), &cfg);
            let tz = config::resolve_timezone(&cfg);
            let snapshot = loader::load_dashboard(&source, now_ms(), tz);
            let html = views::page(&snapshot, now_ms(), tz);
            match out {
                Some(path) => write_string(&path, &html)?,
                None => print!("{html}"),
            }
            Ok(())
        }
        Commands::Describe {
            schedule: raw,
            state_dir,
        } => {
            let (cfg, _state_dir) = config::load_config(state_dir)?;
            let tz = config::resolve_timezone(&cfg);
            let value = serde_json::from_str(&raw)
                .unwrap_or_else(|_| serde_json::Value::String(raw.clone()));
            let parsed = Schedule::from_value(&value);
            println!("{}", schedule::schedule_text(parsed.as_ref(), now_ms(), tz));
            Ok(())
        }
    }
}
