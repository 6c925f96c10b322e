use anyhow::Result;
use clap::{Parser, Subcommand};
use relhook::commands::{journal, plan, relation, run};
use relhook::config::Config;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relhook")]
#[command(about = "Relation hook scheduler and runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./relhook.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run relation hooks for a feed of membership changes
    Run {
        /// JSONL feed of relation events ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        events: String,

        /// Directory containing the hooks/ scripts
        #[arg(long)]
        charm_dir: Option<PathBuf>,

        /// Local unit name, e.g. wordpress/0
        #[arg(short, long)]
        unit: Option<String>,

        /// Seconds a hook may run before it is killed
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Print the hooks a feed would run, without running them
    Plan {
        /// JSONL feed of relation events ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        events: String,
    },

    /// List the relation's member units (inside a hook)
    RelationList,

    /// Print relation settings of a unit (inside a hook)
    RelationGet {
        /// Unit to read (default: the hook's remote unit)
        #[arg(short, long)]
        unit: Option<String>,

        /// Single setting to print (default: all settings as JSON)
        key: Option<String>,
    },

    /// Show executed hooks from the journal
    Journal {
        /// Only show the last N entries
        #[arg(short = 'n', long)]
        last: Option<usize>,
    },
}

fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Hook tools only read the hook context and stay quiet by default
        Commands::RelationList => {
            init_logging("warn");
            relation::list()
        }
        Commands::RelationGet { unit, key } => {
            init_logging("warn");
            relation::get(unit.as_deref(), key.as_deref())
        }
        Commands::Run {
            events,
            charm_dir,
            unit,
            timeout,
        } => {
            let mut config = Config::resolve(cli.config.as_deref())?;
            if let Some(charm_dir) = charm_dir {
                config.charm_dir = charm_dir;
            }
            if let Some(unit) = unit {
                config.unit = unit;
            }
            if let Some(timeout) = timeout {
                config.hook_timeout_secs = timeout;
            }
            config.validate()?;
            init_logging(&config.log_level);
            run::execute(&config, &events)
        }
        Commands::Plan { events } => {
            let config = Config::resolve(cli.config.as_deref())?;
            init_logging(&config.log_level);
            plan::execute(&config, &events)
        }
        Commands::Journal { last } => {
            let config = Config::resolve(cli.config.as_deref())?;
            init_logging(&config.log_level);
            journal::execute(&config, last)
        }
    }
}
